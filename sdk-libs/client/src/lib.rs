//! Client for the greeting program.
//!
//! [`orchestrator::InvocationOrchestrator`] drives one invocation over any
//! [`rpc::RpcConnection`]: resolve the greeting account, allocate it when
//! asked to, submit the greeting, wait for confirmation and read the
//! counter back.

pub mod address;
pub mod instruction;
pub mod orchestrator;
pub mod rpc;

pub use address::{address_from_literal, derive_address, AccountTarget, AddressError};
pub use greeting_record::{GreetingRecord, InvocationPayload, RecordCodec, RecordError};
pub use orchestrator::{
    AccountCreation, ConfirmationConfig, InvocationError, InvocationOrchestrator,
    InvocationReport, InvocationRequest, Phase,
};
