use greeting_client::{AddressError, InvocationError, RecordError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GreeterError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Invocation error: {0}")]
    Invocation(#[from] InvocationError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Invalid keypair data: {0}")]
    InvalidKeypair(String),

    #[error("Invalid address: {field} - {error}")]
    InvalidAddress {
        field: &'static str,
        error: AddressError,
    },

    #[error("Invalid counter: {0}")]
    InvalidCounter(#[from] RecordError),
}
