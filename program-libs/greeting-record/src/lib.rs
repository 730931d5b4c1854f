//! Byte layouts shared by the greeting program and its clients.
//!
//! Both records are a single little-endian `u32` with no padding and no
//! version byte. The account record and the instruction payload are
//! separate types even though they share a layout.

pub mod errors;

use borsh::{BorshDeserialize, BorshSerialize};
pub use errors::RecordError;

/// Fixed-size borsh record.
pub trait RecordCodec: BorshSerialize + BorshDeserialize + Sized {
    /// Serialized length in bytes.
    const LEN: usize;

    fn size() -> usize {
        Self::LEN
    }

    fn encode(&self) -> Result<Vec<u8>, RecordError> {
        let bytes = self.try_to_vec().map_err(RecordError::from)?;
        if bytes.len() != Self::LEN {
            return Err(RecordError::InvalidLength {
                expected: Self::LEN,
                actual: bytes.len(),
            });
        }
        Ok(bytes)
    }

    /// Decodes the first `LEN` bytes. Trailing bytes are ignored, a shorter
    /// buffer is an error.
    fn decode(bytes: &[u8]) -> Result<Self, RecordError> {
        if bytes.len() < Self::LEN {
            return Err(RecordError::TooShort {
                expected: Self::LEN,
                actual: bytes.len(),
            });
        }
        Self::deserialize(&mut &bytes[..Self::LEN]).map_err(RecordError::from)
    }
}

/// Account data owned by the greeting program.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GreetingRecord {
    pub counter: u32,
}

impl RecordCodec for GreetingRecord {
    const LEN: usize = 4;
}

impl GreetingRecord {
    pub fn new(counter: u32) -> Self {
        Self { counter }
    }
}

impl TryFrom<u64> for GreetingRecord {
    type Error = RecordError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Ok(Self::new(counter_from_u64(value)?))
    }
}

/// Instruction data sent with an invocation. The program adds `counter`
/// to the stored record.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvocationPayload {
    pub counter: u32,
}

impl RecordCodec for InvocationPayload {
    const LEN: usize = 4;
}

impl InvocationPayload {
    pub fn new(counter: u32) -> Self {
        Self { counter }
    }
}

impl TryFrom<u64> for InvocationPayload {
    type Error = RecordError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Ok(Self::new(counter_from_u64(value)?))
    }
}

fn counter_from_u64(value: u64) -> Result<u32, RecordError> {
    u32::try_from(value).map_err(|_| RecordError::CounterOutOfRange(value))
}
