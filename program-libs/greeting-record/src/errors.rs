use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Counter {0} does not fit into u32")]
    CounterOutOfRange(u64),
    #[error("Buffer too short, expected {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
    #[error("Encoded length {actual} does not match fixed length {expected}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("Borsh error: {0}")]
    Borsh(String),
}

impl From<std::io::Error> for RecordError {
    fn from(e: std::io::Error) -> Self {
        RecordError::Borsh(e.to_string())
    }
}

impl From<RecordError> for u32 {
    fn from(e: RecordError) -> u32 {
        match e {
            RecordError::CounterOutOfRange(_) => 6001,
            RecordError::TooShort { .. } => 6002,
            RecordError::InvalidLength { .. } => 6003,
            RecordError::Borsh(_) => 6004,
        }
    }
}

#[cfg(feature = "solana")]
impl From<RecordError> for solana_program::program_error::ProgramError {
    fn from(e: RecordError) -> Self {
        solana_program::program_error::ProgramError::Custom(e.into())
    }
}
