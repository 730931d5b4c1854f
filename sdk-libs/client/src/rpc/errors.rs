use std::io;

#[cfg(feature = "program-test")]
use solana_banks_client::BanksClientError;
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_sdk::transaction::TransactionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[cfg(feature = "program-test")]
    #[error("BanksError: {0}")]
    BanksError(#[from] BanksClientError),

    #[error("TransactionError: {0}")]
    TransactionError(#[from] TransactionError),

    #[error("ClientError: {0}")]
    ClientError(#[from] ClientError),

    #[error("IoError: {0}")]
    IoError(#[from] io::Error),

    #[error("Error: `{0}`")]
    CustomError(String),
}

impl RpcError {
    /// The transaction error, if the cluster or the program rejected the
    /// transaction rather than the request failing in transit.
    pub fn transaction_error(&self) -> Option<TransactionError> {
        match self {
            RpcError::TransactionError(e) => Some(e.clone()),
            RpcError::ClientError(e) => e.get_transaction_error(),
            #[cfg(feature = "program-test")]
            RpcError::BanksError(BanksClientError::TransactionError(e))
            | RpcError::BanksError(BanksClientError::SimulationError { err: e, .. }) => {
                Some(e.clone())
            }
            _ => None,
        }
    }

    /// Whether repeating the same read-only request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            RpcError::ClientError(e) => matches!(
                e.kind(),
                ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_)
            ),
            RpcError::IoError(_) => true,
            _ => false,
        }
    }
}
