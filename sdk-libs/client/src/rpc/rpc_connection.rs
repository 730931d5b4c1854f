use std::fmt::Debug;

use async_trait::async_trait;
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::{Transaction, TransactionError},
};

use crate::rpc::errors::RpcError;

#[derive(Debug, Clone)]
pub struct RpcConnectionConfig {
    pub url: String,
    pub commitment_config: Option<CommitmentConfig>,
}

impl RpcConnectionConfig {
    pub fn new<U: ToString>(url: U) -> Self {
        Self {
            url: url.to_string(),
            commitment_config: None,
        }
    }
}

/// Transport the invocation workflow runs on.
#[async_trait]
pub trait RpcConnection: Send + Sync + Debug + 'static {
    fn get_url(&self) -> String;

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, RpcError>;

    async fn get_account(&self, address: Pubkey) -> Result<Option<Account>, RpcError>;

    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError>;

    /// Broadcasts a signed transaction. Returns once the cluster accepted
    /// it, not once it is confirmed.
    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, RpcError>;

    /// `None` while the signature is unknown or not yet at the configured
    /// commitment, otherwise the execution result.
    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<Result<(), TransactionError>>, RpcError>;
}
