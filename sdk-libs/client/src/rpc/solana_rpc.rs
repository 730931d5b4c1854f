use std::{
    fmt::{Debug, Display, Formatter},
    time::Duration,
};

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::{Transaction, TransactionError},
};
use tokio::time::{sleep, Instant};
use tracing::warn;

use crate::rpc::{
    errors::RpcError,
    rpc_connection::{RpcConnection, RpcConnectionConfig},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolanaRpcUrl {
    Mainnet,
    Testnet,
    Devnet,
    Localnet,
    Custom(String),
}

impl Display for SolanaRpcUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            SolanaRpcUrl::Mainnet => "https://api.mainnet-beta.solana.com".to_string(),
            SolanaRpcUrl::Testnet => "https://api.testnet.solana.com".to_string(),
            SolanaRpcUrl::Devnet => "https://api.devnet.solana.com".to_string(),
            SolanaRpcUrl::Localnet => "http://localhost:8899".to_string(),
            SolanaRpcUrl::Custom(url) => url.clone(),
        };
        write!(f, "{}", str)
    }
}

/// Retries apply to read-only requests only. Broadcasting is never
/// repeated by the connection.
#[derive(Clone, Debug, Copy)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            timeout: Duration::from_secs(30),
        }
    }
}

pub struct SolanaRpcConnection {
    pub client: RpcClient,
    pub retry_config: RetryConfig,
}

impl Debug for SolanaRpcConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolanaRpcConnection {{ client: {:?} }}",
            self.client.url()
        )
    }
}

impl SolanaRpcConnection {
    pub fn new(config: RpcConnectionConfig) -> Self {
        Self::new_with_retry(config, None)
    }

    pub fn new_with_retry(config: RpcConnectionConfig, retry_config: Option<RetryConfig>) -> Self {
        let commitment_config = config
            .commitment_config
            .unwrap_or(CommitmentConfig::confirmed());
        let client = RpcClient::new_with_commitment(config.url, commitment_config);
        let retry_config = retry_config.unwrap_or_default();
        Self {
            client,
            retry_config,
        }
    }

    async fn retry<F, Fut, T>(&self, operation: F) -> Result<T, RpcError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, RpcError>>,
    {
        let mut attempts = 0;
        let start_time = Instant::now();
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !e.is_transient() {
                        return Err(e);
                    }
                    attempts += 1;
                    if attempts >= self.retry_config.max_retries
                        || start_time.elapsed() >= self.retry_config.timeout
                    {
                        return Err(e);
                    }
                    warn!(
                        "Operation failed, retrying in {:?} (attempt {}/{}): {:?}",
                        self.retry_config.retry_delay,
                        attempts,
                        self.retry_config.max_retries,
                        e
                    );
                    sleep(self.retry_config.retry_delay).await;
                }
            }
        }
    }
}

#[async_trait]
impl RpcConnection for SolanaRpcConnection {
    fn get_url(&self) -> String {
        self.client.url()
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, RpcError> {
        self.retry(|| async {
            self.client
                .get_minimum_balance_for_rent_exemption(data_len)
                .await
                .map_err(RpcError::from)
        })
        .await
    }

    async fn get_account(&self, address: Pubkey) -> Result<Option<Account>, RpcError> {
        self.retry(|| async {
            self.client
                .get_account_with_commitment(&address, self.client.commitment())
                .await
                .map(|response| response.value)
                .map_err(RpcError::from)
        })
        .await
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError> {
        self.retry(|| async {
            self.client
                .get_latest_blockhash_with_commitment(CommitmentConfig::confirmed())
                .await
                .map(|(hash, _)| hash)
                .map_err(RpcError::from)
        })
        .await
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, RpcError> {
        self.client
            .send_transaction(transaction)
            .await
            .map_err(RpcError::from)
    }

    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<Result<(), TransactionError>>, RpcError> {
        self.retry(|| async {
            self.client
                .get_signature_status_with_commitment(signature, self.client.commitment())
                .await
                .map_err(RpcError::from)
        })
        .await
    }
}
