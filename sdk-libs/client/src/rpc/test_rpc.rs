use std::{
    collections::HashMap,
    fmt::{Debug, Formatter},
};

use async_trait::async_trait;
use solana_program_test::ProgramTestContext;
use solana_sdk::{
    account::Account,
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    transaction::{Transaction, TransactionError},
};
use tokio::sync::Mutex;

use super::{RpcConnection, RpcError};

/// In-process connection backed by `solana-program-test`. Transactions are
/// executed on send; their results are kept so status lookups are
/// deterministic.
pub struct ProgramTestRpcConnection {
    context: Mutex<ProgramTestContext>,
    statuses: Mutex<HashMap<Signature, Result<(), TransactionError>>>,
}

impl Debug for ProgramTestRpcConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProgramTestRpcConnection")
    }
}

impl ProgramTestRpcConnection {
    pub fn new(context: ProgramTestContext) -> Self {
        Self {
            context: Mutex::new(context),
            statuses: Mutex::new(HashMap::new()),
        }
    }

    pub async fn payer(&self) -> Keypair {
        self.context.lock().await.payer.insecure_clone()
    }
}

#[async_trait]
impl RpcConnection for ProgramTestRpcConnection {
    fn get_url(&self) -> String {
        "program-test".to_string()
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, RpcError> {
        let mut context = self.context.lock().await;
        let rent = context.banks_client.get_rent().await?;
        Ok(rent.minimum_balance(data_len))
    }

    async fn get_account(&self, address: Pubkey) -> Result<Option<Account>, RpcError> {
        let mut context = self.context.lock().await;
        context
            .banks_client
            .get_account(address)
            .await
            .map_err(RpcError::from)
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError> {
        let mut context = self.context.lock().await;
        context
            .get_new_latest_blockhash()
            .await
            .map_err(RpcError::from)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, RpcError> {
        let signature = *transaction
            .signatures
            .first()
            .ok_or_else(|| RpcError::CustomError("Transaction is not signed".to_string()))?;
        let result = {
            let mut context = self.context.lock().await;
            context
                .banks_client
                .process_transaction_with_metadata(transaction.clone())
                .await?
        };
        self.statuses
            .lock()
            .await
            .insert(signature, result.result);
        Ok(signature)
    }

    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<Result<(), TransactionError>>, RpcError> {
        Ok(self.statuses.lock().await.get(signature).cloned())
    }
}
