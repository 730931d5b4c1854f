use std::{fmt::Display, time::Duration};

use greeting_record::{GreetingRecord, InvocationPayload, RecordCodec, RecordError};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::{Transaction, TransactionError},
};
use thiserror::Error;
use tokio::{sync::oneshot, time::sleep};
use tracing::{debug, info, warn};

use crate::{
    address::{AccountTarget, AddressError},
    instruction::{create_greet_instruction, create_greeting_account_instruction},
    rpc::{RpcConnection, RpcError},
};

/// Network round trip a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AccountLookup,
    RentExemption,
    Blockhash,
    Submission,
    Confirmation,
    ReadBack,
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            Phase::AccountLookup => "account lookup",
            Phase::RentExemption => "rent exemption query",
            Phase::Blockhash => "blockhash query",
            Phase::Submission => "submission",
            Phase::Confirmation => "confirmation",
            Phase::ReadBack => "read-back",
        };
        write!(f, "{}", str)
    }
}

#[derive(Error, Debug)]
pub enum InvocationError {
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    #[error("Network error during {phase}: {source}")]
    Network {
        phase: Phase,
        #[source]
        source: RpcError,
    },

    #[error("Transaction rejected during {phase}: {error}")]
    Rejected {
        phase: Phase,
        error: TransactionError,
    },

    #[error("Greeting account {0} not found")]
    AccountNotFound(Pubkey),

    #[error("Greeting account {0} is missing and was given as a literal address, it can only be created from a seed")]
    CannotCreateLiteral(Pubkey),

    #[error("Seed base {0} must be the payer to create the greeting account")]
    BaseNotPayer(Pubkey),

    #[error("Greeting account {address} is owned by {owner}, expected {program_id}")]
    OwnerMismatch {
        address: Pubkey,
        owner: Pubkey,
        program_id: Pubkey,
    },

    #[error("Cancelled before the transaction was sent")]
    Cancelled,

    /// The transaction was broadcast but its fate is unknown. It may still
    /// land, resubmitting can apply the payload twice.
    #[error("Outcome of transaction {signature} is unknown: {reason}")]
    IndeterminateOutcome { signature: Signature, reason: String },
}

impl InvocationError {
    pub fn from_rpc(phase: Phase, error: RpcError) -> Self {
        match error.transaction_error() {
            Some(error) => InvocationError::Rejected { phase, error },
            None => InvocationError::Network {
                phase,
                source: error,
            },
        }
    }

    /// Whether the failed request had no side effect on chain, so running
    /// it again is safe.
    pub fn is_retryable_read(&self) -> bool {
        match self {
            InvocationError::Network { phase, .. } => matches!(
                phase,
                Phase::AccountLookup | Phase::RentExemption | Phase::Blockhash | Phase::ReadBack
            ),
            _ => false,
        }
    }
}

/// What to do about the greeting account before invoking the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountCreation {
    /// Look the account up and allocate it in the same transaction if absent.
    CreateIfMissing,
    /// Skip the lookup, the account was created by an earlier run.
    #[default]
    AssumeExists,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfirmationConfig {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InvocationRequest {
    pub program_id: Pubkey,
    pub target: AccountTarget,
    pub payload: InvocationPayload,
    pub creation: AccountCreation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationReport {
    pub address: Pubkey,
    pub signature: Signature,
    /// Whether this run allocated the greeting account.
    pub created: bool,
    /// Lamports funded into a newly created account.
    pub rent_lamports: Option<u64>,
    /// Record read back after confirmation.
    pub record: GreetingRecord,
}

/// Runs one invocation: resolve the account, optionally create it, submit
/// the greeting, wait for confirmation, read the record back.
#[derive(Debug)]
pub struct InvocationOrchestrator<'a, R: RpcConnection> {
    rpc: &'a R,
    confirmation: ConfirmationConfig,
}

impl<'a, R: RpcConnection> InvocationOrchestrator<'a, R> {
    pub fn new(rpc: &'a R) -> Self {
        Self {
            rpc,
            confirmation: ConfirmationConfig::default(),
        }
    }

    pub fn with_confirmation(mut self, confirmation: ConfirmationConfig) -> Self {
        self.confirmation = confirmation;
        self
    }

    pub async fn account_exists(&self, address: &Pubkey) -> Result<bool, InvocationError> {
        let account = self
            .rpc
            .get_account(*address)
            .await
            .map_err(|e| InvocationError::from_rpc(Phase::AccountLookup, e))?;
        Ok(account.is_some())
    }

    /// Reads and decodes the greeting record. A missing account is
    /// `AccountNotFound`, never a zero record.
    pub async fn fetch_record(&self, address: &Pubkey) -> Result<GreetingRecord, InvocationError> {
        let account = self
            .rpc
            .get_account(*address)
            .await
            .map_err(|e| InvocationError::from_rpc(Phase::ReadBack, e))?
            .ok_or(InvocationError::AccountNotFound(*address))?;
        Ok(GreetingRecord::decode(&account.data)?)
    }

    pub async fn invoke(
        &self,
        request: &InvocationRequest,
        payer: &Keypair,
    ) -> Result<InvocationReport, InvocationError> {
        let (_shutdown_sender, shutdown) = oneshot::channel();
        self.invoke_with_shutdown(request, payer, shutdown).await
    }

    /// Like `invoke`, a message on `shutdown` ends the run with `Cancelled`
    /// if nothing was sent yet, with `IndeterminateOutcome` otherwise.
    pub async fn invoke_with_shutdown(
        &self,
        request: &InvocationRequest,
        payer: &Keypair,
        shutdown: oneshot::Receiver<()>,
    ) -> Result<InvocationReport, InvocationError> {
        let mut shutdown = Some(shutdown);

        let (address, transaction, rent_lamports) = tokio::select! {
            biased;
            _ = shutdown_requested(&mut shutdown) => return Err(InvocationError::Cancelled),
            prepared = self.prepare_transaction(request, payer) => prepared?,
        };

        let signature = self.submit(&transaction).await?;
        info!("Sent greeting transaction {}", signature);

        self.wait_for_confirmation(&signature, &mut shutdown).await?;
        info!("Confirmed greeting transaction {}", signature);

        let record = self.fetch_record(&address).await?;
        Ok(InvocationReport {
            address,
            signature,
            created: rent_lamports.is_some(),
            rent_lamports,
            record,
        })
    }

    /// Everything up to the signed transaction. Nothing here reaches the
    /// cluster's ledger, so it can be abandoned at any point.
    async fn prepare_transaction(
        &self,
        request: &InvocationRequest,
        payer: &Keypair,
    ) -> Result<(Pubkey, Transaction, Option<u64>), InvocationError> {
        let address = request.target.resolve(&request.program_id)?;
        let greet_instruction =
            create_greet_instruction(&request.program_id, &address, &request.payload)?;
        debug!("Resolved greeting account {} from {}", address, request.target);

        let mut instructions = Vec::with_capacity(2);
        let rent_lamports = match request.creation {
            AccountCreation::AssumeExists => None,
            AccountCreation::CreateIfMissing => {
                self.prepare_account(request, &address, payer, &mut instructions)
                    .await?
            }
        };
        instructions.push(greet_instruction);

        let blockhash = self
            .rpc
            .get_latest_blockhash()
            .await
            .map_err(|e| InvocationError::from_rpc(Phase::Blockhash, e))?;
        let transaction = Transaction::new_signed_with_payer(
            &instructions,
            Some(&payer.pubkey()),
            &[payer],
            blockhash,
        );
        Ok((address, transaction, rent_lamports))
    }

    /// A transport failure after the request left may still have delivered
    /// the transaction, so it is indeterminate rather than a network error.
    async fn submit(&self, transaction: &Transaction) -> Result<Signature, InvocationError> {
        let signature = transaction.signatures[0];
        self.rpc
            .send_transaction(transaction)
            .await
            .map_err(|e| match e.transaction_error() {
                Some(error) => InvocationError::Rejected {
                    phase: Phase::Submission,
                    error,
                },
                None if e.is_transient() => {
                    warn!("Submission of {} failed in transit: {}", signature, e);
                    InvocationError::IndeterminateOutcome {
                        signature,
                        reason: format!("submission failed in transit: {}", e),
                    }
                }
                None => InvocationError::Network {
                    phase: Phase::Submission,
                    source: e,
                },
            })
    }

    /// Pushes an account creation instruction if the account is missing and
    /// returns the lamports it will be funded with.
    async fn prepare_account(
        &self,
        request: &InvocationRequest,
        address: &Pubkey,
        payer: &Keypair,
        instructions: &mut Vec<solana_sdk::instruction::Instruction>,
    ) -> Result<Option<u64>, InvocationError> {
        let account = self
            .rpc
            .get_account(*address)
            .await
            .map_err(|e| InvocationError::from_rpc(Phase::AccountLookup, e))?;
        if let Some(account) = account {
            if account.owner != request.program_id {
                return Err(InvocationError::OwnerMismatch {
                    address: *address,
                    owner: account.owner,
                    program_id: request.program_id,
                });
            }
            debug!("Greeting account {} already exists", address);
            return Ok(None);
        }

        let (base, seed) = request
            .target
            .seed()
            .ok_or(InvocationError::CannotCreateLiteral(*address))?;
        if *base != payer.pubkey() {
            return Err(InvocationError::BaseNotPayer(*base));
        }

        let lamports = self
            .rpc
            .get_minimum_balance_for_rent_exemption(GreetingRecord::size())
            .await
            .map_err(|e| InvocationError::from_rpc(Phase::RentExemption, e))?;
        info!(
            "Creating greeting account {} with {} lamports",
            address, lamports
        );
        instructions.push(create_greeting_account_instruction(
            &payer.pubkey(),
            base,
            seed,
            address,
            lamports,
            &request.program_id,
        ));
        Ok(Some(lamports))
    }

    async fn wait_for_confirmation(
        &self,
        signature: &Signature,
        shutdown: &mut Option<oneshot::Receiver<()>>,
    ) -> Result<(), InvocationError> {
        tokio::select! {
            result = tokio::time::timeout(self.confirmation.timeout, self.poll_signature_status(signature)) => {
                match result {
                    Ok(result) => result,
                    Err(_) => Err(InvocationError::IndeterminateOutcome {
                        signature: *signature,
                        reason: format!("not confirmed within {:?}", self.confirmation.timeout),
                    }),
                }
            }
            _ = shutdown_requested(shutdown) => Err(InvocationError::IndeterminateOutcome {
                signature: *signature,
                reason: "confirmation wait interrupted".to_string(),
            }),
        }
    }

    async fn poll_signature_status(&self, signature: &Signature) -> Result<(), InvocationError> {
        let mut poll_count = 0u32;
        loop {
            poll_count += 1;
            match self.rpc.get_signature_status(signature).await {
                Ok(Some(Ok(()))) => return Ok(()),
                Ok(Some(Err(error))) => {
                    return Err(InvocationError::Rejected {
                        phase: Phase::Confirmation,
                        error,
                    })
                }
                Ok(None) => debug!("Poll #{}: {} not confirmed yet", poll_count, signature),
                Err(e) => warn!(
                    "Poll #{}: failed to get status of {}: {}",
                    poll_count, signature, e
                ),
            }
            sleep(self.confirmation.poll_interval).await;
        }
    }
}

/// Resolves once a shutdown message arrives. A dropped sender means nobody
/// can interrupt the run, so the receiver is cleared and this never resolves.
async fn shutdown_requested(shutdown: &mut Option<oneshot::Receiver<()>>) {
    if let Some(receiver) = shutdown.as_mut() {
        let received = receiver.await.is_ok();
        *shutdown = None;
        if received {
            return;
        }
    }
    std::future::pending::<()>().await
}
