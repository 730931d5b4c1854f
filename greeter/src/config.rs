use std::{env, path::PathBuf, time::Duration};

use greeting_client::{
    address_from_literal,
    rpc::{RetryConfig, RpcConnectionConfig, SolanaRpcUrl},
    AccountCreation, AccountTarget, AddressError, ConfirmationConfig, InvocationPayload,
    InvocationRequest,
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair, Signer},
};

use crate::{
    cli::{AccountArgs, Commitment, InvokeArgs, Network, NetworkArgs, ShowArgs},
    errors::ConfigError,
};

pub const DEFAULT_SEED: &str = "hello 123";

#[derive(Debug)]
pub struct AccountConfig {
    pub program_id: Pubkey,
    pub target: AccountTarget,
    pub payer_keypair: Keypair,
}

#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub rpc: RpcConnectionConfig,
    pub retry_config: RetryConfig,
}

#[derive(Debug)]
pub struct InvokeConfig {
    pub account: AccountConfig,
    pub network: NetworkConfig,
    pub payload: InvocationPayload,
    pub creation: AccountCreation,
    pub confirmation: ConfirmationConfig,
}

#[derive(Debug)]
pub struct ShowConfig {
    pub account: AccountConfig,
    pub network: NetworkConfig,
}

impl AccountConfig {
    pub fn new(args: &AccountArgs) -> Result<Self, ConfigError> {
        let program_id = address_from_literal(&args.program_id).map_err(|error| {
            ConfigError::InvalidAddress {
                field: "program_id",
                error,
            }
        })?;
        let payer_keypair = load_payer(args.payer.as_deref())?;

        let target = match &args.account {
            Some(account) => {
                AccountTarget::Literal(address_from_literal(account).map_err(|error| {
                    ConfigError::InvalidAddress {
                        field: "account",
                        error,
                    }
                })?)
            }
            None => AccountTarget::Derived {
                base: payer_keypair.pubkey(),
                seed: args
                    .seed
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SEED.to_string()),
            },
        };
        target
            .resolve(&program_id)
            .map_err(|error| ConfigError::InvalidAddress {
                field: "seed",
                error,
            })?;

        Ok(Self {
            program_id,
            target,
            payer_keypair,
        })
    }

    pub fn address(&self) -> Result<Pubkey, AddressError> {
        self.target.resolve(&self.program_id)
    }
}

impl NetworkConfig {
    pub fn new(args: &NetworkArgs) -> Self {
        let url = match &args.rpc_url {
            Some(url) => SolanaRpcUrl::Custom(url.clone()),
            None => match args.network {
                Network::Mainnet => SolanaRpcUrl::Mainnet,
                Network::Testnet => SolanaRpcUrl::Testnet,
                Network::Devnet => SolanaRpcUrl::Devnet,
                Network::Localnet => SolanaRpcUrl::Localnet,
            },
        };
        let commitment_config = match args.commitment {
            Commitment::Processed => CommitmentConfig::processed(),
            Commitment::Confirmed => CommitmentConfig::confirmed(),
            Commitment::Finalized => CommitmentConfig::finalized(),
        };
        Self {
            rpc: RpcConnectionConfig {
                url: url.to_string(),
                commitment_config: Some(commitment_config),
            },
            retry_config: RetryConfig {
                max_retries: args.max_retries,
                retry_delay: Duration::from_millis(args.retry_delay),
                timeout: Duration::from_millis(args.retry_timeout),
            },
        }
    }
}

impl InvokeConfig {
    pub fn new(args: &InvokeArgs) -> Result<Self, ConfigError> {
        let payload = InvocationPayload::try_from(args.counter)?;
        let creation = if args.create_if_missing {
            AccountCreation::CreateIfMissing
        } else {
            AccountCreation::AssumeExists
        };
        Ok(Self {
            account: AccountConfig::new(&args.account)?,
            network: NetworkConfig::new(&args.network),
            payload,
            creation,
            confirmation: ConfirmationConfig {
                timeout: Duration::from_secs(args.confirm_timeout_secs),
                poll_interval: Duration::from_millis(args.poll_interval_ms),
            },
        })
    }

    pub fn request(&self) -> InvocationRequest {
        InvocationRequest {
            program_id: self.account.program_id,
            target: self.account.target.clone(),
            payload: self.payload,
            creation: self.creation,
        }
    }
}

impl ShowConfig {
    pub fn new(args: &ShowArgs) -> Result<Self, ConfigError> {
        Ok(Self {
            account: AccountConfig::new(&args.account)?,
            network: NetworkConfig::new(&args.network),
        })
    }
}

/// Loads the payer from a JSON byte array or a keypair file.
pub fn load_payer(payer: Option<&str>) -> Result<Keypair, ConfigError> {
    let path = match payer.map(str::trim) {
        Some(json) if json.starts_with('[') => {
            let bytes: Vec<u8> = serde_json::from_str(json)
                .map_err(|e| ConfigError::InvalidKeypair(e.to_string()))?;
            return Keypair::from_bytes(&bytes)
                .map_err(|e| ConfigError::InvalidKeypair(e.to_string()));
        }
        Some(path) => PathBuf::from(path),
        None => default_keypair_path()?,
    };
    read_keypair_file(&path)
        .map_err(|e| ConfigError::InvalidKeypair(format!("{}: {}", path.display(), e)))
}

fn default_keypair_path() -> Result<PathBuf, ConfigError> {
    let home = env::var_os("HOME").ok_or(ConfigError::MissingField { field: "payer" })?;
    Ok(PathBuf::from(home).join(".config/solana/id.json"))
}
