use std::{fmt::Display, str::FromStr};

use solana_sdk::pubkey::{Pubkey, PubkeyError, MAX_SEED_LEN};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid address literal `{literal}`: {reason}")]
    InvalidLiteral { literal: String, reason: String },

    #[error("Invalid seed `{seed}`: {error}")]
    InvalidSeed { seed: String, error: PubkeyError },
}

/// Derives the account address owned by `program_id` from `base` and
/// `seed`. No network access.
pub fn derive_address(
    base: &Pubkey,
    seed: &str,
    program_id: &Pubkey,
) -> Result<Pubkey, AddressError> {
    if seed.len() > MAX_SEED_LEN {
        return Err(AddressError::InvalidSeed {
            seed: seed.to_string(),
            error: PubkeyError::MaxSeedLengthExceeded,
        });
    }
    Pubkey::create_with_seed(base, seed, program_id).map_err(|error| AddressError::InvalidSeed {
        seed: seed.to_string(),
        error,
    })
}

/// Parses a base58 address literal.
pub fn address_from_literal(literal: &str) -> Result<Pubkey, AddressError> {
    Pubkey::from_str(literal.trim()).map_err(|e| AddressError::InvalidLiteral {
        literal: literal.to_string(),
        reason: e.to_string(),
    })
}

/// Where the greeting account lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountTarget {
    /// Address supplied as is. Cannot be created by the client.
    Literal(Pubkey),
    /// Address derived from the payer and a seed.
    Derived { base: Pubkey, seed: String },
}

impl AccountTarget {
    pub fn resolve(&self, program_id: &Pubkey) -> Result<Pubkey, AddressError> {
        match self {
            AccountTarget::Literal(address) => Ok(*address),
            AccountTarget::Derived { base, seed } => derive_address(base, seed, program_id),
        }
    }

    pub fn seed(&self) -> Option<(&Pubkey, &str)> {
        match self {
            AccountTarget::Literal(_) => None,
            AccountTarget::Derived { base, seed } => Some((base, seed.as_str())),
        }
    }
}

impl Display for AccountTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountTarget::Literal(address) => write!(f, "{}", address),
            AccountTarget::Derived { base, seed } => write!(f, "seed `{}` of {}", seed, base),
        }
    }
}
