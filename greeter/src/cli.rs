use std::fmt::{Debug, Formatter};

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one greeting and print the confirmed counter.
    Invoke(InvokeArgs),
    /// Print the current counter without sending anything.
    Show(ShowArgs),
    /// Print the greeting account address. No network access.
    Address(AccountArgs),
}

#[derive(Args, Clone)]
pub struct AccountArgs {
    #[arg(long, env = "GREETER_PROGRAM_ID")]
    pub program_id: String,

    /// Greeting account address. Takes precedence over `--seed`.
    #[arg(long, env = "GREETER_ACCOUNT")]
    pub account: Option<String>,

    /// Seed the account address is derived from, together with the payer.
    #[arg(long, env = "GREETER_SEED")]
    pub seed: Option<String>,

    /// Keypair file, or the secret key as a JSON byte array.
    /// Defaults to `$HOME/.config/solana/id.json`.
    #[arg(long, env = "GREETER_PAYER")]
    pub payer: Option<String>,
}

/// `payer` may hold the secret key itself, only a file path is printed.
impl Debug for AccountArgs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let payer = self.payer.as_deref().map(|payer| {
            if payer.trim_start().starts_with('[') {
                "<secret key>"
            } else {
                payer
            }
        });
        f.debug_struct("AccountArgs")
            .field("program_id", &self.program_id)
            .field("account", &self.account)
            .field("seed", &self.seed)
            .field("payer", &payer)
            .finish()
    }
}

#[derive(Args, Clone, Debug)]
pub struct NetworkArgs {
    #[arg(long, env = "GREETER_NETWORK", value_enum, default_value = "devnet")]
    pub network: Network,

    /// Overrides `--network`.
    #[arg(long, env = "GREETER_RPC_URL")]
    pub rpc_url: Option<String>,

    #[arg(long, env = "GREETER_COMMITMENT", value_enum, default_value = "confirmed")]
    pub commitment: Commitment,

    #[arg(long, env = "GREETER_MAX_RETRIES", default_value = "3")]
    pub max_retries: u32,

    #[arg(long, env = "GREETER_RETRY_DELAY", default_value = "1000")]
    pub retry_delay: u64,

    #[arg(long, env = "GREETER_RETRY_TIMEOUT", default_value = "30000")]
    pub retry_timeout: u64,
}

#[derive(Args, Clone, Debug)]
pub struct InvokeArgs {
    #[command(flatten)]
    pub account: AccountArgs,

    #[command(flatten)]
    pub network: NetworkArgs,

    /// Amount added to the counter.
    #[arg(long, env = "GREETER_COUNTER", default_value = "1")]
    pub counter: u64,

    /// Allocate the greeting account first if it does not exist yet.
    #[arg(long, env = "GREETER_CREATE_IF_MISSING")]
    pub create_if_missing: bool,

    #[arg(long, env = "GREETER_CONFIRM_TIMEOUT", default_value = "60")]
    pub confirm_timeout_secs: u64,

    #[arg(long, env = "GREETER_POLL_INTERVAL", default_value = "500")]
    pub poll_interval_ms: u64,
}

#[derive(Args, Clone, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub account: AccountArgs,

    #[command(flatten)]
    pub network: NetworkArgs,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
    Localnet,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}
