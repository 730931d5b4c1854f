pub mod cli;
pub mod config;
pub mod errors;
pub mod telemetry;

use config::{AccountConfig, InvokeConfig, ShowConfig};
use errors::{ConfigError, GreeterError};
use greeting_client::{
    rpc::RpcConnection, GreetingRecord, InvocationOrchestrator, InvocationReport,
};
use solana_sdk::pubkey::Pubkey;
use tokio::sync::oneshot;
use tracing::info;

/// Sends one greeting. A message on `shutdown` abandons the run, see
/// `InvocationOrchestrator::invoke_with_shutdown`.
pub async fn run_invoke<R: RpcConnection>(
    rpc: &R,
    config: &InvokeConfig,
    shutdown: oneshot::Receiver<()>,
) -> Result<InvocationReport, GreeterError> {
    let request = config.request();
    info!(
        "Greeting {} via program {} on {} (counter {})",
        request.target,
        request.program_id,
        rpc.get_url(),
        request.payload.counter
    );
    let report = InvocationOrchestrator::new(rpc)
        .with_confirmation(config.confirmation)
        .invoke_with_shutdown(&request, &config.account.payer_keypair, shutdown)
        .await?;
    Ok(report)
}

pub async fn run_show<R: RpcConnection>(
    rpc: &R,
    config: &ShowConfig,
) -> Result<(Pubkey, GreetingRecord), GreeterError> {
    let address = resolve_address(&config.account)?;
    let record = InvocationOrchestrator::new(rpc)
        .fetch_record(&address)
        .await?;
    Ok((address, record))
}

pub fn resolve_address(config: &AccountConfig) -> Result<Pubkey, GreeterError> {
    config.address().map_err(|error| {
        GreeterError::Configuration(ConfigError::InvalidAddress {
            field: "account",
            error,
        })
    })
}

pub fn format_report(report: &InvocationReport) -> String {
    let mut lines = Vec::with_capacity(3);
    if let Some(lamports) = report.rent_lamports {
        lines.push(format!(
            "Created greeting account {} with {} lamports",
            report.address, lamports
        ));
    }
    lines.push(format!("Signature: {}", report.signature));
    lines.push(format!(
        "{} has been greeted {} time(s)",
        report.address, report.record.counter
    ));
    lines.join("\n")
}
