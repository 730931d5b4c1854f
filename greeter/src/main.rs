use anyhow::Result;
use clap::Parser;
use greeter::{
    cli::{Cli, Commands},
    config::{AccountConfig, InvokeConfig, ShowConfig},
    format_report, resolve_address, run_invoke, run_show,
    telemetry::setup_telemetry,
};
use greeting_client::rpc::SolanaRpcConnection;
use tokio::sync::oneshot;
use tracing::{debug, warn};

#[tokio::main]
async fn main() -> Result<()> {
    setup_telemetry();

    let cli = Cli::parse();
    debug!("Command: {:?}", cli.command);

    match &cli.command {
        Commands::Invoke(args) => {
            let config = InvokeConfig::new(args)?;
            let rpc = SolanaRpcConnection::new_with_retry(
                config.network.rpc.clone(),
                Some(config.network.retry_config),
            );

            let (shutdown_sender, shutdown_receiver) = oneshot::channel();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Received Ctrl-C, abandoning the run");
                    let _ = shutdown_sender.send(());
                }
            });

            let report = run_invoke(&rpc, &config, shutdown_receiver).await?;
            println!("{}", format_report(&report));
        }
        Commands::Show(args) => {
            let config = ShowConfig::new(args)?;
            let rpc = SolanaRpcConnection::new_with_retry(
                config.network.rpc.clone(),
                Some(config.network.retry_config),
            );
            let (address, record) = run_show(&rpc, &config).await?;
            println!("{} has been greeted {} time(s)", address, record.counter);
        }
        Commands::Address(args) => {
            let config = AccountConfig::new(args)?;
            println!("{}", resolve_address(&config)?);
        }
    }
    Ok(())
}
