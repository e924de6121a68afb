use anyhow::Result;
use args::{CliArgs, MinterConfig};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::gate::ConnectionGate;
use crate::notifier::{LogNotifier, Notifier};
use crate::operations::Minter;
use crate::status::UiStatus;
use crate::wallet::RpcWallet;

mod args;
mod commands;
mod contract;
mod errors;
mod gate;
mod notifier;
mod operations;
mod render;
mod shutdown;
mod status;
#[cfg(test)]
mod testing;
mod wallet;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy()
        .add_directive("alloy=warn".parse()?)
        .add_directive("hyper_util=warn".parse()?);

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(true))
        .with(filter)
        .init();

    // Load configuration
    let cli_args = CliArgs::parse();
    let config = MinterConfig::load(cli_args)?;

    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
    let wallet = RpcWallet::new(config.chain.rpc_url.clone(), config.chain.private_key.clone());
    let gate = ConnectionGate::new(wallet, config.chain.network.clone(), notifier.clone());
    let minter = Minter::new(gate, config.contract_address, notifier);

    if let Some(interval) = config.command.watch_interval() {
        watch(&minter, interval, config.json).await?;
        return Ok(());
    }

    commands::run_once(&minter, &config.command).await;
    print_status(&minter, &minter.status(), config.json)?;
    Ok(())
}

/// Refresh once, then poll every `interval` until a shutdown signal arrives,
/// printing the status whenever it changes.
async fn watch(minter: &Minter<RpcWallet>, interval: Duration, json: bool) -> Result<()> {
    let shutdown_token = CancellationToken::new();
    let shutdown_token_clone = shutdown_token.clone();
    tokio::spawn(async move {
        shutdown::shutdown_signal(shutdown_token_clone).await;
    });

    let mut updates = minter.subscribe();
    if minter.refresh().await.is_err() {
        print_status(minter, &minter.status(), json)?;
        return Ok(());
    }
    print_status(minter, &updates.borrow_and_update().clone(), json)?;

    info!(interval_secs = interval.as_secs(), "Watching status, press Ctrl+C to stop");
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = shutdown_token.cancelled() => break,
            _ = ticker.tick() => minter.poll().await,
        }
        if updates.has_changed().unwrap_or(false) {
            let status = updates.borrow_and_update().clone();
            print_status(minter, &status, json)?;
        }
    }

    info!("Shutdown complete");
    Ok(())
}

fn print_status(minter: &Minter<RpcWallet>, status: &UiStatus, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(status)?);
    } else {
        println!(
            "{}",
            render::status_table(status, minter.network(), minter.contract_address())
        );
    }
    Ok(())
}
