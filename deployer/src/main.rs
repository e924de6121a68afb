use alloy::{
    network::EthereumWallet,
    providers::{Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};
use anyhow::{Context, Result, bail};
use args::{CliArgs, DeployConfig};
use clap::Parser;
use crypto_devs_contract_clients::{CONTRACT_ADDRESS_KEY, ContractArtifact, deploy_crypto_devs};
use settings_file::SettingsFile;
use term_table::row::Row;
use term_table::table_cell::{Alignment as CellAlignment, TableCell};
use term_table::{Table, TableStyle};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod args;

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

    let cli_args = CliArgs::parse();
    let config = DeployConfig::load(cli_args)?;

    let artifact = ContractArtifact::from_path(&config.artifact_path)?;
    if let Some(name) = &artifact.contract_name {
        info!(contract = %name, bytecode_len = artifact.bytecode.len(), "Artifact loaded");
    }

    let signer: PrivateKeySigner = config
        .private_key
        .parse()
        .context("Failed to parse private key")?;
    let deployer_address = signer.address();
    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect(&config.chain.rpc_url)
        .await
        .context("Failed to connect to RPC endpoint")?
        .erased();

    let chain_id = provider
        .get_chain_id()
        .await
        .context("Failed to get chain id")?;
    if chain_id != config.chain.network.chain_id {
        bail!(
            "Connected to chain id {chain_id}, expected {}. Change the network to {}",
            config.chain.network.chain_id,
            config.chain.network.name
        );
    }

    println!("-----------------------------------");
    println!("deploying contract .......");
    println!("-----------------------------------");

    let (address, tx_hash) = deploy_crypto_devs(
        &provider,
        &artifact,
        &config.metadata_url,
        config.whitelist_contract_address,
    )
    .await?;

    println!("Crypto Devs Contract Address: {address}");

    SettingsFile::new(&config.settings_file)
        .save_value(CONTRACT_ADDRESS_KEY, &address.to_string())
        .with_context(|| {
            format!(
                "Contract deployed at {address} but saving it to {} failed",
                config.settings_file.display()
            )
        })?;

    let mut table = Table::new();
    table.style = TableStyle::extended();
    table.add_row(Row::new(vec![
        TableCell::builder("🎉 CRYPTO DEVS DEPLOYED 🎉")
            .col_span(2)
            .alignment(CellAlignment::Center)
            .build(),
    ]));
    for (label, value) in [
        ("Contract", address.to_string()),
        ("Tx hash", format!("{tx_hash:?}")),
        ("Deployer", deployer_address.to_string()),
        ("Network", config.chain.network.to_string()),
        ("Saved to", format!("{} ({CONTRACT_ADDRESS_KEY})", config.settings_file.display())),
    ] {
        table.add_row(Row::new(vec![
            TableCell::builder(label)
                .alignment(CellAlignment::Right)
                .build(),
            TableCell::builder(value)
                .alignment(CellAlignment::Left)
                .build(),
        ]));
    }
    info!("\n{}", table.render());

    Ok(())
}
