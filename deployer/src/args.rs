use alloy::primitives::Address;
use anyhow::{Context, Result};
use chain_args::{ChainArgs, ChainConfig, resolve_address};
use clap::Parser;
use crypto_devs_contract_clients::DEFAULT_ARTIFACT_PATH;
use settings_file::SettingsFile;
use std::path::PathBuf;
use tracing::info;

/// CLI arguments for the deployer
#[derive(Parser, Debug)]
#[command(name = "deployer")]
#[command(about = "Deploy the Crypto Devs NFT contract", long_about = None)]
pub struct CliArgs {
    #[command(flatten)]
    pub chain: ChainArgs,

    /// Address of the previously deployed whitelist contract
    #[arg(long, env = "WHITELIST_CONTRACT_ADDRESS")]
    pub whitelist_contract_address: Option<String>,

    /// Base URL the token metadata is served from
    #[arg(long, env = "METADATA_URL")]
    pub metadata_url: Option<String>,

    /// Compiled contract artifact (Hardhat or Foundry JSON)
    #[arg(long, env = "ARTIFACT_PATH", default_value = DEFAULT_ARTIFACT_PATH)]
    pub artifact_path: PathBuf,
}

/// Deployer configuration with all required values resolved
#[derive(Clone)]
pub struct DeployConfig {
    pub chain: ChainConfig,
    pub private_key: String,
    pub whitelist_contract_address: Address,
    pub metadata_url: String,
    pub artifact_path: PathBuf,
    pub settings_file: PathBuf,
}

impl DeployConfig {
    /// Load configuration with priority: CLI/env -> settings file -> defaults
    pub fn load(args: CliArgs) -> Result<Self> {
        let settings = args.chain.settings();
        let chain = args.chain.resolve(&settings)?;

        let private_key = chain
            .private_key
            .clone()
            .context("PRIVATE_KEY is required to deploy")?;
        let whitelist_contract_address = resolve_address(
            args.whitelist_contract_address.as_deref(),
            &settings,
            "WHITELIST_CONTRACT_ADDRESS",
        )?;
        let metadata_url = resolve_metadata_url(args.metadata_url, &settings)?;

        info!(
            "Loaded DeployConfig: rpc_url={}, network={}, whitelist={whitelist_contract_address}, metadata_url={metadata_url}, artifact={}",
            chain.rpc_url,
            chain.network,
            args.artifact_path.display()
        );

        Ok(Self {
            chain,
            private_key,
            whitelist_contract_address,
            metadata_url,
            artifact_path: args.artifact_path,
            settings_file: settings.path().to_path_buf(),
        })
    }
}

fn resolve_metadata_url(cli_value: Option<String>, settings: &SettingsFile) -> Result<String> {
    cli_value
        .or_else(|| settings.load_value("METADATA_URL"))
        .filter(|url| !url.trim().is_empty())
        .context("METADATA_URL is not set (pass it as an argument, env var or in the settings file)")
}
