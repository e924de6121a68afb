use alloy::primitives::Address;
use anyhow::Result;
use chain_args::{ChainArgs, ChainConfig, resolve_address};
use clap::{Parser, Subcommand};
use crypto_devs_contract_clients::CONTRACT_ADDRESS_KEY;
use std::time::Duration;
use tracing::info;

/// CLI arguments for the minter
#[derive(Parser, Debug)]
#[command(name = "minter")]
#[command(about = "Crypto Devs minter - connect, check the presale, and mint", long_about = None)]
pub struct CliArgs {
    #[command(flatten)]
    pub chain: ChainArgs,

    /// Deployed CryptoDevs contract address
    #[arg(long, env = CONTRACT_ADDRESS_KEY)]
    pub contract_address: Option<String>,

    /// Print the final status as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Connect the wallet and check the network
    Connect,
    /// Mint during the presale (whitelisted addresses only)
    PresaleMint,
    /// Mint in the public sale
    Mint,
    /// Start the presale (owner only)
    StartPresale,
    /// Check whether the presale has started
    PresaleStarted,
    /// Check whether the presale has ended
    PresaleEnded,
    /// Check whether the signer owns the contract
    Owner,
    /// Show how many tokens have been minted
    TokenIds,
    /// Run the page-load sequence and show the status
    Status,
    /// Keep the status fresh until interrupted
    Watch {
        /// Seconds between refreshes
        #[arg(long, env = "WATCH_INTERVAL_SECS", default_value_t = 5)]
        interval_secs: u64,
    },
}

/// Minter configuration with all required values resolved
#[derive(Debug, Clone)]
pub struct MinterConfig {
    pub chain: ChainConfig,
    pub contract_address: Address,
    pub json: bool,
    pub command: Command,
}

impl MinterConfig {
    /// Load configuration with priority: CLI/env -> settings file -> defaults
    pub fn load(args: CliArgs) -> Result<Self> {
        let settings = args.chain.settings();
        let chain = args.chain.resolve(&settings)?;
        let contract_address = resolve_address(
            args.contract_address.as_deref(),
            &settings,
            CONTRACT_ADDRESS_KEY,
        )?;

        info!(
            "Loaded MinterConfig: rpc_url={}, network={}, contract_address={contract_address}, signer_configured={}",
            chain.rpc_url,
            chain.network,
            chain.private_key.is_some()
        );

        Ok(Self {
            chain,
            contract_address,
            json: args.json,
            command: args.command,
        })
    }
}

impl Command {
    pub fn watch_interval(&self) -> Option<Duration> {
        match self {
            Command::Watch { interval_secs } => Some(Duration::from_secs((*interval_secs).max(1))),
            _ => None,
        }
    }
}
