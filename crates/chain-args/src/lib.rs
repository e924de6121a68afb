//! Chain connection arguments shared by the workspace binaries.
//!
//! Values resolve with priority: CLI/env -> settings file -> defaults.

use alloy::primitives::Address;
use anyhow::{Context, Result};
use clap::Args;
use settings_file::{DEFAULT_SETTINGS_FILE, SettingsFile};
use std::fmt;
use std::path::PathBuf;

/// Default RPC endpoint (local anvil/hardhat node)
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Chain id of the Goerli test network, the network the collection lives on
pub const GOERLI_CHAIN_ID: u64 = 5;

#[derive(Args, Debug, Clone)]
pub struct ChainArgs {
    /// Ethereum RPC endpoint (HTTP or WebSocket)
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Private key used to sign transactions
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// The only chain id this client is allowed to talk to
    #[arg(long, env = "CHAIN_ID")]
    pub chain_id: Option<u64>,

    /// Settings file consulted for values not given on the command line
    #[arg(long, env = "SETTINGS_FILE", default_value = DEFAULT_SETTINGS_FILE)]
    pub settings_file: PathBuf,
}

/// Chain settings with all values resolved
#[derive(Clone)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub private_key: Option<String>,
    pub network: RequiredNetwork,
}

impl fmt::Debug for ChainConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainConfig")
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .field("network", &self.network)
            .finish()
    }
}

impl ChainArgs {
    pub fn settings(&self) -> SettingsFile {
        SettingsFile::new(&self.settings_file)
    }

    pub fn resolve(&self, settings: &SettingsFile) -> Result<ChainConfig> {
        let rpc_url = self
            .rpc_url
            .clone()
            .or_else(|| settings.load_value("RPC_URL"))
            .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());

        let private_key = self
            .private_key
            .clone()
            .or_else(|| settings.load_value("PRIVATE_KEY"))
            .filter(|key| !key.trim().is_empty());

        let chain_id = match self.chain_id {
            Some(chain_id) => chain_id,
            None => match settings.load_value("CHAIN_ID") {
                Some(value) => value
                    .parse::<u64>()
                    .with_context(|| format!("invalid CHAIN_ID in settings file: {value}"))?,
                None => GOERLI_CHAIN_ID,
            },
        };

        Ok(ChainConfig {
            rpc_url,
            private_key,
            network: RequiredNetwork::from_chain_id(chain_id),
        })
    }
}

/// The single network a session may operate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredNetwork {
    pub chain_id: u64,
    pub name: String,
}

impl RequiredNetwork {
    pub fn from_chain_id(chain_id: u64) -> Self {
        let name = match chain_id {
            1 => "Ethereum Mainnet".to_string(),
            GOERLI_CHAIN_ID => "Goerli".to_string(),
            11155111 => "Sepolia".to_string(),
            31337 => "Anvil".to_string(),
            other => format!("chain {other}"),
        };
        Self { chain_id, name }
    }
}

impl Default for RequiredNetwork {
    fn default() -> Self {
        Self::from_chain_id(GOERLI_CHAIN_ID)
    }
}

impl fmt::Display for RequiredNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (chain id {})", self.name, self.chain_id)
    }
}

/// Resolve a required address: CLI/env value first, then the settings file.
pub fn resolve_address(
    cli_value: Option<&str>,
    settings: &SettingsFile,
    key: &str,
) -> Result<Address> {
    let value = cli_value
        .map(str::to_string)
        .or_else(|| settings.load_value(key))
        .with_context(|| format!("{key} is not set (pass it as an argument, env var or in the settings file)"))?;
    value
        .parse::<Address>()
        .with_context(|| format!("{key} is not a valid address: {value}"))
}
