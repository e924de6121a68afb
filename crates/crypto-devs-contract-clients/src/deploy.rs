//! Deployment of the CryptoDevs contract from a compiled artifact.

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, B256, Bytes},
    providers::Provider,
    rpc::types::TransactionRequest,
    sol_types::SolValue,
};
use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Settings key the deployed contract address is recorded under
pub const CONTRACT_ADDRESS_KEY: &str = "CRYPTO_DEVS_CONTRACT_ADDRESS";

/// Default location of the Hardhat artifact for the collection contract.
pub const DEFAULT_ARTIFACT_PATH: &str = "artifacts/contracts/CryptoDevs.sol/CryptoDevs.json";

/// The parts of a Hardhat or Foundry artifact needed to deploy.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    #[serde(default)]
    pub contract_name: Option<String>,
    #[serde(deserialize_with = "deserialize_bytecode")]
    pub bytecode: Bytes,
}

// Hardhat stores the creation code as a hex string, Foundry as `{ "object": "0x…" }`
#[derive(Deserialize)]
#[serde(untagged)]
enum BytecodeField {
    Hex(Bytes),
    Object { object: Bytes },
}

fn deserialize_bytecode<'de, D>(deserializer: D) -> Result<Bytes, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match BytecodeField::deserialize(deserializer)? {
        BytecodeField::Hex(bytes) | BytecodeField::Object { object: bytes } => bytes,
    })
}

impl ContractArtifact {
    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: Self = serde_json::from_str(json).context("failed to parse contract artifact")?;
        if artifact.bytecode.is_empty() {
            bail!("artifact has no creation bytecode (is the contract abstract?)");
        }
        Ok(artifact)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read contract artifact {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Creation code followed by the ABI-encoded constructor arguments
    /// `(string metadataURL, address whitelistContract)`.
    pub fn deploy_payload(&self, metadata_url: &str, whitelist: Address) -> Bytes {
        let args = (metadata_url.to_string(), whitelist).abi_encode_params();
        let mut code = Vec::with_capacity(self.bytecode.len() + args.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(&args);
        code.into()
    }
}

/// Deploy the contract and wait for it to be mined.
///
/// Returns the deployed address and the deployment transaction hash.
pub async fn deploy_crypto_devs<P: Provider>(
    provider: &P,
    artifact: &ContractArtifact,
    metadata_url: &str,
    whitelist: Address,
) -> Result<(Address, B256)> {
    let tx = TransactionRequest::default().with_deploy_code(artifact.deploy_payload(metadata_url, whitelist));

    let pending = provider
        .send_transaction(tx)
        .await
        .context("failed to send deployment transaction")?;
    info!(tx_hash = ?pending.tx_hash(), "Deployment submitted, waiting for receipt");

    let receipt = pending.get_receipt().await?;
    let tx_hash = receipt.transaction_hash;
    if !receipt.status() {
        bail!("deployment reverted on-chain. Tx hash: {tx_hash:?}");
    }
    let address = receipt
        .contract_address
        .ok_or_else(|| anyhow!("deployment receipt has no contract address. Tx hash: {tx_hash:?}"))?;

    info!(address = %address, tx_hash = ?tx_hash, gas_used = receipt.gas_used, "Contract deployed");
    Ok((address, tx_hash))
}
