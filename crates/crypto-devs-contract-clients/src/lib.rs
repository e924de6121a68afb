pub mod common;
pub mod crypto_devs;
pub mod deploy;

// ============================================================================
// Re-exports
// ============================================================================

pub use common::errors::RemoteCallError;
pub use crypto_devs::{CryptoDevs, CryptoDevsClient, MINT_PRICE};
pub use deploy::{CONTRACT_ADDRESS_KEY, ContractArtifact, DEFAULT_ARTIFACT_PATH, deploy_crypto_devs};
