use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;
use crypto_devs_contract_clients::RemoteCallError;

/// The collection contract as seen through one accessor.
///
/// Write calls return the hash of the confirmed transaction.
#[async_trait]
pub trait NftContract: Send + Sync {
    async fn presale_mint(&self, value: U256) -> Result<B256, RemoteCallError>;
    async fn mint(&self, value: U256) -> Result<B256, RemoteCallError>;
    async fn start_presale(&self) -> Result<B256, RemoteCallError>;

    async fn presale_started(&self) -> Result<bool, RemoteCallError>;
    async fn presale_ended(&self) -> Result<U256, RemoteCallError>;
    async fn owner(&self) -> Result<Address, RemoteCallError>;
    async fn token_ids(&self) -> Result<U256, RemoteCallError>;
}
