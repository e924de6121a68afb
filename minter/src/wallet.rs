use alloy::{
    network::EthereumWallet,
    primitives::{Address, B256, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};
use async_trait::async_trait;
use crypto_devs_contract_clients::{CryptoDevsClient, RemoteCallError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::contract::NftContract;
use crate::errors::ConnectionError;
use crate::gate::{Accessor, WalletBackend};

/// Wallet backed by an RPC endpoint and an optional local private key.
pub struct RpcWallet {
    rpc_url: String,
    private_key: Option<String>,
    tx_lock: Arc<Mutex<()>>,
}

/// Open session: a plain provider for reads and, with a key, a signing one.
pub struct RpcConnection {
    reader: DynProvider,
    writer: Option<(DynProvider, Address)>,
}

impl RpcWallet {
    pub fn new(rpc_url: String, private_key: Option<String>) -> Self {
        Self {
            rpc_url,
            private_key,
            tx_lock: Arc::new(Mutex::new(())),
        }
    }
}

#[async_trait]
impl WalletBackend for RpcWallet {
    type Connection = RpcConnection;
    type Provider = DynProvider;
    type Contract = CryptoDevsClient<DynProvider>;

    async fn connect(&self) -> Result<RpcConnection, ConnectionError> {
        let reader = ProviderBuilder::new()
            .connect(&self.rpc_url)
            .await
            .map_err(|e| ConnectionError::WalletUnavailable(e.to_string()))?
            .erased();

        let writer = match &self.private_key {
            Some(private_key) => {
                let signer: PrivateKeySigner = private_key
                    .parse()
                    .map_err(|_| ConnectionError::Rejected("invalid private key".to_string()))?;
                let address = signer.address();
                let provider = ProviderBuilder::new()
                    .wallet(EthereumWallet::from(signer))
                    .connect(&self.rpc_url)
                    .await
                    .map_err(|e| ConnectionError::WalletUnavailable(e.to_string()))?
                    .erased();
                info!(signer = %address, "Signing key loaded");
                Some((provider, address))
            }
            None => {
                info!("No private key configured, session is read-only");
                None
            }
        };

        debug!(rpc_url = %self.rpc_url, "RPC transport connected");
        Ok(RpcConnection { reader, writer })
    }

    async fn chain_id(&self, connection: &RpcConnection) -> Result<u64, ConnectionError> {
        connection
            .reader
            .get_chain_id()
            .await
            .map_err(|e| ConnectionError::WalletUnavailable(e.to_string()))
    }

    fn reader(&self, connection: &RpcConnection) -> DynProvider {
        connection.reader.clone()
    }

    fn writer(&self, connection: &RpcConnection) -> Result<(DynProvider, Address), ConnectionError> {
        connection.writer.clone().ok_or_else(|| {
            ConnectionError::Rejected("a private key is required to sign transactions".to_string())
        })
    }

    fn has_signer(&self, connection: &RpcConnection) -> bool {
        connection.writer.is_some()
    }

    fn bind(&self, address: Address, accessor: Accessor<DynProvider>) -> CryptoDevsClient<DynProvider> {
        match accessor {
            Accessor::Read(provider) => CryptoDevsClient::new(provider, address, self.tx_lock.clone()),
            Accessor::Write { provider, signer } => {
                CryptoDevsClient::new(provider, address, self.tx_lock.clone()).with_signer(signer)
            }
        }
    }
}

#[async_trait]
impl NftContract for CryptoDevsClient<DynProvider> {
    async fn presale_mint(&self, value: U256) -> Result<B256, RemoteCallError> {
        CryptoDevsClient::presale_mint(self, value).await
    }

    async fn mint(&self, value: U256) -> Result<B256, RemoteCallError> {
        CryptoDevsClient::mint(self, value).await
    }

    async fn start_presale(&self) -> Result<B256, RemoteCallError> {
        CryptoDevsClient::start_presale(self).await
    }

    async fn presale_started(&self) -> Result<bool, RemoteCallError> {
        CryptoDevsClient::presale_started(self).await
    }

    async fn presale_ended(&self) -> Result<U256, RemoteCallError> {
        CryptoDevsClient::presale_ended(self).await
    }

    async fn owner(&self) -> Result<Address, RemoteCallError> {
        CryptoDevsClient::owner(self).await
    }

    async fn token_ids(&self) -> Result<U256, RemoteCallError> {
        CryptoDevsClient::token_ids(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::ConnectionGate;
    use crate::notifier::LogNotifier;
    use crate::operations::Minter;
    use chain_args::RequiredNetwork;
    use std::env;

    #[tokio::test]
    async fn test_invalid_private_key_is_rejected() {
        let wallet = RpcWallet::new(
            "http://127.0.0.1:1".to_string(),
            Some("not a key".to_string()),
        );
        // HTTP transports connect lazily, so only the key parse can fail here
        let err = wallet.connect().await.err().unwrap();
        assert!(matches!(err, ConnectionError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_unreachable_node_is_unavailable() {
        let wallet = RpcWallet::new("http://127.0.0.1:1".to_string(), None);
        let connection = wallet.connect().await.unwrap();
        let err = wallet.chain_id(&connection).await.unwrap_err();
        assert!(matches!(err, ConnectionError::WalletUnavailable(_)));
        assert!(matches!(
            wallet.writer(&connection),
            Err(ConnectionError::Rejected(_))
        ));
    }

    // Note: requires a local node (anvil) with a deployed CryptoDevs contract
    #[tokio::test]
    #[ignore] // Requires a running Ethereum node
    async fn test_refresh_against_node() -> Result<(), Box<dyn std::error::Error>> {
        let rpc_url = env::var("TEST_RPC_URL").unwrap_or_else(|_| "http://127.0.0.1:8545".to_string());
        let private_key = env::var("TEST_PRIVATE_KEY")?;
        let address: Address = env::var("TEST_CONTRACT_ADDRESS")?.parse()?;

        let wallet = RpcWallet::new(rpc_url, Some(private_key));
        let notifier = Arc::new(LogNotifier);
        let gate = ConnectionGate::new(wallet, RequiredNetwork::from_chain_id(31337), notifier.clone());
        let minter = Minter::new(gate, address, notifier);

        minter.refresh().await?;
        let status = minter.status();
        assert!(status.wallet_connected);
        assert!(!status.loading);

        Ok(())
    }
}
