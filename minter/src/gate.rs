//! Connection Gate: the single wallet session and the network guard in front
//! of every contract call.

use alloy::primitives::Address;
use async_trait::async_trait;
use chain_args::RequiredNetwork;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::contract::NftContract;
use crate::errors::ConnectionError;
use crate::notifier::Notifier;

/// Capability handed out by the gate.
#[derive(Debug, Clone)]
pub enum Accessor<P> {
    /// Query-only
    Read(P),
    /// Can authorize and submit transactions as `signer`
    Write { provider: P, signer: Address },
}

impl<P> Accessor<P> {
    pub fn signer(&self) -> Option<Address> {
        match self {
            Accessor::Read(_) => None,
            Accessor::Write { signer, .. } => Some(*signer),
        }
    }
}

/// Source of wallet connections and contract handles.
#[async_trait]
pub trait WalletBackend: Send + Sync {
    type Connection: Send + Sync;
    type Provider: Clone + Send + Sync;
    type Contract: NftContract;

    /// Open the wallet session. Called at most once per gate.
    async fn connect(&self) -> Result<Self::Connection, ConnectionError>;

    async fn chain_id(&self, connection: &Self::Connection) -> Result<u64, ConnectionError>;

    fn reader(&self, connection: &Self::Connection) -> Self::Provider;

    fn writer(
        &self,
        connection: &Self::Connection,
    ) -> Result<(Self::Provider, Address), ConnectionError>;

    /// Whether the session can hand out write accessors.
    fn has_signer(&self, connection: &Self::Connection) -> bool;

    /// Build a fresh typed contract handle whose capability is the accessor's.
    fn bind(&self, address: Address, accessor: Accessor<Self::Provider>) -> Self::Contract;
}

pub struct ConnectionGate<W: WalletBackend> {
    wallet: W,
    network: RequiredNetwork,
    connection: OnceCell<W::Connection>,
    notifier: Arc<dyn Notifier>,
}

impl<W: WalletBackend> ConnectionGate<W> {
    pub fn new(wallet: W, network: RequiredNetwork, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            wallet,
            network,
            connection: OnceCell::new(),
            notifier,
        }
    }

    pub fn network(&self) -> &RequiredNetwork {
        &self.network
    }

    /// Hand out a read or write accessor, connecting on first use.
    ///
    /// The chain id is checked on every call; on a mismatch the user is told to
    /// switch networks and nothing is returned.
    pub async fn acquire_accessor(
        &self,
        require_write: bool,
    ) -> Result<Accessor<W::Provider>, ConnectionError> {
        let connection = self
            .connection
            .get_or_try_init(|| async {
                info!(network = %self.network, "Connecting wallet");
                self.wallet.connect().await
            })
            .await?;

        let chain_id = self.wallet.chain_id(connection).await?;
        if chain_id != self.network.chain_id {
            warn!(
                expected = self.network.chain_id,
                actual = chain_id,
                "Wallet is connected to the wrong network"
            );
            self.notifier
                .alert(&format!("Change the network to {}", self.network.name));
            return Err(ConnectionError::WrongNetwork {
                expected: self.network.chain_id,
                actual: chain_id,
            });
        }

        if require_write {
            let (provider, signer) = self.wallet.writer(connection)?;
            debug!(signer = %signer, "Write accessor acquired");
            Ok(Accessor::Write { provider, signer })
        } else {
            Ok(Accessor::Read(self.wallet.reader(connection)))
        }
    }

    /// Whether an established session can sign. False before the first
    /// successful connection.
    pub fn has_signer(&self) -> bool {
        self.connection
            .get()
            .is_some_and(|connection| self.wallet.has_signer(connection))
    }

    pub fn bind(&self, address: Address, accessor: Accessor<W::Provider>) -> W::Contract {
        self.wallet.bind(address, accessor)
    }
}
