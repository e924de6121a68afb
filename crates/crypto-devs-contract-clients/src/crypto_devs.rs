use crate::common::{errors::RemoteCallError, tx_submitter::TransactionSubmitter};
use alloy::{
    primitives::{Address, B256, U256},
    providers::Provider,
    sol,
};
use std::sync::Arc;
use tokio::sync::Mutex;

sol!(
    #[sol(rpc)]
    #[derive(Debug)]
    contract CryptoDevs {
        function presaleMint() public payable;
        function mint() public payable;
        function startPresale() public;

        function _presaleStarted() public view returns (bool);
        function presaleEnded() public view returns (uint256);
        function owner() public view returns (address);
        function tokenIds() public view returns (uint256);
    }
);

use CryptoDevs::CryptoDevsInstance;

/// Price of one Crypto Dev in both presale and public sale: 0.01 ETH in wei.
pub const MINT_PRICE: U256 = U256::from_limbs([10_000_000_000_000_000, 0, 0, 0]);

/// Typed handle on a deployed CryptoDevs contract.
///
/// Whether writes are possible is decided by how the handle was built: a
/// handle without a signer only answers view calls.
#[derive(Clone)]
pub struct CryptoDevsClient<P: Provider + Clone> {
    contract: CryptoDevsInstance<P>,
    submitter: TransactionSubmitter,
    signer: Option<Address>,
}

impl<P: Provider + Clone> CryptoDevsClient<P> {
    /// Read-only handle
    pub fn new(provider: P, address: Address, tx_lock: Arc<Mutex<()>>) -> Self {
        let contract = CryptoDevsInstance::new(address, provider);
        let submitter = TransactionSubmitter::new(tx_lock);
        Self {
            contract,
            submitter,
            signer: None,
        }
    }

    /// Allow writes signed by `signer`. The provider must carry that key.
    pub fn with_signer(mut self, signer: Address) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Get the contract address
    pub fn address(&self) -> Address {
        *self.contract.address()
    }

    pub fn signer(&self) -> Option<Address> {
        self.signer
    }

    fn require_signer(&self, method: &str) -> Result<Address, RemoteCallError> {
        self.signer
            .ok_or_else(|| RemoteCallError::read_only(method))
    }

    // ------------------------------------------------------------------------
    // Transactions
    // ------------------------------------------------------------------------

    /// Mint during the presale. Only whitelisted addresses succeed.
    pub async fn presale_mint(&self, value: U256) -> Result<B256, RemoteCallError> {
        let signer = self.require_signer("presaleMint")?;
        let call = self.contract.presaleMint().from(signer).value(value);
        self.submitter.invoke("presaleMint", call).await
    }

    /// Mint after the presale has ended.
    pub async fn mint(&self, value: U256) -> Result<B256, RemoteCallError> {
        let signer = self.require_signer("mint")?;
        let call = self.contract.mint().from(signer).value(value);
        self.submitter.invoke("mint", call).await
    }

    /// Open the presale (owner only).
    pub async fn start_presale(&self) -> Result<B256, RemoteCallError> {
        let signer = self.require_signer("startPresale")?;
        let call = self.contract.startPresale().from(signer);
        self.submitter.invoke("startPresale", call).await
    }

    // ------------------------------------------------------------------------
    // View Functions
    // ------------------------------------------------------------------------

    pub async fn presale_started(&self) -> Result<bool, RemoteCallError> {
        self.contract
            ._presaleStarted()
            .call()
            .await
            .map_err(|e| RemoteCallError::read("_presaleStarted", &e))
    }

    /// Unix timestamp (seconds) at which the presale ends. Zero until started.
    pub async fn presale_ended(&self) -> Result<U256, RemoteCallError> {
        self.contract
            .presaleEnded()
            .call()
            .await
            .map_err(|e| RemoteCallError::read("presaleEnded", &e))
    }

    pub async fn owner(&self) -> Result<Address, RemoteCallError> {
        self.contract
            .owner()
            .call()
            .await
            .map_err(|e| RemoteCallError::read("owner", &e))
    }

    /// Number of tokens minted so far
    pub async fn token_ids(&self) -> Result<U256, RemoteCallError> {
        self.contract
            .tokenIds()
            .call()
            .await
            .map_err(|e| RemoteCallError::read("tokenIds", &e))
    }
}
