//! Contract operations driven by the CLI.
//!
//! Each operation acquires the accessor it needs from the gate, binds a fresh
//! contract handle, issues one remote call and folds the outcome into the
//! published [`UiStatus`]. Failures are logged and returned, never panicked.

use alloy::primitives::{Address, B256, U256};
use crypto_devs_contract_clients::{MINT_PRICE, RemoteCallError};
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use chain_args::RequiredNetwork;

use crate::contract::NftContract;
use crate::errors::{ConnectionError, OperationError};
use crate::gate::{ConnectionGate, WalletBackend};
use crate::notifier::Notifier;
use crate::status::UiStatus;

const MINT_SUCCESS_NOTICE: &str = "You successfully minted a Crypto Dev!";
const PRESALE_STARTED_NOTICE: &str = "Presale started!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Connect,
    PresaleMint,
    PublicMint,
    StartPresale,
    CheckPresaleStarted,
    CheckPresaleEnded,
    GetOwner,
    GetTokenIdsMinted,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Connect => "connect_wallet",
            OperationKind::PresaleMint => "presale_mint",
            OperationKind::PublicMint => "public_mint",
            OperationKind::StartPresale => "start_presale",
            OperationKind::CheckPresaleStarted => "check_if_presale_started",
            OperationKind::CheckPresaleEnded => "check_if_presale_ended",
            OperationKind::GetOwner => "get_owner",
            OperationKind::GetTokenIdsMinted => "get_token_ids_minted",
        };
        f.write_str(name)
    }
}

/// True once the on-chain end timestamp lies strictly in the past.
pub fn presale_has_ended(end: U256, now_secs: u64) -> bool {
    end < U256::from(now_secs)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

/// One minting session: the connection gate plus the status it drives.
pub struct Minter<W: WalletBackend> {
    gate: ConnectionGate<W>,
    contract_address: Address,
    notifier: Arc<dyn Notifier>,
    status: watch::Sender<UiStatus>,
    in_flight: Mutex<HashSet<OperationKind>>,
    pending_writes: AtomicUsize,
    clock: fn() -> u64,
}

impl<W: WalletBackend> Minter<W> {
    pub fn new(
        gate: ConnectionGate<W>,
        contract_address: Address,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (status, _) = watch::channel(UiStatus::default());
        Self {
            gate,
            contract_address,
            notifier,
            status,
            in_flight: Mutex::new(HashSet::new()),
            pending_writes: AtomicUsize::new(0),
            clock: unix_now,
        }
    }

    /// Replace the wall clock (unix seconds) used for the presale end check.
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<UiStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> UiStatus {
        self.status.borrow().clone()
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    pub fn network(&self) -> &RequiredNetwork {
        self.gate.network()
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    pub async fn connect_wallet(&self) -> Result<(), OperationError> {
        let result = self
            .gate
            .acquire_accessor(false)
            .await
            .map(|_| ())
            .map_err(OperationError::from);
        if result.is_ok() {
            self.status.send_modify(|status| status.wallet_connected = true);
            info!(network = %self.gate.network(), "Wallet connected");
        }
        report(OperationKind::Connect, result)
    }

    /// Mint during the presale, paying the mint price.
    pub async fn presale_mint(&self) -> Result<B256, OperationError> {
        let kind = OperationKind::PresaleMint;
        let result = self
            .submit(kind, |contract| async move {
                contract.presale_mint(MINT_PRICE).await
            })
            .await;
        if result.is_ok() {
            self.notifier.alert(MINT_SUCCESS_NOTICE);
        }
        report(kind, result)
    }

    /// Mint in the public sale, paying the mint price.
    pub async fn public_mint(&self) -> Result<B256, OperationError> {
        let kind = OperationKind::PublicMint;
        let result = self
            .submit(kind, |contract| async move { contract.mint(MINT_PRICE).await })
            .await;
        if result.is_ok() {
            self.notifier.alert(MINT_SUCCESS_NOTICE);
        }
        report(kind, result)
    }

    /// Open the presale, then re-read whether it is running.
    pub async fn start_presale(&self) -> Result<B256, OperationError> {
        let kind = OperationKind::StartPresale;
        let result = self
            .submit(kind, |contract| async move { contract.start_presale().await })
            .await;
        let tx_hash = report(kind, result)?;

        self.notifier.alert(PRESALE_STARTED_NOTICE);
        // Logged by the check itself
        let _ = self.check_if_presale_started().await;
        Ok(tx_hash)
    }

    /// Read whether the presale is running. When it is not, the owner check
    /// runs so the owner can be offered to start it. A session without a
    /// signer cannot be the owner, so the check is skipped there.
    pub async fn check_if_presale_started(&self) -> Result<bool, OperationError> {
        let kind = OperationKind::CheckPresaleStarted;
        let result = self
            .read(|contract| async move { contract.presale_started().await })
            .await;
        let started = report(kind, result)?;

        self.status
            .send_modify(|status| status.presale_started = started);
        if !started {
            if self.gate.has_signer() {
                let _ = self.get_owner().await;
            } else {
                debug!("Read-only session, skipping owner check");
            }
        }
        Ok(started)
    }

    pub async fn check_if_presale_ended(&self) -> Result<bool, OperationError> {
        let kind = OperationKind::CheckPresaleEnded;
        let result = self
            .read(|contract| async move { contract.presale_ended().await })
            .await;
        let end = report(kind, result)?;

        let now = (self.clock)();
        let ended = presale_has_ended(end, now);
        debug!(end = %end, now, ended, "Presale end checked");
        self.status.send_modify(|status| status.presale_ended = ended);
        Ok(ended)
    }

    /// Compare the contract owner with the session's signer.
    ///
    /// The owner is read with a read accessor; the write accessor is only used
    /// to learn the signer's address.
    pub async fn get_owner(&self) -> Result<bool, OperationError> {
        let kind = OperationKind::GetOwner;
        let result = async {
            let owner = self
                .read(|contract| async move { contract.owner().await })
                .await?;
            let accessor = self.gate.acquire_accessor(true).await?;
            let signer = accessor.signer().ok_or_else(|| {
                ConnectionError::Rejected("write accessor carries no signer".to_string())
            })?;
            Ok::<_, OperationError>(owner == signer)
        }
        .await;
        let is_owner = report(kind, result)?;

        self.status.send_modify(|status| status.is_owner = is_owner);
        Ok(is_owner)
    }

    pub async fn get_token_ids_minted(&self) -> Result<String, OperationError> {
        let kind = OperationKind::GetTokenIdsMinted;
        let result = self
            .read(|contract| async move { contract.token_ids().await })
            .await;
        let minted = report(kind, result)?.to_string();

        self.status
            .send_modify(|status| status.token_ids_minted = minted.clone());
        Ok(minted)
    }

    /// Page-load sequence. A failed connection ends it; later failures are
    /// logged and the remaining reads still run.
    pub async fn refresh(&self) -> Result<(), OperationError> {
        self.connect_wallet().await?;
        if let Ok(true) = self.check_if_presale_started().await {
            let _ = self.check_if_presale_ended().await;
        }
        let _ = self.get_token_ids_minted().await;
        Ok(())
    }

    /// One tick of the watch loop.
    pub async fn poll(&self) {
        if !self.status.borrow().presale_ended {
            if let Ok(true) = self.check_if_presale_started().await {
                let _ = self.check_if_presale_ended().await;
            }
        }
        let _ = self.get_token_ids_minted().await;
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    async fn read<T, F, Fut>(&self, call: F) -> Result<T, OperationError>
    where
        F: FnOnce(W::Contract) -> Fut,
        Fut: Future<Output = Result<T, RemoteCallError>>,
    {
        let accessor = self.gate.acquire_accessor(false).await?;
        let contract = self.gate.bind(self.contract_address, accessor);
        Ok(call(contract).await?)
    }

    /// Run a write with the in-flight guard held and loading raised until the
    /// receipt (or the failure) comes back.
    async fn submit<F, Fut>(&self, kind: OperationKind, call: F) -> Result<B256, OperationError>
    where
        F: FnOnce(W::Contract) -> Fut,
        Fut: Future<Output = Result<B256, RemoteCallError>>,
    {
        let _in_flight = InFlight::enter(&self.in_flight, kind)?;

        let accessor = self.gate.acquire_accessor(true).await?;
        let contract = self.gate.bind(self.contract_address, accessor);

        let _loading = LoadingGuard::start(&self.status, &self.pending_writes);
        let tx_hash = call(contract).await?;
        info!(operation = %kind, tx_hash = ?tx_hash, "Transaction confirmed");
        Ok(tx_hash)
    }
}

fn report<T>(kind: OperationKind, result: Result<T, OperationError>) -> Result<T, OperationError> {
    if let Err(e) = &result {
        warn!(operation = %kind, error = %e, "Operation failed");
    }
    result
}

/// Marks one write kind as running; a second entry of the same kind is Busy.
struct InFlight<'a> {
    running: &'a Mutex<HashSet<OperationKind>>,
    kind: OperationKind,
}

impl<'a> InFlight<'a> {
    fn enter(
        running: &'a Mutex<HashSet<OperationKind>>,
        kind: OperationKind,
    ) -> Result<Self, OperationError> {
        let inserted = running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind);
        if !inserted {
            return Err(OperationError::Busy(kind));
        }
        Ok(Self { running, kind })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.kind);
    }
}

/// Keeps `loading` raised while at least one write is pending.
struct LoadingGuard<'a> {
    status: &'a watch::Sender<UiStatus>,
    pending: &'a AtomicUsize,
}

impl<'a> LoadingGuard<'a> {
    fn start(status: &'a watch::Sender<UiStatus>, pending: &'a AtomicUsize) -> Self {
        status.send_modify(|status| {
            pending.fetch_add(1, Ordering::SeqCst);
            status.loading = true;
        });
        Self { status, pending }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let pending = self.pending;
        self.status.send_modify(|status| {
            let remaining = pending.fetch_sub(1, Ordering::SeqCst) - 1;
            status.loading = remaining > 0;
        });
    }
}
