//! In-memory wallet and contract used by the unit tests.

use alloy::primitives::{Address, B256, U256, address};
use async_trait::async_trait;
use crypto_devs_contract_clients::RemoteCallError;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

use crate::contract::NftContract;
use crate::errors::ConnectionError;
use crate::gate::{Accessor, WalletBackend};
use crate::notifier::Notifier;

pub const SIGNER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const OWNER: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

/// Pauses writes between submission and confirmation.
#[derive(Default)]
pub struct Hold {
    pub submitted: Notify,
    pub release: Notify,
}

/// Chain and contract state behind the fake wallet.
pub struct FakeState {
    pub chain_id: u64,
    pub has_signer: bool,
    pub unavailable: bool,
    pub connects: usize,
    pub chain_id_queries: usize,
    /// Remote calls issued, by ABI method name
    pub calls: Vec<String>,
    pub payments: Vec<U256>,
    pub presale_started: bool,
    pub presale_ended: U256,
    pub owner: Address,
    pub token_ids: U256,
    /// Reason every write reverts with, if set
    pub revert: Option<String>,
    pub hold: Option<Arc<Hold>>,
}

#[derive(Clone)]
pub struct FakeWallet {
    state: Arc<Mutex<FakeState>>,
}

impl FakeWallet {
    pub fn on_chain(chain_id: u64) -> Self {
        Self::new(chain_id, true)
    }

    pub fn read_only(chain_id: u64) -> Self {
        Self::new(chain_id, false)
    }

    fn new(chain_id: u64, has_signer: bool) -> Self {
        let state = FakeState {
            chain_id,
            has_signer,
            unavailable: false,
            connects: 0,
            chain_id_queries: 0,
            calls: Vec::new(),
            payments: Vec::new(),
            presale_started: false,
            presale_ended: U256::ZERO,
            owner: OWNER,
            token_ids: U256::ZERO,
            revert: None,
            hold: None,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn state_mut(&self) -> MutexGuard<'_, FakeState> {
        self.state()
    }

    /// Make every following write wait for `release`.
    pub fn hold(&self) -> Arc<Hold> {
        let hold = Arc::new(Hold::default());
        self.state().hold = Some(hold.clone());
        hold
    }
}

#[async_trait]
impl WalletBackend for FakeWallet {
    type Connection = ();
    type Provider = FakeWallet;
    type Contract = FakeContract;

    async fn connect(&self) -> Result<(), ConnectionError> {
        let mut state = self.state();
        if state.unavailable {
            return Err(ConnectionError::WalletUnavailable(
                "connection refused".to_string(),
            ));
        }
        state.connects += 1;
        Ok(())
    }

    async fn chain_id(&self, _connection: &()) -> Result<u64, ConnectionError> {
        let mut state = self.state();
        state.chain_id_queries += 1;
        Ok(state.chain_id)
    }

    fn reader(&self, _connection: &()) -> FakeWallet {
        self.clone()
    }

    fn writer(&self, _connection: &()) -> Result<(FakeWallet, Address), ConnectionError> {
        if self.state().has_signer {
            Ok((self.clone(), SIGNER))
        } else {
            Err(ConnectionError::Rejected(
                "no private key configured".to_string(),
            ))
        }
    }

    fn has_signer(&self, _connection: &()) -> bool {
        self.state().has_signer
    }

    fn bind(&self, _address: Address, accessor: Accessor<FakeWallet>) -> FakeContract {
        let signer = accessor.signer();
        let wallet = match accessor {
            Accessor::Read(provider) => provider,
            Accessor::Write { provider, .. } => provider,
        };
        FakeContract { wallet, signer }
    }
}

pub struct FakeContract {
    wallet: FakeWallet,
    signer: Option<Address>,
}

impl FakeContract {
    async fn write(
        &self,
        method: &str,
        value: Option<U256>,
        apply: impl FnOnce(&mut FakeState),
    ) -> Result<B256, RemoteCallError> {
        if self.signer.is_none() {
            return Err(RemoteCallError::ReadOnly {
                method: method.to_string(),
            });
        }

        let hold = {
            let mut state = self.wallet.state();
            state.calls.push(method.to_string());
            if let Some(reason) = state.revert.clone() {
                return Err(RemoteCallError::Reverted {
                    method: method.to_string(),
                    reason,
                });
            }
            state.hold.clone()
        };

        if let Some(hold) = hold {
            hold.submitted.notify_one();
            hold.release.notified().await;
        }

        let mut state = self.wallet.state();
        if let Some(value) = value {
            state.payments.push(value);
        }
        apply(&mut state);
        Ok(B256::with_last_byte(state.calls.len() as u8))
    }

    fn read<T>(&self, method: &str, get: impl FnOnce(&FakeState) -> T) -> T {
        let mut state = self.wallet.state();
        state.calls.push(method.to_string());
        get(&state)
    }
}

#[async_trait]
impl NftContract for FakeContract {
    async fn presale_mint(&self, value: U256) -> Result<B256, RemoteCallError> {
        self.write("presaleMint", Some(value), |state| {
            state.token_ids += U256::from(1)
        })
        .await
    }

    async fn mint(&self, value: U256) -> Result<B256, RemoteCallError> {
        self.write("mint", Some(value), |state| state.token_ids += U256::from(1))
            .await
    }

    async fn start_presale(&self) -> Result<B256, RemoteCallError> {
        self.write("startPresale", None, |state| state.presale_started = true)
            .await
    }

    async fn presale_started(&self) -> Result<bool, RemoteCallError> {
        Ok(self.read("_presaleStarted", |state| state.presale_started))
    }

    async fn presale_ended(&self) -> Result<U256, RemoteCallError> {
        Ok(self.read("presaleEnded", |state| state.presale_ended))
    }

    async fn owner(&self) -> Result<Address, RemoteCallError> {
        Ok(self.read("owner", |state| state.owner))
    }

    async fn token_ids(&self) -> Result<U256, RemoteCallError> {
        Ok(self.read("tokenIds", |state| state.token_ids))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
