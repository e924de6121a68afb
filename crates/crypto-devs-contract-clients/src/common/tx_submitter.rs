use alloy::{
    contract::{CallBuilder, CallDecoder},
    primitives::B256,
    providers::Provider,
    rpc::types::TransactionReceipt,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::errors::RemoteCallError;

/// Sends contract writes one at a time and waits for their receipts.
///
/// Every write is simulated first so reverts surface with a readable reason
/// instead of a wasted transaction.
#[derive(Clone)]
pub(crate) struct TransactionSubmitter {
    tx_lock: Arc<Mutex<()>>,
}

impl TransactionSubmitter {
    pub(crate) fn new(tx_lock: Arc<Mutex<()>>) -> Self {
        Self { tx_lock }
    }

    pub(crate) async fn invoke<P, D>(
        &self,
        method: &str,
        call: CallBuilder<P, D>,
    ) -> Result<B256, RemoteCallError>
    where
        P: Provider + Clone,
        D: CallDecoder + Clone,
    {
        // Pre-simulate to catch reverts with proper error messages
        if let Err(e) = call.call().await {
            return Err(RemoteCallError::simulation(method, &e));
        }

        // Held until the receipt arrives so nonces stay ordered
        let _guard = self.tx_lock.lock().await;
        let pending = call
            .send()
            .await
            .map_err(|e| RemoteCallError::send(method, &e))?;
        debug!(method = %method, tx_hash = ?pending.tx_hash(), "transaction submitted, waiting for receipt");

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| RemoteCallError::Rpc {
                method: method.to_string(),
                reason: e.to_string(),
            })?;
        let tx_hash = receipt.transaction_hash;

        log_fee_details(method, &receipt);

        if !receipt.status() {
            return Err(RemoteCallError::OnChainFailure {
                method: method.to_string(),
                tx_hash,
            });
        }

        Ok(tx_hash)
    }
}

fn log_fee_details(method: &str, receipt: &TransactionReceipt) {
    let total_cost = receipt.effective_gas_price * receipt.gas_used as u128;
    info!(
        method = %method,
        tx_hash = ?receipt.transaction_hash,
        block_number = ?receipt.block_number,
        effective_gas_price = receipt.effective_gas_price,
        gas_used = receipt.gas_used,
        total_cost,
        "💰 transaction confirmed"
    );
}
