use alloy::{primitives::B256, sol_types::{Revert, SolError}};
use thiserror::Error;

/// Failure of a single remote contract call.
#[derive(Debug, Error)]
pub enum RemoteCallError {
    /// The contract reverted with a decodable reason. For writes this comes
    /// from the pre-simulation, so nothing was sent.
    #[error("{method} reverted: {reason}")]
    Reverted { method: String, reason: String },

    #[error("{method} failed to send: {reason}")]
    Send { method: String, reason: String },

    /// The transaction was mined but its receipt reports failure.
    #[error("{method} reverted on-chain. Tx hash: {tx_hash:?}")]
    OnChainFailure { method: String, tx_hash: B256 },

    #[error("{method} needs a signer but the contract handle is read-only")]
    ReadOnly { method: String },

    #[error("{method} failed: {reason}")]
    Rpc { method: String, reason: String },
}

impl RemoteCallError {
    /// A failed pre-simulation of a write. Only a decoded revert counts as
    /// `Reverted`; transport and node failures stay `Rpc`.
    pub(crate) fn simulation(method: &str, error: &alloy::contract::Error) -> Self {
        match decode_revert_reason(error) {
            Some(reason) => Self::Reverted {
                method: method.to_string(),
                reason,
            },
            None => Self::Rpc {
                method: method.to_string(),
                reason: rpc_error_hint(&error.to_string()),
            },
        }
    }

    pub(crate) fn send(method: &str, error: &alloy::contract::Error) -> Self {
        Self::Send {
            method: method.to_string(),
            reason: describe_error(error),
        }
    }

    /// A failed view call: decode the revert if there is one.
    pub(crate) fn read(method: &str, error: &alloy::contract::Error) -> Self {
        match decode_revert_reason(error) {
            Some(reason) => Self::Reverted {
                method: method.to_string(),
                reason,
            },
            None => Self::Rpc {
                method: method.to_string(),
                reason: error.to_string(),
            },
        }
    }

    pub(crate) fn read_only(method: &str) -> Self {
        Self::ReadOnly {
            method: method.to_string(),
        }
    }
}

/// Decode a Solidity `Error(string)` revert payload.
pub fn decode_revert_data(data: &[u8]) -> Option<String> {
    Revert::abi_decode(data).ok().map(|revert| revert.reason)
}

/// Revert reason carried by a contract error, if the node returned one.
pub fn decode_revert_reason(error: &alloy::contract::Error) -> Option<String> {
    error
        .as_revert_data()
        .and_then(|data| decode_revert_data(&data))
}

/// Human-readable description of a contract error.
///
/// Prefers the decoded revert reason and falls back to hints for common RPC
/// provider failures.
pub fn describe_error(error: &alloy::contract::Error) -> String {
    match decode_revert_reason(error) {
        Some(reason) => reason,
        None => rpc_error_hint(&error.to_string()),
    }
}

pub fn rpc_error_hint(message: &str) -> String {
    if message.contains("insufficient funds") {
        "Insufficient ETH for gas and mint price. Please fund the account.".to_string()
    } else if message.contains("replacement transaction underpriced") {
        "Transaction underpriced. A pending transaction may be blocking.".to_string()
    } else if message.contains("nonce too low") {
        "Nonce too low. A transaction may have been confirmed already.".to_string()
    } else if message.contains("user rejected") || message.contains("User denied") {
        "The signer rejected the transaction.".to_string()
    } else {
        message.to_string()
    }
}
