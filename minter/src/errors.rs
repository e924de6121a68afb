use crypto_devs_contract_clients::RemoteCallError;
use thiserror::Error;

use crate::operations::OperationKind;

/// Failure to obtain a usable accessor from the wallet session.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The transport could not be opened or the node did not answer.
    #[error("wallet unavailable: {0}")]
    WalletUnavailable(String),

    /// No usable signing key: missing when a signer was requested, or unparsable.
    #[error("wallet connection rejected: {0}")]
    Rejected(String),

    #[error("wrong network: expected chain id {expected}, connected to chain id {actual}")]
    WrongNetwork { expected: u64, actual: u64 },
}

/// Why an operation did not complete.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    RemoteCall(#[from] RemoteCallError),

    #[error("{0} is already in progress")]
    Busy(OperationKind),
}
