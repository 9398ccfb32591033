//! Error types for the wallet index.

use crate::types::AccountId;

/// Errors that can occur while querying or driving the wallet index.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The account is not tracked by the index.
    #[error("Unknown account: {0}")]
    UnknownAccount(AccountId),

    /// The block provider failed to serve a block.
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// The block provider returned a block for a different height.
    #[error("Unexpected block height: expected {expected}, got {got}")]
    UnexpectedBlockHeight { expected: u32, got: u32 },

    /// The catch-up worker has already been started.
    #[error("Catch-up worker is already running")]
    AlreadyRunning,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
