//! Wallet index for Subcoin.
//!
//! This crate derives the unspent outputs of a set of watched accounts by replaying the
//! finalized blocks of a ledger in height order:
//! - Accounts are registered at a starting height and replayed one block at a time.
//! - Coins of the governing asset are kept after being spent until they are claimed,
//!   coins of other assets are dropped as soon as they are spent.
//! - A background worker catches up with the ledger and idles while no block is
//!   available.
//! - Balance changes are published per transaction to subscribers.
//!
//! The index lives in memory, call [`WalletIndexer::rebuild_index`] after a restart to
//! replay the tracked accounts from genesis.

mod coin_store;
mod config;
mod error;
mod history;
mod indexer;
mod ledger;
mod notification;
mod progress;
mod replay;
mod types;

pub use self::coin_store::CoinStore;
#[cfg(feature = "cli")]
pub use self::config::WalletIndexParams;
pub use self::config::{DEFAULT_POLL_INTERVAL, IndexerConfig};
pub use self::error::Error;
pub use self::history::TransactionHistory;
pub use self::indexer::{CatchUpState, SyncStep, WalletIndexer};
pub use self::ledger::{BlockProvider, InMemLedger};
pub use self::notification::{BalanceChangeStream, BalanceChanged};
pub use self::progress::{ProgressTracker, WorkItem};
pub use self::replay::apply_block;
pub use self::types::{
    AccountId, AssetId, Block, Coin, CoinReference, CoinState, IndexerStatus, Transaction,
    TransactionOutput, TxHash,
};

/// Result type for wallet index operations.
pub type Result<T> = std::result::Result<T, Error>;
