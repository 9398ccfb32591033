//! Types for the wallet index.

use bitcoin::hashes::{hash160, hash_newtype, sha256d};
use std::fmt;

hash_newtype! {
    /// Script hash identifying the owner of an output.
    pub struct AccountId(hash160::Hash);

    /// Identifier of the asset carried by an output.
    pub struct AssetId(sha256d::Hash);

    /// Transaction hash.
    pub struct TxHash(sha256d::Hash);
}

/// Reference to a transaction output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoinReference {
    /// Hash of the transaction that created the output.
    pub txid: TxHash,
    /// Position of the output within that transaction.
    pub vout: u16,
}

impl CoinReference {
    pub fn new(txid: TxHash, vout: u16) -> Self {
        Self { txid, vout }
    }
}

impl fmt::Display for CoinReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}

/// Output of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutput {
    pub asset_id: AssetId,
    pub value: u64,
    /// Script hash the output is paid to.
    pub account: AccountId,
}

/// A confirmed transaction as delivered by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub txid: TxHash,
    /// Outputs consumed by this transaction.
    pub inputs: Vec<CoinReference>,
    pub outputs: Vec<TransactionOutput>,
    /// Spent governing-asset outputs claimed for rewards. Empty for
    /// non-claim transactions.
    pub claims: Vec<CoinReference>,
}

impl Transaction {
    /// Returns the reference to the output at `vout`.
    pub fn output_reference(&self, vout: u16) -> CoinReference {
        CoinReference::new(self.txid, vout)
    }
}

/// A finalized block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub height: u32,
    /// Block timestamp in seconds.
    pub timestamp: u32,
    pub transactions: Vec<Transaction>,
}

bitflags::bitflags! {
    /// Lifecycle flags of a tracked coin.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CoinState: u8 {
        /// The output was observed in an accepted block.
        const CONFIRMED = 1 << 0;
        /// The output was consumed by a later transaction.
        const SPENT = 1 << 1;
    }
}

/// A tracked output together with its state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    pub reference: CoinReference,
    pub output: TransactionOutput,
    pub state: CoinState,
}

impl Coin {
    /// Returns `true` if the coin is confirmed and not spent.
    pub fn is_unspent(&self) -> bool {
        self.state.contains(CoinState::CONFIRMED) && !self.state.contains(CoinState::SPENT)
    }

    /// Owner of the coin.
    pub fn account(&self) -> AccountId {
        self.output.account
    }
}

/// Indexer status snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerStatus {
    /// Lowest height still awaiting replay, `None` if nothing is pending.
    pub indexed_height: Option<u32>,
    /// Number of tracked accounts.
    pub tracked_accounts: usize,
    /// Number of distinct pending heights.
    pub pending_heights: usize,
    /// Whether the catch-up worker is running.
    pub is_running: bool,
}
