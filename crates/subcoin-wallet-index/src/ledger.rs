//! Block source consumed by the indexer.

use crate::types::{AssetId, Block, Transaction};
use crate::{Error, Result};
use parking_lot::RwLock;

/// Ordered, finalized block store the index replays from.
pub trait BlockProvider: Send + Sync + 'static {
    /// Returns the block at `height`, or `None` if it has not been produced yet.
    fn block_at(&self, height: u32) -> Result<Option<Block>>;

    /// Asset whose spent coins are retained for claims.
    fn governing_asset(&self) -> AssetId;
}

/// Append-only in-memory block store.
pub struct InMemLedger {
    governing_asset: AssetId,
    blocks: RwLock<Vec<Block>>,
}

impl InMemLedger {
    pub fn new(governing_asset: AssetId) -> Self {
        Self {
            governing_asset,
            blocks: RwLock::new(Vec::new()),
        }
    }

    /// Appends a block at the next height and returns that height.
    ///
    /// Fails once every `u32` height has been used.
    pub fn push_block(&self, timestamp: u32, transactions: Vec<Transaction>) -> Result<u32> {
        let mut blocks = self.blocks.write();
        let height = u32::try_from(blocks.len())
            .map_err(|_| Error::Ledger(format!("no height left after {} blocks", blocks.len())))?;
        blocks.push(Block {
            height,
            timestamp,
            transactions,
        });
        Ok(height)
    }

    /// Number of blocks, which is also the next height to be produced.
    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.read().is_empty()
    }
}

impl BlockProvider for InMemLedger {
    fn block_at(&self, height: u32) -> Result<Option<Block>> {
        Ok(self.blocks.read().get(height as usize).cloned())
    }

    fn governing_asset(&self) -> AssetId {
        self.governing_asset
    }
}
