//! Per-height replay progress of the tracked accounts.

use crate::types::AccountId;
use std::collections::{BTreeMap, HashSet};

/// Accounts awaiting replay of the block at `height`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub height: u32,
    pub accounts: HashSet<AccountId>,
}

/// Maps each pending block height to the accounts that still owe its replay.
///
/// An account appears under at most one height.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    pending: BTreeMap<u32, HashSet<AccountId>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `account` to the pending set at `height`.
    ///
    /// The caller is responsible for not adding an account that is already pending.
    pub fn insert(&mut self, height: u32, account: AccountId) {
        self.pending.entry(height).or_default().insert(account);
    }

    /// Removes `account` from whichever height it is pending at.
    pub fn remove(&mut self, account: &AccountId) -> Option<u32> {
        let height = self.pending_height_of(account)?;

        if let Some(accounts) = self.pending.get_mut(&height) {
            accounts.remove(account);
            if accounts.is_empty() {
                self.pending.remove(&height);
            }
        }

        Some(height)
    }

    /// Height `account` is pending at, if any.
    pub fn pending_height_of(&self, account: &AccountId) -> Option<u32> {
        self.pending
            .iter()
            .find_map(|(height, accounts)| accounts.contains(account).then_some(*height))
    }

    /// Lowest pending height together with its accounts.
    pub fn next_work_item(&self) -> Option<WorkItem> {
        self.pending
            .first_key_value()
            .map(|(height, accounts)| WorkItem {
                height: *height,
                accounts: accounts.clone(),
            })
    }

    /// Moves `height` forward by one block.
    ///
    /// The entry at `height` is dropped and `accounts` are merged into the entry at
    /// `height + 1`, whether or not that block exists yet.
    pub fn advance(&mut self, height: u32, accounts: HashSet<AccountId>) {
        self.pending.remove(&height);

        let Some(next_height) = height.checked_add(1) else {
            tracing::warn!(height, "Pending height overflow, dropping accounts from progress");
            return;
        };

        if accounts.is_empty() {
            return;
        }

        self.pending.entry(next_height).or_default().extend(accounts);
    }

    /// Drops all pending state and, if `tracked` is non-empty, reseeds every tracked
    /// account at `start_height`.
    pub fn rebuild<I>(&mut self, start_height: u32, tracked: I)
    where
        I: IntoIterator<Item = AccountId>,
    {
        self.pending.clear();

        let accounts = tracked.into_iter().collect::<HashSet<_>>();
        if !accounts.is_empty() {
            self.pending.insert(start_height, accounts);
        }
    }

    /// Lowest pending height, `None` when nothing is pending.
    pub fn index_height(&self) -> Option<u32> {
        self.pending.first_key_value().map(|(height, _)| *height)
    }

    /// Number of distinct pending heights.
    pub fn pending_heights(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
