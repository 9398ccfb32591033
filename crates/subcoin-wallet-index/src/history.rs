//! Per-account transaction history.

use crate::notification::BalanceChanged;
use crate::types::{AccountId, TxHash};
use indexmap::IndexSet;
use std::collections::HashMap;

/// Transactions that changed the balance of each account, in replay order.
#[derive(Debug, Default)]
pub struct TransactionHistory {
    by_account: HashMap<AccountId, IndexSet<TxHash>>,
}

impl TransactionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the transactions carried by `notifications`.
    pub fn record(&mut self, notifications: &[BalanceChanged]) {
        for notification in notifications {
            let txid = notification.transaction.txid;
            for account in &notification.accounts {
                self.by_account.entry(*account).or_default().insert(txid);
            }
        }
    }

    /// Transactions of `accounts`, each reported once.
    pub fn transactions_of<'a, I>(&self, accounts: I) -> Vec<TxHash>
    where
        I: IntoIterator<Item = &'a AccountId>,
    {
        accounts
            .into_iter()
            .filter_map(|account| self.by_account.get(account))
            .flatten()
            .copied()
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn forget(&mut self, account: &AccountId) {
        self.by_account.remove(account);
    }

    pub fn clear(&mut self) {
        self.by_account.clear();
    }
}
