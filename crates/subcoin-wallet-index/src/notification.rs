//! Balance change notifications.
//!
//! Subscribers receive one [`BalanceChanged`] per replayed transaction that touched at
//! least one of their tracked accounts. Notifications are pushed while the index lock is
//! held, right after the block is committed, so a subscriber never observes a
//! notification for a block whose effects are not yet visible to queries.

use crate::types::{AccountId, Transaction};
use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use parking_lot::Mutex;

/// Stream of balance change notifications.
pub type BalanceChangeStream = UnboundedReceiver<BalanceChanged>;

/// A replayed transaction changed the balance of some tracked accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceChanged {
    pub transaction: Transaction,
    /// Distinct affected accounts in ascending order.
    pub accounts: Vec<AccountId>,
    pub height: u32,
    pub timestamp: u32,
}

/// Registry of notification subscribers.
#[derive(Debug, Default)]
pub(crate) struct Subscribers {
    senders: Mutex<Vec<UnboundedSender<BalanceChanged>>>,
}

impl Subscribers {
    pub(crate) fn subscribe(&self) -> BalanceChangeStream {
        let (sender, receiver) = unbounded();
        self.senders.lock().push(sender);
        receiver
    }

    /// Delivers `notifications` in order to every live subscriber.
    ///
    /// Subscribers whose receiver has been dropped are pruned.
    pub(crate) fn notify(&self, notifications: &[BalanceChanged]) {
        if notifications.is_empty() {
            return;
        }

        let mut senders = self.senders.lock();
        senders.retain(|sender| {
            notifications
                .iter()
                .all(|notification| sender.unbounded_send(notification.clone()).is_ok())
        });
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.senders.lock().len()
    }
}
