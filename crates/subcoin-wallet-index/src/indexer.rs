//! Wallet indexer and its catch-up worker.

use crate::coin_store::CoinStore;
use crate::config::IndexerConfig;
use crate::history::TransactionHistory;
use crate::ledger::BlockProvider;
use crate::notification::{BalanceChangeStream, Subscribers};
use crate::progress::ProgressTracker;
use crate::replay;
use crate::types::{AccountId, AssetId, Coin, IndexerStatus, TxHash};
use crate::{Error, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::JoinHandle;
use std::time::Duration;

/// How often the catch-up worker reports progress, in replayed blocks.
const PROGRESS_LOG_INTERVAL: u64 = 1000;

/// State of the catch-up worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatchUpState {
    /// No account is pending.
    Idle,
    /// The block at `height` is the next one to replay.
    Replaying { height: u32 },
}

/// Outcome of a single catch-up step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    /// No account is pending.
    Idle,
    /// The block at this height has not been produced yet.
    Waiting(u32),
    /// The block at this height was replayed.
    Replayed(u32),
    /// The pending height moved while the block was being fetched, nothing was applied.
    Stale(u32),
}

impl SyncStep {
    fn should_back_off(&self) -> bool {
        matches!(self, Self::Idle | Self::Waiting(_))
    }
}

/// Everything guarded by the index lock.
///
/// The coin store, the progress and the history are always mutated together so that
/// a height is never marked as replayed without its coin changes.
#[derive(Debug, Default)]
struct IndexState {
    coins: CoinStore,
    progress: ProgressTracker,
    history: TransactionHistory,
}

/// State shared between the indexer handle and its worker thread.
struct Shared<L> {
    ledger: Arc<L>,
    governing_asset: AssetId,
    state: Mutex<IndexState>,
    subscribers: Subscribers,
}

impl<L: BlockProvider> Shared<L> {
    fn catch_up_state(&self) -> CatchUpState {
        match self.state.lock().progress.index_height() {
            Some(height) => CatchUpState::Replaying { height },
            None => CatchUpState::Idle,
        }
    }

    /// Replays the oldest pending height if its block is available.
    ///
    /// The block is fetched without holding the lock. Once the lock is re-acquired the
    /// height must still be the oldest pending one, otherwise the fetched block is
    /// discarded.
    fn sync_once(&self) -> Result<SyncStep> {
        let CatchUpState::Replaying { height } = self.catch_up_state() else {
            return Ok(SyncStep::Idle);
        };

        let Some(block) = self.ledger.block_at(height)? else {
            return Ok(SyncStep::Waiting(height));
        };

        if block.height != height {
            return Err(Error::UnexpectedBlockHeight {
                expected: height,
                got: block.height,
            });
        }

        let mut state = self.state.lock();

        let Some(work) = state
            .progress
            .next_work_item()
            .filter(|work| work.height == height)
        else {
            tracing::debug!(height, "Pending height changed during fetch, discarding block");
            return Ok(SyncStep::Stale(height));
        };

        let IndexState {
            coins,
            progress,
            history,
        } = &mut *state;

        let notifications =
            replay::apply_block(coins, &block, &work.accounts, &self.governing_asset);
        progress.advance(height, work.accounts);
        history.record(&notifications);

        tracing::debug!(
            height,
            transactions = block.transactions.len(),
            changed = notifications.len(),
            "Replayed block"
        );

        self.subscribers.notify(&notifications);

        Ok(SyncStep::Replayed(height))
    }
}

struct Worker {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

/// Tracks the coins of a set of accounts by replaying blocks from a [`BlockProvider`].
///
/// All queries and mutations go through one lock guarding the coin store and the
/// replay progress, so readers never observe a partially replayed block. Blocks are
/// replayed either by the background worker (see [`WalletIndexer::start`]) or
/// synchronously with [`WalletIndexer::sync_once`] and [`WalletIndexer::catch_up`].
pub struct WalletIndexer<L: BlockProvider> {
    shared: Arc<Shared<L>>,
    config: IndexerConfig,
    worker: Mutex<Option<Worker>>,
}

impl<L: BlockProvider> WalletIndexer<L> {
    /// Creates a new indexer with no tracked accounts.
    ///
    /// The catch-up worker is not started until [`Self::start`] is called.
    pub fn new(ledger: Arc<L>, config: IndexerConfig) -> Self {
        let governing_asset = ledger.governing_asset();
        Self {
            shared: Arc::new(Shared {
                ledger,
                governing_asset,
                state: Mutex::new(IndexState::default()),
                subscribers: Subscribers::default(),
            }),
            config,
            worker: Mutex::new(None),
        }
    }

    /// Spawns the catch-up worker thread.
    pub fn start(&self) -> Result<()> {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return Err(Error::AlreadyRunning);
        }

        let (stop, stop_receiver) = mpsc::channel();
        let shared = self.shared.clone();
        let poll_interval = self.config.poll_interval;

        let handle = std::thread::Builder::new()
            .name(self.config.thread_name.clone())
            .spawn(move || run_catch_up(shared, poll_interval, stop_receiver))?;

        *worker = Some(Worker { stop, handle });

        Ok(())
    }

    /// Stops the catch-up worker and waits for it to exit.
    ///
    /// A block being replayed when this is called is completed first.
    pub fn stop(&self) {
        let Some(Worker { stop, handle }) = self.worker.lock().take() else {
            return;
        };

        let _ = stop.send(());

        if handle.join().is_err() {
            tracing::error!("Wallet index catch-up worker panicked");
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.lock().is_some()
    }

    /// Starts tracking `accounts` from `start_height`.
    ///
    /// Accounts that are already tracked keep their coins and pending height. Returns
    /// the number of newly tracked accounts.
    pub fn register_accounts<I>(&self, accounts: I, start_height: u32) -> usize
    where
        I: IntoIterator<Item = AccountId>,
    {
        let mut state = self.shared.state.lock();

        let mut registered = 0;
        for account in accounts {
            if state.coins.track_account(account) {
                state.progress.insert(start_height, account);
                registered += 1;
            }
        }

        if registered > 0 {
            tracing::info!(registered, start_height, "Registered wallet accounts");
        }

        registered
    }

    /// Stops tracking `accounts` and drops their coins and history immediately.
    ///
    /// Returns the number of accounts that were tracked.
    pub fn unregister_accounts<I>(&self, accounts: I) -> usize
    where
        I: IntoIterator<Item = AccountId>,
    {
        let mut state = self.shared.state.lock();

        let mut unregistered = 0;
        for account in accounts {
            if state.coins.untrack_account(&account).is_some() {
                state.progress.remove(&account);
                state.history.forget(&account);
                unregistered += 1;
            }
        }

        if unregistered > 0 {
            tracing::info!(unregistered, "Unregistered wallet accounts");
        }

        unregistered
    }

    /// Returns the coins of `accounts`, including spent governing-asset coins.
    ///
    /// Fails with [`Error::UnknownAccount`] if any account is not tracked.
    pub fn get_coins<'a, I>(&self, accounts: I) -> Result<Vec<Coin>>
    where
        I: IntoIterator<Item = &'a AccountId>,
    {
        let state = self.shared.state.lock();
        let coins = state.coins.coins_of(accounts)?.cloned().collect();
        Ok(coins)
    }

    /// Returns the confirmed and unspent coins of `accounts`.
    pub fn get_unspent_coins<'a, I>(&self, accounts: I) -> Result<Vec<Coin>>
    where
        I: IntoIterator<Item = &'a AccountId>,
    {
        let state = self.shared.state.lock();
        let coins = state
            .coins
            .coins_of(accounts)?
            .filter(|coin| coin.is_unspent())
            .cloned()
            .collect();
        Ok(coins)
    }

    /// Sum of the unspent coins of `asset_id` owned by `accounts`.
    pub fn get_balance<'a, I>(&self, accounts: I, asset_id: &AssetId) -> Result<u64>
    where
        I: IntoIterator<Item = &'a AccountId>,
    {
        let state = self.shared.state.lock();
        let balance = state
            .coins
            .coins_of(accounts)?
            .filter(|coin| coin.is_unspent() && coin.output.asset_id == *asset_id)
            .fold(0u64, |total, coin| total.saturating_add(coin.output.value));
        Ok(balance)
    }

    /// Returns the hashes of the transactions that changed the balance of `accounts`,
    /// in replay order and without duplicates.
    ///
    /// Only transactions replayed since the account was registered, or since the last
    /// rebuild, are known.
    pub fn get_transactions<'a, I>(&self, accounts: I) -> Result<Vec<TxHash>>
    where
        I: IntoIterator<Item = &'a AccountId>,
    {
        let state = self.shared.state.lock();

        let accounts = accounts.into_iter().collect::<Vec<_>>();
        if let Some(unknown) = accounts
            .iter()
            .find(|account| !state.coins.is_tracked(account))
        {
            return Err(Error::UnknownAccount(**unknown));
        }

        Ok(state.history.transactions_of(accounts))
    }

    /// Drops every coin and replays all tracked accounts from genesis.
    pub fn rebuild_index(&self) {
        self.rebuild_index_from(0);
    }

    /// Drops every coin and replays all tracked accounts from `start_height`.
    pub fn rebuild_index_from(&self, start_height: u32) {
        let mut state = self.shared.state.lock();

        let IndexState {
            coins,
            progress,
            history,
        } = &mut *state;

        coins.clear_coins();
        history.clear();
        progress.rebuild(start_height, coins.tracked_accounts().copied());

        tracing::info!(
            start_height,
            tracked_accounts = coins.tracked_count(),
            "Rebuilding wallet index"
        );
    }

    /// Lowest height still awaiting replay.
    ///
    /// Returns `0` when no account is pending, use [`Self::status`] to tell this apart
    /// from an index waiting on block 0.
    pub fn index_height(&self) -> u32 {
        self.shared.state.lock().progress.index_height().unwrap_or(0)
    }

    pub fn status(&self) -> IndexerStatus {
        let is_running = self.is_running();
        let state = self.shared.state.lock();
        IndexerStatus {
            indexed_height: state.progress.index_height(),
            tracked_accounts: state.coins.tracked_count(),
            pending_heights: state.progress.pending_heights(),
            is_running,
        }
    }

    /// Tracked accounts in ascending order.
    pub fn tracked_accounts(&self) -> Vec<AccountId> {
        let state = self.shared.state.lock();
        let mut accounts = state.coins.tracked_accounts().copied().collect::<Vec<_>>();
        accounts.sort();
        accounts
    }

    pub fn is_tracked(&self, account: &AccountId) -> bool {
        self.shared.state.lock().coins.is_tracked(account)
    }

    /// Subscribes to balance change notifications.
    pub fn subscribe_balance_changes(&self) -> BalanceChangeStream {
        self.shared.subscribers.subscribe()
    }

    pub fn catch_up_state(&self) -> CatchUpState {
        self.shared.catch_up_state()
    }

    /// Replays at most one pending height on the calling thread.
    pub fn sync_once(&self) -> Result<SyncStep> {
        self.shared.sync_once()
    }

    /// Replays pending heights on the calling thread until the index is idle or waits
    /// for a block. Returns the number of replayed blocks.
    pub fn catch_up(&self) -> Result<u64> {
        let mut replayed = 0;
        loop {
            match self.shared.sync_once()? {
                SyncStep::Idle | SyncStep::Waiting(_) => return Ok(replayed),
                SyncStep::Replayed(_) => replayed += 1,
                SyncStep::Stale(_) => {}
            }
        }
    }
}

impl<L: BlockProvider> Drop for WalletIndexer<L> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_catch_up<L: BlockProvider>(
    shared: Arc<Shared<L>>,
    poll_interval: Duration,
    stop: Receiver<()>,
) {
    tracing::info!(?poll_interval, "Wallet index catch-up worker started");

    let mut replayed = 0u64;

    loop {
        let back_off = match shared.sync_once() {
            Ok(step) => {
                if let SyncStep::Replayed(height) = step {
                    replayed += 1;
                    if replayed % PROGRESS_LOG_INTERVAL == 0 {
                        tracing::info!(height, replayed, "Wallet index progress");
                    }
                }
                step.should_back_off()
            }
            Err(err) => {
                tracing::error!(?err, "Failed to replay pending height, retrying after backoff");
                true
            }
        };

        if back_off {
            match stop.recv_timeout(poll_interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        } else if !matches!(stop.try_recv(), Err(TryRecvError::Empty)) {
            break;
        }
    }

    tracing::info!(replayed, "Wallet index catch-up worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemLedger;
    use crate::types::{CoinState, Transaction, TransactionOutput};
    use bitcoin::hashes::Hash;
    use futures::{FutureExt, StreamExt};

    fn account(name: &str) -> AccountId {
        AccountId::hash(name.as_bytes())
    }

    fn neo() -> AssetId {
        AssetId::hash(b"neo")
    }

    fn gas() -> AssetId {
        AssetId::hash(b"gas")
    }

    fn pay(name: &str, outputs: Vec<(AccountId, AssetId, u64)>) -> Transaction {
        Transaction {
            txid: TxHash::hash(name.as_bytes()),
            inputs: Vec::new(),
            outputs: outputs
                .into_iter()
                .map(|(account, asset_id, value)| TransactionOutput {
                    asset_id,
                    value,
                    account,
                })
                .collect(),
            claims: Vec::new(),
        }
    }

    fn new_indexer() -> (Arc<InMemLedger>, WalletIndexer<InMemLedger>) {
        let ledger = Arc::new(InMemLedger::new(neo()));
        let indexer = WalletIndexer::new(ledger.clone(), IndexerConfig::default());
        (ledger, indexer)
    }

    #[test]
    fn test_first_block_scenario() {
        let alice = account("alice");
        let (ledger, indexer) = new_indexer();
        indexer.register_accounts([alice], 0);
        assert_eq!(indexer.catch_up_state(), CatchUpState::Replaying { height: 0 });

        ledger.push_block(1_000, vec![pay("tx0", vec![(alice, neo(), 100)])]).unwrap();

        assert_eq!(indexer.sync_once().unwrap(), SyncStep::Replayed(0));
        assert_eq!(indexer.sync_once().unwrap(), SyncStep::Waiting(1));

        let coins = indexer.get_coins([&alice]).unwrap();
        assert_eq!(coins.len(), 1);
        assert_eq!(coins[0].state, CoinState::CONFIRMED);
        assert_eq!(indexer.index_height(), 1);
    }

    #[test]
    fn test_sync_once_without_accounts_is_idle() {
        let (ledger, indexer) = new_indexer();
        ledger.push_block(1_000, Vec::new()).unwrap();

        assert_eq!(indexer.sync_once().unwrap(), SyncStep::Idle);
        assert_eq!(indexer.index_height(), 0);
        assert_eq!(indexer.status().indexed_height, None);
    }

    #[test]
    fn test_register_is_idempotent() {
        let alice = account("alice");
        let (ledger, indexer) = new_indexer();
        ledger.push_block(1_000, vec![pay("tx0", vec![(alice, gas(), 5)])]).unwrap();
        ledger.push_block(1_015, Vec::new()).unwrap();

        assert_eq!(indexer.register_accounts([alice], 0), 1);
        assert_eq!(indexer.catch_up().unwrap(), 2);
        assert_eq!(indexer.index_height(), 2);

        assert_eq!(indexer.register_accounts([alice], 0), 0);
        assert_eq!(indexer.index_height(), 2);
        assert_eq!(indexer.get_coins([&alice]).unwrap().len(), 1);
    }

    #[test]
    fn test_unregister_drops_everything() {
        let alice = account("alice");
        let bob = account("bob");
        let (ledger, indexer) = new_indexer();
        ledger
            .push_block(1_000, vec![pay("tx0", vec![(alice, gas(), 5), (bob, gas(), 1)])])
            .unwrap();

        indexer.register_accounts([alice, bob], 0);
        indexer.catch_up().unwrap();

        assert_eq!(indexer.unregister_accounts([alice, account("carol")]), 1);
        assert!(!indexer.is_tracked(&alice));
        assert!(matches!(
            indexer.get_coins([&alice]),
            Err(Error::UnknownAccount(unknown)) if unknown == alice
        ));
        assert!(matches!(
            indexer.get_transactions([&alice]),
            Err(Error::UnknownAccount(_))
        ));
        assert_eq!(indexer.get_coins([&bob]).unwrap().len(), 1);
        assert_eq!(indexer.tracked_accounts(), vec![bob]);

        indexer.unregister_accounts([bob]);
        assert_eq!(indexer.status().indexed_height, None);
        assert_eq!(indexer.status().tracked_accounts, 0);
    }

    #[test]
    fn test_later_registration_at_lower_height_is_replayed_first() {
        let alice = account("alice");
        let bob = account("bob");
        let (ledger, indexer) = new_indexer();
        ledger
            .push_block(1_000, vec![pay("tx0", vec![(alice, gas(), 5), (bob, gas(), 7)])])
            .unwrap();
        ledger.push_block(1_015, Vec::new()).unwrap();

        indexer.register_accounts([alice], 1);
        indexer.catch_up().unwrap();
        assert_eq!(indexer.index_height(), 2);
        assert!(indexer.get_coins([&alice]).unwrap().is_empty());

        indexer.register_accounts([bob], 0);
        assert_eq!(indexer.index_height(), 0);
        assert_eq!(indexer.catch_up().unwrap(), 2);

        assert!(indexer.get_coins([&alice]).unwrap().is_empty());
        assert_eq!(indexer.get_balance([&bob], &gas()).unwrap(), 7);
        assert_eq!(indexer.status().pending_heights, 1);
    }

    #[test]
    fn test_rebuild_reproduces_coin_store() {
        let alice = account("alice");
        let (ledger, indexer) = new_indexer();
        let funding = pay("fund", vec![(alice, neo(), 10), (alice, gas(), 4)]);
        let spending = Transaction {
            inputs: vec![funding.output_reference(1)],
            ..pay("spend", vec![(account("bob"), gas(), 4)])
        };
        ledger.push_block(1_000, vec![funding]).unwrap();
        ledger.push_block(1_015, vec![spending]).unwrap();

        indexer.register_accounts([alice], 0);
        indexer.catch_up().unwrap();
        let mut before = indexer.get_coins([&alice]).unwrap();
        let history_before = indexer.get_transactions([&alice]).unwrap();

        indexer.rebuild_index();
        assert_eq!(indexer.index_height(), 0);
        assert!(indexer.get_coins([&alice]).unwrap().is_empty());
        assert!(indexer.get_transactions([&alice]).unwrap().is_empty());

        indexer.catch_up().unwrap();
        let mut after = indexer.get_coins([&alice]).unwrap();
        before.sort_by_key(|coin| coin.reference);
        after.sort_by_key(|coin| coin.reference);
        assert_eq!(before, after);
        assert_eq!(history_before, indexer.get_transactions([&alice]).unwrap());
    }

    #[test]
    fn test_notifications_follow_replay() {
        let alice = account("alice");
        let (ledger, indexer) = new_indexer();
        let mut stream = indexer.subscribe_balance_changes();

        let unrelated = pay("other", vec![(account("carol"), gas(), 1)]);
        let tx = pay("tx0", vec![(alice, gas(), 5)]);
        ledger.push_block(1_000, vec![unrelated, tx.clone()]).unwrap();

        indexer.register_accounts([alice], 0);
        indexer.catch_up().unwrap();

        let notification = stream.next().now_or_never().flatten().unwrap();
        assert_eq!(notification.transaction, tx);
        assert_eq!(notification.accounts, vec![alice]);
        assert_eq!(notification.height, 0);
        assert_eq!(notification.timestamp, 1_000);
        assert!(stream.next().now_or_never().is_none());
    }

    struct BrokenLedger;

    impl BlockProvider for BrokenLedger {
        fn block_at(&self, height: u32) -> Result<Option<crate::types::Block>> {
            Err(Error::Ledger(format!("block {height} unreadable")))
        }

        fn governing_asset(&self) -> AssetId {
            neo()
        }
    }

    #[test]
    fn test_ledger_failure_does_not_advance() {
        let alice = account("alice");
        let indexer = WalletIndexer::new(Arc::new(BrokenLedger), IndexerConfig::default());
        indexer.register_accounts([alice], 3);

        assert!(matches!(indexer.sync_once(), Err(Error::Ledger(_))));
        assert_eq!(indexer.index_height(), 3);
    }

    /// Yields a block one height above the requested one.
    struct MisnumberedLedger;

    impl BlockProvider for MisnumberedLedger {
        fn block_at(&self, height: u32) -> Result<Option<crate::types::Block>> {
            Ok(Some(crate::types::Block {
                height: height + 1,
                timestamp: 1_000,
                transactions: vec![pay("tx0", vec![(account("alice"), gas(), 5)])],
            }))
        }

        fn governing_asset(&self) -> AssetId {
            neo()
        }
    }

    #[test]
    fn test_misnumbered_block_is_rejected() {
        let alice = account("alice");
        let indexer = WalletIndexer::new(Arc::new(MisnumberedLedger), IndexerConfig::default());
        indexer.register_accounts([alice], 0);

        assert!(matches!(
            indexer.sync_once(),
            Err(Error::UnexpectedBlockHeight {
                expected: 0,
                got: 1
            })
        ));
        assert_eq!(indexer.index_height(), 0);
        assert!(indexer.get_coins([&alice]).unwrap().is_empty());
        assert!(indexer.get_transactions([&alice]).unwrap().is_empty());
    }

    type FetchHook = Box<dyn FnOnce() + Send>;

    /// In-memory ledger running a hook once, during the next fetch.
    struct HookedLedger {
        inner: InMemLedger,
        on_fetch: Mutex<Option<FetchHook>>,
    }

    impl BlockProvider for HookedLedger {
        fn block_at(&self, height: u32) -> Result<Option<crate::types::Block>> {
            let hook = self.on_fetch.lock().take();
            if let Some(hook) = hook {
                hook();
            }
            self.inner.block_at(height)
        }

        fn governing_asset(&self) -> AssetId {
            self.inner.governing_asset()
        }
    }

    /// Two blocks paying `alice` and `bob`, with the hook wired to the returned indexer.
    fn hooked_indexer(
        hook: impl FnOnce(&WalletIndexer<HookedLedger>) + Send + 'static,
    ) -> Arc<WalletIndexer<HookedLedger>> {
        let ledger = Arc::new(HookedLedger {
            inner: InMemLedger::new(neo()),
            on_fetch: Mutex::new(None),
        });
        let (alice, bob) = (account("alice"), account("bob"));
        ledger
            .inner
            .push_block(1_000, vec![pay("tx0", vec![(alice, gas(), 5), (bob, gas(), 7)])])
            .unwrap();
        ledger
            .inner
            .push_block(1_015, vec![pay("tx1", vec![(alice, gas(), 1), (bob, gas(), 2)])])
            .unwrap();

        let indexer = Arc::new(WalletIndexer::new(ledger.clone(), IndexerConfig::default()));
        let weak = Arc::downgrade(&indexer);
        *ledger.on_fetch.lock() = Some(Box::new(move || {
            if let Some(indexer) = weak.upgrade() {
                hook(&indexer);
            }
        }));
        indexer
    }

    #[test]
    fn test_registration_during_fetch_discards_block() {
        let alice = account("alice");
        let bob = account("bob");
        let indexer = hooked_indexer(move |indexer| {
            indexer.register_accounts([bob], 0);
        });
        indexer.register_accounts([alice], 1);

        assert_eq!(indexer.sync_once().unwrap(), SyncStep::Stale(1));
        assert_eq!(indexer.index_height(), 0);
        assert!(indexer.get_coins([&alice, &bob]).unwrap().is_empty());
        assert!(indexer.get_transactions([&alice, &bob]).unwrap().is_empty());

        assert_eq!(indexer.catch_up().unwrap(), 2);
        assert_eq!(indexer.index_height(), 2);
        assert_eq!(indexer.get_balance([&alice], &gas()).unwrap(), 1);
        assert_eq!(indexer.get_balance([&bob], &gas()).unwrap(), 9);
    }

    #[test]
    fn test_rebuild_during_fetch_discards_block() {
        let alice = account("alice");
        let indexer = hooked_indexer(|indexer| indexer.rebuild_index_from(1));
        indexer.register_accounts([alice], 0);

        assert_eq!(indexer.sync_once().unwrap(), SyncStep::Stale(0));
        assert_eq!(indexer.index_height(), 1);
        assert!(indexer.get_coins([&alice]).unwrap().is_empty());

        assert_eq!(indexer.catch_up().unwrap(), 1);
        assert_eq!(indexer.get_balance([&alice], &gas()).unwrap(), 1);
    }

    #[test]
    fn test_start_twice_fails() {
        let (_ledger, indexer) = new_indexer();
        indexer.start().unwrap();
        assert!(matches!(indexer.start(), Err(Error::AlreadyRunning)));
        assert!(indexer.status().is_running);

        indexer.stop();
        assert!(!indexer.is_running());
    }
}
