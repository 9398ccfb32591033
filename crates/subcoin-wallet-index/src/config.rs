//! Wallet index configuration.

use std::time::Duration;

/// Default delay between two catch-up attempts when there is nothing to replay.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Configuration of a [`crate::WalletIndexer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerConfig {
    /// How long the catch-up worker waits before re-checking when idle.
    pub poll_interval: Duration,
    /// Name of the catch-up worker thread.
    pub thread_name: String,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            thread_name: "wallet-index".to_string(),
        }
    }
}

impl IndexerConfig {
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Command line parameters of the wallet index.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, clap::Args)]
pub struct WalletIndexParams {
    /// Milliseconds between two catch-up attempts when the index is idle.
    #[arg(long, default_value_t = 2000)]
    pub wallet_index_poll_interval: u64,
}

#[cfg(feature = "cli")]
impl From<WalletIndexParams> for IndexerConfig {
    fn from(params: WalletIndexParams) -> Self {
        IndexerConfig::default()
            .with_poll_interval(Duration::from_millis(params.wallet_index_poll_interval))
    }
}
