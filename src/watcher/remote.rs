//! Polling watcher for a remote configuration key.
//!
//! # Cycle
//! ```text
//! sleep poll interval
//!     → fetch key (bounded by fetch timeout)     error → emit Err, next cycle
//!     → same as last published value?            yes   → emit nothing
//!     → empty value and EmptyValuePolicy::Ignore? yes  → emit nothing
//!     → store.publish(value)                     Ok    → remember value, emit Ok
//!                                                Err   → emit Err, value not remembered
//! ```
//!
//! An invalid value is never remembered, so it is retried and re-reported
//! every cycle until the remote side fixes or changes it.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time;

use crate::error::{ConfigError, FetchError};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::remote::{ConsulFetcher, RemoteFetcher};
use crate::store::ConfigStore;

/// Outcome of one watch cycle: `Ok(())` means a new valid config was published.
pub type WatchResult = Result<(), ConfigError>;

/// Floor applied to the poll interval so a zero setting cannot spin.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How the watcher treats a key whose value is the empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyValuePolicy {
    /// Treat an empty value as "no change" and emit nothing.
    #[default]
    Ignore,
    /// Hand the empty value to validation, which reports it as invalid config.
    Report,
}

/// Parameters for a remote watcher.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Remote store address (`host:port`).
    pub address: String,
    /// Key holding the JSON document.
    pub key: String,
    /// Pause between the end of one fetch and the start of the next.
    /// The first fetch happens one interval after start.
    pub poll_interval: Duration,
    /// Deadline for a single fetch.
    pub fetch_timeout: Duration,
    /// Result channel capacity. Outcomes are dropped (and logged) when full.
    pub channel_capacity: usize,
    pub empty_value: EmptyValuePolicy,
    /// Value already published by the caller. Seeds change detection so the
    /// first poll does not report it again.
    pub last_observed: Option<String>,
}

impl WatchConfig {
    pub fn new(address: impl Into<String>, key: impl Into<String>, poll_interval_secs: u64) -> Self {
        Self {
            address: address.into(),
            key: key.into(),
            poll_interval: Duration::from_secs(poll_interval_secs),
            fetch_timeout: Duration::from_secs(10),
            channel_capacity: 16,
            empty_value: EmptyValuePolicy::Ignore,
            last_observed: None,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    pub fn with_empty_value(mut self, policy: EmptyValuePolicy) -> Self {
        self.empty_value = policy;
        self
    }

    pub fn with_last_observed(mut self, value: impl Into<String>) -> Self {
        self.last_observed = Some(value.into());
        self
    }
}

/// Background loop that polls a remote key and publishes changes into a store.
pub struct ChangeWatcher {
    store: ConfigStore,
    fetcher: Arc<dyn RemoteFetcher>,
    config: WatchConfig,
    last_observed: Option<String>,
    events: mpsc::Sender<WatchResult>,
}

impl ChangeWatcher {
    /// Start watching `config.key` on the Consul agent at `config.address`.
    ///
    /// Fails only if a client cannot be built for the address; the agent is
    /// not contacted until the first poll.
    pub fn start(
        store: ConfigStore,
        config: WatchConfig,
    ) -> Result<(WatcherHandle, mpsc::Receiver<WatchResult>), ConfigError> {
        let fetcher = ConsulFetcher::new(&config.address, config.fetch_timeout)?;
        Ok(Self::with_fetcher(store, Arc::new(fetcher), config))
    }

    /// Start watching through an arbitrary fetcher. Must be called inside a Tokio runtime.
    pub fn with_fetcher(
        store: ConfigStore,
        fetcher: Arc<dyn RemoteFetcher>,
        mut config: WatchConfig,
    ) -> (WatcherHandle, mpsc::Receiver<WatchResult>) {
        let (events, rx) = mpsc::channel(config.channel_capacity.max(1));
        let last_observed = config.last_observed.take();
        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();

        let watcher = Self {
            store,
            fetcher,
            config,
            last_observed,
            events,
        };
        let task = tokio::spawn(watcher.run(signal));

        (WatcherHandle { shutdown, task }, rx)
    }

    async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        let period = self.config.poll_interval.max(MIN_POLL_INTERVAL);
        tracing::info!(
            key = %self.config.key,
            source = %self.fetcher.describe(),
            interval_ms = period.as_millis() as u64,
            "Remote config watcher starting"
        );

        // The pause runs from the end of the previous cycle, not on a fixed schedule.
        loop {
            tokio::select! {
                _ = time::sleep(period) => {}
                _ = shutdown.recv() => break,
            }

            let outcome = tokio::select! {
                outcome = self.poll_once() => outcome,
                _ = shutdown.recv() => break,
            };

            if let Some(result) = outcome {
                self.emit(result);
            }
        }

        tracing::info!(key = %self.config.key, "Remote config watcher stopped");
    }

    /// Run one cycle. `None` means nothing changed and nothing is reported.
    async fn poll_once(&mut self) -> Option<WatchResult> {
        let key = self.config.key.as_str();
        let fetched = match time::timeout(self.config.fetch_timeout, self.fetcher.fetch(key)).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => return Some(Err(self.fetch_failed(e))),
            Err(_) => return Some(Err(self.fetch_failed(FetchError::Timeout(self.config.fetch_timeout)))),
        };

        if self.last_observed.as_deref() == Some(fetched.as_str()) {
            tracing::trace!(key, "Remote value unchanged");
            return None;
        }
        if fetched.is_empty() && self.config.empty_value == EmptyValuePolicy::Ignore {
            tracing::debug!(key, "Remote value is empty, ignoring");
            return None;
        }

        match self.store.publish(fetched.as_str()) {
            Ok(()) => {
                tracing::info!(key, bytes = fetched.len(), "Remote configuration changed, reloaded");
                self.last_observed = Some(fetched);
                Some(Ok(()))
            }
            Err(e) => Some(Err(e)),
        }
    }

    fn fetch_failed(&self, error: FetchError) -> ConfigError {
        metrics::record_fetch_error(error.kind());
        tracing::warn!(key = %self.config.key, error = %error, "Failed to fetch remote configuration");
        error.into()
    }

    fn emit(&self, result: WatchResult) {
        match self.events.try_send(result) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(dropped)) => {
                metrics::record_dropped_event();
                tracing::warn!(
                    key = %self.config.key,
                    success = dropped.is_ok(),
                    "Watch result channel full, dropping outcome"
                );
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::trace!(key = %self.config.key, "No watch result consumer");
            }
        }
    }
}

/// Owner of a running watcher.
///
/// Dropping the handle also stops the loop, at its next suspension point.
pub struct WatcherHandle {
    shutdown: Shutdown,
    task: JoinHandle<()>,
}

impl WatcherHandle {
    /// Signal the loop to stop and wait for it to finish.
    pub async fn stop(self) {
        self.shutdown.trigger();
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Watcher task did not shut down cleanly");
        }
    }

    /// Whether the background loop is still running.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("running", &self.is_running())
            .finish()
    }
}
