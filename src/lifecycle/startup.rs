//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the local file (fatal on failure)
//! - Prime the store from the remote key (non-fatal on failure)
//! - Start the metrics exporter and the enabled watchers
//! - Drain watcher outcomes into the log
//!
//! # Design Decisions
//! - Fail fast on local problems, degrade gracefully on remote ones
//! - Shutdown stops watchers first, then waits for the drain tasks

use std::sync::Arc;

use notify::RecommendedWatcher;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::ConfigError;
use crate::observability::metrics;
use crate::remote::{ConsulFetcher, RemoteFetcher};
use crate::settings::Settings;
use crate::store::ConfigStore;
use crate::watcher::{ChangeWatcher, FileWatcher, WatchConfig, WatchResult, WatcherHandle};

/// Errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to load local configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to watch configuration file: {0}")]
    FileWatch(#[from] notify::Error),
}

/// Everything started from a [`Settings`] document.
pub struct Services {
    store: ConfigStore,
    remote: Option<WatcherHandle>,
    file: Option<RecommendedWatcher>,
    drains: Vec<JoinHandle<()>>,
}

impl Services {
    /// Start the store and watchers described by `settings`.
    pub async fn start(settings: &Settings) -> Result<Self, StartupError> {
        let store = ConfigStore::new();
        let mut drains = Vec::new();

        if let Some(path) = &settings.source.file {
            store.load_file(path)?;
        }

        if settings.observability.metrics_enabled {
            match settings.observability.metrics_address.parse() {
                Ok(addr) => metrics::init_metrics(addr),
                Err(_) => tracing::error!(
                    metrics_address = %settings.observability.metrics_address,
                    "Failed to parse metrics address"
                ),
            }
        }

        let remote = if settings.remote.enabled {
            let watch = settings.watch_config();
            let fetcher = Arc::new(
                ConsulFetcher::new(&watch.address, watch.fetch_timeout).map_err(ConfigError::from)?,
            );
            let watch = prime_remote(&store, fetcher.as_ref(), watch).await;

            let (handle, rx) = ChangeWatcher::with_fetcher(store.clone(), fetcher, watch);
            drains.push(tokio::spawn(drain("remote", rx)));
            Some(handle)
        } else {
            None
        };

        let file = match (&settings.source.file, settings.source.watch_file) {
            (Some(path), true) => {
                let (watcher, rx) =
                    FileWatcher::new(path, store.clone(), settings.watcher.channel_capacity);
                let guard = watcher.run()?;
                drains.push(tokio::spawn(drain("file", rx)));
                Some(guard)
            }
            _ => None,
        };

        tracing::info!(
            loaded = store.is_loaded(),
            remote = remote.is_some(),
            watch_file = file.is_some(),
            "Configuration services started"
        );

        Ok(Self {
            store,
            remote,
            file,
            drains,
        })
    }

    /// Handle to the shared store.
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Stop every watcher and wait for their outcome streams to close.
    pub async fn shutdown(self) {
        if let Some(handle) = self.remote {
            handle.stop().await;
        }
        drop(self.file);

        for task in self.drains {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Watch drain task failed");
            }
        }
        tracing::info!("Configuration services stopped");
    }
}

/// Load the remote key once and seed the watcher with whatever was published.
async fn prime_remote(
    store: &ConfigStore,
    fetcher: &dyn RemoteFetcher,
    watch: WatchConfig,
) -> WatchConfig {
    match store.load_remote(fetcher, &watch.key).await {
        Ok(()) => match store.current() {
            Some(snapshot) => watch.with_last_observed(snapshot.raw()),
            None => watch,
        },
        Err(e) => {
            tracing::warn!(
                key = %watch.key,
                error = %e,
                "Initial remote load failed, watcher will keep trying"
            );
            watch
        }
    }
}

async fn drain(source: &'static str, mut rx: mpsc::Receiver<WatchResult>) {
    while let Some(result) = rx.recv().await {
        match result {
            Ok(()) => tracing::info!(source, "Configuration reloaded"),
            Err(e) => tracing::warn!(source, error = %e, "Configuration reload failed"),
        }
    }
}
