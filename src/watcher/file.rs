//! Local configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::observability::metrics;
use crate::store::ConfigStore;
use crate::watcher::remote::WatchResult;

/// Reloads a local JSON file into a store whenever it is modified.
pub struct FileWatcher {
    path: PathBuf,
    store: ConfigStore,
    events: mpsc::Sender<WatchResult>,
}

impl FileWatcher {
    /// Create a file watcher.
    ///
    /// Returns the watcher and a receiver for reload outcomes, with the same
    /// drop-when-full policy as the remote watcher.
    pub fn new(
        path: &Path,
        store: ConfigStore,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<WatchResult>) {
        let (events, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                path: path.to_path_buf(),
                store,
                events,
            },
            rx,
        )
    }

    /// Start watching. The returned watcher stops when dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self {
            path,
            store,
            events,
        } = self;
        let reload_path = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!(path = %reload_path.display(), "Config file change detected, reloading");
                        let result = store.load_file(&reload_path);
                        if let Err(e) = &result {
                            tracing::error!(error = %e, "Failed to reload config file, keeping current configuration");
                        }
                        if let Err(mpsc::error::TrySendError::Full(_)) = events.try_send(result) {
                            metrics::record_dropped_event();
                            tracing::warn!("File reload channel full, dropping outcome");
                        }
                    }
                }
                Err(e) => tracing::error!(error = ?e, "File watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %path.display(), "Config file watcher started");
        Ok(watcher)
    }
}
