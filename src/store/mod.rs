//! Atomic configuration store.
//!
//! # Data Flow
//! ```text
//! local file / remote fetch (raw text)
//!     → snapshot.rs (JSON syntax validation)
//!     → ConfigStore::publish (atomic swap of Arc<Snapshot>)
//!     → readers call current() / getters, never blocked by the swap
//! ```
//!
//! # Design Decisions
//! - Snapshots are immutable; a reload replaces the whole document
//! - Invalid text is rejected before the swap, the old snapshot stays live
//! - The store is a cheap cloneable handle, injected rather than global
//! - Strict getters report missing paths; the lenient ones fall back to zero values

pub mod lenient;
pub mod path;
pub mod snapshot;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use serde::de::DeserializeOwned;

use crate::error::{ConfigError, ConfigResult};
use crate::observability::metrics;
use crate::remote::RemoteFetcher;

pub use snapshot::Snapshot;

/// Holds the currently active configuration snapshot.
#[derive(Clone, Default)]
pub struct ConfigStore {
    current: Arc<ArcSwapOption<Snapshot>>,
}

impl ConfigStore {
    /// Create an empty store. `current()` returns `None` until the first publish.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `raw`.
    pub fn with_initial(raw: impl Into<String>) -> ConfigResult<Self> {
        let store = Self::new();
        store.publish(raw)?;
        Ok(store)
    }

    /// The active snapshot, or `None` if nothing was ever published.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.load_full()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.load().is_some()
    }

    /// Validate `candidate` as JSON and, if it parses, swap it in as the active snapshot.
    ///
    /// On failure the active snapshot is left untouched.
    pub fn publish(&self, candidate: impl Into<String>) -> ConfigResult<()> {
        match Snapshot::parse(candidate) {
            Ok(snapshot) => {
                let bytes = snapshot.raw().len();
                self.current.store(Some(Arc::new(snapshot)));
                metrics::record_publish(true);
                tracing::debug!(bytes, "Published new configuration snapshot");
                Ok(())
            }
            Err(e) => {
                metrics::record_publish(false);
                tracing::warn!(error = %e, "Rejected configuration, keeping current snapshot");
                Err(e)
            }
        }
    }

    /// Drop the active snapshot, returning the store to the unset state.
    pub fn clear(&self) {
        self.current.store(None);
    }

    /// Read a local JSON file and publish its contents.
    pub fn load_file(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        if fs::metadata(path).is_err() {
            return Err(ConfigError::ConfigPathInvalid(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        self.publish(content)?;
        tracing::info!(path = %path.display(), "Configuration loaded from file");
        Ok(())
    }

    /// Fetch `key` once through `fetcher` and publish the value.
    pub async fn load_remote(&self, fetcher: &dyn RemoteFetcher, key: &str) -> ConfigResult<()> {
        let raw = fetcher.fetch(key).await?;
        self.publish(raw)?;
        tracing::info!(key, source = %fetcher.describe(), "Configuration loaded from remote store");
        Ok(())
    }

    /// Decode the value at `path` from the active snapshot.
    pub fn get<T: DeserializeOwned>(&self, path: &str) -> ConfigResult<T> {
        self.current().ok_or(ConfigError::NotLoaded)?.extract(path)
    }

    /// String at `path`, or `""` if missing.
    pub fn get_string(&self, path: &str) -> String {
        self.with_value(path, lenient::to_string)
    }

    /// Boolean at `path`, or `false` if missing.
    pub fn get_bool(&self, path: &str) -> bool {
        self.with_value(path, lenient::to_bool)
    }

    /// 32-bit integer at `path`, or `0` if missing.
    ///
    /// Values outside the `i32` range saturate to `i32::MIN` / `i32::MAX`;
    /// use [`get_i64`](Self::get_i64) for the full value.
    pub fn get_int(&self, path: &str) -> i32 {
        self.with_value(path, lenient::to_int)
    }

    /// 64-bit integer at `path`, or `0` if missing.
    pub fn get_i64(&self, path: &str) -> i64 {
        self.with_value(path, lenient::to_i64)
    }

    /// String array at `path`, or an empty vector if missing.
    pub fn get_string_slice(&self, path: &str) -> Vec<String> {
        self.with_value(path, lenient::to_string_slice)
    }

    fn with_value<T>(&self, path: &str, f: impl FnOnce(Option<&serde_json::Value>) -> T) -> T {
        let guard = self.current.load();
        f(guard
            .as_deref()
            .and_then(|snap| path::select(snap.root(), path)))
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.current.load();
        f.debug_struct("ConfigStore")
            .field("loaded", &guard.is_some())
            .field("bytes", &guard.as_deref().map(|s| s.raw().len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_unset() {
        let store = ConfigStore::new();
        assert!(store.current().is_none());
        assert!(!store.is_loaded());
        assert_eq!(store.get_string("anything"), "");
        assert!(matches!(store.get::<String>("x"), Err(ConfigError::NotLoaded)));
    }

    #[test]
    fn test_publish_then_read() {
        let store = ConfigStore::new();
        store.publish(r#"{"a":{"b":1}}"#).unwrap();
        assert_eq!(store.current().unwrap().raw(), r#"{"a":{"b":1}}"#);
        assert_eq!(store.get_int("a.b"), 1);
        assert_eq!(store.get::<i64>("a.b").unwrap(), 1);
    }

    #[test]
    fn test_invalid_publish_keeps_previous() {
        let store = ConfigStore::with_initial(r#"{"v":1}"#).unwrap();
        let err = store.publish("{broken").unwrap_err();
        assert!(err.is_invalid_config());
        assert_eq!(store.current().unwrap().raw(), r#"{"v":1}"#);
    }

    #[test]
    fn test_clones_share_state() {
        let store = ConfigStore::new();
        let reader = store.clone();
        store.publish("[1,2,3]").unwrap();
        assert_eq!(reader.current().unwrap().raw(), "[1,2,3]");

        reader.clear();
        assert!(store.current().is_none());
    }

    #[test]
    fn test_reader_keeps_old_snapshot_alive() {
        let store = ConfigStore::with_initial(r#"{"gen":1}"#).unwrap();
        let held = store.current().unwrap();
        store.publish(r#"{"gen":2}"#).unwrap();

        assert_eq!(held.get_int("gen").unwrap(), 1);
        assert_eq!(store.get_int("gen"), 2);
    }
}
