//! In-process key-value source.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::remote::RemoteFetcher;

#[derive(Default)]
struct Inner {
    values: HashMap<String, String>,
    transport_failure: Option<String>,
    latency: Option<Duration>,
}

/// A fetcher backed by a shared in-memory map.
///
/// Clones share the same map, so a test can keep one handle to mutate values
/// while the watcher polls through another.
#[derive(Clone, Default)]
pub struct MemoryFetcher {
    inner: Arc<Mutex<Inner>>,
    fetches: Arc<AtomicUsize>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value stored under `key`.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.lock().values.insert(key.into(), value.into());
    }

    /// Remove `key`, so fetches report `KeyAbsent`.
    pub fn remove(&self, key: &str) {
        self.lock().values.remove(key);
    }

    /// Make every fetch fail with a transport error until cleared with `None`.
    pub fn fail_with(&self, reason: Option<&str>) {
        self.lock().transport_failure = reason.map(str::to_string);
    }

    /// Delay every fetch by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.lock().latency = latency;
    }

    /// Number of fetches served so far, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RemoteFetcher for MemoryFetcher {
    async fn fetch(&self, key: &str) -> Result<String, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let latency = self.lock().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let inner = self.lock();
        if let Some(reason) = &inner.transport_failure {
            return Err(FetchError::Transport(reason.clone()));
        }
        inner
            .values
            .get(key)
            .cloned()
            .ok_or_else(|| FetchError::KeyAbsent(key.to_string()))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_fetch() {
        let fetcher = MemoryFetcher::new();
        assert!(matches!(
            fetcher.fetch("k").await,
            Err(FetchError::KeyAbsent(_))
        ));

        fetcher.set("k", "");
        assert_eq!(fetcher.fetch("k").await.unwrap(), "");

        fetcher.set("k", "{}");
        assert_eq!(fetcher.fetch("k").await.unwrap(), "{}");
        assert_eq!(fetcher.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_memory_transport_failure() {
        let fetcher = MemoryFetcher::new();
        fetcher.set("k", "{}");
        fetcher.fail_with(Some("connection refused"));
        assert!(matches!(
            fetcher.fetch("k").await,
            Err(FetchError::Transport(_))
        ));

        fetcher.fail_with(None);
        assert!(fetcher.fetch("k").await.is_ok());
    }
}
