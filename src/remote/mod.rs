//! Remote key-value sources.
//!
//! # Responsibilities
//! - Fetch the raw value stored under a key, once per call
//! - Distinguish "store unreachable" from "key has no value"
//!
//! # Design Decisions
//! - No retry or backoff here; the change watcher owns the retry cadence
//! - Implementations are trait objects so the watcher can run against Consul
//!   in production and an in-memory map in tests

pub mod consul;
pub mod memory;

use async_trait::async_trait;

use crate::error::FetchError;

pub use consul::ConsulFetcher;
pub use memory::MemoryFetcher;

/// A remote store that can return the raw value of a key.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// Fetch the current value of `key`.
    ///
    /// An empty value is returned as `Ok(String::new())`; a key with no value
    /// at all is `FetchError::KeyAbsent`.
    async fn fetch(&self, key: &str) -> Result<String, FetchError>;

    /// Human-readable description of the source, used in log fields.
    fn describe(&self) -> String;
}
