//! Settings schema definitions.
//!
//! Settings drive the bundled binaries: which file to load, which remote key
//! to watch, and how to log. Every field has a default so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::watcher::{EmptyValuePolicy, WatchConfig};

/// Root settings document.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Local file source.
    pub source: SourceSettings,

    /// Remote key-value source.
    pub remote: RemoteSettings,

    /// Watcher behaviour shared by file and remote watchers.
    pub watcher: WatcherSettings,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Watcher parameters for the remote source.
    pub fn watch_config(&self) -> WatchConfig {
        WatchConfig::new(
            self.remote.address.clone(),
            self.remote.key.clone(),
            self.remote.poll_interval_secs,
        )
        .with_fetch_timeout(Duration::from_secs(self.remote.fetch_timeout_secs))
        .with_channel_capacity(self.watcher.channel_capacity)
        .with_empty_value(self.watcher.empty_value)
    }
}

/// Local file source.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SourceSettings {
    /// JSON file loaded at startup.
    pub file: Option<PathBuf>,

    /// Reload the file when it changes on disk.
    pub watch_file: bool,
}

/// Remote key-value source.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RemoteSettings {
    pub enabled: bool,

    /// Agent address (e.g., "127.0.0.1:8500").
    pub address: String,

    /// Key holding the JSON document (e.g., "service/config").
    pub key: String,

    pub poll_interval_secs: u64,

    pub fetch_timeout_secs: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            address: "127.0.0.1:8500".to_string(),
            key: "service/config".to_string(),
            poll_interval_secs: 5,
            fetch_timeout_secs: 10,
        }
    }
}

/// Watcher behaviour.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatcherSettings {
    /// Capacity of each result channel; outcomes beyond it are dropped.
    pub channel_capacity: usize,

    /// Treatment of an empty remote value.
    pub empty_value: EmptyValuePolicy,
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            channel_capacity: 16,
            empty_value: EmptyValuePolicy::Ignore,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Exporter listen address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
