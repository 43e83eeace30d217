//! Error types shared by the store, fetchers and watchers.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors produced while talking to the remote key-value store.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote store could not be reached, or answered with an unexpected status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote store answered but the key holds no value.
    #[error("key '{0}' has no value in the remote store")]
    KeyAbsent(String),

    /// The configured remote address cannot be turned into a client.
    #[error("invalid remote address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The fetch did not complete within the configured deadline.
    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),
}

impl FetchError {
    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::KeyAbsent(_) => "key_absent",
            FetchError::InvalidAddress { .. } => "invalid_address",
            FetchError::Timeout(_) => "timeout",
        }
    }
}

/// Errors surfaced by the configuration store and its accessors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The local configuration path does not exist or cannot be stat'ed.
    #[error("config path not valid: {}", .0.display())]
    ConfigPathInvalid(PathBuf),

    /// Candidate text is not syntactically valid JSON. Never published.
    #[error("invalid config: {0}")]
    InvalidConfig(#[source] serde_json::Error),

    /// Reading the configuration from the remote store failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The requested path does not exist in the current snapshot.
    #[error("path '{0}' not found in config")]
    PathNotFound(String),

    /// The value at the path exists but does not decode into the requested type.
    #[error("value at '{path}' has unexpected type: {source}")]
    TypeMismatch {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Nothing has been published to the store yet.
    #[error("no configuration has been loaded")]
    NotLoaded,

    /// Underlying I/O failure while reading a local file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// True for errors that originate in the remote fetch rather than the payload.
    pub fn is_fetch(&self) -> bool {
        matches!(self, ConfigError::Fetch(_))
    }

    /// True when the candidate text failed JSON validation.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, ConfigError::InvalidConfig(_))
    }
}

/// Convenience alias used across the crate.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FetchError::KeyAbsent("service/config".into());
        assert_eq!(
            err.to_string(),
            "key 'service/config' has no value in the remote store"
        );

        let err = ConfigError::ConfigPathInvalid(PathBuf::from("/nope.json"));
        assert_eq!(err.to_string(), "config path not valid: /nope.json");

        let err = FetchError::Timeout(Duration::from_secs(3));
        assert!(err.to_string().contains("3s"));
    }

    #[test]
    fn test_fetch_error_wraps_transparently() {
        let err: ConfigError = FetchError::Transport("connection refused".into()).into();
        assert!(err.is_fetch());
        assert!(!err.is_invalid_config());
        assert_eq!(err.to_string(), "transport error: connection refused");
    }

    #[test]
    fn test_fetch_error_kind() {
        assert_eq!(FetchError::Transport(String::new()).kind(), "transport");
        assert_eq!(FetchError::KeyAbsent(String::new()).kind(), "key_absent");
        assert_eq!(FetchError::Timeout(Duration::ZERO).kind(), "timeout");
    }
}
