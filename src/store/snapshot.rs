//! Immutable, validated configuration snapshots.

use serde::de::{self, DeserializeOwned};
use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};
use crate::store::path;

/// One validated JSON document, as published.
///
/// Keeps the raw text byte-for-byte alongside the parsed tree so readers can
/// both compare exact payloads and project paths without reparsing.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    raw: String,
    value: Value,
}

impl Snapshot {
    /// Parse `raw` as JSON. Fails with `InvalidConfig` on any syntax error.
    pub fn parse(raw: impl Into<String>) -> ConfigResult<Self> {
        let raw = raw.into();
        let value = serde_json::from_str(&raw).map_err(ConfigError::InvalidConfig)?;
        Ok(Self { raw, value })
    }

    /// Exact text that was published.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Parsed document root.
    pub fn root(&self) -> &Value {
        &self.value
    }

    /// Whether `path` resolves to a value (including `null`).
    pub fn contains(&self, path: &str) -> bool {
        path::select(&self.value, path).is_some()
    }

    /// Value at `path`, or `PathNotFound`.
    pub fn value(&self, path: &str) -> ConfigResult<&Value> {
        path::select(&self.value, path).ok_or_else(|| ConfigError::PathNotFound(path.to_string()))
    }

    /// Decode the sub-document at `path` into `T`. The empty path decodes the whole document.
    pub fn extract<T: DeserializeOwned>(&self, path: &str) -> ConfigResult<T> {
        let node = self.value(path)?;
        T::deserialize(node).map_err(|source| ConfigError::TypeMismatch {
            path: path.to_string(),
            source,
        })
    }

    pub fn get_str(&self, path: &str) -> ConfigResult<&str> {
        let node = self.value(path)?;
        node.as_str().ok_or_else(|| ConfigError::TypeMismatch {
            path: path.to_string(),
            source: de::Error::custom(format!("expected a string, found {}", node)),
        })
    }

    pub fn get_bool(&self, path: &str) -> ConfigResult<bool> {
        self.extract(path)
    }

    pub fn get_int(&self, path: &str) -> ConfigResult<i32> {
        self.extract(path)
    }

    pub fn get_i64(&self, path: &str) -> ConfigResult<i64> {
        self.extract(path)
    }

    pub fn get_string_slice(&self, path: &str) -> ConfigResult<Vec<String>> {
        self.extract(path)
    }
}
