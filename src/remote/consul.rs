//! Consul KV fetcher over the HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::error::FetchError;
use crate::remote::RemoteFetcher;

/// Default per-request deadline when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Reads raw key values from a Consul agent (`GET /v1/kv/<key>?raw`).
#[derive(Clone)]
pub struct ConsulFetcher {
    base: Url,
    client: reqwest::Client,
    timeout: Duration,
}

impl ConsulFetcher {
    /// Create a fetcher for `address` (`host:port`, or a full `http://` URL).
    ///
    /// No request is made here; an unreachable agent only shows up on the first fetch.
    pub fn new(address: &str, timeout: Duration) -> Result<Self, FetchError> {
        let base = parse_base_url(address)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| FetchError::InvalidAddress {
                address: address.to_string(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        tracing::debug!(base = %base, timeout_secs = timeout.as_secs(), "Consul fetcher created");
        Ok(Self {
            base,
            client,
            timeout,
        })
    }

    /// URL of the raw value endpoint for `key`.
    pub fn key_url(&self, key: &str) -> Result<Url, FetchError> {
        let mut url = self
            .base
            .join(&format!("v1/kv/{}", key.trim_start_matches('/')))
            .map_err(|e| FetchError::Transport(format!("invalid key '{}': {}", key, e)))?;
        url.set_query(Some("raw"));
        Ok(url)
    }
}

#[async_trait]
impl RemoteFetcher for ConsulFetcher {
    async fn fetch(&self, key: &str) -> Result<String, FetchError> {
        let url = self.key_url(key)?;
        let res = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout)
            } else {
                FetchError::Transport(e.to_string())
            }
        })?;

        match res.status() {
            StatusCode::NOT_FOUND => Err(FetchError::KeyAbsent(key.to_string())),
            status if status.is_success() => res
                .text()
                .await
                .map_err(|e| FetchError::Transport(format!("failed to read body: {}", e))),
            status => Err(FetchError::Transport(format!(
                "unexpected status {} from {}",
                status, self.base
            ))),
        }
    }

    fn describe(&self) -> String {
        format!("consul@{}", self.base)
    }
}

impl std::fmt::Debug for ConsulFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsulFetcher")
            .field("base", &self.base.as_str())
            .field("timeout_secs", &self.timeout.as_secs())
            .finish()
    }
}

fn parse_base_url(address: &str) -> Result<Url, FetchError> {
    let invalid = |reason: String| FetchError::InvalidAddress {
        address: address.to_string(),
        reason,
    };

    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(invalid("address is empty".into()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let mut url = Url::parse(&candidate).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".into()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
