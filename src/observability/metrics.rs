//! Metrics collection and exposition.
//!
//! # Metrics
//! - `hotcfg_publish_total` (counter): publish attempts by `outcome` (accepted/rejected)
//! - `hotcfg_fetch_errors_total` (counter): failed remote fetches by `kind`
//! - `hotcfg_watch_events_dropped_total` (counter): outcomes dropped on a full result channel
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`. Needs a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_publish(accepted: bool) {
    let outcome = if accepted { "accepted" } else { "rejected" };
    metrics::counter!("hotcfg_publish_total", "outcome" => outcome).increment(1);
}

pub fn record_fetch_error(kind: &'static str) {
    metrics::counter!("hotcfg_fetch_errors_total", "kind" => kind).increment(1);
}

pub fn record_dropped_event() {
    metrics::counter!("hotcfg_watch_events_dropped_total").increment(1);
}
