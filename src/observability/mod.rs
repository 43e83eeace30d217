//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! store / watchers produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (publish, fetch error and dropped-outcome counters)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;
