//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load settings → Init logging/metrics → Load local file → Start watchers
//!
//! Shutdown (shutdown.rs):
//!     Trigger → every background loop observes the broadcast → tasks joined
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: settings first, then the store, then watchers
//! - Background loops never run unowned; each one holds a shutdown receiver

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
