//! Change watchers that feed the configuration store.
//!
//! # Data Flow
//! ```text
//! remote.rs: poll timer → fetcher → diff → store.publish → result channel
//! file.rs:   fs event   → read file      → store.publish → result channel
//! ```
//!
//! # Design Decisions
//! - Watchers are the only writers; readers go straight to the store
//! - Outcomes are reported on bounded channels and dropped when nobody drains them
//! - Errors never end a watcher; only shutdown does

pub mod file;
pub mod remote;

pub use file::FileWatcher;
pub use remote::{ChangeWatcher, EmptyValuePolicy, WatchConfig, WatchResult, WatcherHandle};
