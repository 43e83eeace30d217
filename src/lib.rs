//! Hot-reloadable JSON configuration backed by a local file or a Consul key.

pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod remote;
pub mod settings;
pub mod store;
pub mod watcher;

pub use error::{ConfigError, ConfigResult, FetchError};
pub use lifecycle::Shutdown;
pub use remote::{ConsulFetcher, MemoryFetcher, RemoteFetcher};
pub use store::{ConfigStore, Snapshot};
pub use watcher::{ChangeWatcher, EmptyValuePolicy, WatchConfig, WatchResult, WatcherHandle};
