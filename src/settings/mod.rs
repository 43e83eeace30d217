//! Settings for the bundled binaries.
//!
//! # Data Flow
//! ```text
//! settings file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → Settings (validated, immutable)
//!     → lifecycle::startup wires the store and watchers from it
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal settings files
//! - Validation separates syntactic (serde) from semantic checks
//! - These are settings *for* the watcher, not the watched configuration

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_settings, parse_settings, SettingsError};
pub use schema::{ObservabilityConfig, RemoteSettings, Settings, SourceSettings, WatcherSettings};
pub use validation::ValidationError;
