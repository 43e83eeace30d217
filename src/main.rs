//! hotcfg daemon.
//!
//! Loads the configured JSON file, watches the remote key, and logs every
//! reload outcome until SIGINT/SIGTERM.
//!
//! ```text
//!  settings.toml ──▶ Services::start ──▶ ConfigStore ◀── ChangeWatcher ◀── Consul KV
//!                                             ▲
//!                                             └──────── FileWatcher ◀── config.json
//! ```

use std::path::PathBuf;

use clap::Parser;

use hotcfg::lifecycle::signals::wait_for_signal;
use hotcfg::lifecycle::startup::Services;
use hotcfg::observability::logging::init_logging;
use hotcfg::settings::{load_settings, Settings};

#[derive(Parser)]
#[command(name = "hotcfg")]
#[command(about = "Watch a JSON configuration file and Consul key, hot-reloading on change", long_about = None)]
struct Args {
    /// Settings file (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };

    init_logging(&settings.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "hotcfg starting");

    tracing::info!(
        file = ?settings.source.file,
        remote_enabled = settings.remote.enabled,
        remote_address = %settings.remote.address,
        remote_key = %settings.remote.key,
        poll_interval_secs = settings.remote.poll_interval_secs,
        "Settings loaded"
    );

    let services = Services::start(&settings).await?;

    wait_for_signal().await;
    services.shutdown().await;

    tracing::info!("Shutdown complete");
    Ok(())
}
