use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::Value;

use hotcfg::{ConfigStore, ConsulFetcher, RemoteFetcher, Snapshot};

#[derive(Parser)]
#[command(name = "hotcfg-cli")]
#[command(about = "One-shot tools for hotcfg configuration documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a file holds valid JSON
    Validate { file: PathBuf },
    /// Print the value at a dotted path in a file
    Get { file: PathBuf, path: String },
    /// Fetch a key from Consul and check that it is valid JSON
    Fetch {
        #[arg(short, long, default_value = "127.0.0.1:8500")]
        address: String,

        #[arg(short, long)]
        key: String,

        #[arg(short, long, default_value_t = 10)]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { file } => {
            let store = ConfigStore::new();
            store.load_file(&file)?;
            println!("{}: valid", file.display());
        }
        Commands::Get { file, path } => {
            let store = ConfigStore::new();
            store.load_file(&file)?;
            let value: Value = store.get(&path)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Commands::Fetch {
            address,
            key,
            timeout_secs,
        } => {
            let fetcher = ConsulFetcher::new(&address, Duration::from_secs(timeout_secs))?;
            let raw = fetcher.fetch(&key).await?;
            let snapshot = Snapshot::parse(raw.as_str()).inspect_err(|_| {
                eprintln!("Value of '{}' is not valid JSON", key);
                eprintln!("Raw: {}", raw);
            })?;
            println!("{}", serde_json::to_string_pretty(snapshot.root())?);
        }
    }

    Ok(())
}
