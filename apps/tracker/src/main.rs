use anyhow::Result;
use clap::Parser;
use githabit_tracker::cli::{execute, Cli};
use githabit_tracker::{init_tracing, open_store, TrackerConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = TrackerConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    init_tracing(&config.log_filter);

    let mut store = open_store(&config)?;
    let output = execute(&mut store, cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
