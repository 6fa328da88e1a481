//! Local habit tracker: SQLite storage, in-memory store and a command-line
//! front end.

pub mod cli;
pub mod config;
pub mod db;
pub mod store;

pub use config::{ConfigError, TrackerConfig};
pub use db::{DbError, SqliteRepository};
pub use store::{HabitStore, StoreError};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. Logs go to stderr so command output stays
/// machine-readable.
pub fn init_tracing(filter: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Open the configured database and load the store.
pub fn open_store(config: &TrackerConfig) -> Result<HabitStore<SqliteRepository>, DbError> {
    if let Some(parent) = config.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let repo = SqliteRepository::open(&config.db_path)?.with_day_start_hour(config.day_start_hour);
    tracing::info!(path = %config.db_path.display(), "database opened");

    let mut store = HabitStore::new(repo)
        .with_day_start_hour(config.day_start_hour)
        .with_timeline_limit(config.timeline_limit);
    store.refresh_all();
    Ok(store)
}
