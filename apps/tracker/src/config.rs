//! Runtime configuration from the environment.

use crate::db::DEFAULT_TIMELINE_LIMIT;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub db_path: PathBuf,
    /// Hour (0-23) at which a new tracking day begins.
    pub day_start_hour: u32,
    pub timeline_limit: usize,
    pub log_filter: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            day_start_hour: 0,
            timeline_limit: DEFAULT_TIMELINE_LIMIT,
            log_filter: "info".to_string(),
        }
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("githabit")
        .join("githabit.db")
}

impl TrackerConfig {
    /// Load `.env` if present, then read `GITHABIT_*` and `RUST_LOG`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("GITHABIT_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(value) = lookup("GITHABIT_DAY_START_HOUR") {
            config.day_start_hour = value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|h| *h < 24)
                .ok_or(ConfigError::Invalid {
                    key: "GITHABIT_DAY_START_HOUR",
                    expected: "an hour between 0 and 23",
                    value,
                })?;
        }

        if let Some(value) = lookup("GITHABIT_TIMELINE_LIMIT") {
            config.timeline_limit = value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid {
                    key: "GITHABIT_TIMELINE_LIMIT",
                    expected: "a positive integer",
                    value,
                })?;
        }

        if let Some(filter) = lookup("RUST_LOG").filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }

        Ok(config)
    }
}
