//! Shared setup for tracker integration tests.
//!
//! Each `TestContext` owns a temporary directory holding a real database
//! file, so reopening exercises the on-disk schema path.

#![allow(dead_code)]

use githabit_tracker::{open_store, HabitStore, SqliteRepository, TrackerConfig};
use habit_core::types::{HabitDraft, UnitType};
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestContext {
    _dir: TempDir,
    pub config: TrackerConfig,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let config = TrackerConfig {
            db_path: dir.path().join("data").join("githabit.db"),
            ..TrackerConfig::default()
        };
        Self { _dir: dir, config }
    }

    pub fn db_path(&self) -> PathBuf {
        self.config.db_path.clone()
    }

    /// Open (or reopen) the store on this context's database.
    pub fn store(&self) -> HabitStore<SqliteRepository> {
        open_store(&self.config).expect("open store")
    }
}

pub fn count_habit(name: &str, target_value: i64) -> HabitDraft {
    HabitDraft {
        unit_type: UnitType::Count,
        unit_label: "times".into(),
        target_value,
        ..HabitDraft::named(name)
    }
}
