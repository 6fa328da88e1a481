//! Local SQLite database operations.

pub mod error;
pub mod migrations;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use migrations::{MigrationOutcome, MigrationReport};
pub use repository::{
    CategoryRepository, CheckInRepository, HabitRepository, SqliteRepository, StatsRepository,
    TimelineRepository, TrackerRepository, DEFAULT_TIMELINE_LIMIT,
};
