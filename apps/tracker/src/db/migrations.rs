//! Schema lifecycle: create, additively migrate, seed.
//!
//! `initialize` is safe to call any number of times. Tables are created with
//! their full current definition, then every known column migration is
//! attempted on its own. A migration whose column already exists is skipped;
//! any other failure is logged and the remaining migrations still run.

use super::error::{is_duplicate_column, DbError};
use super::schema::{ColumnMigration, COLUMN_MIGRATIONS, DEFAULT_CATEGORIES, DROP_ALL, PRAGMAS, SCHEMA};
use rusqlite::{params, Connection};

/// Result of attempting a single column migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    Applied,
    AlreadyApplied,
    Failed(String),
}

/// What an `initialize` run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
    pub seeded_categories: usize,
}

impl MigrationReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Bring the store to the current schema and seed reference data.
pub fn initialize(conn: &Connection) -> Result<MigrationReport, DbError> {
    conn.execute_batch(PRAGMAS)?;
    conn.execute_batch(SCHEMA)?;

    let mut report = run_column_migrations(conn, COLUMN_MIGRATIONS);
    report.seeded_categories = seed_default_categories(conn)?;

    if !report.applied.is_empty() || report.seeded_categories > 0 {
        tracing::info!(
            applied = report.applied.len(),
            seeded = report.seeded_categories,
            "database schema updated"
        );
    }
    Ok(report)
}

/// Drop all tables and initialize from scratch.
pub fn reset(conn: &Connection) -> Result<MigrationReport, DbError> {
    conn.execute_batch(DROP_ALL)?;
    tracing::warn!("all habit data dropped");
    initialize(conn)
}

pub(crate) fn run_column_migrations(conn: &Connection, migrations: &[ColumnMigration]) -> MigrationReport {
    let mut report = MigrationReport::default();
    for migration in migrations {
        let name = format!("{}.{}", migration.table, migration.column);
        match apply_column_migration(conn, migration) {
            MigrationOutcome::Applied => report.applied.push(name),
            MigrationOutcome::AlreadyApplied => report.skipped.push(name),
            MigrationOutcome::Failed(_) => report.failed.push(name),
        }
    }
    report
}

/// Attempt one `ADD COLUMN`, absorbing "already exists".
pub fn apply_column_migration(conn: &Connection, migration: &ColumnMigration) -> MigrationOutcome {
    match conn.execute(&migration.sql(), []) {
        Ok(_) => {
            tracing::info!(table = migration.table, column = migration.column, "column added");
            MigrationOutcome::Applied
        }
        Err(e) if is_duplicate_column(&e) => {
            tracing::debug!(table = migration.table, column = migration.column, "column already present");
            MigrationOutcome::AlreadyApplied
        }
        Err(e) => {
            tracing::warn!(
                table = migration.table,
                column = migration.column,
                error = %e,
                "column migration failed, continuing"
            );
            MigrationOutcome::Failed(e.to_string())
        }
    }
}

fn seed_default_categories(conn: &Connection) -> Result<usize, DbError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(0);
    }

    let tx = conn.unchecked_transaction()?;
    for (name, color) in DEFAULT_CATEGORIES {
        tx.execute(
            "INSERT INTO categories (name, color) VALUES (?1, ?2)",
            params![name, color],
        )?;
    }
    tx.commit()?;
    Ok(DEFAULT_CATEGORIES.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_names(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("SELECT name FROM pragma_table_info('{table}')"))
            .unwrap();
        let names = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap();
        names
    }

    fn category_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_all_tables_created() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        for table in ["categories", "habits", "check_ins"] {
            let count: i32 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table {} should exist", table);
        }
    }

    #[test]
    fn test_default_categories_seeded() {
        let conn = Connection::open_in_memory().unwrap();
        let report = initialize(&conn).unwrap();
        assert_eq!(report.seeded_categories, 5);
        assert_eq!(category_count(&conn), 5);
    }

    #[test]
    fn interrupted_seed_leaves_no_partial_categories() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                color TEXT NOT NULL
            );
            CREATE TRIGGER reject_learning BEFORE INSERT ON categories
            WHEN NEW.name = 'Learning'
            BEGIN
                SELECT RAISE(ABORT, 'seed interrupted');
            END;",
        )
        .unwrap();

        assert!(initialize(&conn).is_err());
        assert_eq!(category_count(&conn), 0);

        conn.execute_batch("DROP TRIGGER reject_learning;").unwrap();
        let report = initialize(&conn).unwrap();
        assert_eq!(report.seeded_categories, 5);
        assert_eq!(category_count(&conn), 5);
    }

    #[test]
    fn fresh_store_skips_every_column_migration() {
        let conn = Connection::open_in_memory().unwrap();
        let report = initialize(&conn).unwrap();
        assert!(report.applied.is_empty());
        assert!(report.is_clean());
        assert_eq!(report.skipped.len(), COLUMN_MIGRATIONS.len());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let second = initialize(&conn).unwrap();
        let third = initialize(&conn).unwrap();

        assert_eq!(category_count(&conn), 5);
        assert_eq!(second.seeded_categories, 0);
        assert_eq!(second, third);
    }

    #[test]
    fn legacy_tables_gain_new_columns_and_keep_rows() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE habits (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                color TEXT NOT NULL DEFAULT '#238636',
                created_at INTEGER NOT NULL
            );
            CREATE TABLE check_ins (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                habit_id INTEGER NOT NULL,
                message TEXT NOT NULL DEFAULT '',
                timestamp INTEGER NOT NULL,
                date_string TEXT NOT NULL
            );
            INSERT INTO habits (name, created_at) VALUES ('read', 1000);
            INSERT INTO check_ins (habit_id, timestamp, date_string) VALUES (1, 2000, '2024-01-01');",
        )
        .unwrap();

        let report = initialize(&conn).unwrap();
        assert!(report.is_clean());
        assert!(report.applied.contains(&"habits.target_value".to_string()));
        assert!(report.applied.contains(&"check_ins.value".to_string()));

        let columns = column_names(&conn, "habits");
        for expected in ["plan", "unit_type", "target_value", "status", "pinned", "category_id", "deleted_at"] {
            assert!(columns.contains(&expected.to_string()), "missing {expected}");
        }

        let (status, target): (String, i64) = conn
            .query_row("SELECT status, target_value FROM habits WHERE id = 1", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(status, "active");
        assert_eq!(target, 1);

        let value: i64 = conn
            .query_row("SELECT value FROM check_ins WHERE id = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(value, 1);

        let again = initialize(&conn).unwrap();
        assert!(again.applied.is_empty());
    }

    #[test]
    fn failing_migration_does_not_stop_the_rest() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let migrations = [
            ColumnMigration {
                table: "no_such_table",
                column: "x",
                definition: "INTEGER",
            },
            ColumnMigration {
                table: "habits",
                column: "archived_note",
                definition: "TEXT",
            },
        ];
        let report = run_column_migrations(&conn, &migrations);
        assert_eq!(report.failed, vec!["no_such_table.x".to_string()]);
        assert_eq!(report.applied, vec!["habits.archived_note".to_string()]);
    }

    #[test]
    fn reset_reseeds() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn.execute("DELETE FROM categories WHERE id > 1", []).unwrap();
        conn.execute("INSERT INTO habits (name, created_at) VALUES ('x', 1)", [])
            .unwrap();

        reset(&conn).unwrap();
        assert_eq!(category_count(&conn), 5);
        let habits: i64 = conn
            .query_row("SELECT COUNT(*) FROM habits", [], |row| row.get(0))
            .unwrap();
        assert_eq!(habits, 0);
    }
}
