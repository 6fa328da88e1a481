//! SQLite schema definitions.

/// Enforce `check_ins.habit_id` references.
pub const PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// Current full definition of every table.
pub const SCHEMA: &str = r#"
-- Reference data for grouping habits
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    color TEXT NOT NULL
);

-- Habits (soft-deleted via status, never removed)
CREATE TABLE IF NOT EXISTS habits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    plan TEXT NOT NULL DEFAULT '',
    unit_type TEXT NOT NULL DEFAULT 'binary',
    unit_label TEXT NOT NULL DEFAULT 'done',
    target_value INTEGER NOT NULL DEFAULT 1,
    color TEXT NOT NULL DEFAULT '#238636',
    created_at INTEGER NOT NULL,
    status TEXT NOT NULL DEFAULT 'active',
    pinned INTEGER NOT NULL DEFAULT 0,
    category_id INTEGER,
    deleted_at INTEGER
);

-- Check-ins ("commits"); date_string is fixed at creation
CREATE TABLE IF NOT EXISTS check_ins (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    habit_id INTEGER NOT NULL,
    message TEXT NOT NULL DEFAULT '',
    value INTEGER NOT NULL DEFAULT 1,
    target_value INTEGER NOT NULL DEFAULT 1,
    timestamp INTEGER NOT NULL,
    date_string TEXT NOT NULL,
    FOREIGN KEY(habit_id) REFERENCES habits(id) ON DELETE CASCADE
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_check_ins_date ON check_ins(date_string);
CREATE INDEX IF NOT EXISTS idx_check_ins_habit ON check_ins(habit_id);
"#;

/// A column added after the first release of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMigration {
    pub table: &'static str,
    pub column: &'static str,
    pub definition: &'static str,
}

impl ColumnMigration {
    pub fn sql(&self) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            self.table, self.column, self.definition
        )
    }
}

/// Additive migrations, applied in order. Each one is independent.
pub const COLUMN_MIGRATIONS: &[ColumnMigration] = &[
    ColumnMigration {
        table: "habits",
        column: "plan",
        definition: "TEXT NOT NULL DEFAULT ''",
    },
    ColumnMigration {
        table: "habits",
        column: "unit_type",
        definition: "TEXT NOT NULL DEFAULT 'binary'",
    },
    ColumnMigration {
        table: "habits",
        column: "unit_label",
        definition: "TEXT NOT NULL DEFAULT 'done'",
    },
    ColumnMigration {
        table: "habits",
        column: "target_value",
        definition: "INTEGER NOT NULL DEFAULT 1",
    },
    ColumnMigration {
        table: "habits",
        column: "status",
        definition: "TEXT NOT NULL DEFAULT 'active'",
    },
    ColumnMigration {
        table: "habits",
        column: "pinned",
        definition: "INTEGER NOT NULL DEFAULT 0",
    },
    ColumnMigration {
        table: "habits",
        column: "category_id",
        definition: "INTEGER",
    },
    ColumnMigration {
        table: "habits",
        column: "deleted_at",
        definition: "INTEGER",
    },
    ColumnMigration {
        table: "check_ins",
        column: "value",
        definition: "INTEGER NOT NULL DEFAULT 1",
    },
    ColumnMigration {
        table: "check_ins",
        column: "target_value",
        definition: "INTEGER NOT NULL DEFAULT 1",
    },
];

/// Categories seeded into an empty store.
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Programming", "#238636"),
    ("Health", "#8250df"),
    ("Learning", "#0969da"),
    ("Finance", "#bf8700"),
    ("Hobbies", "#da3633"),
];

/// Drop every table. Used by a full reset.
pub const DROP_ALL: &str = r#"
DROP TABLE IF EXISTS check_ins;
DROP TABLE IF EXISTS habits;
DROP TABLE IF EXISTS categories;
"#;
