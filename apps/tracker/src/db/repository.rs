//! Repository pattern for database access.

use crate::db::error::DbError;
use crate::db::migrations::{self, MigrationReport};
use chrono::Utc;
use habit_core::date_utils::date_string_for_timestamp;
use habit_core::timeline::merge_activities;
use habit_core::types::{
    ActivityKind, Category, CheckIn, DailyContribution, Habit, HabitDraft, HabitStats,
    HabitStatus, TimelineActivity, UnitType,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

type Result<T> = std::result::Result<T, DbError>;

/// Default cap for the unified activity feed.
pub const DEFAULT_TIMELINE_LIMIT: usize = 100;

/// Repository for category operations.
pub trait CategoryRepository {
    fn list_categories(&self) -> Result<Vec<Category>>;
    fn create_category(&self, name: &str, color: &str) -> Result<i64>;
}

/// Repository for habit operations.
pub trait HabitRepository {
    fn list_active_habits(&self) -> Result<Vec<Habit>>;
    fn list_habits_by_status(&self, status: HabitStatus) -> Result<Vec<Habit>>;
    fn get_habit(&self, id: i64) -> Result<Option<Habit>>;
    fn create_habit(&self, draft: &HabitDraft) -> Result<i64>;
    fn update_habit(&self, id: i64, draft: &HabitDraft) -> Result<()>;
    fn set_habit_status(&self, id: i64, status: HabitStatus) -> Result<()>;
    fn soft_delete_habit(&self, id: i64) -> Result<()>;
}

/// Repository for check-in operations.
pub trait CheckInRepository {
    fn create_check_in(&self, habit_id: i64, message: &str, value: i64, target_value: i64) -> Result<i64>;
    fn create_check_in_at(
        &self,
        habit_id: i64,
        message: &str,
        value: i64,
        target_value: i64,
        timestamp: i64,
    ) -> Result<i64>;
    fn get_check_in(&self, id: i64) -> Result<Option<CheckIn>>;
    fn update_check_in(&self, id: i64, message: &str, value: i64) -> Result<()>;
    fn delete_check_in(&self, id: i64) -> Result<()>;
    fn list_check_ins(&self) -> Result<Vec<CheckIn>>;
    fn list_check_ins_for_habit(&self, habit_id: i64) -> Result<Vec<CheckIn>>;
}

/// Repository for aggregate queries.
pub trait StatsRepository {
    fn habit_stats(&self, habit_id: i64) -> Result<HabitStats>;
    fn all_habit_stats(&self) -> Result<HashMap<i64, HabitStats>>;
    fn global_contributions(&self) -> Result<Vec<DailyContribution>>;
    fn habit_contributions(&self, habit_id: i64) -> Result<Vec<DailyContribution>>;
}

/// Repository for the unified activity feed.
pub trait TimelineRepository {
    fn recent_activities(&self, limit: usize) -> Result<Vec<TimelineActivity>>;
}

/// Everything the store needs from storage.
pub trait TrackerRepository:
    CategoryRepository + HabitRepository + CheckInRepository + StatsRepository + TimelineRepository
{
}

impl<T> TrackerRepository for T where
    T: CategoryRepository + HabitRepository + CheckInRepository + StatsRepository + TimelineRepository
{
}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
    day_start_hour: u32,
}

const HABIT_COLUMNS: &str = "h.id, h.name, h.description, h.plan, h.unit_type, h.unit_label,
    h.target_value, COALESCE(c.color, h.color), h.category_id, c.name, h.created_at, h.status,
    h.pinned, h.deleted_at";

const CHECK_IN_COLUMNS: &str = "id, habit_id, message, value, target_value, timestamp, date_string";

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self {
            conn,
            day_start_hour: 0,
        };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self {
            conn,
            day_start_hour: 0,
        };
        repo.initialize()?;
        Ok(repo)
    }

    /// Hour at which a new tracking day starts for newly created check-ins.
    pub fn with_day_start_hour(mut self, hour: u32) -> Self {
        self.day_start_hour = hour.min(23);
        self
    }

    pub fn day_start_hour(&self) -> u32 {
        self.day_start_hour
    }

    /// Create or migrate the schema. Safe to call repeatedly.
    pub fn initialize(&self) -> Result<MigrationReport> {
        migrations::initialize(&self.conn)
    }

    /// Drop all data and start over.
    pub fn reset(&self) -> Result<MigrationReport> {
        migrations::reset(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn row_to_habit(row: &rusqlite::Row) -> rusqlite::Result<Habit> {
        let unit_type: String = row.get(4)?;
        let status: String = row.get(11)?;
        Ok(Habit {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            plan: row.get(3)?,
            unit_type: UnitType::from_str(&unit_type).ok_or_else(|| invalid_text(4, "unit_type", &unit_type))?,
            unit_label: row.get(5)?,
            target_value: row.get(6)?,
            color: row.get(7)?,
            category_id: row.get(8)?,
            category_name: row.get(9)?,
            created_at: row.get(10)?,
            status: HabitStatus::from_str(&status).ok_or_else(|| invalid_text(11, "status", &status))?,
            pinned: row.get::<_, i64>(12)? != 0,
            deleted_at: row.get(13)?,
        })
    }

    fn row_to_check_in(row: &rusqlite::Row) -> rusqlite::Result<CheckIn> {
        Ok(CheckIn {
            id: row.get(0)?,
            habit_id: row.get(1)?,
            message: row.get(2)?,
            value: row.get(3)?,
            target_value: row.get(4)?,
            timestamp: row.get(5)?,
            date_string: row.get(6)?,
        })
    }

    fn row_to_contribution(row: &rusqlite::Row) -> rusqlite::Result<DailyContribution> {
        Ok(DailyContribution {
            date_string: row.get(0)?,
            count: row.get(1)?,
            target_value: row.get(2)?,
        })
    }

    fn habits_where(&self, clause: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<Habit>> {
        let sql = format!(
            "SELECT {HABIT_COLUMNS}
             FROM habits h
             LEFT JOIN categories c ON h.category_id = c.id
             WHERE {clause}
             ORDER BY h.created_at DESC, h.id DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let habits = stmt
            .query_map(params, Self::row_to_habit)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(habits)
    }

    fn check_in_events(&self, limit: usize) -> Result<Vec<TimelineActivity>> {
        let mut stmt = self.conn.prepare(
            "SELECT ci.id, ci.habit_id, h.name, h.unit_label, ci.timestamp, ci.message, ci.value
             FROM check_ins ci
             JOIN habits h ON h.id = ci.habit_id
             ORDER BY ci.timestamp DESC
             LIMIT ?1",
        )?;
        let events = stmt
            .query_map(params![limit], |row| {
                Ok(TimelineActivity {
                    habit_id: row.get(1)?,
                    habit_name: row.get(2)?,
                    unit_label: row.get(3)?,
                    timestamp: row.get(4)?,
                    kind: ActivityKind::CheckIn {
                        check_in_id: row.get(0)?,
                        message: row.get(5)?,
                        value: row.get(6)?,
                    },
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(events)
    }

    fn create_events(&self, limit: usize) -> Result<Vec<TimelineActivity>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, unit_label, created_at FROM habits
             ORDER BY created_at DESC
             LIMIT ?1",
        )?;
        let events = stmt
            .query_map(params![limit], |row| {
                Ok(TimelineActivity {
                    habit_id: row.get(0)?,
                    habit_name: row.get(1)?,
                    unit_label: row.get(2)?,
                    timestamp: row.get(3)?,
                    kind: ActivityKind::Create,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(events)
    }

    fn delete_events(&self, limit: usize) -> Result<Vec<TimelineActivity>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, unit_label, deleted_at FROM habits
             WHERE status = 'deleted' AND deleted_at IS NOT NULL
             ORDER BY deleted_at DESC
             LIMIT ?1",
        )?;
        let events = stmt
            .query_map(params![limit], |row| {
                Ok(TimelineActivity {
                    habit_id: row.get(0)?,
                    habit_name: row.get(1)?,
                    unit_label: row.get(2)?,
                    timestamp: row.get(3)?,
                    kind: ActivityKind::Delete,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(events)
    }
}

fn invalid_text(column: usize, field: &str, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        rusqlite::types::Type::Text,
        Box::new(DbError::InvalidData(format!("unknown {field}: {value}"))),
    )
}

impl CategoryRepository for SqliteRepository {
    fn list_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, color FROM categories ORDER BY id")?;
        let categories = stmt
            .query_map([], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    color: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    fn create_category(&self, name: &str, color: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO categories (name, color) VALUES (?1, ?2)",
            params![name, color],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}

impl HabitRepository for SqliteRepository {
    fn list_active_habits(&self) -> Result<Vec<Habit>> {
        self.list_habits_by_status(HabitStatus::Active)
    }

    fn list_habits_by_status(&self, status: HabitStatus) -> Result<Vec<Habit>> {
        self.habits_where("h.status = ?1", &[&status.as_str()])
    }

    fn get_habit(&self, id: i64) -> Result<Option<Habit>> {
        let habit = self
            .habits_where("h.id = ?1", &[&id])?
            .into_iter()
            .next();
        Ok(habit)
    }

    fn create_habit(&self, draft: &HabitDraft) -> Result<i64> {
        draft.validate()?;
        self.conn.execute(
            "INSERT INTO habits (name, description, plan, unit_type, unit_label, target_value, color, category_id, pinned, created_at, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 'active')",
            params![
                draft.name.trim(),
                draft.description,
                draft.plan,
                draft.unit_type.as_str(),
                draft.unit_label,
                draft.target_value,
                draft.color,
                draft.category_id,
                draft.pinned,
                Utc::now().timestamp_millis(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_habit(&self, id: i64, draft: &HabitDraft) -> Result<()> {
        draft.validate()?;
        self.conn.execute(
            "UPDATE habits SET name = ?1, description = ?2, plan = ?3, unit_type = ?4, unit_label = ?5,
                target_value = ?6, color = ?7, category_id = ?8, pinned = ?9
             WHERE id = ?10",
            params![
                draft.name.trim(),
                draft.description,
                draft.plan,
                draft.unit_type.as_str(),
                draft.unit_label,
                draft.target_value,
                draft.color,
                draft.category_id,
                draft.pinned,
                id,
            ],
        )?;
        Ok(())
    }

    fn set_habit_status(&self, id: i64, status: HabitStatus) -> Result<()> {
        let Some(current) = self.get_habit(id)? else {
            return Ok(());
        };
        current.status.transition(status)?;
        if status == HabitStatus::Deleted {
            return self.soft_delete_habit(id);
        }
        self.conn.execute(
            "UPDATE habits SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        Ok(())
    }

    fn soft_delete_habit(&self, id: i64) -> Result<()> {
        self.conn.execute(
            "UPDATE habits SET status = 'deleted', deleted_at = ?1 WHERE id = ?2 AND status != 'deleted'",
            params![Utc::now().timestamp_millis(), id],
        )?;
        Ok(())
    }
}

impl CheckInRepository for SqliteRepository {
    fn create_check_in(&self, habit_id: i64, message: &str, value: i64, target_value: i64) -> Result<i64> {
        self.create_check_in_at(habit_id, message, value, target_value, Utc::now().timestamp_millis())
    }

    fn create_check_in_at(
        &self,
        habit_id: i64,
        message: &str,
        value: i64,
        target_value: i64,
        timestamp: i64,
    ) -> Result<i64> {
        let date_string = date_string_for_timestamp(timestamp, self.day_start_hour)
            .ok_or_else(|| DbError::InvalidData(format!("timestamp out of range: {timestamp}")))?;
        self.conn.execute(
            "INSERT INTO check_ins (habit_id, message, value, target_value, timestamp, date_string)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![habit_id, message, value, target_value, timestamp, date_string],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_check_in(&self, id: i64) -> Result<Option<CheckIn>> {
        self.conn
            .query_row(
                &format!("SELECT {CHECK_IN_COLUMNS} FROM check_ins WHERE id = ?1"),
                params![id],
                Self::row_to_check_in,
            )
            .optional()
            .map_err(Into::into)
    }

    fn update_check_in(&self, id: i64, message: &str, value: i64) -> Result<()> {
        self.conn.execute(
            "UPDATE check_ins SET message = ?1, value = ?2 WHERE id = ?3",
            params![message, value, id],
        )?;
        Ok(())
    }

    fn delete_check_in(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM check_ins WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn list_check_ins(&self) -> Result<Vec<CheckIn>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CHECK_IN_COLUMNS} FROM check_ins ORDER BY timestamp DESC, id DESC"
        ))?;
        let check_ins = stmt
            .query_map([], Self::row_to_check_in)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(check_ins)
    }

    fn list_check_ins_for_habit(&self, habit_id: i64) -> Result<Vec<CheckIn>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CHECK_IN_COLUMNS} FROM check_ins WHERE habit_id = ?1 ORDER BY timestamp DESC, id DESC"
        ))?;
        let check_ins = stmt
            .query_map(params![habit_id], Self::row_to_check_in)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(check_ins)
    }
}

impl StatsRepository for SqliteRepository {
    fn habit_stats(&self, habit_id: i64) -> Result<HabitStats> {
        self.conn
            .query_row(
                "SELECT COALESCE(SUM(value), 0), MAX(timestamp) FROM check_ins WHERE habit_id = ?1",
                params![habit_id],
                |row| {
                    Ok(HabitStats {
                        total: row.get(0)?,
                        last_timestamp: row.get(1)?,
                    })
                },
            )
            .map_err(Into::into)
    }

    fn all_habit_stats(&self) -> Result<HashMap<i64, HabitStats>> {
        let mut stmt = self.conn.prepare(
            "SELECT habit_id, COALESCE(SUM(value), 0), MAX(timestamp) FROM check_ins GROUP BY habit_id",
        )?;
        let stats = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    HabitStats {
                        total: row.get(1)?,
                        last_timestamp: row.get(2)?,
                    },
                ))
            })?
            .collect::<std::result::Result<HashMap<_, _>, _>>()?;
        Ok(stats)
    }

    fn global_contributions(&self) -> Result<Vec<DailyContribution>> {
        let mut stmt = self.conn.prepare(
            "SELECT date_string, SUM(value), MAX(target_value)
             FROM check_ins
             GROUP BY date_string
             ORDER BY date_string",
        )?;
        let rows = stmt
            .query_map([], Self::row_to_contribution)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn habit_contributions(&self, habit_id: i64) -> Result<Vec<DailyContribution>> {
        let mut stmt = self.conn.prepare(
            "SELECT date_string, SUM(value), MAX(target_value)
             FROM check_ins
             WHERE habit_id = ?1
             GROUP BY date_string
             ORDER BY date_string",
        )?;
        let rows = stmt
            .query_map(params![habit_id], Self::row_to_contribution)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl TimelineRepository for SqliteRepository {
    fn recent_activities(&self, limit: usize) -> Result<Vec<TimelineActivity>> {
        Ok(merge_activities(
            self.check_in_events(limit)?,
            self.create_events(limit)?,
            self.delete_events(limit)?,
            limit,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn repo() -> SqliteRepository {
        SqliteRepository::open_in_memory().unwrap()
    }

    fn habit(repo: &SqliteRepository, name: &str) -> i64 {
        repo.create_habit(&HabitDraft::named(name)).unwrap()
    }

    #[test]
    fn categories_are_seeded_in_id_order() {
        let repo = repo();
        let categories = repo.list_categories().unwrap();
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Programming", "Health", "Learning", "Finance", "Hobbies"]);
    }

    #[test]
    fn active_habits_newest_first_with_category_color() {
        let repo = repo();
        let health = repo.list_categories().unwrap()[1].clone();
        let older = repo
            .create_habit(&HabitDraft {
                category_id: Some(health.id),
                color: "#ffffff".into(),
                ..HabitDraft::named("stretch")
            })
            .unwrap();
        let newer = habit(&repo, "read");
        repo.conn
            .execute("UPDATE habits SET created_at = created_at + 1000 WHERE id = ?1", [newer])
            .unwrap();

        let habits = repo.list_active_habits().unwrap();
        assert_eq!(habits.iter().map(|h| h.id).collect::<Vec<_>>(), vec![newer, older]);
        assert_eq!(habits[1].color, health.color);
        assert_eq!(habits[1].category_name.as_deref(), Some("Health"));
        assert_eq!(habits[0].color, "#238636");
        assert_eq!(habits[0].category_name, None);
    }

    #[test]
    fn create_rejects_invalid_drafts() {
        let repo = repo();
        assert!(matches!(
            repo.create_habit(&HabitDraft::named("")),
            Err(DbError::Validation(_))
        ));
        assert!(repo.list_active_habits().unwrap().is_empty());
    }

    #[test]
    fn update_replaces_mutable_fields() {
        let repo = repo();
        let id = habit(&repo, "read");
        let draft = HabitDraft {
            description: "pages".into(),
            plan: "# Plan".into(),
            unit_type: UnitType::Count,
            unit_label: "pages".into(),
            target_value: 20,
            pinned: true,
            ..HabitDraft::named("read more")
        };
        repo.update_habit(id, &draft).unwrap();

        let stored = repo.get_habit(id).unwrap().unwrap();
        assert_eq!(stored.name, "read more");
        assert_eq!(stored.plan, "# Plan");
        assert_eq!(stored.unit_type, UnitType::Count);
        assert_eq!(stored.target_value, 20);
        assert!(stored.pinned);
        assert_eq!(stored.status, HabitStatus::Active);
    }

    #[test]
    fn archive_and_restore() {
        let repo = repo();
        let id = habit(&repo, "read");
        repo.set_habit_status(id, HabitStatus::Archived).unwrap();
        assert!(repo.list_active_habits().unwrap().is_empty());
        assert_eq!(repo.list_habits_by_status(HabitStatus::Archived).unwrap().len(), 1);

        repo.set_habit_status(id, HabitStatus::Active).unwrap();
        assert_eq!(repo.list_active_habits().unwrap().len(), 1);
    }

    #[test]
    fn deleted_is_terminal() {
        let repo = repo();
        let id = habit(&repo, "read");
        repo.soft_delete_habit(id).unwrap();
        let deleted_at = repo.get_habit(id).unwrap().unwrap().deleted_at;
        assert!(deleted_at.is_some());

        assert!(matches!(
            repo.set_habit_status(id, HabitStatus::Active),
            Err(DbError::Validation(_))
        ));
        repo.soft_delete_habit(id).unwrap();
        assert_eq!(repo.get_habit(id).unwrap().unwrap().deleted_at, deleted_at);
    }

    #[test]
    fn check_in_round_trip() {
        let repo = repo();
        let h = habit(&repo, "read");
        let id = repo.create_check_in(h, "msg", 3, 5).unwrap();
        repo.update_check_in(id, "msg2", 4).unwrap();

        let stored = repo.get_check_in(id).unwrap().unwrap();
        assert_eq!(stored.value, 4);
        assert_eq!(stored.message, "msg2");
        assert_eq!(stored.target_value, 5);
        assert_eq!(stored.date_string.len(), 10);
    }

    #[test]
    fn date_string_is_fixed_at_creation() {
        let repo = repo().with_day_start_hour(4);
        let h = habit(&repo, "read");
        let ts = Utc::now().timestamp_millis();
        let id = repo.create_check_in_at(h, "", 1, 1, ts).unwrap();
        let expected = date_string_for_timestamp(ts, 4).unwrap();
        assert_eq!(repo.get_check_in(id).unwrap().unwrap().date_string, expected);
    }

    #[test]
    fn delete_check_in_removes_row() {
        let repo = repo();
        let h = habit(&repo, "read");
        let id = repo.create_check_in(h, "", 1, 1).unwrap();
        repo.delete_check_in(id).unwrap();
        assert_eq!(repo.get_check_in(id).unwrap(), None);
        assert!(repo.list_check_ins_for_habit(h).unwrap().is_empty());
    }

    #[test]
    fn stats_sum_values_and_track_latest() {
        let repo = repo();
        let h = habit(&repo, "read");
        repo.create_check_in_at(h, "", 2, 1, 1_700_000_000_000).unwrap();
        repo.create_check_in_at(h, "", 5, 1, 1_700_000_500_000).unwrap();
        repo.create_check_in_at(h, "", 1, 1, 1_700_000_100_000).unwrap();

        let stats = repo.habit_stats(h).unwrap();
        assert_eq!(stats.total, 8);
        assert_eq!(stats.last_timestamp, Some(1_700_000_500_000));
        assert_eq!(repo.all_habit_stats().unwrap().get(&h), Some(&stats));
    }

    #[test]
    fn missing_habit_yields_zeroed_results() {
        let repo = repo();
        assert_eq!(
            repo.habit_stats(999).unwrap(),
            HabitStats {
                total: 0,
                last_timestamp: None
            }
        );
        assert!(repo.habit_contributions(999).unwrap().is_empty());
        assert!(repo.list_check_ins_for_habit(999).unwrap().is_empty());
        assert_eq!(repo.get_habit(999).unwrap(), None);
        repo.update_check_in(999, "x", 1).unwrap();
        repo.soft_delete_habit(999).unwrap();
        repo.set_habit_status(999, HabitStatus::Archived).unwrap();
    }

    #[test]
    fn contributions_sum_per_day_with_max_target() {
        let repo = repo();
        let a = habit(&repo, "a");
        let b = habit(&repo, "b");
        repo.conn
            .execute_batch(&format!(
                "INSERT INTO check_ins (habit_id, message, value, target_value, timestamp, date_string) VALUES
                    ({a}, '', 2, 3, 1, '2024-01-01'),
                    ({a}, '', 1, 4, 2, '2024-01-01'),
                    ({b}, '', 5, 1, 3, '2024-01-01'),
                    ({a}, '', 1, 4, 4, '2024-01-02');"
            ))
            .unwrap();

        let global = repo.global_contributions().unwrap();
        assert_eq!(
            global,
            vec![
                DailyContribution {
                    date_string: "2024-01-01".into(),
                    count: 8,
                    target_value: Some(4),
                },
                DailyContribution {
                    date_string: "2024-01-02".into(),
                    count: 1,
                    target_value: Some(4),
                },
            ]
        );
        let only_b = repo.habit_contributions(b).unwrap();
        assert_eq!(only_b.len(), 1);
        assert_eq!(only_b[0].count, 5);
    }

    #[test]
    fn timeline_unions_three_event_kinds() {
        let repo = repo();
        let a = habit(&repo, "a");
        let b = habit(&repo, "b");
        repo.conn
            .execute_batch(&format!(
                "UPDATE habits SET created_at = 100 WHERE id = {a};
                 UPDATE habits SET created_at = 200 WHERE id = {b};"
            ))
            .unwrap();
        repo.create_check_in_at(a, "first", 1, 1, 300).unwrap();
        repo.create_check_in_at(b, "second", 2, 1, 400).unwrap();
        repo.soft_delete_habit(b).unwrap();
        repo.conn
            .execute("UPDATE habits SET deleted_at = 500 WHERE id = ?1", [b])
            .unwrap();

        let feed = repo.recent_activities(DEFAULT_TIMELINE_LIMIT).unwrap();
        let ids: Vec<String> = feed.iter().map(TimelineActivity::id).collect();
        assert_eq!(
            ids,
            vec![
                format!("delete_{b}"),
                "check_in_2".to_string(),
                "check_in_1".to_string(),
                format!("create_{b}"),
                format!("create_{a}"),
            ]
        );
        assert_eq!(feed[0].habit_name, "b");
        assert_eq!(feed[1].habit_name, "b");

        let capped = repo.recent_activities(2).unwrap();
        assert_eq!(capped.len(), 2);
    }

    #[test]
    fn archived_habits_have_no_delete_event() {
        let repo = repo();
        let a = habit(&repo, "a");
        repo.set_habit_status(a, HabitStatus::Archived).unwrap();
        let feed = repo.recent_activities(10).unwrap();
        assert!(feed.iter().all(|e| e.kind != ActivityKind::Delete));
    }
}
