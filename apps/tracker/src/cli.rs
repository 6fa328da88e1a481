//! Command-line front end. Every command prints JSON.

use crate::db::{HabitRepository, SqliteRepository};
use crate::store::HabitStore;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use habit_core::contribution::week_columns;
use habit_core::timeline::PREVIEW_COMMITS;
use habit_core::types::{HabitDraft, HabitStatus, UnitType};
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "githabit", version, about = "Track habits as commits")]
pub struct Cli {
    /// Database file; overrides GITHABIT_DB_PATH.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Streaks, today's progress and pinned habits.
    Summary,

    /// List habits with their running totals.
    Habits {
        /// active, archived or deleted.
        #[arg(long, default_value = "active")]
        status: String,
    },

    /// List categories.
    Categories,

    /// Create a category.
    AddCategory {
        name: String,
        #[arg(long, default_value = "#238636")]
        color: String,
    },

    /// Create a habit.
    AddHabit {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        plan: String,
        /// Track a quantity instead of done/not done.
        #[arg(long)]
        count: bool,
        #[arg(long)]
        unit_label: Option<String>,
        #[arg(long, default_value = "1")]
        target: i64,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        category: Option<i64>,
        #[arg(long)]
        pinned: bool,
    },

    /// Record a check-in.
    Commit {
        habit_id: i64,
        #[arg(short, long, default_value = "")]
        message: String,
        #[arg(long, default_value = "1")]
        value: i64,
    },

    /// Change a check-in's message and value.
    EditCommit {
        id: i64,
        #[arg(short, long, default_value = "")]
        message: String,
        #[arg(long)]
        value: i64,
    },

    /// Delete a check-in.
    RemoveCommit { id: i64 },

    /// Hide a habit without deleting it.
    Archive { id: i64 },

    /// Bring an archived habit back.
    Restore { id: i64 },

    /// Soft-delete a habit.
    RemoveHabit { id: i64 },

    /// Grouped recent activity.
    Timeline {
        /// Show every commit in each group.
        #[arg(long)]
        expanded: bool,
    },

    /// Contribution grid as week columns.
    Heatmap {
        /// Restrict to one habit.
        #[arg(long)]
        habit: Option<i64>,
        /// Show a whole calendar year.
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, default_value = "365", value_parser = clap::value_parser!(u32).range(1..=3660))]
        days: u32,
    },

    /// Yearly statistics.
    Year {
        year: Option<i32>,
    },

    /// Drop all data and reseed.
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

/// Run one command against a loaded store.
pub fn execute(store: &mut HabitStore<SqliteRepository>, command: Command) -> Result<Value> {
    let output = match command {
        Command::Summary => json!({
            "current_streak": store.current_streak(),
            "goal_streak": store.goal_streak(),
            "habits": store.habits().len(),
            "check_ins": store.check_ins().len(),
            "today": store.today_progress(),
            "pinned": store.pinned_habits(),
        }),

        Command::Habits { status } => {
            let status = HabitStatus::from_str(&status)
                .with_context(|| format!("unknown status {status:?}"))?;
            let habits = store.repository().list_habits_by_status(status)?;
            let rows: Vec<Value> = habits
                .iter()
                .map(|h| {
                    json!({
                        "habit": h,
                        "stats": store.habit_stats(h.id),
                        "streak": store.habit_streak(h.id),
                    })
                })
                .collect();
            json!(rows)
        }

        Command::Categories => json!(store.categories()),

        Command::AddCategory { name, color } => {
            let id = store.add_category(&name, &color)?;
            json!({ "id": id })
        }

        Command::AddHabit {
            name,
            description,
            plan,
            count,
            unit_label,
            target,
            color,
            category,
            pinned,
        } => {
            let defaults = HabitDraft::default();
            let unit_type = if count { UnitType::Count } else { UnitType::Binary };
            let draft = HabitDraft {
                name,
                description,
                plan,
                unit_type,
                unit_label: unit_label.unwrap_or(defaults.unit_label),
                target_value: target,
                color: color.unwrap_or(defaults.color),
                category_id: category,
                pinned,
            };
            let id = store.add_habit(&draft)?;
            json!({ "id": id })
        }

        Command::Commit {
            habit_id,
            message,
            value,
        } => {
            let id = store.commit_check_in(habit_id, &message, value)?;
            json!({ "id": id, "stats": store.habit_stats(habit_id) })
        }

        Command::EditCommit { id, message, value } => {
            store.update_check_in(id, &message, value)?;
            json!({ "id": id })
        }

        Command::RemoveCommit { id } => {
            store.remove_check_in(id)?;
            json!({ "id": id })
        }

        Command::Archive { id } => {
            store.archive_habit(id)?;
            json!({ "id": id, "status": HabitStatus::Archived })
        }

        Command::Restore { id } => {
            store.restore_habit(id)?;
            json!({ "id": id, "status": HabitStatus::Active })
        }

        Command::RemoveHabit { id } => {
            store.remove_habit(id)?;
            json!({ "id": id, "status": HabitStatus::Deleted })
        }

        Command::Timeline { expanded } => {
            let groups: Vec<Value> = store
                .timeline_groups()
                .iter()
                .map(|g| {
                    json!({
                        "id": g.id,
                        "kind": g.kind,
                        "habit_id": g.habit_id,
                        "habit_name": g.habit_name,
                        "timestamp": g.timestamp,
                        "activities": g.visible(expanded, PREVIEW_COMMITS),
                        "hidden": if expanded { 0 } else { g.hidden_count(PREVIEW_COMMITS) },
                    })
                })
                .collect();
            json!(groups)
        }

        Command::Heatmap { habit, year, days } => {
            let (days, end_date) = match year {
                Some(year) => store.year_window(year),
                None => (days, store.today()),
            };
            let cells = match habit {
                Some(habit_id) => {
                    match store.repository().get_habit(habit_id)? {
                        Some(habit) if habit.status != HabitStatus::Deleted => {}
                        _ => bail!("habit {habit_id} not found"),
                    }
                    store.refresh_habit_detail(habit_id);
                    store.habit_grid(habit_id, days, end_date)
                }
                None => store.contribution_grid(days, end_date),
            };
            let slots: Vec<_> = cells.iter().map(|(slot, _)| slot.clone()).collect();
            let levels: Vec<_> = cells.iter().map(|(_, level)| *level).collect();
            let weeks: Vec<Value> = week_columns(&slots)
                .into_iter()
                .zip(levels.chunks(7))
                .map(|(week, levels)| {
                    let days: Vec<Value> = week
                        .iter()
                        .zip(levels)
                        .map(|(slot, level)| {
                            json!({
                                "date": slot.date_string,
                                "count": slot.count,
                                "level": level.level,
                                "goal_met": level.goal_met,
                            })
                        })
                        .collect();
                    json!(days)
                })
                .collect();
            json!({ "end_date": end_date, "days": days, "weeks": weeks })
        }

        Command::Year { year } => {
            let year = year.unwrap_or_else(|| chrono::Datelike::year(&store.today()));
            json!({
                "available_years": store.available_years(),
                "stats": store.yearly_stats(year),
            })
        }

        Command::Reset { yes } => {
            if !yes {
                bail!("reset deletes every habit and check-in; pass --yes to confirm");
            }
            store.reset()?;
            json!({ "reset": true })
        }
    };
    Ok(output)
}
