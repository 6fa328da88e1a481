//! In-memory snapshots held by the store.

use habit_core::types::{Category, CheckIn, ContributionMap, Habit, HabitStats, TimelineActivity};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Everything `refresh_all` loads, replaced as a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreState {
    pub categories: Vec<Category>,
    /// Active habits, newest first.
    pub habits: Vec<Habit>,
    /// All check-ins, newest first.
    pub check_ins: Vec<CheckIn>,
    pub recent_activities: Vec<TimelineActivity>,
    pub global_contributions: ContributionMap,
    pub habit_stats: HashMap<i64, HabitStats>,
}

/// Everything `refresh_habit_detail` loads for one habit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HabitDetail {
    pub habit_id: i64,
    pub contributions: ContributionMap,
    /// Highest target recorded per day.
    pub targets: BTreeMap<String, i64>,
    pub stats: HabitStats,
}

/// Check-in mutations reload only these.
#[derive(Debug, Clone, Default)]
pub(crate) struct ActivitySnapshot {
    pub check_ins: Vec<CheckIn>,
    pub recent_activities: Vec<TimelineActivity>,
    pub global_contributions: ContributionMap,
}

/// Today's progress toward one habit's daily goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitProgress {
    pub habit_id: i64,
    pub today_value: i64,
    pub target_value: i64,
    /// `today_value / target_value`, clamped to `0.0..=1.0`.
    pub progress: f64,
}
