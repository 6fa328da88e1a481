//! In-memory source of truth over the repository layer.
//!
//! Every mutation goes through the repository first and is followed by a
//! refresh that reads the durable state back. Refreshes never clear what is
//! already loaded: a failed load is logged and the previous snapshot stays.

pub mod error;
pub mod state;

pub use error::StoreError;
pub use state::{HabitDetail, HabitProgress, StoreState};

use crate::db::{TrackerRepository, DEFAULT_TIMELINE_LIMIT};
use chrono::{Datelike, NaiveDate};
use habit_core::contribution::{available_years, build_grid, year_window, HeatmapSlot};
use habit_core::date_utils::{format_date, get_adjusted_today};
use habit_core::goals::{active_days, goals_met_by_day, live_targets};
use habit_core::heatmap::{goal_progress, grid_levels, HeatLevel};
use habit_core::streak::{check_in_days, current_streak};
use habit_core::timeline::{recent_groups, ActivityGroup};
use habit_core::types::{
    Category, CheckIn, ContributionMap, Habit, HabitDraft, HabitStats, HabitStatus,
    TimelineActivity, UnitType,
};
use habit_core::yearly::{yearly_stats, YearlyStats};
use habit_core::ValidationError;
use state::ActivitySnapshot;
use std::collections::{BTreeMap, HashMap};

type Result<T> = std::result::Result<T, StoreError>;

/// Number of pinned habits surfaced on the home screen.
pub const MAX_PINNED: usize = 4;

pub struct HabitStore<R: TrackerRepository> {
    repo: R,
    state: StoreState,
    details: HashMap<i64, HabitDetail>,
    day_start_hour: u32,
    timeline_limit: usize,
}

impl<R: TrackerRepository> HabitStore<R> {
    /// Wrap a repository. Nothing is loaded until the first refresh.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            state: StoreState::default(),
            details: HashMap::new(),
            day_start_hour: 0,
            timeline_limit: DEFAULT_TIMELINE_LIMIT,
        }
    }

    pub fn with_day_start_hour(mut self, hour: u32) -> Self {
        self.day_start_hour = hour.min(23);
        self
    }

    pub fn with_timeline_limit(mut self, limit: usize) -> Self {
        self.timeline_limit = limit;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn categories(&self) -> &[Category] {
        &self.state.categories
    }

    pub fn habits(&self) -> &[Habit] {
        &self.state.habits
    }

    pub fn habit(&self, id: i64) -> Option<&Habit> {
        self.state.habits.iter().find(|h| h.id == id)
    }

    pub fn check_ins(&self) -> &[CheckIn] {
        &self.state.check_ins
    }

    pub fn recent_activities(&self) -> &[TimelineActivity] {
        &self.state.recent_activities
    }

    pub fn global_contributions(&self) -> &ContributionMap {
        &self.state.global_contributions
    }

    /// Running totals for a habit; zeroed when it has no check-ins.
    pub fn habit_stats(&self, habit_id: i64) -> HabitStats {
        self.state
            .habit_stats
            .get(&habit_id)
            .copied()
            .unwrap_or_default()
    }

    pub fn habit_detail(&self, habit_id: i64) -> Option<&HabitDetail> {
        self.details.get(&habit_id)
    }

    // ==================== Refresh ====================

    /// Reload everything. Safe to call any number of times.
    pub fn refresh_all(&mut self) {
        match self.load_state() {
            Ok(state) => {
                tracing::debug!(
                    habits = state.habits.len(),
                    check_ins = state.check_ins.len(),
                    "store refreshed"
                );
                self.state = state;
            }
            Err(e) => tracing::error!(error = %e, "refresh failed, keeping previous state"),
        }

        let loaded: Vec<i64> = self.details.keys().copied().collect();
        for habit_id in loaded {
            self.refresh_habit_detail(habit_id);
        }
    }

    /// Reload one habit's contributions, per-day targets and stats.
    pub fn refresh_habit_detail(&mut self, habit_id: i64) {
        match self.load_detail(habit_id) {
            Ok(detail) => {
                tracing::debug!(habit_id, days = detail.contributions.len(), "habit detail refreshed");
                self.state.habit_stats.insert(habit_id, detail.stats);
                self.details.insert(habit_id, detail);
            }
            Err(e) => tracing::error!(habit_id, error = %e, "habit detail refresh failed, keeping previous state"),
        }
    }

    fn refresh_activity(&mut self) {
        match self.load_activity() {
            Ok(snapshot) => {
                self.state.check_ins = snapshot.check_ins;
                self.state.recent_activities = snapshot.recent_activities;
                self.state.global_contributions = snapshot.global_contributions;
            }
            Err(e) => tracing::error!(error = %e, "activity refresh failed, keeping previous state"),
        }
    }

    fn load_state(&self) -> Result<StoreState> {
        Ok(StoreState {
            categories: self.repo.list_categories()?,
            habits: self.repo.list_active_habits()?,
            check_ins: self.repo.list_check_ins()?,
            recent_activities: self.repo.recent_activities(self.timeline_limit)?,
            global_contributions: ContributionMap::from_rows(self.repo.global_contributions()?),
            habit_stats: self.repo.all_habit_stats()?,
        })
    }

    fn load_detail(&self, habit_id: i64) -> Result<HabitDetail> {
        let contributions = ContributionMap::from_rows(self.repo.habit_contributions(habit_id)?);
        Ok(HabitDetail {
            habit_id,
            targets: contributions.targets(),
            contributions,
            stats: self.repo.habit_stats(habit_id)?,
        })
    }

    fn load_activity(&self) -> Result<ActivitySnapshot> {
        Ok(ActivitySnapshot {
            check_ins: self.repo.list_check_ins()?,
            recent_activities: self.repo.recent_activities(self.timeline_limit)?,
            global_contributions: ContributionMap::from_rows(self.repo.global_contributions()?),
        })
    }

    /// After a check-in changes: that habit's detail plus the global feeds.
    fn refresh_after_check_in(&mut self, habit_id: i64) {
        self.refresh_habit_detail(habit_id);
        self.refresh_activity();
    }

    // ==================== Mutations ====================

    /// Create a habit and return its id.
    pub fn add_habit(&mut self, draft: &HabitDraft) -> Result<i64> {
        let result = draft
            .validate()
            .map_err(StoreError::from)
            .and_then(|()| self.repo.create_habit(draft).map_err(StoreError::from));
        let id = logged("add habit", result)?;
        tracing::info!(habit_id = id, name = %draft.name, "habit created");
        self.refresh_all();
        Ok(id)
    }

    /// Replace a habit's editable fields.
    pub fn update_habit(&mut self, id: i64, draft: &HabitDraft) -> Result<()> {
        let result = draft
            .validate()
            .map_err(StoreError::from)
            .and_then(|()| self.require_habit(id))
            .and_then(|_| self.repo.update_habit(id, draft).map_err(StoreError::from));
        logged("update habit", result)?;
        self.refresh_all();
        Ok(())
    }

    /// Soft-delete a habit. Its check-ins stay on disk.
    pub fn remove_habit(&mut self, id: i64) -> Result<()> {
        let result = self
            .require_habit(id)
            .and_then(|habit| {
                habit.status.transition(HabitStatus::Deleted)?;
                Ok(())
            })
            .and_then(|()| self.repo.soft_delete_habit(id).map_err(StoreError::from));
        logged("remove habit", result)?;
        tracing::info!(habit_id = id, "habit deleted");
        self.details.remove(&id);
        self.refresh_all();
        Ok(())
    }

    pub fn archive_habit(&mut self, id: i64) -> Result<()> {
        self.change_status(id, HabitStatus::Archived)
    }

    pub fn restore_habit(&mut self, id: i64) -> Result<()> {
        self.change_status(id, HabitStatus::Active)
    }

    fn change_status(&mut self, id: i64, status: HabitStatus) -> Result<()> {
        let result = self
            .require_habit(id)
            .and_then(|habit| {
                habit.status.transition(status)?;
                Ok(())
            })
            .and_then(|()| self.repo.set_habit_status(id, status).map_err(StoreError::from));
        logged("change habit status", result)?;
        tracing::info!(habit_id = id, status = status.as_str(), "habit status changed");
        self.refresh_all();
        Ok(())
    }

    /// Record a commit for a habit and return the check-in id.
    ///
    /// Binary habits always record 1. The habit's current target is stored
    /// with the check-in.
    pub fn commit_check_in(&mut self, habit_id: i64, message: &str, value: i64) -> Result<i64> {
        let result = self.require_habit(habit_id).and_then(|habit| {
            let value = match habit.unit_type {
                UnitType::Binary => 1,
                UnitType::Count => positive(value)?,
            };
            self.repo
                .create_check_in(habit_id, message.trim(), value, habit.target_value)
                .map_err(StoreError::from)
        });
        let id = logged("commit check-in", result)?;
        tracing::debug!(habit_id, check_in_id = id, "check-in recorded");
        self.refresh_after_check_in(habit_id);
        Ok(id)
    }

    /// Change a check-in's message and value. Its day and target stay.
    ///
    /// Check-ins of binary habits keep the value 1.
    pub fn update_check_in(&mut self, id: i64, message: &str, value: i64) -> Result<()> {
        let result = positive(value)
            .map_err(StoreError::from)
            .and_then(|value| self.require_check_in(id).map(|c| (c, value)))
            .and_then(|(check_in, value)| {
                let value = match self.repo.get_habit(check_in.habit_id)? {
                    Some(habit) if habit.unit_type == UnitType::Binary => 1,
                    _ => value,
                };
                self.repo
                    .update_check_in(id, message.trim(), value)
                    .map(|()| check_in.habit_id)
                    .map_err(StoreError::from)
            });
        let habit_id = logged("update check-in", result)?;
        self.refresh_after_check_in(habit_id);
        Ok(())
    }

    pub fn remove_check_in(&mut self, id: i64) -> Result<()> {
        let result = self.require_check_in(id).and_then(|check_in| {
            self.repo
                .delete_check_in(id)
                .map(|()| check_in.habit_id)
                .map_err(StoreError::from)
        });
        let habit_id = logged("remove check-in", result)?;
        self.refresh_after_check_in(habit_id);
        Ok(())
    }

    /// Create a category and return its id.
    pub fn add_category(&mut self, name: &str, color: &str) -> Result<i64> {
        let result = if name.trim().is_empty() {
            Err(StoreError::Validation(ValidationError::EmptyName))
        } else {
            self.repo
                .create_category(name.trim(), color)
                .map_err(StoreError::from)
        };
        let id = logged("add category", result)?;
        self.refresh_all();
        Ok(id)
    }

    /// Wipe all data and reload the freshly seeded store.
    pub fn reset(&mut self) -> Result<()>
    where
        R: Resettable,
    {
        logged("reset", self.repo.reset_all().map_err(StoreError::from))?;
        self.details.clear();
        self.refresh_all();
        Ok(())
    }

    fn require_habit(&self, id: i64) -> Result<Habit> {
        match self.repo.get_habit(id)? {
            Some(habit) if habit.status != HabitStatus::Deleted => Ok(habit),
            _ => Err(StoreError::HabitNotFound(id)),
        }
    }

    fn require_check_in(&self, id: i64) -> Result<CheckIn> {
        self.repo
            .get_check_in(id)?
            .ok_or(StoreError::CheckInNotFound(id))
    }

    // ==================== Derived ====================

    /// Calendar day the store treats as today.
    pub fn today(&self) -> NaiveDate {
        get_adjusted_today(self.day_start_hour)
    }

    /// Consecutive days with any check-in, ending today or yesterday.
    pub fn current_streak(&self) -> u32 {
        current_streak(&check_in_days(&self.state.check_ins), self.today())
    }

    /// Consecutive days on which at least one habit met its goal.
    pub fn goal_streak(&self) -> u32 {
        current_streak(&active_days(&self.goals_met_by_day()), self.today())
    }

    /// Consecutive days with a check-in to one habit.
    pub fn habit_streak(&self, habit_id: i64) -> u32 {
        let check_ins: Vec<CheckIn> = self
            .state
            .check_ins
            .iter()
            .filter(|c| c.habit_id == habit_id)
            .cloned()
            .collect();
        current_streak(&check_in_days(&check_ins), self.today())
    }

    /// Number of habits that met their goal, per day.
    pub fn goals_met_by_day(&self) -> BTreeMap<String, u32> {
        goals_met_by_day(
            &self.state.check_ins,
            &live_targets(&self.state.habits),
            &format_date(self.today()),
        )
    }

    /// Global contribution grid with its heat levels.
    ///
    /// Days mix habits with different targets, so levels scale against the
    /// busiest day in view.
    pub fn contribution_grid(&self, days: u32, end_date: NaiveDate) -> Vec<(HeatmapSlot, HeatLevel)> {
        let mut slots = build_grid(&self.state.global_contributions, days, end_date);
        for slot in &mut slots {
            slot.target_value = None;
        }
        with_levels(slots, None)
    }

    /// One habit's grid, judged against each day's recorded target and the
    /// live target where none was recorded. Empty until its detail is loaded.
    pub fn habit_grid(&self, habit_id: i64, days: u32, end_date: NaiveDate) -> Vec<(HeatmapSlot, HeatLevel)> {
        let Some(detail) = self.details.get(&habit_id) else {
            return Vec::new();
        };
        let slots = build_grid(&detail.contributions, days, end_date);
        let fallback = self.habit(habit_id).map(|h| h.target_value);
        with_levels(slots, fallback)
    }

    /// Grid bounds for showing a whole year.
    pub fn year_window(&self, year: i32) -> (u32, NaiveDate) {
        year_window(year, self.today())
    }

    pub fn available_years(&self) -> Vec<i32> {
        available_years(&self.state.check_ins, self.today().year())
    }

    pub fn yearly_stats(&self, year: i32) -> YearlyStats {
        yearly_stats(year, &self.state.check_ins, &self.state.habits, self.today())
    }

    /// Grouped feed for the home screen.
    pub fn timeline_groups(&self) -> Vec<ActivityGroup> {
        recent_groups(&self.state.recent_activities)
    }

    pub fn pinned_habits(&self) -> Vec<&Habit> {
        self.state
            .habits
            .iter()
            .filter(|h| h.pinned)
            .take(MAX_PINNED)
            .collect()
    }

    /// Today's progress for every active habit, in list order.
    pub fn today_progress(&self) -> Vec<HabitProgress> {
        let today = format_date(self.today());
        let mut totals: HashMap<i64, i64> = HashMap::new();
        for check_in in self.state.check_ins.iter().filter(|c| c.date_string == today) {
            *totals.entry(check_in.habit_id).or_insert(0) += check_in.value;
        }
        self.state
            .habits
            .iter()
            .map(|habit| {
                let today_value = totals.get(&habit.id).copied().unwrap_or(0);
                HabitProgress {
                    habit_id: habit.id,
                    today_value,
                    target_value: habit.target_value,
                    progress: goal_progress(today_value, habit.target_value),
                }
            })
            .collect()
    }
}

/// Repositories that can drop and recreate all data.
pub trait Resettable {
    fn reset_all(&self) -> std::result::Result<(), crate::db::DbError>;
}

impl Resettable for crate::db::SqliteRepository {
    fn reset_all(&self) -> std::result::Result<(), crate::db::DbError> {
        self.reset().map(|_| ())
    }
}

fn positive(value: i64) -> habit_core::Result<i64> {
    if value > 0 {
        Ok(value)
    } else {
        Err(ValidationError::NonPositiveValue { value })
    }
}

fn with_levels(slots: Vec<HeatmapSlot>, fallback_target: Option<i64>) -> Vec<(HeatmapSlot, HeatLevel)> {
    let levels = grid_levels(&slots, fallback_target);
    slots.into_iter().zip(levels).collect()
}

fn logged<T>(action: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        tracing::error!(action, error = %e, "mutation failed");
    }
    result
}
