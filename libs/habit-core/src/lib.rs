//! Core habit-tracking library shared by the tracker application.
//!
//! Provides:
//! - Shared types (Habit, CheckIn, ContributionMap, TimelineActivity, etc.)
//! - Calendar-day utilities
//! - Contribution grid construction and heatmap level bucketing
//! - Streak detection and goal completion per day
//! - Timeline merging/grouping and yearly statistics

pub mod contribution;
pub mod date_utils;
pub mod error;
pub mod goals;
pub mod heatmap;
pub mod streak;
pub mod timeline;
pub mod types;
pub mod yearly;

pub use contribution::{available_years, build_grid, week_columns, year_window, HeatmapSlot};
pub use error::{Result, ValidationError};
pub use goals::{active_days, goals_met_by_day, live_targets};
pub use heatmap::{goal_progress, grid_levels, heat_level, HeatLevel};
pub use streak::{check_in_days, current_streak, longest_streak};
pub use timeline::{group_activities, merge_activities, recent_groups, ActivityGroup, GroupKind};
pub use types::{
    ActivityKind, Category, CheckIn, ContributionMap, DailyContribution, DayTotal, Habit,
    HabitDraft, HabitStats, HabitStatus, TimelineActivity, UnitType,
};
pub use yearly::{yearly_stats, BusiestDay, TopHabit, YearlyStats};
