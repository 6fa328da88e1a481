//! Core types for the habit tracker.

use crate::error::{Result, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category a habit belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
}

/// How a habit measures completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Count,
    Binary,
}

impl Default for UnitType {
    fn default() -> Self {
        Self::Binary
    }
}

impl UnitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Binary => "binary",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "count" => Some(Self::Count),
            "binary" => Some(Self::Binary),
            _ => None,
        }
    }
}

/// Habit lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitStatus {
    Active,
    Archived,
    Deleted,
}

impl Default for HabitStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl HabitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
            Self::Deleted => "deleted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "archived" => Some(Self::Archived),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }

    /// Whether a habit may move from this status to `next`.
    ///
    /// Active and archived swap freely; either may be deleted; deleted is terminal.
    pub fn can_transition_to(self, next: HabitStatus) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Archived)
                | (Self::Archived, Self::Active)
                | (Self::Active, Self::Deleted)
                | (Self::Archived, Self::Deleted)
        )
    }

    /// Validate a transition, returning the target status.
    pub fn transition(self, next: HabitStatus) -> Result<HabitStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ValidationError::InvalidTransition {
                from: self.as_str(),
                to: next.as_str(),
            })
        }
    }
}

/// A tracked habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub plan: String,
    pub unit_type: UnitType,
    pub unit_label: String,
    pub target_value: i64,
    /// Effective color: the category color when the habit has a category.
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
    pub status: HabitStatus,
    pub pinned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

/// The user-editable fields of a habit, used for both create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitDraft {
    pub name: String,
    pub description: String,
    pub plan: String,
    pub unit_type: UnitType,
    pub unit_label: String,
    pub target_value: i64,
    pub color: String,
    pub category_id: Option<i64>,
    pub pinned: bool,
}

impl Default for HabitDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            plan: String::new(),
            unit_type: UnitType::Binary,
            unit_label: "done".to_string(),
            target_value: 1,
            color: DEFAULT_HABIT_COLOR.to_string(),
            category_id: None,
            pinned: false,
        }
    }
}

/// Stored color for habits created without an explicit one.
pub const DEFAULT_HABIT_COLOR: &str = "#238636";

impl HabitDraft {
    /// Draft with the given name and defaults for everything else.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Reject drafts that must never reach storage.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.target_value < 1 {
            return Err(ValidationError::TargetBelowOne {
                value: self.target_value,
            });
        }
        Ok(())
    }
}

/// One recorded completion ("commit") of a habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: i64,
    pub habit_id: i64,
    pub message: String,
    pub value: i64,
    /// Daily target in effect when the check-in was made.
    pub target_value: i64,
    /// Epoch milliseconds.
    pub timestamp: i64,
    /// Local calendar day, `YYYY-MM-DD`, fixed at creation.
    pub date_string: String,
}

/// Running totals for a single habit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitStats {
    pub total: i64,
    pub last_timestamp: Option<i64>,
}

/// One day's aggregate as returned by a contribution query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyContribution {
    pub date_string: String,
    pub count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<i64>,
}

/// Summed value for a single day in a [`ContributionMap`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTotal {
    pub count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<i64>,
}

/// Date-keyed summed check-in values, global or for one habit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContributionMap {
    days: BTreeMap<String, DayTotal>,
}

impl ContributionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from query rows. Rows for the same day are summed.
    pub fn from_rows(rows: impl IntoIterator<Item = DailyContribution>) -> Self {
        let mut map = Self::new();
        for row in rows {
            let entry = map.days.entry(row.date_string).or_default();
            entry.count += row.count;
            entry.target_value = match (entry.target_value, row.target_value) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            };
        }
        map
    }

    /// Summed value for a day, zero when absent.
    pub fn count(&self, date_string: &str) -> i64 {
        self.days.get(date_string).map_or(0, |d| d.count)
    }

    /// Target in effect on a day, if one was recorded.
    pub fn target(&self, date_string: &str) -> Option<i64> {
        self.days.get(date_string).and_then(|d| d.target_value)
    }

    pub fn get(&self, date_string: &str) -> Option<&DayTotal> {
        self.days.get(date_string)
    }

    /// Map of day to recorded target.
    pub fn targets(&self) -> BTreeMap<String, i64> {
        self.days
            .iter()
            .filter_map(|(day, total)| total.target_value.map(|t| (day.clone(), t)))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DayTotal)> {
        self.days.iter()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Kind-specific payload of a timeline activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityKind {
    CheckIn {
        check_in_id: i64,
        message: String,
        value: i64,
    },
    Create,
    Delete,
}

/// One entry of the unified activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineActivity {
    pub habit_id: i64,
    pub habit_name: String,
    pub unit_label: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(flatten)]
    pub kind: ActivityKind,
}

impl TimelineActivity {
    /// Stable identifier, unique across the three event kinds.
    pub fn id(&self) -> String {
        match &self.kind {
            ActivityKind::CheckIn { check_in_id, .. } => format!("check_in_{check_in_id}"),
            ActivityKind::Create => format!("create_{}", self.habit_id),
            ActivityKind::Delete => format!("delete_{}", self.habit_id),
        }
    }

    pub fn is_check_in(&self) -> bool {
        matches!(self.kind, ActivityKind::CheckIn { .. })
    }
}
