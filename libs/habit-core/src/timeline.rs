//! Unified activity feed: merging event producers and grouping commits.

use crate::types::{ActivityKind, TimelineActivity};
use serde::{Deserialize, Serialize};

/// How many recent activities the grouped feed considers.
pub const GROUPING_WINDOW: usize = 50;

/// How many groups the grouped feed keeps.
pub const MAX_GROUPS: usize = 10;

/// Commits shown per group before the rest are collapsed.
pub const PREVIEW_COMMITS: usize = 2;

/// Merge the check-in, create and delete producers into one feed, newest
/// first, capped at `limit`. Equal timestamps keep producer order.
pub fn merge_activities(
    check_ins: Vec<TimelineActivity>,
    creates: Vec<TimelineActivity>,
    deletes: Vec<TimelineActivity>,
    limit: usize,
) -> Vec<TimelineActivity> {
    let mut all: Vec<TimelineActivity> = check_ins
        .into_iter()
        .chain(creates)
        .chain(deletes)
        .collect();
    all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    all.truncate(limit);
    all
}

/// Kind of a displayed timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    CheckIn,
    Create,
    Delete,
}

/// One displayed entry: a run of commits to one habit, or a single
/// create/delete event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityGroup {
    pub id: String,
    pub kind: GroupKind,
    pub habit_id: i64,
    pub habit_name: String,
    /// Timestamp of the newest activity in the group.
    pub timestamp: i64,
    pub activities: Vec<TimelineActivity>,
}

impl ActivityGroup {
    fn start(activity: TimelineActivity) -> Self {
        let kind = match activity.kind {
            ActivityKind::CheckIn { .. } => GroupKind::CheckIn,
            ActivityKind::Create => GroupKind::Create,
            ActivityKind::Delete => GroupKind::Delete,
        };
        Self {
            id: format!("{}_group", activity.id()),
            kind,
            habit_id: activity.habit_id,
            habit_name: activity.habit_name.clone(),
            timestamp: activity.timestamp,
            activities: vec![activity],
        }
    }

    fn accepts(&self, activity: &TimelineActivity) -> bool {
        self.kind == GroupKind::CheckIn
            && activity.is_check_in()
            && self.habit_id == activity.habit_id
    }

    /// Activities to show: the first `preview` unless expanded.
    pub fn visible(&self, expanded: bool, preview: usize) -> &[TimelineActivity] {
        if expanded {
            &self.activities
        } else {
            &self.activities[..self.activities.len().min(preview)]
        }
    }

    /// Activities hidden behind the "more" link when collapsed.
    pub fn hidden_count(&self, preview: usize) -> usize {
        self.activities.len().saturating_sub(preview)
    }
}

/// Collapse adjacent check-ins to the same habit into groups.
///
/// `activities` must already be sorted newest first. Only neighbours merge: a
/// commit to another habit in between starts a new group. Create and delete
/// events always stand alone.
pub fn group_activities(activities: &[TimelineActivity]) -> Vec<ActivityGroup> {
    let mut groups: Vec<ActivityGroup> = Vec::new();
    for activity in activities {
        match groups.last_mut() {
            Some(last) if last.accepts(activity) => last.activities.push(activity.clone()),
            _ => groups.push(ActivityGroup::start(activity.clone())),
        }
    }
    groups
}

/// Grouped feed as shown on the home screen: the newest
/// [`GROUPING_WINDOW`] activities folded into at most [`MAX_GROUPS`] groups.
pub fn recent_groups(activities: &[TimelineActivity]) -> Vec<ActivityGroup> {
    let window = &activities[..activities.len().min(GROUPING_WINDOW)];
    let mut groups = group_activities(window);
    groups.truncate(MAX_GROUPS);
    groups
}
