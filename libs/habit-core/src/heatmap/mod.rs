//! Heatmap intensity levels.
//!
//! Two scales share the same five levels (0 = nothing, 4 = strongest):
//! - [`TargetScale`] when the day's goal is known, so level 4 means "goal met".
//! - [`RelativeScale`] otherwise, scaled against the busiest day on screen.

pub mod relative;
pub mod target;

pub use relative::RelativeScale;
pub use target::TargetScale;

use crate::contribution::HeatmapSlot;
use serde::{Deserialize, Serialize};

/// Highest heatmap level.
pub const MAX_LEVEL: u8 = 4;

/// Level assigned to one heatmap cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatLevel {
    pub level: u8,
    /// The day's target was reached. Only a [`TargetScale`] sets this.
    pub goal_met: bool,
}

impl HeatLevel {
    pub const NONE: HeatLevel = HeatLevel {
        level: 0,
        goal_met: false,
    };

    pub fn plain(level: u8) -> Self {
        Self {
            level: level.min(MAX_LEVEL),
            goal_met: false,
        }
    }
}

/// Level for a single count.
///
/// A positive `target` selects the target scale; anything else falls back to
/// scaling against `max_count`.
pub fn heat_level(count: i64, target: Option<i64>, max_count: i64) -> HeatLevel {
    match target {
        Some(t) if t > 0 => TargetScale::new(t).level(count),
        _ => RelativeScale::new(max_count).level(count),
    }
}

/// Largest real count in a slot sequence. Placeholders are ignored.
pub fn max_count(slots: &[HeatmapSlot]) -> i64 {
    slots
        .iter()
        .filter(|s| !s.is_placeholder())
        .map(|s| s.count)
        .max()
        .unwrap_or(0)
        .max(0)
}

/// Levels for every slot of a grid, in order. Placeholders get level 0.
///
/// When `fallback_target` is set it is used for days that carry no recorded
/// target of their own.
pub fn grid_levels(slots: &[HeatmapSlot], fallback_target: Option<i64>) -> Vec<HeatLevel> {
    let max = max_count(slots);
    slots
        .iter()
        .map(|slot| {
            if slot.is_placeholder() {
                HeatLevel::NONE
            } else {
                heat_level(slot.count, slot.target_value.or(fallback_target), max)
            }
        })
        .collect()
}

/// Fraction of the daily goal reached, clamped to `0.0..=1.0`.
///
/// A non-positive target counts as already complete.
pub fn goal_progress(current: i64, target: i64) -> f64 {
    if target <= 0 {
        return 1.0;
    }
    (current as f64 / target as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(count: i64, target_value: Option<i64>) -> HeatmapSlot {
        HeatmapSlot {
            date_string: "2024-01-01".into(),
            count,
            target_value,
            day_of_week: 1,
        }
    }

    #[test]
    fn zero_is_always_level_zero() {
        assert_eq!(heat_level(0, Some(3), 10), HeatLevel::NONE);
        assert_eq!(heat_level(0, None, 10), HeatLevel::NONE);
        assert_eq!(heat_level(0, None, 0), HeatLevel::NONE);
    }

    #[test]
    fn reaching_target_is_level_four_and_goal_met() {
        for (count, target) in [(3, 3), (9, 3), (1, 1), (50, 7)] {
            let level = heat_level(count, Some(target), 0);
            assert_eq!(level.level, MAX_LEVEL);
            assert!(level.goal_met);
        }
    }

    #[test]
    fn non_positive_target_falls_back_to_relative() {
        assert_eq!(heat_level(2, Some(0), 3), HeatLevel::plain(2));
    }

    #[test]
    fn max_count_skips_placeholders() {
        let slots = vec![slot(-1, None), slot(3, None), slot(7, None)];
        assert_eq!(max_count(&slots), 7);
        assert_eq!(max_count(&[slot(-1, None)]), 0);
    }

    #[test]
    fn grid_levels_use_fallback_target() {
        let slots = vec![slot(-1, None), slot(2, None), slot(2, Some(2))];
        let levels = grid_levels(&slots, Some(4));
        assert_eq!(levels[0], HeatLevel::NONE);
        assert_eq!(levels[1].level, 2);
        assert!(!levels[1].goal_met);
        assert!(levels[2].goal_met);
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(goal_progress(0, 4), 0.0);
        assert_eq!(goal_progress(2, 4), 0.5);
        assert_eq!(goal_progress(9, 4), 1.0);
        assert_eq!(goal_progress(-2, 4), 0.0);
        assert_eq!(goal_progress(0, 0), 1.0);
    }
}
