//! Goal-relative heatmap scale.

use super::{HeatLevel, MAX_LEVEL};

/// Buckets a count against a known daily target.
///
/// Meeting the target is level 4. Below it, `count / target` is split into
/// thirds for levels 1 to 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetScale {
    target: i64,
}

impl TargetScale {
    /// `target` must be positive; smaller values are treated as 1.
    pub fn new(target: i64) -> Self {
        Self {
            target: target.max(1),
        }
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    pub fn level(&self, count: i64) -> HeatLevel {
        if count <= 0 {
            return HeatLevel::NONE;
        }
        if count >= self.target {
            return HeatLevel {
                level: MAX_LEVEL,
                goal_met: true,
            };
        }
        let level = if 3 * count < self.target {
            1
        } else if 3 * count < 2 * self.target {
            2
        } else {
            3
        };
        HeatLevel::plain(level)
    }
}
