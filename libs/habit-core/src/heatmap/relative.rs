//! Volume-relative heatmap scale, used when no daily target is known.

use super::{HeatLevel, MAX_LEVEL};

/// Buckets a count against the largest count in the displayed range.
///
/// Small ranges (max ≤ 4) map counts directly to levels. Larger ranges place
/// `(count - 1) / (max - 1)` into three equal bands for levels 2 to 4; level 1
/// is kept for a count of exactly 1, the bottom of the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeScale {
    max_count: i64,
}

impl RelativeScale {
    pub fn new(max_count: i64) -> Self {
        Self {
            max_count: max_count.max(0),
        }
    }

    pub fn level(&self, count: i64) -> HeatLevel {
        if count <= 0 {
            return HeatLevel::NONE;
        }
        let cap = i64::from(MAX_LEVEL);
        if self.max_count <= cap {
            // count ≤ 4 here, the cast cannot truncate
            return HeatLevel::plain(count.min(cap) as u8);
        }
        if count == 1 {
            return HeatLevel::plain(1);
        }
        let position = count - 1;
        let span = self.max_count - 1;
        let level = if 3 * position <= span {
            2
        } else if 3 * position <= 2 * span {
            3
        } else {
            4
        };
        HeatLevel::plain(level)
    }
}
