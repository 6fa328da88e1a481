//! Contribution grid construction.
//!
//! A grid is a dense run of calendar days ending at a chosen day, padded at
//! the front so the first real day sits in its weekday row (weeks start on
//! Sunday). Chunking the result by 7 gives the week columns of a heatmap.

use crate::date_utils::{days_in_year, format_date, year_of};
use crate::types::{CheckIn, ContributionMap};
use chrono::{Datelike, Days, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Count used by padding slots that are not part of the range.
pub const PLACEHOLDER_COUNT: i64 = -1;

/// One cell of a contribution grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapSlot {
    /// Empty for placeholders.
    pub date_string: String,
    /// Summed value, or [`PLACEHOLDER_COUNT`] for padding.
    pub count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<i64>,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u32,
}

impl HeatmapSlot {
    pub fn placeholder(day_of_week: u32) -> Self {
        Self {
            date_string: String::new(),
            count: PLACEHOLDER_COUNT,
            target_value: None,
            day_of_week,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.count == PLACEHOLDER_COUNT
    }
}

/// Build the slot sequence for `days` consecutive days ending at `end_date`.
///
/// Empty when `days` is 0 or reaches back past the earliest representable date.
pub fn build_grid(contributions: &ContributionMap, days: u32, end_date: NaiveDate) -> Vec<HeatmapSlot> {
    if days == 0 {
        return Vec::new();
    }
    let Some(start) = end_date.checked_sub_days(Days::new(u64::from(days) - 1)) else {
        return Vec::new();
    };
    let padding = start.weekday().num_days_from_sunday();

    let mut slots = Vec::with_capacity(padding as usize + days as usize);
    slots.extend((0..padding).map(HeatmapSlot::placeholder));

    for offset in 0..days {
        let date = start + Duration::days(i64::from(offset));
        let date_string = format_date(date);
        let total = contributions.get(&date_string).copied().unwrap_or_default();
        slots.push(HeatmapSlot {
            date_string,
            count: total.count,
            target_value: total.target_value,
            day_of_week: date.weekday().num_days_from_sunday(),
        });
    }

    slots
}

/// Split a slot sequence into week columns of seven.
pub fn week_columns(slots: &[HeatmapSlot]) -> Vec<Vec<HeatmapSlot>> {
    slots.chunks(7).map(<[HeatmapSlot]>::to_vec).collect()
}

/// Grid length and end day for showing `year`.
///
/// The current year ends today but still spans a full year of days, so the
/// grid keeps its width; other years cover Jan 1 to Dec 31.
pub fn year_window(year: i32, today: NaiveDate) -> (u32, NaiveDate) {
    let days = days_in_year(year);
    if year == today.year() {
        return (days, today);
    }
    let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(today);
    (days, end)
}

/// Years with at least one check-in, plus the current year, newest first.
pub fn available_years(check_ins: &[CheckIn], current_year: i32) -> Vec<i32> {
    let mut years: BTreeSet<i32> = check_ins
        .iter()
        .filter_map(|c| year_of(&c.date_string))
        .collect();
    years.insert(current_year);
    years.into_iter().rev().collect()
}
