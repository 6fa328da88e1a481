//! Streak detection over sets of qualifying days.

use crate::date_utils::parse_date;
use crate::types::CheckIn;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Days on which at least one check-in exists.
pub fn check_in_days(check_ins: &[CheckIn]) -> BTreeSet<NaiveDate> {
    check_ins
        .iter()
        .filter_map(|c| parse_date(&c.date_string).ok())
        .collect()
}

/// Consecutive qualifying days ending today or, if today does not qualify
/// yet, ending yesterday.
///
/// The walk goes backward one day at a time and stops at the first day
/// outside `days`.
pub fn current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut cursor = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) => yesterday,
            None => return 0,
        }
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor = match cursor.pred_opt() {
            Some(prev) => prev,
            None => break,
        };
    }
    streak
}

/// Longest run of consecutive qualifying days within `from..=to`.
pub fn longest_streak(days: &BTreeSet<NaiveDate>, from: NaiveDate, to: NaiveDate) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for &day in days.range(from..=to) {
        run = match previous {
            Some(prev) if prev.succ_opt() == Some(day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn days(list: &[NaiveDate]) -> BTreeSet<NaiveDate> {
        list.iter().copied().collect()
    }

    #[test]
    fn three_consecutive_days_including_today() {
        let today = date(2024, 6, 10);
        let set = days(&[today, date(2024, 6, 9), date(2024, 6, 8), date(2024, 6, 6)]);
        assert_eq!(current_streak(&set, today), 3);
    }

    #[test]
    fn missing_today_counts_from_yesterday() {
        let today = date(2024, 6, 10);
        let set = days(&[date(2024, 6, 9), date(2024, 6, 8)]);
        assert_eq!(current_streak(&set, today), 2);
    }

    #[test]
    fn gap_before_yesterday_breaks() {
        let today = date(2024, 6, 10);
        let set = days(&[date(2024, 6, 8), date(2024, 6, 7)]);
        assert_eq!(current_streak(&set, today), 0);
    }

    #[test]
    fn empty_set_has_no_streak() {
        assert_eq!(current_streak(&BTreeSet::new(), date(2024, 1, 1)), 0);
    }

    #[test]
    fn streak_crosses_year_boundary() {
        let today = date(2024, 1, 1);
        let set = days(&[today, date(2023, 12, 31), date(2023, 12, 30)]);
        assert_eq!(current_streak(&set, today), 3);
    }

    #[test]
    fn longest_run_is_bounded_by_range() {
        let set = days(&[
            date(2023, 12, 30),
            date(2023, 12, 31),
            date(2024, 1, 1),
            date(2024, 1, 2),
            date(2024, 1, 5),
            date(2024, 1, 6),
            date(2024, 1, 7),
        ]);
        assert_eq!(longest_streak(&set, date(2024, 1, 1), date(2024, 12, 31)), 3);
        assert_eq!(longest_streak(&set, date(2023, 1, 1), date(2023, 12, 31)), 2);
        assert_eq!(longest_streak(&set, date(2022, 1, 1), date(2022, 12, 31)), 0);
    }
}
