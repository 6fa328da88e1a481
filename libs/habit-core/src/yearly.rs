//! Per-year summary statistics.

use crate::date_utils::{days_elapsed_in_year, format_date, year_of};
use crate::goals::{active_days, goals_met_by_day, live_targets};
use crate::streak::longest_streak;
use crate::types::{CheckIn, Habit};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Habit with the most check-ins in a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopHabit {
    pub habit_id: i64,
    /// `None` when the habit is no longer in the active list.
    pub habit_name: Option<String>,
    pub check_ins: u32,
}

/// Day with the most goals met in a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusiestDay {
    pub date_string: String,
    pub goals_met: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyStats {
    pub year: i32,
    pub total_check_ins: u32,
    pub top_habit: Option<TopHabit>,
    pub busiest_day: Option<BusiestDay>,
    /// Longest run of active days inside the year.
    pub longest_streak: u32,
    pub active_days: u32,
    pub days_elapsed: u32,
    /// `active_days / days_elapsed`, 0 when nothing has elapsed.
    pub completion_rate: f64,
}

/// Summarise `year` from all check-ins.
///
/// `habits` supplies live targets (for today's goal check) and names. Ties
/// for top habit go to the habit encountered first in `check_ins`; ties for
/// busiest day go to the earliest day.
pub fn yearly_stats(year: i32, check_ins: &[CheckIn], habits: &[Habit], today: NaiveDate) -> YearlyStats {
    let in_year: Vec<CheckIn> = check_ins
        .iter()
        .filter(|c| year_of(&c.date_string) == Some(year))
        .cloned()
        .collect();

    let mut order: Vec<i64> = Vec::new();
    let mut counts: HashMap<i64, u32> = HashMap::new();
    for check_in in &in_year {
        let count = counts.entry(check_in.habit_id).or_insert_with(|| {
            order.push(check_in.habit_id);
            0
        });
        *count += 1;
    }
    let mut top_habit: Option<TopHabit> = None;
    for habit_id in order {
        let count = counts.get(&habit_id).copied().unwrap_or(0);
        if top_habit.as_ref().map_or(true, |top| count > top.check_ins) {
            top_habit = Some(TopHabit {
                habit_id,
                habit_name: habits.iter().find(|h| h.id == habit_id).map(|h| h.name.clone()),
                check_ins: count,
            });
        }
    }

    let goals = goals_met_by_day(&in_year, &live_targets(habits), &format_date(today));
    let mut busiest_day: Option<BusiestDay> = None;
    for (day, &met) in &goals {
        if met > busiest_day.as_ref().map_or(0, |b| b.goals_met) {
            busiest_day = Some(BusiestDay {
                date_string: day.clone(),
                goals_met: met,
            });
        }
    }

    let active = active_days(&goals);
    let longest = match (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) {
        (Some(first), Some(last)) => longest_streak(&active, first, last),
        _ => 0,
    };

    let active_count = u32::try_from(active.len()).unwrap_or(u32::MAX);
    let days_elapsed = days_elapsed_in_year(year, today);
    let completion_rate = if days_elapsed == 0 {
        0.0
    } else {
        f64::from(active_count) / f64::from(days_elapsed)
    };

    YearlyStats {
        year,
        total_check_ins: u32::try_from(in_year.len()).unwrap_or(u32::MAX),
        top_habit,
        busiest_day,
        longest_streak: longest,
        active_days: active_count,
        days_elapsed,
        completion_rate,
    }
}
