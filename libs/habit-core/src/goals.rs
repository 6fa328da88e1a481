//! Goal completion per calendar day across habits.

use crate::date_utils::parse_date;
use crate::types::{CheckIn, Habit};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Default, Clone, Copy)]
struct HabitDay {
    sum: i64,
    recorded_target: i64,
}

/// Current target of each habit, keyed by habit id.
pub fn live_targets(habits: &[Habit]) -> HashMap<i64, i64> {
    habits.iter().map(|h| (h.id, h.target_value)).collect()
}

/// Number of habits that met their goal on each day with check-ins.
///
/// Values are summed per habit and day. Today is judged against the habit's
/// live target from `live_targets`; earlier days against the target recorded
/// on their check-ins, because targets change over time. Days where no
/// habit met its goal map to 0.
pub fn goals_met_by_day(
    check_ins: &[CheckIn],
    live_targets: &HashMap<i64, i64>,
    today: &str,
) -> BTreeMap<String, u32> {
    let mut per_habit: BTreeMap<(&str, i64), HabitDay> = BTreeMap::new();
    for check_in in check_ins {
        let entry = per_habit
            .entry((check_in.date_string.as_str(), check_in.habit_id))
            .or_default();
        entry.sum += check_in.value;
        entry.recorded_target = entry.recorded_target.max(check_in.target_value);
    }

    let mut result: BTreeMap<String, u32> = BTreeMap::new();
    for ((day, habit_id), habit_day) in per_habit {
        let target = if day == today {
            live_targets
                .get(&habit_id)
                .copied()
                .unwrap_or(habit_day.recorded_target)
        } else {
            habit_day.recorded_target
        };
        let met = habit_day.sum >= target.max(1);
        let counter = result.entry(day.to_string()).or_insert(0);
        if met {
            *counter += 1;
        }
    }
    result
}

/// Days on which at least one goal was met.
pub fn active_days(goals: &BTreeMap<String, u32>) -> BTreeSet<NaiveDate> {
    goals
        .iter()
        .filter(|(_, met)| **met > 0)
        .filter_map(|(day, _)| parse_date(day).ok())
        .collect()
}
