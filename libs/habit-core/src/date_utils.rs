//! Calendar-day helpers shared by storage and aggregation.

use crate::error::{Result, ValidationError};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Timelike, Utc};

/// Format used for `date_string` columns and map keys.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Tracking day for a local instant.
///
/// If the hour is before `day_start_hour`, the instant still belongs to the
/// previous day. This lets late-night check-ins count towards the day they
/// were meant for.
pub fn adjusted_date<Tz: TimeZone>(at: &DateTime<Tz>, day_start_hour: u32) -> NaiveDate {
    if at.hour() < day_start_hour {
        (at.clone() - Duration::days(1)).date_naive()
    } else {
        at.date_naive()
    }
}

/// Today's tracking day in the local timezone.
pub fn get_adjusted_today(day_start_hour: u32) -> NaiveDate {
    adjusted_date(&Local::now(), day_start_hour)
}

/// Today's tracking day as `YYYY-MM-DD`.
pub fn get_adjusted_today_string(day_start_hour: u32) -> String {
    format_date(get_adjusted_today(day_start_hour))
}

/// Local tracking day for an epoch-millisecond timestamp, as `YYYY-MM-DD`.
pub fn date_string_for_timestamp(timestamp_millis: i64, day_start_hour: u32) -> Option<String> {
    let utc = DateTime::<Utc>::from_timestamp_millis(timestamp_millis)?;
    Some(format_date(adjusted_date(
        &utc.with_timezone(&Local),
        day_start_hour,
    )))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        value: s.to_string(),
    })
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Days of `year` that have started as of `today`.
///
/// The current year counts up to and including today, past years count in
/// full, future years count nothing.
pub fn days_elapsed_in_year(year: i32, today: NaiveDate) -> u32 {
    use std::cmp::Ordering;

    match year.cmp(&today.year()) {
        Ordering::Equal => today.ordinal(),
        Ordering::Less => days_in_year(year),
        Ordering::Greater => 0,
    }
}

/// Year parsed from the leading `YYYY` of a date string.
pub fn year_of(date_string: &str) -> Option<i32> {
    date_string.get(0..4)?.parse().ok()
}
