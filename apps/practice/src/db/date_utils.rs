//! Date utilities for daily reset hour handling.

use chrono::{Duration, Local, NaiveDate, Timelike};

/// Get adjusted "today" based on daily_reset_hour.
///
/// If the current hour is before the reset hour, "today" is actually
/// "yesterday" from a practice perspective, so a late-night session counts
/// towards the previous day.
pub fn get_adjusted_today(daily_reset_hour: u32) -> NaiveDate {
    let now = Local::now();

    if now.hour() < daily_reset_hour {
        (now - Duration::days(1)).date_naive()
    } else {
        now.date_naive()
    }
}

/// SQLite date modifier that shifts a local timestamp back by the reset hour,
/// e.g. `-4 hours`. Use as `date(answered_at, 'localtime', ?)`.
pub fn reset_hour_modifier(daily_reset_hour: u32) -> String {
    format!("-{daily_reset_hour} hours")
}

pub fn format_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
