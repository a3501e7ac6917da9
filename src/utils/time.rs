//! Time utilities: parsing HH:MM, day windows, formatting minutes, rounding.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M:%S"))
        .ok()
}

/// Instant at `hour`:00:00 of the given day. Hours past 23 saturate to the
/// last second of the day.
pub fn hour_on(date: NaiveDate, hour: u32) -> NaiveDateTime {
    match NaiveTime::from_hms_opt(hour, 0, 0) {
        Some(t) => date.and_time(t),
        None => end_of_day(date),
    }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable second of the day.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
}

pub fn format_minutes(mins: i64) -> String {
    let sign = if mins < 0 { "-" } else { "" };
    let m = mins.abs();
    format!("{}{:02}:{:02}", sign, m / 60, m % 60)
}

/// Minutes → hours, rounded half-up to 2 decimal places.
pub fn hours_2dp(minutes: i64) -> f64 {
    (minutes as f64 / 60.0 * 100.0).round() / 100.0
}
