//! Calendar-day helpers.
//!
//! Every date in the registry is a `NaiveDate`: a day with no time-of-day and
//! no timezone, so differences are always whole days. Input coming from forms
//! and backup files is normalized here before it reaches the domain.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde_json::Value;

/// Date-only layouts accepted by [`normalize`], tried in order
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Timestamp layouts without an offset; only the date part is kept
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a date-like string into a calendar day.
///
/// Returns `None` for anything that cannot be read as a date; callers decide
/// whether that rejects an operation or silently drops the value.
pub fn normalize(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Some(date);
        }
    }

    // Timestamps with an offset land on the local calendar day
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Some(timestamp.with_timezone(&Local).date_naive());
    }

    for format in DATETIME_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(input, format) {
            return Some(timestamp.date());
        }
    }

    None
}

/// Normalize a loosely typed JSON value.
///
/// Strings go through [`normalize`]; integers are read as epoch milliseconds.
pub fn normalize_value(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => normalize(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Local.timestamp_millis_opt(millis).single())
            .map(|timestamp| timestamp.date_naive()),
        _ => None,
    }
}

/// Current local calendar day
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Shift a date by `days` (may be negative). `None` on calendar overflow.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
}

/// Signed whole-day difference `b - a`
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    b.signed_duration_since(a).num_days()
}

/// Render a date as `YYYY-MM-DD`
pub fn to_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
