//! Timestamp formatting and parsing.
//!
//! All timestamps are seconds since the Unix epoch and are rendered and
//! parsed as UTC.

use chrono::{DateTime, NaiveDateTime};

/// Seconds per day.
pub const SECONDS_PER_DAY: i64 = 86_400;

const EXPORT_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
const XML_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn format_with(t: i64, pattern: &str) -> String {
    if t == 0 {
        return String::new();
    }
    DateTime::from_timestamp(t, 0)
        .map(|dt| dt.format(pattern).to_string())
        .unwrap_or_default()
}

/// Formats `t` as `YYYY/MM/DD hh:mm:ss`. Zero renders as the empty string.
#[must_use]
pub fn format_export(t: i64) -> String {
    format_with(t, EXPORT_FORMAT)
}

/// Formats `t` as `YYYY-MM-DDThh:mm:ss`. Zero renders as the empty string.
#[must_use]
pub fn format_xml(t: i64) -> String {
    format_with(t, XML_FORMAT)
}

/// Parses a time string.
///
/// Accepts the empty string (zero), `now`, and the export and XML formats.
#[must_use]
pub fn parse(text: &str, now: i64) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0);
    }
    if text.eq_ignore_ascii_case("now") {
        return Some(now);
    }
    [EXPORT_FORMAT, XML_FORMAT]
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(text, pattern).ok())
        .map(|dt| dt.and_utc().timestamp())
}

/// Start of the UTC day containing `t`.
#[must_use]
pub fn day_start(t: i64) -> i64 {
    t - t.rem_euclid(SECONDS_PER_DAY)
}

/// Current time in seconds since the epoch.
#[must_use]
pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
