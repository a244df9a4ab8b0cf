//! Small formatting and parsing helpers

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse an exchange decimal field leniently: empty strings (the API's way
/// of saying "not set") become `None`, anything unparseable too.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}

/// Millisecond epoch string to UTC datetime.
pub fn parse_millis(s: &str) -> Option<DateTime<Utc>> {
    let ms: i64 = s.trim().parse().ok()?;
    DateTime::from_timestamp_millis(ms)
}

/// Elapsed time between two datetimes as a human string enumerating the
/// non-zero units: `"1 day, 2 hours, 3 minutes and 4 seconds"`.
///
/// A negative span (should not happen with date-sorted input) clamps to
/// `"0 seconds"`.
pub fn humanize_duration(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    let total_secs = (to - from).num_seconds().max(0);

    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    let units = [
        (days, "day"),
        (hours, "hour"),
        (minutes, "minute"),
        (seconds, "second"),
    ];

    let parts: Vec<String> = units
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| {
            let plural = if *value > 1 { "s" } else { "" };
            format!("{value} {unit}{plural}")
        })
        .collect();

    match parts.len() {
        0 => "0 seconds".to_string(),
        1 => parts[0].clone(),
        n => format!("{} and {}", parts[..n - 1].join(", "), parts[n - 1]),
    }
}

/// Signed percent string: `+1.25%` / `-0.80%`.
pub fn format_signed_pct(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    if rounded < Decimal::ZERO {
        format!("{rounded}%")
    } else {
        format!("+{rounded}%")
    }
}
