//! Lenient date and timestamp parsing for timecard fields.
//!
//! All results are in local calendar terms: offset-bearing timestamps and epoch
//! values are converted to the local timezone before the day is taken.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{Number, Value};

/// Datetime layouts seen in timecard exports, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

/// Largest magnitude at which every integral `f64` is exact.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// Date-only layouts, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parses a field value into a local naive timestamp.
///
/// Accepts RFC 3339 strings (converted to local time), naive datetimes,
/// date-only strings (local midnight), and epoch milliseconds given as an
/// integer or an integral float. Anything else is `None`.
pub fn parse_timestamp(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_timestamp_str(s),
        Value::Number(n) => epoch_millis(n)
            .and_then(DateTime::from_timestamp_millis)
            .map(|utc| utc.with_timezone(&Local).naive_local()),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn epoch_millis(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract().abs() < f64::EPSILON && f.abs() <= MAX_EXACT_FLOAT)
            .map(|f| f as i64)
    })
}

/// Parses a field value into a local calendar day.
pub fn parse_day(value: &Value) -> Option<NaiveDate> {
    parse_timestamp(value).map(|ts| ts.date())
}

fn parse_timestamp_str(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
}
