//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{Days, Local, NaiveDate};
use regex::Regex;

/// Pre-compiled regex for relative date parsing.
static RELATIVE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(day|week)s?\s+ago$").unwrap());

/// Conservative bound for relative date parsing (~1000 years in days).
const MAX_RELATIVE_DAYS: u64 = 1000 * 366;

/// Parse a date string as either ISO 8601 or relative to today.
///
/// Supports:
/// - ISO 8601: "2026-01-15"
/// - Relative: "3 days ago", "1 day ago", "2 weeks ago"
pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    parse_date_from(s, Local::now().date_naive())
}

/// Like [`parse_date`], with relative dates counted back from `today`.
pub fn parse_date_from(s: &str, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    let Some(caps) = RELATIVE_DATE_RE.captures(s) else {
        anyhow::bail!("Invalid date: {s}. Use YYYY-MM-DD (e.g., 2026-01-15) or relative (e.g., '3 days ago')");
    };

    let n: u64 = caps[1]
        .parse()
        .context("failed to parse number in relative date")?;

    let days_per_unit = match &caps[2] {
        "day" => 1,
        "week" => 7,
        unit => anyhow::bail!("Unknown date unit: {unit}"),
    };

    if n > MAX_RELATIVE_DAYS / days_per_unit {
        anyhow::bail!("Relative date value too large: {n} {}", &caps[2]);
    }

    today
        .checked_sub_days(Days::new(n * days_per_unit))
        .context("relative date is out of range")
}

/// Formats an optional hour total: "24.0h", or "-" when unknown.
pub fn format_hours(hours: Option<f64>) -> String {
    hours.map_or_else(|| "-".to_string(), |h| format!("{h:.1}h"))
}
