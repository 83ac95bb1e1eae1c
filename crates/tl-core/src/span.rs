//! Assignment spans: one employee on one project over a contiguous date range.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::EmployeeCode;

/// Display name used when nothing better resolves.
pub const PLACEHOLDER_NAME: &str = "\u{2014}";

/// Project key used when a row carries no project field.
pub const UNKNOWN_PROJECT: &str = "Unknown";

/// Descriptive fields carried through for display.
///
/// Only `total_hours` takes part in merging (it is summed).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_hours: Option<f64>,
}

impl SpanMeta {
    /// Folds `other` into `self`: hours are summed, descriptive fields keep
    /// `self`'s value and fall back to `other`'s.
    pub fn absorb(&mut self, other: &Self) {
        self.total_hours = sum_hours(self.total_hours, other.total_hours);
        fill(&mut self.job_code, &other.job_code);
        fill(&mut self.job_description, &other.job_description);
        fill(&mut self.activity_code, &other.activity_code);
        fill(&mut self.activity_description, &other.activity_description);
        fill(&mut self.allocation_code, &other.allocation_code);
    }
}

fn fill(slot: &mut Option<String>, other: &Option<String>) {
    if slot.is_none() {
        slot.clone_from(other);
    }
}

/// Adds two optional hour totals; absent only when both are absent.
pub(crate) fn sum_hours(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x + y),
        (x, None) => x,
        (None, y) => y,
    }
}

/// One employee assigned to one project over `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Display name, never empty.
    pub employee: String,
    /// Identifier from the employee index, if the code resolved.
    pub employee_id: Option<String>,
    pub employee_code: EmployeeCode,
    /// Project key used for grouping.
    pub project: String,
    /// Project value as it appeared in the source row.
    pub project_raw: String,
    /// First day, inclusive.
    pub start: NaiveDate,
    /// Day after the last day (exclusive end).
    pub end: NaiveDate,
    #[serde(default)]
    pub meta: SpanMeta,
}

impl Span {
    /// Number of calendar days covered.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// True when the two ranges share at least one day.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True when the span covers any day of the window `[from, to)`.
    /// Either bound may be open.
    pub fn intersects(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
        from.is_none_or(|from| self.end > from) && to.is_none_or(|to| self.start < to)
    }

    /// The (employee code, project) pair that identifies a span for merging.
    pub(crate) fn group_key(&self) -> (EmployeeCode, String) {
        (self.employee_code.clone(), self.project.clone())
    }
}

/// Day after `day`; `None` on the last representable day.
pub(crate) fn next_day(day: NaiveDate) -> Option<NaiveDate> {
    day.succ_opt()
}

/// Returns `end` if it is strictly after `start`, otherwise the one-day minimum.
///
/// `None` only when `start` is the last representable day, since no span
/// starting there can end after it.
pub(crate) fn exclusive_end(start: NaiveDate, end: Option<NaiveDate>) -> Option<NaiveDate> {
    end.filter(|end| *end > start).or_else(|| next_day(start))
}

/// Collapses runs of whitespace and trims, giving the grouping key for a project.
pub(crate) fn project_key(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Sorts spans for display: by employee name, then start, then project.
pub fn sort_for_display(spans: &mut [Span]) {
    spans.sort_by(|a, b| {
        a.employee
            .cmp(&b.employee)
            .then_with(|| a.employee_code.cmp(&b.employee_code))
            .then(a.start.cmp(&b.start))
            .then_with(|| a.project.cmp(&b.project))
    });
}
