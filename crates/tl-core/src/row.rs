//! Per-row field extraction shared by both span builders.

use chrono::{NaiveDate, NaiveDateTime};

use crate::employee::{EmployeeIndex, EmployeeRecord, compose_name};
use crate::fields::{FieldIndex, aliases};
use crate::span::{PLACEHOLDER_NAME, Span, SpanMeta, UNKNOWN_PROJECT, project_key};
use crate::types::EmployeeCode;

/// Who and what a row is about.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RowIdentity {
    pub code: EmployeeCode,
    pub employee: String,
    pub employee_id: Option<String>,
    pub project: String,
    pub project_raw: String,
}

impl RowIdentity {
    /// Resolves the row's identity; `None` when no employee code resolves.
    ///
    /// The display name prefers the employee index, then the row's own name
    /// field, then the row's first/last name, then the placeholder.
    pub fn resolve(fields: &FieldIndex<'_>, index: &EmployeeIndex) -> Option<Self> {
        let code = fields
            .text(aliases::EMPLOYEE_CODE)
            .and_then(|c| EmployeeCode::new(c).ok())?;

        let record = index.get(&code);
        let employee = record
            .and_then(EmployeeRecord::display_name)
            .or_else(|| fields.text(aliases::EMPLOYEE_NAME))
            .or_else(|| {
                compose_name(
                    fields.text(aliases::FIRST_NAME).as_deref(),
                    fields.text(aliases::LAST_NAME).as_deref(),
                )
            })
            .unwrap_or_else(|| PLACEHOLDER_NAME.to_string());

        let (project, project_raw) = fields.raw_text(aliases::PROJECT).map_or_else(
            || (UNKNOWN_PROJECT.to_string(), UNKNOWN_PROJECT.to_string()),
            |raw| (project_key(&raw), raw),
        );

        Some(Self {
            code,
            employee,
            employee_id: record.and_then(|r| r.id.clone()),
            project,
            project_raw,
        })
    }

    /// The merge/bucket key.
    pub fn key(&self) -> (EmployeeCode, String) {
        (self.code.clone(), self.project.clone())
    }

    pub fn into_span(self, start: NaiveDate, end: NaiveDate, meta: SpanMeta) -> Span {
        Span {
            employee: self.employee,
            employee_id: self.employee_id,
            employee_code: self.code,
            project: self.project,
            project_raw: self.project_raw,
            start,
            end,
            meta,
        }
    }
}

/// Descriptive metadata of a row. Hours are left for the caller to fill.
pub(crate) fn descriptive_meta(fields: &FieldIndex<'_>) -> SpanMeta {
    SpanMeta {
        job_code: fields.text(aliases::JOB_CODE),
        job_description: fields.text(aliases::JOB_DESCRIPTION),
        activity_code: fields.text(aliases::ACTIVITY_CODE),
        activity_description: fields.text(aliases::ACTIVITY_DESCRIPTION),
        allocation_code: fields.text(aliases::ALLOCATION_CODE),
        total_hours: None,
    }
}

/// Hours between punch-in and punch-out, when both parse and out is later.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn punch_hours(fields: &FieldIndex<'_>) -> Option<f64> {
    let punch_in = fields.timestamp(aliases::PUNCH_IN)?;
    let punch_out = fields.timestamp(aliases::PUNCH_OUT)?;
    (punch_out > punch_in).then(|| (punch_out - punch_in).num_minutes() as f64 / 60.0)
}

/// Day a timestamp belongs to when used as an exclusive end: midnight stays
/// on its own day, any later time rounds up to the next midnight.
pub(crate) fn ceil_to_day(ts: NaiveDateTime) -> Option<NaiveDate> {
    if ts.time() == chrono::NaiveTime::MIN {
        Some(ts.date())
    } else {
        crate::span::next_day(ts.date())
    }
}
