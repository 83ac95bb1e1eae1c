//! Core domain logic for the assignment timeline.
//!
//! Turns raw, inconsistently shaped timecard records into non-overlapping
//! assignment spans (one employee on one project over a contiguous date range):
//! - Field resolution: alias-based lookup across snake/camel/legacy field names
//! - Shape detection: pre-aggregated span rows versus one-row-per-day rows
//! - Span building, then merging of touching spans per (employee, project)
//! - Overlap detection: one employee booked on intersecting date ranges
//!
//! Everything here is synchronous and infallible over row data; rows that
//! cannot be used are dropped.

mod daily;
pub mod dates;
mod employee;
pub mod fields;
mod merge;
mod overlap;
mod pipeline;
mod row;
mod shape;
mod span;
mod span_rows;
mod types;

pub use daily::build_from_daily_rows;
pub use employee::{EmployeeIndex, EmployeeRecord};
pub use fields::{FieldIndex, KeyCache};
pub use merge::merge_spans;
pub use overlap::{Overlap, find_overlaps};
pub use pipeline::{BuildOptions, BuildOutcome, BuildStats, Pipeline, build_spans};
pub use shape::{BatchShape, RowShape};
pub use span::{PLACEHOLDER_NAME, Span, SpanMeta, UNKNOWN_PROJECT, sort_for_display};
pub use span_rows::build_from_span_rows;
pub use types::{EmployeeCode, ValidationError};
