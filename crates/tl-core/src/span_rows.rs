//! Span builder for rows that already describe a date range.

use serde_json::Value;

use crate::employee::EmployeeIndex;
use crate::fields::{FieldIndex, KeyCache, aliases};
use crate::pipeline::BuildStats;
use crate::row::{RowIdentity, ceil_to_day, descriptive_meta};
use crate::span::{Span, exclusive_end};

/// Builds one span per span-shaped row.
///
/// Rows without an employee code or a parseable start are dropped and counted
/// in `stats`. A missing, inverted, or zero-length end becomes `start + 1 day`.
/// End timestamps with a time of day past midnight count that day as covered.
pub fn build_from_span_rows<'a, I>(
    rows: I,
    index: &EmployeeIndex,
    cache: &mut KeyCache,
    stats: &mut BuildStats,
) -> Vec<Span>
where
    I: IntoIterator<Item = &'a Value>,
{
    let indexed: Vec<FieldIndex<'a>> = rows
        .into_iter()
        .map(|row| FieldIndex::new(row, cache))
        .collect();
    build_from_indexed(&indexed, index, stats)
}

/// [`build_from_span_rows`] over rows the caller has already indexed.
pub(crate) fn build_from_indexed(
    rows: &[FieldIndex<'_>],
    index: &EmployeeIndex,
    stats: &mut BuildStats,
) -> Vec<Span> {
    let mut spans = Vec::new();

    for fields in rows {
        let Some(identity) = RowIdentity::resolve(fields, index) else {
            stats.dropped_missing_code += 1;
            tracing::trace!("dropping span row without employee code");
            continue;
        };

        let start = fields
            .day(aliases::SPAN_START)
            .or_else(|| fields.day(aliases::WORK_DATE));
        let end = fields.timestamp(aliases::SPAN_END).and_then(ceil_to_day);
        let Some((start, end)) =
            start.and_then(|start| Some((start, exclusive_end(start, end)?)))
        else {
            stats.dropped_missing_date += 1;
            tracing::trace!(employee_code = %identity.code, "dropping span row without usable start date");
            continue;
        };

        let mut meta = descriptive_meta(fields);
        meta.total_hours = fields.number(aliases::HOURS);

        spans.push(identity.into_span(start, end, meta));
    }

    stats.spans_built += spans.len();
    spans
}
