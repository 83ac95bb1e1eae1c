//! Span builder for one-row-per-day timecards.
//!
//! # Algorithm Summary
//!
//! 1. Resolve each row's calendar day (work date, else punch-in, else punch-out)
//! 2. Bucket rows by (employee code, project), keeping the set of distinct days
//!    with the hours worked on each
//! 3. Walk each bucket's sorted days and emit one span per maximal run of
//!    consecutive days

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde_json::Value;

use crate::employee::EmployeeIndex;
use crate::fields::{FieldIndex, KeyCache, aliases};
use crate::pipeline::BuildStats;
use crate::row::{RowIdentity, descriptive_meta, punch_hours};
use crate::span::{Span, SpanMeta, next_day, sum_hours};
use crate::types::EmployeeCode;

/// Rows gathered for one (employee code, project) pair.
#[derive(Debug)]
struct Bucket {
    /// Identity of the first row seen for this pair.
    identity: RowIdentity,
    /// Distinct days worked, with the hours summed over that day's rows.
    days: BTreeMap<NaiveDate, Option<f64>>,
    /// Descriptive metadata of the last row seen.
    meta: SpanMeta,
}

/// A maximal run of consecutive days: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DayRun {
    start: NaiveDate,
    end: NaiveDate,
    hours: Option<f64>,
}

/// Builds spans from daily rows.
///
/// Buckets are emitted in order of first appearance; within a bucket spans are
/// ascending by start. Rows without an employee code or a resolvable day are
/// dropped and counted in `stats`.
pub fn build_from_daily_rows<'a, I>(
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

/// [`build_from_daily_rows`] over rows the caller has already indexed.
pub(crate) fn build_from_indexed(
    rows: &[FieldIndex<'_>],
    index: &EmployeeIndex,
    stats: &mut BuildStats,
) -> Vec<Span> {
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut positions: HashMap<(EmployeeCode, String), usize> = HashMap::new();

    for fields in rows {
        let Some(identity) = RowIdentity::resolve(fields, index) else {
            stats.dropped_missing_code += 1;
            tracing::trace!("dropping daily row without employee code");
            continue;
        };

        let Some(day) = resolve_day(fields) else {
            stats.dropped_missing_date += 1;
            tracing::trace!(employee_code = %identity.code, "dropping daily row without a work day");
            continue;
        };

        let hours = fields
            .number(aliases::HOURS)
            .or_else(|| punch_hours(fields));
        let meta = descriptive_meta(fields);

        let position = *positions.entry(identity.key()).or_insert_with(|| {
            buckets.push(Bucket {
                identity,
                days: BTreeMap::new(),
                meta: SpanMeta::default(),
            });
            buckets.len() - 1
        });

        let bucket = &mut buckets[position];
        bucket
            .days
            .entry(day)
            .and_modify(|total| *total = sum_hours(*total, hours))
            .or_insert(hours);
        bucket.meta = meta;
    }

    let spans: Vec<Span> = buckets
        .into_iter()
        .flat_map(|bucket| {
            contiguous_runs(&bucket.days)
                .into_iter()
                .map(move |run| {
                    let meta = SpanMeta {
                        total_hours: run.hours,
                        ..bucket.meta.clone()
                    };
                    bucket.identity.clone().into_span(run.start, run.end, meta)
                })
                .collect::<Vec<_>>()
        })
        .collect();

    stats.spans_built += spans.len();
    spans
}

/// Calendar day of a daily row.
///
/// The last representable day is rejected: a span on it has no exclusive end.
fn resolve_day(fields: &FieldIndex<'_>) -> Option<NaiveDate> {
    fields
        .day(aliases::WORK_DATE)
        .or_else(|| fields.timestamp(aliases::PUNCH_IN).map(|ts| ts.date()))
        .or_else(|| fields.timestamp(aliases::PUNCH_OUT).map(|ts| ts.date()))
        .filter(|day| next_day(*day).is_some())
}

/// Splits sorted distinct days into maximal runs of consecutive days.
fn contiguous_runs(days: &BTreeMap<NaiveDate, Option<f64>>) -> Vec<DayRun> {
    let mut runs = Vec::new();
    let mut current: Option<DayRun> = None;

    for (&day, &hours) in days {
        let Some(after) = next_day(day) else {
            continue;
        };
        current = match current {
            Some(mut run) if run.end == day => {
                run.end = after;
                run.hours = sum_hours(run.hours, hours);
                Some(run)
            }
            previous => {
                runs.extend(previous);
                Some(DayRun {
                    start: day,
                    end: after,
                    hours,
                })
            }
        };
    }

    runs.extend(current);
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::span::test_support::day;

    fn build(rows: &[Value]) -> (Vec<Span>, BuildStats) {
        let mut stats = BuildStats::default();
        let spans = build_from_daily_rows(
            rows,
            &EmployeeIndex::new(),
            &mut KeyCache::new(),
            &mut stats,
        );
        (spans, stats)
    }

    fn daily(code: &str, project: &str, date: NaiveDate) -> Value {
        json!({"employee_code": code, "project": project, "work_date": date.to_string(), "hours": 8})
    }

    #[test]
    fn contiguous_days_become_one_span() {
        let rows: Vec<_> = (0..3).map(|d| daily("E100", "P1", day(d))).collect();
        let (spans, _) = build(&rows);

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start, day(0));
        assert_eq!(spans[0].end, day(3));
        assert_eq!(spans[0].meta.total_hours, Some(24.0));
    }

    #[test]
    fn gaps_split_runs() {
        // {D, D+1, D+2, D+5} -> [D, D+3) and [D+5, D+6)
        let rows: Vec<_> = [0, 1, 2, 5]
            .into_iter()
            .map(|d| daily("E1", "P1", day(d)))
            .collect();
        let (spans, _) = build(&rows);

        let ranges: Vec<_> = spans.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(ranges, vec![(day(0), day(3)), (day(5), day(6))]);
        assert_eq!(spans[0].meta.total_hours, Some(24.0));
        assert_eq!(spans[1].meta.total_hours, Some(8.0));
    }

    #[test]
    fn duplicate_days_do_not_add_spans() {
        let rows = vec![
            daily("E1", "P1", day(0)),
            daily("E1", "P1", day(0)),
            daily("E1", "P1", day(1)),
            daily("E1", "P1", day(1)),
        ];
        let (spans, _) = build(&rows);

        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].end), (day(0), day(2)));
        // Hours from both punches of a day still count.
        assert_eq!(spans[0].meta.total_hours, Some(32.0));
    }

    #[test]
    fn unsorted_input_is_handled() {
        let rows = vec![
            daily("E1", "P1", day(2)),
            daily("E1", "P1", day(0)),
            daily("E1", "P1", day(1)),
        ];
        let (spans, _) = build(&rows);
        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].end), (day(0), day(3)));
    }

    #[test]
    fn buckets_split_by_employee_and_project() {
        let rows = vec![
            daily("E1", "P1", day(0)),
            daily("E1", "P2", day(0)),
            daily("E2", "P1", day(0)),
            daily("e1", "P1", day(1)),
        ];
        let (spans, _) = build(&rows);

        let keys: Vec<_> = spans
            .iter()
            .map(|s| (s.employee_code.as_str(), s.project.as_str(), s.days()))
            .collect();
        assert_eq!(keys, vec![("E1", "P1", 2), ("E1", "P2", 1), ("E2", "P1", 1)]);
    }

    #[test]
    fn day_falls_back_to_punch_timestamps() {
        let rows = vec![
            json!({"emp_no": "E1", "project": "P1", "clock_in": "2024-01-01T08:00:00", "clock_out": "2024-01-01T12:00:00"}),
            json!({"emp_no": "E1", "project": "P1", "clock_out": "2024-01-02T17:00:00"}),
        ];
        let (spans, _) = build(&rows);

        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].end), (day(0), day(2)));
        // Only the first row carries a usable punch pair.
        assert_eq!(spans[0].meta.total_hours, Some(4.0));
    }

    #[test]
    fn rows_without_code_or_day_are_dropped() {
        let rows = vec![
            json!({"project": "P1", "work_date": "2024-01-01"}),
            json!({"employee_code": "E1", "project": "P1"}),
            json!({"employee_code": "E1", "project": "P1", "work_date": "someday"}),
        ];
        let (spans, stats) = build(&rows);

        assert!(spans.is_empty());
        assert_eq!(stats.dropped_missing_code, 1);
        assert_eq!(stats.dropped_missing_date, 2);
    }

    #[test]
    fn last_representable_day_is_dropped() {
        let rows = vec![
            json!({"employee_code": "E1", "work_date": "+262142-12-31"}),
            json!({"employee_code": "E1", "work_date": "2024-01-01"}),
        ];
        let (spans, stats) = build(&rows);

        assert_eq!(stats.dropped_missing_date, 1);
        assert_eq!(spans.len(), 1);
        assert!(spans[0].end > spans[0].start);
    }

    #[test]
    fn missing_hours_leave_total_absent() {
        let rows = vec![json!({"employee_code": "E1", "work_date": "2024-01-01"})];
        let (spans, _) = build(&rows);

        assert_eq!(spans[0].project, "Unknown");
        assert_eq!(spans[0].meta.total_hours, None);
    }

    #[test]
    fn last_row_metadata_wins() {
        let rows = vec![
            json!({"employee_code": "E1", "project": "P1", "work_date": "2024-01-01", "activity_code": "A1"}),
            json!({"employee_code": "E1", "project": "P1", "work_date": "2024-01-02", "activity_code": "A2"}),
        ];
        let (spans, _) = build(&rows);
        assert_eq!(spans[0].meta.activity_code.as_deref(), Some("A2"));
    }

    #[test]
    fn contiguous_runs_of_empty_set() {
        assert!(contiguous_runs(&BTreeMap::new()).is_empty());
    }
}
