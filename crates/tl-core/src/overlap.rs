//! Detection of one employee being booked on overlapping date ranges.

use std::collections::HashMap;

use serde::Serialize;

use crate::span::Span;
use crate::types::EmployeeCode;

/// Two spans of the same employee whose date ranges intersect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlap {
    /// Display name of the employee.
    pub employee: String,
    /// The earlier-starting span.
    pub a: Span,
    pub b: Span,
}

impl Overlap {
    /// Number of days both spans cover.
    pub fn shared_days(&self) -> i64 {
        let start = self.a.start.max(self.b.start);
        let end = self.a.end.min(self.b.end);
        (end - start).num_days().max(0)
    }
}

/// Finds every pair of spans for the same employee whose ranges intersect.
///
/// Projects are ignored: two unmerged spans on the same project are reported
/// too, so callers wanting only cross-project conflicts should merge first.
/// Touching spans (`a.end == b.start`) do not overlap.
///
/// Each employee's spans are scanned in start order; the inner scan for a span
/// stops at the first later span starting at or after its end, since every
/// span after that starts later still.
pub fn find_overlaps(spans: &[Span]) -> Vec<Overlap> {
    let mut groups: Vec<Vec<&Span>> = Vec::new();
    let mut positions: HashMap<&EmployeeCode, usize> = HashMap::new();

    for span in spans {
        let position = *positions.entry(&span.employee_code).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[position].push(span);
    }

    let mut overlaps = Vec::new();
    for mut group in groups {
        group.sort_by_key(|span| (span.start, span.end));

        for (i, a) in group.iter().enumerate() {
            for b in &group[i + 1..] {
                if b.start >= a.end {
                    break;
                }
                overlaps.push(Overlap {
                    employee: a.employee.clone(),
                    a: (*a).clone(),
                    b: (*b).clone(),
                });
            }
        }
    }

    tracing::debug!(
        spans = spans.len(),
        overlaps = overlaps.len(),
        "overlap detection finished"
    );
    overlaps
}
