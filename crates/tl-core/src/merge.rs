//! Coalescing of touching or overlapping spans for the same employee and project.

use std::collections::HashMap;

use crate::span::Span;
use crate::types::EmployeeCode;

/// Merges spans sharing (employee code, project).
///
/// Within a group, spans are sorted by start and folded: a span starting on or
/// before the running span's exclusive end extends it (hours are summed),
/// anything later starts a new run. Groups come out in order of first
/// appearance, each ascending by start. Merging the output again is a no-op.
pub fn merge_spans(spans: Vec<Span>) -> Vec<Span> {
    let mut groups: Vec<Vec<Span>> = Vec::new();
    let mut positions: HashMap<(EmployeeCode, String), usize> = HashMap::new();

    for span in spans {
        let position = *positions.entry(span.group_key()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[position].push(span);
    }

    let mut merged = Vec::new();
    for mut group in groups {
        group.sort_by_key(|span| span.start);
        fold_group(group, &mut merged);
    }
    merged
}

/// Folds one start-sorted group into `out`.
fn fold_group(group: Vec<Span>, out: &mut Vec<Span>) {
    let mut running: Option<Span> = None;

    for span in group {
        running = match running {
            Some(mut current) if span.start <= current.end => {
                current.end = current.end.max(span.end);
                current.meta.absorb(&span.meta);
                Some(current)
            }
            previous => {
                out.extend(previous);
                Some(span)
            }
        };
    }

    out.extend(running);
}
