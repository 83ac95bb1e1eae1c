//! Row shape detection: pre-aggregated spans versus one-row-per-day records.

use std::fmt;

use serde::Serialize;

use crate::fields::{FieldIndex, aliases};

/// How a single row represents work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowShape {
    /// Exposes a start and/or end-of-range field.
    Span,
    /// Anything else: a work date or punch pair for a single day.
    Daily,
}

impl RowShape {
    /// Classifies one indexed row.
    pub fn of(fields: &FieldIndex<'_>) -> Self {
        if fields.has(aliases::SPAN_START) || fields.has(aliases::SPAN_END) {
            Self::Span
        } else {
            Self::Daily
        }
    }
}

/// Shape of a whole input batch, decided once at the pipeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum BatchShape {
    Empty,
    Spans,
    Daily,
    /// Both shapes occur; each partition is routed to its own builder.
    Mixed { span_rows: usize, daily_rows: usize },
}

impl BatchShape {
    /// Classifies a batch from its per-row shapes.
    pub fn classify<I>(shapes: I) -> Self
    where
        I: IntoIterator<Item = RowShape>,
    {
        let (span_rows, daily_rows) =
            shapes
                .into_iter()
                .fold((0_usize, 0_usize), |(spans, daily), shape| match shape {
                    RowShape::Span => (spans + 1, daily),
                    RowShape::Daily => (spans, daily + 1),
                });

        Self::from_counts(span_rows, daily_rows)
    }

    /// Shape of a batch already partitioned into span and daily rows.
    pub const fn from_counts(span_rows: usize, daily_rows: usize) -> Self {
        match (span_rows, daily_rows) {
            (0, 0) => Self::Empty,
            (_, 0) => Self::Spans,
            (0, _) => Self::Daily,
            (span_rows, daily_rows) => Self::Mixed {
                span_rows,
                daily_rows,
            },
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Spans => "spans",
            Self::Daily => "daily",
            Self::Mixed { .. } => "mixed",
        }
    }
}

impl fmt::Display for BatchShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::fields::KeyCache;

    fn shape_of(row: &serde_json::Value) -> RowShape {
        RowShape::of(&FieldIndex::new(row, &mut KeyCache::new()))
    }

    #[test]
    fn range_fields_make_span_rows() {
        assert_eq!(
            shape_of(&json!({"start_date": "2024-01-01", "end_date": "2024-01-05"})),
            RowShape::Span
        );
        assert_eq!(shape_of(&json!({"Start": "2024-01-01"})), RowShape::Span);
        assert_eq!(shape_of(&json!({"end": "2024-01-05"})), RowShape::Span);
    }

    #[test]
    fn work_date_and_punch_rows_are_daily() {
        assert_eq!(shape_of(&json!({"work_date": "2024-01-01"})), RowShape::Daily);
        assert_eq!(
            shape_of(&json!({"punch_in": "2024-01-01T08:00", "start_time": "08:00"})),
            RowShape::Daily
        );
        assert_eq!(shape_of(&json!({"start": "  "})), RowShape::Daily);
    }

    #[test]
    fn classify_batches() {
        assert_eq!(BatchShape::classify(Vec::<RowShape>::new()), BatchShape::Empty);
        assert_eq!(
            BatchShape::classify([RowShape::Span, RowShape::Span]),
            BatchShape::Spans
        );
        assert_eq!(BatchShape::classify([RowShape::Daily]), BatchShape::Daily);
        assert_eq!(
            BatchShape::classify([RowShape::Daily, RowShape::Span, RowShape::Daily]),
            BatchShape::Mixed {
                span_rows: 1,
                daily_rows: 2
            }
        );
    }

    #[test]
    fn from_counts_matches_classify() {
        for (spans, daily) in [(0, 0), (3, 0), (0, 2), (1, 4)] {
            let shapes = std::iter::repeat_n(RowShape::Span, spans)
                .chain(std::iter::repeat_n(RowShape::Daily, daily));
            assert_eq!(
                BatchShape::from_counts(spans, daily),
                BatchShape::classify(shapes)
            );
        }
    }

    #[test]
    fn batch_shape_serializes_tagged() {
        let json = serde_json::to_value(BatchShape::Mixed {
            span_rows: 1,
            daily_rows: 2,
        })
        .unwrap();
        assert_eq!(json, json!({"shape": "mixed", "span_rows": 1, "daily_rows": 2}));
        assert_eq!(BatchShape::Daily.to_string(), "daily");
    }
}
