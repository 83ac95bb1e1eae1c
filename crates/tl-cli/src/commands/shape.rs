//! Shape command: how a batch of rows would be routed.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use tl_core::{BatchShape, FieldIndex, KeyCache, RowShape};

use crate::Config;
use crate::cli::ShapeArgs;
use crate::input::read_records;

/// Batch shape plus per-shape row counts.
#[derive(Debug, Serialize)]
pub struct ShapeReport {
    #[serde(serialize_with = "shape_name")]
    pub shape: BatchShape,
    pub rows: usize,
    pub span_rows: usize,
    pub daily_rows: usize,
}

impl ShapeReport {
    /// Classifies every row of `rows`.
    pub fn of(rows: &[Value], cache: &mut KeyCache) -> Self {
        let shapes: Vec<RowShape> = rows
            .iter()
            .map(|row| RowShape::of(&FieldIndex::new(row, cache)))
            .collect();
        let span_rows = shapes.iter().filter(|s| **s == RowShape::Span).count();

        Self {
            shape: BatchShape::classify(shapes.iter().copied()),
            rows: rows.len(),
            span_rows,
            daily_rows: rows.len() - span_rows,
        }
    }
}

fn shape_name<S>(shape: &BatchShape, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(shape.as_str())
}

pub fn run<W: Write>(writer: &mut W, args: &ShapeArgs, config: &Config) -> Result<()> {
    let rows = read_records(&args.rows)?;
    let report = ShapeReport::of(&rows, &mut KeyCache::with_capacity(config.key_cache_capacity));

    if args.json {
        serde_json::to_writer_pretty(&mut *writer, &report)?;
        writeln!(writer)?;
    } else {
        write_report(writer, &report)?;
    }

    Ok(())
}

pub fn write_report<W: Write>(writer: &mut W, report: &ShapeReport) -> std::io::Result<()> {
    writeln!(writer, "shape: {}", report.shape)?;
    writeln!(writer, "rows: {}", report.rows)?;
    writeln!(writer, "span rows: {}", report.span_rows)?;
    writeln!(writer, "daily rows: {}", report.daily_rows)
}
