//! Spans command: build, merge and list assignment spans.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use tl_core::{BatchShape, BuildStats, Pipeline, Span, sort_for_display};

use super::util::{format_hours, parse_date};
use crate::Config;
use crate::cli::SpansArgs;
use crate::input::Batch;

/// JSON output for `tl spans --json`.
#[derive(Debug, Serialize)]
struct SpansReport<'a> {
    shape: BatchShape,
    stats: BuildStats,
    spans: &'a [Span],
}

pub fn run<W: Write>(writer: &mut W, args: &SpansArgs, config: &Config) -> Result<()> {
    let from = args.from.as_deref().map(parse_date).transpose()?;
    let to = args.to.as_deref().map(parse_date).transpose()?;

    let employees = args
        .input
        .employees
        .as_deref()
        .or(config.employees_path.as_deref());
    let batch = Batch::load(&args.input.rows, employees, config.key_cache_capacity)?;

    let options = config
        .build_options()
        .context("invalid configuration")?
        .with_merge(!args.raw);
    let mut outcome = Pipeline::new(options).run(&batch.rows, &batch.employees);

    outcome.spans.retain(|span| span.intersects(from, to));
    sort_for_display(&mut outcome.spans);

    if args.json {
        let report = SpansReport {
            shape: outcome.shape,
            stats: outcome.stats,
            spans: &outcome.spans,
        };
        serde_json::to_writer_pretty(&mut *writer, &report)?;
        writeln!(writer)?;
    } else {
        write_spans(writer, outcome.shape, &outcome.stats, &outcome.spans)?;
    }

    Ok(())
}

/// Writes the human-readable span listing.
pub fn write_spans<W: Write>(
    writer: &mut W,
    shape: BatchShape,
    stats: &BuildStats,
    spans: &[Span],
) -> std::io::Result<()> {
    writeln!(
        writer,
        "{} rows ({shape}), {} dropped, {} spans",
        stats.rows,
        stats.dropped(),
        spans.len()
    )?;
    for span in spans {
        writeln!(writer, "{}", format_span(span))?;
    }
    Ok(())
}

/// One span as `CODE  Name  Project  [start, end)  Nd  hours`.
pub fn format_span(span: &Span) -> String {
    format!(
        "{}  {}  {}  [{}, {})  {}d  {}",
        span.employee_code,
        span.employee,
        span.project,
        span.start,
        span.end,
        span.days(),
        format_hours(span.meta.total_hours)
    )
}
