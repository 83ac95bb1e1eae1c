//! Overlaps command: employees booked on intersecting assignments.

use std::io::Write;

use anyhow::{Context, Result};
use tl_core::{Overlap, Pipeline, Span, find_overlaps};

use crate::Config;
use crate::cli::OverlapsArgs;
use crate::input::Batch;

pub fn run<W: Write>(writer: &mut W, args: &OverlapsArgs, config: &Config) -> Result<()> {
    let employees = args
        .input
        .employees
        .as_deref()
        .or(config.employees_path.as_deref());
    let batch = Batch::load(&args.input.rows, employees, config.key_cache_capacity)?;

    let options = config.build_options().context("invalid configuration")?;
    let outcome = Pipeline::new(options).run(&batch.rows, &batch.employees);
    let overlaps = find_overlaps(&outcome.spans);

    if args.json {
        serde_json::to_writer_pretty(&mut *writer, &overlaps)?;
        writeln!(writer)?;
    } else {
        write_overlaps(writer, &overlaps)?;
    }

    Ok(())
}

/// Writes one line per overlapping pair.
pub fn write_overlaps<W: Write>(writer: &mut W, overlaps: &[Overlap]) -> std::io::Result<()> {
    if overlaps.is_empty() {
        return writeln!(writer, "No overlapping assignments.");
    }

    writeln!(writer, "{} overlap(s)", overlaps.len())?;
    for overlap in overlaps {
        writeln!(
            writer,
            "{} ({}): {} x {}, {} shared days",
            overlap.employee,
            overlap.a.employee_code,
            describe(&overlap.a),
            describe(&overlap.b),
            overlap.shared_days()
        )?;
    }
    Ok(())
}

fn describe(span: &Span) -> String {
    format!("{} [{}, {})", span.project, span.start, span.end)
}
