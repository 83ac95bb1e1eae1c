//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Assignment timeline builder.
///
/// Turns timecard exports into per-employee, per-project assignment spans and
/// flags employees booked on overlapping projects.
#[derive(Debug, Parser)]
#[command(name = "tl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build assignment spans from timecard rows.
    Spans(SpansArgs),

    /// Report employees booked on overlapping assignments.
    Overlaps(OverlapsArgs),

    /// Show how a batch of rows would be interpreted.
    Shape(ShapeArgs),
}

/// Timecard and roster inputs shared by the span commands.
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Timecard rows: a JSON array or JSON Lines file, `-` for stdin.
    #[arg(long)]
    pub rows: PathBuf,

    /// Employee roster (JSON array or JSON Lines) for names and ids.
    /// Falls back to `employees_path` from the config file.
    #[arg(long)]
    pub employees: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct SpansArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Only show spans ending after this date (YYYY-MM-DD or "N days ago").
    #[arg(long)]
    pub from: Option<String>,

    /// Only show spans starting before this date (YYYY-MM-DD or "N days ago").
    #[arg(long)]
    pub to: Option<String>,

    /// Skip merging touching spans.
    #[arg(long)]
    pub raw: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct OverlapsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ShapeArgs {
    /// Timecard rows: a JSON array or JSON Lines file, `-` for stdin.
    #[arg(long)]
    pub rows: PathBuf,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}
