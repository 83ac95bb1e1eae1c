//! Assignment timeline CLI library.
//!
//! Argument parsing, configuration, input loading and the `tl` subcommands.

mod cli;
pub mod commands;
mod config;
pub mod input;

pub use cli::{Cli, Commands, InputArgs, OverlapsArgs, ShapeArgs, SpansArgs};
pub use config::Config;
