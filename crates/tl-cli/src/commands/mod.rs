//! Command implementations.

pub mod overlaps;
pub mod shape;
pub mod spans;
pub mod util;
