//! Loading timecard rows and employee rosters from JSON files.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tl_core::{EmployeeIndex, KeyCache};

/// Keys under which paginated API dumps wrap their records.
const WRAPPER_KEYS: &[&str] = &["rows", "data", "items", "results", "records"];

/// Reads records from `path`, or from stdin when `path` is `-`.
pub fn read_records(path: &Path) -> Result<Vec<Value>> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };

    parse_records(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Parses a JSON array, a wrapper object holding one, or JSON Lines.
///
/// Only the container has to be valid: individual records may be any JSON
/// value and are left to the pipeline to accept or drop.
pub fn parse_records(content: &str) -> Result<Vec<Value>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    if let Ok(document) = serde_json::from_str::<Value>(content) {
        return Ok(match document {
            Value::Array(records) => records,
            Value::Object(mut object) => {
                let wrapped = WRAPPER_KEYS
                    .iter()
                    .find_map(|key| match object.remove(*key) {
                        Some(Value::Array(records)) => Some(records),
                        _ => None,
                    });
                wrapped.unwrap_or_else(|| vec![Value::Object(object)])
            }
            other => vec![other],
        });
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("invalid JSON on line {}", i + 1))
        })
        .collect()
}

/// Timecard rows plus the roster they resolve against.
#[derive(Debug)]
pub struct Batch {
    pub rows: Vec<Value>,
    pub employees: EmployeeIndex,
}

impl Batch {
    /// Loads rows and, if given, the roster.
    pub fn load(rows: &Path, employees: Option<&Path>, key_cache_capacity: usize) -> Result<Self> {
        let rows = read_records(rows)?;
        let employees = match employees {
            Some(path) => {
                let records = read_records(path)?;
                EmployeeIndex::from_records(&records, &mut KeyCache::with_capacity(key_cache_capacity))
            }
            None => EmployeeIndex::new(),
        };
        tracing::debug!(rows = rows.len(), employees = employees.len(), "loaded batch");
        Ok(Self { rows, employees })
    }
}
