//! Read-only employee lookup keyed by normalized employee code.

use std::collections::HashMap;

use serde_json::Value;

use crate::fields::{FieldIndex, KeyCache, aliases};
use crate::types::EmployeeCode;

/// The fields of an employee record the pipeline cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeRecord {
    /// Stable identifier, carried onto spans as `employee_id`.
    pub id: Option<String>,
    /// Full display name, when the roster stores one.
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl EmployeeRecord {
    /// Human-readable name: the stored name, else first and last name composed.
    pub fn display_name(&self) -> Option<String> {
        self.name
            .clone()
            .or_else(|| compose_name(self.first_name.as_deref(), self.last_name.as_deref()))
    }
}

/// Joins first and last name, skipping whichever is missing.
pub(crate) fn compose_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = [first, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Lookup from normalized employee code to employee record.
#[derive(Debug, Clone, Default)]
pub struct EmployeeIndex {
    records: HashMap<EmployeeCode, EmployeeRecord>,
}

impl EmployeeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from heterogeneous roster records.
    ///
    /// Records without a resolvable code are skipped. A later record with the
    /// same code replaces an earlier one.
    pub fn from_records<'a, I>(records: I, cache: &mut KeyCache) -> Self
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut index = Self::new();
        let mut skipped = 0_usize;
        for raw in records {
            let fields = FieldIndex::new(raw, cache);
            let Some(code) = fields
                .text(aliases::ROSTER_CODE)
                .and_then(|c| EmployeeCode::new(c).ok())
            else {
                skipped += 1;
                continue;
            };
            index.insert(
                code,
                EmployeeRecord {
                    id: fields.text(aliases::EMPLOYEE_ID),
                    name: fields.text(aliases::EMPLOYEE_NAME),
                    first_name: fields.text(aliases::FIRST_NAME),
                    last_name: fields.text(aliases::LAST_NAME),
                },
            );
        }
        tracing::debug!(employees = index.len(), skipped, "built employee index");
        index
    }

    pub fn insert(&mut self, code: EmployeeCode, record: EmployeeRecord) {
        self.records.insert(code, record);
    }

    pub fn get(&self, code: &EmployeeCode) -> Option<&EmployeeRecord> {
        self.records.get(code)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
