//! Case- and format-insensitive field lookup over heterogeneous records.
//!
//! Timecard feeds spell the same field many ways (`work_date`, `workDate`,
//! `Work Date`). Every record is indexed once by its normalized key names, and
//! lookups walk an ordered alias list of already-normalized candidates.
//!
//! A field counts as present when it is non-null and, for strings, non-blank
//! after trimming. Nothing here fails: a missing field is just `None`.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::dates::{parse_day, parse_timestamp};

/// Normalizes a field name: lowercase, with spaces, hyphens and underscores removed.
pub fn normalize_key(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Caller-owned memo for [`normalize_key`].
///
/// Bounded: once `capacity` distinct names have been cached, the cache is
/// cleared wholesale before the next insert. A capacity of zero disables caching.
#[derive(Debug, Clone)]
pub struct KeyCache {
    entries: HashMap<String, String>,
    capacity: usize,
}

impl KeyCache {
    /// Default number of distinct field names remembered.
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Creates a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a cache holding at most `capacity` names.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
        }
    }

    /// Returns the normalized form of `name`, memoizing it.
    pub fn normalize(&mut self, name: &str) -> String {
        if let Some(key) = self.entries.get(name) {
            return key.clone();
        }
        let key = normalize_key(name);
        if self.capacity == 0 {
            return key;
        }
        if self.entries.len() >= self.capacity {
            self.entries.clear();
        }
        self.entries.insert(name.to_string(), key.clone());
        key
    }

    /// Number of cached names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every cached name.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for KeyCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns true when a value counts as present.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// A record's fields keyed by normalized name.
///
/// Built once per record; non-object records have no fields.
#[derive(Debug, Clone, Default)]
pub struct FieldIndex<'a> {
    fields: HashMap<String, &'a Value>,
}

impl<'a> FieldIndex<'a> {
    /// Indexes `record` by normalized key.
    ///
    /// When two keys collapse to the same normalized name the first present
    /// value wins.
    pub fn new(record: &'a Value, cache: &mut KeyCache) -> Self {
        let Some(object) = record.as_object() else {
            return Self::default();
        };

        let mut fields: HashMap<String, &'a Value> = HashMap::with_capacity(object.len());
        for (name, value) in object {
            let key = cache.normalize(name);
            let taken = fields.get(&key).is_some_and(|existing| is_present(existing));
            if !taken {
                fields.insert(key, value);
            }
        }
        Self { fields }
    }

    /// Returns the first present value among `aliases`.
    pub fn value(&self, aliases: &[&str]) -> Option<&'a Value> {
        aliases
            .iter()
            .filter_map(|alias| self.fields.get(*alias).copied())
            .find(|value| is_present(value))
    }

    /// Returns true when any alias is present.
    pub fn has(&self, aliases: &[&str]) -> bool {
        self.value(aliases).is_some()
    }

    /// First present alias rendered as trimmed text. Numbers and booleans are
    /// rendered with their JSON spelling.
    pub fn text(&self, aliases: &[&str]) -> Option<String> {
        self.raw_text(aliases).map(|s| s.trim().to_string())
    }

    /// Like [`FieldIndex::text`] but without trimming.
    pub fn raw_text(&self, aliases: &[&str]) -> Option<String> {
        self.candidates(aliases).find_map(value_as_text)
    }

    /// First alias holding a finite number, or a string that parses as one.
    pub fn number(&self, aliases: &[&str]) -> Option<f64> {
        self.candidates(aliases).find_map(value_as_number)
    }

    /// First alias that parses as a calendar day.
    pub fn day(&self, aliases: &[&str]) -> Option<NaiveDate> {
        self.candidates(aliases).find_map(parse_day)
    }

    /// First alias that parses as a timestamp.
    pub fn timestamp(&self, aliases: &[&str]) -> Option<NaiveDateTime> {
        self.candidates(aliases).find_map(parse_timestamp)
    }

    fn candidates<'s>(&'s self, aliases: &'s [&str]) -> impl Iterator<Item = &'a Value> + 's {
        aliases
            .iter()
            .filter_map(|alias| self.fields.get(*alias).copied())
            .filter(|value| is_present(value))
    }
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Ordered alias lists per logical field, in normalized form.
pub mod aliases {
    pub const EMPLOYEE_CODE: &[&str] = &[
        "employeecode",
        "empcode",
        "employeenumber",
        "employeeno",
        "empno",
        "empnum",
        "badge",
        "badgenumber",
        "workercode",
        "employeeid",
    ];

    pub const EMPLOYEE_NAME: &[&str] = &[
        "employeename",
        "employee",
        "empname",
        "fullname",
        "displayname",
        "name",
    ];

    pub const FIRST_NAME: &[&str] = &["firstname", "givenname", "fname"];

    pub const LAST_NAME: &[&str] = &["lastname", "surname", "familyname", "lname"];

    pub const PROJECT: &[&str] = &[
        "project",
        "projectcode",
        "projectid",
        "projectkey",
        "projectname",
        "projectnumber",
        "job",
        "jobnumber",
        "jobno",
        "jobid",
        "jobcode",
    ];

    /// Inclusive start of a pre-aggregated span.
    pub const SPAN_START: &[&str] = &[
        "start",
        "startdate",
        "spanstart",
        "fromdate",
        "datefrom",
        "from",
        "begin",
        "begindate",
    ];

    /// Exclusive end of a pre-aggregated span.
    pub const SPAN_END: &[&str] = &[
        "end",
        "enddate",
        "spanend",
        "enddateexclusive",
        "endexclusive",
        "todate",
        "dateto",
        "to",
        "finish",
    ];

    pub const WORK_DATE: &[&str] = &[
        "workdate",
        "date",
        "day",
        "workday",
        "workedon",
        "shiftdate",
        "punchdate",
        "entrydate",
    ];

    pub const PUNCH_IN: &[&str] = &[
        "punchin",
        "clockin",
        "timein",
        "intime",
        "in",
        "starttime",
        "startedat",
    ];

    pub const PUNCH_OUT: &[&str] = &[
        "punchout",
        "clockout",
        "timeout",
        "outtime",
        "out",
        "endtime",
        "endedat",
    ];

    pub const HOURS: &[&str] = &[
        "totalhours",
        "hours",
        "hoursworked",
        "workedhours",
        "regularhours",
        "durationhours",
        "qty",
    ];

    pub const JOB_CODE: &[&str] = &["jobcode", "jobnumber", "jobno"];

    pub const JOB_DESCRIPTION: &[&str] = &["jobdescription", "jobdesc", "jobname"];

    pub const ACTIVITY_CODE: &[&str] = &["activitycode", "costcode", "taskcode", "phasecode"];

    pub const ACTIVITY_DESCRIPTION: &[&str] = &[
        "activitydescription",
        "activitydesc",
        "costcodedescription",
        "taskdescription",
        "phasedescription",
    ];

    pub const ALLOCATION_CODE: &[&str] = &["allocationcode", "alloccode", "allocation"];

    /// Employee code as spelled in roster records.
    pub const ROSTER_CODE: &[&str] = &[
        "employeecode",
        "empcode",
        "employeenumber",
        "employeeno",
        "empno",
        "badge",
        "badgenumber",
        "code",
    ];

    /// Stable identifier in roster records.
    pub const EMPLOYEE_ID: &[&str] = &["id", "employeeid", "uuid", "recordid", "pk"];
}
