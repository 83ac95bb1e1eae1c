//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A chunk size of zero would never make progress.
    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,
}

/// A normalized employee code.
///
/// Codes arrive from HR feeds with stray whitespace and inconsistent casing
/// (`" e100 "`, `"E100"`). Both the timecard rows and the employee index key on
/// the normalized form: trimmed and upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmployeeCode(String);

impl EmployeeCode {
    /// Normalizes and validates a raw code.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let code = raw.as_ref().trim();
        if code.is_empty() {
            return Err(ValidationError::Empty {
                field: "employee code",
            });
        }
        Ok(Self(code.to_uppercase()))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmployeeCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmployeeCode> for String {
    fn from(code: EmployeeCode) -> Self {
        code.0
    }
}

impl fmt::Display for EmployeeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EmployeeCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employee_code_rejects_blank() {
        assert!(EmployeeCode::new("").is_err());
        assert!(EmployeeCode::new("   ").is_err());
        assert!(EmployeeCode::new("E100").is_ok());
    }

    #[test]
    fn employee_code_normalizes_case_and_whitespace() {
        let code = EmployeeCode::new("  e100 ").unwrap();
        assert_eq!(code.as_str(), "E100");
        assert_eq!(code, EmployeeCode::new("E100").unwrap());
    }

    #[test]
    fn employee_code_serde_roundtrip() {
        let code = EmployeeCode::new("e42").unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"E42\"");
        let parsed: EmployeeCode = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, code);
    }

    #[test]
    fn employee_code_serde_rejects_blank() {
        let result: Result<EmployeeCode, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }

    #[test]
    fn validation_error_messages() {
        assert_eq!(
            ValidationError::Empty {
                field: "employee code"
            }
            .to_string(),
            "employee code cannot be empty"
        );
        assert_eq!(
            ValidationError::ZeroChunkSize.to_string(),
            "chunk size must be greater than zero"
        );
    }
}
