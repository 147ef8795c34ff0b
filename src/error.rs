//! Custom error types for LedgerLens
//!
//! Validation failures of the engine (`InvalidRange`, `InvalidBracketTable`)
//! are raised immediately. Degenerate numeric input (a zero previous period,
//! a zero budget, no clients) is never an error: the calculators return zero.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for LedgerLens operations
#[derive(Error, Debug)]
pub enum LedgerLensError {
    /// A period whose end falls before its start
    #[error("Invalid range: end {end} is before start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// A tax bracket table that is empty, non-contiguous, non-ascending or out of domain
    #[error("Invalid bracket table: {0}")]
    InvalidBracketTable(String),

    /// A period name the resolver does not know
    #[error("Unknown period: {0}")]
    UnknownPeriod(String),

    /// Validation errors for input data
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Record store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },
}

impl LedgerLensError {
    /// Create a "not found" error for monetary records
    pub fn record_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Record",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for savings goals
    pub fn goal_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Savings goal",
            identifier: identifier.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::InvalidRange { .. }
                | Self::InvalidBracketTable(_)
                | Self::UnknownPeriod(_)
        )
    }
}

impl From<std::io::Error> for LedgerLensError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerLensError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for LedgerLensError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(format!("YAML: {}", err))
    }
}

impl From<csv::Error> for LedgerLensError {
    fn from(err: csv::Error) -> Self {
        Self::Import(err.to_string())
    }
}

/// Result type alias for LedgerLens operations
pub type LedgerLensResult<T> = Result<T, LedgerLensError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_range_display() {
        let err = LedgerLensError::InvalidRange {
            start: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid range: end 2025-03-01 is before start 2025-03-10"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_not_found_error() {
        let err = LedgerLensError::record_not_found("rec-1234");
        assert_eq!(err.to_string(), "Record not found: rec-1234");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_bracket_table_is_validation() {
        let err = LedgerLensError::InvalidBracketTable("gap at 500000".into());
        assert_eq!(err.to_string(), "Invalid bracket table: gap at 500000");
        assert!(err.is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LedgerLensError = io_err.into();
        assert!(matches!(err, LedgerLensError::Io(_)));
    }
}
