//! Error types for Tally core operations.
//!
//! Every failure the core can report falls into one of a few kinds: bad
//! caller input, a reference to a record that does not exist, a backing
//! store that cannot be used, or an export that could not be written.
//! The CLI layer maps these to exit codes and user-facing hints.

use thiserror::Error;

use crate::storage::ExpenseId;

/// Result type alias for Tally operations.
pub type Result<T> = std::result::Result<T, TallyError>;

/// Core error type for Tally operations.
#[derive(Debug, Error)]
pub enum TallyError {
    /// Bad input: negative amount, missing required field, out-of-range month
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation referenced an expense id that does not exist
    #[error("Expense #{0} not found")]
    NotFound(ExpenseId),

    /// Backing database file is inaccessible or corrupt
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Export serialization or file write failed
    #[error("Export error: {0}")]
    Export(String),
}

impl TallyError {
    /// Whether this error was caused by caller input rather than the environment.
    pub fn is_validation(&self) -> bool {
        matches!(self, TallyError::Validation(_))
    }
}

impl From<rusqlite::Error> for TallyError {
    fn from(err: rusqlite::Error) -> Self {
        TallyError::StorageUnavailable(err.to_string())
    }
}

impl From<std::io::Error> for TallyError {
    fn from(err: std::io::Error) -> Self {
        TallyError::Export(err.to_string())
    }
}

impl From<csv::Error> for TallyError {
    fn from(err: csv::Error) -> Self {
        TallyError::Export(err.to_string())
    }
}

impl From<serde_json::Error> for TallyError {
    fn from(err: serde_json::Error) -> Self {
        TallyError::Export(err.to_string())
    }
}
