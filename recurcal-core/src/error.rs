//! Error types for recurcal.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur in recurcal operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("{0} is not an occurrence of this series")]
    NotAnOccurrence(NaiveDate),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for recurcal operations.
pub type CoreResult<T> = Result<T, CoreError>;
