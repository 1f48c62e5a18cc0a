//! Validation error types
//!
//! All of these are client errors: the caller can correct the request.

use thiserror::Error;

/// Column reference errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnError {
    /// A projection names the same column more than once
    #[error("There are duplicates in the requested columns: {}", .0.join(","))]
    DuplicateColumns(Vec<String>),

    /// Names outside the schema
    #[error("Some columns in the payload are not in the database: {}", .0.join(","))]
    UnknownColumns(Vec<String>),

    /// A commit without any field
    #[error("Columns (data) are empty")]
    EmptyPayloadColumns,
}

impl ColumnError {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ColumnError::DuplicateColumns(_) => "DAYLOG_DUPLICATE_COLUMNS",
            ColumnError::UnknownColumns(_) => "DAYLOG_UNKNOWN_COLUMNS",
            ColumnError::EmptyPayloadColumns => "DAYLOG_EMPTY_PAYLOAD_COLUMNS",
        }
    }

    /// Offending column names, if the error has any
    pub fn columns(&self) -> Option<&[String]> {
        match self {
            ColumnError::DuplicateColumns(c) | ColumnError::UnknownColumns(c) => Some(c),
            ColumnError::EmptyPayloadColumns => None,
        }
    }
}

/// Row errors on the commit path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// The row key does not match `YYYY-MM-DD HH:MM:SS`
    #[error("Bad index '{value}': {reason}")]
    BadTimestamp { value: String, reason: String },

    /// Nothing to commit
    #[error("No data to commit")]
    NoData,

    /// Explicit nulls, or values that would be stored as NA
    #[error("Some values are null: {}", .0.join(","))]
    NullValue(Vec<String>),
}

impl RowError {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            RowError::BadTimestamp { .. } => "DAYLOG_BAD_TIMESTAMP",
            RowError::NoData => "DAYLOG_NO_DATA",
            RowError::NullValue(_) => "DAYLOG_NULL_VALUE",
        }
    }

    /// Offending column names, if the error has any
    pub fn columns(&self) -> Option<&[String]> {
        match self {
            RowError::NullValue(c) => Some(c),
            _ => None,
        }
    }
}

pub type ColumnResult<T> = Result<T, ColumnError>;

pub type RowResult<T> = Result<T, RowError>;
