//! Table error types
//!
//! Error codes:
//! - DAYLOG_STORAGE_UNAVAILABLE (server-side, fatal to the request)
//! - DAYLOG_EMPTY_TABLE (structurally valid file without rows)

use std::fmt;
use std::io;

use thiserror::Error;

/// Table-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableErrorCode {
    /// Missing, unreadable or structurally corrupt table file
    StorageUnavailable,
    /// Header present, zero data rows
    EmptyTable,
}

impl TableErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            TableErrorCode::StorageUnavailable => "DAYLOG_STORAGE_UNAVAILABLE",
            TableErrorCode::EmptyTable => "DAYLOG_EMPTY_TABLE",
        }
    }
}

impl fmt::Display for TableErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while loading or persisting the table file
#[derive(Debug, Error)]
pub enum TableError {
    /// The file cannot be opened, parsed or rewritten
    #[error("Storage unavailable: {message}")]
    StorageUnavailable {
        message: String,
        #[source]
        source: Option<io::Error>,
    },

    /// The file parses but holds no rows
    #[error("The table at {path} is empty")]
    EmptyTable { path: String },
}

impl TableError {
    /// Structural problem without an underlying I/O error
    pub fn malformed(message: impl Into<String>) -> Self {
        TableError::StorageUnavailable {
            message: message.into(),
            source: None,
        }
    }

    /// I/O failure with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        TableError::StorageUnavailable {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Header-only table
    pub fn empty(path: impl Into<String>) -> Self {
        TableError::EmptyTable { path: path.into() }
    }

    /// Returns the error code
    pub fn code(&self) -> TableErrorCode {
        match self {
            TableError::StorageUnavailable { .. } => TableErrorCode::StorageUnavailable,
            TableError::EmptyTable { .. } => TableErrorCode::EmptyTable,
        }
    }

    /// Returns whether this is the "no content yet" condition
    pub fn is_empty_table(&self) -> bool {
        self.code() == TableErrorCode::EmptyTable
    }
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;
