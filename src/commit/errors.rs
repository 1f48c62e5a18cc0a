use thiserror::Error;

use crate::table::TableError;
use crate::validation::{ColumnError, RowError};

/// Failure of a commit, at whichever step it stopped
#[derive(Debug, Error)]
pub enum CommitError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Columns(#[from] ColumnError),

    #[error(transparent)]
    Row(#[from] RowError),
}

impl CommitError {
    /// Returns the stable string code of the underlying error
    pub fn code(&self) -> &'static str {
        match self {
            CommitError::Table(e) => e.code().code(),
            CommitError::Columns(e) => e.code(),
            CommitError::Row(e) => e.code(),
        }
    }
}

pub type CommitResult<T> = Result<T, CommitError>;
