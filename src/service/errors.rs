//! # Service Errors
//!
//! The externally visible error taxonomy and its HTTP mapping.
//!
//! | Error | Status |
//! |---|---|
//! | validation failures, malformed bodies | 400 |
//! | empty table | 204, no body |
//! | storage unavailable, internal | 500 |

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::commit::CommitError;
use crate::table::{TableError, TableErrorCode};
use crate::validation::{ColumnError, RowError};

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service boundary errors
#[derive(Debug, Error)]
pub enum ServiceError {
    // ==================
    // Storage
    // ==================
    #[error(transparent)]
    Table(#[from] TableError),

    // ==================
    // Client Errors (4xx)
    // ==================
    #[error(transparent)]
    Columns(#[from] ColumnError),

    #[error(transparent)]
    Row(#[from] RowError),

    /// Body is not valid JSON, misses fields, has unknown keys or
    /// unsupported value types
    #[error("Invalid request body: {0}")]
    InvalidPayload(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CommitError> for ServiceError {
    fn from(err: CommitError) -> Self {
        match err {
            CommitError::Table(e) => ServiceError::Table(e),
            CommitError::Columns(e) => ServiceError::Columns(e),
            CommitError::Row(e) => ServiceError::Row(e),
        }
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::InvalidPayload(rejection.body_text())
    }
}

impl ServiceError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Table(e) => match e.code() {
                TableErrorCode::EmptyTable => StatusCode::NO_CONTENT,
                TableErrorCode::StorageUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServiceError::Columns(_) | ServiceError::Row(_) | ServiceError::InvalidPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Table(e) => e.code().code(),
            ServiceError::Columns(e) => e.code(),
            ServiceError::Row(e) => e.code(),
            ServiceError::InvalidPayload(_) => "DAYLOG_INVALID_PAYLOAD",
            ServiceError::Internal(_) => "DAYLOG_INTERNAL",
        }
    }

    /// Message shown to the caller.
    ///
    /// Client errors carry enough detail to fix the request. Server errors
    /// stay generic; the full cause goes to the log.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Table(TableError::StorageUnavailable { .. }) => {
                "An error occurred while importing the database".to_string()
            }
            ServiceError::Table(TableError::EmptyTable { .. }) => "The database is empty".to_string(),
            ServiceError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Offending column names, if any
    pub fn columns(&self) -> Option<&[String]> {
        match self {
            ServiceError::Columns(e) => e.columns(),
            ServiceError::Row(e) => e.columns(),
            _ => None,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
}

impl From<&ServiceError> for ErrorResponse {
    fn from(err: &ServiceError) -> Self {
        Self {
            error: err.public_message(),
            code: err.code().to_string(),
            status: err.status_code().as_u16(),
            columns: err.columns().map(<[String]>::to_vec),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::NO_CONTENT {
            return status.into_response();
        }
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}
