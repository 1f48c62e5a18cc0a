//! Request and response bodies
//!
//! Unknown top-level keys are refused so that a misspelled field is not
//! silently ignored.

use serde::{Deserialize, Serialize};

use crate::table::Payload;

/// Body of `GET /get`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetRequest {
    pub user: String,
    /// Projection; absent or null means every column
    #[serde(default)]
    pub columns: Option<Vec<String>>,
}

/// Body of `POST /commit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommitRequest {
    pub user: String,
    /// Row key, `YYYY-MM-DD HH:MM:SS`
    pub datetime: String,
    pub data: Payload,
}

/// Body of a successful `GET /healthcheck`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub columns: usize,
    pub rows: usize,
}
