//! Request Context
//!
//! Carried through one request: identity for log correlation and timing.

use std::time::Instant;

use axum::http::StatusCode;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::errors::ServiceError;
use crate::observability::Event;

/// Context of a single request
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request ID for tracing
    pub request_id: Uuid,

    /// Operation name: get, commit, healthcheck
    pub op: &'static str,

    /// Caller-supplied user name, once the body is parsed
    pub user: Option<String>,

    /// Start time for duration tracking
    started_at: Instant,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(op: &'static str) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            op,
            user: None,
            started_at: Instant::now(),
        }
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }

    fn user(&self) -> &str {
        self.user.as_deref().unwrap_or("-")
    }

    /// Log a successful request
    pub fn log_success(&self, event: Event, rows: usize) {
        info!(
            event = %event,
            request_id = %self.request_id,
            op = self.op,
            user = self.user(),
            rows,
            elapsed_ms = self.elapsed_ms() as u64,
        );
    }

    /// Log a failed request at a level matching who is at fault
    pub fn log_failure(&self, event: Event, err: &ServiceError) {
        let code = err.code();
        let elapsed_ms = self.elapsed_ms() as u64;

        match err.status_code() {
            StatusCode::NO_CONTENT => info!(
                event = %event,
                request_id = %self.request_id,
                op = self.op,
                user = self.user(),
                code,
                elapsed_ms,
                "table has no rows yet"
            ),
            status if status.is_server_error() => {
                let cause = std::error::Error::source(err)
                    .map(|s| s.to_string())
                    .unwrap_or_default();
                error!(
                    event = %event,
                    request_id = %self.request_id,
                    op = self.op,
                    user = self.user(),
                    code,
                    error = %err,
                    cause = %cause,
                    elapsed_ms,
                    "request failed"
                )
            }
            _ => warn!(
                event = %event,
                request_id = %self.request_id,
                op = self.op,
                user = self.user(),
                code,
                error = %err,
                elapsed_ms,
                "request rejected"
            ),
        }
    }
}
