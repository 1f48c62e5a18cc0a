//! Endpoint handlers
//!
//! File I/O is blocking, so every table access runs on the blocking pool.
//! Reads never take the writer lane; they see the file as it was before or
//! after any concurrent commit's rename, never in between.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::debug;

use super::context::RequestContext;
use super::errors::{ServiceError, ServiceResult};
use super::request::{CommitRequest, GetRequest, HealthResponse};
use crate::commit::CommitEngine;
use crate::observability::Event;
use crate::query::{project, Projection};
use crate::table::{Payload, Table, TableLoader};
use crate::validation::{validate_columns, ColumnRequest};

// ==================
// Shared State
// ==================

/// State shared across handlers. The table path is fixed at construction.
#[derive(Debug)]
pub struct ServiceState {
    loader: TableLoader,
    commits: CommitEngine,
}

pub type SharedState = Arc<ServiceState>;

impl ServiceState {
    pub fn new(table_path: impl Into<PathBuf>) -> Self {
        let path = table_path.into();
        Self {
            loader: TableLoader::new(&path),
            commits: CommitEngine::new(path),
        }
    }

    pub fn loader(&self) -> &TableLoader {
        &self.loader
    }

    /// Loads the table and projects the requested columns
    pub fn query(&self, columns: Option<&[String]>) -> ServiceResult<Projection> {
        let table = self.loader.load()?;
        validate_columns(ColumnRequest::Get(columns), table.schema())?;
        Ok(project(&table, columns)?)
    }

    /// Reports the table dimensions
    pub fn health(&self) -> ServiceResult<HealthResponse> {
        let table = self.loader.load()?;
        Ok(HealthResponse {
            columns: table.column_count(),
            rows: table.row_count(),
        })
    }

    /// Commits one row through the writer lane
    pub fn commit(&self, timestamp: &str, payload: &Payload) -> ServiceResult<Table> {
        Ok(self.commits.commit(timestamp, payload)?)
    }
}

/// Runs blocking table work off the async workers
async fn run_blocking<T, F>(work: F) -> ServiceResult<T>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ServiceError::Internal(format!("blocking task failed: {}", e)))?
}

// ==================
// Handlers
// ==================

/// `GET /get`
pub async fn get_handler(
    State(state): State<SharedState>,
    payload: Result<Json<GetRequest>, JsonRejection>,
) -> ServiceResult<Json<Projection>> {
    let mut ctx = RequestContext::new("get");

    let result = match payload {
        Ok(Json(GetRequest { user, columns })) => {
            ctx.user = Some(user);
            run_blocking(move || state.query(columns.as_deref())).await
        }
        Err(rejection) => Err(rejection.into()),
    };

    match result {
        Ok(projection) => {
            ctx.log_success(Event::QueryExecuted, projection.index.len());
            Ok(Json(projection))
        }
        Err(e) => {
            ctx.log_failure(Event::QueryRejected, &e);
            Err(e)
        }
    }
}

/// `POST /commit`
pub async fn commit_handler(
    State(state): State<SharedState>,
    payload: Result<Json<CommitRequest>, JsonRejection>,
) -> ServiceResult<StatusCode> {
    let mut ctx = RequestContext::new("commit");

    let result = match payload {
        Ok(Json(CommitRequest {
            user,
            datetime,
            data,
        })) => {
            ctx.user = Some(user);
            debug!(
                request_id = %ctx.request_id,
                datetime = %datetime,
                fields = data.len(),
                "commit received"
            );
            run_blocking(move || state.commit(&datetime, &data)).await
        }
        Err(rejection) => Err(rejection.into()),
    };

    match result {
        Ok(table) => {
            ctx.log_success(Event::CommitComplete, table.row_count());
            Ok(StatusCode::CREATED)
        }
        Err(e) => {
            ctx.log_failure(Event::CommitRejected, &e);
            Err(e)
        }
    }
}

/// `GET /healthcheck`
pub async fn healthcheck_handler(
    State(state): State<SharedState>,
) -> ServiceResult<Json<HealthResponse>> {
    let ctx = RequestContext::new("healthcheck");

    match run_blocking(move || state.health()).await {
        Ok(health) => {
            ctx.log_success(Event::HealthChecked, health.rows);
            Ok(Json(health))
        }
        Err(e) => {
            ctx.log_failure(Event::HealthCheckFailed, &e);
            Err(e)
        }
    }
}
