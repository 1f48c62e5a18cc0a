//! HTTP service boundary
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/get` | 200, projection JSON |
//! | POST | `/commit` | 201, no body |
//! | GET | `/healthcheck` | 200, `{columns, rows}` |
//!
//! `GET /get` carries a JSON body. An empty table answers 204 on reads;
//! validation failures answer 400; storage failures answer 500.

mod context;
mod errors;
mod handlers;
mod request;
mod server;

pub use context::RequestContext;
pub use errors::{ErrorResponse, ServiceError, ServiceResult};
pub use handlers::{ServiceState, SharedState};
pub use request::{CommitRequest, GetRequest, HealthResponse};
pub use server::HttpServer;
