//! # HTTP Server
//!
//! Binds the three endpoints to one table file and serves until Ctrl-C.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::handlers::{commit_handler, get_handler, healthcheck_handler, ServiceState, SharedState};
use crate::config::ServiceConfig;
use crate::observability::Event;

/// HTTP server for one table file
pub struct HttpServer {
    config: ServiceConfig,
    state: SharedState,
}

impl HttpServer {
    /// Create a server for the table named in `config`
    pub fn with_config(config: ServiceConfig) -> Self {
        let state = Arc::new(ServiceState::new(&config.table_path));
        Self { config, state }
    }

    /// Build the router over shared state
    pub fn build_router(state: SharedState) -> Router {
        Router::new()
            .route("/get", get(get_handler))
            .route("/commit", post(commit_handler))
            .route("/healthcheck", get(healthcheck_handler))
            .with_state(state)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        Self::build_router(self.state)
    }

    /// Logs whether the table is readable. Not fatal: the file may be
    /// repaired or seeded while the server runs.
    fn probe_table(&self) {
        let loader = self.state.loader();
        match loader.load() {
            Ok(table) => info!(
                event = %Event::TableLoaded,
                path = %loader.path().display(),
                columns = table.column_count(),
                rows = table.row_count(),
            ),
            Err(e) if e.is_empty_table() => warn!(
                event = %Event::TableEmpty,
                path = %loader.path().display(),
                "table has no rows; reads return no content until the first commit"
            ),
            Err(e) => warn!(
                event = %Event::TableLoadFailed,
                path = %loader.path().display(),
                error = %e,
                "table is not readable; requests will fail until it is"
            ),
        }
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        self.probe_table();

        let listener = TcpListener::bind(addr).await?;
        info!(
            event = %Event::Serving,
            addr = %addr,
            table = %self.config.table_path.display(),
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!(event = %Event::Shutdown);
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
