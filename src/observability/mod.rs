//! Observability subsystem for daylog
//!
//! - Structured logging through `tracing`
//! - JSON output for production, pretty output for development
//! - Typed lifecycle events (`Event`) as the `event` field
//!
//! # Usage
//!
//! ```ignore
//! use daylog::observability::{init_logging, Event, LogFormat};
//!
//! init_logging(LogFormat::Json);
//! tracing::info!(event = %Event::Serving, addr = "0.0.0.0:8000");
//! ```

mod events;

pub use events::Event;

use std::sync::Once;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Human-readable
    #[default]
    Pretty,
}

/// Initializes the global subscriber.
///
/// `RUST_LOG` controls levels (default `info`). Calls after the first are
/// no-ops.
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let registry = tracing_subscriber::registry().with(env_filter);
        let result = match format {
            LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
            LogFormat::Pretty => registry.with(fmt::layer().with_target(false)).try_init(),
        };

        if let Err(e) = result {
            eprintln!("logging already initialized: {}", e);
        }
    });
}
