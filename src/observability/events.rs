//! Observability events for daylog
//!
//! Every lifecycle log line carries one of these as its `event` field.
//! Events are explicit and typed.

use std::fmt;

/// Observable events in daylog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Startup begins
    BootStart,
    /// Configuration loaded
    ConfigLoaded,
    /// Listening for requests
    Serving,
    /// Shutdown requested
    Shutdown,

    // Table file
    /// Table file parsed
    TableLoaded,
    /// Table file has a header but no rows
    TableEmpty,
    /// Table file missing or corrupt
    TableLoadFailed,
    /// Table file rewritten
    TablePersisted,
    /// Header-only table file created
    TableInitialized,

    // Reads
    /// Projection served
    QueryExecuted,
    /// Read refused
    QueryRejected,
    /// Healthcheck served
    HealthChecked,
    /// Healthcheck could not read the table
    HealthCheckFailed,

    // Writes
    /// Commit entered the writer lane
    CommitBegin,
    /// Row durably committed
    CommitComplete,
    /// Commit refused
    CommitRejected,
}

impl Event {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "BOOT_START",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "SERVING",
            Event::Shutdown => "SHUTDOWN",
            Event::TableLoaded => "TABLE_LOADED",
            Event::TableEmpty => "TABLE_EMPTY",
            Event::TableLoadFailed => "TABLE_LOAD_FAILED",
            Event::TablePersisted => "TABLE_PERSISTED",
            Event::TableInitialized => "TABLE_INITIALIZED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::HealthChecked => "HEALTH_CHECKED",
            Event::HealthCheckFailed => "HEALTH_CHECK_FAILED",
            Event::CommitBegin => "COMMIT_BEGIN",
            Event::CommitComplete => "COMMIT_COMPLETE",
            Event::CommitRejected => "COMMIT_REJECTED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
