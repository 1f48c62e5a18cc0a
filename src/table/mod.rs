//! Table File subsystem for daylog
//!
//! The table file is the only persistent state of the service: a CSV file
//! whose header defines the schema and whose lines are the rows.
//!
//! # Design Principles
//!
//! - The header is the single source of truth for the schema
//! - Every request reloads the file; nothing is cached across requests
//! - Whole-file rewrites only, through a temp file and a rename
//! - A header-only file is reported as empty, never as valid content

mod errors;
mod loader;
mod types;
mod writer;

pub use errors::{TableError, TableErrorCode, TableResult};
pub use loader::TableLoader;
pub use types::{Cell, ColumnKind, Payload, Row, Scalar, Schema, Table, INDEX_COLUMN};
pub use writer::TableWriter;
