//! daylog - A small, strict record store for time-stamped log data
//!
//! One CSV table file, keyed by a `YYYY-MM-DD HH:MM:SS` timestamp, served
//! over HTTP. Reads project columns; commits append one validated row and
//! rewrite the file atomically.

pub mod cli;
pub mod commit;
pub mod config;
pub mod observability;
pub mod query;
pub mod service;
pub mod table;
pub mod validation;
