//! CLI module for daylog
//!
//! Provides command-line interface for:
//! - serve: Serve a table file over HTTP
//! - init: Create a header-only table file
//! - inspect: One-shot table health report

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{init, inspect, resolve_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
