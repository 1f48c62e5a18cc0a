//! CLI argument definitions using clap
//!
//! Commands:
//! - daylog serve [--config <path>] [--table <path>] [--host <host>] [--port <port>]
//! - daylog init --table <path> --columns a,b,c [--force]
//! - daylog inspect --table <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// daylog - A small, strict record store for time-stamped log data
#[derive(Parser, Debug)]
#[command(name = "daylog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the table over HTTP
    Serve {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Table file (overrides the config file)
        #[arg(long, env = "DAYLOG_TABLE_PATH")]
        table: Option<PathBuf>,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Create a header-only table file
    Init {
        /// Table file to create
        #[arg(long, env = "DAYLOG_TABLE_PATH")]
        table: PathBuf,

        /// Comma-separated column names
        #[arg(long, value_delimiter = ',', required = true)]
        columns: Vec<String>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Report the table dimensions and exit
    Inspect {
        /// Table file to read
        #[arg(long, env = "DAYLOG_TABLE_PATH")]
        table: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
