//! CLI command implementations

use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::info;

use crate::config::ServiceConfig;
use crate::observability::{init_logging, Event};
use crate::service::HttpServer;
use crate::table::{Schema, Table, TableLoader, TableWriter};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Main CLI entry point
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            config,
            table,
            host,
            port,
        } => serve(config.as_deref(), table, host, port),
        Command::Init {
            table,
            columns,
            force,
        } => init(&table, columns, force),
        Command::Inspect { table } => inspect(&table),
    }
}

/// Builds the service config from an optional file plus overrides.
///
/// Overrides win over file values. Without a file, `table` is required.
pub fn resolve_config(
    config_path: Option<&Path>,
    table: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> CliResult<ServiceConfig> {
    let mut config = match (config_path, table.as_ref()) {
        (Some(path), _) => ServiceConfig::load(path)?,
        (None, Some(table)) => ServiceConfig::new(table),
        (None, None) => {
            return Err(CliError::config_error(
                "No table file: pass --table, set DAYLOG_TABLE_PATH or use --config",
            ))
        }
    };

    if let Some(table) = table {
        config.table_path = table;
    }
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    config.validate()?;
    Ok(config)
}

/// Start the HTTP service and block until Ctrl-C
pub fn serve(
    config_path: Option<&Path>,
    table: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> CliResult<()> {
    let config = resolve_config(config_path, table, host, port)?;

    init_logging(config.log_format);
    info!(event = %Event::BootStart, version = env!("CARGO_PKG_VERSION"));
    info!(
        event = %Event::ConfigLoaded,
        table = %config.table_path.display(),
        addr = %config.socket_addr(),
    );

    let server = HttpServer::with_config(config);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

/// Create a header-only table file
///
/// Refuses to replace an existing file unless `force` is set. The file is
/// written through the same atomic path as commits.
pub fn init(table_path: &Path, columns: Vec<String>, force: bool) -> CliResult<()> {
    let schema = Schema::new(columns).map_err(CliError::invalid_columns)?;

    if table_path.exists() && !force {
        return Err(CliError::already_initialized(table_path));
    }

    let table = Table::new(schema);
    TableWriter::new(table_path).persist(&table)?;

    info!(
        event = %Event::TableInitialized,
        path = %table_path.display(),
        columns = table.column_count(),
    );

    write_response(json!({
        "table": table_path.display().to_string(),
        "columns": table.schema().columns(),
    }))
}

/// Print the table dimensions
pub fn inspect(table_path: &Path) -> CliResult<()> {
    match TableLoader::new(table_path).load() {
        Ok(table) => write_response(json!({
            "columns": table.column_count(),
            "rows": table.row_count(),
        })),
        Err(e) => {
            write_error(e.code().code(), &e.to_string())?;
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;
    use std::fs;
    use tempfile::TempDir;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_init_creates_header_only_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.csv");

        init(&path, columns(&["day_rank", "temperature"]), false).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "datetime,day_rank,temperature\n"
        );
    }

    #[test]
    fn test_init_refuses_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.csv");
        fs::write(&path, "datetime,a\n2020-05-01 20:30:45,1\n").unwrap();

        let err = init(&path, columns(&["b"]), false).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::AlreadyInitialized);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "datetime,a\n2020-05-01 20:30:45,1\n"
        );

        init(&path, columns(&["b"]), true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "datetime,b\n");
    }

    #[test]
    fn test_init_rejects_bad_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.csv");

        for bad in [
            columns(&["a", "a"]),
            columns(&["has space"]),
            columns(&["datetime"]),
        ] {
            let err = init(&path, bad, false).unwrap_err();
            assert_eq!(err.code(), &CliErrorCode::InvalidColumns);
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_inspect_empty_table_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.csv");
        fs::write(&path, "datetime,a\n").unwrap();

        let err = inspect(&path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::TableError);
    }

    #[test]
    fn test_inspect_populated_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.csv");
        fs::write(&path, "datetime,a,b\n2020-05-01 20:30:45,1,2\n").unwrap();

        assert!(inspect(&path).is_ok());
    }

    #[test]
    fn test_resolve_config_overrides() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("daylog.json");
        fs::write(
            &config_path,
            r#"{"table_path": "/data/db.csv", "port": 9000}"#,
        )
        .unwrap();

        let config = resolve_config(Some(config_path.as_path()), None, None, Some(9100)).unwrap();
        assert_eq!(config.table_path, PathBuf::from("/data/db.csv"));
        assert_eq!(config.port, 9100);

        let config = resolve_config(
            Some(config_path.as_path()),
            Some(PathBuf::from("/other/db.csv")),
            Some("127.0.0.1".into()),
            None,
        )
        .unwrap();
        assert_eq!(config.socket_addr(), "127.0.0.1:9000");
        assert_eq!(config.table_path, PathBuf::from("/other/db.csv"));
    }

    #[test]
    fn test_resolve_config_requires_table() {
        let err = resolve_config(None, None, None, None).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);

        let err = resolve_config(None, Some(PathBuf::from("/data/db.csv")), None, Some(0))
            .unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }
}
