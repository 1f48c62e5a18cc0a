//! Table loader: reads the table file and derives its schema
//!
//! The loader never mutates the file. Every structural problem is reported
//! as `StorageUnavailable`; a well-formed file without rows is reported as
//! `EmptyTable` by `load`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::errors::{TableError, TableResult};
use super::types::{ColumnKind, Row, Schema, Table};
use crate::observability::Event;

/// Loads the table file at a fixed, injected path.
#[derive(Debug, Clone)]
pub struct TableLoader {
    path: PathBuf,
}

impl TableLoader {
    /// Creates a loader for the given table file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the table file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the table, failing with `EmptyTable` when it has no rows.
    pub fn load(&self) -> TableResult<Table> {
        let table = self.load_schema_seeded()?;
        if table.is_empty() {
            debug!(event = %Event::TableEmpty, path = %self.path.display());
            return Err(TableError::empty(self.path.display().to_string()));
        }
        Ok(table)
    }

    /// Loads the table, accepting a header-only file.
    ///
    /// Used by the commit path: a freshly seeded file has a schema but no
    /// rows yet, and must still accept its first row.
    pub fn load_schema_seeded(&self) -> TableResult<Table> {
        let table = read_table(&self.path)?;
        debug!(
            event = %Event::TableLoaded,
            path = %self.path.display(),
            columns = table.column_count(),
            rows = table.row_count(),
        );
        Ok(table)
    }
}

fn read_table(path: &Path) -> TableResult<Table> {
    let file = File::open(path).map_err(|e| {
        TableError::io(format!("Failed to open table file: {}", path.display()), e)
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let header = reader
        .headers()
        .map_err(|e| parse_error(path, "header", e))?
        .clone();

    let schema = Schema::from_header(header.iter()).map_err(|reason| {
        TableError::malformed(format!(
            "Malformed header in {}: {}",
            path.display(),
            reason
        ))
    })?;

    let width = schema.len() + 1;
    let mut records = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|e| parse_error(path, "row", e))?;
        let line = record.position().map_or(0, |p| p.line());

        if record.len() != width {
            return Err(TableError::malformed(format!(
                "Skewed row in {} at line {}: expected {} fields, found {}",
                path.display(),
                line,
                width,
                record.len()
            )));
        }

        if record.get(0).map_or(true, str::is_empty) {
            return Err(TableError::malformed(format!(
                "Missing timestamp in {} at line {}",
                path.display(),
                line
            )));
        }

        records.push(record);
    }

    // Field 0 is the timestamp
    let kinds: Vec<ColumnKind> = (1..width)
        .map(|j| ColumnKind::infer(records.iter().filter_map(|r| r.get(j))))
        .collect();

    let mut table = Table::new(schema);
    for record in &records {
        let mut fields = record.iter();
        let timestamp = fields.next().unwrap_or_default();
        let values = kinds
            .iter()
            .zip(fields)
            .map(|(kind, raw)| kind.parse(raw))
            .collect();
        table.push(Row::new(timestamp, values))?;
    }

    Ok(table)
}

fn parse_error(path: &Path, what: &str, err: csv::Error) -> TableError {
    let message = format!("Failed to parse {} in {}: {}", what, path.display(), err);
    match err.into_kind() {
        csv::ErrorKind::Io(e) => TableError::io(message, e),
        _ => TableError::malformed(message),
    }
}
