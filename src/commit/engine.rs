//! Serialized commit path
//!
//! The writer lane is held from the reload through the rename. Two commits
//! can therefore never load the same prior state, which would let the
//! second rewrite silently drop the first row.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use super::errors::CommitResult;
use crate::observability::Event;
use crate::table::{Payload, Row, Table, TableLoader, TableResult, TableWriter};
use crate::validation::{validate_columns, validate_row, ColumnRequest};

/// Builds the row for `payload` over the whole schema (NA for absent
/// columns) and appends it. The payload must already be validated.
fn append_row(table: &mut Table, timestamp: &str, payload: &Payload) -> TableResult<()> {
    let row = Row::from_payload(table.schema(), timestamp, payload);
    table.push(row)
}

/// Owner of the single writer lane for one table file.
#[derive(Debug)]
pub struct CommitEngine {
    loader: TableLoader,
    writer: TableWriter,
    lane: Mutex<()>,
}

impl CommitEngine {
    /// Creates an engine for the given table file.
    pub fn new(table_path: impl Into<PathBuf>) -> Self {
        let path = table_path.into();
        Self {
            loader: TableLoader::new(&path),
            writer: TableWriter::new(path),
            lane: Mutex::new(()),
        }
    }

    /// Returns the table file path.
    pub fn path(&self) -> &Path {
        self.writer.path()
    }

    /// Validates and commits one row.
    ///
    /// Returns the updated table for confirmation; the durable effect is
    /// the file rewrite.
    ///
    /// # Errors
    ///
    /// - `StorageUnavailable` if the file cannot be loaded or rewritten
    /// - column errors (`EmptyPayloadColumns`, `UnknownColumns`)
    /// - row errors (`BadTimestamp`, `NoData`, `NullValue`)
    pub fn commit(&self, timestamp: &str, payload: &Payload) -> CommitResult<Table> {
        // The lane guards no data: a panic in an earlier commit cannot
        // leave the file half-written, so a poisoned lock is still usable.
        let _lane = self.lane.lock().unwrap_or_else(PoisonError::into_inner);

        debug!(event = %Event::CommitBegin, timestamp, fields = payload.len());

        let mut table = self.loader.load_schema_seeded()?;
        validate_columns(ColumnRequest::Commit(payload), table.schema())?;
        validate_row(timestamp, payload)?;

        append_row(&mut table, timestamp, payload)?;
        self.writer.persist(&table)?;

        Ok(table)
    }
}
