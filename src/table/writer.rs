//! Table writer with atomic replace and fsync enforcement
//!
//! A persist never edits the table file in place:
//! 1. The full table is written to a temp file in the same directory
//! 2. The temp file is fsynced
//! 3. The temp file is renamed over the table file
//! 4. The directory is fsynced so the rename is durable
//!
//! Readers observe either the previous file or the new one, never a
//! partial write. On failure the previous file is left untouched.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use super::errors::{TableError, TableResult};
use super::types::Table;
use crate::observability::Event;

/// Persists whole tables to a fixed, injected path.
#[derive(Debug, Clone)]
pub struct TableWriter {
    path: PathBuf,
}

impl TableWriter {
    /// Creates a writer for the given table file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the table file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrites the table file with the full content of `table`.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if any step fails. The previous file
    /// content is unchanged in that case.
    pub fn persist(&self, table: &Table) -> TableResult<()> {
        let tmp_path = self.temp_path()?;

        let result = self
            .write_temp(&tmp_path, table)
            .and_then(|()| self.replace(&tmp_path));

        if result.is_err() {
            if let Err(e) = fs::remove_file(&tmp_path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %tmp_path.display(), error = %e, "failed to remove temp table file");
                }
            }
            return result;
        }

        debug!(
            event = %Event::TablePersisted,
            path = %self.path.display(),
            rows = table.row_count(),
        );
        Ok(())
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn temp_path(&self) -> TableResult<PathBuf> {
        let file_name = self.path.file_name().ok_or_else(|| {
            TableError::malformed(format!("Invalid table path: {}", self.path.display()))
        })?;

        Ok(self.directory().join(format!(
            ".{}.{}.tmp",
            file_name.to_string_lossy(),
            Uuid::new_v4().simple()
        )))
    }

    fn write_temp(&self, tmp_path: &Path, table: &Table) -> TableResult<()> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(tmp_path)
            .map_err(|e| {
                TableError::io(
                    format!("Failed to create temp table file: {}", tmp_path.display()),
                    e,
                )
            })?;

        // Keep the permissions of the file being replaced
        if let Ok(metadata) = fs::metadata(&self.path) {
            file.set_permissions(metadata.permissions()).map_err(|e| {
                TableError::io(
                    format!("Failed to copy permissions to: {}", tmp_path.display()),
                    e,
                )
            })?;
        }

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);

        let write_err = |e: csv::Error| {
            let message = format!("Failed to write table file: {}", tmp_path.display());
            match e.into_kind() {
                csv::ErrorKind::Io(io) => TableError::io(message, io),
                other => TableError::malformed(format!("{}: {:?}", message, other)),
            }
        };

        writer
            .write_record(table.schema().header())
            .map_err(write_err)?;

        for row in table.rows() {
            let fields = std::iter::once(row.timestamp().to_string()).chain(
                row.values()
                    .iter()
                    .map(|cell| cell.as_ref().map(|v| v.to_field()).unwrap_or_default()),
            );
            writer.write_record(fields).map_err(write_err)?;
        }

        let file: File = writer.into_inner().map_err(|e| {
            TableError::io(
                format!("Failed to flush table file: {}", tmp_path.display()),
                e.into_error(),
            )
        })?;

        // fsync - mandatory before the rename makes the content visible
        file.sync_all().map_err(|e| {
            TableError::io(
                format!("fsync failed for temp table file: {}", tmp_path.display()),
                e,
            )
        })
    }

    fn replace(&self, tmp_path: &Path) -> TableResult<()> {
        fs::rename(tmp_path, &self.path).map_err(|e| {
            TableError::io(
                format!("Failed to replace table file: {}", self.path.display()),
                e,
            )
        })?;

        sync_directory(self.directory())
    }
}

#[cfg(unix)]
fn sync_directory(dir: &Path) -> TableResult<()> {
    let handle = File::open(dir).map_err(|e| {
        TableError::io(
            format!("Failed to open table directory for fsync: {}", dir.display()),
            e,
        )
    })?;

    handle.sync_all().map_err(|e| {
        TableError::io(
            format!("Failed to fsync table directory: {}", dir.display()),
            e,
        )
    })
}

#[cfg(not(unix))]
fn sync_directory(_dir: &Path) -> TableResult<()> {
    Ok(())
}
