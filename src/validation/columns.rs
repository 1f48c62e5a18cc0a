//! Column validation against the table schema
//!
//! Check order:
//! - Get: duplicates, then unknown names
//! - Commit: emptiness, then unknown names

use std::collections::HashSet;

use super::errors::{ColumnError, ColumnResult};
use crate::table::{Payload, Schema};

/// Column references made by a request.
#[derive(Debug, Clone, Copy)]
pub enum ColumnRequest<'a> {
    /// Projection list of a read. `None` means every column; an empty
    /// list is a valid, degenerate projection.
    Get(Option<&'a [String]>),
    /// Field names of a commit payload.
    Commit(&'a Payload),
}

/// Validates the columns a request references.
///
/// The schema must be non-empty; the table loader guarantees it.
pub fn validate_columns(request: ColumnRequest<'_>, schema: &Schema) -> ColumnResult<()> {
    debug_assert!(!schema.is_empty(), "schema must have at least one column");

    match request {
        ColumnRequest::Get(None) => Ok(()),
        ColumnRequest::Get(Some(requested)) => validate_projection(requested, schema),
        ColumnRequest::Commit(payload) => validate_payload_fields(payload, schema),
    }
}

fn validate_projection(requested: &[String], schema: &Schema) -> ColumnResult<()> {
    let mut seen = HashSet::with_capacity(requested.len());
    let mut duplicates: Vec<String> = Vec::new();
    for name in requested {
        if !seen.insert(name.as_str()) && !duplicates.contains(name) {
            duplicates.push(name.clone());
        }
    }
    if !duplicates.is_empty() {
        return Err(ColumnError::DuplicateColumns(duplicates));
    }

    let unknown: Vec<String> = requested
        .iter()
        .filter(|name| !schema.contains(name))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(ColumnError::UnknownColumns(unknown));
    }

    Ok(())
}

fn validate_payload_fields(payload: &Payload, schema: &Schema) -> ColumnResult<()> {
    if payload.is_empty() {
        return Err(ColumnError::EmptyPayloadColumns);
    }

    // Payload keys are already sorted and unique
    let unknown: Vec<String> = payload
        .keys()
        .filter(|name| !schema.contains(name))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(ColumnError::UnknownColumns(unknown));
    }

    Ok(())
}
