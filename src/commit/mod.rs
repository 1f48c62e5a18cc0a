//! Commit engine: the only mutator of the table file
//!
//! A commit is a full read-modify-write of the table file:
//! reload, validate, append one row, persist atomically.
//!
//! # Invariants
//!
//! - At most one commit runs at a time (single writer lane)
//! - Validation completes before any mutation begins
//! - A commit either lands completely or leaves the file untouched

mod engine;
mod errors;

pub use engine::CommitEngine;
pub use errors::{CommitError, CommitResult};
