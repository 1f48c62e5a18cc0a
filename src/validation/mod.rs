//! Request validation for daylog
//!
//! Every request is checked against the schema read from the table file
//! before anything else happens. Validators stop at the first violation,
//! in a fixed check order, so the same request always yields the same
//! error.
//!
//! - Column validation applies to both reads and commits
//! - Row validation applies to commits only

mod columns;
mod errors;
mod row;

pub use columns::{validate_columns, ColumnRequest};
pub use errors::{ColumnError, ColumnResult, RowError, RowResult};
pub use row::{parse_timestamp, validate_row, TIMESTAMP_FORMAT};
