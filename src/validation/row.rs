//! Row validation for commits
//!
//! Check order: timestamp, non-emptiness, null policy.
//!
//! Null policy: a value is rejected when it is an explicit null, or a
//! string that would be stored as the NA sentinel (empty or blank).
//! Zero, negative numbers and other falsy-looking values are accepted.

use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;

use super::errors::{RowError, RowResult};
use crate::table::{Payload, Scalar};

/// Format of the timestamp key.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn timestamp_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").expect("timestamp pattern is valid")
    })
}

/// Parses a timestamp key, requiring the exact zero-padded layout.
pub fn parse_timestamp(value: &str) -> RowResult<NaiveDateTime> {
    let bad = |reason: String| RowError::BadTimestamp {
        value: value.to_string(),
        reason,
    };

    if !timestamp_shape().is_match(value) {
        return Err(bad("expected format YYYY-MM-DD HH:MM:SS".to_string()));
    }

    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|e| bad(e.to_string()))
}

/// Validates the key and payload of a row about to be committed.
pub fn validate_row(timestamp: &str, payload: &Payload) -> RowResult<()> {
    parse_timestamp(timestamp)?;

    if payload.is_empty() {
        return Err(RowError::NoData);
    }

    let nulls: Vec<String> = payload
        .iter()
        .filter(|(_, value)| is_null(value.as_ref()))
        .map(|(name, _)| name.clone())
        .collect();
    if !nulls.is_empty() {
        return Err(RowError::NullValue(nulls));
    }

    Ok(())
}

fn is_null(value: Option<&Scalar>) -> bool {
    match value {
        None => true,
        Some(Scalar::Text(s)) => s.trim().is_empty(),
        Some(Scalar::Int(_)) | Some(Scalar::Float(_)) => false,
    }
}
