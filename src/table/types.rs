//! Table type definitions
//!
//! Values stored in the table file are untyped text. Each column is read
//! back as one kind, the narrowest every non-NA field of the column fits:
//! - int: 64-bit signed integer
//! - float: finite 64-bit floating point
//! - text: anything else
//!
//! An empty field is the NA sentinel.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use super::errors::{TableError, TableResult};

/// Name of the leading header field holding the timestamp key.
pub const INDEX_COLUMN: &str = "datetime";

/// A single stored value.
///
/// JSON integers outside the `i64` range are refused rather than widened
/// to a float.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

/// A field of a row: `None` is the NA sentinel.
pub type Cell = Option<Scalar>;

/// Commit payload: column name to value, `None` for an explicit null.
pub type Payload = BTreeMap<String, Option<Scalar>>;

impl Scalar {
    /// Renders the value as a table field.
    ///
    /// Floats always carry a decimal point or an exponent so they are read
    /// back as floats.
    pub fn to_field(&self) -> String {
        match self {
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => format!("{:?}", f),
            Scalar::Text(s) => s.clone(),
        }
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Scalar;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer, a number or a string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
        Ok(Scalar::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
        i64::try_from(v)
            .map(Scalar::Int)
            .map_err(|_| E::custom(format!("integer {} is out of range", v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
        Ok(Scalar::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
        Ok(Scalar::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> {
        Ok(Scalar::Text(v))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_field())
    }
}

/// Kind shared by every value of one stored column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    Float,
    Text,
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|f| f.is_finite())
}

impl ColumnKind {
    /// Narrowest kind that every non-NA field parses as.
    ///
    /// A column with no values at all is `Int`; it has nothing to parse.
    pub fn infer<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        let mut kind = ColumnKind::Int;
        for raw in fields.into_iter().filter(|f| !f.is_empty()) {
            if kind == ColumnKind::Int && raw.parse::<i64>().is_err() {
                kind = ColumnKind::Float;
            }
            if kind == ColumnKind::Float && parse_finite(raw).is_none() {
                return ColumnKind::Text;
            }
        }
        kind
    }

    /// Parses a raw field of a column of this kind.
    pub fn parse(self, raw: &str) -> Cell {
        if raw.is_empty() {
            return None;
        }
        let text = || Scalar::Text(raw.to_string());
        Some(match self {
            ColumnKind::Int => raw.parse().map(Scalar::Int).unwrap_or_else(|_| text()),
            ColumnKind::Float => parse_finite(raw).map(Scalar::Float).unwrap_or_else(text),
            ColumnKind::Text => text(),
        })
    }
}

/// Returns whether `name` is an acceptable column name: non-empty ASCII
/// letters, digits, `_` and `-`.
fn is_valid_column_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Ordered set of data column names, derived from the table header.
///
/// The leading index column is not part of the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    /// Builds a schema for a new table.
    ///
    /// Names are limited to ASCII letters, digits, `_` and `-`.
    pub fn new(columns: Vec<String>) -> Result<Self, String> {
        if let Some(name) = columns.iter().find(|name| !is_valid_column_name(name)) {
            return Err(format!("invalid column name '{}'", name));
        }
        Self::from_names(columns)
    }

    /// Builds a schema from a full header line (index column first).
    ///
    /// Any non-empty UTF-8 name is accepted; only empty, duplicate and
    /// reserved names are refused.
    pub fn from_header<'a>(header: impl IntoIterator<Item = &'a str>) -> Result<Self, String> {
        let mut fields = header.into_iter();
        match fields.next() {
            None | Some("") => return Err("missing header".to_string()),
            Some(first) if first != INDEX_COLUMN => {
                return Err(format!(
                    "first header field must be '{}', found '{}'",
                    INDEX_COLUMN, first
                ))
            }
            Some(_) => {}
        }
        Self::from_names(fields.map(str::to_string).collect())
    }

    fn from_names(columns: Vec<String>) -> Result<Self, String> {
        if columns.is_empty() {
            return Err("schema has no data columns".to_string());
        }

        let mut seen = std::collections::HashSet::new();
        for name in &columns {
            if name.is_empty() {
                return Err("empty column name".to_string());
            }
            if name == INDEX_COLUMN {
                return Err(format!("'{}' is reserved for the index", INDEX_COLUMN));
            }
            if !seen.insert(name.as_str()) {
                return Err(format!("duplicate column '{}'", name));
            }
        }

        Ok(Self { columns })
    }

    /// Full header line, index column first.
    pub fn header(&self) -> impl Iterator<Item = &str> {
        std::iter::once(INDEX_COLUMN).chain(self.columns.iter().map(String::as_str))
    }

    /// Data column names in file order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Position of a column among the data columns
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// One row: the timestamp key plus one cell per schema column.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    timestamp: String,
    values: Vec<Cell>,
}

impl Row {
    pub fn new(timestamp: impl Into<String>, values: Vec<Cell>) -> Self {
        Self {
            timestamp: timestamp.into(),
            values,
        }
    }

    /// Builds a row covering the whole schema: payload values where given,
    /// NA everywhere else. Payload keys outside the schema are ignored.
    pub fn from_payload(schema: &Schema, timestamp: &str, payload: &Payload) -> Self {
        let values = schema
            .columns()
            .iter()
            .map(|column| payload.get(column).cloned().flatten())
            .collect();
        Self::new(timestamp, values)
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn values(&self) -> &[Cell] {
        &self.values
    }

    /// Value of a named column
    pub fn get(&self, schema: &Schema, column: &str) -> Option<&Cell> {
        schema.position(column).and_then(|i| self.values.get(i))
    }
}

/// In-memory copy of the table file.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    schema: Schema,
    rows: Vec<Row>,
}

impl Table {
    /// Creates a table without rows
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Rows in file order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row carrying one cell per schema column.
    pub fn push(&mut self, row: Row) -> TableResult<()> {
        if row.values.len() != self.schema.len() {
            return Err(TableError::malformed(format!(
                "Row {} has {} values, schema has {} columns",
                row.timestamp,
                row.values.len(),
                self.schema.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }
}
