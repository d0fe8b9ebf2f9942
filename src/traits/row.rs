//! Database-agnostic row and value types.
//!
//! This module contains:
//! - `Value` - A unified value type for introspection result cells
//! - `Row` - A named row of values returned by `Query::raw`
//! - `FromRow` - Conversion from a `Row` into a typed record, used by `scan`

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A unified value type for the cells of catalog queries.
///
/// Catalog queries only ever return scalars, so this is deliberately narrower
/// than a general query-result value: every driver maps its native types onto
/// one of these variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    /// NULL value
    Null,
    /// Boolean value (true/false)
    Bool(bool),
    /// Any integer that fits in 64 bits
    Int(i64),
    /// Floating point or decimal value
    Float(f64),
    /// Text/string value
    Text(String),
    /// Binary data
    Bytes(Vec<u8>),
}

impl Value {
    /// Check if this value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the type name for display purposes
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
        }
    }

    /// Render the value as text. Binary values are decoded as lossy UTF-8,
    /// since some drivers report catalog strings as binary columns.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(v) => Some(v.to_string()),
            Value::Float(v) => Some(v.to_string()),
            Value::Text(s) => Some(s.clone()),
            Value::Bytes(b) => Some(String::from_utf8_lossy(b).into_owned()),
        }
    }

    /// Interpret the value as a boolean.
    ///
    /// Accepts the spellings catalogs use for flags: native booleans,
    /// integers (non-zero is true), and `YES`/`NO`, `t`/`f`, `true`/`false`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(v) => Some(*v != 0),
            Value::Text(_) | Value::Bytes(_) => {
                let text = self.to_text()?;
                match text.trim().to_lowercase().as_str() {
                    "yes" | "y" | "t" | "true" | "1" => Some(true),
                    "no" | "n" | "f" | "false" | "0" => Some(false),
                    _ => None,
                }
            }
            Value::Float(_) | Value::Null => None,
        }
    }

    /// Interpret the value as an i64 (floats are truncated, text is parsed)
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Bool(b) => Some(*b as i64),
            Value::Float(v) => Some(*v as i64),
            Value::Text(_) | Value::Bytes(_) => self.to_text()?.trim().parse().ok(),
            Value::Null => None,
        }
    }

    /// Try to extract as a string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A row returned by a catalog query.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Create a row from its column names and values (same length, same order)
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let (columns, values): (Vec<String>, Vec<Value>) =
            pairs.into_iter().map(|(c, v)| (c.into(), v)).unzip();
        Self::new(columns.into(), values)
    }

    /// Column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row has no cells
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of `column`, matched case-insensitively. `None` if the column is absent.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
            .and_then(|idx| self.values.get(idx))
    }

    /// Required text column; NULL or absent is an error.
    pub fn get_string(&self, column: &str) -> Result<String> {
        self.get_opt_string(column)
            .ok_or_else(|| anyhow!("column '{}' is missing or NULL", column))
    }

    /// Optional text column; NULL or absent yields `None`.
    pub fn get_opt_string(&self, column: &str) -> Option<String> {
        self.get(column).and_then(Value::to_text)
    }

    /// Text column defaulting to an empty string.
    pub fn get_string_or_default(&self, column: &str) -> String {
        self.get_opt_string(column).unwrap_or_default()
    }

    /// Flag column; NULL or absent is `false`.
    pub fn get_bool(&self, column: &str) -> bool {
        self.get(column).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Optional integer column.
    pub fn get_i64(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_i64)
    }
}

/// Conversion from a catalog `Row` into a typed record.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self>;
}

/// Convert every row into `T`, stopping at the first failure.
pub fn scan<T: FromRow>(rows: &[Row]) -> Result<Vec<T>> {
    rows.iter().map(T::from_row).collect()
}
