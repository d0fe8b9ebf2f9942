//! SQLite type conversion utilities.
//!
//! Catalog queries mostly select pragma results and expressions, which carry
//! no declared type, so values are decoded by their runtime storage class
//! before falling back to the declared affinity.

use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};
use std::sync::Arc;

use crate::traits::{Row as CatalogRow, Value};

/// Converter for SQLite values to the unified `Value` type.
pub struct SqliteValueConverter;

impl SqliteValueConverter {
    /// Convert a result set, sharing one column-name list across rows.
    pub fn convert_rows(rows: &[SqliteRow]) -> Vec<CatalogRow> {
        let Some(first) = rows.first() else {
            return Vec::new();
        };
        let columns: Arc<[String]> = first
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect();

        rows.iter()
            .map(|row| {
                let values = (0..row.len())
                    .map(|idx| Self::extract_value(row, idx))
                    .collect();
                CatalogRow::new(columns.clone(), values)
            })
            .collect()
    }

    /// Extract a value from a SQLite row at the given column index.
    fn extract_value(row: &SqliteRow, index: usize) -> Value {
        let storage = match row.try_get_raw(index) {
            Ok(raw) if raw.is_null() => return Value::Null,
            Ok(raw) => raw.type_info().name().to_uppercase(),
            Err(_) => return Value::Null,
        };

        let type_name = match storage.as_str() {
            "NULL" => row.column(index).type_info().name().to_uppercase(),
            _ => storage,
        };
        Self::decode_by_type(row, index, &type_name)
    }

    /// Decode a value based on its SQLite storage class or affinity.
    fn decode_by_type(row: &SqliteRow, index: usize, type_name: &str) -> Value {
        match Self::affinity(type_name) {
            Affinity::Integer => row
                .try_get_unchecked::<i64, _>(index)
                .map(Value::Int)
                .unwrap_or(Value::Null),
            Affinity::Real => row
                .try_get_unchecked::<f64, _>(index)
                .map(Value::Float)
                .unwrap_or(Value::Null),
            Affinity::Blob => row
                .try_get_unchecked::<Vec<u8>, _>(index)
                .map(Value::Bytes)
                .unwrap_or(Value::Null),
            Affinity::Text => Self::decode_as_string_fallback(row, index),
        }
    }

    fn affinity(type_name: &str) -> Affinity {
        match type_name {
            "INTEGER" | "INT" | "INT8" | "BIGINT" | "BOOLEAN" | "BOOL" => Affinity::Integer,
            "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => Affinity::Real,
            "BLOB" => Affinity::Blob,
            _ => Affinity::Text,
        }
    }

    /// Fallback: text first, then numbers.
    fn decode_as_string_fallback(row: &SqliteRow, index: usize) -> Value {
        if let Ok(s) = row.try_get_unchecked::<String, _>(index) {
            return Value::Text(s);
        }
        if let Ok(v) = row.try_get_unchecked::<i64, _>(index) {
            return Value::Int(v);
        }
        if let Ok(v) = row.try_get_unchecked::<f64, _>(index) {
            return Value::Float(v);
        }
        Value::Null
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Affinity {
    Integer,
    Real,
    Text,
    Blob,
}
