//! PostgreSQL type conversion utilities.
//!
//! Converts SQLx `PgRow`s into the catalog `Row` type. Catalog queries only
//! return scalars, so every native type collapses onto a `Value` variant.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::postgres::{PgRow, PgSslMode};
use sqlx::{Column, Row, TypeInfo, ValueRef};
use std::sync::Arc;

use crate::traits::{Row as CatalogRow, Value};

/// Converter for PostgreSQL values to the unified `Value` type.
pub struct PgValueConverter;

impl PgValueConverter {
    /// Convert a result set, sharing one column-name list across rows.
    pub fn convert_rows(rows: &[PgRow]) -> Vec<CatalogRow> {
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

    /// Extract a value from a PostgreSQL row at the given column index.
    fn extract_value(row: &PgRow, index: usize) -> Value {
        // Check for NULL first
        match row.try_get_raw(index) {
            Ok(raw) if raw.is_null() => return Value::Null,
            Err(_) => return Value::Null,
            _ => {}
        }

        let type_name = row.column(index).type_info().name().to_string();
        Self::decode_by_type(row, index, &type_name)
    }

    /// Decode a value based on its PostgreSQL type name.
    fn decode_by_type(row: &PgRow, index: usize, type_name: &str) -> Value {
        match type_name {
            "BOOL" => row
                .try_get::<bool, _>(index)
                .map(Value::Bool)
                .unwrap_or(Value::Null),

            "INT2" => row
                .try_get::<i16, _>(index)
                .map(|v| Value::Int(v.into()))
                .unwrap_or(Value::Null),

            "INT4" => row
                .try_get::<i32, _>(index)
                .map(|v| Value::Int(v.into()))
                .unwrap_or(Value::Null),

            "INT8" => row
                .try_get::<i64, _>(index)
                .map(Value::Int)
                .unwrap_or(Value::Null),

            "OID" => row
                .try_get::<sqlx::postgres::types::Oid, _>(index)
                .map(|v| Value::Int(v.0.into()))
                .unwrap_or(Value::Null),

            "FLOAT4" => row
                .try_get::<f32, _>(index)
                .map(|v| Value::Float(v.into()))
                .unwrap_or(Value::Null),

            "FLOAT8" => row
                .try_get::<f64, _>(index)
                .map(Value::Float)
                .unwrap_or(Value::Null),

            "NUMERIC" => row
                .try_get::<Decimal, _>(index)
                .map(Self::decimal_value)
                .unwrap_or(Value::Null),

            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => row
                .try_get::<String, _>(index)
                .map(Value::Text)
                .unwrap_or(Value::Null),

            "\"CHAR\"" | "CHAR" => row
                .try_get::<i8, _>(index)
                .map(|v| Value::Text((v as u8 as char).to_string()))
                .unwrap_or(Value::Null),

            "BYTEA" => row
                .try_get::<Vec<u8>, _>(index)
                .map(Value::Bytes)
                .unwrap_or(Value::Null),

            _ => Self::decode_as_string_fallback(row, index),
        }
    }

    /// Whole decimals (sizes, counts) become integers.
    fn decimal_value(value: Decimal) -> Value {
        if value.fract().is_zero() {
            if let Some(v) = value.to_i64() {
                return Value::Int(v);
            }
        }
        value.to_f64().map(Value::Float).unwrap_or(Value::Null)
    }

    /// Fallback: try to decode as string representation for unknown types.
    fn decode_as_string_fallback(row: &PgRow, index: usize) -> Value {
        if let Ok(s) = row.try_get_unchecked::<String, _>(index) {
            return Value::Text(s);
        }
        if let Ok(v) = row.try_get::<i64, _>(index) {
            return Value::Int(v);
        }
        if let Ok(v) = row.try_get::<f64, _>(index) {
            return Value::Float(v);
        }
        Value::Null
    }

    /// Map a configured `sslmode` string to the SQLx mode.
    pub fn map_ssl_mode(mode: Option<&str>) -> PgSslMode {
        match mode.map(str::to_lowercase).as_deref() {
            Some("disable") => PgSslMode::Disable,
            Some("allow") => PgSslMode::Allow,
            Some("require") => PgSslMode::Require,
            Some("verify-ca") | Some("verify_ca") => PgSslMode::VerifyCa,
            Some("verify-full") | Some("verify_full") => PgSslMode::VerifyFull,
            _ => PgSslMode::Prefer,
        }
    }
}
