//! MySQL type conversion utilities.
//!
//! `information_schema` reports many text columns as binary or unsigned
//! types depending on the server version, so decoding tries a fixed order
//! of candidate types instead of trusting the reported type name.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::mysql::{MySqlRow, MySqlSslMode};
use sqlx::{Column, Row, ValueRef};
use std::sync::Arc;

use crate::traits::{Row as CatalogRow, Value};

/// Converter for MySQL values to the unified `Value` type.
pub struct MySqlValueConverter;

impl MySqlValueConverter {
    /// Convert a result set, sharing one column-name list across rows.
    pub fn convert_rows(rows: &[MySqlRow]) -> Vec<CatalogRow> {
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

    /// Extract a value from a MySQL row at the given column index.
    fn extract_value(row: &MySqlRow, index: usize) -> Value {
        // Check for NULL first
        match row.try_get_raw(index) {
            Ok(raw) if raw.is_null() => return Value::Null,
            Err(_) => return Value::Null,
            _ => {}
        }

        if let Ok(v) = row.try_get::<i64, _>(index) {
            return Value::Int(v);
        }
        if let Ok(v) = row.try_get::<u64, _>(index) {
            return i64::try_from(v)
                .map(Value::Int)
                .unwrap_or(Value::Float(v as f64));
        }
        if let Ok(v) = row.try_get::<Decimal, _>(index) {
            return if v.fract().is_zero() {
                v.to_i64().map(Value::Int).unwrap_or(Value::Null)
            } else {
                v.to_f64().map(Value::Float).unwrap_or(Value::Null)
            };
        }
        if let Ok(v) = row.try_get::<f64, _>(index) {
            return Value::Float(v);
        }
        if let Ok(v) = row.try_get::<String, _>(index) {
            return Value::Text(v);
        }
        if let Ok(v) = row.try_get_unchecked::<Vec<u8>, _>(index) {
            return Value::Text(String::from_utf8_lossy(&v).into_owned());
        }

        Value::Null
    }

    /// Map a configured `sslmode` string to the SQLx mode.
    pub fn map_ssl_mode(mode: Option<&str>) -> MySqlSslMode {
        match mode.map(str::to_lowercase).as_deref() {
            Some("disable") | Some("disabled") | Some("false") => MySqlSslMode::Disabled,
            Some("require") | Some("required") | Some("true") => MySqlSslMode::Required,
            Some("verify-ca") | Some("verify_ca") => MySqlSslMode::VerifyCa,
            Some("verify-full") | Some("verify_identity") => MySqlSslMode::VerifyIdentity,
            _ => MySqlSslMode::Preferred,
        }
    }
}
