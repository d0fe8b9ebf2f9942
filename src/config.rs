//! Configuration store and per-connection settings.
//!
//! This module contains:
//! - `Config` - The key/value contract the schema layer reads settings from
//! - `MapConfig` - An in-memory store keyed by dotted paths
//! - `ConnectionSettings` - The `database.connections.<name>.*` block resolved for one connection

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Read access to a configuration store.
pub trait Config: Send + Sync {
    /// Get a string value, falling back to `default` (or an empty string) when unset.
    fn get_string(&self, key: &str, default: Option<&str>) -> String;
}

/// In-memory configuration keyed by dotted paths
/// (`database.connections.main.driver`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapConfig {
    values: HashMap<String, String>,
}

impl MapConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, returning the config for chaining
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Build a configuration from a nested JSON document.
    ///
    /// Objects are flattened into dotted keys; scalars are stored as their
    /// string form. Arrays are not addressable and are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Build a configuration from an already parsed JSON value.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        let mut config = Self::new();
        match value {
            serde_json::Value::Object(_) => flatten_into(&mut config.values, "", value)?,
            other => bail!("configuration root must be an object, got {}", other),
        }
        Ok(config)
    }
}

fn flatten_into(
    values: &mut HashMap<String, String>,
    prefix: &str,
    value: &serde_json::Value,
) -> Result<()> {
    let key = |name: &str| {
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", prefix, name)
        }
    };

    match value {
        serde_json::Value::Object(map) => {
            for (name, nested) in map {
                flatten_into(values, &key(name), nested)?;
            }
        }
        serde_json::Value::Array(_) => bail!("arrays are not supported in configuration ({})", prefix),
        serde_json::Value::Null => {}
        serde_json::Value::String(s) => {
            values.insert(prefix.to_string(), s.clone());
        }
        other => {
            values.insert(prefix.to_string(), other.to_string());
        }
    }

    Ok(())
}

impl Config for MapConfig {
    fn get_string(&self, key: &str, default: Option<&str>) -> String {
        match self.values.get(key) {
            Some(value) => value.clone(),
            None => default.unwrap_or_default().to_string(),
        }
    }
}

/// Settings of one named connection, read from
/// `database.connections.<name>.*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Connection name
    pub name: String,
    /// Driver identifier (postgres, mysql, sqlserver, sqlite)
    pub driver: String,
    /// Table-name prefix
    pub prefix: String,
    /// Schema name (postgres); empty when unset
    pub schema: String,
    /// Database name, or file path for sqlite
    pub database: String,
    pub host: String,
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
    /// Driver-specific ssl mode string (`disable`, `prefer`, `require`, ...)
    pub ssl_mode: Option<String>,
}

impl ConnectionSettings {
    /// Resolve the settings of connection `name` from `config`.
    pub fn resolve(config: &dyn Config, name: &str) -> Self {
        let get = |field: &str| config.get_string(&connection_key(name, field), None);

        let ssl_mode = get("sslmode");

        Self {
            name: name.to_string(),
            driver: get("driver"),
            prefix: get("prefix"),
            schema: get("schema"),
            database: get("database"),
            host: get("host"),
            port: get("port").parse().ok(),
            username: get("username"),
            password: get("password"),
            ssl_mode: if ssl_mode.is_empty() {
                None
            } else {
                Some(ssl_mode)
            },
        }
    }
}

/// Build the `database.connections.<name>.<field>` key.
pub fn connection_key(name: &str, field: &str) -> String {
    format!("database.connections.{}.{}", name, field)
}
