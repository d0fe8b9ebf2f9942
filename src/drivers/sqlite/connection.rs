//! SQLite pool construction from connection settings.

use anyhow::Result;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use crate::config::ConnectionSettings;

/// Whether the settings point at a private in-memory database.
pub fn is_memory(settings: &ConnectionSettings) -> bool {
    settings.database.is_empty() || settings.database == ":memory:"
}

/// Build SqliteConnectOptions from the settings.
///
/// The `database` setting is a file path; it is created when missing.
pub fn build_connect_options(settings: &ConnectionSettings) -> Result<SqliteConnectOptions> {
    if is_memory(settings) {
        return Ok(SqliteConnectOptions::from_str(":memory:")?.foreign_keys(true));
    }

    Ok(SqliteConnectOptions::new()
        .filename(&settings.database)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal))
}

/// Create a pool that connects on first use.
///
/// An in-memory database lives as long as its single connection, so that
/// pool never recycles it.
pub fn connect_lazy(settings: &ConnectionSettings) -> Result<SqlitePool> {
    let options = build_connect_options(settings)?;

    let pool = if is_memory(settings) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(3)
    };

    Ok(pool
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy_with(options))
}
