//! PostgreSQL pool construction from connection settings.

use anyhow::{Result, anyhow};
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::time::Duration;

use super::types::PgValueConverter;
use crate::config::ConnectionSettings;
use crate::traits::Driver;

/// Build PgConnectOptions from the settings.
pub fn build_connect_options(settings: &ConnectionSettings) -> Result<PgConnectOptions> {
    if settings.host.is_empty() {
        return Err(anyhow!(
            "PostgreSQL connection {} requires a host",
            settings.name
        ));
    }

    let mut options = PgConnectOptions::new()
        .host(&settings.host)
        .port(
            settings
                .port
                .or(Driver::Postgres.default_port())
                .unwrap_or(5432),
        )
        .ssl_mode(PgValueConverter::map_ssl_mode(settings.ssl_mode.as_deref()));

    if !settings.username.is_empty() {
        options = options.username(&settings.username);
    }
    if !settings.password.is_empty() {
        options = options.password(&settings.password);
    }
    if !settings.database.is_empty() {
        options = options.database(&settings.database);
    }

    Ok(options)
}

/// Create a pool that connects on first use.
pub fn connect_lazy(settings: &ConnectionSettings) -> Result<PgPool> {
    let options = build_connect_options(settings)?;

    Ok(PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy_with(options))
}
