//! MySQL pool construction from connection settings.

use anyhow::{Result, anyhow};
use sqlx::MySqlPool;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use std::time::Duration;

use super::types::MySqlValueConverter;
use crate::config::ConnectionSettings;
use crate::traits::Driver;

/// Build MySqlConnectOptions from the settings.
pub fn build_connect_options(settings: &ConnectionSettings) -> Result<MySqlConnectOptions> {
    if settings.host.is_empty() {
        return Err(anyhow!("MySQL connection {} requires a host", settings.name));
    }

    let mut options = MySqlConnectOptions::new()
        .host(&settings.host)
        .port(settings.port.or(Driver::Mysql.default_port()).unwrap_or(3306))
        .ssl_mode(MySqlValueConverter::map_ssl_mode(settings.ssl_mode.as_deref()));

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
pub fn connect_lazy(settings: &ConnectionSettings) -> Result<MySqlPool> {
    let options = build_connect_options(settings)?;

    Ok(MySqlPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy_with(options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_host_rejected() {
        let settings = ConnectionSettings {
            name: "mysql".to_string(),
            driver: "mysql".to_string(),
            prefix: String::new(),
            schema: String::new(),
            database: "shop".to_string(),
            host: String::new(),
            port: None,
            username: "root".to_string(),
            password: String::new(),
            ssl_mode: None,
        };

        let err = build_connect_options(&settings).unwrap_err();
        assert!(err.to_string().contains("requires a host"));
    }

    #[test]
    fn test_build_connect_options() {
        let settings = ConnectionSettings {
            name: "mysql".to_string(),
            driver: "mysql".to_string(),
            prefix: String::new(),
            schema: String::new(),
            database: "shop".to_string(),
            host: "127.0.0.1".to_string(),
            port: Some(3307),
            username: "root".to_string(),
            password: String::new(),
            ssl_mode: None,
        };

        assert!(build_connect_options(&settings).is_ok());
    }
}
