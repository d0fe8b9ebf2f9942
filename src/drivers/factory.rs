//! Dialect registry.
//!
//! Maps a configured driver name to a factory producing the grammar,
//! processor and introspection implementations for a connection. The
//! built-in dialects are registered by `DialectCatalog::with_builtins`;
//! additional dialects can be registered without touching the facade.

use std::collections::HashMap;
use std::sync::Arc;

use super::common::SharedSchema;
use super::{mysql, postgres, sqlite, sqlserver};
use crate::config::{Config, connection_key};
use crate::error::{Result, SchemaError};
use crate::traits::{CommonSchema, Driver, DriverSchema, Grammar, Orm, Processor};

/// Everything a dialect factory may need to build its implementations.
pub struct DialectContext {
    pub orm: Arc<dyn Orm>,
    pub config: Arc<dyn Config>,
    /// Name of the configured connection
    pub connection: String,
    /// Table-name prefix of the connection
    pub prefix: String,
}

impl DialectContext {
    /// Read `database.connections.<connection>.<field>`.
    pub fn setting(&self, field: &str, default: Option<&str>) -> String {
        self.config
            .get_string(&connection_key(&self.connection, field), default)
    }
}

/// The resolved implementations of one dialect for one connection.
#[derive(Clone)]
pub struct Dialect {
    pub grammar: Arc<dyn Grammar>,
    pub processor: Arc<dyn Processor>,
    pub driver_schema: Arc<dyn DriverSchema>,
    pub common_schema: Arc<dyn CommonSchema>,
    /// Catalog/schema name introspection is scoped to (may be empty)
    pub schema: String,
}

impl Dialect {
    /// Bundle a dialect, deriving the shared table/view introspection from
    /// its grammar and processor.
    pub fn new(
        grammar: Arc<dyn Grammar>,
        processor: Arc<dyn Processor>,
        driver_schema: Arc<dyn DriverSchema>,
        schema: impl Into<String>,
        orm: Arc<dyn Orm>,
    ) -> Self {
        let schema = schema.into();
        let common_schema = Arc::new(SharedSchema::new(
            grammar.clone(),
            processor.clone(),
            orm,
            schema.clone(),
        ));

        Self {
            grammar,
            processor,
            driver_schema,
            common_schema,
            schema,
        }
    }
}

/// Builds a dialect for a connection.
pub type DialectFactory = Arc<dyn Fn(&DialectContext) -> Dialect + Send + Sync>;

/// Registry of dialect factories keyed by driver name.
///
/// # Example
///
/// ```ignore
/// let mut catalog = DialectCatalog::with_builtins();
/// catalog.register("cockroach", postgres::dialect);
/// let schema = Schema::with_catalog(config, orm, Vec::new(), Arc::new(catalog))?;
/// ```
#[derive(Clone, Default)]
pub struct DialectCatalog {
    factories: HashMap<String, DialectFactory>,
}

impl DialectCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog with the built-in dialects registered.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.register(Driver::Postgres.as_str(), postgres::dialect);
        catalog.register(Driver::Mysql.as_str(), mysql::dialect);
        catalog.register(Driver::Sqlserver.as_str(), sqlserver::dialect);
        catalog.register(Driver::Sqlite.as_str(), sqlite::dialect);
        catalog
    }

    /// Register (or replace) the factory for a driver name.
    pub fn register<F>(&mut self, driver: &str, factory: F)
    where
        F: Fn(&DialectContext) -> Dialect + Send + Sync + 'static,
    {
        self.factories
            .insert(driver.to_lowercase(), Arc::new(factory));
    }

    /// Check whether a driver has a registered dialect.
    pub fn supports(&self, driver: &str) -> bool {
        self.factory(driver).is_some()
    }

    /// Registered driver names, sorted.
    pub fn drivers(&self) -> Vec<String> {
        let mut drivers: Vec<String> = self.factories.keys().cloned().collect();
        drivers.sort();
        drivers
    }

    /// Build the dialect for `driver`.
    ///
    /// Built-in aliases (`pg`, `mssql`, `sqlite3`, ...) resolve to their
    /// canonical driver. Unknown drivers are an error.
    pub fn resolve(&self, driver: &str, ctx: &DialectContext) -> Result<Dialect> {
        let factory = self
            .factory(driver)
            .ok_or_else(|| SchemaError::DriverNotSupported(driver.to_string()))?;
        Ok(factory(ctx))
    }

    fn factory(&self, driver: &str) -> Option<&DialectFactory> {
        let name = driver.to_lowercase();
        self.factories.get(&name).or_else(|| {
            Driver::from_name(&name).and_then(|builtin| self.factories.get(builtin.as_str()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;
    use crate::testing::FakeOrm;

    fn context(config: MapConfig) -> DialectContext {
        DialectContext {
            orm: FakeOrm::new("main"),
            config: Arc::new(config),
            connection: "main".to_string(),
            prefix: String::new(),
        }
    }

    #[test]
    fn test_builtins_registered() {
        let catalog = DialectCatalog::with_builtins();
        assert_eq!(
            catalog.drivers(),
            vec!["mysql", "postgres", "sqlite", "sqlserver"]
        );
        assert!(catalog.supports("PostgreSQL"));
        assert!(catalog.supports("mssql"));
        assert!(!catalog.supports("oracle"));
    }

    #[test]
    fn test_resolve_unknown_driver() {
        let catalog = DialectCatalog::with_builtins();
        let err = catalog
            .resolve("oracle", &context(MapConfig::new()))
            .err()
            .unwrap();
        assert!(matches!(err, SchemaError::DriverNotSupported(ref d) if d == "oracle"));
    }

    #[test]
    fn test_schema_resolution_per_driver() {
        let catalog = DialectCatalog::with_builtins();

        let pg = catalog
            .resolve("postgres", &context(MapConfig::new()))
            .unwrap();
        assert_eq!(pg.schema, "public");

        let config = MapConfig::new()
            .with("database.connections.main.schema", "sales")
            .with("database.connections.main.database", "shop");
        let pg = catalog.resolve("postgres", &context(config.clone())).unwrap();
        assert_eq!(pg.schema, "sales");

        let mysql = catalog.resolve("mysql", &context(config.clone())).unwrap();
        assert_eq!(mysql.schema, "shop");

        let sqlite = catalog.resolve("sqlite", &context(config)).unwrap();
        assert_eq!(sqlite.schema, "");
    }

    #[test]
    fn test_register_custom_dialect() {
        let mut catalog = DialectCatalog::new();
        catalog.register("Cockroach", postgres::dialect);

        assert!(catalog.supports("cockroach"));
        assert!(!catalog.supports("postgres"));
    }
}
