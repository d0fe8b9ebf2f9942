//! SQLx-backed query engine.
//!
//! `SqlxOrm` implements the `Orm` contract over lazily-connected sqlx pools
//! for PostgreSQL, MySQL and SQLite. Connection settings come from the same
//! `Config` the schema facade reads, so `connection(name)` can rebind to any
//! configured connection. Rebinding reuses the pool already opened for that
//! name.

mod transaction;

pub use transaction::{SqlxTransaction, TransactionScope};

use anyhow::{Result, anyhow, bail};
use async_lock::RwLock;
use async_trait::async_trait;
use sqlx::{MySqlPool, PgPool, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::config::{Config, ConnectionSettings};
use crate::drivers::mysql::{connection as mysql_connection, types::MySqlValueConverter};
use crate::drivers::postgres::{connection as pg_connection, types::PgValueConverter};
use crate::drivers::sqlite::{connection as sqlite_connection, types::SqliteValueConverter};
use crate::traits::{Driver, Orm, Query, Row, Transaction};

/// A pool of one of the sqlx backends.
#[derive(Clone, Debug)]
pub enum SqlxPool {
    Postgres(PgPool),
    MySql(MySqlPool),
    Sqlite(SqlitePool),
}

impl SqlxPool {
    /// Create a pool for the settings without connecting.
    pub fn connect_lazy(settings: &ConnectionSettings) -> Result<Self> {
        let driver = Driver::from_name(&settings.driver).ok_or_else(|| {
            anyhow!(
                "connection {} has unknown driver '{}'",
                settings.name,
                settings.driver
            )
        })?;

        match driver {
            Driver::Postgres => Ok(Self::Postgres(pg_connection::connect_lazy(settings)?)),
            Driver::Mysql => Ok(Self::MySql(mysql_connection::connect_lazy(settings)?)),
            Driver::Sqlite => Ok(Self::Sqlite(sqlite_connection::connect_lazy(settings)?)),
            Driver::Sqlserver => bail!(
                "connection {} uses {}, which has no sqlx backend",
                settings.name,
                driver.display_name()
            ),
        }
    }

    pub fn driver(&self) -> Driver {
        match self {
            Self::Postgres(_) => Driver::Postgres,
            Self::MySql(_) => Driver::Mysql,
            Self::Sqlite(_) => Driver::Sqlite,
        }
    }

    pub async fn close(&self) {
        match self {
            Self::Postgres(pool) => pool.close().await,
            Self::MySql(pool) => pool.close().await,
            Self::Sqlite(pool) => pool.close().await,
        }
    }
}

#[async_trait]
impl Query for SqlxPool {
    async fn raw(&self, sql: &str) -> Result<Vec<Row>> {
        let rows = match self {
            Self::Postgres(pool) => {
                PgValueConverter::convert_rows(&sqlx::query(sql).fetch_all(pool).await?)
            }
            Self::MySql(pool) => {
                MySqlValueConverter::convert_rows(&sqlx::query(sql).fetch_all(pool).await?)
            }
            Self::Sqlite(pool) => {
                SqliteValueConverter::convert_rows(&sqlx::query(sql).fetch_all(pool).await?)
            }
        };
        Ok(rows)
    }

    async fn exec(&self, sql: &str) -> Result<u64> {
        let affected = match self {
            Self::Postgres(pool) => sqlx::query(sql).execute(pool).await?.rows_affected(),
            Self::MySql(pool) => sqlx::query(sql).execute(pool).await?.rows_affected(),
            Self::Sqlite(pool) => sqlx::query(sql).execute(pool).await?.rows_affected(),
        };
        Ok(affected)
    }

    fn in_transaction(&self) -> bool {
        false
    }
}

/// Pools keyed by connection name, shared by every orm rebound from the same
/// root. An in-memory SQLite database lives only as long as its pool, so a
/// name must always resolve to the same one.
#[derive(Clone, Default)]
pub(crate) struct PoolRegistry {
    pools: Arc<RwLock<HashMap<String, SqlxPool>>>,
}

impl PoolRegistry {
    fn get_or_connect(&self, config: &dyn Config, name: &str) -> Result<SqlxPool> {
        if let Some(pool) = self.pools.read_blocking().get(name) {
            return Ok(pool.clone());
        }

        let mut pools = self.pools.write_blocking();
        if let Some(pool) = pools.get(name) {
            return Ok(pool.clone());
        }

        let settings = ConnectionSettings::resolve(config, name);
        let pool = SqlxPool::connect_lazy(&settings)?;
        debug!(connection = name, driver = %settings.driver, "created lazy pool");

        pools.insert(name.to_string(), pool.clone());
        Ok(pool)
    }
}

/// Query engine bound to one configured connection.
///
/// # Example
///
/// ```ignore
/// let config = Arc::new(MapConfig::new()
///     .with("database.connections.main.driver", "sqlite")
///     .with("database.connections.main.database", "app.db"));
/// let orm = SqlxOrm::connect_lazy(config.clone(), "main")?;
/// let schema = Schema::new(config, orm, Vec::new())?;
/// ```
pub struct SqlxOrm {
    name: String,
    config: Arc<dyn Config>,
    pool: SqlxPool,
    pools: PoolRegistry,
}

impl std::fmt::Debug for SqlxOrm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlxOrm")
            .field("name", &self.name)
            .field("driver", &self.pool.driver())
            .finish()
    }
}

impl SqlxOrm {
    /// Bind to connection `name`. No connection is opened until first use.
    pub fn connect_lazy(config: Arc<dyn Config>, name: &str) -> Result<Arc<Self>> {
        Self::bind(config, name, PoolRegistry::default())
    }

    fn bind(config: Arc<dyn Config>, name: &str, pools: PoolRegistry) -> Result<Arc<Self>> {
        let pool = pools.get_or_connect(config.as_ref(), name)?;
        Ok(Arc::new(Self {
            name: name.to_string(),
            config,
            pool,
            pools,
        }))
    }

    pub fn driver(&self) -> Driver {
        self.pool.driver()
    }

    pub fn pool(&self) -> &SqlxPool {
        &self.pool
    }

    /// Open a caller-managed transaction.
    ///
    /// The returned scope is itself an `Orm`; a `Schema` built on it runs its
    /// operations inside this transaction instead of opening its own.
    pub async fn begin_scope(&self) -> Result<TransactionScope> {
        let tx = SqlxTransaction::begin(&self.pool).await?;
        Ok(TransactionScope::new(
            self.name.clone(),
            self.config.clone(),
            self.pools.clone(),
            Arc::new(tx),
        ))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Orm for SqlxOrm {
    fn name(&self) -> &str {
        &self.name
    }

    fn query(&self) -> Arc<dyn Query> {
        Arc::new(self.pool.clone())
    }

    async fn begin(&self) -> Result<Arc<dyn Transaction>> {
        let tx = SqlxTransaction::begin(&self.pool).await?;
        Ok(Arc::new(tx))
    }

    fn connection(&self, name: &str) -> Result<Arc<dyn Orm>> {
        let orm: Arc<dyn Orm> = SqlxOrm::bind(self.config.clone(), name, self.pools.clone())?;
        Ok(orm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;

    fn config() -> Arc<dyn Config> {
        Arc::new(
            MapConfig::new()
                .with("database.connections.memory.driver", "sqlite")
                .with("database.connections.scratch.driver", "sqlite")
                .with("database.connections.legacy.driver", "sqlserver")
                .with("database.connections.broken.driver", "oracle"),
        )
    }

    #[test]
    fn test_connect_lazy_sqlite() {
        let orm = SqlxOrm::connect_lazy(config(), "memory").unwrap();
        assert_eq!(orm.name(), "memory");
        assert_eq!(orm.driver(), Driver::Sqlite);
        assert!(!orm.query().in_transaction());
    }

    #[test]
    fn test_unsupported_backends() {
        let err = SqlxOrm::connect_lazy(config(), "legacy").unwrap_err();
        assert!(err.to_string().contains("no sqlx backend"));

        let err = SqlxOrm::connect_lazy(config(), "broken").unwrap_err();
        assert!(err.to_string().contains("unknown driver 'oracle'"));
    }

    #[test]
    fn test_memory_round_trip() {
        smol::block_on(async {
            let orm = SqlxOrm::connect_lazy(config(), "memory").unwrap();
            let query = orm.query();

            query.exec("create table t (id integer, name text)").await.unwrap();
            assert_eq!(
                query.exec("insert into t values (1, 'a'), (2, null)").await.unwrap(),
                2
            );

            let rows = query.raw("select id, name from t order by id").await.unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].get_i64("id"), Some(1));
            assert_eq!(rows[0].get_opt_string("name").as_deref(), Some("a"));
            assert_eq!(rows[1].get_opt_string("name"), None);
        });
    }

    #[test]
    fn test_rebinding_reuses_pools() {
        smol::block_on(async {
            let orm = SqlxOrm::connect_lazy(config(), "memory").unwrap();
            orm.query().exec("create table t (id integer)").await.unwrap();

            let same = orm.connection("memory").unwrap();
            assert_eq!(same.name(), "memory");
            assert!(same.query().raw("select id from t").await.is_ok());

            let scratch = orm.connection("scratch").unwrap();
            scratch.query().exec("create table s (id integer)").await.unwrap();
            assert!(scratch.query().raw("select id from t").await.is_err());

            let again = same.connection("scratch").unwrap();
            assert!(again.query().raw("select id from s").await.is_ok());
        });
    }
}
