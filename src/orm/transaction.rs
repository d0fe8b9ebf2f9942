//! sqlx transactions behind the `Transaction` contract.

use anyhow::{Result, anyhow, bail};
use async_lock::Mutex;
use async_trait::async_trait;
use sqlx::{MySql, Postgres, Sqlite};
use std::sync::Arc;

use super::{PoolRegistry, SqlxOrm, SqlxPool};
use crate::config::Config;
use crate::drivers::mysql::types::MySqlValueConverter;
use crate::drivers::postgres::types::PgValueConverter;
use crate::drivers::sqlite::types::SqliteValueConverter;
use crate::traits::{Orm, Query, Row, Transaction};

enum OpenTransaction {
    Postgres(sqlx::Transaction<'static, Postgres>),
    MySql(sqlx::Transaction<'static, MySql>),
    Sqlite(sqlx::Transaction<'static, Sqlite>),
}

/// An open transaction on one pooled connection.
///
/// The connection is returned to the pool on commit or rollback; dropping an
/// unfinished transaction rolls it back.
pub struct SqlxTransaction {
    inner: Mutex<Option<OpenTransaction>>,
}

impl SqlxTransaction {
    pub(crate) async fn begin(pool: &SqlxPool) -> Result<Self> {
        let tx = match pool {
            SqlxPool::Postgres(pool) => OpenTransaction::Postgres(pool.begin().await?),
            SqlxPool::MySql(pool) => OpenTransaction::MySql(pool.begin().await?),
            SqlxPool::Sqlite(pool) => OpenTransaction::Sqlite(pool.begin().await?),
        };
        Ok(Self {
            inner: Mutex::new(Some(tx)),
        })
    }

    fn finished() -> anyhow::Error {
        anyhow!("transaction has already been committed or rolled back")
    }
}

#[async_trait]
impl Query for SqlxTransaction {
    async fn raw(&self, sql: &str) -> Result<Vec<Row>> {
        let mut guard = self.inner.lock().await;
        let tx = guard.as_mut().ok_or_else(Self::finished)?;

        let rows = match tx {
            OpenTransaction::Postgres(tx) => {
                PgValueConverter::convert_rows(&sqlx::query(sql).fetch_all(&mut **tx).await?)
            }
            OpenTransaction::MySql(tx) => {
                MySqlValueConverter::convert_rows(&sqlx::query(sql).fetch_all(&mut **tx).await?)
            }
            OpenTransaction::Sqlite(tx) => {
                SqliteValueConverter::convert_rows(&sqlx::query(sql).fetch_all(&mut **tx).await?)
            }
        };
        Ok(rows)
    }

    async fn exec(&self, sql: &str) -> Result<u64> {
        let mut guard = self.inner.lock().await;
        let tx = guard.as_mut().ok_or_else(Self::finished)?;

        let affected = match tx {
            OpenTransaction::Postgres(tx) => {
                sqlx::query(sql).execute(&mut **tx).await?.rows_affected()
            }
            OpenTransaction::MySql(tx) => sqlx::query(sql).execute(&mut **tx).await?.rows_affected(),
            OpenTransaction::Sqlite(tx) => {
                sqlx::query(sql).execute(&mut **tx).await?.rows_affected()
            }
        };
        Ok(affected)
    }

    fn in_transaction(&self) -> bool {
        true
    }
}

#[async_trait]
impl Transaction for SqlxTransaction {
    async fn commit(&self) -> Result<()> {
        let tx = self.inner.lock().await.take().ok_or_else(Self::finished)?;
        match tx {
            OpenTransaction::Postgres(tx) => tx.commit().await?,
            OpenTransaction::MySql(tx) => tx.commit().await?,
            OpenTransaction::Sqlite(tx) => tx.commit().await?,
        }
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        let tx = self.inner.lock().await.take().ok_or_else(Self::finished)?;
        match tx {
            OpenTransaction::Postgres(tx) => tx.rollback().await?,
            OpenTransaction::MySql(tx) => tx.rollback().await?,
            OpenTransaction::Sqlite(tx) => tx.rollback().await?,
        }
        Ok(())
    }

    fn as_query(&self) -> &dyn Query {
        self
    }
}

/// A caller-managed transaction exposed as an `Orm`.
///
/// Every query handle it gives out runs inside the transaction, so schema
/// operations on a `Schema` built over it join the transaction. The caller
/// decides the outcome with `commit` or `rollback`.
pub struct TransactionScope {
    name: String,
    config: Arc<dyn Config>,
    pools: PoolRegistry,
    tx: Arc<SqlxTransaction>,
}

impl TransactionScope {
    pub(crate) fn new(
        name: String,
        config: Arc<dyn Config>,
        pools: PoolRegistry,
        tx: Arc<SqlxTransaction>,
    ) -> Self {
        Self {
            name,
            config,
            pools,
            tx,
        }
    }

    pub async fn commit(&self) -> Result<()> {
        self.tx.commit().await
    }

    pub async fn rollback(&self) -> Result<()> {
        self.tx.rollback().await
    }
}

#[async_trait]
impl Orm for TransactionScope {
    fn name(&self) -> &str {
        &self.name
    }

    fn query(&self) -> Arc<dyn Query> {
        self.tx.clone()
    }

    async fn begin(&self) -> Result<Arc<dyn Transaction>> {
        bail!(
            "connection {} already has an open transaction; nested transactions are not supported",
            self.name
        )
    }

    fn connection(&self, name: &str) -> Result<Arc<dyn Orm>> {
        let orm: Arc<dyn Orm> = SqlxOrm::bind(self.config.clone(), name, self.pools.clone())?;
        Ok(orm)
    }
}
