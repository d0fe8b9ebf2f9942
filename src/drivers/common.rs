//! Introspection shared by every dialect.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::traits::{
    CommonSchema, DBTable, DBView, FromRow, Grammar, Orm, Processor, Table, View, scan,
};

/// Run a catalog query on the engine's current handle and scan the rows.
pub(crate) async fn fetch<T: FromRow>(orm: &dyn Orm, sql: &str) -> Result<Vec<T>> {
    let rows = orm.query().raw(sql).await?;
    scan(&rows)
}

/// Tables and views, compiled by the dialect's grammar and normalized by its
/// processor.
pub struct SharedSchema {
    grammar: Arc<dyn Grammar>,
    processor: Arc<dyn Processor>,
    orm: Arc<dyn Orm>,
    database: String,
}

impl SharedSchema {
    pub fn new(
        grammar: Arc<dyn Grammar>,
        processor: Arc<dyn Processor>,
        orm: Arc<dyn Orm>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            grammar,
            processor,
            orm,
            database: database.into(),
        }
    }
}

#[async_trait]
impl CommonSchema for SharedSchema {
    async fn get_tables(&self) -> Result<Vec<Table>> {
        let sql = self.grammar.compile_tables(&self.database);
        let tables: Vec<DBTable> = fetch(self.orm.as_ref(), &sql).await?;
        Ok(self.processor.process_tables(tables))
    }

    async fn get_views(&self) -> Result<Vec<View>> {
        let sql = self.grammar.compile_views(&self.database);
        let views: Vec<DBView> = fetch(self.orm.as_ref(), &sql).await?;
        Ok(self.processor.process_views(views))
    }
}
