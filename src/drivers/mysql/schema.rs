//! MySQL schema introspection.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::grammar::MysqlGrammar;
use super::processor::MysqlProcessor;
use crate::drivers::common::fetch;
use crate::traits::{Column, DBColumn, DBIndex, DriverSchema, Grammar, Index, Orm, Processor, Type};

/// Introspection scoped to the connection's database.
pub struct MysqlSchema {
    grammar: MysqlGrammar,
    processor: MysqlProcessor,
    orm: Arc<dyn Orm>,
    prefix: String,
    database: String,
}

impl MysqlSchema {
    pub fn new(orm: Arc<dyn Orm>, prefix: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            grammar: MysqlGrammar::new(),
            processor: MysqlProcessor::new(),
            orm,
            prefix: prefix.into(),
            database: database.into(),
        }
    }
}

#[async_trait]
impl DriverSchema for MysqlSchema {
    async fn get_columns(&self, table: &str) -> Result<Vec<Column>> {
        let table = format!("{}{}", self.prefix, table);
        let sql = self.grammar.compile_columns(&self.database, &table);
        let columns: Vec<DBColumn> = fetch(self.orm.as_ref(), &sql).await?;
        Ok(self.processor.process_columns(columns))
    }

    async fn get_indexes(&self, table: &str) -> Result<Vec<Index>> {
        let table = format!("{}{}", self.prefix, table);
        let sql = self.grammar.compile_indexes(&self.database, &table);
        let indexes: Vec<DBIndex> = fetch(self.orm.as_ref(), &sql).await?;
        Ok(self.processor.process_indexes(indexes))
    }

    /// MySQL has no user-defined types.
    async fn get_types(&self) -> Result<Vec<Type>> {
        Ok(Vec::new())
    }
}
