//! SQL Server schema introspection.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::grammar::SqlserverGrammar;
use super::processor::SqlserverProcessor;
use crate::drivers::common::fetch;
use crate::grammars::split_qualified;
use crate::traits::{Column, DBColumn, DBIndex, DriverSchema, Grammar, Index, Orm, Processor, Type};

/// Introspection for SQL Server.
///
/// Table names may be qualified as `schema.table`; unqualified names resolve
/// against the session's default schema.
pub struct SqlserverSchema {
    grammar: SqlserverGrammar,
    processor: SqlserverProcessor,
    orm: Arc<dyn Orm>,
    prefix: String,
    schema: String,
}

impl SqlserverSchema {
    pub fn new(orm: Arc<dyn Orm>, prefix: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            grammar: SqlserverGrammar::new(),
            processor: SqlserverProcessor::new(),
            orm,
            prefix: prefix.into(),
            schema: schema.into(),
        }
    }

    fn resolve<'a>(&'a self, table: &'a str) -> (&'a str, String) {
        let (schema, table) = split_qualified(table);
        (
            schema.unwrap_or(&self.schema),
            format!("{}{}", self.prefix, table),
        )
    }
}

#[async_trait]
impl DriverSchema for SqlserverSchema {
    async fn get_columns(&self, table: &str) -> Result<Vec<Column>> {
        let (schema, table) = self.resolve(table);
        let sql = self.grammar.compile_columns(schema, &table);
        let columns: Vec<DBColumn> = fetch(self.orm.as_ref(), &sql).await?;
        Ok(self.processor.process_columns(columns))
    }

    async fn get_indexes(&self, table: &str) -> Result<Vec<Index>> {
        let (schema, table) = self.resolve(table);
        let sql = self.grammar.compile_indexes(schema, &table);
        let indexes: Vec<DBIndex> = fetch(self.orm.as_ref(), &sql).await?;
        Ok(self.processor.process_indexes(indexes))
    }

    async fn get_types(&self) -> Result<Vec<Type>> {
        Ok(Vec::new())
    }
}
