//! SQLite schema introspection.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::grammar::SqliteGrammar;
use super::processor::SqliteProcessor;
use crate::drivers::common::fetch;
use crate::grammars::split_qualified;
use crate::traits::{Column, DBColumn, DBIndex, DriverSchema, Grammar, Index, Orm, Processor, Type};

/// Introspection for the connection's `main` database.
pub struct SqliteSchema {
    grammar: SqliteGrammar,
    processor: SqliteProcessor,
    orm: Arc<dyn Orm>,
    prefix: String,
}

impl SqliteSchema {
    pub fn new(orm: Arc<dyn Orm>, prefix: impl Into<String>) -> Self {
        Self {
            grammar: SqliteGrammar::new(),
            processor: SqliteProcessor::new(),
            orm,
            prefix: prefix.into(),
        }
    }

    /// Whether the table was declared with `AUTOINCREMENT`.
    async fn has_autoincrement(&self, table: &str) -> Result<bool> {
        let rows = self
            .orm
            .query()
            .raw(&self.grammar.compile_table_sql(table))
            .await?;
        Ok(rows
            .first()
            .and_then(|row| row.get_opt_string("sql"))
            .is_some_and(|sql| sql.to_lowercase().contains("autoincrement")))
    }
}

#[async_trait]
impl DriverSchema for SqliteSchema {
    async fn get_columns(&self, table: &str) -> Result<Vec<Column>> {
        let (_, table) = split_qualified(table);
        let table = format!("{}{}", self.prefix, table);
        let sql = self.grammar.compile_columns("", &table);
        let mut columns: Vec<DBColumn> = fetch(self.orm.as_ref(), &sql).await?;

        // Only an `integer primary key` column can be AUTOINCREMENT, and a
        // table has at most one.
        let candidates: Vec<usize> = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.primary && c.full_type.eq_ignore_ascii_case("integer"))
            .map(|(idx, _)| idx)
            .collect();
        if candidates.len() == 1 && self.has_autoincrement(&table).await? {
            columns[candidates[0]].autoincrement = true;
        }

        Ok(self.processor.process_columns(columns))
    }

    async fn get_indexes(&self, table: &str) -> Result<Vec<Index>> {
        let (_, table) = split_qualified(table);
        let table = format!("{}{}", self.prefix, table);
        let sql = self.grammar.compile_indexes("", &table);
        let indexes: Vec<DBIndex> = fetch(self.orm.as_ref(), &sql).await?;
        Ok(self.processor.process_indexes(indexes))
    }

    async fn get_types(&self) -> Result<Vec<Type>> {
        Ok(Vec::new())
    }
}
