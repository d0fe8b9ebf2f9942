//! PostgreSQL schema introspection.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::grammar::PostgresGrammar;
use super::processor::PostgresProcessor;
use crate::drivers::common::fetch;
use crate::grammars::split_qualified;
use crate::traits::{
    Column, DBColumn, DBIndex, DBType, DriverSchema, Grammar, Index, Orm, Processor, Type,
};

/// Introspection scoped to one PostgreSQL schema (namespace).
///
/// Table names may be qualified as `schema.table`; unqualified names use the
/// configured schema.
pub struct PostgresSchema {
    grammar: PostgresGrammar,
    processor: PostgresProcessor,
    orm: Arc<dyn Orm>,
    prefix: String,
    schema: String,
}

impl PostgresSchema {
    pub fn new(orm: Arc<dyn Orm>, prefix: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            grammar: PostgresGrammar::new(),
            processor: PostgresProcessor::new(),
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
impl DriverSchema for PostgresSchema {
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
        let Some(sql) = self.grammar.compile_types() else {
            return Ok(Vec::new());
        };
        let types: Vec<DBType> = fetch(self.orm.as_ref(), &sql).await?;
        Ok(self.processor.process_types(types))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeOrm;
    use crate::traits::{Row, Value};

    #[test]
    fn test_get_columns_uses_configured_schema_and_prefix() {
        let orm = FakeOrm::new("main");
        orm.respond(
            "pg_attribute",
            vec![Row::from_pairs([
                ("name", Value::Text("id".to_string())),
                ("type_name", Value::Text("int8".to_string())),
                ("type", Value::Text("bigint".to_string())),
                ("nullable", Value::Bool(false)),
                (
                    "default",
                    Value::Text("nextval('app_users_id_seq'::regclass)".to_string()),
                ),
            ])],
        );

        let schema = PostgresSchema::new(orm.clone(), "app_", "public");
        let columns = smol::block_on(schema.get_columns("users")).unwrap();

        assert_eq!(columns.len(), 1);
        assert!(columns[0].autoincrement);
        let sql = &orm.queries()[0];
        assert!(sql.contains("c.relname = 'app_users'"));
        assert!(sql.contains("n.nspname = 'public'"));
    }

    #[test]
    fn test_get_indexes_honors_qualified_name() {
        let orm = FakeOrm::new("main");
        let schema = PostgresSchema::new(orm.clone(), "", "public");

        let indexes = smol::block_on(schema.get_indexes("audit.events")).unwrap();

        assert!(indexes.is_empty());
        assert!(orm.queries()[0].contains("tc.relname = 'events' and tn.nspname = 'audit'"));
    }

    #[test]
    fn test_get_types_propagates_errors() {
        let orm = FakeOrm::new("main");
        orm.fail_raw("permission denied for pg_type");
        let schema = PostgresSchema::new(orm, "", "public");

        let err = smol::block_on(schema.get_types()).unwrap_err();
        assert_eq!(err.to_string(), "permission denied for pg_type");
    }
}
