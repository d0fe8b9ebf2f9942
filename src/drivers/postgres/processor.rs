//! PostgreSQL catalog row normalization.

use crate::grammars::split_list;
use crate::traits::{
    Column, DBColumn, DBForeignKey, DBIndex, DBType, ForeignKey, Index, Processor, Type,
};

#[derive(Debug, Clone, Default)]
pub struct PostgresProcessor;

impl PostgresProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Map a `pg_constraint` action code to its SQL spelling.
    fn action(code: &str) -> String {
        match code {
            "a" => "no action",
            "c" => "cascade",
            "n" => "set null",
            "d" => "set default",
            "r" => "restrict",
            other => other,
        }
        .to_string()
    }

    fn type_kind(code: &str) -> String {
        match code {
            "b" => "base",
            "c" => "composite",
            "d" => "domain",
            "e" => "enum",
            "p" => "pseudo",
            "r" => "range",
            "m" => "multirange",
            other => other,
        }
        .to_string()
    }

    fn type_category(code: &str) -> String {
        match code {
            "A" => "array",
            "B" => "boolean",
            "C" => "composite",
            "D" => "date_time",
            "E" => "enum",
            "G" => "geometric",
            "I" => "network_address",
            "N" => "numeric",
            "P" => "pseudo",
            "R" => "range",
            "S" => "string",
            "T" => "timespan",
            "U" => "user_defined",
            "V" => "bit_string",
            "X" => "unknown",
            "Z" => "internal_use",
            other => other,
        }
        .to_string()
    }
}

impl Processor for PostgresProcessor {
    fn process_columns(&self, columns: Vec<DBColumn>) -> Vec<Column> {
        columns
            .into_iter()
            .map(|column| {
                let autoincrement = column.autoincrement
                    || column
                        .default
                        .as_deref()
                        .is_some_and(|default| default.starts_with("nextval("));
                Column {
                    name: column.name,
                    full_type: if column.full_type.is_empty() {
                        column.type_name.clone()
                    } else {
                        column.full_type
                    },
                    type_name: column.type_name,
                    collation: column.collation,
                    comment: column.comment,
                    default: column.default,
                    nullable: column.nullable,
                    autoincrement,
                }
            })
            .collect()
    }

    fn process_indexes(&self, indexes: Vec<DBIndex>) -> Vec<Index> {
        indexes
            .into_iter()
            .map(|index| Index {
                name: index.name.to_lowercase(),
                columns: split_list(&index.columns),
                index_type: index.index_type.to_lowercase(),
                primary: index.primary,
                unique: index.unique,
            })
            .collect()
    }

    fn process_foreign_keys(&self, foreign_keys: Vec<DBForeignKey>) -> Vec<ForeignKey> {
        foreign_keys
            .into_iter()
            .map(|foreign_key| ForeignKey {
                name: foreign_key.name,
                columns: split_list(&foreign_key.columns),
                foreign_schema: foreign_key.foreign_schema,
                foreign_table: foreign_key.foreign_table,
                foreign_columns: split_list(&foreign_key.foreign_columns),
                on_update: Self::action(&foreign_key.on_update),
                on_delete: Self::action(&foreign_key.on_delete),
            })
            .collect()
    }

    fn process_types(&self, types: Vec<DBType>) -> Vec<Type> {
        types
            .into_iter()
            .map(|t| Type {
                name: t.name,
                schema: t.schema,
                kind: Self::type_kind(&t.kind),
                category: Self::type_category(&t.category),
                implicit: t.implicit,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_foreign_keys_maps_action_codes() {
        let processed = PostgresProcessor.process_foreign_keys(vec![DBForeignKey {
            name: "posts_user_id_foreign".to_string(),
            columns: "user_id".to_string(),
            foreign_schema: "public".to_string(),
            foreign_table: "users".to_string(),
            foreign_columns: "id".to_string(),
            on_update: "a".to_string(),
            on_delete: "c".to_string(),
        }]);

        assert_eq!(processed[0].on_update, "no action");
        assert_eq!(processed[0].on_delete, "cascade");
        assert_eq!(processed[0].columns, vec!["user_id"]);
        assert_eq!(processed[0].foreign_columns, vec!["id"]);
    }

    #[test]
    fn test_process_columns_detects_serial() {
        let processed = PostgresProcessor.process_columns(vec![
            DBColumn {
                name: "id".to_string(),
                type_name: "int8".to_string(),
                full_type: "bigint".to_string(),
                default: Some("nextval('users_id_seq'::regclass)".to_string()),
                ..Default::default()
            },
            DBColumn {
                name: "email".to_string(),
                type_name: "varchar".to_string(),
                full_type: "character varying(255)".to_string(),
                nullable: true,
                ..Default::default()
            },
        ]);

        assert!(processed[0].autoincrement);
        assert!(!processed[1].autoincrement);
        assert!(processed[1].nullable);
        assert_eq!(processed[1].full_type, "character varying(255)");
    }

    #[test]
    fn test_process_types_expands_codes() {
        let processed = PostgresProcessor.process_types(vec![DBType {
            name: "mood".to_string(),
            schema: "public".to_string(),
            kind: "e".to_string(),
            category: "E".to_string(),
            implicit: false,
        }]);

        assert_eq!(processed[0].kind, "enum");
        assert_eq!(processed[0].category, "enum");
    }

    #[test]
    fn test_process_indexes_splits_columns() {
        let processed = PostgresProcessor.process_indexes(vec![DBIndex {
            name: "users_pkey".to_string(),
            columns: "id,tenant_id".to_string(),
            index_type: "btree".to_string(),
            primary: true,
            unique: true,
        }]);

        assert_eq!(processed[0].columns, vec!["id", "tenant_id"]);
        assert!(processed[0].primary);
    }
}
