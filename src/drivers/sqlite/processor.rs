//! SQLite catalog row normalization.

use crate::grammars::split_list;
use crate::traits::{Column, DBColumn, DBForeignKey, DBIndex, ForeignKey, Index, Processor};

#[derive(Debug, Clone, Default)]
pub struct SqliteProcessor;

impl SqliteProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Processor for SqliteProcessor {
    fn process_columns(&self, columns: Vec<DBColumn>) -> Vec<Column> {
        columns
            .into_iter()
            .map(|column| {
                let full_type = column.full_type.to_lowercase();
                let type_name = full_type
                    .split('(')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();
                Column {
                    name: column.name,
                    type_name,
                    full_type,
                    collation: None,
                    comment: None,
                    default: column.default,
                    nullable: column.nullable,
                    autoincrement: column.autoincrement,
                }
            })
            .collect()
    }

    fn process_indexes(&self, indexes: Vec<DBIndex>) -> Vec<Index> {
        let has_primary = indexes.iter().any(|index| index.name == "primary");

        indexes
            .into_iter()
            .filter(|index| !index.columns.is_empty())
            // The implicit index backing a primary key duplicates the `primary` row.
            .filter(|index| !(has_primary && index.primary && index.name != "primary"))
            .map(|index| Index {
                name: index.name.to_lowercase(),
                columns: split_list(&index.columns),
                index_type: String::new(),
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
                on_update: foreign_key.on_update.to_lowercase(),
                on_delete: foreign_key.on_delete.to_lowercase(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_columns_splits_type() {
        let processed = SqliteProcessor.process_columns(vec![DBColumn {
            name: "price".to_string(),
            full_type: "NUMERIC(10, 2)".to_string(),
            nullable: true,
            ..Default::default()
        }]);

        assert_eq!(processed[0].type_name, "numeric");
        assert_eq!(processed[0].full_type, "numeric(10, 2)");
    }

    #[test]
    fn test_process_indexes_skips_empty_and_duplicate_primary() {
        let processed = SqliteProcessor.process_indexes(vec![
            DBIndex {
                name: "primary".to_string(),
                columns: "code".to_string(),
                primary: true,
                unique: true,
                ..Default::default()
            },
            DBIndex {
                name: "sqlite_autoindex_countries_1".to_string(),
                columns: "code".to_string(),
                primary: true,
                unique: true,
                ..Default::default()
            },
            DBIndex {
                name: "countries_name_unique".to_string(),
                columns: "name".to_string(),
                primary: false,
                unique: true,
                ..Default::default()
            },
            DBIndex {
                name: "broken".to_string(),
                columns: String::new(),
                ..Default::default()
            },
        ]);

        let names: Vec<&str> = processed.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["primary", "countries_name_unique"]);
    }

    #[test]
    fn test_process_foreign_keys() {
        let processed = SqliteProcessor.process_foreign_keys(vec![DBForeignKey {
            columns: "user_id".to_string(),
            foreign_schema: "main".to_string(),
            foreign_table: "users".to_string(),
            foreign_columns: "id".to_string(),
            on_update: "NO ACTION".to_string(),
            on_delete: "CASCADE".to_string(),
            ..Default::default()
        }]);

        assert_eq!(processed[0].name, "");
        assert_eq!(processed[0].on_update, "no action");
        assert_eq!(processed[0].on_delete, "cascade");
    }
}
