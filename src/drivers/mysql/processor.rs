//! MySQL catalog row normalization.

use crate::grammars::split_list;
use crate::traits::{Column, DBColumn, DBForeignKey, DBIndex, ForeignKey, Index, Processor};

#[derive(Debug, Clone, Default)]
pub struct MysqlProcessor;

impl MysqlProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Processor for MysqlProcessor {
    fn process_columns(&self, columns: Vec<DBColumn>) -> Vec<Column> {
        columns
            .into_iter()
            .map(|column| {
                let autoincrement = column.autoincrement
                    || column.extra.to_lowercase().contains("auto_increment");
                Column {
                    name: column.name,
                    full_type: column.full_type,
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
            .map(|index| {
                let primary = index.name.eq_ignore_ascii_case("primary");
                Index {
                    name: index.name.to_lowercase(),
                    columns: split_list(&index.columns),
                    index_type: index.index_type.to_lowercase(),
                    primary,
                    unique: index.unique || primary,
                }
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
