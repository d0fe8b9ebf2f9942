//! SQL Server catalog row normalization.

use crate::grammars::split_list;
use crate::traits::{Column, DBColumn, DBForeignKey, DBIndex, ForeignKey, Index, Processor};

#[derive(Debug, Clone, Default)]
pub struct SqlserverProcessor;

impl SqlserverProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Render a type with its length/precision as declared.
    ///
    /// `max_length` is in bytes, so the n-types report half of it; `-1`
    /// means `max`.
    fn full_type(column: &DBColumn) -> String {
        let type_name = column.type_name.as_str();
        let length = column.length.unwrap_or(0);
        let precision = column.precision.unwrap_or(0);
        let scale = column.scale.unwrap_or(0);

        match type_name.to_lowercase().as_str() {
            "char" | "varchar" | "binary" | "varbinary" => {
                if length == -1 {
                    format!("{}(max)", type_name)
                } else {
                    format!("{}({})", type_name, length)
                }
            }
            "nchar" | "nvarchar" => {
                if length == -1 {
                    format!("{}(max)", type_name)
                } else {
                    format!("{}({})", type_name, length / 2)
                }
            }
            "decimal" | "numeric" => format!("{}({},{})", type_name, precision, scale),
            "float" => format!("{}({})", type_name, precision),
            "datetime2" | "datetimeoffset" | "time" => format!("{}({})", type_name, scale),
            _ => type_name.to_string(),
        }
    }

    /// `NO_ACTION` -> `no action`
    fn action(rule: &str) -> String {
        rule.to_lowercase().replace('_', " ")
    }
}

impl Processor for SqlserverProcessor {
    fn process_columns(&self, columns: Vec<DBColumn>) -> Vec<Column> {
        columns
            .into_iter()
            .map(|column| Column {
                full_type: Self::full_type(&column),
                name: column.name,
                type_name: column.type_name,
                collation: column.collation,
                comment: column.comment,
                default: column.default,
                nullable: column.nullable,
                autoincrement: column.autoincrement,
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(type_name: &str, length: i64) -> DBColumn {
        DBColumn {
            name: "c".to_string(),
            type_name: type_name.to_string(),
            length: Some(length),
            ..Default::default()
        }
    }

    #[test]
    fn test_full_type_lengths() {
        let processed = SqlserverProcessor.process_columns(vec![
            column("nvarchar", 510),
            column("nvarchar", -1),
            column("varchar", 40),
            column("int", 4),
        ]);

        let types: Vec<&str> = processed.iter().map(|c| c.full_type.as_str()).collect();
        assert_eq!(types, vec!["nvarchar(255)", "nvarchar(max)", "varchar(40)", "int"]);
    }

    #[test]
    fn test_decimal_full_type() {
        let processed = SqlserverProcessor.process_columns(vec![DBColumn {
            name: "price".to_string(),
            type_name: "decimal".to_string(),
            precision: Some(10),
            scale: Some(2),
            ..Default::default()
        }]);
        assert_eq!(processed[0].full_type, "decimal(10,2)");
    }

    #[test]
    fn test_foreign_key_actions() {
        let processed = SqlserverProcessor.process_foreign_keys(vec![DBForeignKey {
            name: "fk".to_string(),
            columns: "user_id".to_string(),
            foreign_schema: "dbo".to_string(),
            foreign_table: "users".to_string(),
            foreign_columns: "id".to_string(),
            on_update: "NO_ACTION".to_string(),
            on_delete: "SET_NULL".to_string(),
        }]);

        assert_eq!(processed[0].on_update, "no action");
        assert_eq!(processed[0].on_delete, "set null");
    }

    #[test]
    fn test_index_type_lowercased() {
        let processed = SqlserverProcessor.process_indexes(vec![DBIndex {
            name: "PK_users".to_string(),
            columns: "id".to_string(),
            index_type: "CLUSTERED".to_string(),
            primary: true,
            unique: true,
        }]);
        assert_eq!(processed[0].index_type, "clustered");
        assert_eq!(processed[0].name, "pk_users");
    }
}
