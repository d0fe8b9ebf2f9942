//! MySQL SQL compiler.

use anyhow::Result;

use crate::blueprint::{Blueprint, ColumnDefinition, ColumnType, Command, IndexDefinition};
use crate::grammars::{Quoter, default_value, prefixed, split_qualified};
use crate::traits::Grammar;

const QUOTE: Quoter = Quoter::Backtick;

/// Compiles blueprints and `information_schema` queries for MySQL.
#[derive(Debug, Clone, Default)]
pub struct MysqlGrammar;

impl MysqlGrammar {
    pub fn new() -> Self {
        Self
    }

    fn type_sql(column_type: &ColumnType) -> String {
        match column_type {
            ColumnType::TinyInteger => "tinyint".into(),
            ColumnType::SmallInteger => "smallint".into(),
            ColumnType::Integer => "int".into(),
            ColumnType::BigInteger => "bigint".into(),
            ColumnType::String(length) => format!("varchar({})", length),
            ColumnType::Char(length) => format!("char({})", length),
            ColumnType::Text => "text".into(),
            ColumnType::MediumText => "mediumtext".into(),
            ColumnType::LongText => "longtext".into(),
            ColumnType::Boolean => "tinyint(1)".into(),
            ColumnType::Decimal { precision, scale } => format!("decimal({}, {})", precision, scale),
            ColumnType::Double => "double".into(),
            ColumnType::Float => "float".into(),
            ColumnType::Date => "date".into(),
            ColumnType::Time => "time".into(),
            ColumnType::DateTime => "datetime".into(),
            ColumnType::Timestamp | ColumnType::TimestampTz => "timestamp".into(),
            ColumnType::Json | ColumnType::Jsonb => "json".into(),
            ColumnType::Uuid => "char(36)".into(),
            ColumnType::Binary => "blob".into(),
            ColumnType::Enum(values) => format!(
                "enum({})",
                values
                    .iter()
                    .map(|v| QUOTE.value(v))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }

    fn column_sql(column: &ColumnDefinition) -> String {
        let mut sql = format!(
            "{} {}",
            QUOTE.ident(&column.name),
            Self::type_sql(&column.column_type)
        );

        if column.unsigned && column.column_type.is_integer() {
            sql.push_str(" unsigned");
        }

        sql.push_str(if column.nullable { " null" } else { " not null" });

        if let Some(default) = &column.default {
            sql.push_str(" default ");
            sql.push_str(&default_value(QUOTE, default, ("'1'", "'0'")));
        }

        if column.auto_increment && column.column_type.is_integer() {
            sql.push_str(if column.change {
                " auto_increment"
            } else {
                " auto_increment primary key"
            });
        }

        if let Some(comment) = &column.comment {
            sql.push_str(" comment ");
            sql.push_str(&QUOTE.value(comment));
        }

        sql
    }

    fn with_algorithm(index: &IndexDefinition) -> String {
        index
            .algorithm
            .as_ref()
            .map(|algorithm| format!(" using {}", algorithm))
            .unwrap_or_default()
    }
}

impl Grammar for MysqlGrammar {
    fn compile(&self, blueprint: &Blueprint, command: &Command) -> Result<Vec<String>> {
        let prefix = blueprint.prefix();
        let table = QUOTE.table(prefix, blueprint.table());

        let sql = match command {
            Command::Create => format!(
                "create table {} ({})",
                table,
                blueprint
                    .columns()
                    .iter()
                    .map(Self::column_sql)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Command::Drop => format!("drop table {}", table),
            Command::DropIfExists => format!("drop table if exists {}", table),
            Command::Rename { to } => format!(
                "rename table {} to {}",
                table,
                QUOTE.ident(&prefixed(prefix, split_qualified(to).1))
            ),
            Command::Add(column) => format!("alter table {} add {}", table, Self::column_sql(column)),
            Command::Change(column) => {
                format!("alter table {} modify {}", table, Self::column_sql(column))
            }
            Command::DropColumn { columns } => format!(
                "alter table {} {}",
                table,
                columns
                    .iter()
                    .map(|column| format!("drop {}", QUOTE.ident(column)))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Command::RenameColumn { from, to } => format!(
                "alter table {} rename column {} to {}",
                table,
                QUOTE.ident(from),
                QUOTE.ident(to)
            ),
            Command::Primary(index) => format!(
                "alter table {} add primary key{} ({})",
                table,
                Self::with_algorithm(index),
                QUOTE.columns(&index.columns)
            ),
            Command::Unique(index) => format!(
                "alter table {} add unique {}{} ({})",
                table,
                QUOTE.ident(&index.name),
                Self::with_algorithm(index),
                QUOTE.columns(&index.columns)
            ),
            Command::Index(index) => format!(
                "alter table {} add index {}{} ({})",
                table,
                QUOTE.ident(&index.name),
                Self::with_algorithm(index),
                QUOTE.columns(&index.columns)
            ),
            Command::Foreign(foreign) => {
                let mut sql = format!(
                    "alter table {} add constraint {} foreign key ({}) references {} ({})",
                    table,
                    QUOTE.ident(&foreign.name),
                    QUOTE.columns(&foreign.columns),
                    QUOTE.table(prefix, &foreign.on),
                    QUOTE.columns(&foreign.references)
                );
                if let Some(action) = &foreign.on_delete {
                    sql.push_str(&format!(" on delete {}", action));
                }
                if let Some(action) = &foreign.on_update {
                    sql.push_str(&format!(" on update {}", action));
                }
                sql
            }
            Command::DropPrimary { .. } => format!("alter table {} drop primary key", table),
            Command::DropUnique { name } | Command::DropIndex { name } => {
                format!("alter table {} drop index {}", table, QUOTE.ident(name))
            }
            Command::DropForeign { name } => {
                format!("alter table {} drop foreign key {}", table, QUOTE.ident(name))
            }
            Command::RenameIndex { from, to } => format!(
                "alter table {} rename index {} to {}",
                table,
                QUOTE.ident(from),
                QUOTE.ident(to)
            ),
            Command::Comment(comment) => {
                format!("alter table {} comment = {}", table, QUOTE.value(comment))
            }
        };

        Ok(vec![sql])
    }

    fn compile_tables(&self, database: &str) -> String {
        format!(
            "select table_name as `name`, table_schema as `schema`, \
             (data_length + index_length) as `size`, table_comment as `comment` \
             from information_schema.tables \
             where table_schema = {} and table_type in ('BASE TABLE', 'SYSTEM VERSIONED') \
             order by table_name",
            QUOTE.value(database)
        )
    }

    fn compile_views(&self, database: &str) -> String {
        format!(
            "select table_name as `name`, table_schema as `schema`, view_definition as `definition` \
             from information_schema.views \
             where table_schema = {} \
             order by table_name",
            QUOTE.value(database)
        )
    }

    fn compile_columns(&self, database: &str, table: &str) -> String {
        format!(
            "select column_name as `name`, data_type as `type_name`, column_type as `type`, \
             collation_name as `collation`, is_nullable as `nullable`, \
             column_default as `default`, column_comment as `comment`, extra as `extra` \
             from information_schema.columns \
             where table_schema = {} and table_name = {} \
             order by ordinal_position asc",
            QUOTE.value(database),
            QUOTE.value(table)
        )
    }

    fn compile_indexes(&self, database: &str, table: &str) -> String {
        format!(
            "select index_name as `name`, group_concat(column_name order by seq_in_index) as `columns`, \
             index_type as `type`, not non_unique as `unique` \
             from information_schema.statistics \
             where table_schema = {} and table_name = {} \
             group by index_name, index_type, non_unique",
            QUOTE.value(database),
            QUOTE.value(table)
        )
    }

    fn compile_foreign_keys(&self, database: &str, table: &str) -> String {
        format!(
            "select kc.constraint_name as `name`, \
             group_concat(kc.column_name order by kc.ordinal_position) as `columns`, \
             kc.referenced_table_schema as `foreign_schema`, \
             kc.referenced_table_name as `foreign_table`, \
             group_concat(kc.referenced_column_name order by kc.ordinal_position) as `foreign_columns`, \
             rc.update_rule as `on_update`, rc.delete_rule as `on_delete` \
             from information_schema.key_column_usage kc \
             join information_schema.referential_constraints rc \
             on kc.constraint_schema = rc.constraint_schema and kc.constraint_name = rc.constraint_name \
             where kc.table_schema = {} and kc.table_name = {} and kc.referenced_table_name is not null \
             group by kc.constraint_name, kc.referenced_table_schema, kc.referenced_table_name, \
             rc.update_rule, rc.delete_rule",
            QUOTE.value(database),
            QUOTE.value(table)
        )
    }
}
