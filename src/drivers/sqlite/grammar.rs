//! SQLite SQL compiler.

use anyhow::{Result, bail};

use crate::blueprint::{
    Blueprint, ColumnDefinition, ColumnType, Command, ForeignKeyDefinition, IndexDefinition,
};
use crate::grammars::{Quoter, default_value, prefixed, split_qualified};
use crate::traits::Grammar;

const QUOTE: Quoter = Quoter::DoubleQuote;

/// Compiles blueprints and `sqlite_master`/pragma queries for SQLite.
///
/// SQLite cannot add primary or foreign keys to an existing table, so both
/// are folded into `create table` and rejected in alter mode.
#[derive(Debug, Clone, Default)]
pub struct SqliteGrammar;

impl SqliteGrammar {
    pub fn new() -> Self {
        Self
    }

    /// Query returning the `create table` statement of `table`.
    pub fn compile_table_sql(&self, table: &str) -> String {
        format!(
            "select sql from sqlite_master where type = 'table' and name = {}",
            QUOTE.value(table)
        )
    }

    fn type_sql(column: &ColumnDefinition) -> String {
        match &column.column_type {
            ColumnType::TinyInteger
            | ColumnType::SmallInteger
            | ColumnType::Integer
            | ColumnType::BigInteger => "integer".into(),
            ColumnType::String(_) | ColumnType::Char(_) | ColumnType::Uuid => "varchar".into(),
            ColumnType::Text
            | ColumnType::MediumText
            | ColumnType::LongText
            | ColumnType::Json
            | ColumnType::Jsonb => "text".into(),
            ColumnType::Boolean => "tinyint(1)".into(),
            ColumnType::Decimal { .. } => "numeric".into(),
            ColumnType::Double => "double".into(),
            ColumnType::Float => "float".into(),
            ColumnType::Date => "date".into(),
            ColumnType::Time => "time".into(),
            ColumnType::DateTime | ColumnType::Timestamp | ColumnType::TimestampTz => {
                "datetime".into()
            }
            ColumnType::Binary => "blob".into(),
            ColumnType::Enum(values) => format!(
                "varchar check ({} in ({}))",
                QUOTE.ident(&column.name),
                values
                    .iter()
                    .map(|v| QUOTE.value(v))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }

    fn column_sql(column: &ColumnDefinition) -> String {
        let mut sql = format!("{} {}", QUOTE.ident(&column.name), Self::type_sql(column));

        sql.push_str(if column.nullable { " null" } else { " not null" });

        if let Some(default) = &column.default {
            sql.push_str(" default ");
            sql.push_str(&default_value(QUOTE, default, ("'1'", "'0'")));
        }

        if column.auto_increment && column.column_type.is_integer() {
            sql.push_str(" primary key autoincrement");
        }

        sql
    }

    fn foreign_sql(prefix: &str, foreign: &ForeignKeyDefinition) -> String {
        let mut sql = format!(
            "foreign key({}) references {}({})",
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

    fn compile_create(blueprint: &Blueprint, table: &str) -> String {
        let mut parts: Vec<String> = blueprint.columns().iter().map(Self::column_sql).collect();

        for command in blueprint.ordered_commands() {
            match command {
                Command::Foreign(foreign) => {
                    parts.push(Self::foreign_sql(blueprint.prefix(), &foreign))
                }
                Command::Primary(index) => {
                    parts.push(format!("primary key ({})", QUOTE.columns(&index.columns)))
                }
                _ => {}
            }
        }

        format!("create table {} ({})", table, parts.join(", "))
    }

    fn compile_index(kind: &str, table: &str, index: &IndexDefinition) -> String {
        format!(
            "create {}index {} on {} ({})",
            kind,
            QUOTE.ident(&index.name),
            table,
            QUOTE.columns(&index.columns)
        )
    }
}

impl Grammar for SqliteGrammar {
    fn compile(&self, blueprint: &Blueprint, command: &Command) -> Result<Vec<String>> {
        let prefix = blueprint.prefix();
        let table = QUOTE.table(prefix, blueprint.table());

        let statements = match command {
            Command::Create => vec![Self::compile_create(blueprint, &table)],
            Command::Drop => vec![format!("drop table {}", table)],
            Command::DropIfExists => vec![format!("drop table if exists {}", table)],
            Command::Rename { to } => vec![format!(
                "alter table {} rename to {}",
                table,
                QUOTE.ident(&prefixed(prefix, split_qualified(to).1))
            )],
            Command::Add(column) => vec![format!(
                "alter table {} add column {}",
                table,
                Self::column_sql(column)
            )],
            Command::DropColumn { columns } => columns
                .iter()
                .map(|column| format!("alter table {} drop column {}", table, QUOTE.ident(column)))
                .collect(),
            Command::RenameColumn { from, to } => vec![format!(
                "alter table {} rename column {} to {}",
                table,
                QUOTE.ident(from),
                QUOTE.ident(to)
            )],
            Command::Primary(_) | Command::Foreign(_) if blueprint.is_creating() => Vec::new(),
            Command::Unique(index) => vec![Self::compile_index("unique ", &table, index)],
            Command::Index(index) => vec![Self::compile_index("", &table, index)],
            Command::DropUnique { name } | Command::DropIndex { name } => {
                vec![format!("drop index {}", QUOTE.ident(name))]
            }
            Command::Comment(_) => Vec::new(),
            Command::Change(_)
            | Command::Primary(_)
            | Command::Foreign(_)
            | Command::DropPrimary { .. }
            | Command::DropForeign { .. }
            | Command::RenameIndex { .. } => {
                bail!(
                    "SQLite does not support the {} command on an existing table",
                    command.name()
                )
            }
        };

        Ok(statements)
    }

    fn compile_tables(&self, _database: &str) -> String {
        "select name, 'main' as schema from sqlite_master \
         where type = 'table' and name not like 'sqlite_%' \
         order by name"
            .to_string()
    }

    fn compile_views(&self, _database: &str) -> String {
        "select name, 'main' as schema, sql as definition from sqlite_master \
         where type = 'view' \
         order by name"
            .to_string()
    }

    fn compile_columns(&self, _schema: &str, table: &str) -> String {
        format!(
            "select name, type as type_name, type as type, not \"notnull\" as nullable, \
             dflt_value as \"default\", pk as \"primary\" \
             from pragma_table_info({}) \
             order by cid asc",
            QUOTE.value(table)
        )
    }

    fn compile_indexes(&self, _schema: &str, table: &str) -> String {
        let table = QUOTE.value(table);
        format!(
            "select 'primary' as name, group_concat(col) as columns, 1 as \"unique\", 1 as \"primary\" \
             from (select name as col from pragma_table_info({table}) where pk > 0 order by pk, cid) \
             group by name \
             union select name, group_concat(col) as columns, \"unique\", origin = 'pk' as \"primary\" \
             from (select il.*, ii.name as col from pragma_index_list({table}) il, \
             pragma_index_info(il.name) ii order by il.seq, ii.seqno) \
             group by name, \"unique\", \"primary\""
        )
    }

    fn compile_foreign_keys(&self, _schema: &str, table: &str) -> String {
        format!(
            "select '' as name, group_concat(\"from\") as columns, 'main' as foreign_schema, \
             \"table\" as foreign_table, group_concat(\"to\") as foreign_columns, \
             on_update, on_delete \
             from (select * from pragma_foreign_key_list({}) order by id desc, seq) \
             group by id, \"table\", on_update, on_delete",
            QUOTE.value(table)
        )
    }
}
