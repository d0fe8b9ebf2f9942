//! SQL Server SQL compiler.

use anyhow::Result;

use crate::blueprint::{Blueprint, ColumnDefinition, ColumnType, Command};
use crate::grammars::{Quoter, default_value, prefixed, split_qualified};
use crate::traits::Grammar;

const QUOTE: Quoter = Quoter::Bracket;

/// Compiles blueprints and `sys.*` catalog queries for SQL Server.
///
/// An empty schema argument scopes introspection to the session's default
/// schema (`schema_name()`).
#[derive(Debug, Clone, Default)]
pub struct SqlserverGrammar;

impl SqlserverGrammar {
    pub fn new() -> Self {
        Self
    }

    fn type_sql(column: &ColumnDefinition) -> String {
        match &column.column_type {
            ColumnType::TinyInteger => "tinyint".into(),
            ColumnType::SmallInteger => "smallint".into(),
            ColumnType::Integer => "int".into(),
            ColumnType::BigInteger => "bigint".into(),
            ColumnType::String(length) => format!("nvarchar({})", length),
            ColumnType::Char(length) => format!("nchar({})", length),
            ColumnType::Text | ColumnType::MediumText | ColumnType::LongText => {
                "nvarchar(max)".into()
            }
            ColumnType::Boolean => "bit".into(),
            ColumnType::Decimal { precision, scale } => format!("decimal({}, {})", precision, scale),
            ColumnType::Double => "double precision".into(),
            ColumnType::Float => "float".into(),
            ColumnType::Date => "date".into(),
            ColumnType::Time => "time".into(),
            ColumnType::DateTime | ColumnType::Timestamp => "datetime".into(),
            ColumnType::TimestampTz => "datetimeoffset".into(),
            ColumnType::Json | ColumnType::Jsonb => "nvarchar(max)".into(),
            ColumnType::Uuid => "uniqueidentifier".into(),
            ColumnType::Binary => "varbinary(max)".into(),
            ColumnType::Enum(values) => format!(
                "nvarchar(255) check ({} in ({}))",
                QUOTE.ident(&column.name),
                values
                    .iter()
                    .map(|v| QUOTE.value(v))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }

    fn column_sql(column: &ColumnDefinition, with_default: bool) -> String {
        let mut sql = format!("{} {}", QUOTE.ident(&column.name), Self::type_sql(column));

        sql.push_str(if column.nullable { " null" } else { " not null" });

        if with_default {
            if let Some(default) = &column.default {
                sql.push_str(" default ");
                sql.push_str(&default_value(QUOTE, default, ("1", "0")));
            }
        }

        if column.auto_increment && column.column_type.is_integer() && !column.change {
            sql.push_str(" identity primary key");
        }

        sql
    }

    fn schema_filter(alias: &str, schema: &str) -> String {
        if schema.is_empty() {
            format!("{}.name = schema_name()", alias)
        } else {
            format!("{}.name = {}", alias, QUOTE.value(schema))
        }
    }
}

impl Grammar for SqlserverGrammar {
    fn compile(&self, blueprint: &Blueprint, command: &Command) -> Result<Vec<String>> {
        let prefix = blueprint.prefix();
        let raw_table = prefixed(prefix, blueprint.table());
        let table = QUOTE.wrap(&raw_table);

        let statements = match command {
            Command::Create => vec![format!(
                "create table {} ({})",
                table,
                blueprint
                    .columns()
                    .iter()
                    .map(|column| Self::column_sql(column, true))
                    .collect::<Vec<_>>()
                    .join(", ")
            )],
            Command::Drop => vec![format!("drop table {}", table)],
            Command::DropIfExists => vec![format!(
                "if object_id({}, 'U') is not null drop table {}",
                QUOTE.value(&table),
                table
            )],
            Command::Rename { to } => vec![format!(
                "sp_rename {}, {}",
                QUOTE.value(&raw_table),
                QUOTE.value(&prefixed(prefix, split_qualified(to).1))
            )],
            Command::Add(column) => vec![format!(
                "alter table {} add {}",
                table,
                Self::column_sql(column, true)
            )],
            Command::Change(column) => {
                let mut statements = vec![format!(
                    "alter table {} alter column {}",
                    table,
                    Self::column_sql(column, false)
                )];
                if let Some(default) = &column.default {
                    statements.push(format!(
                        "alter table {} add default {} for {}",
                        table,
                        default_value(QUOTE, default, ("1", "0")),
                        QUOTE.ident(&column.name)
                    ));
                }
                statements
            }
            Command::DropColumn { columns } => vec![format!(
                "alter table {} drop column {}",
                table,
                QUOTE.columns(columns)
            )],
            Command::RenameColumn { from, to } => vec![format!(
                "sp_rename {}, {}, 'COLUMN'",
                QUOTE.value(&format!("{}.{}", raw_table, from)),
                QUOTE.value(to)
            )],
            Command::Primary(index) => vec![format!(
                "alter table {} add constraint {} primary key ({})",
                table,
                QUOTE.ident(&index.name),
                QUOTE.columns(&index.columns)
            )],
            Command::Unique(index) => vec![format!(
                "create unique index {} on {} ({})",
                QUOTE.ident(&index.name),
                table,
                QUOTE.columns(&index.columns)
            )],
            Command::Index(index) => vec![format!(
                "create index {} on {} ({})",
                QUOTE.ident(&index.name),
                table,
                QUOTE.columns(&index.columns)
            )],
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
                vec![sql]
            }
            Command::DropPrimary { name, .. } | Command::DropForeign { name } => vec![format!(
                "alter table {} drop constraint {}",
                table,
                QUOTE.ident(name)
            )],
            Command::DropUnique { name } | Command::DropIndex { name } => {
                vec![format!("drop index {} on {}", QUOTE.ident(name), table)]
            }
            Command::RenameIndex { from, to } => vec![format!(
                "sp_rename {}, {}, 'INDEX'",
                QUOTE.value(&format!("{}.{}", raw_table, from)),
                QUOTE.value(to)
            )],
            // Table comments are extended properties; not emitted.
            Command::Comment(_) => Vec::new(),
        };

        Ok(statements)
    }

    fn compile_tables(&self, _database: &str) -> String {
        "select t.name as name, schema_name(t.schema_id) as [schema], \
         sum(u.total_pages) * 8 * 1024 as size \
         from sys.tables as t \
         join sys.partitions as p on p.object_id = t.object_id \
         join sys.allocation_units as u on u.container_id = p.hobt_id \
         group by t.name, t.schema_id \
         order by t.name"
            .to_string()
    }

    fn compile_views(&self, _database: &str) -> String {
        "select name, schema_name(v.schema_id) as [schema], definition \
         from sys.views as v \
         inner join sys.sql_modules as m on v.object_id = m.object_id \
         order by name"
            .to_string()
    }

    fn compile_columns(&self, schema: &str, table: &str) -> String {
        format!(
            "select col.name, type.name as type_name, col.max_length as length, \
             col.precision as precision, col.scale as scale, col.is_nullable as nullable, \
             def.definition as [default], col.is_identity as autoincrement, \
             col.collation_name as collation, cast(prop.value as nvarchar(max)) as comment \
             from sys.columns as col \
             join sys.types as type on col.user_type_id = type.user_type_id \
             join sys.objects as obj on col.object_id = obj.object_id \
             join sys.schemas as scm on obj.schema_id = scm.schema_id \
             left join sys.default_constraints def on col.default_object_id = def.object_id \
             and col.object_id = def.parent_object_id \
             left join sys.extended_properties as prop on obj.object_id = prop.major_id \
             and col.column_id = prop.minor_id and prop.name = 'MS_Description' \
             where obj.type in ('U', 'V') and obj.name = {} and {} \
             order by col.column_id",
            QUOTE.value(table),
            Self::schema_filter("scm", schema)
        )
    }

    fn compile_indexes(&self, schema: &str, table: &str) -> String {
        format!(
            "select idx.name as name, \
             string_agg(col.name, ',') within group (order by idxcol.key_ordinal) as columns, \
             idx.type_desc as [type], idx.is_unique as [unique], idx.is_primary_key as [primary] \
             from sys.indexes as idx \
             join sys.tables as tbl on idx.object_id = tbl.object_id \
             join sys.schemas as scm on tbl.schema_id = scm.schema_id \
             join sys.index_columns as idxcol on idx.object_id = idxcol.object_id \
             and idx.index_id = idxcol.index_id \
             join sys.columns as col on idxcol.object_id = col.object_id \
             and idxcol.column_id = col.column_id \
             where tbl.name = {} and {} \
             group by idx.name, idx.type_desc, idx.is_unique, idx.is_primary_key",
            QUOTE.value(table),
            Self::schema_filter("scm", schema)
        )
    }

    fn compile_foreign_keys(&self, schema: &str, table: &str) -> String {
        format!(
            "select fk.name as name, \
             string_agg(lc.name, ',') within group (order by fkc.constraint_column_id) as columns, \
             fs.name as foreign_schema, ft.name as foreign_table, \
             string_agg(fc.name, ',') within group (order by fkc.constraint_column_id) as foreign_columns, \
             fk.update_referential_action_desc as on_update, \
             fk.delete_referential_action_desc as on_delete \
             from sys.foreign_keys as fk \
             join sys.foreign_key_columns as fkc on fkc.constraint_object_id = fk.object_id \
             join sys.tables as lt on lt.object_id = fk.parent_object_id \
             join sys.schemas as ls on lt.schema_id = ls.schema_id \
             join sys.columns as lc on fkc.parent_object_id = lc.object_id \
             and fkc.parent_column_id = lc.column_id \
             join sys.tables as ft on ft.object_id = fk.referenced_object_id \
             join sys.schemas as fs on ft.schema_id = fs.schema_id \
             join sys.columns as fc on fkc.referenced_object_id = fc.object_id \
             and fkc.referenced_column_id = fc.column_id \
             where lt.name = {} and {} \
             group by fk.name, fs.name, ft.name, \
             fk.update_referential_action_desc, fk.delete_referential_action_desc",
            QUOTE.value(table),
            Self::schema_filter("ls", schema)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_create() {
        let mut blueprint = Blueprint::new("users", "");
        blueprint.create();
        blueprint.id();
        blueprint.string("email", 255);
        blueprint.boolean("active").default(true);
        blueprint.comment("registered users");

        let sql = blueprint.to_sql(&SqlserverGrammar).unwrap();
        assert_eq!(
            sql,
            vec![
                "create table [users] ([id] bigint not null identity primary key, \
                 [email] nvarchar(255) not null, [active] bit not null default 1)"
            ]
        );
    }

    #[test]
    fn test_compile_renames_use_sp_rename() {
        let mut blueprint = Blueprint::new("users", "app_");
        blueprint.rename_column("name", "full_name");
        blueprint.rename_index("users_a_index", "users_b_index");
        let sql = blueprint.to_sql(&SqlserverGrammar).unwrap();
        assert_eq!(
            sql,
            vec![
                "sp_rename 'app_users.name', 'full_name', 'COLUMN'",
                "sp_rename 'app_users.users_a_index', 'users_b_index', 'INDEX'",
            ]
        );

        let mut blueprint = Blueprint::new("users", "app_");
        blueprint.rename("members");
        assert_eq!(
            blueprint.to_sql(&SqlserverGrammar).unwrap(),
            vec!["sp_rename 'app_users', 'app_members'"]
        );
    }

    #[test]
    fn test_compile_drops() {
        let mut blueprint = Blueprint::new("users", "");
        blueprint.drop_if_exists();
        assert_eq!(
            blueprint.to_sql(&SqlserverGrammar).unwrap(),
            vec!["if object_id('[users]', 'U') is not null drop table [users]"]
        );

        let mut blueprint = Blueprint::new("users", "");
        blueprint.drop_column(&["a", "b"]);
        blueprint.drop_unique(&["email"]);
        assert_eq!(
            blueprint.to_sql(&SqlserverGrammar).unwrap(),
            vec![
                "alter table [users] drop column [a], [b]",
                "drop index [users_email_unique] on [users]",
            ]
        );
    }

    #[test]
    fn test_schema_filter_defaults_to_session_schema() {
        let grammar = SqlserverGrammar::new();
        assert!(grammar.compile_columns("", "users").contains("scm.name = schema_name()"));
        assert!(grammar.compile_indexes("sales", "orders").contains("scm.name = 'sales'"));
        assert!(
            grammar
                .compile_foreign_keys("", "orders")
                .contains("lt.name = 'orders' and ls.name = schema_name()")
        );
    }
}
