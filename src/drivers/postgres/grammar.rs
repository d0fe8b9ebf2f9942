//! PostgreSQL SQL compiler.

use anyhow::Result;

use crate::blueprint::{Blueprint, ColumnDefinition, ColumnType, Command, IndexDefinition};
use crate::grammars::{Quoter, default_value, prefixed, split_qualified};
use crate::traits::Grammar;

const QUOTE: Quoter = Quoter::DoubleQuote;

/// Compiles blueprints and catalog queries for PostgreSQL.
#[derive(Debug, Clone, Default)]
pub struct PostgresGrammar;

impl PostgresGrammar {
    pub fn new() -> Self {
        Self
    }

    fn type_sql(column: &ColumnDefinition, allow_serial: bool) -> String {
        let serial = allow_serial && column.auto_increment;
        match &column.column_type {
            ColumnType::TinyInteger | ColumnType::SmallInteger if serial => "smallserial".into(),
            ColumnType::TinyInteger | ColumnType::SmallInteger => "smallint".into(),
            ColumnType::Integer if serial => "serial".into(),
            ColumnType::Integer => "integer".into(),
            ColumnType::BigInteger if serial => "bigserial".into(),
            ColumnType::BigInteger => "bigint".into(),
            ColumnType::String(length) => format!("varchar({})", length),
            ColumnType::Char(length) => format!("char({})", length),
            ColumnType::Text | ColumnType::MediumText | ColumnType::LongText => "text".into(),
            ColumnType::Boolean => "boolean".into(),
            ColumnType::Decimal { precision, scale } => format!("decimal({}, {})", precision, scale),
            ColumnType::Double => "double precision".into(),
            ColumnType::Float => "real".into(),
            ColumnType::Date => "date".into(),
            ColumnType::Time => "time(0) without time zone".into(),
            ColumnType::DateTime | ColumnType::Timestamp => "timestamp(0) without time zone".into(),
            ColumnType::TimestampTz => "timestamp(0) with time zone".into(),
            ColumnType::Json => "json".into(),
            ColumnType::Jsonb => "jsonb".into(),
            ColumnType::Uuid => "uuid".into(),
            ColumnType::Binary => "bytea".into(),
            ColumnType::Enum(values) => format!(
                "varchar(255) check ({} in ({}))",
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
        let mut sql = format!(
            "{} {}",
            QUOTE.ident(&column.name),
            Self::type_sql(column, true)
        );

        sql.push_str(if column.nullable { " null" } else { " not null" });

        if let Some(default) = &column.default {
            sql.push_str(" default ");
            sql.push_str(&default_value(QUOTE, default, ("true", "false")));
        }

        if column.auto_increment && column.column_type.is_integer() {
            sql.push_str(" primary key");
        }

        sql
    }

    fn column_comment(table: &str, column: &ColumnDefinition) -> Option<String> {
        column.comment.as_ref().map(|comment| {
            format!(
                "comment on column {}.{} is {}",
                table,
                QUOTE.ident(&column.name),
                QUOTE.value(comment)
            )
        })
    }

    fn compile_change(table: &str, column: &ColumnDefinition) -> Vec<String> {
        let name = QUOTE.ident(&column.name);
        let type_sql = Self::type_sql(column, false);

        let mut clauses = vec![format!(
            "alter column {} type {} using {}::{}",
            name, type_sql, name, type_sql
        )];
        clauses.push(if column.nullable {
            format!("alter column {} drop not null", name)
        } else {
            format!("alter column {} set not null", name)
        });
        clauses.push(match &column.default {
            Some(default) => format!(
                "alter column {} set default {}",
                name,
                default_value(QUOTE, default, ("true", "false"))
            ),
            None => format!("alter column {} drop default", name),
        });

        let mut statements = vec![format!("alter table {} {}", table, clauses.join(", "))];
        statements.extend(Self::column_comment(table, column));
        statements
    }

    fn compile_index(table: &str, index: &IndexDefinition) -> String {
        let using = index
            .algorithm
            .as_ref()
            .map(|algorithm| format!(" using {}", algorithm))
            .unwrap_or_default();
        format!(
            "create index {} on {}{} ({})",
            QUOTE.ident(&index.name),
            table,
            using,
            QUOTE.columns(&index.columns)
        )
    }
}

impl Grammar for PostgresGrammar {
    fn compile(&self, blueprint: &Blueprint, command: &Command) -> Result<Vec<String>> {
        let prefix = blueprint.prefix();
        let table = QUOTE.table(prefix, blueprint.table());

        let statements = match command {
            Command::Create => {
                let columns = blueprint
                    .columns()
                    .iter()
                    .map(Self::column_sql)
                    .collect::<Vec<_>>()
                    .join(", ");
                let mut statements = vec![format!("create table {} ({})", table, columns)];
                statements.extend(
                    blueprint
                        .columns()
                        .iter()
                        .filter_map(|column| Self::column_comment(&table, column)),
                );
                statements
            }
            Command::Drop => vec![format!("drop table {}", table)],
            Command::DropIfExists => vec![format!("drop table if exists {}", table)],
            Command::Rename { to } => vec![format!(
                "alter table {} rename to {}",
                table,
                QUOTE.ident(&prefixed(prefix, split_qualified(to).1))
            )],
            Command::Add(column) => {
                let mut statements = vec![format!(
                    "alter table {} add column {}",
                    table,
                    Self::column_sql(column)
                )];
                statements.extend(Self::column_comment(&table, column));
                statements
            }
            Command::Change(column) => Self::compile_change(&table, column),
            Command::DropColumn { columns } => vec![format!(
                "alter table {} {}",
                table,
                columns
                    .iter()
                    .map(|column| format!("drop column {}", QUOTE.ident(column)))
                    .collect::<Vec<_>>()
                    .join(", ")
            )],
            Command::RenameColumn { from, to } => vec![format!(
                "alter table {} rename column {} to {}",
                table,
                QUOTE.ident(from),
                QUOTE.ident(to)
            )],
            Command::Primary(index) => vec![format!(
                "alter table {} add primary key ({})",
                table,
                QUOTE.columns(&index.columns)
            )],
            Command::Unique(index) => vec![format!(
                "alter table {} add constraint {} unique ({})",
                table,
                QUOTE.ident(&index.name),
                QUOTE.columns(&index.columns)
            )],
            Command::Index(index) => vec![Self::compile_index(&table, index)],
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
            Command::DropPrimary { .. } => {
                let name = format!("{}_pkey", prefixed(prefix, split_qualified(blueprint.table()).1));
                vec![format!(
                    "alter table {} drop constraint {}",
                    table,
                    QUOTE.ident(&name)
                )]
            }
            Command::DropUnique { name } | Command::DropForeign { name } => vec![format!(
                "alter table {} drop constraint {}",
                table,
                QUOTE.ident(name)
            )],
            Command::DropIndex { name } => vec![format!("drop index {}", QUOTE.ident(name))],
            Command::RenameIndex { from, to } => vec![format!(
                "alter index {} rename to {}",
                QUOTE.ident(from),
                QUOTE.ident(to)
            )],
            Command::Comment(comment) => vec![format!(
                "comment on table {} is {}",
                table,
                QUOTE.value(comment)
            )],
        };

        Ok(statements)
    }

    fn compile_tables(&self, _database: &str) -> String {
        "select c.relname as name, n.nspname as schema, \
         pg_total_relation_size(c.oid) as size, \
         obj_description(c.oid, 'pg_class') as comment \
         from pg_class c, pg_namespace n \
         where c.relkind in ('r', 'p') and n.oid = c.relnamespace \
         and n.nspname not in ('pg_catalog', 'information_schema') \
         order by c.relname"
            .to_string()
    }

    fn compile_views(&self, _database: &str) -> String {
        "select viewname as name, schemaname as schema, definition \
         from pg_views \
         where schemaname not in ('pg_catalog', 'information_schema') \
         order by viewname"
            .to_string()
    }

    fn compile_types(&self) -> Option<String> {
        Some(
            "select t.typname as name, n.nspname as schema, t.typtype::text as type, \
             t.typcategory::text as category, \
             ((t.typinput = 'array_in'::regproc and t.typoutput = 'array_out'::regproc) \
             or t.typtype = 'm') as implicit \
             from pg_type t \
             join pg_namespace n on n.oid = t.typnamespace \
             left join pg_class c on c.oid = t.typrelid \
             left join pg_type el on el.oid = t.typelem \
             left join pg_class ce on ce.oid = el.typrelid \
             where ((t.typrelid = 0 and (ce.relkind = 'c' or ce.relkind is null)) or c.relkind = 'c') \
             and not exists (select 1 from pg_depend d where d.objid in (t.oid, t.typelem) and d.deptype = 'e') \
             and n.nspname not in ('pg_catalog', 'information_schema')"
                .to_string(),
        )
    }

    fn compile_columns(&self, schema: &str, table: &str) -> String {
        format!(
            "select a.attname as name, t.typname as type_name, \
             format_type(a.atttypid, a.atttypmod) as type, \
             (select tc.collcollate from pg_catalog.pg_collation tc where tc.oid = a.attcollation) as \"collation\", \
             not a.attnotnull as nullable, \
             (select pg_get_expr(adbin, adrelid) from pg_attrdef \
             where c.oid = pg_attrdef.adrelid and pg_attrdef.adnum = a.attnum) as \"default\", \
             col_description(c.oid, a.attnum) as comment \
             from pg_attribute a, pg_class c, pg_type t, pg_namespace n \
             where c.relname = {} and n.nspname = {} and a.attnum > 0 and not a.attisdropped \
             and a.attrelid = c.oid and a.atttypid = t.oid and n.oid = c.relnamespace \
             order by a.attnum",
            QUOTE.value(table),
            QUOTE.value(schema)
        )
    }

    fn compile_indexes(&self, schema: &str, table: &str) -> String {
        format!(
            "select ic.relname as name, string_agg(a.attname, ',' order by indseq.ord) as columns, \
             am.amname as \"type\", i.indisunique as \"unique\", i.indisprimary as \"primary\" \
             from pg_index i \
             join pg_class tc on tc.oid = i.indrelid \
             join pg_namespace tn on tn.oid = tc.relnamespace \
             join pg_class ic on ic.oid = i.indexrelid \
             join pg_am am on am.oid = ic.relam \
             join lateral unnest(i.indkey) with ordinality as indseq(num, ord) on true \
             left join pg_attribute a on a.attrelid = i.indrelid and a.attnum = indseq.num \
             where tc.relname = {} and tn.nspname = {} \
             group by ic.relname, am.amname, i.indisunique, i.indisprimary",
            QUOTE.value(table),
            QUOTE.value(schema)
        )
    }

    fn compile_foreign_keys(&self, schema: &str, table: &str) -> String {
        format!(
            "select c.conname as name, \
             string_agg(la.attname, ',' order by conseq.ord) as columns, \
             fn.nspname as foreign_schema, fc.relname as foreign_table, \
             string_agg(fa.attname, ',' order by conseq.ord) as foreign_columns, \
             c.confupdtype::text as on_update, c.confdeltype::text as on_delete \
             from pg_constraint c \
             join pg_class tc on c.conrelid = tc.oid \
             join pg_namespace tn on tn.oid = tc.relnamespace \
             join pg_class fc on c.confrelid = fc.oid \
             join pg_namespace fn on fn.oid = fc.relnamespace \
             join lateral unnest(c.conkey) with ordinality as conseq(num, ord) on true \
             join pg_attribute la on la.attrelid = c.conrelid and la.attnum = conseq.num \
             join pg_attribute fa on fa.attrelid = c.confrelid and fa.attnum = c.confkey[conseq.ord] \
             where c.contype = 'f' and tc.relname = {} and tn.nspname = {} \
             group by c.conname, fn.nspname, fc.relname, c.confupdtype, c.confdeltype",
            QUOTE.value(table),
            QUOTE.value(schema)
        )
    }
}
