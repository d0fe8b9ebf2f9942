//! Schema metadata model and dialect plugin traits.
//!
//! This module defines:
//! - The normalized metadata returned by introspection (`Table`, `View`,
//!   `Column`, `Index`, `ForeignKey`, `Type`)
//! - The raw catalog rows (`DBTable`, `DBColumn`, ...) that a dialect's
//!   `Processor` normalizes
//! - The three dialect contracts: `Grammar` (SQL compiler), `Processor`
//!   (row normalizer) and `DriverSchema` (introspection façade)
//! - `Migration`, which the facade stores but never runs

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::row::{FromRow, Row};
use crate::blueprint::{Blueprint, Command};
use crate::error::SchemaError;
use crate::schema::Schema;

/// Information about a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name, including the configured prefix
    pub name: String,
    /// Schema/namespace name (empty where the engine has none)
    pub schema: String,
    /// Size on disk in bytes, where the engine reports it
    #[serde(default)]
    pub size: Option<i64>,
    /// Optional description/comment
    #[serde(default)]
    pub comment: Option<String>,
}

/// Information about a view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub name: String,
    pub schema: String,
    /// The view's SELECT definition as stored by the engine
    pub definition: String,
}

/// Detailed information about a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Base type name (`varchar`, `int4`, ...)
    pub type_name: String,
    /// Full type including length/precision (`varchar(255)`)
    pub full_type: String,
    pub collation: Option<String>,
    pub comment: Option<String>,
    /// Default value expression
    pub default: Option<String>,
    /// Whether NULL values are allowed
    pub nullable: bool,
    /// Whether the column is auto-incrementing (serial, identity, auto_increment)
    pub autoincrement: bool,
}

/// Information about an index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Index name
    pub name: String,
    /// Columns included in the index, in key order
    pub columns: Vec<String>,
    /// Index type (btree, hash, clustered, ...); empty where unknown
    pub index_type: String,
    /// Whether this is the primary key index
    pub primary: bool,
    /// Whether the index enforces uniqueness
    pub unique: bool,
}

/// Information about a foreign key relationship
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Constraint name (empty where the engine does not name them)
    pub name: String,
    /// Columns in the source table
    pub columns: Vec<String>,
    /// Schema of the referenced table
    pub foreign_schema: String,
    /// Name of the referenced table
    pub foreign_table: String,
    /// Columns in the referenced table
    pub foreign_columns: Vec<String>,
    /// Lower-case action: `cascade`, `set null`, `set default`, `restrict`, `no action`
    pub on_update: String,
    pub on_delete: String,
}

/// A user-defined type (postgres enums, domains, composites, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Type {
    pub name: String,
    pub schema: String,
    /// Kind of type: `base`, `composite`, `domain`, `enum`, `pseudo`, `range`, `multirange`
    pub kind: String,
    /// Category: `array`, `boolean`, `enum`, `string`, `user_defined`, ...
    pub category: String,
    /// Whether the engine created the type implicitly (array/multirange companions)
    pub implicit: bool,
}

/// Raw table row as returned by `Grammar::compile_tables`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DBTable {
    pub name: String,
    pub schema: String,
    pub size: Option<i64>,
    pub comment: Option<String>,
}

impl FromRow for DBTable {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            name: row.get_string("name")?,
            schema: row.get_string_or_default("schema"),
            size: row.get_i64("size"),
            comment: row.get_opt_string("comment").filter(|s| !s.is_empty()),
        })
    }
}

/// Raw view row as returned by `Grammar::compile_views`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DBView {
    pub name: String,
    pub schema: String,
    pub definition: String,
}

impl FromRow for DBView {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            name: row.get_string("name")?,
            schema: row.get_string_or_default("schema"),
            definition: row.get_string_or_default("definition"),
        })
    }
}

/// Raw column row as returned by `Grammar::compile_columns`.
///
/// Fields a dialect's query does not select stay at their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DBColumn {
    pub name: String,
    pub type_name: String,
    /// Full type where the catalog provides one
    pub full_type: String,
    pub collation: Option<String>,
    pub comment: Option<String>,
    pub default: Option<String>,
    pub nullable: bool,
    pub autoincrement: bool,
    pub primary: bool,
    /// Free-form extra info (mysql `extra`)
    pub extra: String,
    /// Declared length/precision/scale (sqlserver)
    pub length: Option<i64>,
    pub precision: Option<i64>,
    pub scale: Option<i64>,
}

impl FromRow for DBColumn {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            name: row.get_string("name")?,
            type_name: row.get_string_or_default("type_name"),
            full_type: row.get_string_or_default("type"),
            collation: row.get_opt_string("collation"),
            comment: row.get_opt_string("comment").filter(|s| !s.is_empty()),
            default: row.get_opt_string("default"),
            nullable: row.get_bool("nullable"),
            autoincrement: row.get_bool("autoincrement"),
            primary: row.get_bool("primary"),
            extra: row.get_string_or_default("extra"),
            length: row.get_i64("length"),
            precision: row.get_i64("precision"),
            scale: row.get_i64("scale"),
        })
    }
}

/// Raw index row; `columns` is a comma-separated list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DBIndex {
    pub name: String,
    pub columns: String,
    pub index_type: String,
    pub primary: bool,
    pub unique: bool,
}

impl FromRow for DBIndex {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            name: row.get_string("name")?,
            columns: row.get_string_or_default("columns"),
            index_type: row.get_string_or_default("type"),
            primary: row.get_bool("primary"),
            unique: row.get_bool("unique"),
        })
    }
}

/// Raw foreign-key row; column lists are comma-separated and the actions
/// use the engine's own spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DBForeignKey {
    pub name: String,
    pub columns: String,
    pub foreign_schema: String,
    pub foreign_table: String,
    pub foreign_columns: String,
    pub on_update: String,
    pub on_delete: String,
}

impl FromRow for DBForeignKey {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            name: row.get_string_or_default("name"),
            columns: row.get_string_or_default("columns"),
            foreign_schema: row.get_string_or_default("foreign_schema"),
            foreign_table: row.get_string("foreign_table")?,
            foreign_columns: row.get_string_or_default("foreign_columns"),
            on_update: row.get_string_or_default("on_update"),
            on_delete: row.get_string_or_default("on_delete"),
        })
    }
}

/// Raw type row (postgres `pg_type`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DBType {
    pub name: String,
    pub schema: String,
    pub kind: String,
    pub category: String,
    pub implicit: bool,
}

impl FromRow for DBType {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            name: row.get_string("name")?,
            schema: row.get_string_or_default("schema"),
            kind: row.get_string_or_default("type"),
            category: row.get_string_or_default("category"),
            implicit: row.get_bool("implicit"),
        })
    }
}

/// Dialect-specific SQL compiler.
///
/// Compiles blueprint commands into DDL and produces the catalog queries the
/// introspection layer runs. Identifiers are quoted and table names are
/// expected to already carry the configured prefix.
pub trait Grammar: Send + Sync {
    /// Compile one blueprint command into zero or more statements.
    ///
    /// An empty vector means the command needs no statement of its own
    /// (for example, a sqlite foreign key folded into `create table`).
    fn compile(&self, blueprint: &Blueprint, command: &Command) -> Result<Vec<String>>;

    /// Query listing the tables of `database` (ignored where the catalog is implicit).
    fn compile_tables(&self, database: &str) -> String;

    /// Query listing the views of `database`.
    fn compile_views(&self, database: &str) -> String;

    /// Query listing user-defined types, if the engine has them.
    fn compile_types(&self) -> Option<String> {
        None
    }

    /// Query listing the columns of `schema.table`.
    fn compile_columns(&self, schema: &str, table: &str) -> String;

    /// Query listing the indexes of `schema.table`.
    fn compile_indexes(&self, schema: &str, table: &str) -> String;

    /// Query listing the foreign keys of `schema.table`.
    fn compile_foreign_keys(&self, schema: &str, table: &str) -> String;
}

/// Dialect-specific normalizer from raw catalog rows to the common model.
pub trait Processor: Send + Sync {
    fn process_columns(&self, columns: Vec<DBColumn>) -> Vec<Column>;

    fn process_indexes(&self, indexes: Vec<DBIndex>) -> Vec<Index>;

    fn process_foreign_keys(&self, foreign_keys: Vec<DBForeignKey>) -> Vec<ForeignKey>;

    fn process_tables(&self, tables: Vec<DBTable>) -> Vec<Table> {
        tables
            .into_iter()
            .map(|t| Table {
                name: t.name,
                schema: t.schema,
                size: t.size,
                comment: t.comment,
            })
            .collect()
    }

    fn process_views(&self, views: Vec<DBView>) -> Vec<View> {
        views
            .into_iter()
            .map(|v| View {
                name: v.name,
                schema: v.schema,
                definition: v.definition,
            })
            .collect()
    }

    fn process_types(&self, types: Vec<DBType>) -> Vec<Type> {
        types
            .into_iter()
            .map(|t| Type {
                name: t.name,
                schema: t.schema,
                kind: t.kind,
                category: t.category,
                implicit: t.implicit,
            })
            .collect()
    }
}

/// Introspection shared by every dialect: tables and views.
#[async_trait]
pub trait CommonSchema: Send + Sync {
    /// Get all tables of the connection's database/schema search space.
    async fn get_tables(&self) -> Result<Vec<Table>>;

    /// Get all views.
    async fn get_views(&self) -> Result<Vec<View>>;
}

/// Dialect-specific introspection façade.
///
/// Table names are passed unprefixed; implementations apply the prefix.
#[async_trait]
pub trait DriverSchema: Send + Sync {
    /// Get columns for a specific table.
    async fn get_columns(&self, table: &str) -> Result<Vec<Column>>;

    /// Get indexes for a table.
    async fn get_indexes(&self, table: &str) -> Result<Vec<Index>>;

    /// Get user-defined types. Engines without them return an empty list.
    async fn get_types(&self) -> Result<Vec<Type>>;
}

/// A unit of schema change registered with the facade.
///
/// The facade only stores migrations; running them is up to the caller.
#[async_trait]
pub trait Migration: Send + Sync {
    /// Unique, ordered name of the migration (e.g. `20240101000000_create_users_table`)
    fn signature(&self) -> &str;

    async fn up(&self, schema: &Schema) -> std::result::Result<(), SchemaError>;

    async fn down(&self, schema: &Schema) -> std::result::Result<(), SchemaError>;
}
