//! Commands accumulated by a `Blueprint` and compiled by a `Grammar`.

use serde::{Deserialize, Serialize};

use super::column::ColumnDefinition;

/// Kind of an index-like command, also the suffix of generated index names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexKind {
    Primary,
    Unique,
    Index,
    Foreign,
}

impl IndexKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Unique => "unique",
            Self::Index => "index",
            Self::Foreign => "foreign",
        }
    }
}

/// A primary key, unique constraint or plain index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub kind: IndexKind,
    pub name: String,
    pub columns: Vec<String>,
    /// Index method where the engine supports one (`btree`, `hash`, `gin`, ...)
    pub algorithm: Option<String>,
}

impl IndexDefinition {
    /// Override the generated index name.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn algorithm(&mut self, algorithm: impl Into<String>) -> &mut Self {
        self.algorithm = Some(algorithm.into());
        self
    }
}

/// A foreign key constraint under construction.
///
/// ```ignore
/// table.foreign(&["user_id"]).references(&["id"]).on("users").cascade_on_delete();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyDefinition {
    pub name: String,
    pub columns: Vec<String>,
    /// Referenced table, unprefixed
    pub on: String,
    pub references: Vec<String>,
    pub on_delete: Option<String>,
    pub on_update: Option<String>,
}

impl ForeignKeyDefinition {
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn references(&mut self, columns: &[&str]) -> &mut Self {
        self.references = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn on(&mut self, table: impl Into<String>) -> &mut Self {
        self.on = table.into();
        self
    }

    pub fn on_delete(&mut self, action: impl Into<String>) -> &mut Self {
        self.on_delete = Some(action.into());
        self
    }

    pub fn on_update(&mut self, action: impl Into<String>) -> &mut Self {
        self.on_update = Some(action.into());
        self
    }

    pub fn cascade_on_delete(&mut self) -> &mut Self {
        self.on_delete("cascade")
    }

    pub fn cascade_on_update(&mut self) -> &mut Self {
        self.on_update("cascade")
    }

    pub fn null_on_delete(&mut self) -> &mut Self {
        self.on_delete("set null")
    }

    pub fn restrict_on_delete(&mut self) -> &mut Self {
        self.on_delete("restrict")
    }

    pub fn no_action_on_delete(&mut self) -> &mut Self {
        self.on_delete("no action")
    }
}

/// One unit of work for a grammar to compile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Create the table with every column of the blueprint
    Create,
    Drop,
    DropIfExists,
    /// Rename the table (target is unprefixed)
    Rename { to: String },
    /// Add a column to an existing table
    Add(ColumnDefinition),
    /// Modify an existing column
    Change(ColumnDefinition),
    DropColumn { columns: Vec<String> },
    RenameColumn { from: String, to: String },
    Primary(IndexDefinition),
    Unique(IndexDefinition),
    Index(IndexDefinition),
    Foreign(ForeignKeyDefinition),
    DropPrimary { name: String, columns: Vec<String> },
    DropUnique { name: String },
    DropIndex { name: String },
    DropForeign { name: String },
    RenameIndex { from: String, to: String },
    /// Table comment
    Comment(String),
}

impl Command {
    /// Short name used in logs and unsupported-command errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Drop => "drop",
            Self::DropIfExists => "dropIfExists",
            Self::Rename { .. } => "rename",
            Self::Add(_) => "add",
            Self::Change(_) => "change",
            Self::DropColumn { .. } => "dropColumn",
            Self::RenameColumn { .. } => "renameColumn",
            Self::Primary(_) => "primary",
            Self::Unique(_) => "unique",
            Self::Index(_) => "index",
            Self::Foreign(_) => "foreign",
            Self::DropPrimary { .. } => "dropPrimary",
            Self::DropUnique { .. } => "dropUnique",
            Self::DropIndex { .. } => "dropIndex",
            Self::DropForeign { .. } => "dropForeign",
            Self::RenameIndex { .. } => "renameIndex",
            Self::Comment(_) => "comment",
        }
    }
}
