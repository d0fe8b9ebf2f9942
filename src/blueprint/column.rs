//! Column definitions accumulated by a `Blueprint`.

use serde::{Deserialize, Serialize};

/// Abstract column type, mapped onto a concrete type by each grammar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnType {
    TinyInteger,
    SmallInteger,
    Integer,
    BigInteger,
    /// Variable-length string with a maximum length
    String(u32),
    /// Fixed-length string
    Char(u32),
    Text,
    MediumText,
    LongText,
    Boolean,
    Decimal { precision: u32, scale: u32 },
    Double,
    Float,
    Date,
    Time,
    DateTime,
    Timestamp,
    TimestampTz,
    Json,
    Jsonb,
    Uuid,
    Binary,
    /// String restricted to a fixed set of values
    Enum(Vec<String>),
}

impl ColumnType {
    /// Whether the type is one of the integer types.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::TinyInteger | Self::SmallInteger | Self::Integer | Self::BigInteger
        )
    }
}

/// A column default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnDefault {
    /// Raw SQL expression emitted as-is (`CURRENT_TIMESTAMP`)
    Expression(String),
    /// String literal, quoted by the grammar
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ColumnDefault {
    /// A raw SQL expression default.
    pub fn expression(sql: impl Into<String>) -> Self {
        Self::Expression(sql.into())
    }
}

impl From<&str> for ColumnDefault {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ColumnDefault {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ColumnDefault {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ColumnDefault {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for ColumnDefault {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ColumnDefault {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A column to add (or change) along with its modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub default: Option<ColumnDefault>,
    pub unsigned: bool,
    pub auto_increment: bool,
    /// Fluent `primary()`: compiled to a separate primary-key command
    pub primary: bool,
    /// Fluent `unique()`: compiled to a separate unique-index command
    pub unique: bool,
    /// Fluent `index()`: compiled to a separate index command
    pub index: bool,
    pub comment: Option<String>,
    /// Modify an existing column instead of adding a new one
    pub change: bool,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            default: None,
            unsigned: false,
            auto_increment: false,
            primary: false,
            unique: false,
            index: false,
            comment: None,
            change: false,
        }
    }

    pub fn nullable(&mut self) -> &mut Self {
        self.nullable = true;
        self
    }

    pub fn default(&mut self, value: impl Into<ColumnDefault>) -> &mut Self {
        self.default = Some(value.into());
        self
    }

    pub fn unsigned(&mut self) -> &mut Self {
        self.unsigned = true;
        self
    }

    pub fn auto_increment(&mut self) -> &mut Self {
        self.auto_increment = true;
        self
    }

    pub fn primary(&mut self) -> &mut Self {
        self.primary = true;
        self
    }

    pub fn unique(&mut self) -> &mut Self {
        self.unique = true;
        self
    }

    pub fn index(&mut self) -> &mut Self {
        self.index = true;
        self
    }

    pub fn comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.comment = Some(comment.into());
        self
    }

    /// Mark the column as a modification of an existing column.
    pub fn change(&mut self) -> &mut Self {
        self.change = true;
        self
    }
}
