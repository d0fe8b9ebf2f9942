//! Database driver identifiers.

use serde::{Deserialize, Serialize};

/// Built-in database drivers.
///
/// The dialect registry is keyed by driver name, so additional dialects can
/// be registered under names that have no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    Postgres,
    Mysql,
    Sqlserver,
    Sqlite,
}

impl Driver {
    /// Get the display name for this driver
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Postgres => "PostgreSQL",
            Self::Mysql => "MySQL",
            Self::Sqlserver => "SQL Server",
            Self::Sqlite => "SQLite",
        }
    }

    /// Canonical name used in configuration and the dialect registry
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
            Self::Sqlserver => "sqlserver",
            Self::Sqlite => "sqlite",
        }
    }

    /// Get the default port for server-based databases
    pub fn default_port(&self) -> Option<u16> {
        match self {
            Self::Postgres => Some(5432),
            Self::Mysql => Some(3306),
            Self::Sqlserver => Some(1433),
            Self::Sqlite => None,
        }
    }

    /// Parse from a configuration string (accepts common aliases)
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            "mysql" | "mariadb" => Some(Self::Mysql),
            "sqlserver" | "mssql" | "sql_server" => Some(Self::Sqlserver),
            "sqlite" | "sqlite3" => Some(Self::Sqlite),
            _ => None,
        }
    }
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
