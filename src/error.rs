//! Error types for schema operations.

use thiserror::Error;

/// Boxed cause carried by the operation-failure variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for the schema facade.
///
/// Introspection calls return the query engine's error untouched
/// (`anyhow::Error`); only construction and mutating operations use this type.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The configured driver has no registered dialect
    #[error("schema does not support driver: {0}")]
    DriverNotSupported(String),

    /// Connection settings could not be resolved
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("failed to create table {table}: {source}")]
    FailedToCreateTable {
        table: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to drop table {table}: {source}")]
    FailedToDropTable {
        table: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to drop columns of table {table}: {source}")]
    FailedToDropColumns {
        table: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to rename table {table}: {source}")]
    FailedToRenameTable {
        table: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to change table {table}: {source}")]
    FailedToChangeTable {
        table: String,
        #[source]
        source: BoxError,
    },

    /// Table listing failed; only ever logged by the `has_*` predicates
    #[error("failed to get tables of connection {connection}: {source}")]
    FailedToGetTables {
        connection: String,
        #[source]
        source: BoxError,
    },
}

impl SchemaError {
    pub fn create_table(table: impl Into<String>, source: anyhow::Error) -> Self {
        SchemaError::FailedToCreateTable {
            table: table.into(),
            source: source.into(),
        }
    }

    pub fn drop_table(table: impl Into<String>, source: anyhow::Error) -> Self {
        SchemaError::FailedToDropTable {
            table: table.into(),
            source: source.into(),
        }
    }

    pub fn drop_columns(table: impl Into<String>, source: anyhow::Error) -> Self {
        SchemaError::FailedToDropColumns {
            table: table.into(),
            source: source.into(),
        }
    }

    pub fn rename_table(table: impl Into<String>, source: anyhow::Error) -> Self {
        SchemaError::FailedToRenameTable {
            table: table.into(),
            source: source.into(),
        }
    }

    pub fn change_table(table: impl Into<String>, source: anyhow::Error) -> Self {
        SchemaError::FailedToChangeTable {
            table: table.into(),
            source: source.into(),
        }
    }

    pub fn get_tables(connection: impl Into<String>, source: anyhow::Error) -> Self {
        SchemaError::FailedToGetTables {
            connection: connection.into(),
            source: source.into(),
        }
    }

    /// Name of the table an operation failure refers to, if any.
    pub fn table(&self) -> Option<&str> {
        match self {
            SchemaError::FailedToCreateTable { table, .. }
            | SchemaError::FailedToDropTable { table, .. }
            | SchemaError::FailedToDropColumns { table, .. }
            | SchemaError::FailedToRenameTable { table, .. }
            | SchemaError::FailedToChangeTable { table, .. } => Some(table),
            _ => None,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_error_names_table() {
        let err = SchemaError::create_table("users", anyhow::anyhow!("syntax error"));
        assert_eq!(err.table(), Some("users"));
        assert_eq!(err.to_string(), "failed to create table users: syntax error");
    }

    #[test]
    fn test_format_detailed_includes_cause() {
        let err = SchemaError::drop_table("posts", anyhow::anyhow!("no such table: posts"));
        let detailed = err.format_detailed();
        assert!(detailed.contains("failed to drop table posts"));
        assert!(detailed.contains("Caused by:"));
        assert!(detailed.contains("no such table: posts"));
    }

    #[test]
    fn test_driver_not_supported_has_no_table() {
        let err = SchemaError::DriverNotSupported("oracle".to_string());
        assert_eq!(err.table(), None);
        assert_eq!(err.to_string(), "schema does not support driver: oracle");
    }
}
