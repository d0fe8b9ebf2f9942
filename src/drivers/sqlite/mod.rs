//! SQLite dialect.
//!
//! Introspection always targets the `main` database of the connection, so
//! the dialect carries no schema.

pub(crate) mod connection;
mod grammar;
mod processor;
mod schema;
pub(crate) mod types;

pub use grammar::SqliteGrammar;
pub use processor::SqliteProcessor;
pub use schema::SqliteSchema;

use std::sync::Arc;

use super::factory::{Dialect, DialectContext};

/// Build the SQLite dialect for a connection.
pub fn dialect(ctx: &DialectContext) -> Dialect {
    Dialect::new(
        Arc::new(SqliteGrammar::new()),
        Arc::new(SqliteProcessor::new()),
        Arc::new(SqliteSchema::new(ctx.orm.clone(), ctx.prefix.clone())),
        "",
        ctx.orm.clone(),
    )
}
