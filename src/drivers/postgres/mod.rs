//! PostgreSQL dialect.
//!
//! Grammar, processor and introspection for PostgreSQL, plus the SQLx pool
//! and row conversion used by `SqlxOrm`. Introspection is scoped to the
//! connection's configured schema (`public` unless set).

pub(crate) mod connection;
mod grammar;
mod processor;
mod schema;
pub(crate) mod types;

pub use grammar::PostgresGrammar;
pub use processor::PostgresProcessor;
pub use schema::PostgresSchema;

use std::sync::Arc;

use super::factory::{Dialect, DialectContext};

/// Schema used when the connection configures none.
pub const DEFAULT_SCHEMA: &str = "public";

/// Build the PostgreSQL dialect for a connection.
pub fn dialect(ctx: &DialectContext) -> Dialect {
    let schema = ctx.setting("schema", Some(DEFAULT_SCHEMA));

    Dialect::new(
        Arc::new(PostgresGrammar::new()),
        Arc::new(PostgresProcessor::new()),
        Arc::new(PostgresSchema::new(
            ctx.orm.clone(),
            ctx.prefix.clone(),
            schema.clone(),
        )),
        schema,
        ctx.orm.clone(),
    )
}
