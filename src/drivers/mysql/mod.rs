//! MySQL dialect.
//!
//! Introspection is scoped to the connection's configured database. DDL
//! statements commit implicitly in MySQL, so a failed multi-statement build
//! cannot be fully rolled back on this engine.

pub(crate) mod connection;
mod grammar;
mod processor;
mod schema;
pub(crate) mod types;

pub use grammar::MysqlGrammar;
pub use processor::MysqlProcessor;
pub use schema::MysqlSchema;

use std::sync::Arc;

use super::factory::{Dialect, DialectContext};

/// Build the MySQL dialect for a connection.
pub fn dialect(ctx: &DialectContext) -> Dialect {
    let database = ctx.setting("database", None);

    Dialect::new(
        Arc::new(MysqlGrammar::new()),
        Arc::new(MysqlProcessor::new()),
        Arc::new(MysqlSchema::new(
            ctx.orm.clone(),
            ctx.prefix.clone(),
            database.clone(),
        )),
        database,
        ctx.orm.clone(),
    )
}
