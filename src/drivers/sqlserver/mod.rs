//! SQL Server dialect.
//!
//! SQLx ships no SQL Server backend, so this dialect runs through whatever
//! `Orm` the caller supplies (for example one backed by tiberius).

mod grammar;
mod processor;
mod schema;

pub use grammar::SqlserverGrammar;
pub use processor::SqlserverProcessor;
pub use schema::SqlserverSchema;

use std::sync::Arc;

use super::factory::{Dialect, DialectContext};

/// Build the SQL Server dialect for a connection.
pub fn dialect(ctx: &DialectContext) -> Dialect {
    Dialect::new(
        Arc::new(SqlserverGrammar::new()),
        Arc::new(SqlserverProcessor::new()),
        Arc::new(SqlserverSchema::new(ctx.orm.clone(), ctx.prefix.clone(), "")),
        "",
        ctx.orm.clone(),
    )
}
