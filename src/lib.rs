//! Database-agnostic schema management.
//!
//! Describe table changes once with a [`Blueprint`] and let [`Schema`] compile
//! and run them for PostgreSQL, MySQL, SQL Server or SQLite. Introspection
//! (tables, views, columns, indexes, foreign keys, types) is normalized into
//! one model regardless of the engine.
//!
//! - [`Schema`]: the facade bound to one configured connection
//! - [`blueprint`]: single-use per-table command builder
//! - [`drivers`]: per-engine grammars, processors and introspection, plus the
//!   [`DialectCatalog`] that selects them
//! - [`orm`]: sqlx-backed implementation of the query-engine contract
//! - [`traits`]: the contracts between all of the above

pub mod blueprint;
pub mod config;
pub mod drivers;
pub mod error;
pub mod grammars;
pub mod orm;
pub mod schema;
pub mod traits;

#[cfg(test)]
mod testing;

pub use blueprint::Blueprint;
pub use config::{Config, ConnectionSettings, MapConfig};
pub use drivers::{Dialect, DialectCatalog, DialectContext};
pub use error::{Result, SchemaError};
pub use orm::{SqlxOrm, TransactionScope};
pub use schema::Schema;
pub use traits::{
    Column, Driver, ForeignKey, Index, Migration, Orm, Query, Table, Transaction, Type, View,
};
