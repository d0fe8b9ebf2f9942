//! Built-in dialects and the registry that selects them.
//!
//! Each dialect module provides a `Grammar`, a `Processor` and a
//! `DriverSchema`, plus a `dialect` factory registered in
//! `DialectCatalog::with_builtins`. The postgres, mysql and sqlite modules
//! also carry the sqlx pool construction and row conversion used by
//! `SqlxOrm`.

pub mod common;
pub mod factory;
pub mod mysql;
pub mod postgres;
pub mod sqlite;
pub mod sqlserver;

pub use common::SharedSchema;
pub use factory::{Dialect, DialectCatalog, DialectContext, DialectFactory};
