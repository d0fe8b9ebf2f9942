//! Contracts between the schema facade, its collaborators and the dialect plugins.
//!
//! - **Types** (`types`): Built-in driver identifiers
//! - **Row/Value** (`row`): Database-agnostic catalog rows and `scan`
//! - **Orm** (`orm`): Query engine, query handle and transaction contracts
//! - **Schema** (`schema`): Metadata model, `Grammar`/`Processor`/`DriverSchema`, `Migration`

pub mod orm;
pub mod row;
pub mod schema;
pub mod types;

pub use orm::{Orm, Query, Transaction};

pub use row::{FromRow, Row, Value, scan};

pub use schema::{
    Column, CommonSchema, DBColumn, DBForeignKey, DBIndex, DBTable, DBType, DBView,
    DriverSchema, ForeignKey, Grammar, Index, Migration, Processor, Table, Type, View,
};

pub use types::Driver;
