//! Query-engine contracts.
//!
//! The schema layer never owns connections. It talks to whatever implements
//! these traits: a pooled `Query` handle for plain statements, a
//! `Transaction` for atomic builds, and the `Orm` that hands both out and
//! can rebind to another configured connection.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::row::Row;

/// A handle that can run SQL against one connection.
///
/// # Example
///
/// ```ignore
/// use schemata::traits::{scan, Query};
///
/// async fn example(query: &dyn Query) -> anyhow::Result<()> {
///     query.exec("create table t (id integer)").await?;
///     let rows = query.raw("select name from sqlite_master").await?;
///     // Convert rows with scan::<T>(&rows)...
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait Query: Send + Sync {
    /// Run a statement that returns rows.
    async fn raw(&self, sql: &str) -> Result<Vec<Row>>;

    /// Run a statement that returns no rows; yields the affected row count.
    async fn exec(&self, sql: &str) -> Result<u64>;

    /// Whether statements on this handle run inside an open transaction.
    fn in_transaction(&self) -> bool;
}

/// An open transaction.
///
/// Statements run through the `Query` methods belong to the transaction.
/// After `commit` or `rollback` every further call fails.
#[async_trait]
pub trait Transaction: Query {
    async fn commit(&self) -> Result<()>;

    async fn rollback(&self) -> Result<()>;

    /// View the transaction as a plain query handle.
    fn as_query(&self) -> &dyn Query;
}

/// The query engine bound to one named connection.
#[async_trait]
pub trait Orm: Send + Sync {
    /// Name of the configured connection this engine is bound to.
    fn name(&self) -> &str;

    /// Handle for running statements outside an explicit transaction.
    fn query(&self) -> Arc<dyn Query>;

    /// Open a new transaction.
    async fn begin(&self) -> Result<Arc<dyn Transaction>>;

    /// Rebind to another configured connection.
    fn connection(&self, name: &str) -> Result<Arc<dyn Orm>>;
}
