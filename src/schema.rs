//! The schema facade.
//!
//! `Schema` resolves the dialect of one configured connection and exposes
//! table mutations, introspection and migration bookkeeping on top of it.
//! Mutations run through a single-use `Blueprint` inside a transaction;
//! introspection delegates to the dialect's `DriverSchema`/`CommonSchema`.

use anyhow::Result as AnyResult;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::blueprint::Blueprint;
use crate::config::{Config, connection_key};
use crate::drivers::common::fetch;
use crate::drivers::{Dialect, DialectCatalog, DialectContext};
use crate::error::{Result, SchemaError};
use crate::grammars::split_qualified;
use crate::traits::{
    Column, DBForeignKey, ForeignKey, Index, Migration, Orm, Table, Type, View,
};

/// Database-agnostic schema manager bound to one connection.
///
/// # Error reporting
///
/// Mutations wrap failures in an operation-specific [`SchemaError`];
/// `get_*` introspection returns the query engine's error unchanged. The
/// `*_listing` and `has_*` helpers never fail: errors are logged and
/// reported as an empty listing or `false`, so a negative answer may also
/// mean the catalog could not be read.
///
/// # Example
///
/// ```ignore
/// let schema = Schema::new(config, orm, Vec::new())?;
///
/// schema
///     .create("users", |table| {
///         table.id();
///         table.string("email", 255).unique();
///         table.timestamps();
///     })
///     .await?;
///
/// assert!(schema.has_table("users").await);
/// ```
#[derive(Clone)]
pub struct Schema {
    config: Arc<dyn Config>,
    orm: Arc<dyn Orm>,
    catalog: Arc<DialectCatalog>,
    dialect: Dialect,
    driver: String,
    prefix: String,
    migrations: Vec<Arc<dyn Migration>>,
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("connection", &self.orm.name())
            .field("driver", &self.driver)
            .field("prefix", &self.prefix)
            .field("schema", &self.dialect.schema)
            .field("migrations", &self.migrations.len())
            .finish()
    }
}

impl Schema {
    /// Build a schema for the connection `orm` is bound to, using the
    /// built-in dialects.
    ///
    /// The built-in dialects match driver names case-insensitively and also
    /// accept the aliases `postgresql`, `pg`, `mariadb`, `mssql`, `sql_server`
    /// and `sqlite3`. Pass a custom catalog to [`Schema::with_catalog`] to
    /// change that.
    pub fn new(
        config: Arc<dyn Config>,
        orm: Arc<dyn Orm>,
        migrations: Vec<Arc<dyn Migration>>,
    ) -> Result<Self> {
        Self::with_catalog(
            config,
            orm,
            migrations,
            Arc::new(DialectCatalog::with_builtins()),
        )
    }

    /// Build a schema resolving its dialect from `catalog`.
    ///
    /// Fails with [`SchemaError::DriverNotSupported`] when the connection's
    /// driver has no registered dialect.
    pub fn with_catalog(
        config: Arc<dyn Config>,
        orm: Arc<dyn Orm>,
        migrations: Vec<Arc<dyn Migration>>,
        catalog: Arc<DialectCatalog>,
    ) -> Result<Self> {
        let connection = orm.name().to_string();
        let driver = config.get_string(&connection_key(&connection, "driver"), None);
        let prefix = config.get_string(&connection_key(&connection, "prefix"), None);

        let ctx = DialectContext {
            orm: orm.clone(),
            config: config.clone(),
            connection,
            prefix: prefix.clone(),
        };
        let dialect = catalog.resolve(&driver, &ctx)?;

        debug!(
            connection = %ctx.connection,
            driver = %driver,
            schema = %dialect.schema,
            "resolved schema dialect"
        );

        Ok(Self {
            config,
            orm,
            catalog,
            dialect,
            driver,
            prefix,
            migrations,
        })
    }

    /// A new schema bound to connection `name`, with its dialect resolved
    /// afresh. The migration list is carried over.
    pub fn connection(&self, name: &str) -> Result<Schema> {
        let orm = self
            .orm
            .connection(name)
            .map_err(|err| SchemaError::Config(format!("{:#}", err)))?;

        Self::with_catalog(
            self.config.clone(),
            orm,
            self.migrations.clone(),
            self.catalog.clone(),
        )
    }

    /// Rebind this schema to connection `name`.
    ///
    /// On error the schema is left bound to its current connection.
    pub fn set_connection(&mut self, name: &str) -> Result<()> {
        *self = self.connection(name)?;
        Ok(())
    }

    /// Name of the bound connection.
    pub fn get_connection(&self) -> &str {
        self.orm.name()
    }

    pub fn driver(&self) -> &str {
        &self.driver
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    pub fn orm(&self) -> Arc<dyn Orm> {
        self.orm.clone()
    }

    pub fn migrations(&self) -> &[Arc<dyn Migration>] {
        &self.migrations
    }

    /// Replace the stored migrations.
    pub fn register(&mut self, migrations: Vec<Arc<dyn Migration>>) {
        self.migrations = migrations;
    }

    /// Create `table`, letting `callback` define its columns and indexes.
    pub async fn create<F>(&self, table: &str, callback: F) -> Result<()>
    where
        F: FnOnce(&mut Blueprint),
    {
        let mut blueprint = self.blueprint(table);
        blueprint.create();
        callback(&mut blueprint);

        self.build(&mut blueprint)
            .await
            .map_err(|err| SchemaError::create_table(table, err))
    }

    /// Alter `table` with the commands `callback` adds.
    pub async fn table<F>(&self, table: &str, callback: F) -> Result<()>
    where
        F: FnOnce(&mut Blueprint),
    {
        let mut blueprint = self.blueprint(table);
        callback(&mut blueprint);

        self.build(&mut blueprint)
            .await
            .map_err(|err| SchemaError::change_table(table, err))
    }

    pub async fn drop(&self, table: &str) -> Result<()> {
        let mut blueprint = self.blueprint(table);
        blueprint.drop();

        self.build(&mut blueprint)
            .await
            .map_err(|err| SchemaError::drop_table(table, err))
    }

    pub async fn drop_if_exists(&self, table: &str) -> Result<()> {
        let mut blueprint = self.blueprint(table);
        blueprint.drop_if_exists();

        self.build(&mut blueprint)
            .await
            .map_err(|err| SchemaError::drop_table(table, err))
    }

    pub async fn drop_columns(&self, table: &str, columns: &[&str]) -> Result<()> {
        let mut blueprint = self.blueprint(table);
        blueprint.drop_column(columns);

        self.build(&mut blueprint)
            .await
            .map_err(|err| SchemaError::drop_columns(table, err))
    }

    pub async fn rename(&self, from: &str, to: &str) -> Result<()> {
        let mut blueprint = self.blueprint(from);
        blueprint.rename(to);

        self.build(&mut blueprint)
            .await
            .map_err(|err| SchemaError::rename_table(from, err))
    }

    /// Execute raw SQL on the connection's current query handle.
    pub async fn sql(&self, sql: &str) -> AnyResult<()> {
        self.orm.query().exec(sql).await?;
        Ok(())
    }

    pub async fn get_columns(&self, table: &str) -> AnyResult<Vec<Column>> {
        self.dialect.driver_schema.get_columns(table).await
    }

    pub async fn get_indexes(&self, table: &str) -> AnyResult<Vec<Index>> {
        self.dialect.driver_schema.get_indexes(table).await
    }

    pub async fn get_types(&self) -> AnyResult<Vec<Type>> {
        self.dialect.driver_schema.get_types().await
    }

    pub async fn get_tables(&self) -> AnyResult<Vec<Table>> {
        self.dialect.common_schema.get_tables().await
    }

    pub async fn get_views(&self) -> AnyResult<Vec<View>> {
        self.dialect.common_schema.get_views().await
    }

    /// Foreign keys declared on `table`.
    ///
    /// A `schema.table` name overrides the connection's schema.
    pub async fn get_foreign_keys(&self, table: &str) -> AnyResult<Vec<ForeignKey>> {
        let (schema, table) = split_qualified(table);
        let schema = schema.unwrap_or(&self.dialect.schema);
        let table = format!("{}{}", self.prefix, table);

        let sql = self.dialect.grammar.compile_foreign_keys(schema, &table);
        let foreign_keys: Vec<DBForeignKey> = fetch(self.orm.as_ref(), &sql).await?;

        Ok(self.dialect.processor.process_foreign_keys(foreign_keys))
    }

    /// Column names of `table`, in catalog order. Empty on failure.
    pub async fn get_column_listing(&self, table: &str) -> Vec<String> {
        match self.get_columns(table).await {
            Ok(columns) => columns.into_iter().map(|column| column.name).collect(),
            Err(err) => {
                error!("failed to get {} columns: {:#}", table, err);
                Vec::new()
            }
        }
    }

    /// Index names of `table`, in catalog order. Empty on failure.
    pub async fn get_index_listing(&self, table: &str) -> Vec<String> {
        match self.get_indexes(table).await {
            Ok(indexes) => indexes.into_iter().map(|index| index.name).collect(),
            Err(err) => {
                error!("failed to get {} indexes: {:#}", table, err);
                Vec::new()
            }
        }
    }

    /// Table names (prefix included), in catalog order. Empty on failure.
    pub async fn get_table_listing(&self) -> Vec<String> {
        match self.get_tables().await {
            Ok(tables) => tables.into_iter().map(|table| table.name).collect(),
            Err(err) => {
                error!("failed to get tables: {:#}", err);
                Vec::new()
            }
        }
    }

    pub async fn has_column(&self, table: &str, column: &str) -> bool {
        self.get_column_listing(table)
            .await
            .iter()
            .any(|name| name == column)
    }

    /// True when every column exists; an empty `columns` is always true.
    pub async fn has_columns(&self, table: &str, columns: &[&str]) -> bool {
        let listing = self.get_column_listing(table).await;
        columns
            .iter()
            .all(|column| listing.iter().any(|name| name == column))
    }

    pub async fn has_index(&self, table: &str, index: &str) -> bool {
        self.get_index_listing(table)
            .await
            .iter()
            .any(|name| name == index)
    }

    /// Whether `name` exists. A `schema.table` name also requires the
    /// reported schema to match.
    pub async fn has_table(&self, name: &str) -> bool {
        let (schema, table) = split_qualified(name);
        let table = format!("{}{}", self.prefix, table);

        match self.get_tables().await {
            Ok(tables) => tables.iter().any(|candidate| {
                candidate.name == table && schema.is_none_or(|schema| schema == candidate.schema)
            }),
            Err(err) => {
                self.log_get_tables_failure(err);
                false
            }
        }
    }

    pub async fn has_type(&self, name: &str) -> bool {
        match self.get_types().await {
            Ok(types) => types.iter().any(|ty| ty.name == name),
            Err(err) => {
                self.log_get_tables_failure(err);
                false
            }
        }
    }

    pub async fn has_view(&self, name: &str) -> bool {
        match self.get_views().await {
            Ok(views) => views.iter().any(|view| view.name == name),
            Err(err) => {
                self.log_get_tables_failure(err);
                false
            }
        }
    }

    fn log_get_tables_failure(&self, err: anyhow::Error) {
        let err = SchemaError::get_tables(self.orm.name(), err);
        error!("{}", err);
    }

    fn blueprint(&self, table: &str) -> Blueprint {
        Blueprint::new(table, self.prefix.clone())
    }

    /// Run the blueprint in its own transaction, or in the caller's when the
    /// query handle already has one open.
    async fn build(&self, blueprint: &mut Blueprint) -> AnyResult<()> {
        let grammar = self.dialect.grammar.as_ref();
        let query = self.orm.query();

        if query.in_transaction() {
            return blueprint.build(query.as_ref(), grammar).await;
        }

        let tx = self.orm.begin().await?;
        debug!(
            connection = self.orm.name(),
            table = blueprint.table(),
            "began schema transaction"
        );

        match blueprint.build(tx.as_query(), grammar).await {
            Ok(()) => {
                tx.commit().await?;
                debug!(
                    connection = self.orm.name(),
                    table = blueprint.table(),
                    "committed schema transaction"
                );
                Ok(())
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(
                        connection = self.orm.name(),
                        table = blueprint.table(),
                        "failed to roll back schema transaction: {:#}",
                        rollback_err
                    );
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;
    use crate::testing::{FakeOrm, LogCapture};
    use crate::traits::{Row, Value};
    use async_trait::async_trait;

    const TABLES: &str = "pg_total_relation_size";
    const COLUMNS: &str = "from pg_attribute a, pg_class c";
    const INDEXES: &str = "from pg_index i";
    const FOREIGN_KEYS: &str = "from pg_constraint c";
    const VIEWS: &str = "from pg_views";
    const TYPES: &str = "from pg_type t";

    fn config(driver: &str, prefix: &str) -> Arc<dyn Config> {
        Arc::new(
            MapConfig::new()
                .with("database.connections.main.driver", driver)
                .with("database.connections.main.prefix", prefix)
                .with("database.connections.reporting.driver", "mysql")
                .with("database.connections.reporting.database", "reports")
                .with("database.connections.legacy.driver", "oracle"),
        )
    }

    fn postgres(prefix: &str) -> (Schema, Arc<FakeOrm>) {
        let orm = FakeOrm::new("main");
        let schema = Schema::new(config("postgres", prefix), orm.clone(), Vec::new()).unwrap();
        (schema, orm)
    }

    fn table_row(name: &str, schema: &str) -> Row {
        Row::from_pairs([
            ("name", Value::Text(name.to_string())),
            ("schema", Value::Text(schema.to_string())),
        ])
    }

    fn named(name: &str) -> Row {
        Row::from_pairs([
            ("name", Value::Text(name.to_string())),
            ("type_name", Value::Text("int4".to_string())),
            ("type", Value::Text("integer".to_string())),
            ("columns", Value::Text(name.to_string())),
        ])
    }

    struct CreateUsers;

    #[async_trait]
    impl Migration for CreateUsers {
        fn signature(&self) -> &str {
            "20240101000000_create_users_table"
        }

        async fn up(&self, schema: &Schema) -> Result<()> {
            schema.create("users", |table| {
                table.id();
            })
            .await
        }

        async fn down(&self, schema: &Schema) -> Result<()> {
            schema.drop_if_exists("users").await
        }
    }

    #[test]
    fn test_unsupported_driver_fails_fast() {
        let err = Schema::new(config("oracle", ""), FakeOrm::new("main"), Vec::new()).unwrap_err();
        assert!(matches!(err, SchemaError::DriverNotSupported(ref d) if d == "oracle"));
    }

    #[test]
    fn test_create_runs_in_committed_transaction() {
        let (schema, orm) = postgres("");

        smol::block_on(schema.create("users", |table| {
            table.id();
            table.string("email", 255).unique();
        }))
        .unwrap();

        assert_eq!(orm.events(), vec!["begin", "commit"]);
        let executed = orm.executed();
        assert_eq!(executed.len(), 2);
        assert!(executed[0].starts_with("create table \"users\""));
        assert!(executed[1].contains("users_email_unique"));
    }

    #[test]
    fn test_failed_build_rolls_back_and_wraps_error() {
        let (schema, orm) = postgres("");
        orm.fail_when("add constraint", "relation is locked");

        let err = smol::block_on(schema.create("users", |table| {
            table.id();
            table.string("email", 255).unique();
            table.index(&["email"]);
        }))
        .unwrap_err();

        assert_eq!(orm.events(), vec!["begin", "rollback"]);
        assert!(orm.executed().is_empty());
        assert!(matches!(err, SchemaError::FailedToCreateTable { ref table, .. } if table == "users"));
        assert!(err.to_string().contains("relation is locked"));
    }

    #[test]
    fn test_build_joins_open_transaction() {
        let orm = FakeOrm::in_transaction("main");
        let schema = Schema::new(config("postgres", ""), orm.clone(), Vec::new()).unwrap();

        smol::block_on(schema.drop("users")).unwrap();
        assert!(orm.events().is_empty());
        assert_eq!(orm.executed(), vec!["drop table \"users\""]);

        orm.fail_when("drop table", "does not exist");
        let err = smol::block_on(schema.drop("users")).unwrap_err();
        assert!(orm.events().is_empty());
        assert!(matches!(err, SchemaError::FailedToDropTable { .. }));
    }

    #[test]
    fn test_mutation_error_kinds() {
        let (schema, orm) = postgres("");
        orm.fail_when("", "boom");

        smol::block_on(async {
            assert!(matches!(
                schema.drop_if_exists("users").await,
                Err(SchemaError::FailedToDropTable { .. })
            ));
            assert!(matches!(
                schema.drop_columns("users", &["age"]).await,
                Err(SchemaError::FailedToDropColumns { .. })
            ));
            assert!(matches!(
                schema.rename("users", "people").await,
                Err(SchemaError::FailedToRenameTable { ref table, .. }) if table == "users"
            ));
            assert!(matches!(
                schema.table("users", |table| {
                    table.integer("age").nullable();
                })
                .await,
                Err(SchemaError::FailedToChangeTable { .. })
            ));
        });
    }

    #[test]
    fn test_prefix_applied_to_mutations() {
        let (schema, orm) = postgres("app_");

        smol::block_on(schema.rename("users", "people")).unwrap();
        assert_eq!(
            orm.executed(),
            vec!["alter table \"app_users\" rename to \"app_people\""]
        );
    }

    #[test]
    fn test_drop_no_columns_runs_nothing() {
        let (schema, orm) = postgres("");

        smol::block_on(schema.drop_columns("users", &[])).unwrap();
        assert!(orm.executed().is_empty());
    }

    #[test]
    fn test_driver_aliases_resolve_builtin_dialects() {
        for (alias, statement) in [
            ("pg", "drop table \"users\""),
            ("PostgreSQL", "drop table \"users\""),
            ("mariadb", "drop table `users`"),
            ("mssql", "drop table [users]"),
            ("sqlite3", "drop table \"users\""),
        ] {
            let orm = FakeOrm::new("main");
            let schema = Schema::new(config(alias, ""), orm.clone(), Vec::new()).unwrap();
            assert_eq!(schema.driver(), alias);

            smol::block_on(schema.drop("users")).unwrap();
            assert_eq!(orm.executed(), vec![statement], "{alias}");
        }
    }

    #[test]
    fn test_sql_passes_error_through() {
        let (schema, orm) = postgres("");
        orm.fail_when("vacuum", "cannot run inside a transaction block");

        smol::block_on(schema.sql("select 1")).unwrap();
        let err = smol::block_on(schema.sql("vacuum")).unwrap_err();
        assert_eq!(err.to_string(), "cannot run inside a transaction block");
        assert!(orm.events().is_empty());
    }

    #[test]
    fn test_has_table_with_prefix_and_schema() {
        let (schema, orm) = postgres("app_");
        orm.respond(
            TABLES,
            vec![table_row("app_users", "public"), table_row("app_orders", "sales")],
        );

        smol::block_on(async {
            assert!(schema.has_table("users").await);
            assert!(schema.has_table("orders").await);
            assert!(schema.has_table("sales.orders").await);
            assert!(!schema.has_table("public.orders").await);
            assert!(!schema.has_table("app_users").await);
            assert_eq!(
                schema.get_table_listing().await,
                vec!["app_users", "app_orders"]
            );
        });
    }

    #[test]
    fn test_has_column_and_columns() {
        let (schema, orm) = postgres("");
        orm.respond(COLUMNS, vec![named("id"), named("email")]);

        smol::block_on(async {
            assert_eq!(schema.get_column_listing("users").await, vec!["id", "email"]);
            assert!(schema.has_column("users", "email").await);
            assert!(!schema.has_column("users", "name").await);
            assert!(schema.has_columns("users", &["id", "email"]).await);
            assert!(!schema.has_columns("users", &["id", "name"]).await);
            assert!(schema.has_columns("users", &[]).await);
        });
    }

    #[test]
    fn test_has_index() {
        let (schema, orm) = postgres("");
        orm.respond(
            INDEXES,
            vec![named("users_pkey"), named("users_email_unique")],
        );

        smol::block_on(async {
            assert!(schema.has_index("users", "users_email_unique").await);
            assert!(!schema.has_index("users", "users_name_index").await);
        });
    }

    #[test]
    fn test_has_view_and_type() {
        let (schema, orm) = postgres("");
        orm.respond(VIEWS, vec![table_row("active_users", "public")]);
        orm.respond(
            TYPES,
            vec![Row::from_pairs([
                ("name", Value::Text("mood".to_string())),
                ("schema", Value::Text("public".to_string())),
                ("type", Value::Text("e".to_string())),
                ("category", Value::Text("E".to_string())),
                ("implicit", Value::Bool(false)),
            ])],
        );

        smol::block_on(async {
            assert!(schema.has_view("active_users").await);
            assert!(!schema.has_view("users").await);
            assert!(schema.has_type("mood").await);
            assert!(!schema.has_type("color").await);
        });
    }

    #[test]
    fn test_introspection_failures_are_logged_not_raised() {
        let (schema, orm) = postgres("");
        orm.fail_raw("connection reset");

        let logs = LogCapture::new();
        logs.run(|| {
            smol::block_on(async {
                assert!(schema.get_column_listing("users").await.is_empty());
                assert!(schema.get_index_listing("users").await.is_empty());
                assert!(!schema.has_table("users").await);
                assert!(!schema.has_columns("users", &["id"]).await);

                let err = schema.get_foreign_keys("users").await.unwrap_err();
                assert_eq!(err.to_string(), "connection reset");
                assert!(schema.get_columns("users").await.is_err());
            })
        });

        let output = logs.contents();
        assert!(output.contains("failed to get users columns: connection reset"));
        assert!(output.contains("failed to get users indexes: connection reset"));
        assert!(output.contains("failed to get tables of connection main: connection reset"));
    }

    #[test]
    fn test_get_foreign_keys_prefixes_and_scopes() {
        let (schema, orm) = postgres("app_");
        orm.respond(
            FOREIGN_KEYS,
            vec![Row::from_pairs([
                ("name", Value::Text("app_posts_user_id_foreign".to_string())),
                ("columns", Value::Text("user_id".to_string())),
                ("foreign_schema", Value::Text("public".to_string())),
                ("foreign_table", Value::Text("app_users".to_string())),
                ("foreign_columns", Value::Text("id".to_string())),
                ("on_update", Value::Text("a".to_string())),
                ("on_delete", Value::Text("c".to_string())),
            ])],
        );

        let foreign_keys = smol::block_on(schema.get_foreign_keys("posts")).unwrap();
        assert_eq!(foreign_keys.len(), 1);
        assert_eq!(foreign_keys[0].columns, vec!["user_id"]);
        assert_eq!(foreign_keys[0].on_delete, "cascade");
        assert_eq!(foreign_keys[0].on_update, "no action");

        let sql = &orm.queries()[0];
        assert!(sql.contains("'app_posts'"));
        assert!(sql.contains("'public'"));

        smol::block_on(schema.get_foreign_keys("audit.posts")).unwrap();
        assert!(orm.queries()[1].contains("'audit'"));
    }

    #[test]
    fn test_connection_switching() {
        let (schema, _orm) = postgres("");
        assert_eq!(schema.get_connection(), "main");
        assert_eq!(schema.dialect().schema, "public");

        let reporting = schema.connection("reporting").unwrap();
        assert_eq!(reporting.get_connection(), "reporting");
        assert_eq!(reporting.driver(), "mysql");
        assert_eq!(reporting.dialect().schema, "reports");
        assert_eq!(schema.get_connection(), "main");

        let mut schema = schema;
        assert!(matches!(
            schema.set_connection("legacy"),
            Err(SchemaError::DriverNotSupported(_))
        ));
        assert_eq!(schema.get_connection(), "main");

        schema.set_connection("reporting").unwrap();
        assert_eq!(schema.get_connection(), "reporting");
    }

    #[test]
    fn test_migrations_are_stored() {
        let migration: Arc<dyn Migration> = Arc::new(CreateUsers);
        let orm = FakeOrm::new("main");
        let mut schema =
            Schema::new(config("postgres", ""), orm.clone(), vec![migration.clone()]).unwrap();

        assert_eq!(schema.migrations().len(), 1);
        assert_eq!(
            schema.migrations()[0].signature(),
            "20240101000000_create_users_table"
        );
        assert_eq!(schema.connection("reporting").unwrap().migrations().len(), 1);

        smol::block_on(schema.migrations()[0].up(&schema)).unwrap();
        assert!(orm.executed()[0].starts_with("create table \"users\""));

        schema.register(Vec::new());
        assert!(schema.migrations().is_empty());
    }
}
