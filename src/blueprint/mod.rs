//! Per-table build plans.
//!
//! A `Blueprint` accumulates the intended changes to one table: a table-level
//! action (create, drop, rename or plain alter), column definitions, and
//! index/foreign-key commands. `build` compiles everything through a
//! `Grammar` and runs the statements in order. A blueprint is built once.

mod column;
mod command;

pub use column::{ColumnDefault, ColumnDefinition, ColumnType};
pub use command::{Command, ForeignKeyDefinition, IndexDefinition, IndexKind};

use anyhow::{Result, bail};
use tracing::debug;

use crate::traits::{Grammar, Query};

/// Table-level action of a blueprint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TableAction {
    /// Modify an existing table
    #[default]
    Alter,
    Create,
    Drop,
    DropIfExists,
    /// Rename the table to the given (unprefixed) name
    Rename(String),
}

/// A single-use build plan for one table.
///
/// # Example
///
/// ```ignore
/// let mut blueprint = Blueprint::new("users", "");
/// blueprint.create();
/// blueprint.id();
/// blueprint.string("email", 255).unique();
/// blueprint.timestamps();
/// blueprint.build(query.as_ref(), grammar.as_ref()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Blueprint {
    table: String,
    prefix: String,
    action: TableAction,
    columns: Vec<ColumnDefinition>,
    commands: Vec<Command>,
    built: bool,
}

impl Blueprint {
    /// Create a blueprint for `table` (unprefixed, optionally `schema.table`).
    pub fn new(table: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            prefix: prefix.into(),
            action: TableAction::Alter,
            columns: Vec::new(),
            commands: Vec::new(),
            built: false,
        }
    }

    /// Table name as given by the caller, without prefix
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn action(&self) -> &TableAction {
        &self.action
    }

    /// Columns in definition order
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Explicit commands in call order
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn is_creating(&self) -> bool {
        self.action == TableAction::Create
    }

    pub fn create(&mut self) {
        self.action = TableAction::Create;
    }

    pub fn drop(&mut self) {
        self.action = TableAction::Drop;
    }

    pub fn drop_if_exists(&mut self) {
        self.action = TableAction::DropIfExists;
    }

    pub fn rename(&mut self, to: impl Into<String>) {
        self.action = TableAction::Rename(to.into());
    }

    // Columns

    /// Auto-incrementing big integer primary key named `id`.
    pub fn id(&mut self) -> &mut ColumnDefinition {
        self.big_increments("id")
    }

    pub fn increments(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Integer)
            .unsigned()
            .auto_increment()
    }

    pub fn big_increments(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::BigInteger)
            .unsigned()
            .auto_increment()
    }

    pub fn small_increments(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::SmallInteger)
            .unsigned()
            .auto_increment()
    }

    pub fn integer(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Integer)
    }

    pub fn big_integer(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::BigInteger)
    }

    pub fn small_integer(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::SmallInteger)
    }

    pub fn tiny_integer(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::TinyInteger)
    }

    pub fn string(&mut self, name: &str, length: u32) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::String(length))
    }

    pub fn char(&mut self, name: &str, length: u32) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Char(length))
    }

    pub fn text(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Text)
    }

    pub fn medium_text(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::MediumText)
    }

    pub fn long_text(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::LongText)
    }

    pub fn boolean(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Boolean)
    }

    pub fn decimal(&mut self, name: &str, precision: u32, scale: u32) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Decimal { precision, scale })
    }

    pub fn double(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Double)
    }

    pub fn float(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Float)
    }

    pub fn date(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Date)
    }

    pub fn time(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Time)
    }

    pub fn date_time(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::DateTime)
    }

    pub fn timestamp(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Timestamp)
    }

    pub fn timestamp_tz(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::TimestampTz)
    }

    /// Nullable `created_at` and `updated_at` timestamps.
    pub fn timestamps(&mut self) {
        self.timestamp("created_at").nullable();
        self.timestamp("updated_at").nullable();
    }

    /// Nullable `deleted_at` timestamp.
    pub fn soft_deletes(&mut self) -> &mut ColumnDefinition {
        self.timestamp("deleted_at").nullable()
    }

    pub fn json(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Json)
    }

    pub fn jsonb(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Jsonb)
    }

    pub fn uuid(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Uuid)
    }

    pub fn binary(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Binary)
    }

    pub fn enum_(&mut self, name: &str, values: &[&str]) -> &mut ColumnDefinition {
        let values = values.iter().map(|v| v.to_string()).collect();
        self.add_column(name, ColumnType::Enum(values))
    }

    fn add_column(&mut self, name: &str, column_type: ColumnType) -> &mut ColumnDefinition {
        let index = self.columns.len();
        self.columns.push(ColumnDefinition::new(name, column_type));
        &mut self.columns[index]
    }

    // Commands

    /// Drop `columns`. An empty list adds no command.
    pub fn drop_column(&mut self, columns: &[&str]) {
        if columns.is_empty() {
            return;
        }
        self.commands.push(Command::DropColumn {
            columns: to_strings(columns),
        });
    }

    pub fn rename_column(&mut self, from: &str, to: &str) {
        self.commands.push(Command::RenameColumn {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    pub fn primary(&mut self, columns: &[&str]) -> &mut IndexDefinition {
        let definition = self.index_definition(IndexKind::Primary, &to_strings(columns));
        self.push_index(Command::Primary(definition))
    }

    pub fn unique(&mut self, columns: &[&str]) -> &mut IndexDefinition {
        let definition = self.index_definition(IndexKind::Unique, &to_strings(columns));
        self.push_index(Command::Unique(definition))
    }

    pub fn index(&mut self, columns: &[&str]) -> &mut IndexDefinition {
        let definition = self.index_definition(IndexKind::Index, &to_strings(columns));
        self.push_index(Command::Index(definition))
    }

    pub fn foreign(&mut self, columns: &[&str]) -> &mut ForeignKeyDefinition {
        let columns = to_strings(columns);
        let definition = ForeignKeyDefinition {
            name: self.create_index_name(IndexKind::Foreign, &columns),
            columns,
            on: String::new(),
            references: Vec::new(),
            on_delete: None,
            on_update: None,
        };
        self.commands.push(Command::Foreign(definition));
        match self.commands.last_mut() {
            Some(Command::Foreign(definition)) => definition,
            _ => unreachable!("foreign key command was just pushed"),
        }
    }

    pub fn drop_primary(&mut self, columns: &[&str]) {
        let columns = to_strings(columns);
        self.commands.push(Command::DropPrimary {
            name: self.create_index_name(IndexKind::Primary, &columns),
            columns,
        });
    }

    pub fn drop_unique(&mut self, columns: &[&str]) {
        self.commands.push(Command::DropUnique {
            name: self.create_index_name(IndexKind::Unique, &to_strings(columns)),
        });
    }

    pub fn drop_index(&mut self, name: &str) {
        self.commands.push(Command::DropIndex {
            name: name.to_string(),
        });
    }

    pub fn drop_index_by_columns(&mut self, columns: &[&str]) {
        self.commands.push(Command::DropIndex {
            name: self.create_index_name(IndexKind::Index, &to_strings(columns)),
        });
    }

    pub fn drop_foreign(&mut self, columns: &[&str]) {
        self.commands.push(Command::DropForeign {
            name: self.create_index_name(IndexKind::Foreign, &to_strings(columns)),
        });
    }

    pub fn rename_index(&mut self, from: &str, to: &str) {
        self.commands.push(Command::RenameIndex {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    /// Set the table comment.
    pub fn comment(&mut self, comment: &str) {
        self.commands.push(Command::Comment(comment.to_string()));
    }

    /// Default index name: `{prefix}{table}_{columns}_{kind}`, lower-cased,
    /// with `-` and `.` replaced by `_`.
    pub fn create_index_name(&self, kind: IndexKind, columns: &[String]) -> String {
        let table = self.table.rsplit('.').next().unwrap_or(&self.table);
        format!(
            "{}{}_{}_{}",
            self.prefix,
            table,
            columns.join("_"),
            kind.as_str()
        )
        .to_lowercase()
        .replace(['-', '.'], "_")
    }

    fn index_definition(&self, kind: IndexKind, columns: &[String]) -> IndexDefinition {
        IndexDefinition {
            kind,
            name: self.create_index_name(kind, columns),
            columns: columns.to_vec(),
            algorithm: None,
        }
    }

    fn push_index(&mut self, command: Command) -> &mut IndexDefinition {
        self.commands.push(command);
        match self.commands.last_mut() {
            Some(Command::Primary(definition))
            | Some(Command::Unique(definition))
            | Some(Command::Index(definition)) => definition,
            _ => unreachable!("index command was just pushed"),
        }
    }

    /// Every command in execution order: the table action, column
    /// additions/changes (alter only), fluent column indexes, then the
    /// explicit commands in call order.
    pub fn ordered_commands(&self) -> Vec<Command> {
        let mut commands = Vec::new();

        match &self.action {
            TableAction::Create => commands.push(Command::Create),
            TableAction::Drop => commands.push(Command::Drop),
            TableAction::DropIfExists => commands.push(Command::DropIfExists),
            TableAction::Rename(to) => commands.push(Command::Rename { to: to.clone() }),
            TableAction::Alter => {
                for column in &self.columns {
                    if column.change {
                        commands.push(Command::Change(column.clone()));
                    } else {
                        commands.push(Command::Add(column.clone()));
                    }
                }
            }
        }

        for column in &self.columns {
            let columns = [column.name.clone()];
            if column.primary {
                commands.push(Command::Primary(
                    self.index_definition(IndexKind::Primary, &columns),
                ));
            }
            if column.unique {
                commands.push(Command::Unique(
                    self.index_definition(IndexKind::Unique, &columns),
                ));
            }
            if column.index {
                commands.push(Command::Index(
                    self.index_definition(IndexKind::Index, &columns),
                ));
            }
        }

        commands.extend(self.commands.iter().cloned());
        commands
    }

    /// Compile every command into SQL statements, in execution order.
    pub fn to_sql(&self, grammar: &dyn Grammar) -> Result<Vec<String>> {
        let mut statements = Vec::new();
        for command in self.ordered_commands() {
            statements.extend(grammar.compile(self, &command)?);
        }
        Ok(statements)
    }

    /// Compile and execute the blueprint against `query`.
    ///
    /// Statements run in order; the first failure stops the build and is
    /// returned. A blueprint can only be built once.
    pub async fn build(&mut self, query: &dyn Query, grammar: &dyn Grammar) -> Result<()> {
        if self.built {
            bail!("blueprint for table {} has already been built", self.table);
        }
        self.built = true;

        for statement in self.to_sql(grammar)? {
            debug!(table = %self.table, sql = %statement, "executing schema statement");
            query.exec(&statement).await?;
        }

        Ok(())
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeOrm;
    use crate::traits::Orm;

    /// Emits one statement per command: its name.
    struct NameGrammar;

    impl Grammar for NameGrammar {
        fn compile(&self, _: &Blueprint, command: &Command) -> Result<Vec<String>> {
            Ok(vec![command.name().to_string()])
        }
        fn compile_tables(&self, _: &str) -> String {
            String::new()
        }
        fn compile_views(&self, _: &str) -> String {
            String::new()
        }
        fn compile_columns(&self, _: &str, _: &str) -> String {
            String::new()
        }
        fn compile_indexes(&self, _: &str, _: &str) -> String {
            String::new()
        }
        fn compile_foreign_keys(&self, _: &str, _: &str) -> String {
            String::new()
        }
    }

    #[test]
    fn test_create_orders_action_then_fluent_then_explicit() {
        let mut blueprint = Blueprint::new("users", "");
        blueprint.create();
        blueprint.foreign(&["team_id"]).references(&["id"]).on("teams");
        blueprint.id();
        blueprint.string("email", 255).unique();
        blueprint.integer("team_id");

        let sql = blueprint.to_sql(&NameGrammar).unwrap();
        assert_eq!(sql, vec!["create", "unique", "foreign"]);
    }

    #[test]
    fn test_alter_emits_add_and_change_per_column() {
        let mut blueprint = Blueprint::new("users", "");
        blueprint.string("nickname", 100).nullable();
        blueprint.integer("age").change();
        blueprint.drop_column(&["legacy"]);

        let sql = blueprint.to_sql(&NameGrammar).unwrap();
        assert_eq!(sql, vec!["add", "change", "dropColumn"]);
    }

    #[test]
    fn test_drop_no_columns_is_a_no_op() {
        let mut blueprint = Blueprint::new("users", "");
        blueprint.drop_column(&[]);

        assert!(blueprint.to_sql(&NameGrammar).unwrap().is_empty());
    }

    #[test]
    fn test_index_names() {
        let mut blueprint = Blueprint::new("public.user-profiles", "app_");
        let name = blueprint.unique(&["Email", "team.id"]).name.clone();
        assert_eq!(name, "app_user_profiles_email_team_id_unique");

        let foreign = blueprint.foreign(&["user_id"]).name.clone();
        assert_eq!(foreign, "app_user_profiles_user_id_foreign");

        let custom = blueprint.index(&["a"]).name("custom_idx").name.clone();
        assert_eq!(custom, "custom_idx");
    }

    #[test]
    fn test_build_runs_statements_in_order() {
        let orm = FakeOrm::new("main");
        let mut blueprint = Blueprint::new("users", "");
        blueprint.create();
        blueprint.string("name", 255).index();

        smol::block_on(blueprint.build(orm.query().as_ref(), &NameGrammar)).unwrap();

        assert_eq!(orm.executed(), vec!["create", "index"]);
    }

    #[test]
    fn test_build_stops_at_first_failure() {
        let orm = FakeOrm::new("main");
        orm.fail_when("unique", "duplicate key");

        let mut blueprint = Blueprint::new("users", "");
        blueprint.create();
        blueprint.string("email", 255).unique();
        blueprint.index(&["email"]);

        let err = smol::block_on(blueprint.build(orm.query().as_ref(), &NameGrammar)).unwrap_err();

        assert_eq!(err.to_string(), "duplicate key");
        assert_eq!(orm.executed(), vec!["create"]);
    }

    #[test]
    fn test_second_build_is_an_error() {
        let orm = FakeOrm::new("main");
        let mut blueprint = Blueprint::new("users", "");
        blueprint.drop();

        let query = orm.query();
        smol::block_on(blueprint.build(query.as_ref(), &NameGrammar)).unwrap();
        let err = smol::block_on(blueprint.build(query.as_ref(), &NameGrammar)).unwrap_err();

        assert!(err.to_string().contains("already been built"));
        assert_eq!(orm.executed(), vec!["drop"]);
    }
}
