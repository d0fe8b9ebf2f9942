//! Helpers shared by the dialect grammars: identifier quoting, prefixing and
//! literal rendering.

use crate::blueprint::ColumnDefault;

/// Identifier quoting style of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoter {
    /// `"name"` (postgres, sqlite)
    DoubleQuote,
    /// `` `name` `` (mysql)
    Backtick,
    /// `[name]` (sqlserver)
    Bracket,
}

impl Quoter {
    /// Quote one identifier segment, escaping the closing quote character.
    pub fn ident(&self, name: &str) -> String {
        if name == "*" {
            return name.to_string();
        }
        match self {
            Self::DoubleQuote => format!("\"{}\"", name.replace('"', "\"\"")),
            Self::Backtick => format!("`{}`", name.replace('`', "``")),
            Self::Bracket => format!("[{}]", name.replace(']', "]]")),
        }
    }

    /// Quote a possibly dotted name (`schema.table`) segment by segment.
    pub fn wrap(&self, name: &str) -> String {
        name.split('.')
            .map(|segment| self.ident(segment))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quote a table name after prefixing its last segment.
    pub fn table(&self, prefix: &str, table: &str) -> String {
        self.wrap(&prefixed(prefix, table))
    }

    /// Quote and comma-join column names.
    pub fn columns(&self, columns: &[String]) -> String {
        columns
            .iter()
            .map(|column| self.ident(column))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Render a string literal with `'` escaped.
    pub fn value(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }
}

/// Prefix the table part of an optionally schema-qualified name.
pub fn prefixed(prefix: &str, table: &str) -> String {
    match table.rsplit_once('.') {
        Some((schema, name)) => format!("{}.{}{}", schema, prefix, name),
        None => format!("{}{}", prefix, table),
    }
}

/// Split `schema.table` into its parts; the schema is `None` when unqualified.
pub fn split_qualified(name: &str) -> (Option<&str>, &str) {
    match name.rsplit_once('.') {
        Some((schema, table)) => (Some(schema), table),
        None => (None, name),
    }
}

/// Render a column default. `bools` gives the literals for true/false.
pub fn default_value(
    quoter: Quoter,
    default: &ColumnDefault,
    bools: (&str, &str),
) -> String {
    match default {
        ColumnDefault::Expression(sql) => sql.clone(),
        ColumnDefault::String(value) => quoter.value(value),
        ColumnDefault::Int(value) => value.to_string(),
        ColumnDefault::Float(value) => value.to_string(),
        ColumnDefault::Bool(true) => bools.0.to_string(),
        ColumnDefault::Bool(false) => bools.1.to_string(),
    }
}

/// Split a comma-separated catalog list into trimmed, non-empty names.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoting_styles() {
        assert_eq!(Quoter::DoubleQuote.ident("users"), "\"users\"");
        assert_eq!(Quoter::Backtick.ident("we`ird"), "`we``ird`");
        assert_eq!(Quoter::Bracket.ident("a]b"), "[a]]b]");
        assert_eq!(Quoter::Bracket.ident("*"), "*");
    }

    #[test]
    fn test_table_prefixes_last_segment() {
        assert_eq!(prefixed("app_", "users"), "app_users");
        assert_eq!(prefixed("app_", "public.users"), "public.app_users");
        assert_eq!(
            Quoter::DoubleQuote.table("app_", "public.users"),
            "\"public\".\"app_users\""
        );
        assert_eq!(Quoter::Bracket.table("", "dbo.users"), "[dbo].[users]");
    }

    #[test]
    fn test_split_helpers() {
        assert_eq!(split_qualified("public.users"), (Some("public"), "users"));
        assert_eq!(split_qualified("users"), (None, "users"));
        assert_eq!(split_list("id, name,,"), vec!["id", "name"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_value_escaping() {
        assert_eq!(Quoter::DoubleQuote.value("it's"), "'it''s'");
        assert_eq!(
            default_value(Quoter::Backtick, &ColumnDefault::Bool(true), ("'1'", "'0'")),
            "'1'"
        );
    }
}
