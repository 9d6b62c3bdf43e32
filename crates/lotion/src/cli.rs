//! Clap CLI definitions for the `lotion` command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lotion_core::{Cond, Prop};
use serde_json::Value;

/// lotion -- typed page properties and query filters.
#[derive(Parser, Debug)]
#[command(
    name = "lotion",
    about = "Inspect page properties and build query filters",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Config file (default: $LOTION_CONFIG, or lotion.yaml in this or a parent directory).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a page or properties map and print it normalized.
    Properties(PropertiesArgs),

    /// Build a query filter from --where clauses.
    Filter(FilterArgs),

    /// Print version information.
    Version,
}

#[derive(Args, Debug)]
pub struct PropertiesArgs {
    /// JSON file holding a page object or a properties map (default: stdin).
    pub file: Option<PathBuf>,

    /// Print only the title text.
    #[arg(long)]
    pub title: bool,

    /// Drop read-only properties (timestamps, authors, rollups, buttons).
    #[arg(long)]
    pub submittable: bool,
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// A clause as KIND:NAME:COND[=VALUE]; VALUE is read as JSON when it parses, else as a string.
    #[arg(
        long = "where",
        value_name = "KIND:NAME:COND[=VALUE]",
        required = true,
        value_parser = parse_where_clause
    )]
    pub clauses: Vec<WhereClause>,
}

/// One parsed `--where` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub prop: Prop,
    pub name: String,
    pub cond: Cond,
    pub value: Value,
}

/// Splits `KIND:NAME:COND[=VALUE]`. The name may itself contain `:`.
fn parse_where_clause(raw: &str) -> Result<WhereClause, String> {
    let (head, value) = match raw.split_once('=') {
        Some((head, value)) => (
            head,
            serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string())),
        ),
        None => (raw, Value::Null),
    };
    let (kind, rest) = head
        .split_once(':')
        .ok_or_else(|| format!("expected KIND:NAME:COND, got {raw:?}"))?;
    let (name, cond) = rest
        .rsplit_once(':')
        .ok_or_else(|| format!("expected KIND:NAME:COND, got {raw:?}"))?;
    if name.is_empty() {
        return Err(format!("empty property name in {raw:?}"));
    }
    Ok(WhereClause {
        prop: kind.parse().map_err(|e| format!("{e}"))?,
        name: name.to_string(),
        cond: cond.parse().map_err(|e| format!("{e}"))?,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn where_clause_with_string_value() {
        let clause = parse_where_clause("status:State:equals=In progress").unwrap();
        assert_eq!(
            clause,
            WhereClause {
                prop: Prop::Status,
                name: "State".to_string(),
                cond: Cond::Equals,
                value: json!("In progress"),
            }
        );
    }

    #[test]
    fn where_clause_values_are_json_when_they_parse() {
        assert_eq!(parse_where_clause("number:Points:greater_than=3").unwrap().value, json!(3));
        assert_eq!(parse_where_clause("checkbox:Done:equals=true").unwrap().value, json!(true));
        assert_eq!(
            parse_where_clause("date:Due:on_or_after=2024-01-01").unwrap().value,
            json!("2024-01-01")
        );
    }

    #[test]
    fn where_clause_without_value_is_null() {
        let clause = parse_where_clause("title:Name:is_not_empty").unwrap();
        assert_eq!(clause.cond, Cond::IsNotEmpty);
        assert_eq!(clause.value, Value::Null);
    }

    #[test]
    fn where_clause_names_may_contain_colons() {
        let clause = parse_where_clause("rich_text:Note: draft:contains=x").unwrap();
        assert_eq!(clause.name, "Note: draft");
    }

    #[test]
    fn malformed_where_clauses_are_rejected() {
        assert!(parse_where_clause("title").is_err());
        assert!(parse_where_clause("title:is_empty").is_err());
        assert!(parse_where_clause("formula:X:equals=1").is_err());
        assert!(parse_where_clause("title:Name:resembles=1").is_err());
    }
}
