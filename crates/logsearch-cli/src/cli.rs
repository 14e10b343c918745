//! CLI argument parsing for the log search tool.
//!
//! CLI flags override every other configuration source.

use clap::{Args, Parser, Subcommand};

/// Log Search
///
/// Build boolean queries over indexed log records and run them against an
/// Elasticsearch-compatible backend.
#[derive(Parser, Debug)]
#[command(name = "logsearch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/log-search/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the compiled query JSON without contacting the backend
    Compile {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Run a query and print the matching log records
    Search {
        #[command(flatten)]
        query: QueryArgs,

        /// Offset of the first record
        #[arg(long, default_value = "0")]
        from: u32,

        /// Maximum number of records (default from config)
        #[arg(long)]
        size: Option<u32>,

        /// Field to sort on
        #[arg(long, value_name = "FIELD")]
        sort: Option<String>,

        /// Sort descending instead of ascending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Index base name (default from config)
        #[arg(long)]
        index: Option<String>,

        /// Backend node URL; repeat to fail over between nodes (default from config)
        #[arg(long = "node", value_name = "URL")]
        nodes: Vec<String>,
    },

    /// List the searchable fields
    Fields,
}

/// Conditions shared by `compile` and `search`.
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Condition that must hold
    #[arg(long = "must", value_name = "FIELD=VALUE", value_parser = parse_condition)]
    pub must: Vec<Condition>,

    /// Condition that must not hold
    #[arg(long = "must-not", value_name = "FIELD=VALUE", value_parser = parse_condition)]
    pub must_not: Vec<Condition>,

    /// Alternative conditions; at least one must hold
    #[arg(long = "should", value_name = "FIELD=VALUE", value_parser = parse_condition)]
    pub should: Vec<Condition>,

    /// Compare values exactly instead of full-text matching
    #[arg(long)]
    pub term: bool,

    /// Apply fuzzy matching (parameters from config, AUTO otherwise)
    #[arg(long)]
    pub fuzzy: bool,

    /// Query in the strict query-string syntax
    #[arg(long, conflicts_with = "safe_query")]
    pub query: Option<String>,

    /// Query in the lenient query-string syntax
    #[arg(long)]
    pub safe_query: Option<String>,

    /// Field searched by --query/--safe-query; repeatable, all fields when absent
    #[arg(long = "query-field", value_name = "FIELD")]
    pub query_fields: Vec<String>,
}

/// `FIELD=VALUE` pair from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: String,
    pub value: String,
}

fn parse_condition(s: &str) -> Result<Condition, String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", s))?;
    if field.trim().is_empty() {
        return Err(format!("missing field name in '{}'", s));
    }
    Ok(Condition {
        field: field.trim().to_string(),
        value: value.to_string(),
    })
}
