//! Command implementations.

use anyhow::{Context, Result};
use tracing::{debug, info};

use logsearch_client::{HttpTransport, LogIndex, SearchClient, SortOrder};
use logsearch_query::{
    Group, Leaf, LeafQuery, Match, QueryString, QueryTarget, SimpleQueryString, Term,
};
use logsearch_types::{Field, FuzzyConfig, Settings};

use crate::cli::{Condition, QueryArgs};

/// Load settings and apply the global CLI overrides.
pub fn load_settings(config_path: Option<&str>, log_level: Option<&str>) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;
    if let Some(level) = log_level {
        settings.log_level = level.to_string();
    }
    Ok(settings)
}

/// Install the tracing subscriber. Logs go to stderr so stdout stays machine readable.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

fn condition_leaf(
    condition: &Condition,
    args: &QueryArgs,
    fuzzy: Option<FuzzyConfig>,
) -> Result<Leaf> {
    let leaf: Leaf = if args.term {
        Term::resolve(&condition.field, condition.value.as_str())?.into()
    } else {
        Match::resolve(&condition.field, condition.value.as_str())?
            .with_fuzzy(fuzzy)
            .into()
    };
    Ok(leaf)
}

/// Build the root group described by the command-line conditions.
///
/// `--must` conditions are joined with AND, `--must-not` conditions are
/// negated and joined with AND, `--should` conditions form one disjunction.
pub fn build_query(args: &QueryArgs, settings: &Settings) -> Result<Group> {
    let fuzzy = args
        .fuzzy
        .then(|| settings.fuzzy.unwrap_or(FuzzyConfig::AUTO));

    let mut root = Group::new();
    for condition in &args.must {
        root = root.add(condition_leaf(condition, args, fuzzy)?);
    }
    for condition in &args.must_not {
        root = root.add(condition_leaf(condition, args, fuzzy)?.negated());
    }
    for condition in &args.should {
        root = root.or(condition_leaf(condition, args, fuzzy)?);
    }

    if args.query.is_some() || args.safe_query.is_some() {
        let fields = args
            .query_fields
            .iter()
            .map(|name| Field::resolve(name))
            .collect::<Result<Vec<_>, _>>()
            .context("Invalid --query-field")?;
        let target = QueryTarget::from(fields);

        if let Some(query) = &args.query {
            root = root.add(QueryString::new(target.clone(), query.as_str())?.with_fuzzy(fuzzy));
        }
        if let Some(query) = &args.safe_query {
            root = root.add(SimpleQueryString::new(target, query.as_str())?.with_fuzzy(fuzzy));
        }
    }

    debug!(children = root.len(), "Built query from command line");
    Ok(root)
}

/// Print the compiled query.
pub fn handle_compile(settings: &Settings, args: &QueryArgs) -> Result<()> {
    let query = build_query(args, settings)?;
    println!("{}", query);
    Ok(())
}

/// Options of the `search` command besides the conditions.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub from: u32,
    pub size: Option<u32>,
    pub sort: Option<String>,
    pub desc: bool,
    pub index: Option<String>,
    pub nodes: Vec<String>,
}

/// Run the query against the configured backend and print the records.
pub async fn handle_search(
    mut settings: Settings,
    args: &QueryArgs,
    options: SearchOptions,
) -> Result<()> {
    if !options.nodes.is_empty() {
        settings.nodes = options.nodes.clone();
        settings.validate().context("Invalid --node")?;
    }

    let root = build_query(args, &settings)?;
    let transport =
        HttpTransport::from_settings(&settings).context("Failed to create HTTP transport")?;
    let index = match &options.index {
        Some(name) => LogIndex::standard(&settings, name.clone()),
        None => LogIndex::from_settings(&settings),
    }
    .context("Invalid index configuration")?;
    info!(index = %index, nodes = ?settings.nodes, "Searching");

    let client = SearchClient::new(transport, index);
    let mut query = client.boolean_query().with_root(root);
    if let Some(name) = &options.sort {
        let field = Field::resolve(name).context("Invalid --sort field")?;
        let order = if options.desc {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        };
        query = query.use_sorting().sorting_on_field(field).sort_order(order);
    }

    let size = options.size.unwrap_or(settings.default_page_size);
    let records = query
        .execute_paginated(options.from, size)
        .await
        .context("Search failed")?;

    for record in &records {
        println!("{}", record);
    }
    eprintln!("{} record(s)", records.len());
    Ok(())
}

/// One line per registered field: name, document path and exact-match path.
pub fn field_table() -> Vec<String> {
    let mut lines = vec![format!("{:<24} {:<24} {}", "FIELD", "PATH", "EXACT")];
    lines.extend(
        Field::ALL
            .iter()
            .map(|f| format!("{:<24} {:<24} {}", f.name(), f.path(), f.exact_variant())),
    );
    lines
}

pub fn handle_fields() {
    for line in field_table() {
        println!("{}", line);
    }
}
