//! Log Search CLI
//!
//! Builds boolean queries over indexed log records and runs them against an
//! Elasticsearch-compatible backend.
//!
//! # Usage
//!
//! ```bash
//! logsearch compile --must message="disk full" --must-not level=DEBUG
//! logsearch search --term --must level=ERROR --sort creationTimeMs --desc --size 20
//! logsearch fields
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/log-search/config.toml)
//! 3. File given with --config
//! 4. Environment variables (LOGSEARCH_*)
//! 5. CLI flags

use anyhow::Result;
use clap::Parser;

use logsearch_cli::{
    handle_compile, handle_fields, handle_search, init_logging, load_settings, Cli, Commands,
    SearchOptions,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Fields = cli.command {
        handle_fields();
        return Ok(());
    }

    let settings = load_settings(cli.config.as_deref(), cli.log_level.as_deref())?;
    init_logging(&settings)?;

    match cli.command {
        Commands::Compile { query } => {
            handle_compile(&settings, &query)?;
        }
        Commands::Search {
            query,
            from,
            size,
            sort,
            desc,
            index,
            nodes,
        } => {
            let options = SearchOptions {
                from,
                size,
                sort,
                desc,
                index,
                nodes,
            };
            handle_search(settings, &query, options).await?;
        }
        Commands::Fields => handle_fields(),
    }

    Ok(())
}
