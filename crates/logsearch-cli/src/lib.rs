//! Log search command-line library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (compile, search, fields)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, Condition, QueryArgs};
pub use commands::{
    build_query, field_table, handle_compile, handle_fields, handle_search, init_logging,
    load_settings, SearchOptions,
};
