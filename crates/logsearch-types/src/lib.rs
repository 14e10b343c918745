//! # logsearch-types
//!
//! Shared domain types for log-search.
//!
//! This crate defines the data every other crate agrees on:
//! - Field registry: the closed set of indexable log record fields
//! - Fuzzy configuration: approximate-match tolerance
//! - Records: the indexed log document as returned by the backend
//! - Settings: layered configuration
//!
//! ## Usage
//!
//! ```rust
//! use logsearch_types::Field;
//!
//! let field = Field::resolve("source.class").unwrap();
//! assert_eq!(field.exact_variant(), "source.class.keyword");
//! ```

pub mod config;
pub mod error;
pub mod field;
pub mod fuzzy;
pub mod record;

pub use config::Settings;
pub use error::{ConfigError, FieldError, FuzzyError};
pub use field::{Field, KEYWORD_SUFFIX};
pub use fuzzy::{EditDistance, Fuzziness, FuzzyConfig, MAX_EDIT_DISTANCE};
pub use record::{LogRecord, Source};
