//! Error types shared across log-search crates.

use thiserror::Error;

/// Field registry lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Name is neither a symbolic field name nor a document path
    #[error("Unknown field: {0}")]
    Unknown(String),
}

/// Invalid fuzzy matching parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FuzzyError {
    /// Fixed edit distance above the backend limit
    #[error("Invalid edit distance {0}: must be 0, 1 or 2")]
    InvalidEditDistance(u8),
}

/// Settings loading or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration sources could not be read or merged
    #[error("Configuration error: {0}")]
    Load(String),

    /// A value was present but unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(e: config::ConfigError) -> Self {
        ConfigError::Load(e.to_string())
    }
}
