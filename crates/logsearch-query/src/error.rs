//! Query construction error types.
//!
//! Every variant is raised while the tree is being built, never during
//! compilation: a tree that was constructed successfully always compiles.

use logsearch_types::{FieldError, FuzzyError};
use thiserror::Error;

/// Errors that can occur while assembling a query tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// Field name is not part of the registry
    #[error(transparent)]
    UnknownField(#[from] FieldError),

    /// Query-string leaf built without query text
    #[error("Query value is missing: query-string leaves require non-blank query text")]
    MissingQueryValue,

    /// Range leaf built without one of its bounds
    #[error("Invalid range on field {field}: missing '{missing}' bound")]
    InvalidRange {
        field: String,
        missing: &'static str,
    },

    /// Fuzzy parameters the backend would reject
    #[error(transparent)]
    InvalidFuzziness(#[from] FuzzyError),

    /// Boost that is negative, infinite or NaN
    #[error("Invalid boost {0}: must be a finite, non-negative number")]
    InvalidBoost(f64),
}
