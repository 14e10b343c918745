//! Error types for the search client.

use logsearch_query::QueryError;
use thiserror::Error;

/// Errors that can occur while preparing or executing a search.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Backend rejected the syntax of a query-string leaf
    #[error("Malformed query string: {reason}")]
    MalformedQueryString { reason: String },

    /// Backend answered with a non-success status
    #[error("Backend returned HTTP {status}: {body}")]
    Backend { status: u16, body: String },

    /// Request could not be sent or no node was reachable
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Response body could not be decoded
    #[error("Failed to decode search response: {0}")]
    Deserialize(String),

    /// Execution requested before any condition was added
    #[error("Cannot execute an empty query")]
    EmptyQuery,

    /// Transport constructed without any node to talk to
    #[error("No search nodes configured")]
    NoNodes,

    /// Invalid client configuration
    #[error("Invalid client configuration: {0}")]
    Config(String),

    /// Query tree could not be built
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Deserialize(e.to_string())
        } else {
            ClientError::Http(e.to_string())
        }
    }
}
