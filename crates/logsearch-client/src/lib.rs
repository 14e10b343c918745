//! # logsearch-client
//!
//! Runs compiled log queries against an Elasticsearch-compatible backend.
//!
//! - [`LogIndex`]: date-suffixed index names
//! - [`SearchClient`] / [`BooleanQuery`]: build, sort, paginate and execute
//! - [`SimplifiedSearch`]: flat AND-only search
//! - [`SearchTransport`]: backend seam, with [`HttpTransport`] and [`MockTransport`]
//!
//! ## Usage
//!
//! ```rust,no_run
//! use logsearch_client::{HttpTransport, HttpTransportConfig, LogIndex, SearchClient};
//! use logsearch_types::Field;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new(HttpTransportConfig::anonymous(vec![
//!     "http://localhost:9200".to_string(),
//! ]))?;
//! let client = SearchClient::new(transport, LogIndex::new("ea_", "log", "%Y%m%d")?);
//! let records = client
//!     .boolean_query()
//!     .term(Field::Level, "ERROR")
//!     .execute()
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;
pub mod index;
pub mod mock;
pub mod request;
pub mod response;
pub mod search;
pub mod simplified;
pub mod transport;

pub use error::ClientError;
pub use http::{HttpTransport, HttpTransportConfig};
pub use index::{LogIndex, DEFAULT_DATE_FORMAT};
pub use mock::MockTransport;
pub use request::{SearchRequest, Sort, SortOrder};
pub use response::{Hit, Hits, ResultPage, TotalHits};
pub use search::{BooleanQuery, SearchClient};
pub use simplified::{SimplifiedSearch, DEFAULT_MAX_RESULTS};
pub use transport::SearchTransport;
