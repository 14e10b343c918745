//! Backend transport seam.

use async_trait::async_trait;

use crate::error::ClientError;
use crate::request::SearchRequest;
use crate::response::ResultPage;

/// Executes prepared search requests against a backend.
///
/// Implementations:
/// - `HttpTransport`: REST `_search` over reqwest
/// - `MockTransport`: canned pages for tests
#[async_trait]
pub trait SearchTransport: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<ResultPage, ClientError>;
}
