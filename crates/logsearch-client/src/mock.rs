//! In-memory transport for testing.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::ClientError;
use crate::request::SearchRequest;
use crate::response::ResultPage;
use crate::transport::SearchTransport;

/// Transport that records every request and replays queued responses.
///
/// Once the queue is drained every search returns an empty page.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<ResultPage, ClientError>>>,
    requests: Mutex<Vec<SearchRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a single queued page.
    pub fn with_page(page: ResultPage) -> Self {
        let mut responses = VecDeque::new();
        responses.push_back(Ok(page));
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub async fn push_page(&self, page: ResultPage) {
        self.responses.lock().await.push_back(Ok(page));
    }

    pub async fn push_error(&self, error: ClientError) {
        self.responses.lock().await.push_back(Err(error));
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn last_request(&self) -> Option<SearchRequest> {
        self.requests.lock().await.last().cloned()
    }
}

#[async_trait]
impl SearchTransport for MockTransport {
    async fn search(&self, request: &SearchRequest) -> Result<ResultPage, ClientError> {
        self.requests.lock().await.push(request.clone());
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(ResultPage::empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsearch_query::QueryObject;
    use serde_json::json;

    #[tokio::test]
    async fn test_replays_then_empty() {
        let mock = MockTransport::with_page(ResultPage::from_sources(
            "idx",
            vec![json!({ "message": "a" })],
        ));
        mock.push_error(ClientError::EmptyQuery).await;

        let request = SearchRequest::new("idx", QueryObject::match_all());
        assert_eq!(mock.search(&request).await.unwrap().len(), 1);
        assert!(matches!(
            mock.search(&request).await,
            Err(ClientError::EmptyQuery)
        ));
        assert!(mock.search(&request).await.unwrap().is_empty());
        assert_eq!(mock.requests().await.len(), 3);
    }
}
