//! Flat search builder for the common cases.
//!
//! Every condition is added under AND to a single root group. Nothing is
//! built until the first condition is added, so executing a fresh search is
//! an error rather than a silent match-everything.

use logsearch_query::{LogicalOperator, Match, QueryString, Scalar, SimpleQueryString, Term};
use logsearch_types::{Field, LogRecord};

use crate::error::ClientError;
use crate::search::{BooleanQuery, SearchClient};

/// Default number of hits of a paginated simplified search.
pub const DEFAULT_MAX_RESULTS: u32 = 10;

pub struct SimplifiedSearch {
    client: SearchClient,
    query: Option<BooleanQuery>,
    paginated: bool,
    from: u32,
    max_results: u32,
}

impl SimplifiedSearch {
    pub fn new(client: SearchClient) -> Self {
        Self {
            client,
            query: None,
            paginated: false,
            from: 0,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    fn query_mut(&mut self) -> &mut BooleanQuery {
        let client = &self.client;
        self.query.get_or_insert_with(|| client.boolean_query())
    }

    /// Analyzed (full-text) match on `field`.
    pub fn fulltext(&mut self, field: Field, value: impl Into<Scalar>) -> &mut Self {
        self.query_mut().push(LogicalOperator::And, Match::new(field, value));
        self
    }

    /// Query-string search on `field`: the lenient syntax when `safe`, else the strict one.
    pub fn fulltext_query(
        &mut self,
        field: Field,
        query: impl Into<String>,
        safe: bool,
    ) -> Result<&mut Self, ClientError> {
        if safe {
            let leaf = SimpleQueryString::new(field, query)?;
            self.query_mut().push(LogicalOperator::And, leaf);
        } else {
            let leaf = QueryString::new(field, query)?;
            self.query_mut().push(LogicalOperator::And, leaf);
        }
        Ok(self)
    }

    /// Exact term match when `exact`, else analyzed match.
    pub fn matches(&mut self, field: Field, value: impl Into<Scalar>, exact: bool) -> &mut Self {
        if exact {
            self.query_mut().push(LogicalOperator::And, Term::new(field, value));
        } else {
            self.query_mut().push(LogicalOperator::And, Match::new(field, value));
        }
        self
    }

    /// Return at most `max_results` hits starting at `from`.
    pub fn paginated(&mut self, from: u32, max_results: u32) -> &mut Self {
        self.paginated = true;
        self.from = from;
        self.max_results = max_results;
        self
    }

    /// Drop every condition added so far.
    pub fn reset(&mut self) -> &mut Self {
        self.query = Some(self.client.boolean_query());
        self
    }

    /// Rendered query JSON, or an empty string before the first condition.
    pub fn query_string(&self) -> String {
        self.query
            .as_ref()
            .map(|q| q.to_string())
            .unwrap_or_default()
    }

    pub async fn execute(&self) -> Result<Vec<LogRecord>, ClientError> {
        let query = self.query.as_ref().ok_or(ClientError::EmptyQuery)?;
        if self.paginated {
            query.execute_paginated(self.from, self.max_results).await
        } else {
            query.execute().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::LogIndex;
    use crate::mock::MockTransport;
    use logsearch_query::QueryError;
    use serde_json::json;
    use std::sync::Arc;

    fn search_with(mock: Arc<MockTransport>) -> SimplifiedSearch {
        let index = LogIndex::new("ea_", "log", "%Y%m%d").unwrap();
        SearchClient::with_shared(mock, index).simplified()
    }

    #[tokio::test]
    async fn test_execute_before_any_condition() {
        let search = search_with(Arc::new(MockTransport::new()));
        assert_eq!(search.query_string(), "");
        assert!(matches!(search.execute().await, Err(ClientError::EmptyQuery)));
    }

    #[test]
    fn test_conditions_are_conjunctive() {
        let mut search = search_with(Arc::new(MockTransport::new()));
        search
            .fulltext(Field::Message, "disk")
            .matches(Field::Level, "ERROR", true)
            .matches(Field::LoggerName, "storage", false);
        let rendered: serde_json::Value = serde_json::from_str(&search.query_string()).unwrap();
        let must = rendered["bool"]["must"].as_array().unwrap();
        assert_eq!(must.len(), 3);
        assert!(must[0].get("match").is_some());
        assert!(must[1]["term"].get("level.keyword").is_some());
        assert!(must[2]["match"].get("loggerName").is_some());
    }

    #[test]
    fn test_fulltext_query_safe_and_strict() {
        let mut search = search_with(Arc::new(MockTransport::new()));
        search
            .fulltext_query(Field::Message, "disk | memory", true)
            .unwrap()
            .fulltext_query(Field::Message, "disk OR memory", false)
            .unwrap();
        let rendered = search.query_string();
        assert!(rendered.contains("simple_query_string"));
        assert!(rendered.contains("\"query_string\""));

        let err = search.fulltext_query(Field::Message, " ", true).err();
        assert!(matches!(
            err,
            Some(ClientError::Query(QueryError::MissingQueryValue))
        ));
    }

    #[tokio::test]
    async fn test_paginated_execution() {
        let mock = Arc::new(MockTransport::new());
        mock.push_page(crate::ResultPage::from_sources(
            "ea_log",
            vec![json!({ "message": "disk full" })],
        ))
        .await;
        let mut search = search_with(Arc::clone(&mock));
        search.fulltext(Field::Message, "disk").paginated(5, 20);

        let records = search.execute().await.unwrap();
        assert_eq!(records.len(), 1);
        let sent = mock.last_request().await.unwrap();
        assert_eq!((sent.from, sent.size), (Some(5), Some(20)));
    }

    #[test]
    fn test_reset_clears_conditions() {
        let mut search = search_with(Arc::new(MockTransport::new()));
        search.fulltext(Field::Message, "disk");
        search.reset();
        let rendered: serde_json::Value = serde_json::from_str(&search.query_string()).unwrap();
        assert_eq!(rendered, json!({ "match_all": { "boost": 1.0 } }));
    }
}
