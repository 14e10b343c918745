//! Search facade.
//!
//! [`SearchClient`] binds a transport to an index. Each call to
//! [`SearchClient::boolean_query`] starts a fresh [`BooleanQuery`]: a root
//! group plus sorting options that can be prepared into a
//! [`SearchRequest`] or executed directly.

use std::sync::Arc;

use tracing::{debug, info};

use logsearch_query::{Group, LogicalOperator, Node, QueryError, QueryTarget, RangeValue, Scalar};
use logsearch_types::{Field, LogRecord};

use crate::error::ClientError;
use crate::index::LogIndex;
use crate::request::{SearchRequest, Sort, SortOrder};
use crate::response::ResultPage;
use crate::simplified::SimplifiedSearch;
use crate::transport::SearchTransport;

/// Entry point for building and running searches against one index.
#[derive(Clone)]
pub struct SearchClient {
    transport: Arc<dyn SearchTransport>,
    index: LogIndex,
}

impl SearchClient {
    pub fn new(transport: impl SearchTransport + 'static, index: LogIndex) -> Self {
        Self::with_shared(Arc::new(transport), index)
    }

    /// Create from a transport that is also held elsewhere (e.g. a mock under inspection).
    pub fn with_shared(transport: Arc<dyn SearchTransport>, index: LogIndex) -> Self {
        Self { transport, index }
    }

    pub fn index(&self) -> &LogIndex {
        &self.index
    }

    /// Mutable access, e.g. to recalculate the index name after midnight.
    pub fn index_mut(&mut self) -> &mut LogIndex {
        &mut self.index
    }

    /// Start a new query against the current index name.
    pub fn boolean_query(&self) -> BooleanQuery {
        BooleanQuery {
            transport: Arc::clone(&self.transport),
            index: self.index.name().to_string(),
            root: Group::new(),
            sort_field: None,
            sort_order: SortOrder::Asc,
            sorting: false,
        }
    }

    /// Start a simplified, flat search.
    pub fn simplified(&self) -> SimplifiedSearch {
        SimplifiedSearch::new(self.clone())
    }
}

/// Root group of a search plus its sorting options.
#[derive(Clone)]
pub struct BooleanQuery {
    transport: Arc<dyn SearchTransport>,
    index: String,
    root: Group,
    sort_field: Option<Field>,
    sort_order: SortOrder,
    sorting: bool,
}

impl BooleanQuery {
    /// Enable sorting. Takes effect only once a sort field is set.
    pub fn use_sorting(mut self) -> Self {
        self.sorting = true;
        self
    }

    pub fn no_sorting(mut self) -> Self {
        self.sorting = false;
        self
    }

    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    pub fn sorting_on_field(mut self, field: Field) -> Self {
        self.sort_field = Some(field);
        self
    }

    /// Replace the root group.
    pub fn with_root(mut self, root: Group) -> Self {
        self.root = root;
        self
    }

    pub fn add(self, node: impl Into<Node>) -> Self {
        self.add_with(LogicalOperator::And, node)
    }

    pub fn or(self, node: impl Into<Node>) -> Self {
        self.add_with(LogicalOperator::Or, node)
    }

    pub fn add_with(mut self, operator: LogicalOperator, node: impl Into<Node>) -> Self {
        self.root.push(operator, node);
        self
    }

    pub fn group(self, group: Group) -> Self {
        self.add(group)
    }

    pub fn term(mut self, field: Field, value: impl Into<Scalar>) -> Self {
        self.root = self.root.term(field, value);
        self
    }

    pub fn match_value(mut self, field: Field, value: impl Into<Scalar>) -> Self {
        self.root = self.root.match_value(field, value);
        self
    }

    pub fn range(mut self, field: Field, value: RangeValue) -> Self {
        self.root = self.root.range(field, value);
        self
    }

    pub fn query_string(
        mut self,
        target: impl Into<QueryTarget>,
        query: impl Into<String>,
    ) -> Result<Self, QueryError> {
        self.root = self.root.query_string(target, query)?;
        Ok(self)
    }

    pub fn simple_query_string(
        mut self,
        target: impl Into<QueryTarget>,
        query: impl Into<String>,
    ) -> Result<Self, QueryError> {
        self.root = self.root.simple_query_string(target, query)?;
        Ok(self)
    }

    /// In-place append for callers holding the query mutably.
    pub fn push(&mut self, operator: LogicalOperator, node: impl Into<Node>) {
        self.root.push(operator, node);
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    fn sort(&self) -> Option<Sort> {
        if !self.sorting {
            return None;
        }
        self.sort_field.map(|field| Sort::new(field, self.sort_order))
    }

    /// Compile the root group into an unpaginated request.
    pub fn prepare_request(&self) -> SearchRequest {
        let mut request = SearchRequest::new(self.index.clone(), self.root.compile());
        request.sort = self.sort();
        debug!(index = %request.index, sorted = request.sort.is_some(), "Prepared search request");
        request
    }

    pub fn prepare_paginated_request(&self, from: u32, size: u32) -> SearchRequest {
        self.prepare_request().paginate(from, size)
    }

    pub async fn execute_raw(&self) -> Result<ResultPage, ClientError> {
        self.run(self.prepare_request()).await
    }

    pub async fn execute_paginated_raw(&self, from: u32, size: u32) -> Result<ResultPage, ClientError> {
        self.run(self.prepare_paginated_request(from, size)).await
    }

    /// Execute and decode the hits into log records.
    pub async fn execute(&self) -> Result<Vec<LogRecord>, ClientError> {
        Ok(self.execute_raw().await?.records())
    }

    pub async fn execute_paginated(&self, from: u32, size: u32) -> Result<Vec<LogRecord>, ClientError> {
        Ok(self.execute_paginated_raw(from, size).await?.records())
    }

    async fn run(&self, request: SearchRequest) -> Result<ResultPage, ClientError> {
        let page = self.transport.search(&request).await?;
        info!(
            index = %request.index,
            hits = page.len(),
            total = page.total(),
            took_ms = page.took,
            "Search executed"
        );
        Ok(page)
    }
}

/// Pretty JSON of the compiled root group.
impl std::fmt::Display for BooleanQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.root, f)
    }
}
