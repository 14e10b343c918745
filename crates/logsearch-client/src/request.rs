//! Search request preparation.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use logsearch_query::QueryObject;
use logsearch_types::Field;

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Sort on one field. Rendered against the field's exact-match path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: Field,
    pub order: SortOrder,
}

impl Sort {
    pub fn new(field: Field, order: SortOrder) -> Self {
        Self { field, order }
    }

    fn to_json(self) -> Value {
        json!({ self.field.exact_variant(): { "order": self.order.as_str() } })
    }
}

/// A compiled query addressed to an index, ready for a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Target index name
    pub index: String,

    /// Compiled query
    pub query: QueryObject,

    /// Optional sort
    pub sort: Option<Sort>,

    /// Offset of the first hit
    pub from: Option<u32>,

    /// Maximum number of hits
    pub size: Option<u32>,
}

impl SearchRequest {
    pub fn new(index: impl Into<String>, query: QueryObject) -> Self {
        Self {
            index: index.into(),
            query,
            sort: None,
            from: None,
            size: None,
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn paginate(mut self, from: u32, size: u32) -> Self {
        self.from = Some(from);
        self.size = Some(size);
        self
    }

    /// JSON body for the `_search` endpoint.
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        body.insert("query".to_string(), self.query.to_json());
        if let Some(sort) = self.sort {
            body.insert("sort".to_string(), json!([sort.to_json()]));
        }
        if let Some(from) = self.from {
            body.insert("from".to_string(), json!(from));
        }
        if let Some(size) = self.size {
            body.insert("size".to_string(), json!(size));
        }
        Value::Object(body)
    }
}
