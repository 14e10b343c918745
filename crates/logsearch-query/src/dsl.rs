//! Typed subset of the Elasticsearch query DSL.
//!
//! This is the output of compilation. It is deliberately a closed set of
//! query kinds: exactly the ones the tree can produce. `Serialize` renders
//! the JSON the `_search` endpoint accepts.

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use logsearch_types::FuzzyConfig;

use crate::value::{DefaultOperator, Scalar};

/// Boost applied when a leaf does not set one.
pub const DEFAULT_BOOST: f64 = 1.0;

/// Compiled backend query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryObject {
    /// Neutral query matching every document
    MatchAll { boost: f64 },
    Bool(BoolQuery),
    Match(MatchQuery),
    Term(TermQuery),
    Range(RangeQuery),
    QueryString(QueryStringQuery),
    SimpleQueryString(SimpleQueryStringQuery),
}

/// Conjunction / disjunction / exclusion combinator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoolQuery {
    /// Clauses that must all match
    pub must: Vec<QueryObject>,
    /// Clauses that must not match
    pub must_not: Vec<QueryObject>,
    /// Branches of which at least one must match (when no `must` is present)
    pub should: Vec<QueryObject>,
}

/// Analyzed full-text match on one field.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    pub field: String,
    pub query: Scalar,
    pub operator: Option<DefaultOperator>,
    pub fuzzy: Option<FuzzyConfig>,
    pub boost: f64,
}

/// Exact, unanalyzed match on one field.
#[derive(Debug, Clone, PartialEq)]
pub struct TermQuery {
    pub field: String,
    pub value: Scalar,
    pub boost: f64,
}

/// Inclusive range on one field.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    pub field: String,
    pub gte: Scalar,
    pub lte: Scalar,
    pub boost: f64,
}

/// Strict query-string mini language; the backend rejects malformed syntax.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryStringQuery {
    pub query: String,
    pub default_field: Option<String>,
    pub fields: Vec<String>,
    pub default_operator: Option<DefaultOperator>,
    pub fuzzy: Option<FuzzyConfig>,
    pub boost: f64,
}

/// Lenient query-string mini language; malformed fragments are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleQueryStringQuery {
    pub query: String,
    pub fields: Vec<String>,
    pub default_operator: Option<DefaultOperator>,
    pub fuzzy: Option<FuzzyConfig>,
    pub boost: f64,
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bool whose only clauses are exclusions.
    pub fn excluding(clauses: Vec<QueryObject>) -> Self {
        Self {
            must_not: clauses,
            ..Default::default()
        }
    }

    /// Bool whose only clauses are alternative branches.
    pub fn any_of(branches: Vec<QueryObject>) -> Self {
        Self {
            should: branches,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.must_not.is_empty() && self.should.is_empty()
    }

    /// Total number of direct clauses.
    pub fn clause_count(&self) -> usize {
        self.must.len() + self.must_not.len() + self.should.len()
    }

    fn to_json(&self) -> Value {
        let mut body = Map::new();
        for (key, clauses) in [
            ("must", &self.must),
            ("must_not", &self.must_not),
            ("should", &self.should),
        ] {
            if !clauses.is_empty() {
                body.insert(
                    key.to_string(),
                    Value::Array(clauses.iter().map(QueryObject::to_json).collect()),
                );
            }
        }
        json!({ "bool": body })
    }
}

impl QueryObject {
    /// The neutral "match everything" query.
    pub fn match_all() -> Self {
        QueryObject::MatchAll {
            boost: DEFAULT_BOOST,
        }
    }

    /// DSL name of the query kind.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryObject::MatchAll { .. } => "match_all",
            QueryObject::Bool(_) => "bool",
            QueryObject::Match(_) => "match",
            QueryObject::Term(_) => "term",
            QueryObject::Range(_) => "range",
            QueryObject::QueryString(_) => "query_string",
            QueryObject::SimpleQueryString(_) => "simple_query_string",
        }
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, QueryObject::MatchAll { .. })
    }

    /// Whether a strict `query_string` clause appears anywhere in the tree.
    pub fn contains_query_string(&self) -> bool {
        match self {
            QueryObject::QueryString(_) => true,
            QueryObject::Bool(b) => b
                .must
                .iter()
                .chain(&b.must_not)
                .chain(&b.should)
                .any(QueryObject::contains_query_string),
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<&BoolQuery> {
        match self {
            QueryObject::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Boost of a leaf query; combinators carry none.
    pub fn boost(&self) -> Option<f64> {
        match self {
            QueryObject::MatchAll { boost } => Some(*boost),
            QueryObject::Bool(_) => None,
            QueryObject::Match(q) => Some(q.boost),
            QueryObject::Term(q) => Some(q.boost),
            QueryObject::Range(q) => Some(q.boost),
            QueryObject::QueryString(q) => Some(q.boost),
            QueryObject::SimpleQueryString(q) => Some(q.boost),
        }
    }

    /// Replace the boost of a leaf query. Combinators are returned unchanged.
    pub fn with_boost(mut self, value: f64) -> Self {
        match &mut self {
            QueryObject::MatchAll { boost } => *boost = value,
            QueryObject::Bool(_) => {}
            QueryObject::Match(q) => q.boost = value,
            QueryObject::Term(q) => q.boost = value,
            QueryObject::Range(q) => q.boost = value,
            QueryObject::QueryString(q) => q.boost = value,
            QueryObject::SimpleQueryString(q) => q.boost = value,
        }
        self
    }

    /// Render as backend JSON.
    pub fn to_json(&self) -> Value {
        match self {
            QueryObject::MatchAll { boost } => json!({ "match_all": { "boost": boost } }),
            QueryObject::Bool(b) => b.to_json(),
            QueryObject::Match(q) => {
                let mut body = Map::new();
                body.insert("query".to_string(), json!(q.query));
                if let Some(op) = q.operator {
                    body.insert("operator".to_string(), json!(op.as_str()));
                }
                if let Some(fuzzy) = &q.fuzzy {
                    body.insert("fuzziness".to_string(), json!(fuzzy.fuzziness));
                    body.insert("max_expansions".to_string(), json!(fuzzy.max_expansions));
                    body.insert("prefix_length".to_string(), json!(fuzzy.prefix_length));
                    body.insert(
                        "fuzzy_transpositions".to_string(),
                        json!(fuzzy.transpositions),
                    );
                }
                body.insert("boost".to_string(), json!(q.boost));
                json!({ "match": { q.field.clone(): body } })
            }
            QueryObject::Term(q) => json!({
                "term": { q.field.clone(): { "value": q.value, "boost": q.boost } }
            }),
            QueryObject::Range(q) => json!({
                "range": { q.field.clone(): { "gte": q.gte, "lte": q.lte, "boost": q.boost } }
            }),
            QueryObject::QueryString(q) => {
                let mut body = Map::new();
                body.insert("query".to_string(), json!(q.query));
                if let Some(field) = &q.default_field {
                    body.insert("default_field".to_string(), json!(field));
                }
                if !q.fields.is_empty() {
                    body.insert("fields".to_string(), json!(q.fields));
                }
                if let Some(op) = q.default_operator {
                    body.insert("default_operator".to_string(), json!(op.as_str()));
                }
                if let Some(fuzzy) = &q.fuzzy {
                    body.insert("fuzziness".to_string(), json!(fuzzy.fuzziness));
                    body.insert(
                        "fuzzy_max_expansions".to_string(),
                        json!(fuzzy.max_expansions),
                    );
                    body.insert("fuzzy_prefix_length".to_string(), json!(fuzzy.prefix_length));
                    body.insert(
                        "fuzzy_transpositions".to_string(),
                        json!(fuzzy.transpositions),
                    );
                }
                body.insert("boost".to_string(), json!(q.boost));
                json!({ "query_string": body })
            }
            QueryObject::SimpleQueryString(q) => {
                let mut body = Map::new();
                body.insert("query".to_string(), json!(q.query));
                if !q.fields.is_empty() {
                    body.insert("fields".to_string(), json!(q.fields));
                }
                if let Some(op) = q.default_operator {
                    body.insert("default_operator".to_string(), json!(op.as_str()));
                }
                // simple_query_string has no edit-distance parameter; fuzziness is
                // requested per term with the `~` operator.
                if let Some(fuzzy) = &q.fuzzy {
                    body.insert(
                        "fuzzy_max_expansions".to_string(),
                        json!(fuzzy.max_expansions),
                    );
                    body.insert("fuzzy_prefix_length".to_string(), json!(fuzzy.prefix_length));
                    body.insert(
                        "fuzzy_transpositions".to_string(),
                        json!(fuzzy.transpositions),
                    );
                }
                body.insert("boost".to_string(), json!(q.boost));
                json!({ "simple_query_string": body })
            }
        }
    }
}

impl Serialize for QueryObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl std::fmt::Display for QueryObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pretty = serde_json::to_string_pretty(&self.to_json()).map_err(|_| std::fmt::Error)?;
        f.write_str(&pretty)
    }
}
