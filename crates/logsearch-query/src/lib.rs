//! # logsearch-query
//!
//! Boolean query-expression tree for log search.
//!
//! Callers describe a search condition declaratively as a tree of leaves
//! (match, term, range, query strings) and groups joined by AND/OR, and
//! compile it into the Elasticsearch query DSL.
//!
//! ## Features
//! - Typed leaf values and field binding through the field registry
//! - Fuzzy and keyword-exact leaf encodings
//! - Deterministic grouping of sibling AND/OR/NOT clauses
//! - Pretty JSON rendering via `Display`
//!
//! ## Usage
//!
//! ```rust
//! use logsearch_query::{Group, LeafQuery, Match, Term};
//! use logsearch_types::Field;
//!
//! let query = Group::new()
//!     .add(Match::new(Field::Message, "disk full"))
//!     .add(Term::new(Field::Level, "debug").negated());
//! let json = query.compile().to_json();
//! assert!(json["bool"]["must"].is_array());
//! ```

pub mod compile;
pub mod dsl;
pub mod error;
pub mod group;
pub mod leaf;
pub mod value;

pub use dsl::{
    BoolQuery, MatchQuery, QueryObject, QueryStringQuery, RangeQuery, SimpleQueryStringQuery,
    TermQuery, DEFAULT_BOOST,
};
pub use error::QueryError;
pub use group::{Group, LogicalOperator, Node};
pub use leaf::{
    Leaf, LeafOptions, LeafQuery, LeafValue, Match, Polarity, QueryString, Range, RangeBuilder,
    SimpleQueryString, Term,
};
pub use value::{DefaultOperator, QueryTarget, RangeValue, Scalar};
