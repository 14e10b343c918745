//! Query compilation E2E tests.
//!
//! Builds trees through the public API only and checks the exact query JSON
//! the backend would receive.

use pretty_assertions::assert_eq;
use serde_json::json;

use logsearch_query::{
    DefaultOperator, Group, LeafQuery, LogicalOperator, Match, QueryError, QueryString, QueryTarget,
    Range, RangeValue, SimpleQueryString, Term,
};
use logsearch_types::{Field, FuzzyConfig};

fn term_json(path: &str, value: &str) -> serde_json::Value {
    json!({ "term": { path: { "value": value, "boost": 1.0 } } })
}

/// Single term on a keyword field targets the exact-match path.
#[test]
fn test_scenario_term_on_keyword_field() {
    let leaf = Term::new(Field::Message, "Testing TERM search.");
    assert_eq!(
        leaf.compile().to_json(),
        json!({ "term": { "message.keyword": {
            "value": "Testing TERM search.",
            "boost": 1.0
        } } })
    );
}

/// AND of two matches yields exactly two required match clauses.
#[test]
fn test_scenario_and_of_two_matches() {
    let query = Group::new()
        .add(Match::new(Field::Message, "disk"))
        .add(Match::new(Field::LoggerName, "storage"))
        .compile();
    assert_eq!(
        query.to_json(),
        json!({ "bool": { "must": [
            { "match": { "message": { "query": "disk", "boost": 1.0 } } },
            { "match": { "loggerName": { "query": "storage", "boost": 1.0 } } }
        ] } })
    );
}

/// OR of three terms yields one required disjunction with three branches.
#[test]
fn test_scenario_or_of_three_terms() {
    let query = Group::with_operator(
        LogicalOperator::Or,
        ["ERROR", "WARN", "FATAL"].map(|level| Term::new(Field::Level, level)),
    )
    .compile();
    assert_eq!(
        query.to_json(),
        json!({ "bool": { "must": [
            { "bool": { "should": [
                term_json("level.keyword", "ERROR"),
                term_json("level.keyword", "WARN"),
                term_json("level.keyword", "FATAL")
            ] } }
        ] } })
    );
}

/// Mixed polarity in one AND bucket keeps both clauses.
#[test]
fn test_scenario_mixed_polarity_and() {
    let query = Group::new()
        .add(Term::new(Field::Level, "error"))
        .add(Term::new(Field::Level, "debug").negated())
        .compile();
    assert_eq!(
        query.to_json(),
        json!({ "bool": { "must": [
            term_json("level.keyword", "error"),
            { "bool": { "must_not": [term_json("level.keyword", "debug")] } }
        ] } })
    );
}

/// A range with only a lower bound fails before anything is compiled.
#[test]
fn test_scenario_range_missing_bound() {
    let result = Range::builder(Field::CreationTimeMs).from(1_000).build();
    assert_eq!(
        result.unwrap_err(),
        QueryError::InvalidRange {
            field: "creationTimeMs".to_string(),
            missing: "to",
        }
    );
}

#[test]
fn test_empty_group_at_any_depth() {
    let mut nested = Group::new();
    for _ in 0..4 {
        nested = Group::new().group(nested);
    }
    assert!(Group::new().compile().is_match_all());

    let mut current = nested.compile();
    for _ in 0..4 {
        let inner = current.as_bool().expect("bool wrapper").must[0].clone();
        current = inner;
    }
    assert!(current.is_match_all());
}

#[test]
fn test_not_equals_bucket_cardinality() {
    for n in 2..5 {
        let group = Group::with_children(
            (0..n).map(|i| Term::new(Field::Thread, format!("worker-{}", i)).negated()),
        );
        let query = group.compile();
        let root = query.as_bool().expect("bool root");
        assert_eq!(root.must.len(), 1);
        assert!(root.must_not.is_empty());
        assert_eq!(root.must[0].as_bool().expect("nested bool").must_not.len(), n);
    }
}

#[test]
fn test_nested_groups_realistic_query() {
    // message ~ "timeout" AND (level = ERROR OR level = FATAL)
    // AND NOT (thread = gc AND source.class = Heartbeat)
    // AND timeMillis in [from, to]
    let levels = Group::new()
        .or(Term::new(Field::Level, "ERROR"))
        .or(Term::new(Field::Level, "FATAL"));
    let noise = Group::new()
        .term(Field::Thread, "gc")
        .term(Field::SourceClass, "Heartbeat")
        .negated();

    let query = Group::new()
        .add(
            Match::new(Field::Message, "timeout")
                .fuzzy(FuzzyConfig::AUTO)
                .operator(DefaultOperator::And),
        )
        .group(levels)
        .group(noise)
        .range(Field::CreationTimeMs, RangeValue::new(1_000, 2_000))
        .compile();

    assert_eq!(
        query.to_json(),
        json!({ "bool": { "must": [
            { "match": { "message": {
                "query": "timeout",
                "operator": "AND",
                "fuzziness": "AUTO",
                "max_expansions": 50,
                "prefix_length": 0,
                "fuzzy_transpositions": true,
                "boost": 1.0
            } } },
            { "bool": { "must": [
                { "bool": { "should": [
                    term_json("level.keyword", "ERROR"),
                    term_json("level.keyword", "FATAL")
                ] } }
            ] } },
            { "range": { "timeMillis": { "gte": 1000, "lte": 2000, "boost": 1.0 } } },
            { "bool": { "must_not": [
                { "bool": { "must": [
                    term_json("thread.keyword", "gc"),
                    term_json("source.class.keyword", "Heartbeat")
                ] } }
            ] } }
        ] } })
    );
}

#[test]
fn test_query_string_leaves() {
    let strict = QueryString::new(
        vec![Field::Message, Field::LoggerName],
        "disk AND (full OR low)",
    )
    .expect("query text present")
    .edit_distance(1)
    .expect("valid distance")
    .with_boost(2.0)
    .expect("finite boost");
    let lenient = SimpleQueryString::new(QueryTarget::AllFields, "disk +full")
        .expect("query text present");

    let query = Group::new().add(strict).or(lenient).compile();
    assert_eq!(
        query.to_json(),
        json!({ "bool": { "must": [
            { "query_string": {
                "query": "disk AND (full OR low)",
                "fields": ["message", "loggerName"],
                "fuzziness": 1,
                "fuzzy_max_expansions": 50,
                "fuzzy_prefix_length": 0,
                "fuzzy_transpositions": true,
                "boost": 2.0
            } },
            { "bool": { "should": [
                { "simple_query_string": { "query": "disk +full", "boost": 1.0 } }
            ] } }
        ] } })
    );
}

#[test]
fn test_display_matches_compiled_json() {
    let group = Group::new()
        .match_value(Field::Message, "disk")
        .or(Term::new(Field::Level, "ERROR"));
    let rendered: serde_json::Value =
        serde_json::from_str(&group.to_string()).expect("display is JSON");
    assert_eq!(rendered, group.compile().to_json());
}
