//! Error path E2E tests for log-search.
//!
//! Construction errors surface before any request is sent; backend errors
//! surface unchanged from execution. No test should cause a panic.

use pretty_assertions::assert_eq;

use e2e_tests::TestHarness;
use logsearch_client::ClientError;
use logsearch_query::{Group, LeafQuery, Match, QueryError, QueryString, SimpleQueryString, Term};
use logsearch_types::{Field, FieldError, Fuzziness, FuzzyError};

#[test]
fn test_unknown_field_fails_fast() {
    let err = Term::resolve("hostname", "web-1").unwrap_err();
    assert_eq!(
        err,
        QueryError::UnknownField(FieldError::Unknown("hostname".to_string()))
    );
    assert_eq!(err.to_string(), "Unknown field: hostname");
    assert!(Match::resolve("source.method", "check").is_ok());
}

#[test]
fn test_missing_query_text() {
    assert_eq!(
        QueryString::from_optional(Field::Message, None).unwrap_err(),
        QueryError::MissingQueryValue
    );
    assert_eq!(
        SimpleQueryString::new(Field::Message, "").unwrap_err(),
        QueryError::MissingQueryValue
    );
    assert!(Group::new().query_string(Field::Message, "\t").is_err());
}

#[test]
fn test_invalid_fuzziness() {
    let err = Match::new(Field::Message, "tmeout")
        .edit_distance(3)
        .unwrap_err();
    assert_eq!(
        err,
        QueryError::InvalidFuzziness(FuzzyError::InvalidEditDistance(3))
    );
    assert!(Fuzziness::fixed(3).is_err());
}

#[test]
fn test_invalid_boost() {
    let err = Term::new(Field::Level, "ERROR").with_boost(f64::NAN).unwrap_err();
    assert!(matches!(err, QueryError::InvalidBoost(b) if b.is_nan()));
}

#[tokio::test]
async fn test_execute_empty_simplified_search() {
    let harness = TestHarness::new();
    let search = harness.client.simplified();
    let err = search.execute().await.unwrap_err();
    assert!(matches!(err, ClientError::EmptyQuery));
    assert!(harness.transport.requests().await.is_empty());
}

#[tokio::test]
async fn test_malformed_query_string_propagates() {
    let harness = TestHarness::new();
    harness
        .transport
        .push_error(ClientError::MalformedQueryString {
            reason: "Failed to parse query [disk AND (]".to_string(),
        })
        .await;

    let query = harness
        .client
        .boolean_query()
        .query_string(Field::Message, "disk AND (")
        .expect("text present");
    let err = query.execute().await.unwrap_err();
    match err {
        ClientError::MalformedQueryString { reason } => assert!(reason.contains("disk AND (")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_backend_error_propagates() {
    let harness = TestHarness::new();
    harness
        .transport
        .push_error(ClientError::Backend {
            status: 503,
            body: "unavailable".to_string(),
        })
        .await;

    let err = harness.client.boolean_query().execute().await.unwrap_err();
    assert_eq!(err.to_string(), "Backend returned HTTP 503: unavailable");
}
