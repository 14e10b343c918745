//! REST transport for Elasticsearch-compatible backends.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, warn};

use logsearch_types::Settings;

use crate::error::ClientError;
use crate::request::SearchRequest;
use crate::response::ResultPage;
use crate::transport::SearchTransport;

/// Configuration for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Base URLs of the backend nodes, tried in order
    pub nodes: Vec<String>,

    /// Basic-auth user; requests are anonymous when absent
    pub username: Option<String>,

    /// Basic-auth password
    pub password: Option<SecretString>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl HttpTransportConfig {
    /// Anonymous access to the given nodes with a 30 second timeout.
    pub fn anonymous(nodes: Vec<String>) -> Self {
        Self {
            nodes,
            username: None,
            password: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(SecretString::from(password.into()));
        self
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            nodes: settings.nodes.clone(),
            username: settings.username.clone().filter(|u| !u.is_empty()),
            password: settings.password.clone().map(SecretString::from),
            timeout: Duration::from_secs(settings.request_timeout_secs),
        }
    }
}

/// Sends `_search` requests over HTTP, failing over between nodes.
pub struct HttpTransport {
    client: Client,
    config: HttpTransportConfig,
}

impl HttpTransport {
    /// Create a new transport.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NoNodes` if no node is configured and
    /// `ClientError::Config` if the HTTP client cannot be built.
    pub fn new(config: HttpTransportConfig) -> Result<Self, ClientError> {
        if config.nodes.is_empty() {
            return Err(ClientError::NoNodes);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ClientError> {
        Self::new(HttpTransportConfig::from_settings(settings))
    }

    pub fn nodes(&self) -> &[String] {
        &self.config.nodes
    }

    fn search_url(node: &str, index: &str) -> String {
        format!("{}/{}/_search", node.trim_end_matches('/'), index)
    }

    /// Send one request to one node.
    async fn send(&self, node: &str, request: &SearchRequest) -> Result<ResultPage, SendError> {
        let url = Self::search_url(node, &request.index);
        debug!(url = %url, "Sending search request");

        let mut builder = self.client.post(&url).json(&request.body());
        if let Some(username) = &self.config.username {
            builder = builder.basic_auth(
                username,
                self.config.password.as_ref().map(|p| p.expose_secret()),
            );
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                SendError::Unreachable(e.to_string())
            } else {
                SendError::Fatal(ClientError::from(e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response.text().await);
            let strict_query = request.query.contains_query_string();
            return Err(SendError::Fatal(error_from_status(status, body, strict_query)));
        }

        response
            .json::<ResultPage>()
            .await
            .map_err(|e| SendError::Fatal(ClientError::Deserialize(e.to_string())))
    }
}

enum SendError {
    /// Node could not be reached; the next node is tried
    Unreachable(String),
    Fatal(ClientError),
}

#[async_trait]
impl SearchTransport for HttpTransport {
    async fn search(&self, request: &SearchRequest) -> Result<ResultPage, ClientError> {
        let mut last_error = None;

        for node in &self.config.nodes {
            match self.send(node, request).await {
                Ok(page) => return Ok(page),
                Err(SendError::Fatal(e)) => return Err(e),
                Err(SendError::Unreachable(reason)) => {
                    warn!(node = %node, error = %reason, "Search node unreachable, trying next");
                    last_error = Some(reason);
                }
            }
        }

        Err(ClientError::Http(format!(
            "no search node reachable: {}",
            last_error.unwrap_or_default()
        )))
    }
}

/// Body of an error response, or the reason it could not be read.
fn error_body<E: std::fmt::Display>(body: Result<String, E>) -> String {
    body.unwrap_or_else(|e| format!("failed to read response body: {}", e))
}

/// Map a non-success response to an error.
///
/// Only requests carrying a strict `query_string` clause can be rejected as
/// malformed query strings; every other failure is a backend error.
fn error_from_status(status: StatusCode, body: String, strict_query: bool) -> ClientError {
    if status == StatusCode::BAD_REQUEST && strict_query {
        if let Some(reason) = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| malformed_query_reason(&v))
        {
            return ClientError::MalformedQueryString { reason };
        }
    }

    ClientError::Backend {
        status: status.as_u16(),
        body,
    }
}

/// Reason of a query-string parse failure inside a backend error body.
///
/// The backend reports these as a `query_shard_exception` ("Failed to parse
/// query [...]") caused by a `parse_exception`, either at the top level or
/// in `root_cause` / `failed_shards`.
fn malformed_query_reason(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    let mut pending = vec![error];

    while let Some(node) = pending.pop() {
        let kind = node.get("type").and_then(Value::as_str).unwrap_or_default();
        let reason = node.get("reason").and_then(Value::as_str).unwrap_or_default();

        if is_query_parser_failure(kind, reason) {
            return Some(reason.to_string());
        }

        if let Some(cause) = node.get("caused_by") {
            pending.push(cause);
        }
        if let Some(roots) = node.get("root_cause").and_then(Value::as_array) {
            pending.extend(roots.iter());
        }
        if let Some(shards) = node.get("failed_shards").and_then(Value::as_array) {
            pending.extend(shards.iter().filter_map(|s| s.get("reason")));
        }
    }

    None
}

/// Signature of the query-string parser rejecting its input. Other parse
/// failures (dates, numbers) share the `parse_exception` type but not these
/// reasons.
fn is_query_parser_failure(kind: &str, reason: &str) -> bool {
    match kind {
        "query_shard_exception" => reason.starts_with("Failed to parse query ["),
        "parse_exception" => reason.starts_with("Cannot parse '"),
        _ => false,
    }
}
