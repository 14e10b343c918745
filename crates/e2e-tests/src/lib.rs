//! End-to-end test infrastructure for log-search.
//!
//! Provides a shared TestHarness wiring a search client to an in-memory
//! transport, plus helpers producing indexed log documents.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use logsearch_client::{LogIndex, MockTransport, ResultPage, SearchClient};

/// Base time for test documents (2024-01-15 09:00:00 UTC).
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0)
        .single()
        .expect("valid base time")
}

/// Shared test harness for E2E tests.
pub struct TestHarness {
    /// Transport under inspection
    pub transport: Arc<MockTransport>,
    /// Client bound to `transport` and a fixed index name
    pub client: SearchClient,
}

impl TestHarness {
    /// Create a harness whose index is computed for [`base_time`].
    pub fn new() -> Self {
        let transport = Arc::new(MockTransport::new());
        let mut index = LogIndex::new("ea_", "log", "%Y%m%d").expect("valid index format");
        index.recalculate_at(base_time());
        let client = SearchClient::with_shared(transport.clone(), index);
        Self { transport, client }
    }

    /// Queue a page holding `docs` as hits.
    pub async fn respond_with(&self, docs: Vec<Value>) {
        self.transport
            .push_page(ResultPage::from_sources(self.client.index().name(), docs))
            .await;
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// A log document as written by the appender.
pub fn log_document(offset_ms: i64, level: &str, thread: &str, message: &str) -> Value {
    json!({
        "timeMillis": base_time().timestamp_millis() + offset_ms,
        "thread": thread,
        "level": level,
        "loggerName": "com.example.storage.DiskMonitor",
        "message": message,
        "endOfBatch": false,
        "loggerFqcn": "org.apache.logging.log4j.spi.AbstractLogger",
        "threadId": 1,
        "threadPriority": 5,
        "source": {
            "class": "com.example.storage.DiskMonitor",
            "method": "check",
            "file": "DiskMonitor.java",
            "line": 42
        }
    })
}
