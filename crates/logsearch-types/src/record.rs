//! Indexed log document.
//!
//! Mirrors the JSON layout produced by the appender: every property is
//! optional and unknown properties are kept in `additional` so that hits from
//! differently configured appenders still decode.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Location in the source code that emitted the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(rename = "class", default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_loader_name: Option<String>,

    #[serde(flatten)]
    pub additional: HashMap<String, serde_json::Value>,
}

/// A single log event as stored in the search backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    /// Creation time in milliseconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_millis: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logger_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_of_batch: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logger_fqcn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_map: Option<HashMap<String, serde_json::Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_priority: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,

    #[serde(flatten)]
    pub additional: HashMap<String, serde_json::Value>,
}

impl LogRecord {
    /// Creation time as a UTC timestamp, if present and representable.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.time_millis
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }

    /// Deserialize a record from a hit's `_source` object.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

impl std::fmt::Display for LogRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let time = self
            .timestamp()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "{} {:<5} [{}] {}: {}",
            time,
            self.level.as_deref().unwrap_or("-"),
            self.thread.as_deref().unwrap_or("-"),
            self.logger_name.as_deref().unwrap_or("-"),
            self.message.as_deref().unwrap_or("")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_appender_document() {
        let doc = json!({
            "timeMillis": 1_700_000_000_123_i64,
            "thread": "main",
            "level": "ERROR",
            "loggerName": "com.example.App",
            "message": "Testing TERM search.",
            "endOfBatch": false,
            "loggerFqcn": "org.apache.logging.log4j.spi.AbstractLogger",
            "threadId": 1,
            "threadPriority": 5,
            "source": {
                "class": "com.example.App",
                "method": "main",
                "file": "App.java",
                "line": 42
            }
        });

        let record = LogRecord::from_value(doc).unwrap();
        assert_eq!(record.level.as_deref(), Some("ERROR"));
        assert_eq!(record.thread_id, Some(1));
        let source = record.source.unwrap();
        assert_eq!(source.class.as_deref(), Some("com.example.App"));
        assert_eq!(source.line, Some(42));
        assert!(record.additional.is_empty());
    }

    #[test]
    fn test_unknown_properties_are_kept() {
        let record = LogRecord::from_value(json!({"message": "hi", "host": "node-1"})).unwrap();
        assert_eq!(record.additional.get("host"), Some(&json!("node-1")));
    }

    #[test]
    fn test_timestamp_conversion() {
        let record = LogRecord {
            time_millis: Some(0),
            ..Default::default()
        };
        assert_eq!(record.timestamp().unwrap().timestamp(), 0);
        assert!(LogRecord::default().timestamp().is_none());
    }

    #[test]
    fn test_display_line() {
        let record = LogRecord {
            time_millis: Some(0),
            level: Some("WARN".to_string()),
            thread: Some("main".to_string()),
            logger_name: Some("app".to_string()),
            message: Some("disk low".to_string()),
            ..Default::default()
        };
        assert_eq!(
            record.to_string(),
            "1970-01-01 00:00:00.000 WARN  [main] app: disk low"
        );
    }
}
