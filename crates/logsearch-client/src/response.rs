//! Search response decoding.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use logsearch_types::LogRecord;

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    /// Milliseconds the backend spent executing the search
    #[serde(default)]
    pub took: u64,

    #[serde(default)]
    pub timed_out: bool,

    #[serde(default)]
    pub hits: Hits,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<TotalHits>,

    #[serde(default)]
    pub max_score: Option<f64>,

    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// Total hit count; older backends send a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Count(u64),
    Tracked { value: u64, relation: String },
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            TotalHits::Count(n) => *n,
            TotalHits::Tracked { value, .. } => *value,
        }
    }
}

/// A single matching document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_index", default)]
    pub index: String,

    #[serde(rename = "_id", default)]
    pub id: String,

    #[serde(rename = "_score", default)]
    pub score: Option<f64>,

    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
}

impl Hit {
    /// Decode the stored document, if present.
    pub fn record(&self) -> Option<LogRecord> {
        let source = self.source.clone()?;
        match LogRecord::from_value(source) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(id = %self.id, index = %self.index, error = %e, "Skipping undecodable hit");
                None
            }
        }
    }
}

impl ResultPage {
    /// Page with no hits.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Page holding the given documents as hits, in order.
    pub fn from_sources(index: &str, sources: impl IntoIterator<Item = Value>) -> Self {
        let hits: Vec<Hit> = sources
            .into_iter()
            .enumerate()
            .map(|(i, source)| Hit {
                index: index.to_string(),
                id: i.to_string(),
                score: Some(1.0),
                source: Some(source),
            })
            .collect();
        Self {
            took: 0,
            timed_out: false,
            hits: Hits {
                total: Some(TotalHits::Tracked {
                    value: hits.len() as u64,
                    relation: "eq".to_string(),
                }),
                max_score: hits.first().map(|_| 1.0),
                hits,
            },
        }
    }

    /// Total number of matching documents reported by the backend.
    pub fn total(&self) -> u64 {
        self.hits
            .total
            .as_ref()
            .map(TotalHits::value)
            .unwrap_or(self.hits.hits.len() as u64)
    }

    /// Number of hits on this page.
    pub fn len(&self) -> usize {
        self.hits.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.hits.is_empty()
    }

    /// Decoded log records in hit order. Hits without a usable `_source` are skipped.
    pub fn records(&self) -> Vec<LogRecord> {
        self.hits.hits.iter().filter_map(Hit::record).collect()
    }
}
