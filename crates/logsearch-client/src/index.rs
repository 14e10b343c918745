//! Date-suffixed index naming.
//!
//! Log documents are written to one index per period, named
//! `<prefix><name>_<date>`. The date part is rendered with a strftime
//! pattern (`%Y%m%d` by default), so a search must recompute the name when
//! the period rolls over.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};

use logsearch_types::Settings;

use crate::error::ClientError;

/// Default strftime pattern of the date suffix.
pub const DEFAULT_DATE_FORMAT: &str = "%Y%m%d";

/// Name of the index a search runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogIndex {
    prefix: String,
    name: String,
    date_format: String,
    computed: String,
}

impl LogIndex {
    /// Create an index name computed for the current date.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if `date_format` is not a valid strftime pattern.
    pub fn new(
        prefix: impl Into<String>,
        name: impl Into<String>,
        date_format: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let date_format = date_format.into();
        if StrftimeItems::new(&date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ClientError::Config(format!(
                "invalid index date format: {}",
                date_format
            )));
        }

        let mut index = Self {
            prefix: prefix.into(),
            name: name.into(),
            date_format,
            computed: String::new(),
        };
        index.recalculate();
        Ok(index)
    }

    /// Index named `name` using the prefix and date format from settings.
    pub fn standard(settings: &Settings, name: impl Into<String>) -> Result<Self, ClientError> {
        Self::new(
            settings.index_prefix.clone(),
            name,
            settings.index_date_format.clone(),
        )
    }

    /// The configured index of `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self, ClientError> {
        Self::standard(settings, settings.index_name.clone())
    }

    /// Recompute the name for the current date.
    pub fn recalculate(&mut self) -> &mut Self {
        self.recalculate_at(Utc::now())
    }

    /// Recompute the name for `at`.
    pub fn recalculate_at(&mut self, at: DateTime<Utc>) -> &mut Self {
        let mut computed = format!("{}{}_", self.prefix, self.name);
        // The pattern was validated in `new`; a failure here keeps the previous name.
        if write!(computed, "{}", at.format(&self.date_format)).is_ok() {
            self.computed = computed;
        }
        self
    }

    /// The computed index name.
    pub fn name(&self) -> &str {
        &self.computed
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn base_name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for LogIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.computed)
    }
}
