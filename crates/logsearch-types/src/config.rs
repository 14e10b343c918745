//! Configuration loading for log-search.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/log-search/config.toml.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::fuzzy::FuzzyConfig;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Search backend node URLs, tried in order
    #[serde(default = "default_nodes")]
    pub nodes: Vec<String>,

    /// Basic auth user (anonymous access when unset)
    #[serde(default)]
    pub username: Option<String>,

    /// Basic auth password (prefer LOGSEARCH_PASSWORD over the config file)
    #[serde(default)]
    pub password: Option<String>,

    /// Prefix prepended to every index name
    #[serde(default = "default_index_prefix")]
    pub index_prefix: String,

    /// Logical index name between prefix and date
    #[serde(default = "default_index_name")]
    pub index_name: String,

    /// strftime pattern for the date suffix of index names
    #[serde(default = "default_index_date_format")]
    pub index_date_format: String,

    /// Page size used when a search does not specify one
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Fuzzy parameters applied to full-text matches (disabled when unset)
    #[serde(default)]
    pub fuzzy: Option<FuzzyConfig>,
}

fn default_nodes() -> Vec<String> {
    vec!["http://localhost:9200".to_string()]
}

fn default_index_prefix() -> String {
    "ea_".to_string()
}

fn default_index_name() -> String {
    "log".to_string()
}

fn default_index_date_format() -> String {
    "%Y%m%d".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            nodes: default_nodes(),
            username: None,
            password: None,
            index_prefix: default_index_prefix(),
            index_name: default_index_name(),
            index_date_format: default_index_date_format(),
            default_page_size: default_page_size(),
            request_timeout_secs: default_request_timeout_secs(),
            log_level: default_log_level(),
            fuzzy: None,
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/log-search/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (LOGSEARCH_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir = ProjectDirs::from("", "", "log-search")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("nodes", default_nodes())?
            .set_default("index_prefix", default_index_prefix())?
            .set_default("index_name", default_index_name())?
            .set_default("index_date_format", default_index_date_format())?
            .set_default("default_page_size", default_page_size() as i64)?
            .set_default("request_timeout_secs", default_request_timeout_secs() as i64)?
            .set_default("log_level", default_log_level())?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: LOGSEARCH_INDEX_PREFIX, LOGSEARCH_NODES=http://a:9200,http://b:9200
        builder = builder.add_source(
            Environment::with_prefix("LOGSEARCH")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("nodes"),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nodes.is_empty() {
            return Err(ConfigError::Invalid("at least one node is required".to_string()));
        }
        if let Some(node) = self
            .nodes
            .iter()
            .find(|n| !(n.starts_with("http://") || n.starts_with("https://")))
        {
            return Err(ConfigError::Invalid(format!(
                "node must be an http(s) URL, got {}",
                node
            )));
        }
        if self.index_name.trim().is_empty() {
            return Err(ConfigError::Invalid("index_name must not be empty".to_string()));
        }
        if self.default_page_size == 0 {
            return Err(ConfigError::Invalid("default_page_size must be > 0".to_string()));
        }
        if self.password.is_some() && self.username.is_none() {
            return Err(ConfigError::Invalid(
                "password is set but username is missing".to_string(),
            ));
        }
        Ok(())
    }
}
