//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] holds everything the orchestration layer would otherwise
//! hard-code: where the index lives, the API key, the typo budget, page
//! sizes, blend weight and debounce delay. It loads from TOML and every
//! section falls back to defaults for missing fields.

use crate::error::SearchError;
use crate::types::SearchStrategy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Typesense caps `num_typos` at 2.
pub const MAX_FUZZY_TOLERANCE: u8 = 2;
/// Suggestion lists stay short enough to render under an input box.
pub const MAX_SUGGESTION_LIMIT: usize = 10;
/// Typesense caps `per_page` at 250.
pub const MAX_SEARCH_LIMIT: usize = 250;

/// Environment variable that overrides [`ConnectionConfig::api_key`].
pub const API_KEY_ENV: &str = "TYPESENSE_API_KEY";
/// Environment variable that overrides [`ConnectionConfig::host`].
pub const HOST_ENV: &str = "TYPESENSE_HOST";

/// Top-level configuration for the search orchestration layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub connection: ConnectionConfig,
    pub suggestions: SuggestionConfig,
    pub search: SearchModeConfig,
    /// Quiet period after the last keystroke before suggestions are fetched.
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            suggestions: SuggestionConfig::default(),
            search: SearchModeConfig::default(),
            debounce_ms: 225,
        }
    }
}

/// Where the index service lives and how long to wait for it.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// `http` or `https`.
    pub protocol: String,
    pub host: String,
    pub port: u16,
    /// Search-only API key. Never the admin key: it ends up in a client.
    pub api_key: String,
    pub collection: String,
    /// Per-request timeout covering connect and response.
    pub timeout_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            protocol: "http".into(),
            host: "localhost".into(),
            port: 8108,
            api_key: String::new(),
            collection: "books".into(),
            timeout_ms: 2000,
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("protocol", &self.protocol)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &"<redacted>")
            .field("collection", &self.collection)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl ConnectionConfig {
    /// Base URL of the index service, e.g. `http://localhost:8108`.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Incremental prefix suggestions while typing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Short textual fields to match (titles, names).
    pub fields: Vec<String>,
    /// Field whose raw value becomes the suggestion text.
    pub display_field: String,
    pub fuzzy_tolerance: u8,
    pub result_limit: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            fields: vec!["title".into()],
            display_field: "title".into(),
            fuzzy_tolerance: 2,
            result_limit: 5,
        }
    }
}

/// Full search issued on submit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchModeConfig {
    pub strategy: SearchStrategy,
    /// Text fields to match, in priority order.
    pub fields: Vec<String>,
    /// Fields returned with full-value highlight markup.
    pub highlight_fields: Vec<String>,
    pub fuzzy_tolerance: u8,
    /// Typo budget: stop expanding typo corrections once this many hits are found.
    pub typo_downgrade_threshold: u32,
    pub result_limit: usize,
    /// Lexical share of the hybrid score: 0 = pure vector, 1 = pure lexical.
    pub blend_weight: f64,
    /// Document field holding embeddings. Never returned to the caller.
    pub vector_field: String,
    /// The index embeds query text itself (auto-embedding field), so no
    /// client-side embedding is needed for hybrid search.
    pub index_computes_embeddings: bool,
}

impl Default for SearchModeConfig {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::Hybrid,
            fields: vec!["title".into(), "description".into()],
            highlight_fields: vec!["title".into(), "description".into()],
            fuzzy_tolerance: 2,
            typo_downgrade_threshold: 1,
            result_limit: 10,
            blend_weight: 0.8,
            vector_field: "embedding".into(),
            index_computes_embeddings: true,
        }
    }
}

impl SearchConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, SearchError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SearchError::Config(format!("failed to read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| SearchError::Config(format!("invalid {}: {e}", path.display())))
    }

    /// Default config file path: `<config dir>/bytemonk-search/config.toml`.
    ///
    /// The config dir is the platform one (`$XDG_CONFIG_HOME` or
    /// `~/.config` on Linux). `None` if the platform has no config dir.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("bytemonk-search").join("config.toml"))
    }

    /// Override connection settings from `TYPESENSE_API_KEY` / `TYPESENSE_HOST`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.is_empty()) {
            self.connection.api_key = key;
        }
        if let Some(host) = lookup(HOST_ENV).filter(|v| !v.is_empty()) {
            self.connection.host = host;
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Validates this configuration, returning an error if any field is invalid.
    pub fn validate(&self) -> Result<(), SearchError> {
        let conn = &self.connection;
        if conn.protocol != "http" && conn.protocol != "https" {
            return Err(SearchError::Config(format!(
                "protocol must be http or https, got {:?}",
                conn.protocol
            )));
        }
        if conn.host.trim().is_empty() {
            return Err(SearchError::Config("host must not be empty".into()));
        }
        if conn.collection.trim().is_empty() {
            return Err(SearchError::Config("collection must not be empty".into()));
        }
        if conn.timeout_ms == 0 {
            return Err(SearchError::Config(
                "timeout_ms must be greater than 0".into(),
            ));
        }
        if self.debounce_ms == 0 {
            return Err(SearchError::Config(
                "debounce_ms must be greater than 0".into(),
            ));
        }

        let sugg = &self.suggestions;
        if sugg.fields.is_empty() {
            return Err(SearchError::Config(
                "suggestions.fields must name at least one field".into(),
            ));
        }
        if sugg.display_field.trim().is_empty() {
            return Err(SearchError::Config(
                "suggestions.display_field must not be empty".into(),
            ));
        }
        if sugg.result_limit == 0 || sugg.result_limit > MAX_SUGGESTION_LIMIT {
            return Err(SearchError::Config(format!(
                "suggestions.result_limit must be between 1 and {MAX_SUGGESTION_LIMIT}"
            )));
        }
        if sugg.fuzzy_tolerance > MAX_FUZZY_TOLERANCE {
            return Err(SearchError::Config(format!(
                "suggestions.fuzzy_tolerance must be <= {MAX_FUZZY_TOLERANCE}"
            )));
        }

        let search = &self.search;
        if search.fields.is_empty() {
            return Err(SearchError::Config(
                "search.fields must name at least one field".into(),
            ));
        }
        if search.result_limit == 0 || search.result_limit > MAX_SEARCH_LIMIT {
            return Err(SearchError::Config(format!(
                "search.result_limit must be between 1 and {MAX_SEARCH_LIMIT}"
            )));
        }
        if search.fuzzy_tolerance > MAX_FUZZY_TOLERANCE {
            return Err(SearchError::Config(format!(
                "search.fuzzy_tolerance must be <= {MAX_FUZZY_TOLERANCE}"
            )));
        }
        if !(0.0..=1.0).contains(&search.blend_weight) {
            return Err(SearchError::Config(
                "search.blend_weight must be within [0, 1]".into(),
            ));
        }
        if search.strategy == SearchStrategy::Hybrid && search.vector_field.trim().is_empty() {
            return Err(SearchError::Config(
                "search.vector_field is required for hybrid search".into(),
            ));
        }
        Ok(())
    }
}
