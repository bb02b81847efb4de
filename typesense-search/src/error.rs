//! Error types for the typesense-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. No API keys appear in error messages.
//!
//! Hybrid-to-lexical fallback is deliberately absent here: it is reported
//! as a [`crate::events::SearchEvent::DegradedMode`] event, not a failure.

/// Errors that can occur while talking to the index service.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The index service was unreachable or did not answer in time.
    #[error("network failure: {0}")]
    Network(String),

    /// The index service answered with a non-2xx status or a malformed body.
    #[error("index service error: {0}")]
    Service(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Returns `true` for unreachable / timed-out requests.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Returns `true` when the service answered but the answer was unusable.
    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service(_))
    }
}

/// Convenience type alias for typesense-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
