//! Observability events emitted by the orchestrator.
//!
//! Suggestion failures are swallowed so typing never stalls; they are still
//! reported here, together with hybrid fallbacks and search failures.

use crate::types::RequestToken;
use std::fmt;

/// Something worth observing that is not returned to the caller as an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// A suggestion request failed and resolved to an empty list.
    SuggestionFailed { token: RequestToken, error: String },
    /// Hybrid search was configured but no query embedding was available,
    /// so the search ran lexical-only.
    DegradedMode { reason: String },
    /// A submitted search failed; the error was also returned to the caller.
    SearchFailed { error: String },
}

impl fmt::Display for SearchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SuggestionFailed { token, error } => {
                write!(f, "suggestion request {token} failed: {error}")
            }
            Self::DegradedMode { reason } => write!(f, "degraded to lexical search: {reason}"),
            Self::SearchFailed { error } => write!(f, "search failed: {error}"),
        }
    }
}

/// Receives [`SearchEvent`]s.
pub trait EventSink: Send + Sync {
    fn record(&self, event: &SearchEvent);
}

/// Default sink: forwards events to `tracing` at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &SearchEvent) {
        match event {
            SearchEvent::SuggestionFailed { token, error } => {
                tracing::warn!(%token, error = %error, "suggestion request failed");
            }
            SearchEvent::DegradedMode { reason } => {
                tracing::warn!(reason = %reason, "hybrid search degraded to lexical");
            }
            SearchEvent::SearchFailed { error } => {
                tracing::warn!(error = %error, "search failed");
            }
        }
    }
}
