//! Query orchestrator: mode selection, request building, stale-response discard.
//!
//! Suggestion requests are stamped with a [`crate::types::RequestToken`] and
//! only the most recently issued one may update the visible suggestions.
//! Search requests pick lexical or hybrid matching from config and fall
//! back to lexical when no query embedding is available.

pub mod request;
pub mod search;
pub mod tokens;

pub use search::Orchestrator;
pub use tokens::RequestTokens;
