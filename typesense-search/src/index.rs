//! Trait definition for the document index backend.
//!
//! The orchestrator only ever talks to the index through
//! [`IndexService`]; [`crate::typesense::TypesenseClient`] is the production
//! implementation, and tests substitute in-memory ones.

use crate::error::SearchError;
use crate::types::{MultiSearchResponse, QueryRequest, SearchPage};
use std::future::Future;

/// A document index supporting prefix, lexical and hybrid search.
///
/// Implementors translate a [`QueryRequest`] into their wire format and
/// return hits in the order the index ranked them. They must not re-sort.
///
/// All implementations must be `Send + Sync` so suggestion requests can be
/// in flight concurrently.
pub trait IndexService: Send + Sync {
    /// Typo-tolerant prefix search used for autocomplete suggestions.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Network`] if the index is unreachable, or
    /// [`SearchError::Service`] if it rejects the request or answers with
    /// a malformed body.
    fn prefix_search(
        &self,
        request: &QueryRequest,
    ) -> impl Future<Output = Result<SearchPage, SearchError>> + Send;

    /// Multi-field keyword search with highlighting.
    ///
    /// # Errors
    ///
    /// Same as [`IndexService::prefix_search`].
    fn lexical_search(
        &self,
        request: &QueryRequest,
    ) -> impl Future<Output = Result<SearchPage, SearchError>> + Send;

    /// Blended keyword + vector search.
    ///
    /// Answers with a multi-query envelope; callers unwrap the first element.
    ///
    /// # Errors
    ///
    /// Same as [`IndexService::prefix_search`].
    fn hybrid_search(
        &self,
        request: &QueryRequest,
    ) -> impl Future<Output = Result<MultiSearchResponse, SearchError>> + Send;
}
