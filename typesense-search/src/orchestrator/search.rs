//! The query orchestrator: suggestion fetches and submitted searches.
//!
//! Suggestion fetches never fail from the caller's point of view: errors
//! become an empty list plus a [`SearchEvent::SuggestionFailed`] event, and
//! responses that lost the race to a newer request come back as
//! [`SuggestionUpdate::Superseded`]. Submitted searches return their errors
//! so the UI can offer a retry.

use std::future::Future;
use std::sync::Arc;

use tokio::time::Instant;

use crate::config::SearchConfig;
use crate::embedding::{NoEmbedder, QueryEmbedder};
use crate::error::{Result, SearchError};
use crate::events::{EventSink, SearchEvent, TracingSink};
use crate::index::IndexService;
use crate::normalize::{extract_suggestions, normalize_hits};
use crate::types::{
    Query, QueryMode, RawHit, RequestToken, SearchOutcome, SearchStrategy, SuggestionUpdate,
};

use super::request::{hybrid_request, lexical_request, suggestion_request};
use super::tokens::RequestTokens;

/// Turns user input into index requests and reconciles their responses.
///
/// Several suggestion fetches may be in flight at once, each borrowing it;
/// the current-token counter lives inside and only the orchestrator writes it.
pub struct Orchestrator<S, E = NoEmbedder> {
    service: S,
    embedder: E,
    config: SearchConfig,
    tokens: RequestTokens,
    sink: Arc<dyn EventSink>,
}

impl<S, E> std::fmt::Debug for Orchestrator<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("collection", &self.config.connection.collection)
            .field("strategy", &self.config.search.strategy)
            .field("current_token", &self.tokens.current())
            .finish()
    }
}

impl<S: IndexService> Orchestrator<S, NoEmbedder> {
    /// Create an orchestrator over `service`.
    ///
    /// Events go to [`TracingSink`] until replaced with
    /// [`Orchestrator::with_event_sink`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` fails validation.
    pub fn new(service: S, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            service,
            embedder: NoEmbedder,
            config,
            tokens: RequestTokens::new(),
            sink: Arc::new(TracingSink),
        })
    }
}

impl<S: IndexService, E: QueryEmbedder> Orchestrator<S, E> {
    /// Use `embedder` to produce query vectors for hybrid search.
    pub fn with_embedder<E2: QueryEmbedder>(self, embedder: E2) -> Orchestrator<S, E2> {
        Orchestrator {
            service: self.service,
            embedder,
            config: self.config,
            tokens: self.tokens,
            sink: self.sink,
        }
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Most recently minted (or invalidated) token.
    pub fn current_token(&self) -> RequestToken {
        self.tokens.current()
    }

    /// Make every in-flight suggestion fetch stale.
    pub fn invalidate_suggestions(&self) {
        self.tokens.invalidate();
        tracing::debug!(current = %self.tokens.current(), "suggestions invalidated");
    }

    /// Fetch autocomplete suggestions for `text`.
    ///
    /// The request token is minted when this is called, not when the future
    /// is first polled, so issue order is call order. Every call, blank or
    /// not, supersedes all earlier ones. Blank text resolves to an empty
    /// fresh update without touching the index.
    pub fn fetch_suggestions(
        &self,
        text: &str,
    ) -> impl Future<Output = SuggestionUpdate> + Send + '_ {
        let token = self.tokens.mint();
        let request = suggestion_request(text, &self.config.suggestions);

        async move {
            if request.query.is_blank() {
                return SuggestionUpdate::Fresh {
                    token,
                    entries: Vec::new(),
                };
            }

            tracing::trace!(query = %request.query.text, %token, "suggestion request");
            let deadline = self.deadline();
            let outcome = self
                .bounded(deadline, self.service.prefix_search(&request))
                .await;

            if !self.tokens.is_current(token) {
                tracing::debug!(%token, current = %self.tokens.current(), "discarding superseded suggestions");
                return SuggestionUpdate::Superseded { token };
            }

            let entries = match outcome {
                Ok(page) => extract_suggestions(&page.hits, &self.config.suggestions.display_field),
                Err(err) => {
                    self.sink.record(&SearchEvent::SuggestionFailed {
                        token,
                        error: err.to_string(),
                    });
                    Vec::new()
                }
            };
            tracing::debug!(%token, count = entries.len(), "suggestions ready");
            SuggestionUpdate::Fresh { token, entries }
        }
    }

    /// Run a submitted search for `text`.
    ///
    /// Invalidates pending suggestions first. Blank text resolves to an
    /// empty outcome without touching the index. The configured timeout is
    /// one budget for the whole search: embedding the query, a lexical
    /// fallback and the index call all share the same deadline.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Network`] if the index is unreachable or the
    /// configured timeout elapses, and [`SearchError::Service`] if it rejects
    /// the request. A missing query embedding is not an error: the search
    /// runs lexical-only and the outcome is flagged `degraded`.
    pub async fn run_search(&self, text: &str) -> Result<SearchOutcome> {
        self.invalidate_suggestions();

        let strategy = self.config.search.strategy;
        let query = Query::new(text, QueryMode::Search);
        if query.is_blank() {
            return Ok(SearchOutcome::empty(strategy));
        }

        tracing::trace!(query = %query.text, %strategy, "search request");
        let deadline = self.deadline();
        let result = match strategy {
            SearchStrategy::Lexical => {
                self.lexical(&query.text, deadline)
                    .await
                    .map(|hits| SearchOutcome {
                        hits: normalize_hits(hits),
                        strategy: SearchStrategy::Lexical,
                        degraded: false,
                    })
            }
            SearchStrategy::Hybrid => self.hybrid(&query.text, deadline).await,
        };

        match result {
            Ok(outcome) => {
                tracing::debug!(
                    count = outcome.hits.len(),
                    strategy = %outcome.strategy,
                    degraded = outcome.degraded,
                    "search complete"
                );
                Ok(outcome)
            }
            Err(err) => {
                self.sink.record(&SearchEvent::SearchFailed {
                    error: err.to_string(),
                });
                Err(err)
            }
        }
    }

    async fn lexical(&self, text: &str, deadline: Instant) -> Result<Vec<RawHit>> {
        let request = lexical_request(text, &self.config.search);
        let page = self
            .bounded(deadline, self.service.lexical_search(&request))
            .await?;
        Ok(page.hits)
    }

    async fn hybrid(&self, text: &str, deadline: Instant) -> Result<SearchOutcome> {
        let search = &self.config.search;
        let embedding = if search.index_computes_embeddings {
            Some(Vec::new())
        } else {
            tokio::time::timeout_at(deadline, self.embedder.embed(text))
                .await
                .ok()
                .flatten()
                .filter(|vector| !vector.is_empty())
        };

        let Some(embedding) = embedding else {
            self.sink.record(&SearchEvent::DegradedMode {
                reason: "no query embedding available".into(),
            });
            let hits = self.lexical(text, deadline).await?;
            return Ok(SearchOutcome {
                hits: normalize_hits(hits),
                strategy: SearchStrategy::Lexical,
                degraded: true,
            });
        };

        let request = hybrid_request(text, search, embedding);
        let envelope = self
            .bounded(deadline, self.service.hybrid_search(&request))
            .await?;
        Ok(SearchOutcome {
            hits: normalize_hits(envelope.into_first_hits()),
            strategy: SearchStrategy::Hybrid,
            degraded: false,
        })
    }

    /// Deadline one configured timeout from now.
    fn deadline(&self) -> Instant {
        Instant::now() + self.config.connection.timeout()
    }

    /// Bound an index call by `deadline`.
    async fn bounded<T>(
        &self,
        deadline: Instant,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        tokio::time::timeout_at(deadline, call).await.map_err(|_| {
            SearchError::Network(format!(
                "request timed out after {}ms",
                self.config.connection.timeout_ms
            ))
        })?
    }
}
