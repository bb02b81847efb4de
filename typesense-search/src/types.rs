//! Core types for queries, index requests, raw hits and normalised results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Which of the two query modes a user action maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Incremental prefix suggestions while the user types.
    Suggestion,
    /// Full search issued by an explicit submit.
    Search,
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suggestion => f.write_str("suggestion"),
            Self::Search => f.write_str("search"),
        }
    }
}

/// How a full search is matched against the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// Typo-tolerant keyword matching over several text fields.
    Lexical,
    /// Keyword matching blended with vector similarity.
    #[default]
    Hybrid,
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical => f.write_str("lexical"),
            Self::Hybrid => f.write_str("hybrid"),
        }
    }
}

/// User query text together with the mode it is issued in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Query text, trimmed of surrounding whitespace.
    pub text: String,
    /// Suggestion or search.
    pub mode: QueryMode,
}

impl Query {
    /// Build a query, trimming surrounding whitespace from `text`.
    pub fn new(text: &str, mode: QueryMode) -> Self {
        Self {
            text: text.trim().to_owned(),
            mode,
        }
    }

    /// Whitespace-only queries never reach the index service.
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Vector half of a hybrid query.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorQuery {
    /// Document field holding the stored embeddings.
    pub field: String,
    /// Query embedding. Empty when the index embeds the query text itself.
    pub embedding: Vec<f32>,
    /// Lexical share of the blended score: 0 = pure vector, 1 = pure lexical.
    pub blend_weight: f64,
}

/// A fully described index call derived from a [`Query`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub query: Query,
    /// Fields to match, in priority order.
    pub fields: Vec<String>,
    /// Maximum edit distance per query token.
    pub fuzzy_tolerance: u8,
    /// Page size.
    pub result_limit: usize,
    /// Treat the last query token as a prefix.
    pub prefix: bool,
    /// Once this many results are found, stop trying more typo corrections.
    pub typo_downgrade_threshold: Option<u32>,
    /// Fields returned with full-value highlight markup.
    pub highlight_fields: Vec<String>,
    /// Fields stripped from the returned document payload.
    pub exclude_fields: Vec<String>,
    pub vector: Option<VectorQuery>,
}

impl QueryRequest {
    /// Blend weight of the vector half, if this is a hybrid request.
    pub fn blend_weight(&self) -> Option<f64> {
        self.vector.as_ref().map(|v| v.blend_weight)
    }

    pub fn is_hybrid(&self) -> bool {
        self.vector.is_some()
    }
}

/// One hit as returned by the index service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    /// Stored document fields.
    pub document: Map<String, Value>,
    /// Highlight markup per matched field, if the service produced any.
    pub highlight: Option<BTreeMap<String, String>>,
}

/// A single page of hits from a plain (non multi-query) search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub hits: Vec<RawHit>,
}

/// Multi-query envelope returned by hybrid search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiSearchResponse {
    pub results: Vec<SearchPage>,
}

impl MultiSearchResponse {
    /// Unwrap to the first query's hits. A missing or empty envelope is zero hits.
    pub fn into_first_hits(self) -> Vec<RawHit> {
        self.results
            .into_iter()
            .next()
            .map(|page| page.hits)
            .unwrap_or_default()
    }
}

/// A search hit in the stable shape handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedHit {
    /// Document id, if the document carries one.
    pub id: Option<String>,
    /// 0-based position in the service's response. Lower is more relevant.
    pub rank: usize,
    pub document: Map<String, Value>,
    /// Display value per field: highlight markup where available, raw value otherwise.
    pub highlighted_fields: BTreeMap<String, String>,
}

/// One autocomplete suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionEntry {
    pub text: String,
}

impl fmt::Display for SuggestionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Identifier minted per issued suggestion request.
///
/// Tokens only ever increase; a response is fresh only if its token is
/// still the most recently minted one when it arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(pub(crate) u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of a suggestion fetch, from the rendering layer's point of view.
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionUpdate {
    /// Latest request answered; replace the visible suggestions.
    Fresh {
        token: RequestToken,
        entries: Vec<SuggestionEntry>,
    },
    /// A newer request was issued before this one answered; ignore it.
    Superseded { token: RequestToken },
}

impl SuggestionUpdate {
    pub fn token(&self) -> RequestToken {
        match self {
            Self::Fresh { token, .. } | Self::Superseded { token } => *token,
        }
    }

    /// Entries of a fresh update, `None` when superseded.
    pub fn entries(&self) -> Option<&[SuggestionEntry]> {
        match self {
            Self::Fresh { entries, .. } => Some(entries),
            Self::Superseded { .. } => None,
        }
    }
}

/// Ranked hits of a submitted search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub hits: Vec<NormalizedHit>,
    /// Strategy that actually ran.
    pub strategy: SearchStrategy,
    /// `true` when hybrid was configured but fell back to lexical.
    pub degraded: bool,
}

impl SearchOutcome {
    pub(crate) fn empty(strategy: SearchStrategy) -> Self {
        Self {
            hits: Vec::new(),
            strategy,
            degraded: false,
        }
    }
}
