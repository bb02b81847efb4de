//! Query embedding providers for hybrid search.
//!
//! Hybrid search needs a vector for the query text. Either the index embeds
//! the text itself (see `index_computes_embeddings` in the config) or the
//! caller plugs in a [`QueryEmbedder`]. When neither produces a vector the
//! orchestrator falls back to lexical search.

use std::future::Future;

/// Produces a query embedding for hybrid search.
pub trait QueryEmbedder: Send + Sync {
    /// Embed `text`, or return `None` if no embedding is available right now.
    ///
    /// Implementations log their own failures; `None` is not an error and
    /// only triggers the lexical fallback.
    fn embed(&self, text: &str) -> impl Future<Output = Option<Vec<f32>>> + Send;
}

/// Embedder used when the caller supplies none. Never has an embedding.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEmbedder;

impl QueryEmbedder for NoEmbedder {
    async fn embed(&self, _text: &str) -> Option<Vec<f32>> {
        None
    }
}

/// Embedder returning the same precomputed vector for every query.
///
/// Useful for demos against a collection without an auto-embedding field.
#[derive(Debug, Clone, Default)]
pub struct StaticEmbedder {
    vector: Vec<f32>,
}

impl StaticEmbedder {
    pub fn new(vector: Vec<f32>) -> Self {
        Self { vector }
    }
}

impl QueryEmbedder for StaticEmbedder {
    async fn embed(&self, _text: &str) -> Option<Vec<f32>> {
        if self.vector.is_empty() {
            None
        } else {
            Some(self.vector.clone())
        }
    }
}
