//! Builds [`QueryRequest`]s from queries and configuration.
//!
//! Nothing here is hard-coded: fields, typo budget, page sizes and blend
//! weight all come from [`SuggestionConfig`] / [`SearchModeConfig`].

use crate::config::{SearchModeConfig, SuggestionConfig};
use crate::types::{Query, QueryMode, QueryRequest, VectorQuery};

/// Prefix-matching request over the short suggestion fields.
pub fn suggestion_request(text: &str, config: &SuggestionConfig) -> QueryRequest {
    QueryRequest {
        query: Query::new(text, QueryMode::Suggestion),
        fields: config.fields.clone(),
        fuzzy_tolerance: config.fuzzy_tolerance,
        result_limit: config.result_limit,
        prefix: true,
        typo_downgrade_threshold: None,
        highlight_fields: Vec::new(),
        exclude_fields: Vec::new(),
        vector: None,
    }
}

/// Multi-field keyword request with full-field highlighting.
///
/// The configured vector field is excluded from returned documents even
/// though it is not matched, so a lexical fallback never ships embeddings.
pub fn lexical_request(text: &str, config: &SearchModeConfig) -> QueryRequest {
    let exclude_fields = if config.vector_field.is_empty() {
        Vec::new()
    } else {
        vec![config.vector_field.clone()]
    };
    QueryRequest {
        query: Query::new(text, QueryMode::Search),
        fields: config.fields.clone(),
        fuzzy_tolerance: config.fuzzy_tolerance,
        result_limit: config.result_limit,
        prefix: false,
        typo_downgrade_threshold: Some(config.typo_downgrade_threshold),
        highlight_fields: config.highlight_fields.clone(),
        exclude_fields,
        vector: None,
    }
}

/// Lexical request extended with the vector field.
///
/// The vector field is matched but, as in the lexical request, stripped
/// from returned documents. An empty `embedding` asks the index to embed
/// the query text itself.
pub fn hybrid_request(text: &str, config: &SearchModeConfig, embedding: Vec<f32>) -> QueryRequest {
    let mut request = lexical_request(text, config);
    request.fields.push(config.vector_field.clone());
    request.vector = Some(VectorQuery {
        field: config.vector_field.clone(),
        embedding,
        blend_weight: config.blend_weight,
    });
    request
}
