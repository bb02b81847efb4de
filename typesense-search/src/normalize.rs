//! Maps raw index hits into the shapes handed to the rendering layer.
//!
//! Both functions are pure and keep the index's order: rank `n` is the
//! `n`th hit of the response, nothing is re-sorted or deduplicated.
//! Highlight markup is passed through unchanged. It comes from the index's
//! own highlighter, not from user input.

use crate::types::{NormalizedHit, RawHit, SuggestionEntry};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Normalise search hits, preferring highlight markup per field.
///
/// Every string-valued document field appears in `highlighted_fields`: the
/// highlight markup when the hit has one for that field, otherwise the raw
/// value verbatim. Highlights for fields absent from the document are kept.
pub fn normalize_hits(raw_hits: Vec<RawHit>) -> Vec<NormalizedHit> {
    raw_hits
        .into_iter()
        .enumerate()
        .map(|(rank, hit)| normalize_hit(rank, hit))
        .collect()
}

fn normalize_hit(rank: usize, hit: RawHit) -> NormalizedHit {
    let mut highlight = hit.highlight.unwrap_or_default();

    let mut highlighted_fields: BTreeMap<String, String> = hit
        .document
        .iter()
        .filter_map(|(field, value)| {
            let shown = highlight
                .remove(field)
                .or_else(|| value.as_str().map(str::to_owned))?;
            Some((field.clone(), shown))
        })
        .collect();
    highlighted_fields.extend(highlight);

    NormalizedHit {
        id: document_id(&hit.document),
        rank,
        document: hit.document,
        highlighted_fields,
    }
}

fn document_id(document: &Map<String, Value>) -> Option<String> {
    match document.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Extract one suggestion per hit from `field`, raw and in response order.
///
/// Hits whose `field` is missing or not a string contribute nothing.
/// Duplicate titles from distinct documents are all kept.
pub fn extract_suggestions(raw_hits: &[RawHit], field: &str) -> Vec<SuggestionEntry> {
    raw_hits
        .iter()
        .filter_map(|hit| hit.document.get(field)?.as_str())
        .map(|text| SuggestionEntry {
            text: text.to_owned(),
        })
        .collect()
}
