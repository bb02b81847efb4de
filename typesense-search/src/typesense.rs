//! Typesense implementation of [`IndexService`].
//!
//! Prefix and lexical searches use the single-collection search endpoint
//! (`GET /collections/{name}/documents/search`). Hybrid search goes through
//! `POST /multi_search`, which keeps the query embedding out of the URL and
//! answers with a `{ "results": [ ... ] }` envelope.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{json, Map, Value};
use url::Url;

use crate::config::ConnectionConfig;
use crate::error::SearchError;
use crate::http;
use crate::index::IndexService;
use crate::types::{MultiSearchResponse, QueryRequest, RawHit, SearchPage, VectorQuery};

/// Typesense REST client bound to one collection.
#[derive(Clone)]
pub struct TypesenseClient {
    client: reqwest::Client,
    base_url: Url,
    collection: String,
}

impl std::fmt::Debug for TypesenseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypesenseClient")
            .field("base_url", &self.base_url.as_str())
            .field("collection", &self.collection)
            .finish()
    }
}

impl TypesenseClient {
    /// Create a client for the node and collection in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the base URL or API key is invalid.
    pub fn new(config: &ConnectionConfig) -> Result<Self, SearchError> {
        Self::with_base_url(config, &config.base_url())
    }

    /// Create a client pointed at an explicit base URL instead of
    /// `protocol://host:port`. The URL may carry a path prefix.
    ///
    /// # Errors
    ///
    /// Same as [`TypesenseClient::new`].
    pub fn with_base_url(config: &ConnectionConfig, base_url: &str) -> Result<Self, SearchError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| SearchError::Config(format!("invalid base URL {base_url:?}: {e}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            client: http::build_client(config)?,
            base_url,
            collection: config.collection.clone(),
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn endpoint(&self, path: &str) -> Result<Url, SearchError> {
        self.base_url
            .join(path)
            .map_err(|e| SearchError::Config(format!("invalid endpoint {path:?}: {e}")))
    }

    /// `GET /collections/{collection}/documents/search`.
    async fn collection_search(&self, request: &QueryRequest) -> Result<SearchPage, SearchError> {
        let url = self.endpoint(&format!("collections/{}/documents/search", self.collection))?;
        let params = search_params(request);

        let response = self
            .client
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(|e| http::map_transport_error("Typesense search", e))?;

        let page: WirePage = read_json(response, "Typesense search").await?;
        tracing::trace!(hits = page.hits.len(), "Typesense search response received");
        Ok(page.into_page())
    }
}

impl IndexService for TypesenseClient {
    async fn prefix_search(&self, request: &QueryRequest) -> Result<SearchPage, SearchError> {
        self.collection_search(request).await
    }

    async fn lexical_search(&self, request: &QueryRequest) -> Result<SearchPage, SearchError> {
        self.collection_search(request).await
    }

    async fn hybrid_search(
        &self,
        request: &QueryRequest,
    ) -> Result<MultiSearchResponse, SearchError> {
        let url = self.endpoint("multi_search")?;

        let mut search: Map<String, Value> = search_params(request)
            .into_iter()
            .map(|(key, value)| (key.to_owned(), Value::String(value)))
            .collect();
        search.insert("collection".into(), Value::String(self.collection.clone()));
        let body = json!({ "searches": [search] });

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| http::map_transport_error("Typesense multi_search", e))?;

        let envelope: WireMultiSearch = read_json(response, "Typesense multi_search").await?;
        envelope.into_response()
    }
}

/// Typesense search parameters for `request`, as query-string pairs.
///
/// The same pairs form each entry of a `multi_search` body.
pub fn search_params(request: &QueryRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("q", request.query.text.clone()),
        ("query_by", request.fields.join(",")),
        ("per_page", request.result_limit.to_string()),
        ("num_typos", request.fuzzy_tolerance.to_string()),
        ("prefix", request.prefix.to_string()),
    ];
    if let Some(threshold) = request.typo_downgrade_threshold {
        params.push(("typo_tokens_threshold", threshold.to_string()));
    }
    if !request.highlight_fields.is_empty() {
        params.push(("highlight_full_fields", request.highlight_fields.join(",")));
    }
    if !request.exclude_fields.is_empty() {
        params.push(("exclude_fields", request.exclude_fields.join(",")));
    }
    if let Some(vector) = &request.vector {
        params.push(("vector_query", vector_query(vector)));
        params.push(("rerank_hybrid_matches", "true".into()));
    }
    params
}

/// Render `field:([v1,v2,...], alpha: a)`.
///
/// Typesense's `alpha` is the vector share of the fused score, so it is the
/// complement of the lexical blend weight.
pub fn vector_query(vector: &VectorQuery) -> String {
    let alpha = ((1.0 - vector.blend_weight) * 1000.0).round() / 1000.0;
    let values = vector
        .embedding
        .iter()
        .map(f32::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("{}:([{values}], alpha: {alpha})", vector.field)
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    context: &str,
) -> Result<T, SearchError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| http::map_transport_error(context, e))?;

    if !status.is_success() {
        return Err(SearchError::Service(format!(
            "{context}: HTTP {}: {}",
            status.as_u16(),
            extract_error_message(&body)
        )));
    }

    serde_json::from_str(&body)
        .map_err(|e| SearchError::Service(format!("{context}: malformed response: {e}")))
}

/// Typesense errors look like `{"message": "..."}`.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}

#[derive(Debug, Deserialize)]
struct WirePage {
    #[serde(default)]
    hits: Vec<WireHit>,
}

impl WirePage {
    fn into_page(self) -> SearchPage {
        SearchPage {
            hits: self.hits.into_iter().map(WireHit::into_raw).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireHit {
    #[serde(default)]
    document: Map<String, Value>,
    /// Field-keyed highlight object (Typesense >= 0.24).
    #[serde(default)]
    highlight: Map<String, Value>,
    /// Legacy highlight array.
    #[serde(default)]
    highlights: Vec<WireHighlight>,
}

#[derive(Debug, Deserialize)]
struct WireHighlight {
    field: String,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    value: Option<String>,
}

impl WireHit {
    fn into_raw(self) -> RawHit {
        let mut markup: BTreeMap<String, String> = self
            .highlight
            .into_iter()
            .filter_map(|(field, entry)| {
                let shown = entry
                    .get("value")
                    .and_then(Value::as_str)
                    .filter(|v| !v.is_empty())
                    .or_else(|| entry.get("snippet").and_then(Value::as_str))?;
                Some((field, shown.to_owned()))
            })
            .collect();

        for legacy in self.highlights {
            if let Some(shown) = legacy
                .value
                .filter(|v| !v.is_empty())
                .or(legacy.snippet)
            {
                markup.entry(legacy.field).or_insert(shown);
            }
        }

        RawHit {
            document: self.document,
            highlight: if markup.is_empty() { None } else { Some(markup) },
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireMultiSearch {
    #[serde(default)]
    results: Vec<WireMultiResult>,
}

#[derive(Debug, Deserialize)]
struct WireMultiResult {
    #[serde(default)]
    hits: Vec<WireHit>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<u16>,
}

impl WireMultiSearch {
    fn into_response(self) -> Result<MultiSearchResponse, SearchError> {
        let results = self
            .results
            .into_iter()
            .map(|result| match result.error {
                Some(error) => Err(SearchError::Service(format!(
                    "Typesense multi_search: HTTP {}: {error}",
                    result.code.unwrap_or(500)
                ))),
                None => Ok(WirePage { hits: result.hits }.into_page()),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MultiSearchResponse { results })
    }
}
