//! Shared HTTP client for index service requests.
//!
//! Provides a configured [`reqwest::Client`] carrying the Typesense API key
//! header and the per-request timeout from [`ConnectionConfig`].

use crate::config::ConnectionConfig;
use crate::error::SearchError;
use reqwest::header::{HeaderMap, HeaderValue};

/// Header Typesense reads the API key from.
pub const API_KEY_HEADER: &str = "X-TYPESENSE-API-KEY";

const USER_AGENT: &str = concat!("typesense-search/", env!("CARGO_PKG_VERSION"));

/// Build a [`reqwest::Client`] configured for index service requests.
///
/// The client has:
/// - `X-TYPESENSE-API-KEY` sent on every request (when a key is configured)
/// - Timeout from config, covering connect and response
/// - gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Config`] if the API key is not a valid header value,
/// or [`SearchError::Network`] if the client cannot be constructed.
pub fn build_client(config: &ConnectionConfig) -> Result<reqwest::Client, SearchError> {
    let mut headers = HeaderMap::new();
    if !config.api_key.is_empty() {
        let mut value = HeaderValue::from_str(&config.api_key)
            .map_err(|_| SearchError::Config("api_key contains invalid characters".into()))?;
        value.set_sensitive(true);
        headers.insert(API_KEY_HEADER, value);
    }

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(config.timeout())
        .connect_timeout(config.timeout())
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| SearchError::Network(format!("failed to build HTTP client: {e}")))
}

/// Map a transport-level [`reqwest::Error`] onto the error taxonomy.
///
/// Body decoding problems mean the service answered with something unusable;
/// everything else means it could not be reached in time.
pub fn map_transport_error(context: &str, err: reqwest::Error) -> SearchError {
    if err.is_decode() {
        SearchError::Service(format!("{context}: malformed response: {err}"))
    } else if err.is_timeout() {
        SearchError::Network(format!("{context}: request timed out"))
    } else {
        SearchError::Network(format!("{context}: {err}"))
    }
}
