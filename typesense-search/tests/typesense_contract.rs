//! Typesense Contract Tests
//!
//! These tests verify HTTP API format compliance for [`TypesenseClient`]
//! against a mock Typesense node:
//! - Request parameters for prefix, lexical and hybrid searches
//! - The API key header
//! - Response parsing, including the multi-search envelope and highlights
//! - Error responses and timeouts mapped to `SearchError`

use std::time::{Duration, Instant};

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use typesense_search::config::ConnectionConfig;
use typesense_search::{
    IndexService, Orchestrator, SearchConfig, SearchError, SearchStrategy, StaticEmbedder,
    TypesenseClient,
};

const SEARCH_PATH: &str = "/collections/books/documents/search";

fn config(timeout_ms: u64) -> SearchConfig {
    let mut config = SearchConfig::default();
    config.connection = ConnectionConfig {
        api_key: "search-only-key".into(),
        timeout_ms,
        ..Default::default()
    };
    config
}

fn orchestrator(server: &MockServer, config: SearchConfig) -> Orchestrator<TypesenseClient> {
    let client = TypesenseClient::with_base_url(&config.connection, &server.uri()).unwrap();
    Orchestrator::new(client, config).unwrap()
}

fn harry_potter_hits() -> Value {
    json!({
        "found": 1,
        "hits": [{
            "document": {
                "id": "42",
                "title": "Harry Potter and the Philosopher's Stone",
                "description": "A boy learns he is a wizard.",
                "publication_year": 1997
            },
            "highlight": {
                "title": {
                    "matched_tokens": ["Harry", "Potter"],
                    "snippet": "<mark>Harry</mark> <mark>Potter</mark> and the Philosopher's Stone",
                    "value": "<mark>Harry</mark> <mark>Potter</mark> and the Philosopher's Stone"
                }
            },
            "text_match": 578730123365187705_u64
        }]
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Request Format Validation Tests
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn suggestion_request_uses_prefix_search() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(header("X-TYPESENSE-API-KEY", "search-only-key"))
        .and(query_param("q", "harr"))
        .and(query_param("query_by", "title"))
        .and(query_param("prefix", "true"))
        .and(query_param("num_typos", "2"))
        .and(query_param("per_page", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": [
                { "document": { "id": "1", "title": "Harry Potter" } },
                { "document": { "id": "2", "title": "Harriet the Spy" } },
                { "document": { "id": "3", "title": "Harry Potter" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let update = orchestrator(&server, config(2000))
        .fetch_suggestions("harr")
        .await;
    let texts: Vec<_> = update
        .entries()
        .unwrap()
        .iter()
        .map(|e| e.text.as_str())
        .collect();
    assert_eq!(texts, vec!["Harry Potter", "Harriet the Spy", "Harry Potter"]);
}

#[tokio::test]
async fn lexical_request_includes_typo_budget_and_highlighting() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("q", "Harry Potter"))
        .and(query_param("query_by", "title,description"))
        .and(query_param("num_typos", "2"))
        .and(query_param("typo_tokens_threshold", "1"))
        .and(query_param("highlight_full_fields", "title,description"))
        .and(query_param("prefix", "false"))
        .and(query_param("exclude_fields", "embedding"))
        .respond_with(ResponseTemplate::new(200).set_body_json(harry_potter_hits()))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config(2000);
    config.search.strategy = SearchStrategy::Lexical;
    let outcome = orchestrator(&server, config)
        .run_search("Harry Potter")
        .await
        .unwrap();

    assert_eq!(outcome.hits.len(), 1);
    let top = &outcome.hits[0];
    assert_eq!(top.rank, 0);
    assert_eq!(top.id.as_deref(), Some("42"));
    assert_eq!(
        top.highlighted_fields["title"],
        "<mark>Harry</mark> <mark>Potter</mark> and the Philosopher's Stone"
    );
    assert_eq!(
        top.highlighted_fields["description"],
        "A boy learns he is a wizard."
    );
    assert_eq!(top.document["publication_year"], 1997);
}

#[tokio::test]
async fn hybrid_request_goes_through_multi_search() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/multi_search"))
        .and(header("X-TYPESENSE-API-KEY", "search-only-key"))
        .and(|request: &Request| {
            let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
                return false;
            };
            let search = &body["searches"][0];
            search["collection"] == "books"
                && search["q"] == "Harry Potter"
                && search["query_by"] == "title,description,embedding"
                && search["exclude_fields"] == "embedding"
                && search["rerank_hybrid_matches"] == "true"
                && search["vector_query"] == "embedding:([0.5,0.25], alpha: 0.2)"
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [harry_potter_hits()]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config(2000);
    config.search.index_computes_embeddings = false;
    let outcome = orchestrator(&server, config)
        .with_embedder(StaticEmbedder::new(vec![0.5, 0.25]))
        .run_search("Harry Potter")
        .await
        .unwrap();

    assert_eq!(outcome.strategy, SearchStrategy::Hybrid);
    assert!(!outcome.degraded);
    assert!(outcome.hits[0].highlighted_fields["title"].contains("<mark>Potter</mark>"));
}

#[tokio::test]
async fn index_computed_embedding_sends_empty_vector() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/multi_search"))
        .and(|request: &Request| {
            serde_json::from_slice::<Value>(&request.body)
                .map(|body| body["searches"][0]["vector_query"] == "embedding:([], alpha: 0.2)")
                .unwrap_or(false)
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = orchestrator(&server, config(2000))
        .run_search("dune")
        .await
        .unwrap();
    assert!(outcome.hits.is_empty());
}

// ────────────────────────────────────────────────────────────────────────────
// Response Parsing Tests
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn multi_search_without_results_is_zero_hits() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/multi_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = TypesenseClient::with_base_url(&config(2000).connection, &server.uri()).unwrap();
    let request = typesense_search::orchestrator::request::hybrid_request(
        "dune",
        &SearchConfig::default().search,
        vec![],
    );
    let envelope = client.hybrid_search(&request).await.unwrap();
    assert!(envelope.into_first_hits().is_empty());
}

#[tokio::test]
async fn response_order_is_preserved() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": [
                { "document": { "id": "c", "title": "Zebra" } },
                { "document": { "id": "a", "title": "Aardvark" } },
                { "document": { "id": "b", "title": "Mongoose" } }
            ]
        })))
        .mount(&server)
        .await;

    let mut config = config(2000);
    config.search.strategy = SearchStrategy::Lexical;
    let outcome = orchestrator(&server, config).run_search("animals").await.unwrap();
    let ids: Vec<_> = outcome
        .hits
        .iter()
        .map(|h| (h.rank, h.id.clone().unwrap()))
        .collect();
    assert_eq!(
        ids,
        vec![(0, "c".to_owned()), (1, "a".to_owned()), (2, "b".to_owned())]
    );
}

// ────────────────────────────────────────────────────────────────────────────
// Error Handling Tests
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn non_2xx_maps_to_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Forbidden - a valid `x-typesense-api-key` header must be sent."
        })))
        .mount(&server)
        .await;

    let mut config = config(2000);
    config.search.strategy = SearchStrategy::Lexical;
    let err = orchestrator(&server, config)
        .run_search("emma")
        .await
        .unwrap_err();
    assert!(err.is_service());
    let message = err.to_string();
    assert!(message.contains("401"));
    assert!(message.contains("x-typesense-api-key"));
    assert!(!message.contains("search-only-key"));
}

#[tokio::test]
async fn malformed_body_maps_to_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let mut config = config(2000);
    config.search.strategy = SearchStrategy::Lexical;
    let err = orchestrator(&server, config)
        .run_search("emma")
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Service(ref m) if m.contains("malformed")));
}

#[tokio::test]
async fn multi_search_error_element_maps_to_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/multi_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "code": 400, "error": "Could not find a field named `embedding` in the schema." }]
        })))
        .mount(&server)
        .await;

    let err = orchestrator(&server, config(2000))
        .run_search("emma")
        .await
        .unwrap_err();
    assert!(err.is_service());
}

#[tokio::test]
async fn slow_search_resolves_to_network_failure_within_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(harry_potter_hits())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut config = config(200);
    config.search.strategy = SearchStrategy::Lexical;
    let started = Instant::now();
    let err = orchestrator(&server, config)
        .run_search("Harry Potter")
        .await
        .unwrap_err();
    assert!(err.is_network(), "unexpected error: {err}");
    assert!(started.elapsed() < Duration::from_millis(200) + Duration::from_secs(2));
}

#[tokio::test]
async fn slow_suggestions_resolve_to_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(harry_potter_hits())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let update = orchestrator(&server, config(200))
        .fetch_suggestions("harr")
        .await;
    assert_eq!(update.entries().map(<[_]>::len), Some(0));
}

#[tokio::test]
async fn unreachable_node_maps_to_network_failure() {
    // Reserve a free port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let uri = format!("http://127.0.0.1:{port}");

    let mut config = config(500);
    config.search.strategy = SearchStrategy::Lexical;
    let client = TypesenseClient::with_base_url(&config.connection, &uri).unwrap();
    let err = Orchestrator::new(client, config)
        .unwrap()
        .run_search("emma")
        .await
        .unwrap_err();
    assert!(err.is_network(), "unexpected error: {err}");
}
