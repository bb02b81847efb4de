//! # typesense-search
//!
//! Incremental, typo-tolerant search orchestration over a Typesense index.
//!
//! This crate is the logic behind a search box: it turns keystrokes into
//! autocomplete suggestions and submitted queries into ranked, highlighted
//! results, blending keyword and vector relevance when an embedding is
//! available.
//!
//! ## Design
//!
//! - [`debounce::Debouncer`] collapses keystroke bursts into one suggestion fetch
//! - [`Orchestrator`] builds prefix / lexical / hybrid requests from config,
//!   stamps suggestion fetches with request tokens and drops stale responses
//! - [`normalize`] maps raw hits to rank-preserving, highlight-first results
//! - [`view::SearchView`] decides what the rendering layer shows
//! - Graceful degradation: hybrid search without a query embedding runs
//!   lexical-only instead of failing
//!
//! ## Security
//!
//! - Use a search-only API key; it is sent as a header and redacted from
//!   `Debug` output and error messages
//! - Query text is logged only at trace level
//! - Highlight markup from the index is passed through unescaped

pub mod config;
pub mod debounce;
pub mod embedding;
pub mod error;
pub mod events;
pub mod http;
pub mod index;
pub mod normalize;
pub mod orchestrator;
pub mod types;
pub mod typesense;
pub mod view;

pub use config::SearchConfig;
pub use debounce::{Debouncer, InputSignal};
pub use embedding::{NoEmbedder, QueryEmbedder, StaticEmbedder};
pub use error::{Result, SearchError};
pub use events::{EventSink, SearchEvent, TracingSink};
pub use index::IndexService;
pub use orchestrator::Orchestrator;
pub use types::{
    NormalizedHit, QueryMode, RawHit, RequestToken, SearchOutcome, SearchStrategy,
    SuggestionEntry, SuggestionUpdate,
};
pub use typesense::TypesenseClient;
pub use view::{SearchView, ViewMode};

/// Run a single search against the Typesense node described by `config`.
///
/// Builds a [`TypesenseClient`] and an [`Orchestrator`] for one call. Keep
/// an [`Orchestrator`] around instead when issuing suggestions as well, so
/// request tokens are shared.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid, otherwise the
/// errors of [`Orchestrator::run_search`].
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> typesense_search::Result<()> {
/// let config = typesense_search::SearchConfig::default();
/// let outcome = typesense_search::search("harry potter", &config).await?;
/// for hit in &outcome.hits {
///     println!("{}: {:?}", hit.rank, hit.highlighted_fields.get("title"));
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: &SearchConfig) -> Result<SearchOutcome> {
    config.validate()?;
    let client = TypesenseClient::new(&config.connection)?;
    Orchestrator::new(client, config.clone())?
        .run_search(query)
        .await
}
