//! What the rendering layer should currently show.
//!
//! [`SearchView`] folds suggestion updates and search outcomes into one
//! display state. It never talks to the index; it only decides which of the
//! orchestrator's answers are visible.

use crate::error::SearchError;
use crate::types::{NormalizedHit, SearchOutcome, SuggestionEntry, SuggestionUpdate};

/// Which panel the UI shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Nothing typed, or suggestions cleared.
    #[default]
    Idle,
    /// Autocomplete list under the input.
    Suggestions,
    /// A submitted search is running.
    Searching,
    /// Ranked results of the last submitted search.
    Results,
    /// The last submitted search failed; offer a retry.
    SearchFailed,
}

/// Display state handed to the rendering layer as immutable snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchView {
    mode: ViewMode,
    suggestions: Vec<SuggestionEntry>,
    results: Vec<NormalizedHit>,
    degraded: bool,
    error: Option<String>,
}

impl SearchView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn suggestions(&self) -> &[SuggestionEntry] {
        &self.suggestions
    }

    pub fn results(&self) -> &[NormalizedHit] {
        &self.results
    }

    /// Whether the shown results came from a lexical fallback of a hybrid search.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Apply a suggestion update. Returns `true` if the view changed.
    ///
    /// Superseded updates are ignored. An empty fresh update clears the
    /// suggestion list and returns the view to idle, unless results are on
    /// screen, which typing does not hide until new suggestions arrive.
    pub fn apply_suggestions(&mut self, update: SuggestionUpdate) -> bool {
        let SuggestionUpdate::Fresh { entries, .. } = update else {
            return false;
        };
        if self.mode == ViewMode::Searching {
            return false;
        }

        if entries.is_empty() {
            let changed = !self.suggestions.is_empty() || self.mode == ViewMode::Suggestions;
            self.suggestions.clear();
            if self.mode == ViewMode::Suggestions {
                self.mode = ViewMode::Idle;
            }
            return changed;
        }

        self.suggestions = entries;
        self.mode = ViewMode::Suggestions;
        true
    }

    /// Switch to search mode: suggestions are cleared immediately.
    pub fn begin_search(&mut self) {
        self.suggestions.clear();
        self.error = None;
        self.mode = ViewMode::Searching;
    }

    /// Show the outcome of a submitted search.
    pub fn apply_search(&mut self, outcome: Result<SearchOutcome, SearchError>) {
        self.suggestions.clear();
        match outcome {
            Ok(outcome) => {
                self.results = outcome.hits;
                self.degraded = outcome.degraded;
                self.error = None;
                self.mode = ViewMode::Results;
            }
            Err(err) => {
                self.results.clear();
                self.degraded = false;
                self.error = Some(err.to_string());
                self.mode = ViewMode::SearchFailed;
            }
        }
    }
}
