use std::fmt;

use crate::engine::{SearchConfig, SearchEngine, SearchError, SearchMode};
use crate::matcher::{CurrentChange, MatchSpan, SearchResults};

/// Where a viewer's search currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    NotSearched,
    Invalid(String),
    Searched { count: usize },
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSearched => Ok(()),
            Self::Invalid(message) => f.write_str(message),
            Self::Searched { count: 0 } => f.write_str("No matches"),
            Self::Searched { count: 1 } => f.write_str("1 match"),
            Self::Searched { count } => write!(f, "{count} matches"),
        }
    }
}

/// Search state over a snapshot of a single value.
pub struct ViewerState {
    source_text: String,
    engine: SearchEngine,
    results: SearchResults,
    error: Option<SearchError>,
}

impl ViewerState {
    pub fn new(source_text: impl Into<String>, config: SearchConfig) -> Self {
        Self {
            source_text: source_text.into(),
            engine: SearchEngine::new(config),
            results: SearchResults::new(),
            error: None,
        }
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn query(&self) -> &str {
        self.engine.pattern()
    }

    pub fn mode(&self) -> SearchMode {
        self.engine.mode()
    }

    pub fn matches(&self) -> &[MatchSpan] {
        self.results.matches()
    }

    pub fn results(&self) -> &SearchResults {
        &self.results
    }

    pub fn current_index(&self) -> usize {
        self.results.current_index()
    }

    pub fn error(&self) -> Option<&SearchError> {
        self.error.as_ref()
    }

    pub fn status(&self) -> SearchStatus {
        if let Some(SearchError::InvalidPattern(message)) = &self.error {
            return SearchStatus::Invalid(message.clone());
        }
        if !self.engine.has_pattern() {
            return SearchStatus::NotSearched;
        }
        SearchStatus::Searched {
            count: self.results.count(),
        }
    }

    /// Text for the status readout next to the search box.
    pub fn status_text(&self) -> String {
        match (self.status(), self.results.position()) {
            (SearchStatus::Searched { .. }, Some((current, total))) => {
                format!("{current} of {total}")
            }
            (status, _) => status.to_string(),
        }
    }

    /// Recompiles and re-runs the search.
    ///
    /// The current match resets to the first one only when the query or mode
    /// changed. Returns whether that reset happened.
    pub fn on_query_changed(&mut self, query: &str, mode: SearchMode) -> bool {
        let changed = query != self.engine.pattern() || mode != self.engine.mode();
        let previous_index = self.results.current_index();
        self.error = None;

        match self.engine.set_pattern(query, mode) {
            Ok(()) => {
                let mut results = self.engine.search(&self.source_text);
                if !changed {
                    results.jump_to(previous_index);
                }
                self.results = results;
            }
            Err(error) => {
                self.results = SearchResults::new();
                self.error = Some(error);
            }
        }

        changed
    }

    pub fn set_current(&mut self, index: isize) -> Option<CurrentChange> {
        self.results.set_current(index)
    }

    pub fn navigate(&mut self, delta: isize) -> Option<CurrentChange> {
        self.results.step(delta)
    }
}
