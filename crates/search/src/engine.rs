use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::matcher::{MatchSpan, SearchResults};

/// Upper bound on highlighted matches for a single search.
pub const DEFAULT_MAX_MATCHES: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchMode {
    #[default]
    Plain,
    Wildcard,
    Regex,
}

impl SearchMode {
    pub fn from_config_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "plain" | "literal" | "text" => Some(Self::Plain),
            "wildcard" | "glob" => Some(Self::Wildcard),
            "regex" | "regexp" => Some(Self::Regex),
            _ => None,
        }
    }

    pub fn config_name(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Wildcard => "wildcard",
            Self::Regex => "regex",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub mode: SearchMode,
    pub max_matches: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::Plain,
            max_matches: DEFAULT_MAX_MATCHES,
        }
    }
}

/// A compiled, case-insensitive search pattern.
#[derive(Debug, Clone)]
pub struct SearchPattern {
    regex: Regex,
    mode: SearchMode,
}

impl SearchPattern {
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }
}

/// Compiles `query` for the given mode.
///
/// An empty query yields `Ok(None)`, meaning "no search" rather than a
/// pattern that matches nothing.
pub fn compile(query: &str, mode: SearchMode) -> Result<Option<SearchPattern>, SearchError> {
    if query.is_empty() {
        return Ok(None);
    }

    let source = match mode {
        SearchMode::Plain => regex::escape(query),
        SearchMode::Wildcard => wildcard_to_regex(query),
        SearchMode::Regex => query.to_string(),
    };

    RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()
        .map(|regex| Some(SearchPattern { regex, mode }))
        .map_err(|error| SearchError::InvalidPattern(error_reason(&error.to_string())))
}

fn wildcard_to_regex(query: &str) -> String {
    let mut out = String::with_capacity(query.len() * 2);
    let mut buf = [0u8; 4];
    for c in query.chars() {
        match c {
            '*' => out.push_str(".*?"),
            '?' => out.push('.'),
            _ => out.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }
    out
}

// regex renders multi-line diagnostics with a caret diagram; keep the last line.
fn error_reason(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .unwrap_or(message)
        .to_string()
}

/// Scans `text` left to right and returns at most `max_matches` spans.
///
/// Zero-width matches are skipped and the scan advances by one character, so
/// patterns such as `a*` or `^` always terminate.
pub fn find_matches(text: &str, pattern: &SearchPattern, max_matches: usize) -> Vec<MatchSpan> {
    let regex = pattern.as_regex();
    let mut matches = Vec::new();
    let mut pos = 0;

    while pos <= text.len() && matches.len() < max_matches {
        let Some(found) = regex.find_at(text, pos) else {
            break;
        };

        if found.start() == found.end() {
            match text[found.end()..].chars().next() {
                Some(c) => pos = found.end() + c.len_utf8(),
                None => break,
            }
            continue;
        }

        matches.push(MatchSpan::new(found.start(), found.end()));
        pos = found.end();
    }

    matches
}

pub struct SearchEngine {
    config: SearchConfig,
    compiled: Option<SearchPattern>,
    pattern: String,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            compiled: None,
            pattern: String::new(),
        }
    }

    /// Always recompiles, even when the pattern is unchanged.
    pub fn set_pattern(&mut self, pattern: &str, mode: SearchMode) -> Result<(), SearchError> {
        self.pattern = pattern.to_string();
        self.config.mode = mode;

        match compile(pattern, mode) {
            Ok(compiled) => {
                self.compiled = compiled;
                Ok(())
            }
            Err(error) => {
                self.compiled = None;
                Err(error)
            }
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn mode(&self) -> SearchMode {
        self.config.mode
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    pub fn has_pattern(&self) -> bool {
        self.compiled.is_some()
    }

    pub fn search(&self, text: &str) -> SearchResults {
        let Some(pattern) = &self.compiled else {
            return SearchResults::new();
        };

        SearchResults::from_matches(find_matches(text, pattern, self.config.max_matches))
    }
}
