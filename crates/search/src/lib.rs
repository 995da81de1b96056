//! Search, highlight and match navigation for qview's value inspectors.

mod engine;
mod matcher;
pub mod render;
mod state;
mod viewer;

pub use engine::{
    DEFAULT_MAX_MATCHES, SearchConfig, SearchEngine, SearchError, SearchMode, SearchPattern,
    compile, find_matches,
};
pub use matcher::{CurrentChange, MatchSpan, SearchResults};
pub use state::{SearchStatus, ViewerState};
pub use viewer::{ViewBinding, ViewerSession};
