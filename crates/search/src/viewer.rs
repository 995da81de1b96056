use log::debug;

use crate::engine::{SearchConfig, SearchMode};
use crate::matcher::CurrentChange;
use crate::render;
use crate::state::{SearchStatus, ViewerState};

/// Rendering surface driven by a [`ViewerSession`].
///
/// Implementations must tolerate missing targets by doing nothing.
pub trait ViewBinding {
    fn set_content(&mut self, markup: &str);
    /// Clears the current flag on `previous` (if any) and sets it on `current`.
    fn mark_current(&mut self, previous: Option<usize>, current: usize);
    /// Best-effort smooth scroll of the match into view.
    fn scroll_to_current(&mut self, index: usize);
    fn set_status(&mut self, status: &str);
}

/// An open viewer: a value snapshot, its search state, and the view it drives.
pub struct ViewerSession<B: ViewBinding> {
    state: ViewerState,
    binding: B,
    generation: u64,
    marked: Option<usize>,
}

impl<B: ViewBinding> ViewerSession<B> {
    /// Opens a session over `source_text`, captured once and never re-read.
    pub fn open(
        source_text: impl Into<String>,
        config: SearchConfig,
        binding: B,
        generation: u64,
    ) -> Self {
        let mut session = Self {
            state: ViewerState::new(source_text, config),
            binding,
            generation,
            marked: None,
        };
        session.render_plain();
        session.binding.set_status("");
        session
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn status(&self) -> SearchStatus {
        self.state.status()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn binding(&self) -> &B {
        &self.binding
    }

    pub fn binding_mut(&mut self) -> &mut B {
        &mut self.binding
    }

    pub fn on_query_changed(&mut self, query: &str, mode: SearchMode) {
        self.state.on_query_changed(query, mode);

        if let Some(error) = self.state.error() {
            debug!("viewer {}: {}", self.generation, error);
        }

        if self.state.matches().is_empty() {
            self.render_plain();
        } else {
            let markup = render::render(self.state.source_text(), self.state.matches());
            self.binding.set_content(&markup);
            self.marked = None;
            self.show_current(self.state.current_index());
        }

        let status = self.state.status_text();
        self.binding.set_status(&status);
    }

    pub fn set_current(&mut self, index: isize) {
        let change = self.state.set_current(index);
        self.apply_change(change);
    }

    pub fn navigate(&mut self, delta: isize) {
        let change = self.state.navigate(delta);
        self.apply_change(change);
    }

    fn apply_change(&mut self, change: Option<CurrentChange>) {
        let Some(change) = change else {
            return;
        };
        self.show_current(change.current);
        let status = self.state.status_text();
        self.binding.set_status(&status);
    }

    /// Makes the match covering `offset` current, e.g. after a click.
    pub fn select_match_at(&mut self, offset: usize) -> bool {
        match self.state.results().match_at(offset) {
            Some(index) => {
                self.set_current(index as isize);
                true
            }
            None => false,
        }
    }

    /// Ends the session, handing the view back to the caller.
    pub fn close(self) -> B {
        self.binding
    }

    fn show_current(&mut self, current: usize) {
        if self.marked != Some(current) {
            self.binding.mark_current(self.marked, current);
            self.marked = Some(current);
        }
        self.binding.scroll_to_current(current);
    }

    fn render_plain(&mut self) {
        self.binding
            .set_content(&render::escape(self.state.source_text()));
        self.marked = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum ViewCall {
        Content(String),
        Mark(Option<usize>, usize),
        Scroll(usize),
        Status(String),
    }

    #[derive(Default)]
    struct RecordingView {
        calls: Vec<ViewCall>,
    }

    impl RecordingView {
        fn take(&mut self) -> Vec<ViewCall> {
            std::mem::take(&mut self.calls)
        }
    }

    impl ViewBinding for RecordingView {
        fn set_content(&mut self, markup: &str) {
            self.calls.push(ViewCall::Content(markup.to_string()));
        }

        fn mark_current(&mut self, previous: Option<usize>, current: usize) {
            self.calls.push(ViewCall::Mark(previous, current));
        }

        fn scroll_to_current(&mut self, index: usize) {
            self.calls.push(ViewCall::Scroll(index));
        }

        fn set_status(&mut self, status: &str) {
            self.calls.push(ViewCall::Status(status.to_string()));
        }
    }

    fn open(text: &str) -> ViewerSession<RecordingView> {
        let mut session =
            ViewerSession::open(text, SearchConfig::default(), RecordingView::default(), 1);
        session.binding_mut().take();
        session
    }

    #[test]
    fn open_renders_escaped_source() {
        let mut session = ViewerSession::open(
            "<tag>",
            SearchConfig::default(),
            RecordingView::default(),
            9,
        );
        assert_eq!(session.generation(), 9);
        assert_eq!(
            session.binding_mut().take(),
            vec![
                ViewCall::Content("&lt;tag&gt;".to_string()),
                ViewCall::Status(String::new())
            ]
        );
    }

    #[test]
    fn query_marks_first_match_and_reports_position() {
        let mut session = open("abcabcabc");
        session.on_query_changed("abc", SearchMode::Plain);

        let calls = session.binding_mut().take();
        assert!(matches!(&calls[0], ViewCall::Content(markup) if markup.contains("data-match-index=\"2\"")));
        assert_eq!(
            &calls[1..],
            &[
                ViewCall::Mark(None, 0),
                ViewCall::Scroll(0),
                ViewCall::Status("1 of 3".to_string())
            ]
        );
    }

    #[test]
    fn navigate_moves_exactly_one_marker() {
        let mut session = open("abcabcabc");
        session.on_query_changed("abc", SearchMode::Plain);
        session.binding_mut().take();

        session.navigate(-1);
        assert_eq!(
            session.binding_mut().take(),
            vec![
                ViewCall::Mark(Some(0), 2),
                ViewCall::Scroll(2),
                ViewCall::Status("3 of 3".to_string())
            ]
        );

        session.navigate(1);
        assert_eq!(session.state().current_index(), 0);
    }

    #[test]
    fn navigate_accepts_any_delta() {
        let mut session = open("abcabcabc");
        session.on_query_changed("abc", SearchMode::Plain);
        session.navigate(1);
        session.navigate(isize::MAX);
        // isize::MAX is 1 mod 3.
        assert_eq!(session.state().current_index(), 2);
        session.navigate(isize::MIN);
        // isize::MIN is 1 mod 3 as well.
        assert_eq!(session.state().current_index(), 0);
        assert_eq!(session.state().status_text(), "1 of 3");
    }

    #[test]
    fn set_current_without_matches_touches_nothing() {
        let mut session = open("abc");
        session.set_current(3);
        session.navigate(1);
        assert!(session.binding_mut().take().is_empty());
        assert_eq!(session.state().current_index(), 0);

        session.on_query_changed("zzz", SearchMode::Plain);
        session.binding_mut().take();
        session.navigate(-1);
        assert!(session.binding_mut().take().is_empty());
    }

    #[test]
    fn invalid_pattern_shows_plain_source_and_error() {
        let mut session = open("a(b");
        session.on_query_changed("a", SearchMode::Plain);
        session.binding_mut().take();

        session.on_query_changed("(", SearchMode::Regex);
        let calls = session.binding_mut().take();
        assert_eq!(calls[0], ViewCall::Content("a(b".to_string()));
        assert!(matches!(&calls[1], ViewCall::Status(text) if !text.is_empty()));
        assert!(matches!(session.status(), SearchStatus::Invalid(_)));
    }

    #[test]
    fn rerender_with_same_query_keeps_current() {
        let mut session = open("x x x");
        session.on_query_changed("x", SearchMode::Plain);
        session.set_current(1);
        session.binding_mut().take();

        session.on_query_changed("x", SearchMode::Plain);
        let calls = session.binding_mut().take();
        assert_eq!(calls[1], ViewCall::Mark(None, 1));
        assert_eq!(session.state().current_index(), 1);
    }

    #[test]
    fn select_match_at_offset() {
        let mut session = open("one two one");
        session.on_query_changed("one", SearchMode::Plain);
        assert!(session.select_match_at(9));
        assert_eq!(session.state().current_index(), 1);
        assert!(!session.select_match_at(5));
    }

    #[test]
    fn close_returns_binding() {
        let session = open("abc");
        let view = session.close();
        assert!(view.calls.is_empty());
    }
}
