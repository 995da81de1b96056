//! A minimal element store standing in for the webview's DOM.
//!
//! Views write markup into elements by id; the host receives the changed
//! elements as render messages. Lookups of missing ids are silent no-ops.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use log::debug;
use qview_search::{ViewBinding, render};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollRequest {
    pub match_index: usize,
    pub behavior: ScrollBehavior,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub inner_html: String,
    pub scroll: Option<ScrollRequest>,
    pub focused: bool,
}

#[derive(Debug, Default)]
pub struct Document {
    elements: HashMap<String, Element>,
    dirty: BTreeSet<String>,
    focus_change: Option<String>,
}

pub type SharedDocument = Rc<RefCell<Document>>;

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedDocument {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn insert(&mut self, id: impl Into<String>) {
        self.elements.entry(id.into()).or_default();
    }

    pub fn remove(&mut self, id: &str) {
        if self.elements.remove(id).is_some() {
            self.dirty.remove(id);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn inner_html(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|element| element.inner_html.as_str())
    }

    /// Runs `f` on the element and marks it changed; missing ids are skipped.
    pub fn update(&mut self, id: &str, f: impl FnOnce(&mut Element)) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            debug!("skipping update of missing element `{}`", id);
            return false;
        };
        f(element);
        self.dirty.insert(id.to_string());
        true
    }

    pub fn set_inner_html(&mut self, id: &str, html: impl Into<String>) -> bool {
        let html = html.into();
        self.update(id, |element| element.inner_html = html)
    }

    pub fn focus(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return false;
        }
        for element in self.elements.values_mut() {
            element.focused = false;
        }
        self.focus_change = Some(id.to_string());
        self.update(id, |element| element.focused = true)
    }

    /// The element focused since the last call, if focus moved.
    pub fn take_focus_change(&mut self) -> Option<String> {
        self.focus_change
            .take()
            .filter(|id| self.elements.contains_key(id))
    }

    /// Pending scroll requests, in id order.
    pub fn take_scroll_requests(&mut self) -> Vec<(String, ScrollRequest)> {
        let mut requests: Vec<(String, ScrollRequest)> = self
            .elements
            .iter_mut()
            .filter_map(|(id, element)| Some((id.clone(), element.scroll.take()?)))
            .collect();
        requests.sort_by(|a, b| a.0.cmp(&b.0));
        requests
    }

    /// Changed elements since the last call, in id order.
    pub fn take_dirty(&mut self) -> Vec<(String, String)> {
        std::mem::take(&mut self.dirty)
            .into_iter()
            .filter_map(|id| {
                let html = self.elements.get(&id)?.inner_html.clone();
                Some((id, html))
            })
            .collect()
    }
}

/// Element ids used by a value viewer mounted in `container_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerIds {
    pub container: String,
    pub content: String,
    pub status: String,
    pub search: String,
    pub mode: String,
    pub copy: String,
}

impl ViewerIds {
    pub fn new(container_id: &str) -> Self {
        Self {
            container: container_id.to_string(),
            content: format!("{}-content", container_id),
            status: format!("{}-status", container_id),
            search: format!("{}-search", container_id),
            mode: format!("{}-mode", container_id),
            copy: format!("{}-copy", container_id),
        }
    }
}

/// [`ViewBinding`] that writes into a shared [`Document`].
pub struct DomBinding {
    document: SharedDocument,
    ids: ViewerIds,
    behavior: ScrollBehavior,
}

impl DomBinding {
    pub fn new(document: SharedDocument, ids: ViewerIds, smooth_scroll: bool) -> Self {
        Self {
            document,
            ids,
            behavior: if smooth_scroll {
                ScrollBehavior::Smooth
            } else {
                ScrollBehavior::Instant
            },
        }
    }

    pub fn ids(&self) -> &ViewerIds {
        &self.ids
    }

    pub fn into_ids(self) -> ViewerIds {
        self.ids
    }
}

impl ViewBinding for DomBinding {
    fn set_content(&mut self, markup: &str) {
        self.document
            .borrow_mut()
            .set_inner_html(&self.ids.content, markup);
    }

    fn mark_current(&mut self, previous: Option<usize>, current: usize) {
        self.document
            .borrow_mut()
            .update(&self.ids.content, |element| {
                element.inner_html = render::mark_current(&element.inner_html, previous, current);
            });
    }

    fn scroll_to_current(&mut self, index: usize) {
        let behavior = self.behavior;
        self.document
            .borrow_mut()
            .update(&self.ids.content, |element| {
                element.scroll = Some(ScrollRequest {
                    match_index: index,
                    behavior,
                });
            });
    }

    fn set_status(&mut self, status: &str) {
        self.document
            .borrow_mut()
            .set_inner_html(&self.ids.status, render::escape(status));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_elements_are_ignored() {
        let mut document = Document::new();
        assert!(!document.set_inner_html("nope", "x"));
        assert!(!document.focus("nope"));
        assert!(document.take_dirty().is_empty());
    }

    #[test]
    fn dirty_tracking_reports_changed_elements_once() {
        let mut document = Document::new();
        document.insert("a");
        document.insert("b");
        document.take_dirty();

        document.set_inner_html("b", "<i>b</i>");
        assert_eq!(
            document.take_dirty(),
            vec![("b".to_string(), "<i>b</i>".to_string())]
        );
        assert!(document.take_dirty().is_empty());
    }

    #[test]
    fn focus_moves_between_elements() {
        let mut document = Document::new();
        document.insert("a");
        document.insert("b");
        document.focus("a");
        document.focus("b");
        assert!(!document.get("a").unwrap().focused);
        assert!(document.get("b").unwrap().focused);
        assert_eq!(document.take_focus_change().as_deref(), Some("b"));
        assert_eq!(document.take_focus_change(), None);
    }

    #[test]
    fn scroll_requests_are_taken_once() {
        let mut document = Document::new();
        document.insert("b");
        document.insert("a");
        for id in ["b", "a"] {
            document.update(id, |element| {
                element.scroll = Some(ScrollRequest {
                    match_index: 1,
                    behavior: ScrollBehavior::Instant,
                })
            });
        }
        let requests = document.take_scroll_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].0, "a");
        assert!(document.take_scroll_requests().is_empty());
    }

    #[test]
    fn binding_writes_content_status_and_scroll() {
        let document = Document::shared();
        let ids = ViewerIds::new("cell");
        document.borrow_mut().insert(ids.content.clone());
        document.borrow_mut().insert(ids.status.clone());

        let mut binding = DomBinding::new(document.clone(), ids, true);
        binding.set_content("<mark class=\"match\" data-match-index=\"0\">a</mark>");
        binding.mark_current(None, 0);
        binding.scroll_to_current(0);
        binding.set_status("1 of 1 <ok>");

        let document = document.borrow();
        let content = document.get("cell-content").unwrap();
        assert!(content.inner_html.contains("match current"));
        assert_eq!(
            content.scroll,
            Some(ScrollRequest {
                match_index: 0,
                behavior: ScrollBehavior::Smooth
            })
        );
        assert_eq!(
            document.inner_html("cell-status"),
            Some("1 of 1 &lt;ok&gt;")
        );
    }

    #[test]
    fn binding_without_elements_is_silent() {
        let document = Document::shared();
        let mut binding = DomBinding::new(document.clone(), ViewerIds::new("gone"), false);
        binding.set_content("x");
        binding.mark_current(Some(0), 1);
        binding.scroll_to_current(1);
        binding.set_status("y");
        assert!(document.borrow_mut().take_dirty().is_empty());
    }
}
