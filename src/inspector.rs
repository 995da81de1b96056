//! Cell and object viewers with in-value search.

use std::fmt::Write as _;

use log::{debug, warn};
use qview_search::render::escape;
use qview_search::{SearchConfig, SearchMode, ViewerSession};
use serde_json::Value;

use crate::clipboard::Clipboard;
use crate::config::AppConfig;
use crate::dom::{DomBinding, SharedDocument, ViewerIds};
use crate::dropdown::{DropdownEvent, DropdownMenu};
use crate::results::ResultsProvider;

/// Shown on the copy button when no icon is configured or the renderer fails.
pub const BUILTIN_COPY_ICON: &str = "\u{29C9}";

/// Produces trusted icon markup, or `None` when the icon set is unavailable.
pub type IconRenderer = Box<dyn Fn() -> Option<String>>;

pub struct Inspector {
    document: SharedDocument,
    search_config: SearchConfig,
    smooth_scroll: bool,
    copy_icon: Option<String>,
    icon_renderer: Option<IconRenderer>,
    mode: SearchMode,
    mode_menu: DropdownMenu<SearchMode>,
    query: String,
    title: String,
    session: Option<ViewerSession<DomBinding>>,
}

impl Inspector {
    pub fn new(document: SharedDocument, config: &AppConfig) -> Self {
        let mut mode_menu = DropdownMenu::new()
            .item("Plain text", SearchMode::Plain)
            .item("Wildcard", SearchMode::Wildcard)
            .item("Regex", SearchMode::Regex);
        mode_menu.set_selected_value(&config.search_mode);

        Self {
            document,
            search_config: SearchConfig {
                mode: config.search_mode,
                max_matches: config.max_matches,
            },
            smooth_scroll: config.smooth_scroll,
            copy_icon: config.copy_icon.clone(),
            icon_renderer: None,
            mode: config.search_mode,
            mode_menu,
            query: String::new(),
            title: String::new(),
            session: None,
        }
    }

    pub fn with_icon_renderer(mut self, renderer: IconRenderer) -> Self {
        self.icon_renderer = Some(renderer);
        self
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn generation(&self) -> Option<u64> {
        self.session.as_ref().map(ViewerSession::generation)
    }

    pub fn session(&self) -> Option<&ViewerSession<DomBinding>> {
        self.session.as_ref()
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn mode_menu(&self) -> &DropdownMenu<SearchMode> {
        &self.mode_menu
    }

    /// Opens a viewer over a snapshot of one cell; `false` if it does not exist.
    pub fn open_cell(
        &mut self,
        provider: &dyn ResultsProvider,
        row: usize,
        column: usize,
        container_id: &str,
        generation: u64,
    ) -> bool {
        let Some(cell) = provider.cell(row, column) else {
            debug!("no cell at row {} column {}", row, column);
            return false;
        };
        let title = match provider.column_name(column) {
            Some(name) => format!("{} [row {}]", name, row + 1),
            None => format!("Row {}", row + 1),
        };
        self.open_text(cell.display().to_string(), title, container_id, generation);
        true
    }

    pub fn open_object(&mut self, value: &Value, container_id: &str, generation: u64) {
        self.open_text(object_text(value), "Object".to_string(), container_id, generation);
    }

    /// Replaces any open viewer with one over `text`.
    ///
    /// A missing container still yields a session; its view updates are dropped.
    pub fn open_text(&mut self, text: String, title: String, container_id: &str, generation: u64) {
        self.close();

        let ids = ViewerIds::new(container_id);
        {
            let mut document = self.document.borrow_mut();
            if document.contains(&ids.container) {
                document.set_inner_html(&ids.container, self.chrome_markup(&ids, &title));
                for id in [&ids.content, &ids.status, &ids.search, &ids.mode, &ids.copy] {
                    document.insert(id.clone());
                }
                document.set_inner_html(&ids.mode, self.mode_menu.render(&ids.mode));
                document.set_inner_html(&ids.copy, self.copy_icon_markup());
            } else {
                debug!("viewer container `{}` is missing", container_id);
            }
        }

        let binding = DomBinding::new(self.document.clone(), ids, self.smooth_scroll);
        self.session = Some(ViewerSession::open(
            text,
            self.search_config,
            binding,
            generation,
        ));
        self.query.clear();
        self.title = title;
    }

    pub fn close(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let ids = session.close().into_ids();
        let mut document = self.document.borrow_mut();
        for id in [&ids.content, &ids.status, &ids.search, &ids.mode, &ids.copy] {
            document.remove(id);
        }
        document.set_inner_html(&ids.container, "");
        self.mode_menu.close();
        self.title.clear();
    }

    /// Re-runs the search; `mode` overrides the selected mode when given.
    pub fn on_query_changed(&mut self, query: &str, mode: Option<SearchMode>) -> bool {
        if let Some(mode) = mode {
            self.select_mode(mode);
        }
        self.query = query.to_string();
        self.rerun()
    }

    pub fn navigate(&mut self, delta: isize) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.navigate(delta);
        true
    }

    pub fn set_current(&mut self, index: isize) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.set_current(index);
        true
    }

    pub fn select_match_at(&mut self, offset: usize) -> bool {
        self.session
            .as_mut()
            .is_some_and(|session| session.select_match_at(offset))
    }

    /// Advances Plain -> Wildcard -> Regex -> Plain and re-runs the search.
    pub fn cycle_mode(&mut self) -> SearchMode {
        let next = match self.mode {
            SearchMode::Plain => SearchMode::Wildcard,
            SearchMode::Wildcard => SearchMode::Regex,
            SearchMode::Regex => SearchMode::Plain,
        };
        self.select_mode(next);
        self.rerun();
        next
    }

    /// Feeds a key to the mode dropdown; a selection re-runs the search.
    pub fn handle_mode_key(&mut self, key: &str) -> DropdownEvent<SearchMode> {
        let event = self.mode_menu.handle_key(key);
        if let DropdownEvent::Selected(mode) = event {
            self.mode = mode;
            self.rerun();
        }
        self.render_mode_menu();
        event
    }

    /// Copies the viewed snapshot. Clipboard failures are logged, not raised.
    pub fn copy_value(&self, clipboard: &mut dyn Clipboard) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        match clipboard.write_text(session.state().source_text()) {
            Ok(()) => true,
            Err(error) => {
                warn!("failed to copy value: {error:#}");
                false
            }
        }
    }

    /// Focuses the search box if the viewer from `generation` is still open.
    pub fn focus_search(&self, generation: u64) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        if session.generation() != generation {
            debug!("dropping focus for stale viewer {}", generation);
            return false;
        }
        let id = &session.binding().ids().search;
        self.document.borrow_mut().focus(id)
    }

    fn select_mode(&mut self, mode: SearchMode) {
        if self.mode != mode {
            self.mode = mode;
            self.mode_menu.set_selected_value(&mode);
            self.render_mode_menu();
        }
    }

    fn rerun(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.on_query_changed(&self.query, self.mode);
        true
    }

    fn render_mode_menu(&self) {
        if let Some(session) = self.session.as_ref() {
            let id = &session.binding().ids().mode;
            self.document
                .borrow_mut()
                .set_inner_html(id, self.mode_menu.render(id));
        }
    }

    fn copy_icon_markup(&self) -> String {
        if let Some(icon) = &self.copy_icon {
            return escape(icon);
        }
        self.icon_renderer
            .as_ref()
            .and_then(|render| render())
            .unwrap_or_else(|| BUILTIN_COPY_ICON.to_string())
    }

    fn chrome_markup(&self, ids: &ViewerIds, title: &str) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "<div class=\"viewer-header\"><span class=\"viewer-title\">{}</span>\
             <div id=\"{}\" class=\"viewer-mode\"></div>\
             <button id=\"{}\" class=\"viewer-copy\" title=\"Copy value\"></button></div>\
             <input id=\"{}\" class=\"viewer-search\" type=\"search\" placeholder=\"Search\">\
             <span id=\"{}\" class=\"viewer-status\"></span>\
             <pre id=\"{}\" class=\"viewer-content\"></pre>",
            escape(title),
            escape(&ids.mode),
            escape(&ids.copy),
            escape(&ids.search),
            escape(&ids.status),
            escape(&ids.content),
        );
        out
    }
}

/// Pretty JSON for structured values; strings are shown verbatim unless they
/// hold a JSON object or array.
fn object_text(value: &Value) -> String {
    let pretty = |value: &Value| {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    };
    match value {
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(parsed @ (Value::Object(_) | Value::Array(_))) => pretty(&parsed),
            _ => text.clone(),
        },
        other => pretty(other),
    }
}
