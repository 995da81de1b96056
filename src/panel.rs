//! The results panel: routes host messages and key presses to the editor,
//! the value viewer and the column statistics popup.

use std::time::{Duration, Instant};

use flume::Sender;
use log::{debug, warn};
use qview_search::SearchMode;

use crate::clipboard::{Clipboard, HostClipboard};
use crate::commands::{CommandAction, EDITOR_CONTEXT, VIEWER_CONTEXT};
use crate::config::AppConfig;
use crate::deferred::{DeferredQueue, DeferredTask};
use crate::dom::{Document, ScrollBehavior, SharedDocument};
use crate::dropdown::DropdownEvent;
use crate::editor::EditorBridge;
use crate::inspector::{IconRenderer, Inspector};
use crate::keybindings::{Keymap, canonicalize_trigger};
use crate::messaging::{FocusTarget, HostMessage, PanelMessage};
use crate::results::ResultSet;
use crate::stats_popup::StatsPopup;

pub struct Panel {
    keymap: Keymap,
    document: SharedDocument,
    results: ResultSet,
    inspector: Inspector,
    stats: StatsPopup,
    editor: EditorBridge,
    clipboard: Box<dyn Clipboard>,
    deferred: DeferredQueue,
    focus: FocusTarget,
    outbound: Sender<PanelMessage>,
    next_generation: u64,
}

impl Panel {
    /// Builds the panel; invalid keybind lines are reported to the host.
    pub fn new(config: &AppConfig, outbound: Sender<PanelMessage>) -> Self {
        let (keymap, warnings) = Keymap::from_config(config);
        let document = Document::shared();
        let panel = Self {
            keymap,
            inspector: Inspector::new(document.clone(), config),
            stats: StatsPopup::new(document.clone(), config),
            editor: EditorBridge::new(
                outbound.clone(),
                Duration::from_millis(config.doc_sync_debounce_ms),
            ),
            clipboard: Box::new(HostClipboard::new(outbound.clone())),
            document,
            results: ResultSet::default(),
            deferred: DeferredQueue::new(),
            focus: FocusTarget::Editor,
            outbound,
            next_generation: 0,
        };

        for warning in warnings {
            panel.report_warning(format!(
                "Ignoring invalid keybind at config line {}: {}",
                warning.line_number, warning.message
            ));
        }
        panel
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_icon_renderer(mut self, renderer: IconRenderer) -> Self {
        self.inspector = self.inspector.with_icon_renderer(renderer);
        self
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn inspector(&self) -> &Inspector {
        &self.inspector
    }

    pub fn stats(&self) -> &StatsPopup {
        &self.stats
    }

    pub fn editor(&self) -> &EditorBridge {
        &self.editor
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn focus(&self) -> FocusTarget {
        self.focus
    }

    pub fn handle(&mut self, message: HostMessage, now: Instant) {
        match message {
            HostMessage::Results { columns, rows } => {
                self.results = ResultSet::from_json_rows(columns, &rows);
            }
            HostMessage::SetText { text, selection } => {
                self.editor.set_text(text, selection, now);
            }
            HostMessage::OpenCell {
                row,
                column,
                container_id,
            } => {
                let generation = self.bump_generation();
                if self
                    .inspector
                    .open_cell(&self.results, row, column, &container_id, generation)
                {
                    self.after_viewer_opened(generation);
                }
            }
            HostMessage::OpenObject {
                value,
                container_id,
            } => {
                let generation = self.bump_generation();
                self.inspector.open_object(&value, &container_id, generation);
                self.after_viewer_opened(generation);
            }
            HostMessage::Search { query, mode } => {
                let mode = mode.and_then(|name| self.parse_mode(&name));
                self.inspector.on_query_changed(&query, mode);
            }
            HostMessage::Navigate { delta } => {
                self.inspector.navigate(delta);
            }
            HostMessage::SelectMatchAt { offset } => {
                self.inspector.select_match_at(offset);
            }
            HostMessage::CopyValue => {
                self.run_command(CommandAction::CopyValue);
            }
            HostMessage::CloseViewer => {
                self.inspector.close();
                self.focus = FocusTarget::Editor;
            }
            HostMessage::OpenColumnStats {
                column,
                container_id,
            } => {
                let generation = self.bump_generation();
                match self
                    .stats
                    .open(&self.results, column, &container_id, generation)
                {
                    Some(task) => self.deferred.schedule(task),
                    None => debug!("no column {} for statistics", column),
                }
            }
            HostMessage::CloseColumnStats => self.stats.close(),
            HostMessage::Focus { target } => self.focus = target,
            HostMessage::Mount { ids } => {
                let mut document = self.document.borrow_mut();
                for id in ids {
                    document.insert(id);
                }
            }
            HostMessage::Key { trigger } => {
                self.handle_key(&trigger);
            }
        }
    }

    /// Dispatches a key press; `false` when nothing handled it.
    pub fn handle_key(&mut self, trigger: &str) -> bool {
        if self.focus == FocusTarget::Dropdown {
            let key = canonicalize_trigger(trigger).unwrap_or_else(|_| trigger.to_string());
            match self.inspector.handle_mode_key(&key) {
                DropdownEvent::Ignored => {}
                DropdownEvent::Selected(mode) => {
                    self.focus = FocusTarget::Viewer;
                    self.send(PanelMessage::SearchModeChanged {
                        mode: mode.config_name().to_string(),
                    });
                    return true;
                }
                DropdownEvent::Closed => {
                    self.focus = FocusTarget::Viewer;
                    return true;
                }
                DropdownEvent::Opened | DropdownEvent::Highlighted(_) => return true,
            }
        }

        let context = match self.focus {
            FocusTarget::Editor => EDITOR_CONTEXT,
            FocusTarget::Viewer | FocusTarget::Dropdown => VIEWER_CONTEXT,
        };
        match self.keymap.resolve(trigger, Some(context)) {
            Some(action) => self.run_command(action),
            None => {
                debug!("no binding for `{}` in {}", trigger, context);
                false
            }
        }
    }

    pub fn run_command(&mut self, action: CommandAction) -> bool {
        if self.editor.execute(action) {
            return true;
        }

        match action {
            CommandAction::OpenSearch => match self.inspector.generation() {
                Some(generation) => {
                    self.focus = FocusTarget::Viewer;
                    self.deferred
                        .schedule(DeferredTask::FocusSearch { generation });
                    true
                }
                None => false,
            },
            CommandAction::SearchNext => self.inspector.navigate(1),
            CommandAction::SearchPrevious => self.inspector.navigate(-1),
            CommandAction::CycleSearchMode => {
                if !self.inspector.is_open() {
                    return false;
                }
                let mode = self.inspector.cycle_mode();
                self.send(PanelMessage::SearchModeChanged {
                    mode: mode.config_name().to_string(),
                });
                true
            }
            CommandAction::CopyValue => self.inspector.copy_value(self.clipboard.as_mut()),
            CommandAction::CloseViewer => {
                if self.stats.is_open() {
                    self.stats.close();
                    true
                } else if self.inspector.is_open() {
                    self.inspector.close();
                    self.focus = FocusTarget::Editor;
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// Runs postponed work; tasks whose view has gone away are dropped.
    pub fn run_deferred(&mut self) {
        for task in self.deferred.drain() {
            match task {
                DeferredTask::FocusSearch { generation } => {
                    self.inspector.focus_search(generation);
                }
                DeferredTask::DrawPie { generation } => {
                    self.stats.draw_pie(generation);
                }
            }
        }
    }

    /// Flushes due editor syncs and returns the next deadline.
    pub fn poll(&mut self, now: Instant) -> Option<Instant> {
        self.editor.flush_due(now);
        self.editor.next_deadline()
    }

    /// Sends changed elements, scrolls and focus moves to the host.
    pub fn flush_render(&mut self) -> usize {
        let (renders, scrolls, focus) = {
            let mut document = self.document.borrow_mut();
            (
                document.take_dirty(),
                document.take_scroll_requests(),
                document.take_focus_change(),
            )
        };

        let mut sent = 0;
        for (target, html) in renders {
            self.send(PanelMessage::Render { target, html });
            sent += 1;
        }
        for (target, request) in scrolls {
            self.send(PanelMessage::ScrollToMatch {
                target,
                match_index: request.match_index,
                smooth: request.behavior == ScrollBehavior::Smooth,
            });
            sent += 1;
        }
        if let Some(target) = focus {
            self.send(PanelMessage::FocusElement { target });
            sent += 1;
        }
        sent
    }

    pub fn report_warning(&self, message: impl Into<String>) {
        self.send(PanelMessage::Warning {
            message: message.into(),
        });
    }

    fn after_viewer_opened(&mut self, generation: u64) {
        self.focus = FocusTarget::Viewer;
        self.deferred
            .schedule(DeferredTask::FocusSearch { generation });
    }

    fn parse_mode(&self, name: &str) -> Option<SearchMode> {
        let mode = SearchMode::from_config_name(name);
        if mode.is_none() {
            warn!("unknown search mode `{}`", name);
            self.report_warning(format!("Unknown search mode `{}`", name));
        }
        mode
    }

    fn bump_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    fn send(&self, message: PanelMessage) {
        if self.outbound.send(message).is_err() {
            warn!("host channel closed; dropping panel message");
        }
    }
}
