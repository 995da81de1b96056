//! Glue between the query editor and the host: command dispatch and
//! debounced document sync.

use std::time::{Duration, Instant};

use flume::Sender;
use log::{debug, warn};

use crate::commands::CommandAction;
use crate::messaging::PanelMessage;

struct PendingSync {
    token: u64,
    due: Instant,
}

pub struct EditorBridge {
    text: String,
    selection: Option<(usize, usize)>,
    outbound: Sender<PanelMessage>,
    debounce: Duration,
    pending: Option<PendingSync>,
    next_token: u64,
}

impl EditorBridge {
    pub fn new(outbound: Sender<PanelMessage>, debounce: Duration) -> Self {
        Self {
            text: String::new(),
            selection: None,
            outbound,
            debounce,
            pending: None,
            next_token: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Selected text, or `None` when the selection is empty or out of range.
    pub fn selected_text(&self) -> Option<&str> {
        let (start, end) = self.selection?;
        let (start, end) = (start.min(end), start.max(end));
        self.text.get(start..end).filter(|text| !text.is_empty())
    }

    /// Records an edit and restarts the sync timer; later edits supersede
    /// earlier ones.
    pub fn set_text(&mut self, text: String, selection: Option<(usize, usize)>, now: Instant) {
        self.selection = selection;
        if text == self.text {
            return;
        }
        self.text = text;
        self.next_token += 1;
        self.pending = Some(PendingSync {
            token: self.next_token,
            due: now + self.debounce,
        });
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due)
    }

    /// Sends the document if its debounce deadline has passed.
    pub fn flush_due(&mut self, now: Instant) -> bool {
        match &self.pending {
            Some(pending) if pending.due <= now => {
                debug!("syncing document after edit {}", pending.token);
                self.flush();
                true
            }
            _ => false,
        }
    }

    /// Runs an editor-side command; `false` if `action` is not one of them.
    pub fn execute(&mut self, action: CommandAction) -> bool {
        match action {
            CommandAction::ExecuteQuery => {
                self.run(self.text.clone());
                true
            }
            CommandAction::ExecuteSelection => {
                let text = self.selected_text().unwrap_or(&self.text).to_string();
                self.run(text);
                true
            }
            CommandAction::CancelQuery => {
                self.send(PanelMessage::CancelQuery);
                true
            }
            CommandAction::SaveDocument => {
                self.flush();
                self.send(PanelMessage::SaveDocument {
                    text: self.text.clone(),
                });
                true
            }
            _ => false,
        }
    }

    fn run(&mut self, text: String) {
        if text.trim().is_empty() {
            debug!("ignoring run of empty query");
            return;
        }
        self.flush();
        self.send(PanelMessage::ExecuteQuery { text });
    }

    fn flush(&mut self) {
        if self.pending.take().is_some() {
            self.send(PanelMessage::DocumentChanged {
                text: self.text.clone(),
            });
        }
    }

    fn send(&self, message: PanelMessage) {
        if self.outbound.send(message).is_err() {
            warn!("host channel closed; dropping editor message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flume::Receiver;

    fn bridge() -> (EditorBridge, Receiver<PanelMessage>) {
        let (tx, rx) = flume::unbounded();
        (EditorBridge::new(tx, Duration::from_millis(300)), rx)
    }

    #[test]
    fn edits_sync_after_debounce_with_latest_text() {
        let (mut editor, rx) = bridge();
        let start = Instant::now();
        editor.set_text("sel".into(), None, start);
        editor.set_text("select 1".into(), None, start + Duration::from_millis(100));
        assert_eq!(
            editor.next_deadline(),
            Some(start + Duration::from_millis(400))
        );

        assert!(!editor.flush_due(start + Duration::from_millis(350)));
        assert!(rx.try_recv().is_err());

        assert!(editor.flush_due(start + Duration::from_millis(400)));
        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![PanelMessage::DocumentChanged {
                text: "select 1".into()
            }]
        );
        assert_eq!(editor.next_deadline(), None);
    }

    #[test]
    fn unchanged_text_does_not_schedule_sync() {
        let (mut editor, _rx) = bridge();
        let now = Instant::now();
        editor.set_text(String::new(), Some((0, 0)), now);
        assert_eq!(editor.next_deadline(), None);
    }

    #[test]
    fn execute_flushes_pending_sync_first() {
        let (mut editor, rx) = bridge();
        editor.set_text("select 1".into(), None, Instant::now());
        assert!(editor.execute(CommandAction::ExecuteQuery));
        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![
                PanelMessage::DocumentChanged {
                    text: "select 1".into()
                },
                PanelMessage::ExecuteQuery {
                    text: "select 1".into()
                }
            ]
        );
    }

    #[test]
    fn execute_selection_prefers_selected_text() {
        let (mut editor, rx) = bridge();
        let now = Instant::now();
        editor.set_text("select 1; select 2".into(), Some((18, 10)), now);
        assert_eq!(editor.selected_text(), Some("select 2"));
        editor.execute(CommandAction::ExecuteSelection);
        assert_eq!(
            rx.try_iter().last(),
            Some(PanelMessage::ExecuteQuery {
                text: "select 2".into()
            })
        );

        editor.set_text("select 1; select 2".into(), Some((3, 3)), now);
        editor.execute(CommandAction::ExecuteSelection);
        assert_eq!(
            rx.try_iter().last(),
            Some(PanelMessage::ExecuteQuery {
                text: "select 1; select 2".into()
            })
        );
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let (mut editor, _rx) = bridge();
        editor.set_text("héllo".into(), Some((0, 2)), Instant::now());
        assert_eq!(editor.selected_text(), None);
        editor.set_text("héllo".into(), Some((0, 99)), Instant::now());
        assert_eq!(editor.selected_text(), None);
    }

    #[test]
    fn blank_query_is_not_sent() {
        let (mut editor, rx) = bridge();
        editor.set_text("  \n".into(), None, Instant::now());
        assert!(editor.execute(CommandAction::ExecuteQuery));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn save_and_cancel_are_forwarded() {
        let (mut editor, rx) = bridge();
        editor.set_text("x".into(), None, Instant::now());
        editor.execute(CommandAction::SaveDocument);
        editor.execute(CommandAction::CancelQuery);
        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![
                PanelMessage::DocumentChanged { text: "x".into() },
                PanelMessage::SaveDocument { text: "x".into() },
                PanelMessage::CancelQuery
            ]
        );
    }

    #[test]
    fn viewer_commands_are_not_handled() {
        let (mut editor, _rx) = bridge();
        assert!(!editor.execute(CommandAction::SearchNext));
        assert!(!editor.execute(CommandAction::CopyValue));
    }
}
