use flume::Sender;

use crate::messaging::PanelMessage;

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> anyhow::Result<()>;
}

/// Asks the host process to place text on the system clipboard.
pub struct HostClipboard {
    outbound: Sender<PanelMessage>,
}

impl HostClipboard {
    pub fn new(outbound: Sender<PanelMessage>) -> Self {
        Self { outbound }
    }
}

impl Clipboard for HostClipboard {
    fn write_text(&mut self, text: &str) -> anyhow::Result<()> {
        self.outbound.send(PanelMessage::WriteClipboard {
            text: text.to_string(),
        })?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> anyhow::Result<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_clipboard_forwards_text() {
        let (tx, rx) = flume::unbounded();
        let mut clipboard = HostClipboard::new(tx);
        clipboard.write_text("hello").unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            PanelMessage::WriteClipboard {
                text: "hello".to_string()
            }
        );
    }

    #[test]
    fn host_clipboard_fails_when_host_is_gone() {
        let (tx, rx) = flume::unbounded();
        drop(rx);
        assert!(HostClipboard::new(tx).write_text("x").is_err());
    }
}
