use crate::commands::CommandAction;

#[derive(Debug, Clone, Copy)]
pub struct DefaultKeybind {
    pub trigger: &'static str,
    pub action: CommandAction,
}

const fn bind(trigger: &'static str, action: CommandAction) -> DefaultKeybind {
    DefaultKeybind { trigger, action }
}

pub fn default_keybinds() -> Vec<DefaultKeybind> {
    vec![
        // Editor
        bind("secondary-enter", CommandAction::ExecuteQuery),
        bind("f5", CommandAction::ExecuteQuery),
        bind("secondary-shift-enter", CommandAction::ExecuteSelection),
        bind("secondary-.", CommandAction::CancelQuery),
        bind("secondary-s", CommandAction::SaveDocument),
        // Value viewer
        bind("secondary-f", CommandAction::OpenSearch),
        bind("enter", CommandAction::SearchNext),
        bind("f3", CommandAction::SearchNext),
        bind("shift-enter", CommandAction::SearchPrevious),
        bind("shift-f3", CommandAction::SearchPrevious),
        bind("alt-r", CommandAction::CycleSearchMode),
        bind("secondary-c", CommandAction::CopyValue),
        bind("escape", CommandAction::CloseViewer),
    ]
}
