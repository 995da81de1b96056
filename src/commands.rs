pub const EDITOR_CONTEXT: &str = "Editor";
pub const VIEWER_CONTEXT: &str = "Viewer";

const GLOBAL: Option<&str> = None;
const EDITOR: Option<&str> = Some(EDITOR_CONTEXT);
const VIEWER: Option<&str> = Some(VIEWER_CONTEXT);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub action: CommandAction,
    pub config_name: &'static str,
    pub context: Option<&'static str>,
    pub title: &'static str,
}

const fn command(
    action: CommandAction,
    config_name: &'static str,
    context: Option<&'static str>,
    title: &'static str,
) -> CommandSpec {
    CommandSpec {
        action,
        config_name,
        context,
        title,
    }
}

macro_rules! define_commands {
    ($(($variant:ident, $config_name:literal, $context:expr, $title:literal)),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum CommandAction {
            $( $variant, )+
        }

        const COMMAND_SPECS: &[CommandSpec] = &[
            $(command(CommandAction::$variant, $config_name, $context, $title),)+
        ];

        impl CommandAction {
            pub fn specs() -> &'static [CommandSpec] {
                COMMAND_SPECS
            }

            #[cfg(test)]
            pub fn all() -> impl std::iter::ExactSizeIterator<Item = Self> + Clone {
                COMMAND_SPECS.iter().map(|spec| spec.action)
            }

            pub fn from_config_name(name: &str) -> Option<Self> {
                let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
                COMMAND_SPECS
                    .iter()
                    .find_map(|spec| (spec.config_name == normalized).then_some(spec.action))
            }

            pub fn all_config_names() -> impl std::iter::ExactSizeIterator<Item = &'static str> {
                COMMAND_SPECS.iter().map(|spec| spec.config_name)
            }

            // COMMAND_SPECS is declared in variant order.
            pub fn spec(self) -> &'static CommandSpec {
                &COMMAND_SPECS[self as usize]
            }

            pub fn config_name(self) -> &'static str {
                self.spec().config_name
            }

            pub fn context(self) -> Option<&'static str> {
                self.spec().context
            }

            pub fn title(self) -> &'static str {
                self.spec().title
            }
        }
    };
}

define_commands!(
    (ExecuteQuery, "execute_query", EDITOR, "Run Query"),
    (ExecuteSelection, "execute_selection", EDITOR, "Run Selection"),
    (CancelQuery, "cancel_query", GLOBAL, "Cancel Query"),
    (SaveDocument, "save_document", GLOBAL, "Save"),
    (OpenSearch, "open_search", VIEWER, "Find in Value"),
    (SearchNext, "search_next", VIEWER, "Next Match"),
    (SearchPrevious, "search_previous", VIEWER, "Previous Match"),
    (CycleSearchMode, "cycle_search_mode", VIEWER, "Cycle Search Mode"),
    (CopyValue, "copy_value", VIEWER, "Copy Value"),
    (CloseViewer, "close_viewer", VIEWER, "Close Viewer"),
);

#[cfg(test)]
mod tests {
    use super::{CommandAction, EDITOR_CONTEXT, VIEWER_CONTEXT};
    use std::collections::HashSet;

    #[test]
    fn command_catalog_contains_unique_actions() {
        let mut seen = HashSet::new();
        for spec in CommandAction::specs() {
            assert!(seen.insert(spec.action), "duplicate action in catalog");
        }

        assert_eq!(seen.len(), CommandAction::all().count());
    }

    #[test]
    fn config_names_round_trip() {
        for action in CommandAction::all() {
            assert_eq!(
                CommandAction::from_config_name(action.config_name()),
                Some(action)
            );
        }
        assert_eq!(
            CommandAction::from_config_name(" Execute-Query "),
            Some(CommandAction::ExecuteQuery)
        );
        assert_eq!(CommandAction::from_config_name("zoom_in"), None);
    }

    #[test]
    fn contexts_split_editor_and_viewer_commands() {
        assert_eq!(CommandAction::ExecuteQuery.context(), Some(EDITOR_CONTEXT));
        assert_eq!(CommandAction::SearchNext.context(), Some(VIEWER_CONTEXT));
        assert_eq!(CommandAction::SaveDocument.context(), None);
        assert_eq!(CommandAction::CopyValue.title(), "Copy Value");
    }
}
