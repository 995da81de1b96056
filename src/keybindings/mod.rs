mod config;
mod defaults;
mod keystroke;

use log::warn;

use crate::commands::CommandAction;
use crate::config::AppConfig;

pub use self::config::{KeybindDirective, KeybindWarning, canonicalize_trigger};
pub use self::keystroke::{Keystroke, Modifiers};

use self::config::parse_keybind_directives;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKeybind {
    pub trigger: String,
    pub action: CommandAction,
}

/// Trigger to command table built from the defaults plus user directives.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: Vec<ResolvedKeybind>,
}

impl Keymap {
    pub fn from_config(config: &AppConfig) -> (Self, Vec<KeybindWarning>) {
        let (directives, warnings) = parse_keybind_directives(&config.keybind_lines);
        for warning in &warnings {
            warn!(
                "Ignoring invalid keybind at config line {}: {}",
                warning.line_number, warning.message
            );
        }

        let default_bindings = defaults::default_keybinds()
            .into_iter()
            .filter_map(|binding| match canonicalize_trigger(binding.trigger) {
                Ok(trigger) => Some(ResolvedKeybind {
                    trigger,
                    action: binding.action,
                }),
                Err(error) => {
                    warn!(
                        "Skipping invalid built-in keybind `{}`: {}",
                        binding.trigger, error
                    );
                    None
                }
            })
            .collect::<Vec<_>>();

        let keymap = Self {
            bindings: resolve_keybinds(default_bindings, &directives),
        };
        (keymap, warnings)
    }

    pub fn bindings(&self) -> &[ResolvedKeybind] {
        &self.bindings
    }

    /// Finds the command for `trigger` in the focused `context`.
    ///
    /// Bindings scoped to the focused context win over global ones.
    pub fn resolve(&self, trigger: &str, context: Option<&str>) -> Option<CommandAction> {
        let trigger = canonicalize_trigger(trigger).ok()?;
        let candidates = self
            .bindings
            .iter()
            .rev()
            .filter(|binding| binding.trigger == trigger)
            .map(|binding| binding.action)
            .collect::<Vec<_>>();

        let scoped = candidates
            .iter()
            .copied()
            .find(|action| action.context().is_some() && action.context() == context);
        scoped.or_else(|| {
            candidates
                .iter()
                .copied()
                .find(|action| action.context().is_none())
        })
    }

    pub fn triggers_for(&self, action: CommandAction) -> Vec<&str> {
        self.bindings
            .iter()
            .filter(|binding| binding.action == action)
            .map(|binding| binding.trigger.as_str())
            .collect()
    }
}

fn resolve_keybinds(
    mut bindings: Vec<ResolvedKeybind>,
    directives: &[KeybindDirective],
) -> Vec<ResolvedKeybind> {
    for directive in directives {
        match directive {
            KeybindDirective::Clear => bindings.clear(),
            KeybindDirective::Unbind { trigger } => {
                bindings.retain(|binding| binding.trigger != *trigger);
            }
            KeybindDirective::Bind { trigger, action } => {
                bindings.retain(|binding| binding.trigger != *trigger);
                bindings.push(ResolvedKeybind {
                    trigger: trigger.clone(),
                    action: *action,
                });
            }
        }
    }

    bindings
}
