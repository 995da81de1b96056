use crate::commands::CommandAction;
use crate::config::KeybindConfigLine;

use super::keystroke::Keystroke;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeybindDirective {
    Clear,
    Bind {
        trigger: String,
        action: CommandAction,
    },
    Unbind {
        trigger: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeybindWarning {
    pub line_number: usize,
    pub message: String,
}

pub fn parse_keybind_directives(
    lines: &[KeybindConfigLine],
) -> (Vec<KeybindDirective>, Vec<KeybindWarning>) {
    let mut directives = Vec::new();
    let mut warnings = Vec::new();

    for line in lines {
        let value = line.value.trim();
        if value.is_empty() {
            warnings.push(KeybindWarning {
                line_number: line.line_number,
                message: "empty keybind value".to_string(),
            });
            continue;
        }

        if value.eq_ignore_ascii_case("clear") {
            directives.push(KeybindDirective::Clear);
            continue;
        }

        let Some((trigger_raw, action_raw)) = value.rsplit_once('=') else {
            warnings.push(KeybindWarning {
                line_number: line.line_number,
                message: "expected `keybind = <trigger>=<action>` or `keybind = clear`".to_string(),
            });
            continue;
        };

        let mut trigger_raw = trigger_raw.trim().to_string();
        let action_raw = action_raw.trim();
        if trigger_raw.is_empty() || action_raw.is_empty() {
            warnings.push(KeybindWarning {
                line_number: line.line_number,
                message: "keybind trigger and action must both be non-empty".to_string(),
            });
            continue;
        }

        let action = if action_raw.eq_ignore_ascii_case("unbind") {
            None
        } else {
            match CommandAction::from_config_name(action_raw) {
                Some(action) => Some(action),
                None => {
                    warnings.push(KeybindWarning {
                        line_number: line.line_number,
                        message: format!(
                            "unknown keybind action `{}`; expected one of: {}",
                            action_raw,
                            CommandAction::all_config_names()
                                .collect::<Vec<_>>()
                                .join(", ")
                        ),
                    });
                    continue;
                }
            }
        };

        if should_treat_trailing_dash_as_equal_key(&trigger_raw) {
            trigger_raw.push('=');
        }
        let trigger = match canonicalize_trigger(&trigger_raw) {
            Ok(trigger) => trigger,
            Err(message) => {
                warnings.push(KeybindWarning {
                    line_number: line.line_number,
                    message,
                });
                continue;
            }
        };

        directives.push(match action {
            Some(action) => KeybindDirective::Bind { trigger, action },
            None => KeybindDirective::Unbind { trigger },
        });
    }

    (directives, warnings)
}

fn should_treat_trailing_dash_as_equal_key(trigger: &str) -> bool {
    // `keybind = <trigger>=<action>` splits on the last `=`, so `ctrl-=zoom`
    // arrives here as `ctrl-`. A single trailing dash means the equals key;
    // `ctrl--` stays minus.
    trigger.ends_with('-') && !trigger.ends_with("--")
}

/// Canonical form of a whitespace-separated chord sequence.
pub fn canonicalize_trigger(trigger: &str) -> Result<String, String> {
    let mut normalized_parts = Vec::new();
    for component in trigger.split_whitespace() {
        let keystroke = Keystroke::parse(component).map_err(|error| {
            format!(
                "invalid keybind trigger component `{}`: {}",
                component, error
            )
        })?;
        normalized_parts.push(keystroke.unparse());
    }

    if normalized_parts.is_empty() {
        return Err("empty keybind trigger".to_string());
    }

    Ok(normalized_parts.join(" "))
}
