use std::fmt;

const NAMED_KEYS: &[&str] = &[
    "enter",
    "escape",
    "tab",
    "space",
    "backspace",
    "delete",
    "insert",
    "up",
    "down",
    "left",
    "right",
    "home",
    "end",
    "pageup",
    "pagedown",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Modifiers {
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
    pub platform: bool,
    pub function: bool,
}

/// One chord of a trigger, e.g. `ctrl-shift-enter`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub modifiers: Modifiers,
    pub key: String,
}

impl Keystroke {
    /// Parses `[modifier-]*key`. `secondary` is the platform's primary
    /// shortcut modifier: cmd on macOS, ctrl elsewhere.
    pub fn parse(source: &str) -> Result<Self, String> {
        let source = source.trim();
        if source.is_empty() {
            return Err("empty keystroke".to_string());
        }

        let (modifier_part, key) = if source == "-" {
            ("", "-")
        } else if let Some(prefix) = source.strip_suffix("--") {
            (prefix, "-")
        } else {
            source.rsplit_once('-').unwrap_or(("", source))
        };

        if key.is_empty() {
            return Err(format!("missing key in `{}`", source));
        }

        let mut modifiers = Modifiers::default();
        if !modifier_part.is_empty() {
            for name in modifier_part.split('-') {
                match name.to_ascii_lowercase().as_str() {
                    "ctrl" | "control" => modifiers.control = true,
                    "alt" | "option" | "opt" => modifiers.alt = true,
                    "shift" => modifiers.shift = true,
                    "cmd" | "command" | "super" | "win" | "platform" => modifiers.platform = true,
                    "fn" | "function" => modifiers.function = true,
                    "secondary" => {
                        if cfg!(target_os = "macos") {
                            modifiers.platform = true;
                        } else {
                            modifiers.control = true;
                        }
                    }
                    other => return Err(format!("unknown modifier `{}`", other)),
                }
            }
        }

        Ok(Self {
            modifiers,
            key: normalize_key(key)?,
        })
    }

    pub fn unparse(&self) -> String {
        let mut parts = Vec::with_capacity(6);
        if self.modifiers.control {
            parts.push("ctrl");
        }
        if self.modifiers.alt {
            parts.push("alt");
        }
        if self.modifiers.shift {
            parts.push("shift");
        }
        if self.modifiers.platform {
            parts.push("cmd");
        }
        if self.modifiers.function {
            parts.push("fn");
        }
        parts.push(self.key.as_str());
        parts.join("-")
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.unparse())
    }
}

fn normalize_key(key: &str) -> Result<String, String> {
    let lower = key.to_lowercase();
    let canonical = match lower.as_str() {
        "return" => "enter",
        "esc" => "escape",
        "del" => "delete",
        "spacebar" => "space",
        "pgup" => "pageup",
        "pgdn" => "pagedown",
        other => other,
    };

    if canonical.chars().count() == 1 || NAMED_KEYS.contains(&canonical) || is_function_key(canonical)
    {
        Ok(canonical.to_string())
    } else {
        Err(format!("unknown key `{}`", key))
    }
}

fn is_function_key(key: &str) -> bool {
    key.strip_prefix('f')
        .and_then(|n| n.parse::<u8>().ok())
        .is_some_and(|n| (1..=24).contains(&n))
}

#[cfg(test)]
mod tests {
    use super::Keystroke;

    fn canonical(source: &str) -> String {
        Keystroke::parse(source).unwrap().unparse()
    }

    #[test]
    fn modifiers_are_reordered() {
        assert_eq!(canonical("shift-ctrl-Enter"), "ctrl-shift-enter");
        assert_eq!(canonical("cmd-alt-p"), "alt-cmd-p");
    }

    #[test]
    fn aliases_normalize() {
        assert_eq!(canonical("control-return"), "ctrl-enter");
        assert_eq!(canonical("esc"), "escape");
        assert_eq!(canonical("option-F3"), "alt-f3");
    }

    #[test]
    fn minus_and_equal_keys() {
        assert_eq!(canonical("ctrl--"), "ctrl--");
        assert_eq!(canonical("-"), "-");
        assert_eq!(canonical("cmd-="), "cmd-=");
    }

    #[test]
    fn secondary_follows_platform() {
        let expected = if cfg!(target_os = "macos") {
            "cmd-f"
        } else {
            "ctrl-f"
        };
        assert_eq!(canonical("secondary-f"), expected);
    }

    #[test]
    fn rejects_unknown_parts() {
        assert!(Keystroke::parse("hyper-k").is_err());
        assert!(Keystroke::parse("ctrl-banana").is_err());
        assert!(Keystroke::parse("ctrl-").is_err());
        assert!(Keystroke::parse("f25").is_err());
        assert!(Keystroke::parse("  ").is_err());
    }
}
