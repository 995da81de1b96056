use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use qview_search::{DEFAULT_MAX_MATCHES, SearchMode};

const DEFAULT_STATS_TOP_N: usize = 8;
const MAX_STATS_TOP_N: usize = 24;
const DEFAULT_PIE_RADIUS: f32 = 60.0;
const MIN_PIE_RADIUS: f32 = 8.0;
const MAX_PIE_RADIUS: f32 = 512.0;
const MAX_MATCHES_LIMIT: usize = 1_000_000;
const DEFAULT_DOC_SYNC_DEBOUNCE_MS: u64 = 300;
const MAX_DOC_SYNC_DEBOUNCE_MS: u64 = 5_000;

const VALID_KEYS: &[&str] = &[
    "search_mode",
    "max_matches",
    "smooth_scroll",
    "stats_top_n",
    "pie_radius",
    "doc_sync_debounce_ms",
    "copy_icon",
    "keybind",
];

const DEFAULT_CONFIG: &str = "# Value viewer search mode: plain, wildcard or regex\n\
search_mode = plain\n\
# Stop highlighting after this many matches\n\
# max_matches = 10000\n\
# Smoothly scroll the current match into view\n\
# smooth_scroll = true\n\
# Column statistics: slices shown in the pie before folding into Other\n\
# stats_top_n = 8\n\
# Pie radius in pixels\n\
# pie_radius = 60\n\
# Delay before editor changes are sent to the host, in milliseconds\n\
# doc_sync_debounce_ms = 300\n\
# Glyph for the copy button (defaults to a built-in glyph)\n\
# copy_icon = \u{1F4CB}\n\
# Keybindings\n\
# keybind = secondary-enter=execute_query\n\
# keybind = f5=unbind\n\
# keybind = clear\n";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub search_mode: SearchMode,
    pub max_matches: usize,
    pub smooth_scroll: bool,
    pub stats_top_n: usize,
    pub pie_radius: f32,
    pub doc_sync_debounce_ms: u64,
    pub copy_icon: Option<String>,
    pub keybind_lines: Vec<KeybindConfigLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeybindConfigLine {
    pub line_number: usize,
    pub value: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            search_mode: SearchMode::Plain,
            max_matches: DEFAULT_MAX_MATCHES,
            smooth_scroll: true,
            stats_top_n: DEFAULT_STATS_TOP_N,
            pie_radius: DEFAULT_PIE_RADIUS,
            doc_sync_debounce_ms: DEFAULT_DOC_SYNC_DEBOUNCE_MS,
            copy_icon: None,
            keybind_lines: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn load_or_create() -> Self {
        let mut config = Self::default();
        let Some(path) = ensure_config_file() else {
            return config;
        };

        if let Ok(contents) = fs::read_to_string(&path) {
            config = Self::from_contents(&contents);
        }

        config
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Ok(Self::from_contents(&contents))
    }

    pub fn from_contents(contents: &str) -> Self {
        let mut config = Self::default();
        for (line_number, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.splitn(2, '=');
            let key = parts.next().unwrap_or("").trim();
            let value = parts.next().unwrap_or("").trim();

            if key.eq_ignore_ascii_case("search_mode") {
                if let Some(mode) = SearchMode::from_config_name(value) {
                    config.search_mode = mode;
                }
            }

            if key.eq_ignore_ascii_case("max_matches") {
                if let Ok(max_matches) = value.parse::<usize>() {
                    config.max_matches = max_matches.clamp(1, MAX_MATCHES_LIMIT);
                }
            }

            if key.eq_ignore_ascii_case("smooth_scroll") {
                if let Some(smooth) = parse_bool(value) {
                    config.smooth_scroll = smooth;
                }
            }

            if key.eq_ignore_ascii_case("stats_top_n") {
                if let Ok(top_n) = value.parse::<usize>() {
                    config.stats_top_n = top_n.clamp(1, MAX_STATS_TOP_N);
                }
            }

            if key.eq_ignore_ascii_case("pie_radius") {
                if let Ok(radius) = value.parse::<f32>()
                    && radius.is_finite()
                {
                    config.pie_radius = radius.clamp(MIN_PIE_RADIUS, MAX_PIE_RADIUS);
                }
            }

            if key.eq_ignore_ascii_case("doc_sync_debounce_ms") {
                if let Ok(delay) = value.parse::<u64>() {
                    config.doc_sync_debounce_ms = delay.min(MAX_DOC_SYNC_DEBOUNCE_MS);
                }
            }

            if key.eq_ignore_ascii_case("copy_icon") {
                config.copy_icon = parse_optional_string_value(value);
            }

            if key.eq_ignore_ascii_case("keybind")
                && let Some(raw) = parse_string_value(value)
            {
                config.keybind_lines.push(KeybindConfigLine {
                    line_number: line_number + 1,
                    value: raw,
                });
            }
        }

        config
    }
}

/// Lines whose key is not a known setting, as `(line number, key)`.
pub fn unknown_keys(contents: &str) -> Vec<(usize, String)> {
    contents
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let key = line.split('=').next().unwrap_or("").trim();
            let known = VALID_KEYS
                .iter()
                .any(|valid| valid.eq_ignore_ascii_case(key));
            (!known).then(|| (index + 1, key.to_string()))
        })
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_string_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let unquoted = if trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
    {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };

    let unquoted = unquoted.trim();
    if unquoted.is_empty() {
        return None;
    }

    Some(unquoted.to_string())
}

fn parse_optional_string_value(value: &str) -> Option<String> {
    let parsed = parse_string_value(value)?;
    let normalized = parsed.trim().to_ascii_lowercase();
    if matches!(normalized.as_str(), "none" | "unset" | "default" | "auto") {
        return None;
    }
    Some(parsed)
}

pub fn ensure_config_file() -> Option<PathBuf> {
    let path = config_path()?;
    if !path.exists() {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let _ = fs::write(&path, DEFAULT_CONFIG);
    }
    Some(path)
}

pub fn config_path() -> Option<PathBuf> {
    if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME")
        && !xdg_config_home.trim().is_empty()
    {
        return Some(Path::new(&xdg_config_home).join("qview/config.txt"));
    }

    dirs::config_dir().map(|dir| dir.join("qview").join("config.txt"))
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, DEFAULT_CONFIG, unknown_keys};
    use qview_search::{DEFAULT_MAX_MATCHES, SearchMode};

    #[test]
    fn defaults_apply_for_empty_file() {
        let config = AppConfig::from_contents("");
        assert_eq!(config.search_mode, SearchMode::Plain);
        assert_eq!(config.max_matches, DEFAULT_MAX_MATCHES);
        assert!(config.smooth_scroll);
        assert_eq!(config.stats_top_n, 8);
        assert_eq!(config.pie_radius, 60.0);
        assert_eq!(config.doc_sync_debounce_ms, 300);
        assert!(config.copy_icon.is_none());
        assert!(config.keybind_lines.is_empty());
    }

    #[test]
    fn default_config_file_parses_to_defaults() {
        let config = AppConfig::from_contents(DEFAULT_CONFIG);
        assert_eq!(config.search_mode, SearchMode::Plain);
        assert!(config.keybind_lines.is_empty());
    }

    #[test]
    fn search_options_parse() {
        let config = AppConfig::from_contents(
            "search_mode = Regex\n\
             max_matches = 250\n\
             smooth_scroll = off\n",
        );
        assert_eq!(config.search_mode, SearchMode::Regex);
        assert_eq!(config.max_matches, 250);
        assert!(!config.smooth_scroll);

        let invalid = AppConfig::from_contents("search_mode = fuzzy\n");
        assert_eq!(invalid.search_mode, SearchMode::Plain);
    }

    #[test]
    fn numeric_values_clamp() {
        let low = AppConfig::from_contents(
            "max_matches = 0\n\
             stats_top_n = 0\n\
             pie_radius = 1\n",
        );
        assert_eq!(low.max_matches, 1);
        assert_eq!(low.stats_top_n, 1);
        assert_eq!(low.pie_radius, 8.0);

        let high = AppConfig::from_contents(
            "max_matches = 99999999\n\
             stats_top_n = 100\n\
             pie_radius = 4096\n\
             doc_sync_debounce_ms = 60000\n",
        );
        assert_eq!(high.max_matches, 1_000_000);
        assert_eq!(high.stats_top_n, 24);
        assert_eq!(high.pie_radius, 512.0);
        assert_eq!(high.doc_sync_debounce_ms, 5_000);

        let nan = AppConfig::from_contents("pie_radius = NaN\n");
        assert_eq!(nan.pie_radius, 60.0);
    }

    #[test]
    fn copy_icon_accepts_quotes_and_unset() {
        let quoted = AppConfig::from_contents("copy_icon = \"[copy]\"\n");
        assert_eq!(quoted.copy_icon.as_deref(), Some("[copy]"));

        let unset = AppConfig::from_contents("copy_icon = default\n");
        assert!(unset.copy_icon.is_none());
    }

    #[test]
    fn keybind_lines_are_collected_in_order_with_line_numbers() {
        let config = AppConfig::from_contents(
            "# ignore comments\n\
             keybind = ctrl-enter=execute_query\n\
             keybind = ctrl-c=copy_value\n\
             keybind = ctrl-c=unbind\n\
             keybind = clear\n",
        );

        assert_eq!(config.keybind_lines.len(), 4);
        assert_eq!(config.keybind_lines[0].line_number, 2);
        assert_eq!(config.keybind_lines[0].value, "ctrl-enter=execute_query");
        assert_eq!(config.keybind_lines[1].line_number, 3);
        assert_eq!(config.keybind_lines[1].value, "ctrl-c=copy_value");
        assert_eq!(config.keybind_lines[2].line_number, 4);
        assert_eq!(config.keybind_lines[2].value, "ctrl-c=unbind");
        assert_eq!(config.keybind_lines[3].line_number, 5);
        assert_eq!(config.keybind_lines[3].value, "clear");
    }

    #[test]
    fn unknown_keys_are_listed_with_line_numbers() {
        let contents = "# comment\nsearch_mode = regex\nfont_size = 12\n\nKEYBIND = clear\ntheme\n";
        assert_eq!(
            unknown_keys(contents),
            vec![(3, "font_size".to_string()), (6, "theme".to_string())]
        );
        assert!(unknown_keys(DEFAULT_CONFIG).is_empty());
    }

    #[test]
    fn load_from_reads_file_and_reports_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.txt");
        std::fs::write(&path, "search_mode = wildcard\n").unwrap();
        assert_eq!(
            AppConfig::load_from(&path).unwrap().search_mode,
            SearchMode::Wildcard
        );

        let missing = AppConfig::load_from(&dir.path().join("absent.txt")).unwrap_err();
        assert!(missing.to_string().contains("failed to read config file"));
    }
}
