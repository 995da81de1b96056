use std::fs;
use std::io::{self, Read as _};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, anyhow, bail};
use clap::Args;
use qview::config::AppConfig;
use qview_search::render::{self, CURRENT_CLASS};
use qview_search::{SearchConfig, SearchMode, ViewBinding, ViewerSession};

const MATCH_STYLE: &str = "\x1b[7m";
const CURRENT_STYLE: &str = "\x1b[30;43m";
const RESET_STYLE: &str = "\x1b[0m";

#[derive(Args)]
pub struct InspectArgs {
    /// File holding the value, or `-` for stdin
    path: PathBuf,

    /// Text to search for
    #[arg(short, long, default_value = "")]
    query: String,

    /// plain, wildcard or regex (defaults to the configured mode)
    #[arg(short, long)]
    mode: Option<String>,

    /// Pretty-print the value as JSON before searching
    #[arg(long)]
    json: bool,

    /// Make the Nth match current, counting from 1; negative counts from the end
    #[arg(long, allow_negative_numbers = true)]
    current: Option<isize>,

    /// Print HTML markup instead of terminal colors
    #[arg(long)]
    html: bool,
}

/// Collects what a viewer would show so it can be printed once.
#[derive(Default)]
struct CapturedView {
    markup: String,
    status: String,
}

impl ViewBinding for CapturedView {
    fn set_content(&mut self, markup: &str) {
        self.markup = markup.to_string();
    }

    fn mark_current(&mut self, previous: Option<usize>, current: usize) {
        self.markup = render::mark_current(&self.markup, previous, current);
    }

    fn scroll_to_current(&mut self, _index: usize) {}

    fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

pub fn run(config: &AppConfig, args: InspectArgs) -> anyhow::Result<()> {
    let mut text = read_input(&args.path)?;
    if args.json {
        let value: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("{} is not valid JSON", args.path.display()))?;
        text = serde_json::to_string_pretty(&value)?;
    }

    let mode = match args.mode.as_deref() {
        Some(name) => SearchMode::from_config_name(name)
            .ok_or_else(|| anyhow!("unknown search mode `{}`", name))?,
        None => config.search_mode,
    };
    let search_config = SearchConfig {
        mode,
        max_matches: config.max_matches,
    };

    let mut session = ViewerSession::open(text, search_config, CapturedView::default(), 1);
    session.on_query_changed(&args.query, mode);
    if let Some(current) = args.current {
        session.set_current(current_index(current)?);
    }

    let view = session.close();
    if args.html {
        println!("{}", view.markup);
    } else {
        println!("{}", to_ansi(&view.markup));
    }
    if !view.status.is_empty() {
        eprintln!("{}", view.status);
    }
    Ok(())
}

/// Maps the 1-based `--current` flag to a match index; negatives count from
/// the end.
fn current_index(current: isize) -> anyhow::Result<isize> {
    match current {
        0 => bail!("--current counts from 1; use -1 for the last match"),
        n if n > 0 => Ok(n - 1),
        n => Ok(n),
    }
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

// Source text is escaped, so every `<` opens one of our tags.
fn to_ansi(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(pos) = rest.find('<') {
        out.push_str(&render::strip_markup(&rest[..pos]));
        rest = &rest[pos..];
        let Some(end) = rest.find('>') else {
            break;
        };
        let tag = &rest[..=end];
        if tag.starts_with("</") {
            out.push_str(RESET_STYLE);
        } else if tag.contains(CURRENT_CLASS) {
            out.push_str(CURRENT_STYLE);
        } else {
            out.push_str(MATCH_STYLE);
        }
        rest = &rest[end + 1..];
    }
    out.push_str(&render::strip_markup(rest));
    out
}
