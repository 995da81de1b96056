use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use qview::config::{AppConfig, config_path, unknown_keys};
use qview::keybindings::Keymap;

pub fn run(path: Option<&Path>) -> anyhow::Result<()> {
    let path = path
        .map(PathBuf::from)
        .or_else(config_path)
        .context("could not determine the config file location")?;
    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;

    let mut problems = Vec::new();
    for (line_number, key) in unknown_keys(&contents) {
        problems.push(format!("line {}: unknown key `{}`", line_number, key));
    }

    let config = AppConfig::from_contents(&contents);
    let (_keymap, warnings) = Keymap::from_config(&config);
    for warning in warnings {
        problems.push(format!("line {}: {}", warning.line_number, warning.message));
    }

    if problems.is_empty() {
        println!("{} is valid", path.display());
        return Ok(());
    }

    for problem in &problems {
        println!("{}", problem);
    }
    bail!("{} problem(s) in {}", problems.len(), path.display())
}
