use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;
use qview::config::AppConfig;

mod cli;

#[derive(Parser)]
#[command(name = "qview")]
#[command(about = "Query result viewer with in-value search", long_about = None)]
#[command(version)]
struct Cli {
    /// Read settings from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Search a value and print it with matches highlighted
    Inspect(cli::inspect::InspectArgs),

    /// Summarize one column of a CSV file
    Stats(cli::stats::StatsArgs),

    /// List the effective keybindings
    ListKeybinds,

    /// List available keybind actions
    ListActions,

    /// Validate the configuration file
    ValidateConfig,

    /// Run the panel over JSON lines on stdin and stdout
    Serve,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.action {
        Action::Inspect(args) => cli::inspect::run(&config, args),
        Action::Stats(args) => cli::stats::run(&config, args),
        Action::ListKeybinds => cli::list_keybinds::run(&config),
        Action::ListActions => cli::list_actions::run(),
        Action::ValidateConfig => cli::validate_config::run(cli.config.as_deref()),
        Action::Serve => cli::serve::run(&config),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("qview: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path),
        None => Ok(AppConfig::load_or_create()),
    }
}
