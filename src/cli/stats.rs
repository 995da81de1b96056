use std::fs;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use qview::config::AppConfig;
use qview::results::{ResultSet, ResultsProvider};
use qview_stats::{ColumnStats, pie_slices, render_pie_svg};

#[derive(Args)]
pub struct StatsArgs {
    /// CSV file with a header row
    path: PathBuf,

    /// Column to summarize, by header name
    #[arg(short, long)]
    column: String,

    /// Print the pie chart as SVG
    #[arg(long, conflicts_with = "json")]
    svg: bool,

    /// Print the full frequency table as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(config: &AppConfig, args: StatsArgs) -> anyhow::Result<()> {
    let contents = fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    let results = ResultSet::from_csv(&contents)?;
    let column = results
        .column_index(&args.column)
        .with_context(|| format!("no column named `{}`", args.column))?;
    let stats = ColumnStats::from_values(results.column_values(column));

    if args.svg {
        let slices = pie_slices(&stats, config.stats_top_n);
        println!("{}", render_pie_svg(&slices, f64::from(config.pie_radius)));
        return Ok(());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", summary_line(&args.column, &stats));
    let shown = stats.top_values(config.stats_top_n);
    for value in shown {
        println!(
            "{:>8} {:>6.1}%  {}",
            value.count,
            stats.percent(value.count),
            value.value
        );
    }
    let hidden = stats.distinct_count() - shown.len();
    if hidden > 0 {
        println!("... {} more values", hidden);
    }
    Ok(())
}

fn summary_line(column: &str, stats: &ColumnStats) -> String {
    format!(
        "{}: {} rows, {} distinct, {} seen once, {} null, {} empty",
        column,
        stats.total(),
        stats.distinct_count(),
        stats.singleton_count(),
        stats.null_count(),
        stats.empty_count()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_values_seen_once() {
        let stats = ColumnStats::from_values([Some("a"), Some("b"), Some("a"), None, Some("")]);
        assert_eq!(
            summary_line("tag", &stats),
            "tag: 5 rows, 4 distinct, 3 seen once, 1 null, 1 empty"
        );
    }
}
