//! Column statistics popup: a frequency table plus a pie chart drawn after
//! the popup has been laid out.

use std::fmt::Write as _;

use log::debug;
use qview_search::render::escape;
use qview_stats::{ColumnStats, pie_slices, render_pie_svg};

use crate::config::AppConfig;
use crate::deferred::DeferredTask;
use crate::dom::SharedDocument;
use crate::results::ResultsProvider;

/// Rows listed in the table before the rest are summarized.
const TABLE_ROW_LIMIT: usize = 100;

struct OpenPopup {
    generation: u64,
    container_id: String,
    pie_id: String,
    column_name: String,
    stats: ColumnStats,
}

pub struct StatsPopup {
    document: SharedDocument,
    top_n: usize,
    pie_radius: f64,
    open: Option<OpenPopup>,
}

impl StatsPopup {
    pub fn new(document: SharedDocument, config: &AppConfig) -> Self {
        Self {
            document,
            top_n: config.stats_top_n,
            pie_radius: f64::from(config.pie_radius),
            open: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn generation(&self) -> Option<u64> {
        self.open.as_ref().map(|popup| popup.generation)
    }

    pub fn stats(&self) -> Option<&ColumnStats> {
        self.open.as_ref().map(|popup| &popup.stats)
    }

    pub fn column_name(&self) -> Option<&str> {
        self.open.as_ref().map(|popup| popup.column_name.as_str())
    }

    /// Tabulates `column` into `container_id` and returns the pie draw to
    /// defer, or `None` when the column does not exist.
    pub fn open(
        &mut self,
        provider: &dyn ResultsProvider,
        column: usize,
        container_id: &str,
        generation: u64,
    ) -> Option<DeferredTask> {
        let column_name = provider.column_name(column)?.to_string();
        self.close();

        let stats = ColumnStats::from_values(provider.column_values(column));
        let pie_id = format!("{}-pie", container_id);
        {
            let mut document = self.document.borrow_mut();
            if document.set_inner_html(container_id, table_markup(&column_name, &stats, &pie_id)) {
                document.insert(pie_id.clone());
            } else {
                debug!("stats container `{}` is missing", container_id);
            }
        }

        self.open = Some(OpenPopup {
            generation,
            container_id: container_id.to_string(),
            pie_id,
            column_name,
            stats,
        });
        Some(DeferredTask::DrawPie { generation })
    }

    /// Draws the pie for the popup opened as `generation`, if still open.
    pub fn draw_pie(&mut self, generation: u64) -> bool {
        let Some(popup) = self.open.as_ref() else {
            return false;
        };
        if popup.generation != generation {
            debug!("dropping pie draw for stale popup {}", generation);
            return false;
        }

        let slices = pie_slices(&popup.stats, self.top_n);
        let svg = render_pie_svg(&slices, self.pie_radius);
        self.document.borrow_mut().set_inner_html(&popup.pie_id, svg)
    }

    pub fn close(&mut self) {
        let Some(popup) = self.open.take() else {
            return;
        };
        let mut document = self.document.borrow_mut();
        document.remove(&popup.pie_id);
        document.set_inner_html(&popup.container_id, "");
    }
}

fn table_markup(column_name: &str, stats: &ColumnStats, pie_id: &str) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<div class=\"stats-header\"><span class=\"stats-title\">{}</span>\
         <span class=\"stats-summary\">{} rows, {} distinct, {} null, {} empty</span></div>",
        escape(column_name),
        stats.total(),
        stats.distinct_count(),
        stats.null_count(),
        stats.empty_count(),
    );

    out.push_str(
        "<table class=\"stats-values\"><thead><tr><th>Value</th><th>Count</th><th>%</th></tr></thead><tbody>",
    );
    for value in stats.top_values(TABLE_ROW_LIMIT) {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{:.1}</td></tr>",
            escape(&value.value),
            value.count,
            stats.percent(value.count)
        );
    }
    let hidden = stats.distinct_count().saturating_sub(TABLE_ROW_LIMIT);
    if hidden > 0 {
        let _ = write!(
            out,
            "<tr class=\"stats-more\"><td colspan=\"3\">{} more values</td></tr>",
            hidden
        );
    }
    out.push_str("</tbody></table>");

    let _ = write!(out, "<div id=\"{}\" class=\"stats-pie\"></div>", escape(pie_id));
    out
}
