use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt::Write as _;

use serde::Serialize;

use crate::column::ColumnStats;

/// Label of the slice that aggregates values beyond the slice limit.
pub const OTHER_LABEL: &str = "Other";

const PALETTE: &[&str] = &[
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
    "#9c755f",
];
const OTHER_COLOR: &str = "#bab0ac";

/// Angles are radians, clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub fraction: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: &'static str,
}

/// Splits the column into at most `max_slices` slices; values that do not
/// fit are folded into a trailing [`OTHER_LABEL`] slice.
pub fn pie_slices(stats: &ColumnStats, max_slices: usize) -> Vec<PieSlice> {
    if stats.total() == 0 || max_slices == 0 {
        return Vec::new();
    }

    let values = stats.values();
    let (shown, rest) = if values.len() <= max_slices {
        (values, &values[values.len()..])
    } else {
        values.split_at(max_slices - 1)
    };

    let mut parts: Vec<(String, usize, &'static str)> = shown
        .iter()
        .enumerate()
        .map(|(i, v)| (v.value.clone(), v.count, PALETTE[i % PALETTE.len()]))
        .collect();
    let other: usize = rest.iter().map(|v| v.count).sum();
    if other > 0 {
        parts.push((OTHER_LABEL.to_string(), other, OTHER_COLOR));
    }

    let total = stats.total() as f64;
    let mut angle = -FRAC_PI_2;
    let last = parts.len() - 1;
    parts
        .into_iter()
        .enumerate()
        .map(|(i, (label, count, color))| {
            let fraction = count as f64 / total;
            let start_angle = angle;
            let end_angle = if i == last {
                -FRAC_PI_2 + TAU
            } else {
                angle + fraction * TAU
            };
            angle = end_angle;
            PieSlice {
                label,
                count,
                fraction,
                start_angle,
                end_angle,
                color,
            }
        })
        .collect()
}

fn svg_escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

fn point(center: f64, radius: f64, angle: f64) -> (f64, f64) {
    (center + radius * angle.cos(), center + radius * angle.sin())
}

/// Renders the slices as a standalone SVG document.
pub fn render_pie_svg(slices: &[PieSlice], radius: f64) -> String {
    let size = radius * 2.0;
    let c = radius;
    let mut out = String::new();
    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{size}\" height=\"{size}\" viewBox=\"0 0 {size} {size}\">"
    );

    for slice in slices {
        if slice.fraction >= 1.0 || slices.len() == 1 {
            let _ = write!(
                out,
                "<circle cx=\"{c}\" cy=\"{c}\" r=\"{radius}\" fill=\"{}\">",
                slice.color
            );
            write_title(&mut out, slice);
            out.push_str("</circle>");
            continue;
        }

        let (x1, y1) = point(c, radius, slice.start_angle);
        let (x2, y2) = point(c, radius, slice.end_angle);
        let large_arc = u8::from(slice.end_angle - slice.start_angle > std::f64::consts::PI);
        let _ = write!(
            out,
            "<path d=\"M {c} {c} L {x1:.3} {y1:.3} A {radius} {radius} 0 {large_arc} 1 {x2:.3} {y2:.3} Z\" fill=\"{}\">",
            slice.color
        );
        write_title(&mut out, slice);
        out.push_str("</path>");
    }

    out.push_str("</svg>");
    out
}

fn write_title(out: &mut String, slice: &PieSlice) {
    out.push_str("<title>");
    svg_escape_into(out, &slice.label);
    let _ = write!(out, ": {} ({:.1}%)", slice.count, slice.fraction * 100.0);
    out.push_str("</title>");
}
