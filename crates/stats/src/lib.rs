//! Column statistics for qview's stats popup.

mod column;
mod pie;

pub use column::{ColumnStats, NULL_LABEL, ValueCount};
pub use pie::{OTHER_LABEL, PieSlice, pie_slices, render_pie_svg};
