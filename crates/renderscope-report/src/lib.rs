//! renderscope-report — presentation prep for the metrics dashboard.
//!
//! Turns raw metric records into sorted, pre-formatted rows and per-unit
//! aggregate summaries so a rendering layer stays free of formatting and
//! sorting logic.

pub mod summary;
pub mod views;

pub use summary::{UnitStats, summarize_actions, summarize_renders};
pub use views::{
    ActionRow, DEFAULT_MAX_ROWS, RenderRow, SortDirection, SortField, build_action_rows,
    build_render_rows, format_clock_time, format_duration_ms, format_memory_delta,
};
