//! View rows for dashboard rendering.
//!
//! These types carry pre-formatted strings and computed fields so the
//! rendering layer stays simple. Sorting and truncation happen here, on
//! the copies handed out by the store.

use renderscope_metrics::{ActionMetric, RenderMetric};

/// Default number of rows a dashboard page shows.
pub const DEFAULT_MAX_ROWS: usize = 20;

/// Column a metric table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    /// Render/execution duration.
    #[default]
    Time,
    Name,
    /// Memory delta; metrics without one sort as zero.
    Memory,
    Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

// ── Rows ────────────────────────────────────────────────────────

/// One render metric prepared for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRow {
    pub name: String,
    pub time_ms: f64,
    pub time_display: String,
    pub memory_bytes: Option<i64>,
    pub memory_display: String,
    pub timestamp_ms: u64,
    pub timestamp_display: String,
}

impl RenderRow {
    pub fn from_metric(metric: &RenderMetric) -> Self {
        let memory_bytes = metric
            .resource_usage
            .as_ref()
            .and_then(|r| r.memory_bytes);
        Self {
            name: metric.name.clone(),
            time_ms: metric.render_time_ms,
            time_display: format_duration_ms(metric.render_time_ms),
            memory_bytes,
            memory_display: format_memory_delta(memory_bytes),
            timestamp_ms: metric.timestamp_ms,
            timestamp_display: format_clock_time(metric.timestamp_ms),
        }
    }
}

/// One action metric prepared for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRow {
    pub name: String,
    pub time_ms: f64,
    pub time_display: String,
    pub memory_bytes: Option<i64>,
    pub memory_display: String,
    pub timestamp_ms: u64,
    pub timestamp_display: String,
    /// Argument snapshot rendered as JSON, when tracked.
    pub params_display: Option<String>,
    /// Result snapshot rendered as JSON, when tracked.
    pub result_display: Option<String>,
}

impl ActionRow {
    pub fn from_metric(metric: &ActionMetric) -> Self {
        let memory_bytes = metric
            .resource_usage
            .as_ref()
            .and_then(|r| r.memory_bytes);
        Self {
            name: metric.name.clone(),
            time_ms: metric.execution_time_ms,
            time_display: format_duration_ms(metric.execution_time_ms),
            memory_bytes,
            memory_display: format_memory_delta(memory_bytes),
            timestamp_ms: metric.timestamp_ms,
            timestamp_display: format_clock_time(metric.timestamp_ms),
            params_display: metric.params.as_ref().map(|v| v.to_string()),
            result_display: metric.result.as_ref().map(|v| v.to_string()),
        }
    }
}

// ── Builders ────────────────────────────────────────────────────

trait SortKeys {
    fn time_key(&self) -> f64;
    fn name_key(&self) -> &str;
    fn memory_key(&self) -> i64;
    fn timestamp_key(&self) -> u64;
}

impl SortKeys for RenderRow {
    fn time_key(&self) -> f64 {
        self.time_ms
    }
    fn name_key(&self) -> &str {
        &self.name
    }
    fn memory_key(&self) -> i64 {
        self.memory_bytes.unwrap_or(0)
    }
    fn timestamp_key(&self) -> u64 {
        self.timestamp_ms
    }
}

impl SortKeys for ActionRow {
    fn time_key(&self) -> f64 {
        self.time_ms
    }
    fn name_key(&self) -> &str {
        &self.name
    }
    fn memory_key(&self) -> i64 {
        self.memory_bytes.unwrap_or(0)
    }
    fn timestamp_key(&self) -> u64 {
        self.timestamp_ms
    }
}

fn sort_rows<R: SortKeys>(rows: &mut [R], field: SortField, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = match field {
            SortField::Time => a.time_key().total_cmp(&b.time_key()),
            SortField::Name => a.name_key().cmp(b.name_key()),
            SortField::Memory => a.memory_key().cmp(&b.memory_key()),
            SortField::Timestamp => a.timestamp_key().cmp(&b.timestamp_key()),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Build sorted, truncated render rows.
pub fn build_render_rows(
    metrics: &[RenderMetric],
    field: SortField,
    direction: SortDirection,
    max_rows: usize,
) -> Vec<RenderRow> {
    let mut rows: Vec<RenderRow> = metrics.iter().map(RenderRow::from_metric).collect();
    sort_rows(&mut rows, field, direction);
    rows.truncate(max_rows);
    rows
}

/// Build sorted, truncated action rows.
pub fn build_action_rows(
    metrics: &[ActionMetric],
    field: SortField,
    direction: SortDirection,
    max_rows: usize,
) -> Vec<ActionRow> {
    let mut rows: Vec<ActionRow> = metrics.iter().map(ActionRow::from_metric).collect();
    sort_rows(&mut rows, field, direction);
    rows.truncate(max_rows);
    rows
}

// ── Format helpers ──────────────────────────────────────────────

/// Format a millisecond duration with a unit matched to its magnitude.
pub fn format_duration_ms(time_ms: f64) -> String {
    if time_ms < 1.0 {
        format!("{:.2}μs", time_ms * 1000.0)
    } else if time_ms < 1000.0 {
        format!("{time_ms:.2}ms")
    } else {
        format!("{:.2}s", time_ms / 1000.0)
    }
}

/// Format a signed memory delta. Absent readings display as `N/A`.
pub fn format_memory_delta(bytes: Option<i64>) -> String {
    const KB: i64 = 1024;
    const MB: i64 = 1024 * KB;

    let Some(bytes) = bytes else {
        return "N/A".to_string();
    };

    let sign = if bytes < 0 { "-" } else { "" };
    let magnitude = bytes.abs();
    if magnitude < KB {
        format!("{sign}{magnitude}B")
    } else if magnitude < MB {
        format!("{sign}{:.2}KB", magnitude as f64 / KB as f64)
    } else {
        format!("{sign}{:.2}MB", magnitude as f64 / MB as f64)
    }
}

/// Render an epoch-millisecond timestamp as a UTC wall-clock time.
pub fn format_clock_time(timestamp_ms: u64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms as i64)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use renderscope_metrics::ResourceUsage;

    fn render_metric(name: &str, time_ms: f64, memory: Option<i64>, ts: u64) -> RenderMetric {
        RenderMetric {
            name: name.to_string(),
            render_time_ms: time_ms,
            data_fetch_time_ms: None,
            timestamp_ms: ts,
            resource_usage: memory.map(|m| ResourceUsage {
                cpu_time_ms: None,
                memory_bytes: Some(m),
            }),
        }
    }

    fn action_metric(name: &str, time_ms: f64) -> ActionMetric {
        ActionMetric {
            name: name.to_string(),
            execution_time_ms: time_ms,
            timestamp_ms: 1_700_000_000_000,
            params: Some(serde_json::json!([1, 2])),
            result: None,
            resource_usage: None,
        }
    }

    #[test]
    fn format_duration_picks_units() {
        assert_eq!(format_duration_ms(0.5), "500.00μs");
        assert_eq!(format_duration_ms(1.0), "1.00ms");
        assert_eq!(format_duration_ms(42.1), "42.10ms");
        assert_eq!(format_duration_ms(1500.0), "1.50s");
    }

    #[test]
    fn format_memory_handles_sign_and_absence() {
        assert_eq!(format_memory_delta(None), "N/A");
        assert_eq!(format_memory_delta(Some(0)), "0B");
        assert_eq!(format_memory_delta(Some(512)), "512B");
        assert_eq!(format_memory_delta(Some(2048)), "2.00KB");
        assert_eq!(format_memory_delta(Some(-2048)), "-2.00KB");
        assert_eq!(format_memory_delta(Some(3 * 1024 * 1024)), "3.00MB");
    }

    #[test]
    fn format_clock_time_is_utc_wall_clock() {
        // 1970-01-01 00:00:01.500 UTC.
        assert_eq!(format_clock_time(1500), "00:00:01");
    }

    #[test]
    fn rows_sort_by_time_descending_by_default_inputs() {
        let metrics = vec![
            render_metric("fast", 1.0, None, 10),
            render_metric("slow", 9.0, None, 20),
            render_metric("mid", 5.0, None, 30),
        ];
        let rows = build_render_rows(
            &metrics,
            SortField::default(),
            SortDirection::default(),
            DEFAULT_MAX_ROWS,
        );
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["slow", "mid", "fast"]);
    }

    #[test]
    fn rows_sort_by_name_ascending() {
        let metrics = vec![
            render_metric("b", 1.0, None, 1),
            render_metric("a", 2.0, None, 2),
            render_metric("c", 3.0, None, 3),
        ];
        let rows = build_render_rows(&metrics, SortField::Name, SortDirection::Asc, 10);
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn missing_memory_sorts_as_zero() {
        let metrics = vec![
            render_metric("freed", 1.0, Some(-100), 1),
            render_metric("unknown", 1.0, None, 2),
            render_metric("grew", 1.0, Some(100), 3),
        ];
        let rows = build_render_rows(&metrics, SortField::Memory, SortDirection::Asc, 10);
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["freed", "unknown", "grew"]);
    }

    #[test]
    fn rows_are_truncated_to_max() {
        let metrics: Vec<_> = (0..50)
            .map(|i| render_metric(&format!("m{i}"), i as f64, None, i as u64))
            .collect();
        let rows = build_render_rows(&metrics, SortField::Time, SortDirection::Desc, 20);
        assert_eq!(rows.len(), 20);
        assert_eq!(rows[0].name, "m49");
    }

    #[test]
    fn action_rows_carry_snapshot_displays() {
        let rows = build_action_rows(
            &[action_metric("add", 2.0)],
            SortField::Time,
            SortDirection::Desc,
            10,
        );
        assert_eq!(rows[0].params_display.as_deref(), Some("[1,2]"));
        assert!(rows[0].result_display.is_none());
        assert_eq!(rows[0].memory_display, "N/A");
    }
}
