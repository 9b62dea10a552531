//! Per-unit aggregate statistics for the dashboard header.

use std::collections::HashMap;

use renderscope_metrics::{ActionMetric, RenderMetric};

/// Aggregated timings for one named unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitStats {
    pub name: String,
    pub count: usize,
    pub total_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl UnitStats {
    fn new(name: &str, time_ms: f64) -> Self {
        Self {
            name: name.to_string(),
            count: 1,
            total_ms: time_ms,
            min_ms: time_ms,
            max_ms: time_ms,
        }
    }

    fn update(&mut self, time_ms: f64) {
        self.count += 1;
        self.total_ms += time_ms;
        self.min_ms = self.min_ms.min(time_ms);
        self.max_ms = self.max_ms.max(time_ms);
    }

    /// Mean duration across all recorded invocations.
    pub fn avg_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_ms / self.count as f64
        }
    }
}

fn summarize<'a>(samples: impl Iterator<Item = (&'a str, f64)>) -> Vec<UnitStats> {
    let mut by_name: HashMap<&str, UnitStats> = HashMap::new();
    for (name, time_ms) in samples {
        match by_name.get_mut(name) {
            Some(stats) => stats.update(time_ms),
            None => {
                by_name.insert(name, UnitStats::new(name, time_ms));
            }
        }
    }

    let mut stats: Vec<UnitStats> = by_name.into_values().collect();
    // Heaviest units first, ties broken by name for a stable display.
    stats.sort_by(|a, b| {
        b.total_ms
            .total_cmp(&a.total_ms)
            .then_with(|| a.name.cmp(&b.name))
    });
    stats
}

/// Aggregate render metrics by unit name, heaviest total first.
pub fn summarize_renders(metrics: &[RenderMetric]) -> Vec<UnitStats> {
    summarize(metrics.iter().map(|m| (m.name.as_str(), m.render_time_ms)))
}

/// Aggregate action metrics by action name, heaviest total first.
pub fn summarize_actions(metrics: &[ActionMetric]) -> Vec<UnitStats> {
    summarize(
        metrics
            .iter()
            .map(|m| (m.name.as_str(), m.execution_time_ms)),
    )
}
