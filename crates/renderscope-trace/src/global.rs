//! Process-global monitor surface.
//!
//! The instance-based [`PerfMonitor`] API is primary — hosts that wire
//! their own composition root (and all tests) construct monitors directly.
//! This module holds the lazily-initialized process-wide instance behind
//! the free functions a demo app calls from module scope.

use std::sync::OnceLock;

use renderscope_metrics::{ActionMetric, RenderMetric};

use crate::config::MonitorOptions;
use crate::monitor::PerfMonitor;
use crate::wrap::{ActionOptions, RenderOptions, TrackedAction, TrackedComponent};

static GLOBAL_MONITOR: OnceLock<PerfMonitor> = OnceLock::new();

/// The process-wide monitor, created on first access and alive until
/// process teardown.
pub fn global_monitor() -> &'static PerfMonitor {
    GLOBAL_MONITOR.get_or_init(PerfMonitor::new)
}

/// Wrap a render-producing callable against the process-wide monitor.
pub fn with_performance_tracking<F>(component: F, options: RenderOptions) -> TrackedComponent<F> {
    global_monitor().wrap_component(component, options)
}

/// Wrap an asynchronous action against the process-wide monitor.
pub fn track_server_action<F>(action: F, options: ActionOptions) -> TrackedAction<F> {
    global_monitor().wrap_action(action, options)
}

/// Apply a partial configuration update process-wide, effective for all
/// subsequent sampling decisions.
pub fn configure_performance_monitoring(options: &MonitorOptions) {
    global_monitor().configure(options);
}

/// Copy of the render metrics retained by the process-wide monitor.
pub fn render_metrics() -> Vec<RenderMetric> {
    global_monitor().render_metrics()
}

/// Copy of the action metrics retained by the process-wide monitor.
pub fn action_metrics() -> Vec<ActionMetric> {
    global_monitor().action_metrics()
}

/// Drop all metrics retained by the process-wide monitor.
pub fn clear_performance_metrics() {
    global_monitor().clear_metrics();
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global monitor is shared process state; everything touching it
    // lives in this one test.
    #[tokio::test]
    async fn global_surface_round_trip() {
        configure_performance_monitoring(&MonitorOptions {
            enabled: Some(true),
            sampling_rate: Some(1.0),
        });
        clear_performance_metrics();

        let tracked = track_server_action(
            |x: u32| async move { Ok::<_, std::convert::Infallible>(x + 1) },
            ActionOptions {
                name: Some("increment".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(tracked.call(1).await.unwrap(), 2);

        let metrics = action_metrics();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].name, "increment");
        assert!(render_metrics().is_empty());

        clear_performance_metrics();
        assert!(action_metrics().is_empty());
    }
}
