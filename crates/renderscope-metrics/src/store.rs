//! Metrics store — bounded in-memory buffers for render and action metrics.
//!
//! A single `MetricsStore` lives for the process lifetime and is shared by
//! every instrumentation wrapper. All mutations go through one mutex so the
//! append-and-evict sequence stays atomic under concurrent tasks.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::types::{ActionMetric, RenderMetric};

/// Maximum number of entries retained per metric buffer. Oldest entries
/// are evicted first once the cap is reached.
pub const MAX_METRICS: usize = 1000;

struct Inner {
    render_metrics: VecDeque<RenderMetric>,
    action_metrics: VecDeque<ActionMetric>,
    enabled: bool,
    sampling_rate: f64,
}

/// Shared store of recent render and action metrics.
///
/// `Clone` + `Send` + `Sync` (backed by `Arc<Mutex<..>>`); clones observe
/// the same buffers and configuration. Every operation completes without
/// suspension, so the store can be used from async tasks directly.
#[derive(Clone)]
pub struct MetricsStore {
    inner: Arc<Mutex<Inner>>,
}

impl MetricsStore {
    /// Create an empty store: collection enabled, sampling rate 1.0.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                render_metrics: VecDeque::with_capacity(MAX_METRICS),
                action_metrics: VecDeque::with_capacity(MAX_METRICS),
                enabled: true,
                sampling_rate: 1.0,
            })),
        }
    }

    // Recover from poisoning; store operations must never panic.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether metric collection is enabled.
    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    /// Enable or disable metric collection process-wide.
    pub fn set_enabled(&self, enabled: bool) {
        self.lock().enabled = enabled;
        debug!(enabled, "metrics collection toggled");
    }

    /// Current sampling rate in `[0, 1]`.
    pub fn sampling_rate(&self) -> f64 {
        self.lock().sampling_rate
    }

    /// Set the probability that an instrumented call is sampled.
    ///
    /// The rate is clamped into `[0, 1]`; NaN disables sampling rather
    /// than poisoning later comparisons. Never fails.
    pub fn set_sampling_rate(&self, rate: f64) {
        let clamped = if rate.is_nan() {
            0.0
        } else {
            rate.clamp(0.0, 1.0)
        };
        self.lock().sampling_rate = clamped;
        debug!(rate = clamped, "sampling rate updated");
    }

    /// Decide whether the current invocation should be instrumented.
    ///
    /// A Bernoulli trial: `enabled && uniform[0,1) < sampling_rate`.
    /// Deterministic only at the boundaries — always false at rate 0.0,
    /// always true at rate 1.0 (while enabled).
    pub fn should_sample(&self) -> bool {
        let inner = self.lock();
        inner.enabled && rand::random::<f64>() < inner.sampling_rate
    }

    /// Append a render metric, evicting the oldest entry past the cap.
    ///
    /// No-op while collection is disabled.
    pub fn add_render_metric(&self, metric: RenderMetric) {
        let mut inner = self.lock();
        if !inner.enabled {
            return;
        }
        inner.render_metrics.push_back(metric);
        while inner.render_metrics.len() > MAX_METRICS {
            inner.render_metrics.pop_front();
        }
    }

    /// Append an action metric, evicting the oldest entry past the cap.
    ///
    /// No-op while collection is disabled.
    pub fn add_action_metric(&self, metric: ActionMetric) {
        let mut inner = self.lock();
        if !inner.enabled {
            return;
        }
        inner.action_metrics.push_back(metric);
        while inner.action_metrics.len() > MAX_METRICS {
            inner.action_metrics.pop_front();
        }
    }

    /// Copy of the retained render metrics, oldest first.
    ///
    /// The caller owns the returned vector; mutating it never affects
    /// the store.
    pub fn render_metrics(&self) -> Vec<RenderMetric> {
        self.lock().render_metrics.iter().cloned().collect()
    }

    /// Copy of the retained action metrics, oldest first.
    pub fn action_metrics(&self) -> Vec<ActionMetric> {
        self.lock().action_metrics.iter().cloned().collect()
    }

    /// Drop all retained metrics. Leaves `enabled` and the sampling rate
    /// untouched.
    pub fn clear_metrics(&self) {
        let mut inner = self.lock();
        let dropped = inner.render_metrics.len() + inner.action_metrics.len();
        inner.render_metrics.clear();
        inner.action_metrics.clear();
        debug!(dropped, "metrics cleared");
    }
}

impl Default for MetricsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_metric(name: &str, timestamp_ms: u64) -> RenderMetric {
        RenderMetric {
            name: name.to_string(),
            render_time_ms: 1.0,
            data_fetch_time_ms: None,
            timestamp_ms,
            resource_usage: None,
        }
    }

    fn action_metric(name: &str) -> ActionMetric {
        ActionMetric {
            name: name.to_string(),
            execution_time_ms: 1.0,
            timestamp_ms: 0,
            params: None,
            result: None,
            resource_usage: None,
        }
    }

    #[test]
    fn append_and_read_back_in_order() {
        let store = MetricsStore::new();
        store.add_render_metric(render_metric("a", 1));
        store.add_render_metric(render_metric("b", 2));

        let metrics = store.render_metrics();
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].name, "a");
        assert_eq!(metrics[1].name, "b");
    }

    #[test]
    fn evicts_oldest_past_the_cap() {
        let store = MetricsStore::new();
        for i in 0..(MAX_METRICS + 1) {
            store.add_render_metric(render_metric(&format!("m{i}"), i as u64));
        }

        let metrics = store.render_metrics();
        assert_eq!(metrics.len(), MAX_METRICS);
        // m0 was evicted; the rest survive in original relative order.
        assert_eq!(metrics[0].name, "m1");
        assert_eq!(metrics[MAX_METRICS - 1].name, format!("m{MAX_METRICS}"));
    }

    #[test]
    fn action_buffer_evicts_independently() {
        let store = MetricsStore::new();
        for i in 0..(MAX_METRICS + 5) {
            store.add_action_metric(action_metric(&format!("a{i}")));
        }
        store.add_render_metric(render_metric("only", 1));

        assert_eq!(store.action_metrics().len(), MAX_METRICS);
        assert_eq!(store.action_metrics()[0].name, "a5");
        assert_eq!(store.render_metrics().len(), 1);
    }

    #[test]
    fn sampling_rate_is_clamped() {
        let store = MetricsStore::new();

        store.set_sampling_rate(-5.0);
        assert_eq!(store.sampling_rate(), 0.0);

        store.set_sampling_rate(0.5);
        assert_eq!(store.sampling_rate(), 0.5);

        store.set_sampling_rate(3.0);
        assert_eq!(store.sampling_rate(), 1.0);

        store.set_sampling_rate(f64::NAN);
        assert_eq!(store.sampling_rate(), 0.0);
    }

    #[test]
    fn sampling_boundaries_are_deterministic() {
        let store = MetricsStore::new();

        store.set_sampling_rate(0.0);
        assert!((0..100).all(|_| !store.should_sample()));

        store.set_sampling_rate(1.0);
        assert!((0..100).all(|_| store.should_sample()));
    }

    #[test]
    fn disabled_store_never_samples_or_records() {
        let store = MetricsStore::new();
        store.set_enabled(false);

        store.set_sampling_rate(1.0);
        assert!((0..100).all(|_| !store.should_sample()));

        store.add_render_metric(render_metric("r", 1));
        store.add_action_metric(action_metric("a"));
        assert!(store.render_metrics().is_empty());
        assert!(store.action_metrics().is_empty());
    }

    #[test]
    fn reads_return_independent_copies() {
        let store = MetricsStore::new();
        store.add_render_metric(render_metric("a", 1));

        let mut copy = store.render_metrics();
        copy.clear();
        copy.push(render_metric("injected", 2));

        let fresh = store.render_metrics();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].name, "a");
    }

    #[test]
    fn clear_empties_buffers_but_preserves_config() {
        let store = MetricsStore::new();
        store.set_enabled(true);
        store.set_sampling_rate(0.25);
        store.add_render_metric(render_metric("r", 1));
        store.add_action_metric(action_metric("a"));

        store.clear_metrics();

        assert!(store.render_metrics().is_empty());
        assert!(store.action_metrics().is_empty());
        assert!(store.is_enabled());
        assert_eq!(store.sampling_rate(), 0.25);
    }

    #[test]
    fn clones_share_state() {
        let store = MetricsStore::new();
        let clone = store.clone();

        clone.add_action_metric(action_metric("shared"));
        assert_eq!(store.action_metrics().len(), 1);

        store.set_sampling_rate(0.5);
        assert_eq!(clone.sampling_rate(), 0.5);
    }

    #[test]
    fn concurrent_appends_respect_the_cap() {
        let store = MetricsStore::new();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..500 {
                        store.add_action_metric(action_metric(&format!("t{t}-{i}")));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.action_metrics().len(), MAX_METRICS);
    }
}
