//! Performance monitor — the composition root tying the store, the tracer
//! backend, and the resource probe together.
//!
//! Hosts construct one `PerfMonitor` and hand clones to whatever needs to
//! wrap units or read metrics; tests construct fresh instances instead of
//! sharing a global.

use std::sync::Arc;

use renderscope_metrics::{ActionMetric, MetricsStore, RenderMetric};

use crate::config::{ConfigError, MonitorConfig, MonitorOptions};
use crate::probe::ResourceProbe;
use crate::tracer::{LogTracer, Tracer};
use crate::wrap::{ActionOptions, RenderOptions, TrackedAction, TrackedComponent};

/// Owns the metrics store and the instrumentation collaborators.
///
/// Clones share the same store, tracer, and probe.
#[derive(Clone)]
pub struct PerfMonitor {
    store: MetricsStore,
    tracer: Arc<dyn Tracer>,
    probe: Arc<ResourceProbe>,
}

impl PerfMonitor {
    /// Create a monitor with a fresh store and the default [`LogTracer`]
    /// backend.
    pub fn new() -> Self {
        Self::with_store(MetricsStore::new())
    }

    /// Create a monitor over an existing store.
    pub fn with_store(store: MetricsStore) -> Self {
        Self {
            store,
            tracer: Arc::new(LogTracer),
            probe: Arc::new(ResourceProbe::new()),
        }
    }

    /// Replace the tracer backend.
    pub fn with_tracer(mut self, tracer: Arc<dyn Tracer>) -> Self {
        self.tracer = tracer;
        self
    }

    /// Create a monitor configured from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = MonitorConfig::from_env()?;
        let monitor = Self::new();
        monitor.configure(&config.into());
        Ok(monitor)
    }

    /// The shared metrics store.
    pub fn store(&self) -> &MetricsStore {
        &self.store
    }

    /// Apply a partial configuration update, effective for all subsequent
    /// sampling decisions.
    pub fn configure(&self, options: &MonitorOptions) {
        if let Some(enabled) = options.enabled {
            self.store.set_enabled(enabled);
        }
        if let Some(rate) = options.sampling_rate {
            self.store.set_sampling_rate(rate);
        }
    }

    /// Wrap a render-producing callable with performance tracking.
    pub fn wrap_component<F>(&self, component: F, options: RenderOptions) -> TrackedComponent<F> {
        TrackedComponent::new(
            component,
            options,
            self.store.clone(),
            Arc::clone(&self.tracer),
            Arc::clone(&self.probe),
        )
    }

    /// Wrap an asynchronous action with performance tracking.
    pub fn wrap_action<F>(&self, action: F, options: ActionOptions) -> TrackedAction<F> {
        TrackedAction::new(
            action,
            options,
            self.store.clone(),
            Arc::clone(&self.tracer),
            Arc::clone(&self.probe),
        )
    }

    /// Copy of the retained render metrics.
    pub fn render_metrics(&self) -> Vec<RenderMetric> {
        self.store.render_metrics()
    }

    /// Copy of the retained action metrics.
    pub fn action_metrics(&self) -> Vec<ActionMetric> {
        self.store.action_metrics()
    }

    /// Drop all retained metrics, preserving configuration.
    pub fn clear_metrics(&self) {
        self.store.clear_metrics();
    }
}

impl Default for PerfMonitor {
    fn default() -> Self {
        Self::new()
    }
}
