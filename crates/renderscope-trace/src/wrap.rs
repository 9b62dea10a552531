//! Instrumentation wrappers for render units and server actions.
//!
//! Both wrappers follow the same per-invocation sequence: consult the
//! store's sampling decision, pass straight through when unsampled, and
//! otherwise time the call, snapshot resources when requested, tag a trace
//! span, and append a metric. The wrapped callable's result or error is
//! returned unchanged in both paths.

use std::any::type_name;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::Serialize;

use renderscope_metrics::{ActionMetric, MetricsStore, RenderMetric, ResourceUsage};

use crate::probe::ResourceProbe;
use crate::tracer::{Span, TagValue, Tracer};

/// Display name used when a render unit has no usable declared name.
pub const UNKNOWN_COMPONENT: &str = "UnknownComponent";
/// Display name used when an action has no usable declared name.
pub const UNKNOWN_ACTION: &str = "UnknownAction";

/// Options for [`TrackedComponent`].
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Explicit display name; falls back to the callable's declared name.
    pub name: Option<String>,
    /// Snapshot process memory before and after each sampled render.
    pub track_resource_usage: bool,
}

/// Options for [`TrackedAction`].
#[derive(Debug, Clone, Default)]
pub struct ActionOptions {
    /// Explicit display name; falls back to the callable's declared name.
    pub name: Option<String>,
    /// Snapshot the call arguments into the metric, for display only.
    pub track_params: bool,
    /// Snapshot the resolved return value into the metric.
    pub track_result: bool,
    /// Snapshot process memory before and after each sampled call.
    pub track_resource_usage: bool,
}

/// Resolve a display name: explicit option, else the callable's type name
/// tail, else the fallback literal. Closures have no usable declared name.
pub(crate) fn resolve_name<F>(explicit: Option<&str>, fallback: &str) -> String {
    if let Some(name) = explicit {
        return name.to_string();
    }
    let full = type_name::<F>();
    let tail = full.rsplit("::").next().unwrap_or(full);
    if tail.is_empty() || tail.contains("closure") {
        fallback.to_string()
    } else {
        tail.to_string()
    }
}

/// Finishes the span if the instrumented future is dropped mid-call.
///
/// Cancellation takes the error path: the span is closed with an `error`
/// tag and no metric is recorded.
struct SpanGuard {
    span: Option<Box<dyn Span>>,
}

impl SpanGuard {
    fn new(span: Box<dyn Span>) -> Self {
        Self { span: Some(span) }
    }

    fn set_tag(&mut self, key: &str, value: TagValue) {
        if let Some(span) = self.span.as_mut() {
            span.set_tag(key, value);
        }
    }

    fn finish(mut self) {
        if let Some(span) = self.span.take() {
            span.finish();
        }
    }
}

impl Drop for SpanGuard {
    fn drop(&mut self) {
        if let Some(mut span) = self.span.take() {
            span.set_tag("error", TagValue::from("cancelled"));
            span.finish();
        }
    }
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

fn start_memory(probe: &ResourceProbe, enabled: bool) -> Option<u64> {
    if enabled { probe.memory_bytes() } else { None }
}

/// Close out a memory delta. `None` when tracking was off or either
/// reading was unavailable — resource accounting never fails the call.
fn memory_delta(probe: &ResourceProbe, start: Option<u64>) -> Option<ResourceUsage> {
    let start = start?;
    let end = probe.memory_bytes()?;
    Some(ResourceUsage {
        cpu_time_ms: None,
        memory_bytes: Some(end as i64 - start as i64),
    })
}

// ── Render units ────────────────────────────────────────────────

/// A render-producing callable wrapped with performance tracking.
///
/// The calling convention is preserved: [`render`](Self::render) takes the
/// same single props value and returns the wrapped unit's result or error
/// unchanged.
pub struct TrackedComponent<F> {
    component: F,
    name: String,
    track_resource_usage: bool,
    store: MetricsStore,
    tracer: Arc<dyn Tracer>,
    probe: Arc<ResourceProbe>,
}

impl<F> TrackedComponent<F> {
    pub(crate) fn new(
        component: F,
        options: RenderOptions,
        store: MetricsStore,
        tracer: Arc<dyn Tracer>,
        probe: Arc<ResourceProbe>,
    ) -> Self {
        let name = resolve_name::<F>(options.name.as_deref(), UNKNOWN_COMPONENT);
        Self {
            component,
            name,
            track_resource_usage: options.track_resource_usage,
            store,
            tracer,
            probe,
        }
    }

    /// Resolved display name of the wrapped unit.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render with the given props.
    ///
    /// Unsampled invocations call the wrapped unit directly with zero
    /// instrumentation overhead. A failed render produces no metric; the
    /// original error crosses the boundary unchanged.
    pub async fn render<P, Fut, T, E>(&self, props: P) -> Result<T, E>
    where
        F: Fn(P) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        if !self.store.should_sample() {
            return (self.component)(props).await;
        }

        let started = Instant::now();
        let memory_before = start_memory(&self.probe, self.track_resource_usage);
        let mut span = SpanGuard::new(self.tracer.start_span(&format!("render.{}", self.name)));
        span.set_tag("component.name", TagValue::from(self.name.as_str()));

        match (self.component)(props).await {
            Ok(value) => {
                let render_time_ms = elapsed_ms(started);
                let resource_usage = memory_delta(&self.probe, memory_before);

                span.set_tag("render.time_ms", TagValue::from(render_time_ms));
                if let Some(bytes) = resource_usage.as_ref().and_then(|r| r.memory_bytes) {
                    span.set_tag("resource.memory_bytes", TagValue::from(bytes));
                }

                self.store.add_render_metric(RenderMetric {
                    name: self.name.clone(),
                    render_time_ms,
                    data_fetch_time_ms: None,
                    timestamp_ms: epoch_ms(),
                    resource_usage,
                });
                span.finish();
                Ok(value)
            }
            Err(err) => {
                span.set_tag("error", TagValue::from(err.to_string()));
                span.finish();
                Err(err)
            }
        }
    }
}

// ── Actions ─────────────────────────────────────────────────────

/// An asynchronous action wrapped with performance tracking.
///
/// Multi-argument actions take their arguments as a single tuple, which is
/// also what lands in the `params` snapshot when enabled.
pub struct TrackedAction<F> {
    action: F,
    name: String,
    track_params: bool,
    track_result: bool,
    track_resource_usage: bool,
    store: MetricsStore,
    tracer: Arc<dyn Tracer>,
    probe: Arc<ResourceProbe>,
}

impl<F> TrackedAction<F> {
    pub(crate) fn new(
        action: F,
        options: ActionOptions,
        store: MetricsStore,
        tracer: Arc<dyn Tracer>,
        probe: Arc<ResourceProbe>,
    ) -> Self {
        let name = resolve_name::<F>(options.name.as_deref(), UNKNOWN_ACTION);
        Self {
            action,
            name,
            track_params: options.track_params,
            track_result: options.track_result,
            track_resource_usage: options.track_resource_usage,
            store,
            tracer,
            probe,
        }
    }

    /// Resolved display name of the wrapped action.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Execute the action with the given arguments.
    ///
    /// Argument and result snapshots are serialized at the call boundary;
    /// a value that fails to serialize is omitted from the metric rather
    /// than failing the call.
    pub async fn call<A, Fut, T, E>(&self, args: A) -> Result<T, E>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        A: Serialize,
        T: Serialize,
        E: fmt::Display,
    {
        if !self.store.should_sample() {
            return (self.action)(args).await;
        }

        let params = if self.track_params {
            serde_json::to_value(&args).ok()
        } else {
            None
        };

        let started = Instant::now();
        let memory_before = start_memory(&self.probe, self.track_resource_usage);
        let mut span = SpanGuard::new(self.tracer.start_span(&format!("action.{}", self.name)));
        span.set_tag("action.name", TagValue::from(self.name.as_str()));

        match (self.action)(args).await {
            Ok(value) => {
                let execution_time_ms = elapsed_ms(started);
                let resource_usage = memory_delta(&self.probe, memory_before);
                let result = if self.track_result {
                    serde_json::to_value(&value).ok()
                } else {
                    None
                };

                span.set_tag("execution.time_ms", TagValue::from(execution_time_ms));
                if let Some(bytes) = resource_usage.as_ref().and_then(|r| r.memory_bytes) {
                    span.set_tag("resource.memory_bytes", TagValue::from(bytes));
                }

                self.store.add_action_metric(ActionMetric {
                    name: self.name.clone(),
                    execution_time_ms,
                    timestamp_ms: epoch_ms(),
                    params,
                    result,
                    resource_usage,
                });
                span.finish();
                Ok(value)
            }
            Err(err) => {
                span.set_tag("error", TagValue::from(err.to_string()));
                span.finish();
                Err(err)
            }
        }
    }
}
