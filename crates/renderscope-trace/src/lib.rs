//! renderscope-trace — sampled performance instrumentation for server-side
//! render units and actions.
//!
//! Wraps arbitrary asynchronous callables, times them, optionally snapshots
//! process memory around the call, forwards timing to a trace span, and
//! records a metric in the shared [`renderscope_metrics::MetricsStore`].
//!
//! # Architecture
//!
//! ```text
//! PerfMonitor (composition root)
//!   ├── wrap_component() → TrackedComponent::render(props)
//!   ├── wrap_action()    → TrackedAction::call(args)
//!   └── configure()      ← partial enabled/sampling updates
//!
//! Per sampled call: should_sample → start span → run → tag + record → finish
//! Unsampled calls pass straight through with zero instrumentation.
//! ```
//!
//! The tracer backend is pluggable through the [`tracer::Tracer`] seam;
//! the default [`tracer::LogTracer`] emits `tracing` events.

pub mod config;
pub mod global;
pub mod monitor;
pub mod probe;
pub mod tracer;
pub mod wrap;

pub use config::{ConfigError, MonitorConfig, MonitorOptions};
pub use global::{
    action_metrics, clear_performance_metrics, configure_performance_monitoring, global_monitor,
    render_metrics, track_server_action, with_performance_tracking,
};
pub use monitor::PerfMonitor;
pub use probe::ResourceProbe;
pub use tracer::{FinishedSpan, LogTracer, NoopTracer, RecordingTracer, Span, TagValue, Tracer};
pub use wrap::{ActionOptions, RenderOptions, TrackedAction, TrackedComponent};
