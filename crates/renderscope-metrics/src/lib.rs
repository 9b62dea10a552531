//! renderscope-metrics — in-memory performance metrics for RenderScope.
//!
//! Holds the metric record types and the process-wide [`MetricsStore`]:
//! two bounded FIFO buffers (render metrics, action metrics) plus the
//! enabled flag and sampling rate consulted by the instrumentation layer.
//!
//! # Architecture
//!
//! ```text
//! MetricsStore
//!   ├── should_sample() ← consulted once per instrumented call
//!   ├── add_render_metric() / add_action_metric() ← append + FIFO evict
//!   └── render_metrics() / action_metrics() → copies for the dashboard
//! ```
//!
//! The store is `Clone` + `Send` + `Sync` (backed by `Arc<Mutex<..>>`) and
//! can be shared across async tasks.

pub mod store;
pub mod types;

pub use store::{MAX_METRICS, MetricsStore};
pub use types::{ActionMetric, RenderMetric, ResourceUsage};
