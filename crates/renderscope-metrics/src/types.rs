//! Metric record types for the RenderScope store.
//!
//! These types represent one sampled invocation of a render unit or a
//! server action. All types are serializable to/from JSON so the dashboard
//! layer can ship them to a client unchanged.

use serde::{Deserialize, Serialize};

/// Resource accounting captured around one instrumented call.
///
/// Both fields are optional: a reading that could not be taken is omitted
/// rather than failing the instrumented call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResourceUsage {
    /// CPU time spent in the call, in milliseconds (host-supplied).
    pub cpu_time_ms: Option<f64>,
    /// Heap delta across the call in bytes. Signed — a collection during
    /// the call can make this negative.
    pub memory_bytes: Option<i64>,
}

/// One sampled render of a server-side view unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderMetric {
    /// Display name of the rendered unit.
    pub name: String,
    /// Wall-clock render duration in milliseconds.
    pub render_time_ms: f64,
    /// Time spent fetching data before rendering, when the host measures
    /// that phase separately.
    pub data_fetch_time_ms: Option<f64>,
    /// Unix timestamp (milliseconds) when the render completed.
    pub timestamp_ms: u64,
    /// Resource accounting, when requested and available.
    pub resource_usage: Option<ResourceUsage>,
}

/// One sampled execution of a server action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionMetric {
    /// Display name of the action.
    pub name: String,
    /// Wall-clock execution duration in milliseconds.
    pub execution_time_ms: f64,
    /// Unix timestamp (milliseconds) when the action completed.
    pub timestamp_ms: u64,
    /// Snapshot of the call arguments, for display only.
    pub params: Option<serde_json::Value>,
    /// Snapshot of the resolved return value, for display only.
    pub result: Option<serde_json::Value>,
    /// Resource accounting, when requested and available.
    pub resource_usage: Option<ResourceUsage>,
}
