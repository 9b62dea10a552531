//! Tracer seam — the minimal span interface the wrappers emit into.
//!
//! The wrappers only need `start_span(name)`, `set_tag(key, value)`, and
//! `finish()`, so the backend is a pair of object-safe traits. Span
//! operations are side-effect-only: an implementation must never fail or
//! block the instrumented call.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::debug;

/// A tag value attached to a span.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Str(String),
    Float(f64),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Str(s) => f.write_str(s),
            TagValue::Float(v) => write!(f, "{v}"),
            TagValue::Int(v) => write!(f, "{v}"),
            TagValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Str(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::Str(value)
    }
}

impl From<f64> for TagValue {
    fn from(value: f64) -> Self {
        TagValue::Float(value)
    }
}

impl From<i64> for TagValue {
    fn from(value: i64) -> Self {
        TagValue::Int(value)
    }
}

impl From<bool> for TagValue {
    fn from(value: bool) -> Self {
        TagValue::Bool(value)
    }
}

/// One in-flight trace span.
///
/// `finish` consumes the span, so a span can only be closed once.
pub trait Span: Send {
    /// Attach a key/value annotation to the span.
    fn set_tag(&mut self, key: &str, value: TagValue);

    /// Close the span.
    fn finish(self: Box<Self>);
}

/// Factory for trace spans.
pub trait Tracer: Send + Sync {
    /// Open a span for one traced operation.
    fn start_span(&self, name: &str) -> Box<dyn Span>;
}

// ── Noop backend ────────────────────────────────────────────────

/// Tracer that discards all spans.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

struct NoopSpan;

impl Span for NoopSpan {
    fn set_tag(&mut self, _key: &str, _value: TagValue) {}
    fn finish(self: Box<Self>) {}
}

impl Tracer for NoopTracer {
    fn start_span(&self, _name: &str) -> Box<dyn Span> {
        Box::new(NoopSpan)
    }
}

// ── Log backend ─────────────────────────────────────────────────

/// Default tracer backend: emits one `tracing` event per finished span,
/// carrying the span name, collected tags, and elapsed time.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTracer;

struct LogSpan {
    name: String,
    started: Instant,
    tags: Vec<(String, TagValue)>,
}

impl Span for LogSpan {
    fn set_tag(&mut self, key: &str, value: TagValue) {
        self.tags.push((key.to_string(), value));
    }

    fn finish(self: Box<Self>) {
        debug!(
            target: "renderscope::span",
            span = %self.name,
            elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0,
            tags = ?self.tags,
            "span finished"
        );
    }
}

impl Tracer for LogTracer {
    fn start_span(&self, name: &str) -> Box<dyn Span> {
        Box::new(LogSpan {
            name: name.to_string(),
            started: Instant::now(),
            tags: Vec::new(),
        })
    }
}

// ── Recording backend ───────────────────────────────────────────

/// A span retained by [`RecordingTracer`] after `finish`.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedSpan {
    pub name: String,
    pub tags: Vec<(String, TagValue)>,
}

impl FinishedSpan {
    /// Look up a tag by key.
    pub fn tag(&self, key: &str) -> Option<&TagValue> {
        self.tags.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// In-memory tracer that retains finished spans for inspection.
///
/// Clones share the same buffer, so a handle kept by the caller observes
/// spans finished through a clone handed to the monitor.
#[derive(Clone, Default)]
pub struct RecordingTracer {
    finished: Arc<Mutex<Vec<FinishedSpan>>>,
}

impl RecordingTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all finished spans, in finish order.
    pub fn finished_spans(&self) -> Vec<FinishedSpan> {
        self.finished
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

struct RecordingSpan {
    name: String,
    tags: Vec<(String, TagValue)>,
    sink: Arc<Mutex<Vec<FinishedSpan>>>,
}

impl Span for RecordingSpan {
    fn set_tag(&mut self, key: &str, value: TagValue) {
        self.tags.push((key.to_string(), value));
    }

    fn finish(self: Box<Self>) {
        let span = FinishedSpan {
            name: self.name,
            tags: self.tags,
        };
        self.sink
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(span);
    }
}

impl Tracer for RecordingTracer {
    fn start_span(&self, name: &str) -> Box<dyn Span> {
        Box::new(RecordingSpan {
            name: name.to_string(),
            tags: Vec::new(),
            sink: Arc::clone(&self.finished),
        })
    }
}
