//! Tracer trait for optional observability around external calls.
//!
//! A span brackets exactly one scrape or inference call: it is started with
//! input metadata before the call and ended with output metadata after it.
//! Tracing is best-effort. Implementations must not block, must not panic and
//! must not let their own failures reach the caller.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// What kind of observation a span records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpanKind {
    /// A plain span (scrape calls)
    Span,
    /// An LLM generation
    Generation { model: String, provider: String },
}

/// Terminal status recorded on a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpanStatus {
    Success,
    Empty,
    Error,
}

impl SpanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanStatus::Success => "Success",
            SpanStatus::Empty => "Empty",
            SpanStatus::Error => "Error",
        }
    }
}

/// An open span. Created per call, consumed by [`Tracer::end_span`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpanHandle {
    pub id: Uuid,
    pub trace_id: Uuid,
    pub name: String,
    pub kind: SpanKind,
    pub input: Value,
    pub started_at: DateTime<Utc>,
}

impl SpanHandle {
    pub fn new(name: impl Into<String>, kind: SpanKind, input: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            trace_id: Uuid::new_v4(),
            name: name.into(),
            kind,
            input,
            started_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait Tracer: Send + Sync {
    /// Open a span with input metadata.
    fn start_span(&self, name: &str, kind: SpanKind, input: Value) -> SpanHandle {
        SpanHandle::new(name, kind, input)
    }

    /// Close a span with output metadata.
    fn end_span(&self, span: SpanHandle, status: SpanStatus, output: Value);

    /// Whether spans go anywhere.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Wait until every closed span has been delivered (or has failed).
    /// Call before the process exits.
    async fn flush(&self) {}
}

/// Tracer used when no tracing backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracer;

#[async_trait]
impl Tracer for NoopTracer {
    fn end_span(&self, _span: SpanHandle, _status: SpanStatus, _output: Value) {}

    fn is_enabled(&self) -> bool {
        false
    }
}
