//! Langfuse tracer.
//!
//! Each closed span is sent to the Langfuse public ingestion API as one
//! batch holding a `trace-create` event and a `span-create` (or
//! `generation-create`) event. Sending happens on a tracked background task,
//! so closing a span never waits on the network and never fails the caller.
//! [`Tracer::flush`] waits for the tasks still in flight.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tokio_util::task::TaskTracker;
use uuid::Uuid;

use crate::error::TracerError;
use crate::traits::tracer::{SpanHandle, SpanKind, SpanStatus, Tracer};
use crate::types::config::LangfuseConfig;

/// Tracer that ships spans to Langfuse.
#[derive(Clone)]
pub struct LangfuseTracer {
    client: Client,
    config: LangfuseConfig,
    sends: TaskTracker,
}

impl LangfuseTracer {
    pub fn new(config: LangfuseConfig) -> Result<Self, TracerError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            config,
            sends: TaskTracker::new(),
        })
    }

    fn ingestion_url(&self) -> String {
        format!("{}/api/public/ingestion", self.config.host)
    }

    /// Send one closed span. Used by [`Tracer::end_span`] on a spawned task.
    pub async fn send_span(
        &self,
        span: &SpanHandle,
        status: SpanStatus,
        output: &Value,
        ended_at: DateTime<Utc>,
    ) -> Result<(), TracerError> {
        let batch = ingestion_batch(span, status, output, ended_at);

        let response = self
            .client
            .post(self.ingestion_url())
            .basic_auth(&self.config.public_key, Some(self.config.secret_key.expose()))
            .json(&batch)
            .send()
            .await?;

        // 207 is the normal answer: per-event results in the body
        let status_code = response.status();
        if !status_code.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TracerError::Rejected {
                status: status_code.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Tracer for LangfuseTracer {
    fn end_span(&self, span: SpanHandle, status: SpanStatus, output: Value) {
        let ended_at = Utc::now();

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(span = %span.name, "No async runtime; dropping Langfuse span");
            return;
        };

        let tracer = self.clone();
        runtime.spawn(self.sends.track_future(async move {
            if let Err(e) = tracer.send_span(&span, status, &output, ended_at).await {
                tracing::warn!(span = %span.name, error = %e, "Failed to send span to Langfuse");
            }
        }));
    }

    async fn flush(&self) {
        self.sends.close();
        self.sends.wait().await;
        self.sends.reopen();
        tracing::debug!("Langfuse spans flushed");
    }
}

/// Build the ingestion payload for one closed span.
pub fn ingestion_batch(
    span: &SpanHandle,
    status: SpanStatus,
    output: &Value,
    ended_at: DateTime<Utc>,
) -> Value {
    let level = match status {
        SpanStatus::Success => "DEFAULT",
        SpanStatus::Empty => "WARNING",
        SpanStatus::Error => "ERROR",
    };
    let status_message = output.get("error").and_then(Value::as_str);

    let trace = json!({
        "id": Uuid::new_v4().to_string(),
        "timestamp": ended_at.to_rfc3339(),
        "type": "trace-create",
        "body": {
            "id": span.trace_id.to_string(),
            "timestamp": span.started_at.to_rfc3339(),
            "name": span.name,
            "input": span.input,
            "output": output,
        }
    });

    let mut body = json!({
        "id": span.id.to_string(),
        "traceId": span.trace_id.to_string(),
        "name": span.name,
        "startTime": span.started_at.to_rfc3339(),
        "endTime": ended_at.to_rfc3339(),
        "input": span.input,
        "output": output,
        "level": level,
    });
    if let Some(message) = status_message {
        body["statusMessage"] = json!(message);
    }

    let event_type = match &span.kind {
        SpanKind::Span => "span-create",
        SpanKind::Generation { model, provider } => {
            body["model"] = json!(model);
            body["metadata"] = json!({ "provider": provider });
            "generation-create"
        }
    };

    let observation = json!({
        "id": Uuid::new_v4().to_string(),
        "timestamp": ended_at.to_rfc3339(),
        "type": event_type,
        "body": body,
    });

    json!({ "batch": [trace, observation] })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_batch_shape() {
        let span = SpanHandle::new(
            "web-scraping",
            SpanKind::Span,
            json!({"url": "https://example.com", "scraper": "Crawl4AI"}),
        );
        let batch = ingestion_batch(
            &span,
            SpanStatus::Success,
            &json!({"markdown_char_count": 42, "status": "Success"}),
            Utc::now(),
        );

        let events = batch["batch"].as_array().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["type"], "trace-create");
        assert_eq!(events[0]["body"]["id"], span.trace_id.to_string());
        assert_eq!(events[1]["type"], "span-create");
        assert_eq!(events[1]["body"]["traceId"], span.trace_id.to_string());
        assert_eq!(events[1]["body"]["level"], "DEFAULT");
        assert_eq!(events[1]["body"]["output"]["markdown_char_count"], 42);
        assert!(events[1]["body"].get("statusMessage").is_none());
    }

    #[test]
    fn test_generation_error_batch() {
        let span = SpanHandle::new(
            "llm-extraction",
            SpanKind::Generation {
                model: "gemini-2.5-pro".into(),
                provider: "google_genai".into(),
            },
            json!({}),
        );
        let batch = ingestion_batch(
            &span,
            SpanStatus::Error,
            &json!({"error": "quota exceeded", "status": "Error"}),
            Utc::now(),
        );

        let observation = &batch["batch"][1];
        assert_eq!(observation["type"], "generation-create");
        assert_eq!(observation["body"]["model"], "gemini-2.5-pro");
        assert_eq!(observation["body"]["metadata"]["provider"], "google_genai");
        assert_eq!(observation["body"]["level"], "ERROR");
        assert_eq!(observation["body"]["statusMessage"], "quota exceeded");
    }
}
