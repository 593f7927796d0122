//! Inference dispatch: one prompt, one model call, one outcome.

use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

use crate::pipeline::prompts::PROMPT_VERSION;
use crate::traits::ai::ChatModel;
use crate::traits::tracer::{SpanKind, SpanStatus, Tracer};
use crate::types::{model::ModelSelection, outcome::ExtractionOutcome};

/// Span name for inference calls.
pub const INFERENCE_SPAN: &str = "llm-extraction";

/// Sends built prompts to the selected model.
#[derive(Clone)]
pub struct InferenceDispatcher {
    model: Arc<dyn ChatModel>,
    tracer: Arc<dyn Tracer>,
}

impl InferenceDispatcher {
    pub fn new(model: Arc<dyn ChatModel>, tracer: Arc<dyn Tracer>) -> Self {
        Self { model, tracer }
    }

    /// Provider ids the underlying model client can route to.
    pub fn providers(&self) -> Vec<String> {
        self.model.providers()
    }

    /// Invoke the model. Errors become failure outcomes; the reply text is
    /// returned as-is, even when empty.
    pub async fn invoke(&self, prompt: &str, selection: &ModelSelection) -> ExtractionOutcome {
        let span = self.tracer.start_span(
            INFERENCE_SPAN,
            SpanKind::Generation {
                model: selection.model.clone(),
                provider: selection.provider.clone(),
            },
            json!({
                "model": selection.model,
                "provider": selection.provider,
                "prompt_char_count": prompt.chars().count(),
                "prompt_version": PROMPT_VERSION,
            }),
        );
        let start = Instant::now();

        let result = self.model.complete(selection, prompt).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(text) => {
                let chars = text.chars().count();
                tracing::info!(
                    model = %selection.model,
                    provider = %selection.provider,
                    chars,
                    duration_ms,
                    "LLM extraction completed"
                );
                self.tracer.end_span(
                    span,
                    SpanStatus::Success,
                    json!({ "response_char_count": chars, "status": SpanStatus::Success.as_str() }),
                );
                ExtractionOutcome::success(text)
            }
            Err(e) => {
                tracing::warn!(
                    model = %selection.model,
                    provider = %selection.provider,
                    duration_ms,
                    error = %e,
                    "LLM extraction failed"
                );
                self.tracer.end_span(
                    span,
                    SpanStatus::Error,
                    json!({ "error": e.to_string(), "status": SpanStatus::Error.as_str() }),
                );
                ExtractionOutcome::failure(format!("An error occurred during LLM extraction: {}", e))
            }
        }
    }
}
