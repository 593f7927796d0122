//! Chat model trait for LLM inference.
//!
//! Abstracts "send one prompt to this model at this provider, get text back".
//! Resolution of the (model, provider) pair into a concrete endpoint is the
//! implementation's job; an unknown or unconfigured provider must come back
//! as an [`InferenceError`](crate::error::InferenceError), never a panic.

use async_trait::async_trait;

use crate::error::InferenceResult;
use crate::types::model::ModelSelection;

/// A model client addressed by (model name, provider id).
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send `prompt` as a single user message and return the full reply.
    ///
    /// The reply is returned unfiltered, including empty text.
    async fn complete(&self, selection: &ModelSelection, prompt: &str) -> InferenceResult<String>;

    /// Provider ids this model client can route to.
    fn providers(&self) -> Vec<String> {
        Vec::new()
    }
}
