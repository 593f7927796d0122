//! Minimal client for OpenAI-compatible chat completion APIs.
//!
//! Many inference providers (Google's Gemini API, NVIDIA NIM, OpenAI itself)
//! expose the same `/chat/completions` surface. This client speaks that surface
//! against any base URL and carries no provider-specific logic.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{OpenAIClient, ChatRequest, Message};
//!
//! let client = OpenAIClient::new(api_key)
//!     .with_base_url("https://integrate.api.nvidia.com/v1");
//!
//! let response = client
//!     .chat_completion(ChatRequest::new("deepseek-ai/deepseek-v3.1").message(Message::user("Hello!")))
//!     .await?;
//! ```

pub mod error;
pub mod types;

pub use error::{OpenAIError, Result};
pub use types::{ChatRequest, ChatResponse, Message, Usage};

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

/// Default base URL (OpenAI).
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat completion client for one OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Set a custom base URL (Gemini, NVIDIA NIM, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Apply a whole-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OpenAIError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a single user prompt and return the reply text.
    pub async fn complete(&self, model: &str, prompt: &str) -> Result<String> {
        let request = ChatRequest::new(model).message(Message::user(prompt));
        Ok(self.chat_completion(request).await?.content)
    }

    /// Chat completion.
    ///
    /// Sends the request and awaits the full response; streaming is never requested.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, base_url = %self.base_url, "Chat completion request failed");
                OpenAIError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Chat completion API error");
            return Err(OpenAIError::Api {
                status: status.as_u16(),
                message: types::error_message(&error_text),
            });
        }

        let chat_response: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or(OpenAIError::EmptyChoices)?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            response_chars = content.chars().count(),
            "Chat completion"
        );

        Ok(ChatResponse {
            content,
            model: chat_response.model,
            usage: chat_response.usage,
        })
    }
}
