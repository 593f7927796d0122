//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the extraction library
//! without making real scraping, model or tracing calls.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{CrawlError, CrawlResult, InferenceError, InferenceResult};
use crate::pipeline::prompts::{question_of, SAFETY_REFUSAL};
use crate::traits::{
    ai::ChatModel,
    scraper::Scraper,
    tracer::{SpanHandle, SpanStatus, Tracer},
};
use crate::types::{
    backend::ScraperBackend,
    model::ModelSelection,
    page::{CrawlOutput, Document, RawScrape},
};

/// A mock scraper for testing.
///
/// Returns a canned raw result for every URL, or fails every call.
pub struct MockScraper {
    backend: ScraperBackend,
    response: MockScrape,

    /// Simulated backend latency
    delay: Option<Duration>,

    /// URLs fetched, in order
    calls: Arc<RwLock<Vec<String>>>,
}

enum MockScrape {
    Raw(RawScrape),
    Fail(String),
}

impl MockScraper {
    /// Scraper that returns `raw` for every URL.
    pub fn new(backend: ScraperBackend, raw: RawScrape) -> Self {
        Self {
            backend,
            response: MockScrape::Raw(raw),
            delay: None,
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Document-loader style backend returning these page bodies.
    pub fn with_documents<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let docs = pages
            .into_iter()
            .enumerate()
            .map(|(i, body)| Document::new(format!("https://example.com/page-{}", i + 1), body))
            .collect();
        Self::new(ScraperBackend::FireCrawl, RawScrape::Documents(docs))
    }

    /// Crawler style backend returning this markdown (or none).
    pub fn with_markdown(markdown: Option<&str>) -> Self {
        let output = CrawlOutput::new("https://example.com", markdown.map(str::to_string));
        Self::new(ScraperBackend::Crawl4Ai, RawScrape::Crawl(Some(output)))
    }

    /// Scraper whose every call fails with a connection error.
    pub fn failing(backend: ScraperBackend, reason: impl Into<String>) -> Self {
        Self {
            backend,
            response: MockScrape::Fail(reason.into()),
            delay: None,
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Wait this long before answering each fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get all URLs fetched through this mock.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Shared handle to the call log, for use after the mock is moved.
    pub fn call_log(&self) -> Arc<RwLock<Vec<String>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl Scraper for MockScraper {
    async fn fetch(&self, url: &str) -> CrawlResult<RawScrape> {
        self.calls.write().unwrap().push(url.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.response {
            MockScrape::Raw(raw) => Ok(raw.clone()),
            MockScrape::Fail(reason) => Err(CrawlError::Connection(reason.clone())),
        }
    }

    fn backend(&self) -> ScraperBackend {
        self.backend
    }
}

/// How [`MockChatModel`] answers.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Always this text
    Canned(String),
    /// Always this error
    Fail(String),
    /// Follow the prompt's rules: refuse disallowed questions, otherwise
    /// return the canned text
    PromptCompliant(String),
}

/// Record of a call made to the mock model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockChatCall {
    pub model: String,
    pub provider: String,
    pub prompt: String,
}

/// A mock chat model for testing.
///
/// Providers listed with [`MockChatModel::with_providers`] are the only
/// ones it accepts; any other provider fails like an unknown one would.
pub struct MockChatModel {
    reply: MockReply,
    queued: Arc<RwLock<VecDeque<MockReply>>>,
    providers: Vec<String>,
    calls: Arc<RwLock<Vec<MockChatCall>>>,
}

/// Question fragments a prompt-compliant model refuses.
const REFUSAL_TRIGGERS: [&str; 6] = [
    "adult",
    "nsfw",
    "explicit",
    "gambling",
    "dark web",
    "trafficking",
];

impl MockChatModel {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            queued: Arc::new(RwLock::new(VecDeque::new())),
            providers: vec!["google_genai".to_string(), "nvidia".to_string()],
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Model that always answers `text`.
    pub fn canned(text: impl Into<String>) -> Self {
        Self::new(MockReply::Canned(text.into()))
    }

    /// Model whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockReply::Fail(message.into()))
    }

    /// Model that obeys the safety rules in the prompt.
    pub fn prompt_compliant(text: impl Into<String>) -> Self {
        Self::new(MockReply::PromptCompliant(text.into()))
    }

    /// Restrict the accepted provider ids.
    pub fn with_providers<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.providers = providers.into_iter().map(Into::into).collect();
        self
    }

    /// Queue a one-off reply, used before the default reply.
    pub fn then(self, reply: MockReply) -> Self {
        self.queued.write().unwrap().push_back(reply);
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockChatCall> {
        self.calls.read().unwrap().clone()
    }

    /// Shared handle to the call log, for use after the mock is moved.
    pub fn call_log(&self) -> Arc<RwLock<Vec<MockChatCall>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn complete(&self, selection: &ModelSelection, prompt: &str) -> InferenceResult<String> {
        self.calls.write().unwrap().push(MockChatCall {
            model: selection.model.clone(),
            provider: selection.provider.clone(),
            prompt: prompt.to_string(),
        });

        if !self.providers.contains(&selection.provider) {
            return Err(InferenceError::UnknownProvider(selection.provider.clone()));
        }

        let reply = self
            .queued
            .write()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.reply.clone());

        match reply {
            MockReply::Canned(text) => Ok(text),
            MockReply::Fail(message) => Err(InferenceError::Model(message)),
            MockReply::PromptCompliant(text) => {
                let question = question_of(prompt).unwrap_or_default().to_lowercase();
                if REFUSAL_TRIGGERS.iter().any(|t| question.contains(t)) {
                    Ok(SAFETY_REFUSAL.to_string())
                } else {
                    Ok(text)
                }
            }
        }
    }

    fn providers(&self) -> Vec<String> {
        self.providers.clone()
    }
}

/// A span captured by [`RecordingTracer`].
#[derive(Debug, Clone)]
pub struct RecordedSpan {
    pub span: SpanHandle,
    pub status: SpanStatus,
    pub output: Value,
}

/// A tracer that keeps every closed span in memory.
#[derive(Default, Clone)]
pub struct RecordingTracer {
    spans: Arc<RwLock<Vec<RecordedSpan>>>,
}

impl RecordingTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// All closed spans, in close order.
    pub fn spans(&self) -> Vec<RecordedSpan> {
        self.spans.read().unwrap().clone()
    }

    /// Closed spans with this name.
    pub fn spans_named(&self, name: &str) -> Vec<RecordedSpan> {
        self.spans()
            .into_iter()
            .filter(|s| s.span.name == name)
            .collect()
    }
}

#[async_trait]
impl Tracer for RecordingTracer {
    fn end_span(&self, span: SpanHandle, status: SpanStatus, output: Value) {
        self.spans.write().unwrap().push(RecordedSpan {
            span,
            status,
            output,
        });
    }
}
