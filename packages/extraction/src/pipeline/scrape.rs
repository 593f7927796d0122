//! Scrape orchestration: backend selection, normalization, tracing.

use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{CrawlResult, ScrapeError};
use crate::scrapers::{Crawl4AiScraper, FirecrawlScraper};
use crate::traits::scraper::Scraper;
use crate::traits::tracer::{NoopTracer, SpanKind, SpanStatus, Tracer};
use crate::types::{
    backend::ScraperBackend,
    config::ScraperConfig,
    outcome::ScrapeOutcome,
    page::{markdown_from_documents, RawScrape},
};

/// Span name for scrape calls.
pub const SCRAPE_SPAN: &str = "web-scraping";

/// Dispatches scrape requests to the registered backend and normalizes the
/// result to one markdown string.
///
/// Holds no per-request state; one instance serves concurrent requests.
#[derive(Clone)]
pub struct ScrapeOrchestrator {
    scrapers: HashMap<ScraperBackend, Arc<dyn Scraper>>,
    tracer: Arc<dyn Tracer>,
}

impl ScrapeOrchestrator {
    /// Empty orchestrator; every backend is unregistered.
    pub fn new(tracer: Arc<dyn Tracer>) -> Self {
        Self {
            scrapers: HashMap::new(),
            tracer,
        }
    }

    /// Orchestrator with both HTTP backends built from `config`.
    pub fn from_config(config: &ScraperConfig, tracer: Arc<dyn Tracer>) -> CrawlResult<Self> {
        Ok(Self::new(tracer)
            .with_scraper(Arc::new(FirecrawlScraper::from_config(config)?))
            .with_scraper(Arc::new(Crawl4AiScraper::from_config(config)?)))
    }

    /// Register `scraper` under its own backend, replacing any previous one.
    pub fn with_scraper(mut self, scraper: Arc<dyn Scraper>) -> Self {
        self.scrapers.insert(scraper.backend(), scraper);
        self
    }

    /// Backends that have a scraper registered.
    pub fn backends(&self) -> Vec<ScraperBackend> {
        ScraperBackend::ALL
            .into_iter()
            .filter(|b| self.scrapers.contains_key(b))
            .collect()
    }

    /// Scrape using a selector label or id. Unknown selectors fail without
    /// touching any backend.
    pub async fn scrape_with_selector(&self, url: &str, selector: &str) -> ScrapeOutcome {
        match selector.parse::<ScraperBackend>() {
            Ok(backend) => self.scrape(url, backend).await,
            Err(e) => failure_outcome(e),
        }
    }

    /// Scrape `url` with `backend`. Never fails: every error becomes a
    /// failure outcome.
    pub async fn scrape(&self, url: &str, backend: ScraperBackend) -> ScrapeOutcome {
        match self.try_scrape(url, backend).await {
            Ok(markdown) => ScrapeOutcome::success(markdown),
            Err(e) => failure_outcome(e),
        }
    }

    /// Scrape with typed errors.
    pub async fn try_scrape(&self, url: &str, backend: ScraperBackend) -> Result<String, ScrapeError> {
        if url.trim().is_empty() {
            return Err(ScrapeError::MissingUrl);
        }
        let scraper = self
            .scrapers
            .get(&backend)
            .ok_or(ScrapeError::InvalidSelection)?;

        let span = self.tracer.start_span(
            SCRAPE_SPAN,
            SpanKind::Span,
            json!({ "url": url, "scraper": backend.label() }),
        );
        let start = Instant::now();

        let result = scraper
            .fetch(url)
            .await
            .map_err(|source| ScrapeError::Backend { backend, source })
            .and_then(|raw| normalize(backend, raw));

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(markdown) => {
                let chars = markdown.chars().count();
                tracing::info!(url = %url, scraper = %backend, chars, duration_ms, "Scrape succeeded");
                self.tracer.end_span(
                    span,
                    SpanStatus::Success,
                    json!({ "markdown_char_count": chars, "status": SpanStatus::Success.as_str() }),
                );
            }
            Err(ScrapeError::EmptyContent { .. }) => {
                tracing::warn!(url = %url, scraper = %backend, duration_ms, "Scrape returned no content");
                self.tracer.end_span(
                    span,
                    SpanStatus::Empty,
                    json!({ "markdown_char_count": 0, "status": SpanStatus::Empty.as_str() }),
                );
            }
            Err(e) => {
                tracing::warn!(url = %url, scraper = %backend, duration_ms, error = %e, "Scrape failed");
                self.tracer.end_span(
                    span,
                    SpanStatus::Error,
                    json!({ "error": e.to_string(), "status": SpanStatus::Error.as_str() }),
                );
            }
        }

        result
    }
}

impl Default for ScrapeOrchestrator {
    fn default() -> Self {
        Self::new(Arc::new(NoopTracer))
    }
}

/// Turn raw backend output into the success payload.
pub fn normalize(backend: ScraperBackend, raw: RawScrape) -> Result<String, ScrapeError> {
    let markdown = match raw {
        RawScrape::Documents(docs) if docs.is_empty() => None,
        RawScrape::Documents(docs) => Some(markdown_from_documents(&docs)),
        RawScrape::Crawl(output) => output
            .and_then(|o| o.markdown)
            .filter(|m| !m.is_empty()),
    };

    markdown.ok_or(ScrapeError::EmptyContent { backend })
}

fn failure_outcome(e: ScrapeError) -> ScrapeOutcome {
    ScrapeOutcome::failure(e.to_string())
}
