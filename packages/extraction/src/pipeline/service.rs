//! The two operations exposed to any front end: scrape and extract.

use std::sync::Arc;

use crate::ai::ProviderRouter;
use crate::error::{CrawlError, InferenceError};
use crate::pipeline::inference::InferenceDispatcher;
use crate::pipeline::prompts::{build_prompt, PreparedPrompt};
use crate::pipeline::scrape::ScrapeOrchestrator;
use crate::traits::tracer::Tracer;
use crate::types::{
    backend::ScraperBackend,
    config::{ProviderConfig, ScraperConfig},
    model::parse_model_provider,
    outcome::{ExtractionOutcome, Outcome, ScrapeOutcome, NO_INFORMATION_EXTRACTED},
};

/// Everything needed to build an [`ExtractionService`] from configuration.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub scrapers: ScraperConfig,
    pub providers: Vec<ProviderConfig>,
    pub inference_timeout: Option<std::time::Duration>,
}

/// Errors that can stop an [`ExtractionService`] from being built.
#[derive(Debug, thiserror::Error)]
pub enum ServiceBuildError {
    #[error("failed to build scrapers: {0}")]
    Scrapers(#[from] CrawlError),

    #[error("failed to build model providers: {0}")]
    Providers(#[from] InferenceError),
}

/// Scrape-then-extract service. Cheap to clone, safe to share.
///
/// # Example
///
/// ```rust,ignore
/// let service = ExtractionService::new(orchestrator, dispatcher);
///
/// let page = service.scrape("https://shop.example.com/cat-food", "Scrape with Crawl4AI").await;
/// if let Some(markdown) = page.text() {
///     let answer = service
///         .extract("Find product name and price", markdown, "gemini-2.5-flash (google_genai)")
///         .await;
///     println!("{}", answer.display());
/// }
/// ```
#[derive(Clone)]
pub struct ExtractionService {
    scraper: ScrapeOrchestrator,
    dispatcher: InferenceDispatcher,
}

impl ExtractionService {
    pub fn new(scraper: ScrapeOrchestrator, dispatcher: InferenceDispatcher) -> Self {
        Self {
            scraper,
            dispatcher,
        }
    }

    /// Build the production service: HTTP scrapers plus the provider router.
    pub fn from_config(
        config: &ServiceConfig,
        tracer: Arc<dyn Tracer>,
    ) -> Result<Self, ServiceBuildError> {
        let scraper = ScrapeOrchestrator::from_config(&config.scrapers, tracer.clone())?;

        let mut router = ProviderRouter::builder();
        if let Some(timeout) = config.inference_timeout {
            router = router.timeout(timeout);
        }
        for provider in &config.providers {
            router = router.provider(provider.clone());
        }
        let dispatcher = InferenceDispatcher::new(Arc::new(router.build()?), tracer);

        Ok(Self::new(scraper, dispatcher))
    }

    /// Backends available for scraping.
    pub fn backends(&self) -> Vec<ScraperBackend> {
        self.scraper.backends()
    }

    /// Provider ids available for extraction.
    pub fn providers(&self) -> Vec<String> {
        self.dispatcher.providers()
    }

    /// Scrape `url` with the backend named by `selector`.
    pub async fn scrape(&self, url: &str, selector: &str) -> ScrapeOutcome {
        self.scraper.scrape_with_selector(url, selector).await
    }

    /// Answer `query` from `source_text` with the model named by `label`.
    ///
    /// The label is validated before anything else. Empty source text is
    /// answered without a model call, and a blank model reply becomes the
    /// "nothing extracted" failure.
    pub async fn extract(&self, query: &str, source_text: &str, label: &str) -> ExtractionOutcome {
        let selection = match parse_model_provider(label) {
            Ok(selection) => selection,
            Err(e) => return Outcome::failure(e.to_string()),
        };

        let prompt = match build_prompt(query, source_text) {
            PreparedPrompt::Answered(text) => return Outcome::success(text),
            PreparedPrompt::Dispatch(prompt) => prompt,
        };

        remap_empty(self.dispatcher.invoke(&prompt, &selection).await)
    }
}

/// Rewrite a blank success into the fixed "nothing extracted" failure.
pub fn remap_empty(outcome: ExtractionOutcome) -> ExtractionOutcome {
    match outcome {
        Outcome::Success { text } if text.trim().is_empty() => {
            Outcome::failure(NO_INFORMATION_EXTRACTED)
        }
        other => other,
    }
}
