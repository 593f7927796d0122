//! Scrape-then-extract library.
//!
//! Fetches a web page through one of two scraping backends, normalizes the
//! result to markdown, and answers a natural-language question about that
//! markdown with a single LLM call.
//!
//! # Design Philosophy
//!
//! - Every request ends in an explicit [`Outcome`], never an error
//! - One scrape, one prompt, one model call: no retries, no caching
//! - Tracing is optional and never changes a result
//!
//! # Usage
//!
//! ```rust,ignore
//! use extraction::{build_tracer, ExtractionService, ServiceConfig};
//!
//! let tracer = build_tracer(None);
//! let service = ExtractionService::from_config(&ServiceConfig::default(), tracer)?;
//!
//! let page = service.scrape("https://shop.example.com", "Scrape with Crawl4AI").await;
//! let answer = service
//!     .extract("List products with prices", page.text().unwrap_or(""), "gemini-2.5-flash (google_genai)")
//!     .await;
//! println!("{}", answer.display());
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Seams to external collaborators (Scraper, ChatModel, Tracer)
//! - [`types`] - Backends, model labels, outcomes, configuration
//! - [`scrapers`] - FireCrawl and Crawl4AI HTTP clients
//! - [`ai`] - Provider routing over OpenAI-compatible endpoints
//! - [`pipeline`] - Scrape orchestration, prompt building, inference dispatch
//! - [`observability`] - Langfuse tracer
//! - [`security`] - Credential handling
//! - [`testing`] - Mock implementations for testing

pub mod ai;
pub mod error;
pub mod observability;
pub mod pipeline;
pub mod scrapers;
pub mod security;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{CrawlError, InferenceError, LabelError, ScrapeError, TracerError};
pub use traits::{
    ai::ChatModel,
    scraper::Scraper,
    tracer::{NoopTracer, SpanHandle, SpanKind, SpanStatus, Tracer},
};
pub use types::{
    backend::ScraperBackend,
    config::{LangfuseConfig, ProviderConfig, ScraperConfig},
    model::{parse_model_provider, ModelSelection, DEFAULT_MODEL_LABEL, MODEL_CATALOG},
    outcome::{
        render_failure, ExtractionOutcome, Outcome, ScrapeOutcome, FAILURE_MARKER,
        GENERATING_IN_PROGRESS, NO_INFORMATION_EXTRACTED, NO_RELEVANT_INFORMATION,
        SCRAPING_IN_PROGRESS,
    },
    page::{CrawlOutput, Document, RawScrape},
};

// Re-export pipeline components
pub use pipeline::{
    build_prompt, ExtractionService, InferenceDispatcher, PreparedPrompt, ScrapeOrchestrator,
    ServiceBuildError, ServiceConfig, PROMPT_VERSION, SAFETY_REFUSAL,
};

pub use ai::ProviderRouter;
pub use observability::{build_tracer, LangfuseTracer};
pub use scrapers::{Crawl4AiScraper, FirecrawlScraper};
pub use security::SecretString;

// Re-export testing utilities
pub use testing::{MockChatModel, MockReply, MockScraper, RecordingTracer};
