//! Typed errors for the extraction library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. The `Display` text of the
//! user-facing variants is the exact message shown in the interface.

use thiserror::Error;

use crate::types::backend::ScraperBackend;

/// Errors raised by a scraping backend client.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Backend is selectable but has no credentials configured
    #[error("{0}")]
    NotConfigured(String),

    /// Could not reach the backend
    #[error("connection error: {0}")]
    Connection(String),

    /// Request timed out
    #[error("timeout scraping: {url}")]
    Timeout { url: String },

    /// Non-2xx response from the backend
    #[error("{service} API error: {status} - {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// Backend answered but reported the scrape as failed
    #[error("{0}")]
    Rejected(String),

    /// Any other HTTP-level failure
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CrawlError {
    /// Classify a transport error from `reqwest`.
    pub fn from_reqwest(url: &str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CrawlError::Timeout {
                url: url.to_string(),
            }
        } else if e.is_connect() {
            CrawlError::Connection(e.to_string())
        } else {
            CrawlError::Http(Box::new(e))
        }
    }
}

/// Errors surfaced by the scrape orchestrator.
///
/// Every variant is converted to a failure outcome at the orchestrator
/// boundary; none of them reach the presentation layer as an error.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Selector did not name a recognized (or registered) backend
    #[error("Invalid scraper selected.")]
    InvalidSelection,

    /// URL was empty
    #[error("Please enter a URL to scrape.")]
    MissingUrl,

    /// Backend finished without usable content
    #[error("{backend} completed but returned no content. The page might be empty or inaccessible.")]
    EmptyContent { backend: ScraperBackend },

    /// Backend call failed
    #[error("An error occurred while scraping with {backend}: {source}")]
    Backend {
        backend: ScraperBackend,
        #[source]
        source: CrawlError,
    },
}

/// Errors from parsing a combined "model (provider)" label.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LabelError {
    #[error("Invalid selection format: {label}")]
    InvalidFormat { label: String },
}

/// Errors from resolving or invoking a model.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Provider id is not in the registry
    #[error("Unknown model provider: {0}")]
    UnknownProvider(String),

    /// Provider is known but its API key was not supplied
    #[error("Model provider '{provider}' is not configured ({env_var} is not set)")]
    ProviderNotConfigured {
        provider: String,
        env_var: String,
    },

    /// Chat completion call failed
    #[error(transparent)]
    Client(#[from] openai_client::OpenAIError),

    /// Any other model failure (used by alternative `ChatModel` implementations)
    #[error("{0}")]
    Model(String),
}

/// Errors from the tracing collaborator. Never affect request outcomes.
#[derive(Debug, Error)]
pub enum TracerError {
    #[error("tracing HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("tracing ingestion rejected: {status} - {body}")]
    Rejected { status: u16, body: String },
}

/// Result type alias for crawl operations.
pub type CrawlResult<T> = std::result::Result<T, CrawlError>;

/// Result type alias for inference operations.
pub type InferenceResult<T> = std::result::Result<T, InferenceError>;
