//! Scraper trait for pluggable scraping backends.
//!
//! A scraper fetches a URL through some external service and returns that
//! service's raw output. Turning the raw output into a single markdown
//! string (and deciding what counts as "no content") is done by the
//! [`ScrapeOrchestrator`](crate::pipeline::scrape::ScrapeOrchestrator), so
//! implementations stay thin wrappers over their APIs.

use async_trait::async_trait;

use crate::error::CrawlResult;
use crate::types::{backend::ScraperBackend, page::RawScrape};

#[async_trait]
pub trait Scraper: Send + Sync {
    /// Fetch `url` once. No retries.
    async fn fetch(&self, url: &str) -> CrawlResult<RawScrape>;

    /// Which backend this scraper implements.
    fn backend(&self) -> ScraperBackend;
}
