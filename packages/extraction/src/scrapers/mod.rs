//! Scraper implementations.
//!
//! - [`FirecrawlScraper`] - FireCrawl hosted API (document loader style)
//! - [`Crawl4AiScraper`] - Crawl4AI server (crawler style)

pub mod crawl4ai;
pub mod firecrawl;

pub use crawl4ai::Crawl4AiScraper;
pub use firecrawl::FirecrawlScraper;
