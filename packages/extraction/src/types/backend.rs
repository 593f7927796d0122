//! Scraper backend selector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScrapeError;

/// The closed set of scraping backends.
///
/// Adding a backend means adding a variant here and registering a
/// [`Scraper`](crate::traits::scraper::Scraper) for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScraperBackend {
    /// Hosted FireCrawl API (document-loader style, zero or more pages)
    FireCrawl,
    /// Crawl4AI server (crawler style, at most one result)
    Crawl4Ai,
}

impl ScraperBackend {
    /// All backends, in the order the interface lists them.
    pub const ALL: [ScraperBackend; 2] = [ScraperBackend::Crawl4Ai, ScraperBackend::FireCrawl];

    /// Human-readable backend name, used inside messages.
    pub fn name(&self) -> &'static str {
        match self {
            ScraperBackend::FireCrawl => "FireCrawl",
            ScraperBackend::Crawl4Ai => "Crawl4AI",
        }
    }

    /// Selector label shown in the interface dropdown.
    pub fn label(&self) -> &'static str {
        match self {
            ScraperBackend::FireCrawl => "Scrape with FireCrawl",
            ScraperBackend::Crawl4Ai => "Scrape with Crawl4AI",
        }
    }

    /// Short machine id.
    pub fn id(&self) -> &'static str {
        match self {
            ScraperBackend::FireCrawl => "firecrawl",
            ScraperBackend::Crawl4Ai => "crawl4ai",
        }
    }
}

impl Default for ScraperBackend {
    fn default() -> Self {
        ScraperBackend::Crawl4Ai
    }
}

impl fmt::Display for ScraperBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScraperBackend {
    type Err = ScrapeError;

    /// Accepts the dropdown label or the short id, nothing else.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ScraperBackend::ALL
            .into_iter()
            .find(|b| s == b.label() || s.eq_ignore_ascii_case(b.id()))
            .ok_or(ScrapeError::InvalidSelection)
    }
}
