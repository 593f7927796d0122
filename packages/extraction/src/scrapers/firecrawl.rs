//! FireCrawl-based scraper.
//!
//! Uses the FireCrawl API in single-page scrape mode, which handles
//! JavaScript rendering and anti-bot protection and returns markdown.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{CrawlError, CrawlResult};
use crate::security::SecretString;
use crate::traits::scraper::Scraper;
use crate::types::{
    backend::ScraperBackend,
    config::{ScraperConfig, DEFAULT_FIRECRAWL_API_URL},
    page::{Document, RawScrape},
};

/// Document-loader style scraper backed by the FireCrawl API.
///
/// # Example
///
/// ```rust,ignore
/// use extraction::scrapers::FirecrawlScraper;
///
/// let scraper = FirecrawlScraper::new(Some(api_key), Duration::from_secs(120))?;
/// let docs = scraper.load("https://example.com").await?;
/// ```
pub struct FirecrawlScraper {
    client: Client,
    api_key: Option<SecretString>,
    base_url: String,
}

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'static str; 1],
}

#[derive(Deserialize)]
struct ScrapeResponse {
    success: bool,
    data: Option<ScrapeData>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct ScrapeData {
    markdown: Option<String>,
    metadata: Option<PageMetadata>,
}

#[derive(Deserialize)]
struct PageMetadata {
    title: Option<String>,
    #[serde(rename = "sourceURL")]
    source_url: Option<String>,
    #[serde(rename = "statusCode")]
    status_code: Option<u16>,
}

impl FirecrawlScraper {
    /// Create a scraper. A missing key is reported on first use, not here.
    pub fn new(api_key: Option<SecretString>, timeout: std::time::Duration) -> CrawlResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CrawlError::Http(Box::new(e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_FIRECRAWL_API_URL.to_string(),
        })
    }

    /// Create from scraper settings.
    pub fn from_config(config: &ScraperConfig) -> CrawlResult<Self> {
        Ok(Self::new(config.firecrawl_api_key.clone(), config.timeout)?
            .with_base_url(&config.firecrawl_api_url))
    }

    /// Set the API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Scrape `url` and return its pages, in the order FireCrawl returned them.
    ///
    /// Pages whose markdown is missing or blank are dropped, so an empty
    /// vector means FireCrawl produced nothing usable.
    pub async fn load(&self, url: &str) -> CrawlResult<Vec<Document>> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            CrawlError::NotConfigured("FIRECRAWL_API_KEY is not set".to_string())
        })?;

        let request = ScrapeRequest {
            url,
            formats: ["markdown"],
        };

        let response = self
            .client
            .post(format!("{}/scrape", self.base_url))
            .bearer_auth(api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| CrawlError::from_reqwest(url, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CrawlError::Api {
                service: "Firecrawl",
                status: status.as_u16(),
                body: text,
            });
        }

        let response: ScrapeResponse = response
            .json()
            .await
            .map_err(|e| CrawlError::Http(Box::new(e)))?;

        if !response.success {
            return Err(CrawlError::Rejected(
                response
                    .error
                    .unwrap_or_else(|| "Firecrawl scrape failed".to_string()),
            ));
        }

        let pages: Vec<Document> = response
            .data
            .into_iter()
            .map(|data| page_data_to_document(url, data))
            .collect();

        tracing::debug!(url = %url, pages = pages.len(), "Firecrawl scrape completed");

        Ok(pages)
    }
}

/// Convert FireCrawl page data to a Document. Pages without markdown are
/// kept with empty content.
fn page_data_to_document(requested_url: &str, data: ScrapeData) -> Document {
    let markdown = data.markdown.unwrap_or_default();

    let source_url = data
        .metadata
        .as_ref()
        .and_then(|m| m.source_url.clone())
        .unwrap_or_else(|| requested_url.to_string());

    let mut doc = Document::new(source_url, markdown).with_metadata("source", "firecrawl");

    if let Some(meta) = data.metadata {
        if let Some(status) = meta.status_code {
            doc = doc.with_metadata("status_code", status.to_string());
        }
        if let Some(title) = meta.title {
            doc = doc.with_title(title);
        }
    }

    doc
}

#[async_trait]
impl Scraper for FirecrawlScraper {
    async fn fetch(&self, url: &str) -> CrawlResult<RawScrape> {
        self.load(url).await.map(RawScrape::Documents)
    }

    fn backend(&self) -> ScraperBackend {
        ScraperBackend::FireCrawl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(markdown: Option<&str>, title: Option<&str>) -> ScrapeData {
        ScrapeData {
            markdown: markdown.map(String::from),
            metadata: Some(PageMetadata {
                title: title.map(String::from),
                source_url: Some("https://example.com/final".to_string()),
                status_code: Some(200),
            }),
        }
    }

    #[test]
    fn test_page_data_keeps_markdown_and_title() {
        let doc = page_data_to_document("https://example.com", data(Some("# Hi"), Some("Hi")));
        assert_eq!(doc.page_content, "# Hi");
        assert_eq!(doc.url, "https://example.com/final");
        assert_eq!(doc.title.as_deref(), Some("Hi"));
        assert_eq!(doc.metadata.get("source").map(String::as_str), Some("firecrawl"));
    }

    #[test]
    fn test_blank_pages_are_kept() {
        let blank = page_data_to_document("https://example.com", data(Some("  \n"), None));
        assert_eq!(blank.page_content, "  \n");

        let missing = page_data_to_document("https://example.com", data(None, None));
        assert_eq!(missing.page_content, "");
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let scraper = FirecrawlScraper::new(None, std::time::Duration::from_secs(5)).unwrap();
        let err = scraper.load("https://example.com").await.unwrap_err();
        assert!(matches!(err, CrawlError::NotConfigured(_)));
        assert_eq!(err.to_string(), "FIRECRAWL_API_KEY is not set");
    }
}
