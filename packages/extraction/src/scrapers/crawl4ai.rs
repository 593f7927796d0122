//! Crawl4AI-based scraper.
//!
//! Talks to a Crawl4AI server (the project's Docker image) over its REST
//! API. The server drives a headless browser and returns generated markdown.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{CrawlError, CrawlResult};
use crate::security::SecretString;
use crate::traits::scraper::Scraper;
use crate::types::{
    backend::ScraperBackend,
    config::ScraperConfig,
    page::{CrawlOutput, RawScrape},
};

/// Crawler style scraper backed by a Crawl4AI server.
pub struct Crawl4AiScraper {
    client: Client,
    base_url: String,
    api_token: Option<SecretString>,
}

#[derive(Serialize)]
struct CrawlRequest<'a> {
    urls: [&'a str; 1],
    browser_config: Value,
    crawler_config: Value,
}

#[derive(Deserialize)]
struct CrawlResponse {
    #[serde(default = "default_true")]
    success: bool,
    #[serde(default)]
    results: Vec<CrawlResultData>,
}

#[derive(Deserialize)]
struct CrawlResultData {
    #[serde(default)]
    url: String,
    #[serde(default = "default_true")]
    success: bool,
    markdown: Option<MarkdownField>,
    error_message: Option<String>,
}

/// Older servers return the markdown as a string, newer ones as an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum MarkdownField {
    Plain(String),
    Generated { raw_markdown: Option<String> },
}

impl MarkdownField {
    fn into_text(self) -> Option<String> {
        match self {
            MarkdownField::Plain(s) => Some(s),
            MarkdownField::Generated { raw_markdown } => raw_markdown,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Crawl4AiScraper {
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> CrawlResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CrawlError::Http(Box::new(e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: None,
        })
    }

    /// Create from scraper settings.
    pub fn from_config(config: &ScraperConfig) -> CrawlResult<Self> {
        let mut scraper = Self::new(&config.crawl4ai_base_url, config.timeout)?;
        scraper.api_token = config.crawl4ai_api_token.clone();
        Ok(scraper)
    }

    /// Set the bearer token for a secured server.
    pub fn with_api_token(mut self, token: impl Into<SecretString>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Crawl `url` once. Returns `None` when the server produced no result.
    pub async fn crawl(&self, url: &str) -> CrawlResult<Option<CrawlOutput>> {
        let request = CrawlRequest {
            urls: [url],
            browser_config: json!({ "type": "BrowserConfig", "params": { "headless": true } }),
            crawler_config: json!({ "type": "CrawlerRunConfig", "params": { "cache_mode": "bypass" } }),
        };

        let mut builder = self
            .client
            .post(format!("{}/crawl", self.base_url))
            .json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token.expose());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| CrawlError::from_reqwest(url, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CrawlError::Api {
                service: "Crawl4AI",
                status: status.as_u16(),
                body: text,
            });
        }

        let response: CrawlResponse = response
            .json()
            .await
            .map_err(|e| CrawlError::Http(Box::new(e)))?;

        if !response.success {
            return Err(CrawlError::Rejected("Crawl4AI request failed".to_string()));
        }

        let Some(result) = response.results.into_iter().next() else {
            return Ok(None);
        };

        if !result.success {
            if let Some(message) = result.error_message.filter(|m| !m.trim().is_empty()) {
                return Err(CrawlError::Rejected(message));
            }
        }

        let result_url = if result.url.is_empty() {
            url.to_string()
        } else {
            result.url
        };

        tracing::debug!(url = %result_url, "Crawl4AI crawl completed");

        Ok(Some(CrawlOutput::new(
            result_url,
            result.markdown.and_then(MarkdownField::into_text),
        )))
    }
}

#[async_trait]
impl Scraper for Crawl4AiScraper {
    async fn fetch(&self, url: &str) -> CrawlResult<RawScrape> {
        self.crawl(url).await.map(RawScrape::Crawl)
    }

    fn backend(&self) -> ScraperBackend {
        ScraperBackend::Crawl4Ai
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_field_shapes() {
        let plain: CrawlResultData =
            serde_json::from_str(r##"{"url":"u","markdown":"# A"}"##).unwrap();
        assert_eq!(plain.markdown.and_then(MarkdownField::into_text).as_deref(), Some("# A"));

        let generated: CrawlResultData = serde_json::from_str(
            r##"{"url":"u","markdown":{"raw_markdown":"# B","markdown_with_citations":"# B [1]"}}"##,
        )
        .unwrap();
        assert_eq!(
            generated.markdown.and_then(MarkdownField::into_text).as_deref(),
            Some("# B")
        );

        let missing: CrawlResultData = serde_json::from_str(r#"{"url":"u"}"#).unwrap();
        assert!(missing.markdown.is_none());
        assert!(missing.success);
    }
}
