//! Page types - what the scraping backends hand back before normalization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One scraped page from a document-loader style backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Source URL of the page
    pub url: String,

    /// Page content (markdown)
    pub page_content: String,

    /// Page title if available
    pub title: Option<String>,

    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,

    /// Backend-specific metadata
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Document {
    pub fn new(url: impl Into<String>, page_content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            page_content: page_content.into(),
            title: None,
            fetched_at: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// Set the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add a metadata key-value pair.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// The single result of a crawler style backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlOutput {
    pub url: String,

    /// Generated markdown; `None` when the crawler produced none
    pub markdown: Option<String>,
}

impl CrawlOutput {
    pub fn new(url: impl Into<String>, markdown: Option<String>) -> Self {
        Self {
            url: url.into(),
            markdown,
        }
    }
}

/// Raw backend output, prior to normalization into one markdown string.
#[derive(Debug, Clone, PartialEq)]
pub enum RawScrape {
    /// Zero or more pages, in backend order
    Documents(Vec<Document>),
    /// At most one crawl result
    Crawl(Option<CrawlOutput>),
}

/// Horizontal rule placed after every page.
pub const PAGE_SEPARATOR: &str = "--------------";

/// Concatenate documents under `### Page N` headings, each followed by a rule.
pub fn markdown_from_documents(docs: &[Document]) -> String {
    let mut markdown = String::new();
    for (i, doc) in docs.iter().enumerate() {
        markdown.push_str(&format!("### Page {}\n", i + 1));
        markdown.push_str(&doc.page_content);
        markdown.push_str("\n\n");
        markdown.push_str(PAGE_SEPARATOR);
        markdown.push_str("\n\n");
    }
    markdown
}
