//! Configuration types for scraper backends, model providers and tracing.
//!
//! These are plain values. The application decides where they come from
//! (environment, files); the library never reads configuration on its own.

use std::fmt;
use std::time::Duration;

use crate::security::SecretString;
use crate::types::model::{GOOGLE_GENAI, NVIDIA};

/// FireCrawl hosted API.
pub const DEFAULT_FIRECRAWL_API_URL: &str = "https://api.firecrawl.dev/v1";

/// Crawl4AI server started from its Docker image.
pub const DEFAULT_CRAWL4AI_URL: &str = "http://localhost:11235";

/// Gemini's OpenAI-compatible endpoint.
pub const GOOGLE_GENAI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// NVIDIA NIM endpoint.
pub const NVIDIA_BASE_URL: &str = "https://integrate.api.nvidia.com/v1";

/// Langfuse cloud.
pub const DEFAULT_LANGFUSE_HOST: &str = "https://cloud.langfuse.com";

/// Settings for the scraping backends.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// FireCrawl API key. Without it the FireCrawl backend reports a
    /// configuration error when selected.
    pub firecrawl_api_key: Option<SecretString>,

    /// FireCrawl API base URL.
    pub firecrawl_api_url: String,

    /// Crawl4AI server base URL.
    pub crawl4ai_base_url: String,

    /// Optional bearer token for a secured Crawl4AI server.
    pub crawl4ai_api_token: Option<SecretString>,

    /// Whole-request timeout for either backend.
    pub timeout: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            firecrawl_api_key: None,
            firecrawl_api_url: DEFAULT_FIRECRAWL_API_URL.to_string(),
            crawl4ai_base_url: DEFAULT_CRAWL4AI_URL.to_string(),
            crawl4ai_api_token: None,
            timeout: Duration::from_secs(120),
        }
    }
}

/// One inference provider reachable through an OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Provider id as it appears in "model (provider)" labels
    pub id: String,

    /// Chat completions base URL
    pub base_url: String,

    /// Environment variable the key is read from (for error messages)
    pub api_key_env: String,

    /// API key; `None` leaves the provider registered but unusable
    pub api_key: Option<SecretString>,
}

impl ProviderConfig {
    pub fn new(
        id: impl Into<String>,
        base_url: impl Into<String>,
        api_key_env: impl Into<String>,
        api_key: Option<SecretString>,
    ) -> Self {
        Self {
            id: id.into(),
            base_url: base_url.into(),
            api_key_env: api_key_env.into(),
            api_key,
        }
    }

    /// Google Gemini via its OpenAI-compatible endpoint.
    pub fn google_genai(api_key: Option<SecretString>) -> Self {
        Self::new(GOOGLE_GENAI, GOOGLE_GENAI_BASE_URL, "GOOGLE_API_KEY", api_key)
    }

    /// NVIDIA NIM.
    pub fn nvidia(api_key: Option<SecretString>) -> Self {
        Self::new(NVIDIA, NVIDIA_BASE_URL, "NVIDIA_API_KEY", api_key)
    }

    /// Point at a different base URL (proxies, self-hosted NIM, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("id", &self.id)
            .field("base_url", &self.base_url)
            .field("api_key_env", &self.api_key_env)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Langfuse project credentials.
#[derive(Debug, Clone)]
pub struct LangfuseConfig {
    pub public_key: String,
    pub secret_key: SecretString,
    pub host: String,
}

impl LangfuseConfig {
    pub fn new(
        public_key: impl Into<String>,
        secret_key: impl Into<SecretString>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            public_key: public_key.into(),
            secret_key: secret_key.into(),
            host: host.into().trim_end_matches('/').to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_debug_redacts_key() {
        let cfg = ProviderConfig::nvidia(Some(SecretString::new("nvapi-secret")));
        let debug = format!("{:?}", cfg);
        assert!(debug.contains("nvidia"));
        assert!(!debug.contains("nvapi-secret"));
    }

    #[test]
    fn test_langfuse_host_is_normalized() {
        let cfg = LangfuseConfig::new("pk", "sk", "https://langfuse.example.com/");
        assert_eq!(cfg.host, "https://langfuse.example.com");
    }
}
