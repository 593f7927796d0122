use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use extraction::types::config::{
    DEFAULT_CRAWL4AI_URL, DEFAULT_FIRECRAWL_API_URL, DEFAULT_LANGFUSE_HOST,
};
use extraction::{LangfuseConfig, ProviderConfig, ScraperConfig, SecretString, ServiceConfig};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub scrapers: ScraperConfig,
    pub google_api_key: Option<SecretString>,
    pub nvidia_api_key: Option<SecretString>,
    pub langfuse: Option<LangfuseConfig>,
    pub inference_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let secret = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::new)
        };
        let or_default = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let langfuse = match (lookup("LANGFUSE_PUBLIC_KEY"), secret("LANGFUSE_SECRET_KEY")) {
            (Some(public_key), Some(secret_key)) if !public_key.trim().is_empty() => Some(
                LangfuseConfig::new(
                    public_key,
                    secret_key,
                    or_default("LANGFUSE_HOST", DEFAULT_LANGFUSE_HOST),
                ),
            ),
            _ => None,
        };

        Ok(Self {
            host: or_default("HOST", "0.0.0.0"),
            port: parse_or(&lookup, "PORT", 7860)?,
            scrapers: ScraperConfig {
                firecrawl_api_key: secret("FIRECRAWL_API_KEY"),
                firecrawl_api_url: or_default("FIRECRAWL_API_URL", DEFAULT_FIRECRAWL_API_URL),
                crawl4ai_base_url: or_default("CRAWL4AI_BASE_URL", DEFAULT_CRAWL4AI_URL),
                crawl4ai_api_token: secret("CRAWL4AI_API_TOKEN"),
                timeout: Duration::from_secs(parse_or(&lookup, "SCRAPE_TIMEOUT_SECS", 120)?),
            },
            google_api_key: secret("GOOGLE_API_KEY"),
            nvidia_api_key: secret("NVIDIA_API_KEY"),
            langfuse,
            inference_timeout: Duration::from_secs(parse_or(
                &lookup,
                "INFERENCE_TIMEOUT_SECS",
                180,
            )?),
        })
    }

    /// Settings for the extraction service.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            scrapers: self.scrapers.clone(),
            providers: vec![
                ProviderConfig::google_genai(self.google_api_key.clone()),
                ProviderConfig::nvidia(self.nvidia_api_key.clone()),
            ],
            inference_timeout: Some(self.inference_timeout),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", key)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:7860");
        assert_eq!(config.scrapers.firecrawl_api_url, DEFAULT_FIRECRAWL_API_URL);
        assert_eq!(config.scrapers.crawl4ai_base_url, DEFAULT_CRAWL4AI_URL);
        assert_eq!(config.scrapers.timeout, Duration::from_secs(120));
        assert_eq!(config.inference_timeout, Duration::from_secs(180));
        assert!(config.scrapers.firecrawl_api_key.is_none());
        assert!(config.langfuse.is_none());
    }

    #[test]
    fn test_reads_keys_and_overrides() {
        let config = load(&[
            ("PORT", "8080"),
            ("FIRECRAWL_API_KEY", "fc-key"),
            ("GOOGLE_API_KEY", "g-key"),
            ("NVIDIA_API_KEY", "  "),
            ("SCRAPE_TIMEOUT_SECS", "30"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(
            config.scrapers.firecrawl_api_key.as_ref().map(|k| k.expose()),
            Some("fc-key")
        );
        assert_eq!(config.google_api_key.as_ref().map(|k| k.expose()), Some("g-key"));
        assert!(config.nvidia_api_key.is_none());
        assert_eq!(config.scrapers.timeout, Duration::from_secs(30));

        let providers: Vec<String> = config
            .service_config()
            .providers
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(providers, vec!["google_genai", "nvidia"]);
    }

    #[test]
    fn test_langfuse_needs_both_keys() {
        assert!(load(&[("LANGFUSE_PUBLIC_KEY", "pk")]).unwrap().langfuse.is_none());

        let config = load(&[
            ("LANGFUSE_PUBLIC_KEY", "pk"),
            ("LANGFUSE_SECRET_KEY", "sk"),
            ("LANGFUSE_HOST", "https://langfuse.internal/"),
        ])
        .unwrap();
        let langfuse = config.langfuse.unwrap();
        assert_eq!(langfuse.public_key, "pk");
        assert_eq!(langfuse.host, "https://langfuse.internal");
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let err = load(&[("PORT", "seventy")]).unwrap_err();
        assert!(err.to_string().contains("PORT must be a valid number"));
    }
}
