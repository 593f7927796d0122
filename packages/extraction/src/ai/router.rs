//! Provider router: resolves a (model, provider) pair to a chat endpoint.
//!
//! Every supported provider exposes an OpenAI-compatible chat completions
//! API, so one [`OpenAIClient`] per provider is enough. The provider table is
//! built once at startup and only read afterwards.
//!
//! # Example
//!
//! ```rust,ignore
//! use extraction::ai::ProviderRouter;
//! use extraction::{ModelSelection, ProviderConfig};
//!
//! let router = ProviderRouter::builder()
//!     .provider(ProviderConfig::google_genai(Some(SecretString::new(google_key))))
//!     .provider(ProviderConfig::nvidia(None))
//!     .build()?;
//!
//! let text = router
//!     .complete(&ModelSelection::new("gemini-2.5-flash", "google_genai"), "Hello")
//!     .await?;
//! ```

use async_trait::async_trait;
use openai_client::OpenAIClient;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{InferenceError, InferenceResult};
use crate::traits::ai::ChatModel;
use crate::types::{config::ProviderConfig, model::ModelSelection};

enum ProviderEntry {
    Ready(OpenAIClient),
    MissingKey { env_var: String },
}

/// Routes chat requests to the configured providers.
pub struct ProviderRouter {
    providers: HashMap<String, ProviderEntry>,
}

/// Builder for [`ProviderRouter`].
pub struct ProviderRouterBuilder {
    configs: Vec<ProviderConfig>,
    timeout: Duration,
}

impl ProviderRouter {
    pub fn builder() -> ProviderRouterBuilder {
        ProviderRouterBuilder {
            configs: Vec::new(),
            timeout: Duration::from_secs(180),
        }
    }

    fn client_for(&self, provider: &str) -> InferenceResult<&OpenAIClient> {
        match self.providers.get(provider) {
            Some(ProviderEntry::Ready(client)) => Ok(client),
            Some(ProviderEntry::MissingKey { env_var }) => {
                Err(InferenceError::ProviderNotConfigured {
                    provider: provider.to_string(),
                    env_var: env_var.clone(),
                })
            }
            None => Err(InferenceError::UnknownProvider(provider.to_string())),
        }
    }
}

impl ProviderRouterBuilder {
    /// Register a provider. A later registration with the same id wins.
    pub fn provider(mut self, config: ProviderConfig) -> Self {
        self.configs.push(config);
        self
    }

    /// Whole-request timeout for inference calls.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> InferenceResult<ProviderRouter> {
        let mut providers = HashMap::new();

        for config in self.configs {
            let entry = match &config.api_key {
                Some(key) => ProviderEntry::Ready(
                    OpenAIClient::new(key.expose())
                        .with_base_url(&config.base_url)
                        .with_timeout(self.timeout)?,
                ),
                None => {
                    tracing::warn!(
                        provider = %config.id,
                        env_var = %config.api_key_env,
                        "Model provider has no API key; requests to it will fail"
                    );
                    ProviderEntry::MissingKey {
                        env_var: config.api_key_env.clone(),
                    }
                }
            };
            providers.insert(config.id, entry);
        }

        Ok(ProviderRouter { providers })
    }
}

#[async_trait]
impl ChatModel for ProviderRouter {
    async fn complete(&self, selection: &ModelSelection, prompt: &str) -> InferenceResult<String> {
        let client = self.client_for(&selection.provider)?;

        Ok(client.complete(&selection.model, prompt).await?)
    }

    fn providers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.keys().cloned().collect();
        ids.sort();
        ids
    }
}
