//! OpenAI-compatible client construction and the provider factory built on it.

use crate::config::{EmbeddingProvider, Settings};
use crate::embedding::{Embedder, HashingEmbedder, OpenAIEmbedder};
use crate::error::{ParleyError, Result};
use crate::orchestrator::Providers;
use crate::rag::{Generator, OpenAIGenerator};
use async_openai::{config::OpenAIConfig, Client};
use std::sync::Arc;
use std::time::Duration;

/// Default timeout for API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Dimensions used by the offline hashing embedder.
const HASHING_DIMENSIONS: usize = 384;

/// Create a client for an OpenAI-compatible API.
///
/// `api_base` switches the endpoint, e.g. to Gemini's OpenAI-compatible API
/// or a local server.
pub fn create_client(
    credential: &str,
    api_base: Option<&str>,
    timeout: Option<Duration>,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)))
        .build()?;

    let mut config = OpenAIConfig::new().with_api_key(credential);
    if let Some(base) = api_base {
        config = config.with_api_base(base);
    }

    Ok(Client::with_config(config).with_http_client(http_client))
}

/// Builds embedders and generators that talk to OpenAI-compatible services.
pub struct OpenAIProviders {
    settings: Settings,
}

impl OpenAIProviders {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    fn client(&self, credential: &str) -> Result<Client<OpenAIConfig>> {
        if credential.trim().is_empty() {
            return Err(ParleyError::Config(format!(
                "API credential is empty. Pass one explicitly or set {}",
                self.settings.generation.api_key_env
            )));
        }
        create_client(
            credential,
            self.settings.generation.api_base.as_deref(),
            Some(Duration::from_secs(self.settings.generation.timeout_seconds)),
        )
    }
}

impl Providers for OpenAIProviders {
    fn embedder(&self, credential: &str) -> Result<Arc<dyn Embedder>> {
        let embedding = &self.settings.embedding;
        match embedding.provider {
            EmbeddingProvider::OpenAI => Ok(Arc::new(OpenAIEmbedder::with_config(
                self.client(credential)?,
                &embedding.model,
                embedding.dimensions,
                embedding.batch_size,
            ))),
            EmbeddingProvider::Hashing => Ok(Arc::new(HashingEmbedder::new(HASHING_DIMENSIONS))),
        }
    }

    fn generator(&self, credential: &str) -> Result<Arc<dyn Generator>> {
        let generation = &self.settings.generation;
        Ok(Arc::new(OpenAIGenerator::new(
            self.client(credential)?,
            &generation.model,
            generation.temperature,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_credential_is_rejected() {
        let providers = OpenAIProviders::new(Settings::default());
        assert!(matches!(providers.generator("  "), Err(ParleyError::Config(_))));
    }

    #[test]
    fn test_hashing_embedder_needs_no_credential() {
        let mut settings = Settings::default();
        settings.embedding.provider = EmbeddingProvider::Hashing;
        let providers = OpenAIProviders::new(settings);

        let embedder = providers.embedder("").unwrap();
        assert_eq!(embedder.dimensions(), Some(HASHING_DIMENSIONS));
    }

    #[test]
    fn test_client_with_custom_base() {
        assert!(create_client("sk-test", Some("http://localhost:11434/v1"), None).is_ok());
    }
}
