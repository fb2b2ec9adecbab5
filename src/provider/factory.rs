//! Provider factory for creating LLM providers from configuration.

use crate::config::{ProviderConfig, ProviderKind};
use crate::provider::openai::{ApiFlavor, OpenAiProvider};
use crate::provider::LlmProvider;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Factory for creating LLM providers
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider from the `[provider]` config section.
    ///
    /// An empty API key or endpoint, or an unknown `kind`, is a configuration
    /// error.
    pub fn create(config: &ProviderConfig) -> Result<Arc<dyn LlmProvider>> {
        let kind = config.provider_kind()?;

        if config.endpoint.trim().is_empty() {
            anyhow::bail!("Missing endpoint for provider '{}'", kind);
        }
        if config.api_key.trim().is_empty() {
            anyhow::bail!("Missing api_key for provider '{}'", kind);
        }

        let flavor = match kind {
            ProviderKind::OpenAi => ApiFlavor::OpenAi {
                base_url: config.endpoint.clone(),
            },
            ProviderKind::Azure => ApiFlavor::Azure {
                endpoint: config.endpoint.clone(),
                api_version: config.api_version.clone(),
            },
        };

        let timeout = (config.timeout_seconds > 0).then(|| Duration::from_secs(config.timeout_seconds));

        debug!(
            kind = %kind,
            endpoint = %config.endpoint,
            model = %config.model,
            "creating provider"
        );

        let provider = OpenAiProvider::with_flavor(
            flavor,
            config.api_key.clone(),
            config.model.clone(),
            timeout,
        )
        .with_context(|| format!("Failed to create '{}' provider", kind))?;

        Ok(Arc::new(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(kind: &str, api_key: &str) -> ProviderConfig {
        ProviderConfig {
            kind: kind.to_string(),
            endpoint: "https://contoso.openai.azure.com".to_string(),
            api_key: api_key.to_string(),
            model: "chat-deploy".to_string(),
            ..ProviderConfig::default()
        }
    }

    #[test]
    fn test_create_azure_provider() {
        let provider = ProviderFactory::create(&config("azure", "key")).unwrap();
        assert_eq!(provider.provider_name(), "azure-openai");
        assert_eq!(provider.default_model(), "chat-deploy");
    }

    #[test]
    fn test_create_openai_provider() {
        let provider = ProviderFactory::create(&config("openai", "key")).unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_missing_api_key() {
        let err = ProviderFactory::create(&config("azure", "")).err().unwrap();
        assert!(err.to_string().contains("Missing api_key"));
    }

    #[test]
    fn test_unknown_kind() {
        let err = ProviderFactory::create(&config("bedrock", "key")).err().unwrap();
        assert!(err.to_string().contains("Unknown provider kind"));
    }
}
