use crate::llm_provider::*;
use anyhow::{anyhow, Result};
use slidegen_core::{LlmConfig, ModelConfig};
use std::sync::Arc;

#[cfg(feature = "gemini")]
use crate::gemini_provider::{GeminiConfig, GeminiProvider};

#[cfg(feature = "openai-compatible")]
use crate::openai_compatible_provider::{OpenAICompatibleConfig, OpenAICompatibleProvider};

/// Factory for creating LLM providers based on configuration
pub struct LLMProviderFactory;

impl LLMProviderFactory {
    /// Create an LLM provider for one configured model
    pub fn create_from_config(config: &ModelConfig) -> Result<Arc<dyn LLMProvider>> {
        let provider_name = config.provider.to_lowercase();

        match provider_name.as_str() {
            #[cfg(feature = "gemini")]
            "gemini" => Self::create_gemini_provider(config),
            #[cfg(feature = "openai-compatible")]
            "openai-compatible" => Self::create_openai_compatible_provider(config),
            _ => Err(anyhow!(
                "Unsupported LLM provider: {}. Available providers: {}",
                provider_name,
                Self::supported_providers().join(", ")
            )),
        }
    }

    /// Create the primary and fallback providers
    pub fn create_pair(config: &LlmConfig) -> Result<(Arc<dyn LLMProvider>, Arc<dyn LLMProvider>)> {
        Ok((
            Self::create_from_config(&config.primary)?,
            Self::create_from_config(&config.fallback)?,
        ))
    }

    #[cfg(feature = "gemini")]
    fn create_gemini_provider(config: &ModelConfig) -> Result<Arc<dyn LLMProvider>> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_GENERATIVE_AI_API_KEY").ok())
            .ok_or_else(|| {
                anyhow!(
                    "Gemini API key not found. Set 'api_key' in config \
                     or GOOGLE_GENERATIVE_AI_API_KEY environment variable"
                )
            })?;

        let mut gemini_config = GeminiConfig::new(api_key, config.model.clone());
        gemini_config.timeout_secs = config.timeout_secs;
        if let Some(base_url) = &config.base_url {
            gemini_config.base_url = base_url.clone();
        }

        Ok(Arc::new(GeminiProvider::new(gemini_config)?))
    }

    #[cfg(feature = "openai-compatible")]
    fn create_openai_compatible_provider(config: &ModelConfig) -> Result<Arc<dyn LLMProvider>> {
        let base_url = config.base_url.clone().ok_or_else(|| {
            anyhow!("OpenAI-compatible base URL not found. Set 'base_url' for this model in config")
        })?;

        let compat_config = OpenAICompatibleConfig {
            base_url,
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
            api_key: config.api_key.clone(),
            ..Default::default()
        };

        Ok(Arc::new(OpenAICompatibleProvider::new(compat_config)?))
    }

    /// Get a list of supported providers (based on enabled features)
    pub fn supported_providers() -> Vec<&'static str> {
        #[allow(unused_mut)]
        let mut providers = Vec::new();

        #[cfg(feature = "gemini")]
        providers.push("gemini");

        #[cfg(feature = "openai-compatible")]
        providers.push("openai-compatible");

        providers
    }
}
