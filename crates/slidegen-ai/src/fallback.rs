use crate::llm_provider::{GenerationConfig, LLMProvider, Message};
use serde::Serialize;
use slidegen_core::{Result, SlideGenError};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Text produced by one of the two models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationOutcome {
    pub text: String,
    pub model_used: String,
    pub used_fallback: bool,
}

/// Availability of one configured model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelAvailability {
    pub role: &'static str,
    pub provider: String,
    pub model: String,
    pub context_window: usize,
    pub available: bool,
}

/// A primary model with a single fallback.
///
/// The primary gets the system prompt as a system message when it supports
/// one. The fallback, and a primary without system instructions, is sent one
/// user message with the system prompt folded in.
#[derive(Clone)]
pub struct FallbackGenerator {
    primary: Arc<dyn LLMProvider>,
    fallback: Arc<dyn LLMProvider>,
}

impl FallbackGenerator {
    pub fn new(primary: Arc<dyn LLMProvider>, fallback: Arc<dyn LLMProvider>) -> Self {
        Self { primary, fallback }
    }

    pub fn primary(&self) -> &Arc<dyn LLMProvider> {
        &self.primary
    }

    pub fn fallback(&self) -> &Arc<dyn LLMProvider> {
        &self.fallback
    }

    /// Generate with the primary, then once with the fallback.
    ///
    /// An error or blank text counts as a failure. When both fail the error
    /// carries `"{model}: {reason}"` for each attempt.
    pub async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_output_tokens: usize,
    ) -> Result<GenerationOutcome> {
        let mut errors = Vec::with_capacity(2);

        let primary_messages = if self.primary.characteristics().supports_system_instruction {
            vec![Message::system(system_prompt), Message::user(user_prompt)]
        } else {
            vec![Message::user(fold_system_prompt(system_prompt, user_prompt))]
        };
        match self
            .attempt(&self.primary, &primary_messages, max_output_tokens)
            .await
        {
            Ok(text) => {
                return Ok(GenerationOutcome {
                    text,
                    model_used: self.primary.model_name().to_string(),
                    used_fallback: false,
                })
            }
            Err(reason) => {
                warn!(model = self.primary.model_name(), "Primary model failed: {}", reason);
                errors.push(format!("{}: {}", self.primary.model_name(), reason));
            }
        }

        let folded = [Message::user(fold_system_prompt(system_prompt, user_prompt))];
        match self
            .attempt(&self.fallback, &folded, max_output_tokens)
            .await
        {
            Ok(text) => Ok(GenerationOutcome {
                text,
                model_used: self.fallback.model_name().to_string(),
                used_fallback: true,
            }),
            Err(reason) => {
                errors.push(format!("{}: {}", self.fallback.model_name(), reason));
                error!("All models failed: {}", errors.join("; "));
                Err(SlideGenError::AllModelsFailed(errors))
            }
        }
    }

    async fn attempt(
        &self,
        provider: &Arc<dyn LLMProvider>,
        messages: &[Message],
        max_output_tokens: usize,
    ) -> std::result::Result<String, String> {
        let limit = provider.characteristics().max_output_tokens;
        let config = GenerationConfig::with_max_output_tokens(max_output_tokens.min(limit));

        let start = Instant::now();
        let response = provider
            .generate_chat(messages, &config)
            .await
            .map_err(|e| format!("{:#}", e))?;

        if response.content.trim().is_empty() {
            return Err(SlideGenError::EmptyResponse.to_string());
        }

        info!(
            model = provider.model_name(),
            duration_ms = start.elapsed().as_millis() as u64,
            tokens = ?response.total_tokens,
            "Model responded"
        );
        Ok(response.content)
    }

    /// Probe both models.
    pub async fn check_models(&self) -> Vec<ModelAvailability> {
        let (primary, fallback) =
            futures::join!(self.primary.is_available(), self.fallback.is_available());

        vec![
            ModelAvailability {
                role: "primary",
                provider: self.primary.provider_name().to_string(),
                model: self.primary.model_name().to_string(),
                context_window: self.primary.characteristics().max_tokens,
                available: primary,
            },
            ModelAvailability {
                role: "fallback",
                provider: self.fallback.provider_name().to_string(),
                model: self.fallback.model_name().to_string(),
                context_window: self.fallback.characteristics().max_tokens,
                available: fallback,
            },
        ]
    }
}

fn fold_system_prompt(system_prompt: &str, user_prompt: &str) -> String {
    format!("{}\n\nUser: {}", system_prompt, user_prompt)
}
