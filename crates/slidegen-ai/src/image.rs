use crate::fallback::FallbackGenerator;
use crate::prompts::{image_description_prompt, IMAGE_SYSTEM_PROMPT};
use async_trait::async_trait;
use slidegen_core::Result;
use tracing::debug;

/// Substituted for any image whose URL could not be produced.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://via.placeholder.com/1024x1024?text=Placeholder+Image";

/// Returned by [`DescribedPlaceholderImages`] once a description was produced.
pub const GENERATED_IMAGE_URL: &str = "https://via.placeholder.com/1024x1024?text=Generated+Image";

/// Seed used for image nodes without alt text.
pub const DEFAULT_IMAGE_PROMPT: &str = "Placeholder Image";

/// Turns a textual image description into an image URL.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image_url(&self, prompt: &str) -> Result<String>;
}

/// Asks the model pair for a photorealistic description, then hands back a
/// fixed placeholder URL. Stands in until a real image backend is plugged in.
pub struct DescribedPlaceholderImages {
    generator: FallbackGenerator,
    max_output_tokens: usize,
}

impl DescribedPlaceholderImages {
    pub fn new(generator: FallbackGenerator, max_output_tokens: usize) -> Self {
        Self {
            generator,
            max_output_tokens,
        }
    }
}

#[async_trait]
impl ImageGenerator for DescribedPlaceholderImages {
    async fn generate_image_url(&self, prompt: &str) -> Result<String> {
        let outcome = self
            .generator
            .generate(
                IMAGE_SYSTEM_PROMPT,
                &image_description_prompt(prompt),
                self.max_output_tokens,
            )
            .await?;

        debug!(model = %outcome.model_used, "Image description generated");
        Ok(GENERATED_IMAGE_URL.to_string())
    }
}
