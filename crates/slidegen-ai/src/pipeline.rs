use crate::fallback::{FallbackGenerator, ModelAvailability};
use crate::image::{
    DescribedPlaceholderImages, ImageGenerator, DEFAULT_IMAGE_PROMPT, PLACEHOLDER_IMAGE_URL,
};
use crate::llm_factory::LLMProviderFactory;
use crate::parsing::{parse_model_json, strip_all_fences, strip_code_fence};
use crate::prompts::{
    layouts_prompt, outline_prompt, LAYOUTS_SYSTEM_PROMPT, OUTLINE_SYSTEM_PROMPT,
    SMOKE_TEST_PROMPT, SMOKE_TEST_SYSTEM_PROMPT,
};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use slidegen_core::layouts::example_layouts;
use slidegen_core::{
    resequence, ContentBody, ContentKind, GenerationSettings, IdGenerator, Result, Slide,
    SlideGenConfig, SlideGenError,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

const SMOKE_TEST_MAX_TOKENS: usize = 100;
const SMOKE_TEST_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineOutcome {
    pub outline: Vec<String>,
    pub model_used: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutsOutcome {
    pub slides: Vec<Slide>,
    pub model_used: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmokeTestReport {
    pub model_used: String,
    pub preview: String,
}

#[derive(Deserialize)]
struct OutlineResponse {
    outline: Vec<String>,
}

/// Outline and slide-layout generation on top of a primary/fallback model pair.
pub struct GenerationPipeline {
    generator: FallbackGenerator,
    images: Arc<dyn ImageGenerator>,
    settings: GenerationSettings,
    layout_examples: Vec<Slide>,
}

impl GenerationPipeline {
    pub fn new(
        generator: FallbackGenerator,
        images: Arc<dyn ImageGenerator>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            generator,
            images,
            settings,
            layout_examples: example_layouts(),
        }
    }

    /// Build providers from configuration, with model-described placeholder images.
    pub fn from_config(config: &SlideGenConfig) -> anyhow::Result<Self> {
        let (primary, fallback) = LLMProviderFactory::create_pair(&config.llm)?;
        let generator = FallbackGenerator::new(primary, fallback);
        let images = Arc::new(DescribedPlaceholderImages::new(
            generator.clone(),
            config.generation.image_description_max_tokens,
        ));

        Ok(Self::new(generator, images, config.generation.clone()))
    }

    pub fn generator(&self) -> &FallbackGenerator {
        &self.generator
    }

    /// Ask for an outline of at least six one-sentence points on `prompt`.
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub async fn generate_outline(&self, prompt: &str) -> Result<OutlineOutcome> {
        if prompt.trim().is_empty() {
            return Err(SlideGenError::InvalidInput("prompt must not be empty".to_string()));
        }

        let outcome = self
            .generator
            .generate(
                OUTLINE_SYSTEM_PROMPT,
                &outline_prompt(prompt),
                self.settings.outline_max_tokens,
            )
            .await?;

        let response: OutlineResponse = parse_model_json(&strip_code_fence(&outcome.text))?;
        if response.outline.is_empty() {
            warn!(model = %outcome.model_used, "Model returned an empty outline");
        }

        info!(
            model = %outcome.model_used,
            points = response.outline.len(),
            "Outline generated"
        );
        Ok(OutlineOutcome {
            outline: response.outline,
            model_used: outcome.model_used,
        })
    }

    /// Generate one slide per outline point, then resolve every image node.
    #[instrument(skip(self, outline), fields(points = outline.len()))]
    pub async fn generate_slide_layouts(&self, outline: &[String]) -> Result<LayoutsOutcome> {
        if outline.is_empty() {
            return Err(SlideGenError::InvalidInput("outline must not be empty".to_string()));
        }

        let prompt = layouts_prompt(outline, &self.layout_examples)?;
        let outcome = self
            .generator
            .generate(LAYOUTS_SYSTEM_PROMPT, &prompt, self.settings.layouts_max_tokens)
            .await?;

        let mut slides: Vec<Slide> = parse_model_json(&strip_all_fences(&outcome.text))?;

        // Model output often repeats the example ids.
        let ids = IdGenerator::global();
        for slide in &mut slides {
            slide.reassign_ids(ids);
        }
        resequence(&mut slides);

        self.resolve_images(&mut slides).await;

        info!(
            model = %outcome.model_used,
            slides = slides.len(),
            "Layouts generated"
        );
        Ok(LayoutsOutcome {
            slides,
            model_used: outcome.model_used,
        })
    }

    /// Replace the content of every image node with a URL from the image
    /// capability, seeded with the node's alt text. All nodes are resolved
    /// concurrently; a failed node gets [`PLACEHOLDER_IMAGE_URL`].
    pub async fn resolve_images(&self, slides: &mut [Slide]) {
        let requests: Vec<(usize, String, String)> = slides
            .iter()
            .enumerate()
            .flat_map(|(index, slide)| {
                slide
                    .content
                    .collect_kind(&ContentKind::Image)
                    .into_iter()
                    .map(move |node| {
                        let prompt = node
                            .attrs
                            .alt
                            .clone()
                            .filter(|alt| !alt.trim().is_empty())
                            .unwrap_or_else(|| DEFAULT_IMAGE_PROMPT.to_string());
                        (index, node.id.clone(), prompt)
                    })
            })
            .collect();

        if requests.is_empty() {
            return;
        }
        info!(images = requests.len(), "Resolving image components");

        let urls = join_all(requests.iter().map(|(_, node_id, prompt)| async move {
            match self.images.generate_image_url(prompt).await {
                Ok(url) => url,
                Err(e) => {
                    warn!(node_id = %node_id, "Image generation failed: {}", e);
                    PLACEHOLDER_IMAGE_URL.to_string()
                }
            }
        }))
        .await;

        for ((index, node_id, _), url) in requests.into_iter().zip(urls) {
            if let Err(e) = slides[index]
                .content
                .replace_content(&node_id, ContentBody::Text(url))
            {
                warn!(node_id = %node_id, "Could not store image URL: {}", e);
            }
        }
    }

    pub async fn check_models(&self) -> Vec<ModelAvailability> {
        self.generator.check_models().await
    }

    /// Run a short greeting prompt through the model pair.
    pub async fn smoke_test(&self) -> Result<SmokeTestReport> {
        let outcome = self
            .generator
            .generate(SMOKE_TEST_SYSTEM_PROMPT, SMOKE_TEST_PROMPT, SMOKE_TEST_MAX_TOKENS)
            .await?;

        let mut preview: String = outcome.text.chars().take(SMOKE_TEST_PREVIEW_CHARS).collect();
        preview.push_str("...");

        Ok(SmokeTestReport {
            model_used: outcome.model_used,
            preview,
        })
    }
}
