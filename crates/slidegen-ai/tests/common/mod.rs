#![allow(dead_code)]

use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::Mutex;
use slidegen_ai::{
    FallbackGenerator, GenerationConfig, GenerationPipeline, ImageGenerator, LLMProvider,
    LLMResponse, LLMResult, Message, ProviderCharacteristics,
};
use slidegen_core::{GenerationSettings, Result, SlideGenError};
use std::sync::Arc;

type Responder = Box<dyn Fn(&[Message]) -> LLMResult<String> + Send + Sync>;

/// Provider answering from a closure and recording every request.
pub struct MockProvider {
    model: String,
    supports_system_instruction: bool,
    respond: Responder,
    calls: Mutex<Vec<Vec<Message>>>,
    requested_tokens: Mutex<Vec<Option<usize>>>,
}

impl MockProvider {
    pub const MAX_OUTPUT_TOKENS: usize = 8_000;

    pub fn new<F>(model: &str, respond: F) -> Arc<Self>
    where
        F: Fn(&[Message]) -> LLMResult<String> + Send + Sync + 'static,
    {
        Self::build(model, true, Box::new(respond))
    }

    /// A provider that cannot take a system message.
    pub fn without_system_instruction(model: &str, text: &str) -> Arc<Self> {
        let text = text.to_string();
        Self::build(model, false, Box::new(move |_| Ok(text.clone())))
    }

    fn build(model: &str, supports_system_instruction: bool, respond: Responder) -> Arc<Self> {
        Arc::new(Self {
            model: model.to_string(),
            supports_system_instruction,
            respond,
            calls: Mutex::new(Vec::new()),
            requested_tokens: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(model: &str, text: &str) -> Arc<Self> {
        let text = text.to_string();
        Self::new(model, move |_| Ok(text.clone()))
    }

    pub fn failing(model: &str, reason: &str) -> Arc<Self> {
        let reason = reason.to_string();
        Self::new(model, move |_| Err(anyhow!(reason.clone())))
    }

    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// `max_output_tokens` of every request, in call order.
    pub fn requested_tokens(&self) -> Vec<Option<usize>> {
        self.requested_tokens.lock().clone()
    }
}

#[async_trait]
impl LLMProvider for MockProvider {
    async fn generate_chat(
        &self,
        messages: &[Message],
        config: &GenerationConfig,
    ) -> LLMResult<LLMResponse> {
        self.calls.lock().push(messages.to_vec());
        self.requested_tokens.lock().push(config.max_output_tokens);
        let content = (self.respond)(messages)?;
        Ok(LLMResponse {
            content,
            total_tokens: None,
            prompt_tokens: None,
            completion_tokens: None,
            finish_reason: Some("STOP".to_string()),
            model: self.model.clone(),
        })
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn characteristics(&self) -> ProviderCharacteristics {
        ProviderCharacteristics {
            max_tokens: 32_000,
            max_output_tokens: Self::MAX_OUTPUT_TOKENS,
            supports_system_instruction: self.supports_system_instruction,
        }
    }
}

/// Image capability that records prompts and fails for the listed ones.
#[derive(Default)]
pub struct RecordingImages {
    failing: Vec<String>,
    prompts: Mutex<Vec<String>>,
}

impl RecordingImages {
    pub fn failing_for(prompts: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            failing: prompts.iter().map(|p| p.to_string()).collect(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl ImageGenerator for RecordingImages {
    async fn generate_image_url(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        if self.failing.iter().any(|p| p == prompt) {
            return Err(SlideGenError::AllModelsFailed(vec![
                "image-model: quota exceeded".to_string(),
            ]));
        }
        Ok(format!("https://images.test/{}", prompt.replace(' ', "-")))
    }
}

pub fn pipeline(
    primary: Arc<MockProvider>,
    fallback: Arc<MockProvider>,
    images: Arc<RecordingImages>,
) -> GenerationPipeline {
    GenerationPipeline::new(
        FallbackGenerator::new(primary, fallback),
        images,
        GenerationSettings::default(),
    )
}

pub const OUTLINE_JSON: &str = "```json\n{\"outline\":[\"a\",\"b\",\"c\",\"d\",\"e\",\"f\"]}\n```";

/// Two slides in the shape the layout prompt asks for, with repeated ids.
pub const LAYOUTS_JSON: &str = r#"```json
[
  {
    "id": "dup",
    "slideName": "Hero",
    "type": "accentLeft",
    "content": {
      "id": "root",
      "type": "column",
      "name": "Column",
      "content": [
        { "id": "img", "type": "image", "name": "Image", "content": "", "alt": "sunset over mountains" },
        { "id": "h", "type": "heading1", "name": "Heading1", "content": "Peaks" }
      ]
    }
  },
  {
    "id": "dup",
    "slideName": "Details",
    "type": "blank-card",
    "content": {
      "id": "root",
      "type": "column",
      "name": "Column",
      "content": [
        { "id": "img", "type": "image", "name": "Image", "content": "", "alt": "city skyline at night" },
        { "id": "list", "type": "bulletedList", "name": "List", "content": ["one", "two"] }
      ]
    }
  }
]
```"#;
