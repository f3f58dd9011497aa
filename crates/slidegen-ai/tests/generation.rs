mod common;

use anyhow::anyhow;
use common::{pipeline, MockProvider, RecordingImages, LAYOUTS_JSON, OUTLINE_JSON};
use slidegen_ai::{
    DescribedPlaceholderImages, FallbackGenerator, GenerationPipeline, MessageRole,
    GENERATED_IMAGE_URL, PLACEHOLDER_IMAGE_URL,
};
use slidegen_core::{ContentBody, ContentKind, GenerationSettings, SlideGenError};
use std::collections::HashSet;
use std::sync::Arc;

#[tokio::test]
async fn primary_success_skips_fallback() {
    let primary = MockProvider::replying("primary-model", "hello");
    let fallback = MockProvider::replying("fallback-model", "unused");
    let generator = FallbackGenerator::new(primary.clone(), fallback.clone());

    let outcome = generator.generate("Be brief.", "Say hi", 100).await.unwrap();

    assert_eq!(outcome.text, "hello");
    assert_eq!(outcome.model_used, "primary-model");
    assert!(!outcome.used_fallback);
    assert_eq!(fallback.call_count(), 0);

    let calls = primary.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0][0].role, MessageRole::System);
    assert_eq!(calls[0][0].content, "Be brief.");
    assert_eq!(calls[0][1].role, MessageRole::User);
    assert_eq!(calls[0][1].content, "Say hi");
}

#[tokio::test]
async fn fallback_receives_system_prompt_folded_into_user_message() {
    let primary = MockProvider::failing("primary-model", "rate limited");
    let fallback = MockProvider::replying("fallback-model", "hi there");
    let generator = FallbackGenerator::new(primary.clone(), fallback.clone());

    let outcome = generator.generate("Be brief.", "Say hi", 100).await.unwrap();

    assert_eq!(outcome.model_used, "fallback-model");
    assert!(outcome.used_fallback);
    assert_eq!(primary.call_count(), 1);

    let calls = fallback.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), 1);
    assert_eq!(calls[0][0].role, MessageRole::User);
    assert_eq!(calls[0][0].content, "Be brief.\n\nUser: Say hi");
}

#[tokio::test]
async fn blank_primary_text_counts_as_failure() {
    let primary = MockProvider::replying("primary-model", "   \n");
    let fallback = MockProvider::replying("fallback-model", "real text");
    let generator = FallbackGenerator::new(primary, fallback);

    let outcome = generator.generate("sys", "user", 10).await.unwrap();
    assert_eq!(outcome.text, "real text");
    assert!(outcome.used_fallback);
}

#[tokio::test]
async fn both_failures_are_reported_with_model_names() {
    let primary = MockProvider::failing("primary-model", "rate limited");
    let fallback = MockProvider::replying("fallback-model", "");
    let generator = FallbackGenerator::new(primary, fallback);

    let err = generator.generate("sys", "user", 10).await.unwrap_err();
    match &err {
        SlideGenError::AllModelsFailed(errors) => {
            assert_eq!(
                errors,
                &vec![
                    "primary-model: rate limited".to_string(),
                    "fallback-model: No content generated".to_string(),
                ]
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let message = err.to_string();
    assert!(message.starts_with("All models failed."));
    assert!(message.contains("rate limited"));
    assert!(message.contains("No content generated"));
}

#[tokio::test]
async fn outline_is_parsed_from_fenced_json() {
    let primary = MockProvider::replying("primary-model", OUTLINE_JSON);
    let fallback = MockProvider::failing("fallback-model", "unused");
    let pipeline = pipeline(primary, fallback.clone(), RecordingImages::failing_for(&[]));

    let outcome = pipeline.generate_outline("Rust for teams").await.unwrap();

    assert_eq!(outcome.outline, vec!["a", "b", "c", "d", "e", "f"]);
    assert_eq!(outcome.model_used, "primary-model");
    assert_eq!(fallback.call_count(), 0);
}

#[tokio::test]
async fn empty_prompt_is_rejected_before_any_model_call() {
    let primary = MockProvider::replying("primary-model", OUTLINE_JSON);
    let fallback = MockProvider::replying("fallback-model", OUTLINE_JSON);
    let pipeline = pipeline(primary.clone(), fallback.clone(), RecordingImages::failing_for(&[]));

    let err = pipeline.generate_outline("   ").await.unwrap_err();
    assert!(matches!(err, SlideGenError::InvalidInput(_)));
    assert_eq!(primary.call_count() + fallback.call_count(), 0);
}

#[tokio::test]
async fn malformed_outline_is_an_invalid_json_error() {
    let primary = MockProvider::replying("primary-model", "Here is your outline: 1. a 2. b");
    let fallback = MockProvider::failing("fallback-model", "unused");
    let pipeline = pipeline(primary, fallback, RecordingImages::failing_for(&[]));

    let err = pipeline.generate_outline("topic").await.unwrap_err();
    assert!(matches!(err, SlideGenError::InvalidModelJson(_)));
}

#[tokio::test]
async fn layouts_get_fresh_ids_dense_order_and_resolved_images() {
    let primary = MockProvider::replying("primary-model", LAYOUTS_JSON);
    let fallback = MockProvider::failing("fallback-model", "unused");
    let images = RecordingImages::failing_for(&["sunset over mountains"]);
    let pipeline = pipeline(primary.clone(), fallback, images.clone());

    let outline = vec!["Mountains".to_string(), "Cities".to_string()];
    let outcome = pipeline.generate_slide_layouts(&outline).await.unwrap();
    let slides = outcome.slides;

    assert_eq!(slides.len(), 2);
    assert_eq!(slides[0].slide_order, Some(1));
    assert_eq!(slides[1].slide_order, Some(2));
    assert_ne!(slides[0].id, slides[1].id);
    assert_ne!(slides[0].content.id, slides[1].content.id);

    let mut node_ids = HashSet::new();
    for slide in &slides {
        for node in slide.content.collect_kind(&ContentKind::Image) {
            assert!(node_ids.insert(node.id.clone()));
        }
    }

    let first = slides[0].content.collect_kind(&ContentKind::Image);
    assert_eq!(first[0].text(), Some(PLACEHOLDER_IMAGE_URL));
    let second = slides[1].content.collect_kind(&ContentKind::Image);
    assert_eq!(
        second[0].text(),
        Some("https://images.test/city-skyline-at-night")
    );

    let mut prompts = images.prompts();
    prompts.sort();
    assert_eq!(prompts, vec!["city skyline at night", "sunset over mountains"]);

    let user_message = &primary.calls()[0][1].content;
    assert!(user_message.contains("[\"Mountains\",\"Cities\"]"));
}

#[tokio::test]
async fn empty_outline_is_rejected() {
    let primary = MockProvider::replying("primary-model", LAYOUTS_JSON);
    let fallback = MockProvider::replying("fallback-model", LAYOUTS_JSON);
    let pipeline = pipeline(primary.clone(), fallback, RecordingImages::failing_for(&[]));

    let err = pipeline.generate_slide_layouts(&[]).await.unwrap_err();
    assert!(matches!(err, SlideGenError::InvalidInput(_)));
    assert_eq!(primary.call_count(), 0);
}

#[tokio::test]
async fn smoke_test_reports_a_truncated_preview() {
    let long = "x".repeat(250);
    let primary = MockProvider::failing("primary-model", "offline");
    let fallback = MockProvider::replying("fallback-model", &long);
    let pipeline = pipeline(primary, fallback, RecordingImages::failing_for(&[]));

    let report = pipeline.smoke_test().await.unwrap();
    assert_eq!(report.model_used, "fallback-model");
    assert_eq!(report.preview.len(), 103);
    assert!(report.preview.ends_with("..."));
}

#[tokio::test]
async fn check_models_lists_both_roles() {
    let pipeline = pipeline(
        MockProvider::replying("primary-model", "x"),
        MockProvider::replying("fallback-model", "x"),
        RecordingImages::failing_for(&[]),
    );

    let models = pipeline.check_models().await;
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].role, "primary");
    assert_eq!(models[0].model, "primary-model");
    assert_eq!(models[1].role, "fallback");
    assert_eq!(models[0].context_window, 32_000);
    assert!(models.iter().all(|m| m.available));
}

#[tokio::test]
async fn primary_without_system_instruction_gets_folded_prompt() {
    let primary = MockProvider::without_system_instruction("primary-model", "hello");
    let fallback = MockProvider::replying("fallback-model", "unused");
    let generator = FallbackGenerator::new(primary.clone(), fallback);

    generator.generate("Be brief.", "Say hi", 100).await.unwrap();

    let calls = primary.calls();
    assert_eq!(calls[0].len(), 1);
    assert_eq!(calls[0][0].role, MessageRole::User);
    assert_eq!(calls[0][0].content, "Be brief.\n\nUser: Say hi");
}

#[tokio::test]
async fn output_allowance_is_capped_by_the_provider() {
    let primary = MockProvider::replying("primary-model", "hello");
    let fallback = MockProvider::replying("fallback-model", "unused");
    let generator = FallbackGenerator::new(primary.clone(), fallback);

    generator.generate("sys", "a", 500).await.unwrap();
    generator.generate("sys", "b", 20_000).await.unwrap();

    assert_eq!(
        primary.requested_tokens(),
        vec![Some(500), Some(MockProvider::MAX_OUTPUT_TOKENS)]
    );
}

#[tokio::test]
async fn malformed_nodes_do_not_discard_the_batch() {
    let reply = r#"[
      {
        "slideName": "Valid",
        "type": "blank-card",
        "content": {
          "type": "column",
          "content": [{ "type": "heading1", "name": "Heading1", "content": "Hello" }]
        }
      },
      {
        "slideName": "Sloppy",
        "type": "twoColumns",
        "content": {
          "type": "column",
          "content": [
            { "id": "empty-col", "type": "column", "name": "Column", "content": "" },
            { "id": "para", "type": "paragraph", "name": "Paragraph", "content": ["one", "two"] }
          ]
        }
      }
    ]"#;
    let primary = MockProvider::replying("primary-model", reply);
    let fallback = MockProvider::failing("fallback-model", "unused");
    let pipeline = pipeline(primary, fallback, RecordingImages::failing_for(&[]));

    let outline = vec!["Intro".to_string(), "Details".to_string()];
    let slides = pipeline.generate_slide_layouts(&outline).await.unwrap().slides;

    assert_eq!(slides.len(), 2);
    assert_eq!(slides[0].slide_name, "Valid");
    let heading = &slides[0].content.children().unwrap()[0];
    assert_eq!(heading.kind, ContentKind::Heading1);
    assert_eq!(heading.text(), Some("Hello"));

    let sloppy = slides[1].content.children().unwrap();
    assert_eq!(sloppy.len(), 2);
    assert_eq!(sloppy[0].kind, ContentKind::Column);
    assert_eq!(sloppy[0].content, ContentBody::Children(vec![]));
    assert_eq!(sloppy[1].kind, ContentKind::Other("paragraph".to_string()));
    assert_eq!(
        sloppy[1].content,
        ContentBody::List(vec!["one".to_string(), "two".to_string()])
    );
}

/// Model pair that answers layout requests with [`LAYOUTS_JSON`] and image
/// description requests with text, failing descriptions mentioning `fail_for`.
fn describing_provider(model: &str, fail_for: &'static str) -> Arc<MockProvider> {
    MockProvider::new(model, move |messages| {
        let prompt = &messages[messages.len() - 1].content;
        if !prompt.contains("Description: ") {
            return Ok(LAYOUTS_JSON.to_string());
        }
        if prompt.contains(fail_for) {
            return Err(anyhow!("safety filter"));
        }
        Ok("A wide photorealistic landscape at golden hour.".to_string())
    })
}

fn described_pipeline(
    primary: Arc<MockProvider>,
    fallback: Arc<MockProvider>,
) -> GenerationPipeline {
    let settings = GenerationSettings::default();
    let generator = FallbackGenerator::new(primary, fallback);
    let images = Arc::new(DescribedPlaceholderImages::new(
        generator.clone(),
        settings.image_description_max_tokens,
    ));
    GenerationPipeline::new(generator, images, settings)
}

#[tokio::test]
async fn failed_image_description_resolves_to_placeholder() {
    let primary = describing_provider("primary-model", "sunset over mountains");
    let fallback = describing_provider("fallback-model", "sunset over mountains");
    let pipeline = described_pipeline(primary, fallback.clone());

    let outline = vec!["Mountains".to_string(), "Cities".to_string()];
    let slides = pipeline.generate_slide_layouts(&outline).await.unwrap().slides;

    let sunset = slides[0].content.collect_kind(&ContentKind::Image);
    assert_eq!(sunset[0].attrs.alt.as_deref(), Some("sunset over mountains"));
    assert_eq!(sunset[0].text(), Some(PLACEHOLDER_IMAGE_URL));

    let skyline = slides[1].content.collect_kind(&ContentKind::Image);
    assert_eq!(skyline[0].text(), Some(GENERATED_IMAGE_URL));

    // Only the failing description reached the fallback.
    let fallback_calls = fallback.calls();
    assert_eq!(fallback_calls.len(), 1);
    assert!(fallback_calls[0][0]
        .content
        .contains("Description: sunset over mountains"));
}

#[tokio::test]
async fn image_descriptions_use_their_own_allowance() {
    let primary = describing_provider("primary-model", "nothing fails");
    let fallback = describing_provider("fallback-model", "nothing fails");
    let pipeline = described_pipeline(primary.clone(), fallback.clone());

    let outline = vec!["Mountains".to_string(), "Cities".to_string()];
    let slides = pipeline.generate_slide_layouts(&outline).await.unwrap().slides;

    for slide in &slides {
        for image in slide.content.collect_kind(&ContentKind::Image) {
            assert_eq!(image.text(), Some(GENERATED_IMAGE_URL));
        }
    }
    assert_eq!(fallback.call_count(), 0);

    let settings = GenerationSettings::default();
    let requests: Vec<(bool, Option<usize>)> = primary
        .calls()
        .iter()
        .map(|messages| messages[messages.len() - 1].content.contains("Description: "))
        .zip(primary.requested_tokens())
        .collect();
    assert_eq!(requests.len(), 3);
    for (is_description, tokens) in requests {
        let expected = if is_description {
            settings.image_description_max_tokens
        } else {
            settings.layouts_max_tokens
        };
        assert_eq!(tokens, Some(expected));
    }
}
