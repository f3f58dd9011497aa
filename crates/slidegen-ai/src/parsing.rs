//! Turning model text into JSON.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use slidegen_core::{Result, SlideGenError};

static LEADING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```(?:json)?\s*").expect("valid leading fence regex"));
static TRAILING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*```$").expect("valid trailing fence regex"));
static ANY_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```json|```").expect("valid fence regex"));

/// Strip one Markdown code fence wrapping the whole text.
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    let without_lead = LEADING_FENCE.replace(trimmed, "");
    TRAILING_FENCE.replace(&without_lead, "").into_owned()
}

/// Remove every fence marker anywhere in the text.
pub fn strip_all_fences(text: &str) -> String {
    ANY_FENCE.replace_all(text, "").trim().to_string()
}

/// Parse fence-stripped model text as `T`.
pub fn parse_model_json<T: DeserializeOwned>(cleaned: &str) -> Result<T> {
    serde_json::from_str(cleaned).map_err(|e| SlideGenError::InvalidModelJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_strip_json_fence() {
        assert_eq!(
            strip_code_fence("```json\n{\"a\":1}\n```"),
            "{\"a\":1}"
        );
        assert_eq!(strip_code_fence("```\n[1]\n```  "), "[1]");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_inner_fences_survive_single_strip() {
        let text = "```json\n{\"code\":\"```rust```\"}\n```";
        assert_eq!(strip_code_fence(text), "{\"code\":\"```rust```\"}");
    }

    #[test]
    fn test_strip_all_fences() {
        assert_eq!(
            strip_all_fences("Here:\n```json\n[{\"x\":1}]\n```"),
            "Here:\n\n[{\"x\":1}]"
        );
    }

    #[test]
    fn test_parse_failure_maps_to_invalid_model_json() {
        let err = parse_model_json::<Value>("not json").unwrap_err();
        assert!(matches!(err, SlideGenError::InvalidModelJson(_)));
        assert!(err.to_string().starts_with("Invalid JSON format received from AI"));
    }
}
