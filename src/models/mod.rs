//! Model metadata and capability detection
//!
//! Detection is a fixed keyword table over the model identifier. It is total:
//! every identifier yields metadata, unknown ones fall back to a plain chat
//! model with the declared context window.

mod display;
mod listing;
mod rules;
mod store;
mod types;

pub use display::display_name;
pub use listing::{ModelRecord, ProviderModel, parse_listing};
pub use store::ModelStore;
pub use types::{Capabilities, ContextLimits, DetectedModel, ModelMetadata, ModelType};

use serde_json::Value;

use crate::consts::UNKNOWN;

/// Derive metadata and a display name for a model identifier.
///
/// `context_window` of zero means the provider did not declare one. `raw` is
/// the provider's listing entry, consulted for `owned_by` and
/// `max_completion_tokens` when the other inputs leave them open.
pub fn detect_model(
    model_id: &str,
    context_window: u64,
    owned_by: &str,
    raw: Option<&Value>,
) -> DetectedModel {
    let id = model_id.to_ascii_lowercase();
    let model_type = rules::classify(&id);

    let declared = ContextLimits {
        max_input_tokens: (context_window > 0).then_some(context_window),
        max_output_tokens: raw
            .and_then(|r| r.get("max_completion_tokens"))
            .and_then(Value::as_u64)
            .filter(|&n| n > 0),
        ..ContextLimits::default()
    };

    let owner = Some(owned_by.trim())
        .filter(|o| !o.is_empty())
        .or_else(|| {
            raw.and_then(|r| r.get("owned_by"))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|o| !o.is_empty())
        })
        .unwrap_or(UNKNOWN)
        .to_string();

    DetectedModel {
        display_name: display_name(model_id),
        metadata: ModelMetadata {
            owner,
            model_type,
            context_limits: rules::family_limits(&id).or(declared),
            capabilities: rules::capabilities(&id, model_type),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn vision_identifier_supports_vision() {
        for id in [
            "llama-3.2-11b-vision-preview",
            "llama-guard-3-11b-vision",
            "some-vision-thing",
            "VISION-UPPER",
        ] {
            let detected = detect_model(id, 8192, "Meta", None);
            assert!(detected.metadata.capabilities.supports_vision, "{id}");
        }
    }

    #[test]
    fn falls_back_to_declared_context_window() {
        let detected = detect_model("gemma2-9b-it", 8192, "Google", None);
        let limits = detected.metadata.context_limits;
        assert_eq!(limits.max_input_tokens, Some(8192));
        assert_eq!(limits.max_output_tokens, None);
        assert_eq!(detected.metadata.model_type, ModelType::Chat);
    }

    #[test]
    fn family_output_limit_beats_raw() {
        let raw = json!({"max_completion_tokens": 1234});
        let detected = detect_model("openai/gpt-oss-120b", 131072, "OpenAI", Some(&raw));
        let limits = detected.metadata.context_limits;
        assert_eq!(limits.max_input_tokens, Some(131072));
        assert_eq!(limits.max_output_tokens, Some(65_536));
    }

    #[test]
    fn raw_completion_limit_used_without_family() {
        let raw = json!({"max_completion_tokens": 8192});
        let detected = detect_model("gemma2-9b-it", 8192, "Google", Some(&raw));
        assert_eq!(detected.metadata.context_limits.max_output_tokens, Some(8192));
    }

    #[test]
    fn zero_context_window_is_unknown() {
        let detected = detect_model("mystery", 0, "", None);
        assert_eq!(detected.metadata.context_limits.max_input_tokens, None);
        assert_eq!(detected.metadata.owner, "unknown");
    }

    #[test]
    fn owner_from_raw_when_argument_blank() {
        let raw = json!({"owned_by": "Alibaba Cloud"});
        let detected = detect_model("qwen/qwen3-32b", 131072, "  ", Some(&raw));
        assert_eq!(detected.metadata.owner, "Alibaba Cloud");
    }

    #[test]
    fn display_name_is_derived() {
        let detected = detect_model("groq/compound", 131072, "Groq", None);
        assert_eq!(detected.display_name, "Compound");
        assert_eq!(detected.metadata.model_type, ModelType::Compound);
        assert_eq!(detected.metadata.context_limits.max_output_tokens, Some(8192));
    }

    #[test]
    fn detection_is_deterministic() {
        let a = detect_model("moonshotai/kimi-k2-instruct", 131072, "Moonshot AI", None);
        let b = detect_model("moonshotai/kimi-k2-instruct", 131072, "Moonshot AI", None);
        assert_eq!(a, b);
        assert!(a.metadata.capabilities.supports_prompt_caching);
    }
}
