//! Identifier classification rules
//!
//! Type rules are evaluated in order and the first match wins, so broader
//! keywords sit below the narrower ones they overlap with (a guard model may
//! also mention "vision"). Capability rules all apply, in order, on top of
//! the type's base capabilities.

use super::types::{Capabilities, ContextLimits, ModelType};

pub(super) struct TypeRule {
    keywords: &'static [&'static str],
    model_type: ModelType,
}

pub(super) struct CapabilityRule {
    keywords: &'static [&'static str],
    apply: fn(&mut Capabilities),
}

pub(super) struct FamilyLimits {
    keywords: &'static [&'static str],
    limits: ContextLimits,
}

const VISION_KEYWORDS: &[&str] = &["vision", "llama-4-scout", "llama-4-maverick"];
const REASONING_KEYWORDS: &[&str] = &["reasoning", "deepseek-r1", "qwq", "qwen3", "gpt-oss"];

pub(super) const TYPE_RULES: &[TypeRule] = &[
    TypeRule {
        keywords: &["whisper"],
        model_type: ModelType::Transcription,
    },
    TypeRule {
        keywords: &["tts", "playai"],
        model_type: ModelType::Tts,
    },
    TypeRule {
        keywords: &["guard"],
        model_type: ModelType::Guard,
    },
    TypeRule {
        keywords: &["compound"],
        model_type: ModelType::Compound,
    },
    TypeRule {
        keywords: VISION_KEYWORDS,
        model_type: ModelType::Vision,
    },
    TypeRule {
        keywords: REASONING_KEYWORDS,
        model_type: ModelType::Reasoning,
    },
];

pub(super) const CAPABILITY_RULES: &[CapabilityRule] = &[
    CapabilityRule {
        keywords: VISION_KEYWORDS,
        apply: |caps| caps.supports_vision = true,
    },
    CapabilityRule {
        keywords: REASONING_KEYWORDS,
        apply: |caps| caps.supports_reasoning = true,
    },
    // Built-in browser_search and code_interpreter tools
    CapabilityRule {
        keywords: &["gpt-oss"],
        apply: |caps| {
            caps.supports_web_search = true;
            caps.supports_code_execution = true;
        },
    },
    CapabilityRule {
        keywords: &["kimi-k2", "gpt-oss"],
        apply: |caps| caps.supports_prompt_caching = true,
    },
];

const MIB: u64 = 1024 * 1024;

const fn output_limit(max_output_tokens: u64) -> ContextLimits {
    ContextLimits {
        max_input_tokens: None,
        max_output_tokens: Some(max_output_tokens),
        max_image_size: None,
        max_image_count: None,
        max_audio_duration: None,
    }
}

/// First match wins; unset fields fall back to the declared context window
pub(super) const FAMILY_LIMITS: &[FamilyLimits] = &[
    FamilyLimits {
        keywords: &["whisper"],
        limits: ContextLimits {
            max_input_tokens: None,
            max_output_tokens: None,
            max_image_size: None,
            max_image_count: None,
            max_audio_duration: Some(2 * 60 * 60),
        },
    },
    FamilyLimits {
        keywords: &["tts", "playai"],
        limits: ContextLimits {
            max_input_tokens: Some(10_000),
            max_output_tokens: None,
            max_image_size: None,
            max_image_count: None,
            max_audio_duration: None,
        },
    },
    FamilyLimits {
        keywords: &["guard"],
        limits: output_limit(1024),
    },
    FamilyLimits {
        keywords: &["compound"],
        limits: output_limit(8192),
    },
    FamilyLimits {
        keywords: VISION_KEYWORDS,
        limits: ContextLimits {
            max_input_tokens: None,
            max_output_tokens: Some(8192),
            max_image_size: Some(20 * MIB),
            max_image_count: Some(5),
            max_audio_duration: None,
        },
    },
    FamilyLimits {
        keywords: &["gpt-oss"],
        limits: output_limit(65_536),
    },
    FamilyLimits {
        keywords: &["qwen3-32b"],
        limits: output_limit(40_960),
    },
    FamilyLimits {
        keywords: &["kimi-k2"],
        limits: output_limit(16_384),
    },
    FamilyLimits {
        keywords: &["llama-3.3-70b-versatile"],
        limits: output_limit(32_768),
    },
    FamilyLimits {
        keywords: &["llama-3.1-8b-instant"],
        limits: output_limit(131_072),
    },
];

fn matches_any(keywords: &[&str], id: &str) -> bool {
    keywords.iter().any(|keyword| id.contains(keyword))
}

/// Classify a lower-cased identifier
pub(super) fn classify(id: &str) -> ModelType {
    TYPE_RULES
        .iter()
        .find(|rule| matches_any(rule.keywords, id))
        .map_or(ModelType::Chat, |rule| rule.model_type)
}

fn base_capabilities(model_type: ModelType) -> Capabilities {
    let chat = Capabilities {
        supports_tools: true,
        supports_streaming: true,
        supports_json_mode: true,
        ..Capabilities::default()
    };

    match model_type {
        ModelType::Chat | ModelType::Vision | ModelType::Reasoning => chat,
        ModelType::Compound => Capabilities {
            supports_tools: true,
            supports_web_search: true,
            supports_code_execution: true,
            supports_browser_automation: true,
            supports_visit_website: true,
            supports_wolfram_alpha: true,
            supports_streaming: true,
            ..Capabilities::default()
        },
        ModelType::Guard => Capabilities {
            supports_streaming: true,
            ..Capabilities::default()
        },
        ModelType::Transcription | ModelType::Tts => Capabilities {
            supports_audio: true,
            ..Capabilities::default()
        },
    }
}

/// Capabilities for a lower-cased identifier of the given type
pub(super) fn capabilities(id: &str, model_type: ModelType) -> Capabilities {
    let mut caps = base_capabilities(model_type);
    for rule in CAPABILITY_RULES {
        if matches_any(rule.keywords, id) {
            (rule.apply)(&mut caps);
        }
    }
    caps
}

/// Family-specific limit overrides for a lower-cased identifier
pub(super) fn family_limits(id: &str) -> ContextLimits {
    FAMILY_LIMITS
        .iter()
        .find(|family| matches_any(family.keywords, id))
        .map(|family| family.limits)
        .unwrap_or_default()
}
