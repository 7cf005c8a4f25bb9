use serde::{Deserialize, Serialize};

/// Broad model family, assigned by identifier rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    #[default]
    Chat,
    Vision,
    Reasoning,
    Compound,
    Guard,
    Transcription,
    Tts,
}

impl ModelType {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelType::Chat => "chat",
            ModelType::Vision => "vision",
            ModelType::Reasoning => "reasoning",
            ModelType::Compound => "compound",
            ModelType::Guard => "guard",
            ModelType::Transcription => "transcription",
            ModelType::Tts => "tts",
        }
    }
}

/// Request size limits; `None` means no known limit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextLimits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_input_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u64>,
    /// Bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_image_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_image_count: Option<u32>,
    /// Seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_audio_duration: Option<u64>,
}

impl ContextLimits {
    /// Fill every unset field from `fallback`
    pub(super) fn or(self, fallback: ContextLimits) -> ContextLimits {
        ContextLimits {
            max_input_tokens: self.max_input_tokens.or(fallback.max_input_tokens),
            max_output_tokens: self.max_output_tokens.or(fallback.max_output_tokens),
            max_image_size: self.max_image_size.or(fallback.max_image_size),
            max_image_count: self.max_image_count.or(fallback.max_image_count),
            max_audio_duration: self.max_audio_duration.or(fallback.max_audio_duration),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub supports_tools: bool,
    pub supports_web_search: bool,
    pub supports_code_execution: bool,
    pub supports_browser_automation: bool,
    pub supports_visit_website: bool,
    pub supports_wolfram_alpha: bool,
    pub supports_vision: bool,
    pub supports_reasoning: bool,
    pub supports_audio: bool,
    pub supports_streaming: bool,
    pub supports_json_mode: bool,
    pub supports_prompt_caching: bool,
}

impl Capabilities {
    /// Names of the enabled capabilities, in declaration order
    pub fn enabled(&self) -> Vec<&'static str> {
        [
            (self.supports_tools, "tools"),
            (self.supports_web_search, "web_search"),
            (self.supports_code_execution, "code_execution"),
            (self.supports_browser_automation, "browser_automation"),
            (self.supports_visit_website, "visit_website"),
            (self.supports_wolfram_alpha, "wolfram_alpha"),
            (self.supports_vision, "vision"),
            (self.supports_reasoning, "reasoning"),
            (self.supports_audio, "audio"),
            (self.supports_streaming, "streaming"),
            (self.supports_json_mode, "json_mode"),
            (self.supports_prompt_caching, "prompt_caching"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}

/// Structured description of a model identifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    pub owner: String,
    pub model_type: ModelType,
    pub context_limits: ContextLimits,
    pub capabilities: Capabilities,
}

/// Detector output: metadata plus a human-readable name
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedModel {
    pub display_name: String,
    pub metadata: ModelMetadata,
}
