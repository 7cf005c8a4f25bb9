use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One normalized billable tool invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolUsage {
    pub tool: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    /// Execution time in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl ToolUsage {
    pub fn counted(tool: impl Into<String>, action: Option<&str>, count: u64) -> Self {
        Self {
            tool: tool.into(),
            action: action.map(str::to_string),
            count: Some(count),
            duration: None,
        }
    }

    pub fn timed(tool: impl Into<String>, action: Option<&str>, duration: f64) -> Self {
        Self {
            tool: tool.into(),
            action: action.map(str::to_string),
            count: None,
            duration: Some(duration),
        }
    }
}

/// Executed-tools payload as stored or received from the provider.
///
/// The provider hands this over either as a JSON-encoded string or already
/// decoded, as one object or a list of objects. Deserialization picks the
/// variant from the JSON shape; `null` maps to `Option::None` at the use site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPayload {
    JsonText(String),
    ParsedList(Vec<Value>),
    Parsed(Map<String, Value>),
}

impl RawPayload {
    /// Classify a decoded JSON value. Scalars other than strings carry no
    /// tool data and yield `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(RawPayload::JsonText(text)),
            Value::Array(items) => Some(RawPayload::ParsedList(items)),
            Value::Object(map) => Some(RawPayload::Parsed(map)),
            Value::Null | Value::Bool(_) | Value::Number(_) => None,
        }
    }
}
