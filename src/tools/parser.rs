//! Executed-tools payload parser
//!
//! Malformed input never fails the caller: invalid JSON yields no usage and
//! invalid `arguments` are treated as an empty object.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::types::{RawPayload, ToolUsage};
use super::{ACTION_OPEN, ACTION_PYTHON, ACTION_SEARCH, BROWSER_SEARCH, CODE_INTERPRETER};

/// Seconds billed when the provider reports no execution time
const DEFAULT_DURATION_SECS: f64 = 1.0;

/// Normalize an executed-tools payload into usage records (input order kept)
pub fn parse_executed_tools(payload: Option<&RawPayload>) -> Vec<ToolUsage> {
    let Some(payload) = payload else {
        return Vec::new();
    };

    match payload {
        RawPayload::JsonText(text) => match serde_json::from_str::<Value>(text) {
            Ok(value) => parse_executed_tools_value(&value),
            Err(err) => {
                warn!("Ignoring malformed executed tools payload: {err}");
                Vec::new()
            }
        },
        RawPayload::Parsed(object) => parse_tool(object).into_iter().collect(),
        RawPayload::ParsedList(items) => parse_list(items),
    }
}

/// Normalize an already decoded payload value
pub fn parse_executed_tools_value(value: &Value) -> Vec<ToolUsage> {
    match value {
        Value::Object(object) => parse_tool(object).into_iter().collect(),
        Value::Array(items) => parse_list(items),
        Value::String(text) => parse_executed_tools(Some(&RawPayload::JsonText(text.clone()))),
        Value::Null | Value::Bool(_) | Value::Number(_) => Vec::new(),
    }
}

fn parse_list(items: &[Value]) -> Vec<ToolUsage> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match item.as_object() {
            Some(object) => parse_tool(object),
            None => {
                debug!("Skipping executed tool #{index}: not an object");
                None
            }
        })
        .collect()
}

fn parse_tool(raw: &Map<String, Value>) -> Option<ToolUsage> {
    let Some(tool_type) = raw.get("type").and_then(Value::as_str) else {
        debug!("Skipping executed tool without a type");
        return None;
    };
    let arguments = parse_arguments(raw.get("arguments"));

    let usage = match tool_type {
        BROWSER_SEARCH => {
            let action = match arguments.get("action").and_then(Value::as_str) {
                Some("open") => ACTION_OPEN,
                _ => ACTION_SEARCH,
            };
            ToolUsage::counted(BROWSER_SEARCH, Some(action), 1)
        }
        CODE_INTERPRETER | ACTION_PYTHON => {
            let duration = arguments
                .get("duration")
                .and_then(seconds)
                .or_else(|| raw.get("execution_time").and_then(seconds))
                .unwrap_or(DEFAULT_DURATION_SECS);
            ToolUsage::timed(CODE_INTERPRETER, Some(ACTION_PYTHON), duration)
        }
        other => {
            warn!("Unknown executed tool type \"{other}\", it will not be billed");
            ToolUsage::counted(other, None, 1)
        }
    };

    Some(usage)
}

/// Decode `arguments`, which arrives either JSON-encoded or as an object
fn parse_arguments(arguments: Option<&Value>) -> Map<String, Value> {
    match arguments {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => map,
            Ok(_) => Map::new(),
            Err(err) => {
                debug!("Treating malformed tool arguments as empty: {err}");
                Map::new()
            }
        },
        _ => Map::new(),
    }
}

/// Non-negative seconds from a number or numeric string
fn seconds(value: &Value) -> Option<f64> {
    let secs = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (secs.is_finite() && secs >= 0.0).then_some(secs)
}
