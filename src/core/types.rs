//! Core data types for stored usage records and their aggregates

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::tools::RawPayload;

/// Token and cost totals
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub input_tokens: i64,
    pub output_tokens: i64,
    /// USD
    pub cost: f64,
    /// Number of records folded in
    pub count: i64,
}

impl Stats {
    pub fn add(&mut self, other: &Stats) {
        self.input_tokens = self.input_tokens.saturating_add(other.input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(other.output_tokens);
        self.cost += other.cost;
        self.count = self.count.saturating_add(other.count);
    }

    pub fn total_tokens(&self) -> i64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Text column; numbers are kept as their decimal text, other shapes are dropped
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Token column; `null`, strings and other shapes count as zero
fn lenient_tokens<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
        .unwrap_or(0))
}

/// Cost column; anything but a number counts as absent
fn lenient_cost<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_f64())
}

/// Tools column; scalars carry no tool data
fn lenient_tools<'de, D>(deserializer: D) -> Result<Option<RawPayload>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawPayload::from_value(Value::deserialize(deserializer)?))
}

/// One stored per-message (or per-session) cost record, as exported from
/// the playground database.
///
/// A malformed column never rejects the row: it reads as absent (or zero for
/// token counts) so the rest of the record still counts.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    #[serde(default, alias = "sessionId", deserialize_with = "lenient_text")]
    pub session_id: Option<String>,
    #[serde(
        default,
        alias = "model_id",
        alias = "modelId",
        deserialize_with = "lenient_text"
    )]
    pub model: Option<String>,
    #[serde(
        default,
        alias = "timestamp",
        alias = "createdAt",
        deserialize_with = "lenient_text"
    )]
    pub created_at: Option<String>,
    #[serde(
        default,
        alias = "inputTokens",
        alias = "prompt_tokens",
        deserialize_with = "lenient_tokens"
    )]
    pub input_tokens: i64,
    #[serde(
        default,
        alias = "outputTokens",
        alias = "completion_tokens",
        deserialize_with = "lenient_tokens"
    )]
    pub output_tokens: i64,
    /// Stored cost; recomputed from the pricing tables when absent
    #[serde(default, deserialize_with = "lenient_cost")]
    pub cost: Option<f64>,
    #[serde(default, alias = "executedTools", deserialize_with = "lenient_tools")]
    pub executed_tools: Option<RawPayload>,
}

/// A record resolved for aggregation
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    /// Calendar date (YYYY-MM-DD) in the selected timezone, `None` if the
    /// record carries no readable timestamp
    pub date: Option<String>,
    pub timestamp: String,
    pub timestamp_ms: i64,
    pub session_id: String,
    pub model: String,
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub cost: f64,
}

impl LedgerEntry {
    pub fn to_stats(&self) -> Stats {
        Stats {
            input_tokens: self.input_tokens,
            output_tokens: self.output_tokens,
            cost: self.cost,
            count: 1,
        }
    }
}

/// Day-level aggregate
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct DayBucket {
    pub date: String,
    pub stats: Stats,
    pub models: HashMap<String, Stats>,
}

impl DayBucket {
    pub fn add_stats(&mut self, model: String, stats: &Stats) {
        self.stats.add(stats);
        self.models.entry(model).or_default().add(stats);
    }
}

/// Model-level aggregate
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ModelBucket {
    pub model: String,
    pub stats: Stats,
}

/// Session-level aggregate
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct SessionBucket {
    pub session_id: String,
    pub first_timestamp: String,
    pub last_timestamp: String,
    pub stats: Stats,
    pub models: HashMap<String, Stats>,
}

/// Grand totals over a record set
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub stats: Stats,
    pub sessions: usize,
    pub models: usize,
    pub days: usize,
    /// Records without a readable timestamp
    pub undated: usize,
}

/// Date filter for queries
#[derive(Debug, Clone, Default)]
pub struct DateFilter {
    pub since: Option<chrono::NaiveDate>,
    pub until: Option<chrono::NaiveDate>,
}

impl DateFilter {
    pub fn new(since: Option<chrono::NaiveDate>, until: Option<chrono::NaiveDate>) -> Self {
        Self { since, until }
    }

    pub fn is_unbounded(&self) -> bool {
        self.since.is_none() && self.until.is_none()
    }

    pub fn contains(&self, date: chrono::NaiveDate) -> bool {
        if let Some(s) = self.since
            && date < s
        {
            return false;
        }
        if let Some(u) = self.until
            && date > u
        {
            return false;
        }
        true
    }
}
