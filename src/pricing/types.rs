use serde::Serialize;

use crate::tools::ToolUsage;

/// Model token pricing (USD per token, not per million)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TokenPricing {
    pub input: f64,
    pub output: f64,
}

impl TokenPricing {
    pub(super) const fn per_million(input: f64, output: f64) -> Self {
        Self {
            input: input / 1_000_000.0,
            output: output / 1_000_000.0,
        }
    }

    pub fn is_free(&self) -> bool {
        self.input == 0.0 && self.output == 0.0
    }
}

/// A tool usage record with its computed cost
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCostBreakdown {
    #[serde(flatten)]
    pub usage: ToolUsage,
    pub cost: f64,
}

/// Batch tool cost: per-item breakdown in input order and the plain sum
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToolCostSummary {
    pub total: f64,
    pub breakdown: Vec<ToolCostBreakdown>,
}

/// Full cost of a single model response
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestCost {
    pub input_cost: f64,
    pub output_cost: f64,
    pub tool_cost: f64,
    pub total: f64,
    pub tools: Vec<ToolCostBreakdown>,
}
