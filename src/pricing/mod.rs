//! Pricing tables and cost calculation
//!
//! All tables are immutable process-wide data. Lookups never fail: anything
//! unknown is priced at zero.

mod table;
mod tools;
mod types;

pub use table::token_pricing;
pub use tools::{
    BROWSER_OPEN_PRICE, BROWSER_SEARCH_PRICE, CODE_INTERPRETER_HOURLY_PRICE, calculate_tool_cost,
    total_tool_cost,
};
pub use types::{RequestCost, TokenPricing, ToolCostBreakdown, ToolCostSummary};

use crate::tools::ToolUsage;

/// Token cost for a model; negative counts are treated as zero
pub fn calculate_token_cost(model: &str, input_tokens: i64, output_tokens: i64) -> (f64, f64) {
    let pricing = token_pricing(model);
    (
        input_tokens.max(0) as f64 * pricing.input,
        output_tokens.max(0) as f64 * pricing.output,
    )
}

/// Complete cost of one model response: tokens plus executed tools
pub fn calculate_request_cost(
    model: &str,
    input_tokens: i64,
    output_tokens: i64,
    tools: &[ToolUsage],
) -> RequestCost {
    let (input_cost, output_cost) = calculate_token_cost(model, input_tokens, output_tokens);
    let tool_summary = total_tool_cost(tools);

    RequestCost {
        input_cost,
        output_cost,
        tool_cost: tool_summary.total,
        total: input_cost + output_cost + tool_summary.total,
        tools: tool_summary.breakdown,
    }
}

/// Smallest amount rendered with digits; anything below shows as `<$0.0001`
pub const MIN_DISPLAY_COST: f64 = 0.0001;

/// Render a dollar amount for display
pub fn format_cost(cost: f64) -> String {
    if cost < MIN_DISPLAY_COST {
        "<$0.0001".to_string()
    } else {
        format!("${cost:.4}")
    }
}
