use tracing::debug;

use crate::tools::{ACTION_OPEN, BROWSER_SEARCH, CODE_INTERPRETER, ToolUsage};

use super::types::{ToolCostBreakdown, ToolCostSummary};

/// USD per browser search query
pub const BROWSER_SEARCH_PRICE: f64 = 0.005;
/// USD per browser page open
pub const BROWSER_OPEN_PRICE: f64 = 0.001;
/// USD per hour of code execution
pub const CODE_INTERPRETER_HOURLY_PRICE: f64 = 0.18;

/// Cost of one tool usage record. Unknown tools and missing units cost zero.
pub fn calculate_tool_cost(usage: &ToolUsage) -> f64 {
    let cost = match usage.tool.as_str() {
        BROWSER_SEARCH => {
            let Some(count) = usage.count else {
                return 0.0;
            };
            // Anything that is not an explicit open is billed as a search.
            let rate = match usage.action.as_deref() {
                Some(ACTION_OPEN) => BROWSER_OPEN_PRICE,
                _ => BROWSER_SEARCH_PRICE,
            };
            count as f64 * rate
        }
        CODE_INTERPRETER => {
            let Some(duration) = usage.duration else {
                return 0.0;
            };
            duration * (CODE_INTERPRETER_HOURLY_PRICE / 3600.0)
        }
        other => {
            debug!("No pricing for tool \"{other}\"");
            0.0
        }
    };

    if cost.is_finite() && cost > 0.0 { cost } else { 0.0 }
}

/// Price a list of tool usages, keeping input order in the breakdown
pub fn total_tool_cost(usages: &[ToolUsage]) -> ToolCostSummary {
    let breakdown: Vec<ToolCostBreakdown> = usages
        .iter()
        .map(|usage| ToolCostBreakdown {
            usage: usage.clone(),
            cost: calculate_tool_cost(usage),
        })
        .collect();
    let total = breakdown.iter().map(|item| item.cost).sum();

    ToolCostSummary { total, breakdown }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn browser(action: Option<&str>, count: Option<u64>) -> ToolUsage {
        ToolUsage {
            tool: "browser_search".to_string(),
            action: action.map(str::to_string),
            count,
            duration: None,
        }
    }

    fn code(duration: Option<f64>) -> ToolUsage {
        ToolUsage {
            tool: "code_interpreter".to_string(),
            action: Some("python".to_string()),
            count: None,
            duration,
        }
    }

    #[test]
    fn browser_search_scales_with_count() {
        for n in [0_u64, 1, 3, 250] {
            let cost = calculate_tool_cost(&browser(Some("browser.search"), Some(n)));
            assert!((cost - n as f64 * 0.005).abs() < 1e-12, "n={n}");
        }
    }

    #[test]
    fn browser_open_scales_with_count() {
        for n in [0_u64, 1, 7, 1000] {
            let cost = calculate_tool_cost(&browser(Some("browser.open"), Some(n)));
            assert!((cost - n as f64 * 0.001).abs() < 1e-12, "n={n}");
        }
    }

    #[test]
    fn browser_without_action_uses_search_rate() {
        assert!((calculate_tool_cost(&browser(None, Some(2))) - 0.01).abs() < 1e-12);
        assert!((calculate_tool_cost(&browser(Some("browser.find"), Some(2))) - 0.01).abs() < 1e-12);
    }

    #[test]
    fn browser_without_count_is_free() {
        assert_eq!(calculate_tool_cost(&browser(Some("browser.search"), None)), 0.0);
    }

    #[test]
    fn code_interpreter_bills_per_second() {
        let cost = calculate_tool_cost(&code(Some(3600.0)));
        assert!((cost - 0.18).abs() < 1e-12);
        let cost = calculate_tool_cost(&code(Some(10.0)));
        assert!((cost - 10.0 * 0.18 / 3600.0).abs() < 1e-15);
    }

    #[test]
    fn code_interpreter_without_duration_is_free() {
        assert_eq!(calculate_tool_cost(&code(None)), 0.0);
    }

    #[test]
    fn unknown_tool_is_free() {
        let usage = ToolUsage::counted("wolfram_alpha", None, 5);
        assert_eq!(calculate_tool_cost(&usage), 0.0);
    }

    #[test]
    fn total_of_empty_list() {
        let summary = total_tool_cost(&[]);
        assert_eq!(summary.total, 0.0);
        assert!(summary.breakdown.is_empty());
    }

    #[test]
    fn total_keeps_order_and_sums() {
        let usages = vec![
            code(Some(60.0)),
            browser(Some("browser.open"), Some(2)),
            ToolUsage::counted("visit_website", None, 1),
            browser(Some("browser.search"), Some(1)),
        ];
        let summary = total_tool_cost(&usages);
        let tools: Vec<&str> = summary
            .breakdown
            .iter()
            .map(|b| b.usage.tool.as_str())
            .collect();
        assert_eq!(
            tools,
            ["code_interpreter", "browser_search", "visit_website", "browser_search"]
        );
        let expected = 60.0 * 0.18 / 3600.0 + 0.002 + 0.0 + 0.005;
        assert!((summary.total - expected).abs() < 1e-12);

        let reversed: Vec<ToolUsage> = usages.into_iter().rev().collect();
        assert!((total_tool_cost(&reversed).total - expected).abs() < 1e-12);
    }

    #[test]
    fn breakdown_serializes_flat() {
        let summary = total_tool_cost(&[browser(Some("browser.open"), Some(1))]);
        let value = serde_json::to_value(&summary.breakdown[0]).unwrap();
        assert_eq!(value["tool"], "browser_search");
        assert_eq!(value["action"], "browser.open");
        assert_eq!(value["count"], 1);
        assert!((value["cost"].as_f64().unwrap() - 0.001).abs() < 1e-12);
    }
}
