use comfy_table::{Cell, Table};
use serde::Serialize;

use llmledger::pricing::{RequestCost, ToolCostBreakdown, ToolCostSummary, format_cost};

use crate::output::format::{
    TableOptions, create_styled_table, format_number, format_seconds, header_row, right_cell,
    styled_cell, token_cell,
};

fn quantity_text(item: &ToolCostBreakdown, options: &TableOptions) -> String {
    match (item.usage.count, item.usage.duration) {
        (Some(count), _) => format_number(count as i64, options.number_format),
        (None, Some(duration)) => format_seconds(duration, options.number_format),
        (None, None) => "-".to_string(),
    }
}

fn add_tool_rows(table: &mut Table, tools: &[ToolCostBreakdown], options: &TableOptions) {
    for item in tools {
        table.add_row(vec![
            Cell::new(&item.usage.tool),
            Cell::new(item.usage.action.as_deref().unwrap_or("-")),
            right_cell(&quantity_text(item, options), None, false),
            right_cell(&format_cost(item.cost), options.green(), false),
        ]);
    }
}

pub(crate) fn print_tool_table(summary: &ToolCostSummary, options: TableOptions) {
    if summary.breakdown.is_empty() {
        println!("No executed tools found.");
        return;
    }

    let mut table = create_styled_table();
    table.set_header(header_row(
        &["Tool", "Action", "Quantity", "Cost"],
        options.use_color,
    ));
    add_tool_rows(&mut table, &summary.breakdown, &options);
    table.add_row(vec![
        styled_cell("TOTAL", options.cyan(), true),
        Cell::new(""),
        right_cell(
            &format_number(summary.breakdown.len() as i64, options.number_format),
            options.cyan(),
            true,
        ),
        right_cell(&format_cost(summary.total), options.green(), true),
    ]);

    println!("\n  Executed Tools\n");
    println!("{table}");
}

pub(crate) fn output_tool_json(summary: &ToolCostSummary) -> String {
    super::format::to_pretty_json(summary, "{}")
}

#[derive(Serialize)]
struct RequestCostOutput<'a> {
    model: &'a str,
    input_tokens: i64,
    output_tokens: i64,
    #[serde(flatten)]
    cost: &'a RequestCost,
}

pub(crate) fn print_request_cost(
    model: &str,
    input_tokens: i64,
    output_tokens: i64,
    cost: &RequestCost,
    options: TableOptions,
) {
    let mut table = create_styled_table();
    table.set_header(header_row(&["Item", "Quantity", "Cost"], options.use_color));
    table.add_row(vec![
        Cell::new("Input tokens"),
        token_cell(input_tokens, &options, None, false),
        right_cell(&format_cost(cost.input_cost), options.green(), false),
    ]);
    table.add_row(vec![
        Cell::new("Output tokens"),
        token_cell(output_tokens, &options, None, false),
        right_cell(&format_cost(cost.output_cost), options.green(), false),
    ]);
    for item in &cost.tools {
        let label = match &item.usage.action {
            Some(action) => format!("{} ({action})", item.usage.tool),
            None => item.usage.tool.clone(),
        };
        table.add_row(vec![
            Cell::new(label),
            right_cell(&quantity_text(item, &options), None, false),
            right_cell(&format_cost(item.cost), options.green(), false),
        ]);
    }
    table.add_row(vec![
        styled_cell("TOTAL", options.cyan(), true),
        Cell::new(""),
        right_cell(&format_cost(cost.total), options.green(), true),
    ]);

    println!("\n  Request Cost: {model}\n");
    println!("{table}");
}

pub(crate) fn output_request_cost_json(
    model: &str,
    input_tokens: i64,
    output_tokens: i64,
    cost: &RequestCost,
) -> String {
    let output = RequestCostOutput {
        model,
        input_tokens,
        output_tokens,
        cost,
    };
    super::format::to_pretty_json(&output, "{}")
}
