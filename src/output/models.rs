use comfy_table::{Cell, Color};
use serde::Serialize;

use llmledger::models::{DetectedModel, ModelMetadata, ModelRecord};
use llmledger::pricing::TokenPricing;

use crate::output::format::{
    TableOptions, create_styled_table, format_compact, format_number, header_row, right_cell,
    styled_cell,
};

/// USD per million tokens, or `-` for unpriced models
fn price_per_million(price: f64) -> String {
    if price == 0.0 {
        "-".to_string()
    } else {
        format!("${:.2}", price * 1_000_000.0)
    }
}

fn limit_text(limit: Option<u64>, options: &TableOptions) -> String {
    match limit {
        Some(n) if options.compact => format_compact(n as i64, options.number_format),
        Some(n) => format_number(n as i64, options.number_format),
        None => "-".to_string(),
    }
}

fn capability_text(metadata: &ModelMetadata) -> String {
    let enabled = metadata.capabilities.enabled();
    if enabled.is_empty() {
        "-".to_string()
    } else {
        enabled.join(", ")
    }
}

pub(crate) fn print_model_detail(
    model_id: &str,
    detected: &DetectedModel,
    pricing: TokenPricing,
    options: TableOptions,
) {
    let metadata = &detected.metadata;
    let limits = &metadata.context_limits;

    let mut rows: Vec<(&str, String)> = vec![
        ("Display name", detected.display_name.clone()),
        ("Owner", metadata.owner.clone()),
        ("Type", metadata.model_type.as_str().to_string()),
        ("Max input tokens", limit_text(limits.max_input_tokens, &options)),
        ("Max output tokens", limit_text(limits.max_output_tokens, &options)),
    ];
    if let Some(size) = limits.max_image_size {
        rows.push(("Max image size", format!("{} MiB", size / (1024 * 1024))));
    }
    if let Some(count) = limits.max_image_count {
        rows.push(("Max images", count.to_string()));
    }
    if let Some(seconds) = limits.max_audio_duration {
        rows.push(("Max audio", format!("{} min", seconds / 60)));
    }
    rows.push(("Input price / 1M", price_per_million(pricing.input)));
    rows.push(("Output price / 1M", price_per_million(pricing.output)));
    rows.push(("Capabilities", capability_text(metadata)));

    let mut table = create_styled_table();
    table.set_header(header_row(&["Field", "Value"], options.use_color));
    for (field, value) in rows {
        table.add_row(vec![styled_cell(field, options.cyan(), false), Cell::new(value)]);
    }

    println!("\n  Model: {model_id}\n");
    println!("{table}");
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModelDetailOutput<'a> {
    id: &'a str,
    #[serde(flatten)]
    detected: &'a DetectedModel,
    pricing: TokenPricing,
}

pub(crate) fn output_model_json(
    model_id: &str,
    detected: &DetectedModel,
    pricing: TokenPricing,
) -> String {
    let output = ModelDetailOutput {
        id: model_id,
        detected,
        pricing,
    };
    super::format::to_pretty_json(&output, "{}")
}

pub(crate) fn print_model_table(records: &[ModelRecord], options: TableOptions) {
    let mut table = create_styled_table();
    let mut header = vec!["Model", "Type", "Owner", "Context", "Input/1M", "Output/1M"];
    if !options.compact {
        header.insert(1, "Name");
        header.push("Capabilities");
    }
    table.set_header(header_row(&header, options.use_color));

    for record in records {
        let metadata = &record.metadata;
        let id_color = if record.active {
            None
        } else {
            options.use_color.then_some(Color::DarkGrey)
        };
        let mut row = vec![styled_cell(&record.id, id_color, false)];
        if !options.compact {
            row.push(Cell::new(&record.display_name));
        }
        row.push(Cell::new(metadata.model_type.as_str()));
        row.push(Cell::new(&metadata.owner));
        row.push(right_cell(
            &limit_text(
                (record.context_window > 0).then_some(record.context_window),
                &options,
            ),
            None,
            false,
        ));
        row.push(right_cell(&price_per_million(record.pricing.input), options.green(), false));
        row.push(right_cell(&price_per_million(record.pricing.output), options.green(), false));
        if !options.compact {
            row.push(Cell::new(capability_text(metadata)));
        }
        table.add_row(row);
    }

    let active = records.iter().filter(|r| r.active).count();
    println!("\n  Models\n");
    println!("{table}");
    println!(
        "\n  {} models, {} active\n",
        format_number(records.len() as i64, options.number_format),
        format_number(active as i64, options.number_format)
    );
}

pub(crate) fn output_models_json(records: &[ModelRecord]) -> String {
    super::format::to_pretty_json(&records, "[]")
}
