use std::collections::HashMap;

use comfy_table::{Cell, Color, Table};

use llmledger::core::{DayBucket, ModelBucket, SessionBucket, Stats, Totals};
use llmledger::pricing::format_cost;

use crate::output::format::{
    TableOptions, create_styled_table, format_number, header_cell, right_cell, styled_cell,
    to_pretty_json, token_cell,
};

const STATS_HEADERS: [&str; 5] = ["Calls", "Input", "Output", "Total", "Cost"];

fn stats_cells(
    stats: &Stats,
    options: &TableOptions,
    color: Option<Color>,
    bold: bool,
) -> Vec<Cell> {
    vec![
        right_cell(&format_number(stats.count, options.number_format), color, bold),
        token_cell(stats.input_tokens, options, color, bold),
        token_cell(stats.output_tokens, options, color, bold),
        token_cell(stats.total_tokens(), options, color, bold),
        right_cell(&format_cost(stats.cost), options.green(), bold),
    ]
}

fn build_header(labels: &[&str], options: &TableOptions) -> Vec<Cell> {
    labels
        .iter()
        .chain(STATS_HEADERS.iter())
        .map(|l| header_cell(l, options.use_color))
        .collect()
}

fn stats_json(stats: &Stats) -> serde_json::Value {
    serde_json::json!({
        "requests": stats.count,
        "input_tokens": stats.input_tokens,
        "output_tokens": stats.output_tokens,
        "total_tokens": stats.total_tokens(),
        "cost": stats.cost,
    })
}

fn merge_json(mut base: serde_json::Value, extra: serde_json::Value) -> serde_json::Value {
    if let (Some(target), serde_json::Value::Object(fields)) = (base.as_object_mut(), extra) {
        target.extend(fields);
    }
    base
}

fn sorted_models(models: &HashMap<String, Stats>) -> Vec<(&String, &Stats)> {
    let mut sorted: Vec<_> = models.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    sorted
}

fn add_total_row(table: &mut Table, stats: &Stats, padding: usize, options: &TableOptions) {
    let cyan = options.cyan();
    let mut row = vec![styled_cell("TOTAL", cyan, true)];
    row.extend((0..padding).map(|_| Cell::new("")));
    row.extend(stats_cells(stats, options, cyan, true));
    table.add_row(row);
}

fn print_skipped(skipped: usize, options: &TableOptions) {
    if skipped > 0 {
        println!(
            "  ({} malformed records skipped)\n",
            format_number(skipped as i64, options.number_format)
        );
    }
}

pub(crate) fn print_daily_table(
    days: &[DayBucket],
    breakdown: bool,
    skipped: usize,
    options: TableOptions,
) {
    let mut table = create_styled_table();
    if breakdown {
        table.set_header(build_header(&["Date", "Model"], &options));
    } else {
        table.set_header(build_header(&["Date"], &options));
    }

    let mut total = Stats::default();
    for day in days {
        total.add(&day.stats);
        if breakdown {
            for (i, (model, stats)) in sorted_models(&day.models).into_iter().enumerate() {
                let mut row = vec![
                    Cell::new(if i == 0 { day.date.as_str() } else { "" }),
                    Cell::new(model),
                ];
                row.extend(stats_cells(stats, &options, None, false));
                table.add_row(row);
            }
        } else {
            let mut row = vec![Cell::new(&day.date)];
            row.extend(stats_cells(&day.stats, &options, None, false));
            table.add_row(row);
        }
    }
    add_total_row(&mut table, &total, usize::from(breakdown), &options);

    println!("\n  Daily Usage\n");
    println!("{table}");
    println!(
        "\n  {} days\n",
        format_number(days.len() as i64, options.number_format)
    );
    print_skipped(skipped, &options);
}

pub(crate) fn output_daily_json(days: &[DayBucket], breakdown: bool) -> String {
    let output: Vec<serde_json::Value> = days
        .iter()
        .map(|day| {
            let mut obj =
                merge_json(serde_json::json!({ "date": day.date }), stats_json(&day.stats));
            let models = sorted_models(&day.models);
            obj["models"] = if breakdown {
                models
                    .into_iter()
                    .map(|(model, stats)| {
                        merge_json(serde_json::json!({ "model": model }), stats_json(stats))
                    })
                    .collect()
            } else {
                models.into_iter().map(|(model, _)| serde_json::json!(model)).collect()
            };
            obj
        })
        .collect();

    to_pretty_json(&output, "[]")
}

pub(crate) fn print_session_table(sessions: &[SessionBucket], options: TableOptions) {
    let mut table = create_styled_table();
    table.set_header(build_header(&["Session", "Last Activity", "Models"], &options));

    let mut total = Stats::default();
    for session in sessions {
        total.add(&session.stats);
        let models: Vec<&str> = sorted_models(&session.models)
            .into_iter()
            .map(|(m, _)| m.as_str())
            .collect();
        let models_text = if options.compact {
            format_number(models.len() as i64, options.number_format)
        } else {
            models.join(", ")
        };
        let mut row = vec![
            Cell::new(&session.session_id),
            Cell::new(&session.last_timestamp),
            Cell::new(models_text),
        ];
        row.extend(stats_cells(&session.stats, &options, None, false));
        table.add_row(row);
    }
    add_total_row(&mut table, &total, 2, &options);

    println!("\n  Session Usage\n");
    println!("{table}");
    println!(
        "\n  {} sessions\n",
        format_number(sessions.len() as i64, options.number_format)
    );
}

pub(crate) fn output_session_json(sessions: &[SessionBucket]) -> String {
    let output: Vec<serde_json::Value> = sessions
        .iter()
        .map(|session| {
            let models: Vec<&String> = sorted_models(&session.models)
                .into_iter()
                .map(|(m, _)| m)
                .collect();
            let mut obj = merge_json(
                serde_json::json!({
                    "session_id": session.session_id,
                    "first_timestamp": session.first_timestamp,
                    "last_timestamp": session.last_timestamp,
                }),
                stats_json(&session.stats),
            );
            obj["models"] = serde_json::json!(models);
            obj
        })
        .collect();

    to_pretty_json(&output, "[]")
}

pub(crate) fn print_model_usage_table(buckets: &[ModelBucket], options: TableOptions) {
    let mut table = create_styled_table();
    table.set_header(build_header(&["Model"], &options));

    let mut total = Stats::default();
    for bucket in buckets {
        total.add(&bucket.stats);
        let mut row = vec![Cell::new(&bucket.model)];
        row.extend(stats_cells(&bucket.stats, &options, None, false));
        table.add_row(row);
    }
    add_total_row(&mut table, &total, 0, &options);

    println!("\n  Usage by Model\n");
    println!("{table}");
}

pub(crate) fn output_model_usage_json(buckets: &[ModelBucket]) -> String {
    let output: Vec<serde_json::Value> = buckets
        .iter()
        .map(|bucket| {
            merge_json(serde_json::json!({ "model": bucket.model }), stats_json(&bucket.stats))
        })
        .collect();

    to_pretty_json(&output, "[]")
}

pub(crate) fn print_summary(totals: &Totals, skipped: usize, options: TableOptions) {
    let nf = options.number_format;
    let cyan = options.cyan();
    let stats = &totals.stats;

    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Metric", options.use_color),
        header_cell("Value", options.use_color),
    ]);
    let rows = [
        ("Requests", format_number(stats.count, nf)),
        ("Sessions", format_number(totals.sessions as i64, nf)),
        ("Models", format_number(totals.models as i64, nf)),
        ("Days", format_number(totals.days as i64, nf)),
        ("Input tokens", format_number(stats.input_tokens, nf)),
        ("Output tokens", format_number(stats.output_tokens, nf)),
        ("Total tokens", format_number(stats.total_tokens(), nf)),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), right_cell(&value, None, false)]);
    }
    if totals.undated > 0 {
        table.add_row(vec![
            Cell::new("Undated records"),
            right_cell(&format_number(totals.undated as i64, nf), None, false),
        ]);
    }
    table.add_row(vec![
        styled_cell("Total cost", cyan, true),
        right_cell(&format_cost(stats.cost), options.green(), true),
    ]);

    println!("\n  Usage Summary\n");
    println!("{table}");
    println!();
    print_skipped(skipped, &options);
}

pub(crate) fn output_summary_json(totals: &Totals, skipped: usize) -> String {
    let output = merge_json(
        stats_json(&totals.stats),
        serde_json::json!({
            "sessions": totals.sessions,
            "models": totals.models,
            "days": totals.days,
            "undated": totals.undated,
            "skipped": skipped,
        }),
    );
    to_pretty_json(&output, "{}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn stats(input: i64, output: i64, cost: f64) -> Stats {
        Stats {
            input_tokens: input,
            output_tokens: output,
            cost,
            count: 1,
        }
    }

    fn day(date: &str, models: &[(&str, Stats)]) -> DayBucket {
        let mut bucket = DayBucket {
            date: date.to_string(),
            ..DayBucket::default()
        };
        for (model, s) in models {
            bucket.add_stats((*model).to_string(), s);
        }
        bucket
    }

    #[test]
    fn daily_json_lists_sorted_models() {
        let days = vec![day(
            "2025-03-01",
            &[("b-model", stats(10, 5, 0.1)), ("a-model", stats(20, 5, 0.2))],
        )];
        let json: Value = serde_json::from_str(&output_daily_json(&days, false)).unwrap();
        assert_eq!(json[0]["date"], "2025-03-01");
        assert_eq!(json[0]["requests"], 2);
        assert_eq!(json[0]["total_tokens"], 40);
        assert_eq!(json[0]["models"], serde_json::json!(["a-model", "b-model"]));
    }

    #[test]
    fn daily_json_breakdown_has_per_model_stats() {
        let days = vec![day("2025-03-01", &[("m", stats(10, 5, 0.5))])];
        let json: Value = serde_json::from_str(&output_daily_json(&days, true)).unwrap();
        assert_eq!(json[0]["models"][0]["model"], "m");
        assert_eq!(json[0]["models"][0]["input_tokens"], 10);
        assert_eq!(json[0]["models"][0]["cost"], 0.5);
    }

    #[test]
    fn model_usage_json_keeps_order() {
        let buckets = vec![
            ModelBucket {
                model: "expensive".to_string(),
                stats: stats(1, 1, 2.0),
            },
            ModelBucket {
                model: "cheap".to_string(),
                stats: stats(1, 1, 1.0),
            },
        ];
        let json: Value = serde_json::from_str(&output_model_usage_json(&buckets)).unwrap();
        assert_eq!(json[0]["model"], "expensive");
        assert_eq!(json[1]["model"], "cheap");
    }

    #[test]
    fn summary_json_reports_counts() {
        let totals = Totals {
            stats: stats(100, 50, 0.25),
            sessions: 2,
            models: 1,
            days: 1,
            undated: 0,
        };
        let json: Value = serde_json::from_str(&output_summary_json(&totals, 3)).unwrap();
        assert_eq!(json["total_tokens"], 150);
        assert_eq!(json["sessions"], 2);
        assert_eq!(json["skipped"], 3);
        assert_eq!(json["cost"], 0.25);
    }
}
