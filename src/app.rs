use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use llmledger::core::{
    DateFilter, aggregate_by_model, aggregate_daily, aggregate_sessions, load_records,
    resolve_entries, summarize,
};
use llmledger::error::AppError;
use llmledger::models::{ModelRecord, ModelStore, detect_model, parse_listing};
use llmledger::pricing::{calculate_request_cost, token_pricing, total_tool_cost};
use llmledger::tools::{RawPayload, ToolUsage, parse_executed_tools};
use llmledger::utils::{Timezone, parse_date};

use crate::cli::{Cli, Commands, UsageView};
use crate::config::Config;
use crate::output::{
    NumberFormat, TableOptions, output_daily_json, output_model_json, output_model_usage_json,
    output_models_json, output_request_cost_json, output_session_json, output_summary_json,
    output_tool_json, print_daily_table, print_model_detail, print_model_table,
    print_model_usage_table, print_request_cost, print_session_table, print_summary,
    print_tool_table,
};

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) filter: DateFilter,
    pub(crate) timezone: Timezone,
    pub(crate) options: TableOptions,
}

impl<'a> CommandContext<'a> {
    pub(crate) fn new(cli: &'a Cli) -> Result<Self, AppError> {
        let since = cli.since.as_deref().map(parse_date).transpose()?;
        let until = cli.until.as_deref().map(parse_date).transpose()?;
        Ok(Self {
            cli,
            filter: DateFilter::new(since, until),
            timezone: Timezone::parse(cli.timezone.as_deref())?,
            options: TableOptions {
                use_color: cli.use_color(),
                compact: cli.compact,
                number_format: NumberFormat::from_locale(cli.locale.as_deref())?,
            },
        })
    }

    fn db_path(&self) -> PathBuf {
        self.cli.db.clone().unwrap_or_else(Config::default_db_path)
    }
}

/// Read a file, or stdin for `None` and `-`
fn read_input(path: Option<&Path>) -> Result<String, AppError> {
    match path {
        Some(p) if p != Path::new("-") => {
            std::fs::read_to_string(p).map_err(|source| AppError::ReadInput {
                path: p.to_path_buf(),
                source,
            })
        }
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|source| AppError::ReadInput {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            Ok(text)
        }
    }
}

fn read_tools(path: &Path) -> Result<Vec<ToolUsage>, AppError> {
    let payload = RawPayload::JsonText(read_input(Some(path))?);
    Ok(parse_executed_tools(Some(&payload)))
}

fn handle_tools(file: Option<&Path>, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let tools = read_tools(file.unwrap_or(Path::new("-")))?;
    let summary = total_tool_cost(&tools);
    if ctx.cli.json {
        println!("{}", output_tool_json(&summary));
    } else {
        print_tool_table(&summary, ctx.options);
    }
    Ok(())
}

fn handle_cost(
    model: &str,
    input_tokens: i64,
    output_tokens: i64,
    tools_file: Option<&Path>,
    ctx: &CommandContext<'_>,
) -> Result<(), AppError> {
    let tools = match tools_file {
        Some(path) => read_tools(path)?,
        None => Vec::new(),
    };
    let cost = calculate_request_cost(model, input_tokens, output_tokens, &tools);
    if ctx.cli.json {
        println!(
            "{}",
            output_request_cost_json(model, input_tokens, output_tokens, &cost)
        );
    } else {
        print_request_cost(model, input_tokens, output_tokens, &cost, ctx.options);
    }
    Ok(())
}

fn handle_model(
    id: &str,
    context_window: u64,
    owned_by: &str,
    raw_file: Option<&Path>,
    ctx: &CommandContext<'_>,
) -> Result<(), AppError> {
    let raw = match raw_file {
        Some(path) => {
            let text = read_input(Some(path))?;
            let value: serde_json::Value =
                serde_json::from_str(&text).map_err(|source| AppError::InvalidJson {
                    path: path.to_path_buf(),
                    source,
                })?;
            Some(value)
        }
        None => None,
    };

    let detected = detect_model(id, context_window, owned_by, raw.as_ref());
    let pricing = token_pricing(id);
    if ctx.cli.json {
        println!("{}", output_model_json(id, &detected, pricing));
    } else {
        print_model_detail(id, &detected, pricing, ctx.options);
    }
    Ok(())
}

fn handle_models(
    file: Option<&Path>,
    save: bool,
    ctx: &CommandContext<'_>,
) -> Result<(), AppError> {
    let db_path = ctx.db_path();

    let records = match file {
        Some(path) => {
            let text = read_input(Some(path))?;
            let listing = parse_listing(&text).map_err(AppError::InvalidListing)?;
            let records: Vec<ModelRecord> =
                listing.iter().map(ModelRecord::from_provider).collect();
            if save {
                let mut store = ModelStore::open(&db_path)?;
                let written = store.upsert_all(&records)?;
                debug!("Upserted {written} models into {}", db_path.display());
                if !ctx.cli.json {
                    println!("Saved {written} models to {}", db_path.display());
                }
            }
            records
        }
        None => ModelStore::open(&db_path)?.list()?,
    };

    if ctx.cli.json {
        println!("{}", output_models_json(&records));
    } else if records.is_empty() {
        println!("No models found.");
    } else {
        print_model_table(&records, ctx.options);
    }
    Ok(())
}

fn handle_usage(input: &str, view: UsageView, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let parsed = load_records(input)?;
    debug!(
        "Loaded {} records from {input} ({} skipped)",
        parsed.records.len(),
        parsed.skipped
    );
    let entries = resolve_entries(parsed.records, &ctx.timezone, &ctx.filter);

    if entries.is_empty() && !ctx.cli.json {
        println!("No usage records found.");
        return Ok(());
    }

    let json = ctx.cli.json;
    match view {
        UsageView::Daily => {
            let days = aggregate_daily(entries);
            if json {
                println!("{}", output_daily_json(&days, ctx.cli.breakdown));
            } else {
                print_daily_table(&days, ctx.cli.breakdown, parsed.skipped, ctx.options);
            }
        }
        UsageView::Session => {
            let sessions = aggregate_sessions(entries);
            if json {
                println!("{}", output_session_json(&sessions));
            } else {
                print_session_table(&sessions, ctx.options);
            }
        }
        UsageView::ByModel => {
            let buckets = aggregate_by_model(entries);
            if json {
                println!("{}", output_model_usage_json(&buckets));
            } else {
                print_model_usage_table(&buckets, ctx.options);
            }
        }
        UsageView::Summary => {
            let totals = summarize(&entries);
            if json {
                println!("{}", output_summary_json(&totals, parsed.skipped));
            } else {
                print_summary(&totals, parsed.skipped, ctx.options);
            }
        }
    }
    Ok(())
}

/// Run the parsed command
pub(crate) fn run(cli: &Cli) -> Result<(), AppError> {
    let ctx = CommandContext::new(cli)?;

    match &cli.command {
        Commands::Tools { file } => handle_tools(file.as_deref(), &ctx),
        Commands::Cost {
            model,
            input_tokens,
            output_tokens,
            tools,
        } => handle_cost(model, *input_tokens, *output_tokens, tools.as_deref(), &ctx),
        Commands::Model {
            id,
            context_window,
            owned_by,
            raw,
        } => handle_model(id, *context_window, owned_by, raw.as_deref(), &ctx),
        Commands::Models { file, save } => handle_models(file.as_deref(), *save, &ctx),
        Commands::Daily { input } => handle_usage(input, UsageView::Daily, &ctx),
        Commands::Session { input } => handle_usage(input, UsageView::Session, &ctx),
        Commands::ByModel { input } => handle_usage(input, UsageView::ByModel, &ctx),
        Commands::Summary { input } => handle_usage(input, UsageView::Summary, &ctx),
    }
}
