//! CLI subcommand definitions

use std::path::PathBuf;

use clap::Subcommand;

/// Main CLI commands
#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Parse an executed-tools payload and price each tool call
    Tools {
        /// JSON file holding the payload (stdin when omitted or "-")
        file: Option<PathBuf>,
    },
    /// Price one model response from token counts and executed tools
    Cost {
        /// Model identifier, e.g. "llama-3.3-70b-versatile"
        #[arg(long)]
        model: String,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        input_tokens: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        output_tokens: i64,
        /// JSON file holding the executed-tools payload
        #[arg(long, value_name = "FILE")]
        tools: Option<PathBuf>,
    },
    /// Detect metadata and capabilities for a model identifier
    Model {
        /// Model identifier, e.g. "openai/gpt-oss-120b"
        id: String,
        /// Declared context window in tokens
        #[arg(long, default_value_t = 0)]
        context_window: u64,
        /// Owner reported by the provider
        #[arg(long, default_value = "")]
        owned_by: String,
        /// Provider listing entry for this model (JSON object)
        #[arg(long, value_name = "FILE")]
        raw: Option<PathBuf>,
    },
    /// Detect every model in a provider listing, or list the model store
    Models {
        /// Listing JSON (`{"data": [...]}` or an array); lists the store when omitted
        file: Option<PathBuf>,
        /// Upsert the detected models into the model store
        #[arg(long)]
        save: bool,
    },
    /// Show usage and cost per day (most recent 30 days)
    Daily {
        /// Record file, glob pattern, or "-" for stdin
        input: String,
    },
    /// Show usage and cost per session
    Session {
        /// Record file, glob pattern, or "-" for stdin
        input: String,
    },
    /// Show usage and cost per model
    ByModel {
        /// Record file, glob pattern, or "-" for stdin
        input: String,
    },
    /// Show overall totals
    Summary {
        /// Record file, glob pattern, or "-" for stdin
        input: String,
    },
}

/// Aggregated record views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UsageView {
    Daily,
    Session,
    ByModel,
    Summary,
}
