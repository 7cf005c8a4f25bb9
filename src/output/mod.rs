mod format;
mod models;
mod tools;
mod usage;

pub(crate) use format::{NumberFormat, TableOptions};
pub(crate) use models::{
    output_model_json, output_models_json, print_model_detail, print_model_table,
};
pub(crate) use tools::{
    output_request_cost_json, output_tool_json, print_request_cost, print_tool_table,
};
pub(crate) use usage::{
    output_daily_json, output_model_usage_json, output_session_json, output_summary_json,
    print_daily_table, print_model_usage_table, print_session_table, print_summary,
};
