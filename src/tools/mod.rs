//! Executed-tool normalization
//!
//! Turns the provider's "executed tools" payload into canonical billable
//! usage records.

mod parser;
mod types;

pub use parser::{parse_executed_tools, parse_executed_tools_value};
pub use types::{RawPayload, ToolUsage};

/// Tool name for provider-side web browsing
pub const BROWSER_SEARCH: &str = "browser_search";
/// Tool name for provider-side code execution
pub const CODE_INTERPRETER: &str = "code_interpreter";

/// Browser action for a search query (the default)
pub const ACTION_SEARCH: &str = "browser.search";
/// Browser action for opening a page
pub const ACTION_OPEN: &str = "browser.open";
/// Code interpreter action
pub const ACTION_PYTHON: &str = "python";
