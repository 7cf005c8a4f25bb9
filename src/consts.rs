/// Standard date format used throughout the codebase: "2025-01-15"
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fallback value when session ID, owner, or model name is unavailable
pub const UNKNOWN: &str = "unknown";

/// Number of most recent days kept by the daily cost view
pub const DAILY_BUCKET_LIMIT: usize = 30;
