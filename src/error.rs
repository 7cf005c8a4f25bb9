use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid date \"{input}\" (expected YYYYMMDD or YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("Unsupported locale: {input}")]
    UnsupportedLocale { input: String },

    #[error("Failed to read {}: {source}", .path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid glob pattern \"{pattern}\": {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("No input files match \"{pattern}\"")]
    NoInputFiles { pattern: String },

    #[error("Invalid model listing: {0}")]
    InvalidListing(#[source] serde_json::Error),

    #[error("Failed to create store directory {}: {source}", .path.display())]
    StoreDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Model store error: {0}")]
    Store(#[from] rusqlite::Error),
}
