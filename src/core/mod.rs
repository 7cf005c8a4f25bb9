//! Core module - stored usage records and their aggregation

mod aggregator;
mod records;
mod types;

pub use aggregator::{
    aggregate_by_model, aggregate_daily, aggregate_sessions, compare_cost, summarize,
};
pub use records::{ParsedRecords, load_records, parse_records, resolve_entries};
pub use types::{
    DateFilter, DayBucket, LedgerEntry, ModelBucket, SessionBucket, Stats, Totals, UsageRecord,
};
