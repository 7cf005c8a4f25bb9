//! Reading stored usage records and resolving them for aggregation

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rayon::prelude::*;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::consts::{DATE_FORMAT, UNKNOWN};
use crate::core::types::{DateFilter, LedgerEntry, UsageRecord};
use crate::error::AppError;
use crate::pricing::calculate_request_cost;
use crate::tools::parse_executed_tools;
use crate::utils::Timezone;

/// Records read from one or more inputs
#[derive(Debug, Default)]
pub struct ParsedRecords {
    pub records: Vec<UsageRecord>,
    /// Lines or elements that were not valid records
    pub skipped: usize,
}

impl ParsedRecords {
    fn merge(mut self, other: ParsedRecords) -> ParsedRecords {
        self.records.extend(other.records);
        self.skipped += other.skipped;
        self
    }
}

/// Parse a JSON array of records or JSON Lines
pub fn parse_records(text: &str) -> ParsedRecords {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        return match serde_json::from_str::<Vec<Value>>(trimmed) {
            Ok(items) => parse_values(items),
            Err(err) => {
                debug!("Input looks like a JSON array but does not parse: {err}");
                ParsedRecords {
                    records: Vec::new(),
                    skipped: 1,
                }
            }
        };
    }

    let mut parsed = ParsedRecords::default();
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<UsageRecord>(line) {
            Ok(record) => parsed.records.push(record),
            Err(err) => {
                debug!("Invalid record at line {}: {err}", line_no + 1);
                parsed.skipped += 1;
            }
        }
    }
    parsed
}

fn parse_values(items: Vec<Value>) -> ParsedRecords {
    let mut parsed = ParsedRecords::default();
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<UsageRecord>(item) {
            Ok(record) => parsed.records.push(record),
            Err(err) => {
                debug!("Invalid record #{index}: {err}");
                parsed.skipped += 1;
            }
        }
    }
    parsed
}

/// Load records from a file, `-` for stdin, or every file matching a glob
/// pattern (parsed in parallel)
pub fn load_records(input: &str) -> Result<ParsedRecords, AppError> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| AppError::ReadInput {
                path: PathBuf::from("<stdin>"),
                source,
            })?;
        return Ok(parse_records(&text));
    }

    let path = Path::new(input);
    if path.is_file() {
        return read_file(path);
    }

    let files = expand_pattern(input)?;
    debug!("Loading {} record files matching {input}", files.len());
    files
        .par_iter()
        .map(|file| read_file(file))
        .try_reduce(ParsedRecords::default, |a, b| Ok(a.merge(b)))
}

fn read_file(path: &Path) -> Result<ParsedRecords, AppError> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_records(&text))
}

fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>, AppError> {
    let paths = glob::glob(pattern).map_err(|e| AppError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    let mut files: Vec<PathBuf> = paths.flatten().filter(|p| p.is_file()).collect();
    if files.is_empty() {
        return Err(AppError::NoInputFiles {
            pattern: pattern.to_string(),
        });
    }
    files.sort();
    Ok(files)
}

/// Parse a stored timestamp: RFC 3339, SQLite's `YYYY-MM-DD HH:MM:SS` (UTC),
/// or a bare date (midnight UTC)
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl LedgerEntry {
    /// Resolve the calendar date in `timezone` and the record's cost.
    ///
    /// A stored cost wins when it is a finite non-negative number; otherwise
    /// the cost is recomputed from tokens and executed tools.
    pub fn from_record(record: UsageRecord, timezone: &Timezone) -> Self {
        let model = record
            .model
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());

        let cost = match record.cost {
            Some(cost) if cost.is_finite() && cost >= 0.0 => cost,
            _ => {
                let tools = parse_executed_tools(record.executed_tools.as_ref());
                calculate_request_cost(&model, record.input_tokens, record.output_tokens, &tools)
                    .total
            }
        };

        let timestamp = record.created_at.unwrap_or_default();
        let parsed = parse_timestamp(&timestamp);
        let date = parsed.map(|utc| {
            timezone
                .to_fixed_offset(utc)
                .date_naive()
                .format(DATE_FORMAT)
                .to_string()
        });

        LedgerEntry {
            date,
            timestamp_ms: parsed.map_or(0, |utc| utc.timestamp_millis()),
            timestamp,
            session_id: record
                .session_id
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            model,
            input_tokens: record.input_tokens.max(0),
            output_tokens: record.output_tokens.max(0),
            cost,
        }
    }
}

/// Resolve records and keep those inside the date filter. Undated entries
/// are kept only when the filter is unbounded.
pub fn resolve_entries(
    records: Vec<UsageRecord>,
    timezone: &Timezone,
    filter: &DateFilter,
) -> Vec<LedgerEntry> {
    records
        .into_iter()
        .map(|record| LedgerEntry::from_record(record, timezone))
        .filter(|entry| match &entry.date {
            Some(date) => NaiveDate::parse_from_str(date, DATE_FORMAT)
                .map(|d| filter.contains(d))
                .unwrap_or(false),
            None => filter.is_unbounded(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn utc() -> Timezone {
        Timezone::parse(Some("UTC")).unwrap()
    }

    #[test]
    fn parse_records_jsonl_skips_bad_lines() {
        let text = r#"{"model":"a","input_tokens":1}

not json
{"model":"b","output_tokens":2}
"#;
        let parsed = parse_records(text);
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn parse_records_array() {
        let parsed = parse_records(r#"  [{"model":"a"}, 5, {"model":"b"}]"#);
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn parse_records_broken_array() {
        let parsed = parse_records("[{");
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn timestamp_formats() {
        let expected = "2025-03-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(parse_timestamp("2025-03-01T10:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-01T12:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-01 10:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-01T10:00:00.000"), Some(expected));
        assert!(parse_timestamp("2025-03-01").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn stored_cost_wins() {
        let record = UsageRecord {
            model: Some("llama-3.3-70b-versatile".into()),
            input_tokens: 1_000_000,
            cost: Some(0.25),
            ..UsageRecord::default()
        };
        let entry = LedgerEntry::from_record(record, &utc());
        assert_eq!(entry.cost, 0.25);
    }

    #[test]
    fn malformed_columns_keep_stored_cost() {
        let text = r#"{"model":"a","cost":0.5,"executed_tools":42}
{"model":"b","cost":0.25,"input_tokens":null}
{"model":"c","cost":0.125,"executed_tools":true}
{"model":"llama-3.3-70b-versatile","input_tokens":1000000,"executed_tools":false}
"#;
        let parsed = parse_records(text);
        assert_eq!(parsed.records.len(), 4);
        assert_eq!(parsed.skipped, 0);

        let entries = resolve_entries(parsed.records, &utc(), &DateFilter::default());
        let costs: Vec<f64> = entries.iter().map(|e| e.cost).collect();
        assert_eq!(&costs[..3], &[0.5, 0.25, 0.125]);
        // a scalar tools column adds nothing to the recomputed cost
        assert!((costs[3] - 0.59).abs() < 1e-9);
        assert_eq!(entries[1].input_tokens, 0);
    }

    #[test]
    fn missing_cost_is_recomputed_with_tools() {
        let record = UsageRecord {
            model: Some("llama-3.3-70b-versatile".into()),
            input_tokens: 1_000_000,
            output_tokens: 0,
            executed_tools: Some(crate::tools::RawPayload::JsonText(
                r#"{"type":"browser_search","arguments":"{}"}"#.into(),
            )),
            ..UsageRecord::default()
        };
        let entry = LedgerEntry::from_record(record, &utc());
        assert!((entry.cost - (0.59 + 0.005)).abs() < 1e-9);
    }

    #[test]
    fn negative_stored_cost_is_recomputed() {
        let record = UsageRecord {
            model: Some("unpriced".into()),
            cost: Some(-3.0),
            ..UsageRecord::default()
        };
        assert_eq!(LedgerEntry::from_record(record, &utc()).cost, 0.0);
    }

    #[test]
    fn date_follows_timezone() {
        let record = UsageRecord {
            created_at: Some("2025-03-01T02:00:00Z".into()),
            ..UsageRecord::default()
        };
        let ny = Timezone::parse(Some("America/New_York")).unwrap();
        let entry = LedgerEntry::from_record(record.clone(), &ny);
        assert_eq!(entry.date.as_deref(), Some("2025-02-28"));
        let entry = LedgerEntry::from_record(record, &utc());
        assert_eq!(entry.date.as_deref(), Some("2025-03-01"));
        assert_eq!(entry.session_id, "unknown");
        assert_eq!(entry.model, "unknown");
    }

    #[test]
    fn resolve_entries_filters_dates() {
        let records = vec![
            UsageRecord {
                created_at: Some("2025-03-01".into()),
                ..UsageRecord::default()
            },
            UsageRecord {
                created_at: Some("2025-03-05".into()),
                ..UsageRecord::default()
            },
            UsageRecord::default(),
        ];
        let all = resolve_entries(records.clone(), &utc(), &DateFilter::default());
        assert_eq!(all.len(), 3);

        let since = NaiveDate::from_ymd_opt(2025, 3, 2);
        let some = resolve_entries(records, &utc(), &DateFilter::new(since, None));
        assert_eq!(some.len(), 1);
        assert_eq!(some[0].date.as_deref(), Some("2025-03-05"));
    }

    #[test]
    fn load_records_from_glob() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.jsonl"), "{\"model\":\"a\"}\n").unwrap();
        fs::write(dir.path().join("b.jsonl"), "{\"model\":\"b\"}\nbad\n").unwrap();
        fs::write(dir.path().join("c.txt"), "{\"model\":\"c\"}\n").unwrap();

        let pattern = format!("{}/*.jsonl", dir.path().display());
        let parsed = load_records(&pattern).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn load_records_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        fs::write(&path, r#"[{"model":"x","cost":1.5}]"#).unwrap();
        let parsed = load_records(path.to_str().unwrap()).unwrap();
        assert_eq!(parsed.records.len(), 1);
    }

    #[test]
    fn load_records_no_match_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.jsonl", dir.path().display());
        assert!(matches!(
            load_records(&pattern),
            Err(AppError::NoInputFiles { .. })
        ));
    }
}
