//! Reductions over resolved ledger entries
//!
//! Grouping keys, sort orders and the daily cap are part of the analytics
//! contract: daily buckets ascend by date string and keep the most recent
//! `DAILY_BUCKET_LIMIT`, model buckets descend by summed cost.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::consts::DAILY_BUCKET_LIMIT;
use crate::core::types::{DayBucket, LedgerEntry, ModelBucket, SessionBucket, Stats, Totals};

/// Total order on costs with NaN last
pub fn compare_cost(a: f64, b: f64) -> Ordering {
    if a.is_nan() && b.is_nan() {
        Ordering::Equal
    } else if a.is_nan() {
        Ordering::Greater
    } else if b.is_nan() {
        Ordering::Less
    } else {
        a.partial_cmp(&b).unwrap_or(Ordering::Equal)
    }
}

/// Grand totals
pub fn summarize(entries: &[LedgerEntry]) -> Totals {
    let mut stats = Stats::default();
    let mut sessions = HashSet::new();
    let mut models = HashSet::new();
    let mut days = HashSet::new();
    let mut undated = 0;

    for entry in entries {
        stats.add(&entry.to_stats());
        sessions.insert(entry.session_id.as_str());
        models.insert(entry.model.as_str());
        match &entry.date {
            Some(date) => {
                days.insert(date.as_str());
            }
            None => undated += 1,
        }
    }

    Totals {
        stats,
        sessions: sessions.len(),
        models: models.len(),
        days: days.len(),
        undated,
    }
}

/// Aggregate entries by calendar date (consumes entries to avoid cloning).
/// Undated entries are left out.
pub fn aggregate_daily(entries: Vec<LedgerEntry>) -> Vec<DayBucket> {
    let mut day_map: HashMap<String, DayBucket> = HashMap::new();

    for entry in entries {
        let stats = entry.to_stats();
        let Some(date) = entry.date else {
            continue;
        };
        let day = day_map.entry(date.clone()).or_insert_with(|| DayBucket {
            date,
            ..DayBucket::default()
        });
        day.add_stats(entry.model, &stats);
    }

    let mut days: Vec<DayBucket> = day_map.into_values().collect();
    days.sort_by(|a, b| a.date.cmp(&b.date));
    if days.len() > DAILY_BUCKET_LIMIT {
        days.drain(..days.len() - DAILY_BUCKET_LIMIT);
    }
    days
}

/// Aggregate entries by model, most expensive first
pub fn aggregate_by_model(entries: Vec<LedgerEntry>) -> Vec<ModelBucket> {
    let mut model_map: HashMap<String, Stats> = HashMap::new();

    for entry in entries {
        let stats = entry.to_stats();
        model_map.entry(entry.model).or_default().add(&stats);
    }

    let mut models: Vec<ModelBucket> = model_map
        .into_iter()
        .map(|(model, stats)| ModelBucket { model, stats })
        .collect();
    models.sort_by(|a, b| {
        compare_cost(b.stats.cost, a.stats.cost).then_with(|| a.model.cmp(&b.model))
    });
    models
}

/// Session accumulator for building session buckets
#[derive(Debug, Default)]
struct SessionAccumulator {
    first_timestamp: String,
    last_timestamp: String,
    first_timestamp_ms: i64,
    last_timestamp_ms: i64,
    stats: Stats,
    models: HashMap<String, Stats>,
}

impl SessionAccumulator {
    fn add_entry(&mut self, entry: LedgerEntry) {
        let stats = entry.to_stats();
        self.stats.add(&stats);
        self.models.entry(entry.model).or_default().add(&stats);
        self.update_timestamps(entry.timestamp, entry.timestamp_ms);
    }

    fn update_timestamps(&mut self, timestamp: String, timestamp_ms: i64) {
        if timestamp.is_empty() {
            return;
        }
        if self.first_timestamp.is_empty() || timestamp_ms < self.first_timestamp_ms {
            self.first_timestamp.clone_from(&timestamp);
            self.first_timestamp_ms = timestamp_ms;
        }
        if self.last_timestamp.is_empty() || timestamp_ms > self.last_timestamp_ms {
            self.last_timestamp = timestamp;
            self.last_timestamp_ms = timestamp_ms;
        }
    }

    fn into_bucket(self, session_id: String) -> SessionBucket {
        SessionBucket {
            session_id,
            first_timestamp: self.first_timestamp,
            last_timestamp: self.last_timestamp,
            stats: self.stats,
            models: self.models,
        }
    }
}

/// Aggregate entries by session, most recently active first
pub fn aggregate_sessions(entries: Vec<LedgerEntry>) -> Vec<SessionBucket> {
    let mut sessions: HashMap<String, SessionAccumulator> = HashMap::new();

    for entry in entries {
        let session_id = entry.session_id.clone(); // one clone for HashMap key
        sessions.entry(session_id).or_default().add_entry(entry);
    }

    let mut buckets: Vec<(i64, SessionBucket)> = sessions
        .into_iter()
        .map(|(id, acc)| (acc.last_timestamp_ms, acc.into_bucket(id)))
        .collect();
    buckets.sort_by(|(a_ms, a), (b_ms, b)| {
        b_ms.cmp(a_ms).then_with(|| a.session_id.cmp(&b.session_id))
    });
    buckets.into_iter().map(|(_, bucket)| bucket).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn entry(date: Option<&str>, session: &str, model: &str, cost: f64) -> LedgerEntry {
        LedgerEntry {
            date: date.map(str::to_string),
            timestamp: date.map(|d| format!("{d}T12:00:00Z")).unwrap_or_default(),
            timestamp_ms: date
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                .and_then(|d| d.and_hms_opt(12, 0, 0))
                .map_or(0, |dt| dt.and_utc().timestamp_millis()),
            session_id: session.to_string(),
            model: model.to_string(),
            input_tokens: 100,
            output_tokens: 50,
            cost,
        }
    }

    #[test]
    fn summarize_counts_everything() {
        let entries = vec![
            entry(Some("2025-01-01"), "s1", "a", 0.5),
            entry(Some("2025-01-01"), "s2", "b", 0.25),
            entry(None, "s2", "a", 0.25),
        ];
        let totals = summarize(&entries);
        assert_eq!(totals.stats.count, 3);
        assert!((totals.stats.cost - 1.0).abs() < 1e-12);
        assert_eq!(totals.stats.total_tokens(), 450);
        assert_eq!(totals.sessions, 2);
        assert_eq!(totals.models, 2);
        assert_eq!(totals.days, 1);
        assert_eq!(totals.undated, 1);
    }

    #[test]
    fn summarize_empty() {
        assert_eq!(summarize(&[]), Totals::default());
    }

    #[test]
    fn daily_keeps_most_recent_thirty_ascending() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        // Insert out of order to make sure the sort does the work
        let mut entries = Vec::new();
        for offset in (0..35).rev() {
            let date = (start + Duration::days(offset)).format("%Y-%m-%d").to_string();
            entries.push(entry(Some(&date), "s", "m", 0.01));
        }

        let days = aggregate_daily(entries);
        assert_eq!(days.len(), 30);
        assert_eq!(days.first().unwrap().date, "2025-01-06");
        assert_eq!(days.last().unwrap().date, "2025-02-04");
        assert!(days.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn daily_groups_same_date_and_skips_undated() {
        let entries = vec![
            entry(Some("2025-01-02"), "s", "a", 0.1),
            entry(Some("2025-01-01"), "s", "b", 0.2),
            entry(Some("2025-01-02"), "s", "b", 0.3),
            entry(None, "s", "a", 9.0),
        ];
        let days = aggregate_daily(entries);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2025-01-01");
        assert_eq!(days[1].stats.count, 2);
        assert!((days[1].stats.cost - 0.4).abs() < 1e-12);
        assert_eq!(days[1].models.len(), 2);
    }

    #[test]
    fn by_model_sorted_descending_by_cost() {
        let entries = vec![
            entry(None, "s", "cheap", 0.01),
            entry(None, "s", "pricey", 1.0),
            entry(None, "s", "mid", 0.2),
            entry(None, "s", "mid", 0.2),
            entry(None, "s", "free-b", 0.0),
            entry(None, "s", "free-a", 0.0),
        ];
        let models = aggregate_by_model(entries);
        let names: Vec<&str> = models.iter().map(|m| m.model.as_str()).collect();
        assert_eq!(names, ["pricey", "mid", "cheap", "free-a", "free-b"]);
        assert_eq!(models[1].stats.count, 2);
        assert!(models.windows(2).all(|w| w[0].stats.cost >= w[1].stats.cost));
    }

    #[test]
    fn sessions_track_span_and_order() {
        let entries = vec![
            entry(Some("2025-01-03"), "old", "a", 0.1),
            entry(Some("2025-01-01"), "old", "b", 0.1),
            entry(Some("2025-01-05"), "new", "a", 0.1),
        ];
        let sessions = aggregate_sessions(entries);
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].session_id, "new");
        assert_eq!(sessions[1].first_timestamp, "2025-01-01T12:00:00Z");
        assert_eq!(sessions[1].last_timestamp, "2025-01-03T12:00:00Z");
        assert_eq!(sessions[1].models.len(), 2);
    }

    #[test]
    fn total_matches_sum_of_buckets() {
        let entries = vec![
            entry(Some("2025-01-01"), "s1", "a", 0.3),
            entry(Some("2025-01-02"), "s2", "b", 0.7),
            entry(Some("2025-01-02"), "s1", "a", 0.1),
        ];
        let total = summarize(&entries).stats.cost;
        let by_model: f64 = aggregate_by_model(entries.clone())
            .iter()
            .map(|m| m.stats.cost)
            .sum();
        let by_day: f64 = aggregate_daily(entries).iter().map(|d| d.stats.cost).sum();
        assert!((total - by_model).abs() < 1e-12);
        assert!((total - by_day).abs() < 1e-12);
    }

    #[test]
    fn compare_cost_nan_handling() {
        assert_eq!(compare_cost(f64::NAN, f64::NAN), Ordering::Equal);
        assert_eq!(compare_cost(f64::NAN, 1.0), Ordering::Greater);
        assert_eq!(compare_cost(1.0, 2.0), Ordering::Less);
    }
}
