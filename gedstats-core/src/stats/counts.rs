//! Grouped and calendar-bucketed counts

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Calendar unit for time-bucketed counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarUnit {
    Day,
    /// ISO-8601 week-of-year (Monday-start, first week contains the first Thursday)
    Week,
    Month,
    Year,
}

impl CalendarUnit {
    /// Bucket key for a timestamp. Keys are zero-padded so their
    /// lexicographic order is chronological.
    pub fn bucket_key(&self, time: DateTime<Utc>) -> String {
        match self {
            CalendarUnit::Day => time.format("%Y-%m-%d").to_string(),
            CalendarUnit::Week => {
                let week = time.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            CalendarUnit::Month => time.format("%Y-%m").to_string(),
            CalendarUnit::Year => time.format("%Y").to_string(),
        }
    }
}

/// Count items per key, descending by count with ascending key as tiebreak.
pub fn count_by<T, K, F>(items: &[T], key_fn: F) -> Vec<(K, u64)>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut counts: BTreeMap<K, u64> = BTreeMap::new();
    for item in items {
        *counts.entry(key_fn(item)).or_insert(0) += 1;
    }

    let mut grouped: Vec<(K, u64)> = counts.into_iter().collect();
    // BTreeMap iteration already yields ascending keys; a stable sort on
    // descending count keeps the key order as tiebreak.
    grouped.sort_by(|a, b| b.1.cmp(&a.1));
    grouped
}

/// Count timestamps per calendar bucket, ascending chronologically.
pub fn count_by_bucket<I>(times: I, unit: CalendarUnit) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for time in times {
        *counts.entry(unit.bucket_key(time)).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}
