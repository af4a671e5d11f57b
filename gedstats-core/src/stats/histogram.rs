//! Commit-size histogram
//!
//! A commit is the set of change rows sharing identical (actor, timestamp):
//! rows saved in the same atomic operation. The histogram uses fixed bins and
//! also reports mean, median, and mode over the raw per-commit sizes.

use crate::types::ChangeRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Fixed bin labels, in order.
pub const BIN_LABELS: [&str; 9] = ["1", "2", "3", "4", "5", "6-10", "11-20", "21-50", "51+"];

/// One histogram bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bin {
    /// Bin label ("1".."5", "6-10", "11-20", "21-50", "51+")
    pub label: &'static str,
    /// Number of commits in this bin
    pub count: u64,
}

/// Commit-size distribution over the filtered record set.
#[derive(Debug, Clone, Serialize)]
pub struct CommitSizeHistogram {
    /// Fixed bins; counts sum to `commits`
    pub bins: Vec<Bin>,
    /// Total number of distinct commits
    pub commits: u64,
    /// Mean commit size
    pub mean: f64,
    /// Median commit size (average of the two middle values for even counts)
    pub median: f64,
    /// Most frequent single size; ties break to the smallest value
    pub mode: u64,
}

/// Raw per-commit sizes: records grouped by exact (actor, timestamp).
///
/// Anonymous rows group under their own key rather than being dropped.
pub fn commit_sizes(records: &[ChangeRecord]) -> Vec<u64> {
    let mut groups: BTreeMap<(Option<i64>, i64), u64> = BTreeMap::new();
    for record in records {
        let key = (record.user_id, record.change_time.timestamp());
        *groups.entry(key).or_insert(0) += 1;
    }
    groups.into_values().collect()
}

fn bin_index(size: u64) -> usize {
    match size {
        0 => 0, // sizes are never 0 in practice; guard anyway
        1..=5 => (size - 1) as usize,
        6..=10 => 5,
        11..=20 => 6,
        21..=50 => 7,
        _ => 8,
    }
}

/// Build the histogram for the filtered record set.
///
/// Empty input yields zeroed bins and zero summary statistics.
pub fn commit_size_histogram(records: &[ChangeRecord]) -> CommitSizeHistogram {
    let mut sizes = commit_sizes(records);
    sizes.sort_unstable();

    let mut bins: Vec<Bin> = BIN_LABELS.iter().map(|label| Bin { label, count: 0 }).collect();
    for &size in &sizes {
        bins[bin_index(size)].count += 1;
    }

    CommitSizeHistogram {
        commits: sizes.len() as u64,
        mean: mean(&sizes),
        median: median_sorted(&sizes),
        mode: mode_sorted(&sizes),
        bins,
    }
}

fn mean(sizes: &[u64]) -> f64 {
    if sizes.is_empty() {
        return 0.0;
    }
    sizes.iter().sum::<u64>() as f64 / sizes.len() as f64
}

/// Median of an already-sorted slice; even counts average the two middle values.
fn median_sorted(sizes: &[u64]) -> f64 {
    match sizes.len() {
        0 => 0.0,
        n if n % 2 == 1 => sizes[n / 2] as f64,
        n => (sizes[n / 2 - 1] + sizes[n / 2]) as f64 / 2.0,
    }
}

/// Mode of an already-sorted slice; ties break to the smallest value.
fn mode_sorted(sizes: &[u64]) -> u64 {
    let mut best_value = 0u64;
    let mut best_run = 0usize;
    let mut i = 0;
    while i < sizes.len() {
        let value = sizes[i];
        let mut run = 1;
        while i + run < sizes.len() && sizes[i + run] == value {
            run += 1;
        }
        if run > best_run {
            best_run = run;
            best_value = value;
        }
        i += run;
    }
    best_value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChangeStatus;
    use chrono::{TimeZone, Utc};

    fn change_at(user_id: Option<i64>, ts: i64, n: u32) -> Vec<ChangeRecord> {
        (0..n)
            .map(|i| ChangeRecord {
                change_id: ts * 100 + i as i64,
                xref: format!("I{}", i),
                tree: "demo".to_string(),
                user_id,
                change_time: Utc.timestamp_opt(ts, 0).unwrap(),
                status: ChangeStatus::Accepted,
                old_gedcom: String::new(),
                new_gedcom: "0 @I1@ INDI".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_commit_grouping() {
        let mut records = change_at(Some(1), 1000, 3);
        records.extend(change_at(Some(1), 2000, 1));
        records.extend(change_at(Some(2), 1000, 2));
        // Same timestamp, different actor: separate commits
        let mut sizes = commit_sizes(&records);
        sizes.sort_unstable();
        assert_eq!(sizes, vec![1, 2, 3]);
    }

    #[test]
    fn test_anonymous_commits_kept() {
        let records = change_at(None, 1000, 2);
        assert_eq!(commit_sizes(&records), vec![2]);
    }

    #[test]
    fn test_bin_totals_equal_commit_count() {
        let mut records = Vec::new();
        for (i, n) in [1u32, 1, 2, 7, 15, 30, 80].iter().enumerate() {
            records.extend(change_at(Some(1), 1000 + i as i64 * 60, *n));
        }
        let histogram = commit_size_histogram(&records);
        let bin_total: u64 = histogram.bins.iter().map(|b| b.count).sum();
        assert_eq!(bin_total, histogram.commits);
        assert_eq!(histogram.commits, 7);
    }

    #[test]
    fn test_bin_edges() {
        assert_eq!(bin_index(1), 0);
        assert_eq!(bin_index(5), 4);
        assert_eq!(bin_index(6), 5);
        assert_eq!(bin_index(10), 5);
        assert_eq!(bin_index(11), 6);
        assert_eq!(bin_index(20), 6);
        assert_eq!(bin_index(21), 7);
        assert_eq!(bin_index(50), 7);
        assert_eq!(bin_index(51), 8);
        assert_eq!(bin_index(999), 8);
    }

    #[test]
    fn test_median_even_count() {
        // Sizes [1, 2, 2, 5] -> median (2+2)/2 = 2.0
        assert_eq!(median_sorted(&[1, 2, 2, 5]), 2.0);
        assert_eq!(median_sorted(&[1, 4]), 2.5);
        assert_eq!(median_sorted(&[3]), 3.0);
        assert_eq!(median_sorted(&[]), 0.0);
    }

    #[test]
    fn test_mode_smallest_value_wins_ties() {
        assert_eq!(mode_sorted(&[1, 1, 2, 2, 3]), 1);
        assert_eq!(mode_sorted(&[2, 3, 3, 3]), 3);
        assert_eq!(mode_sorted(&[]), 0);
    }

    #[test]
    fn test_empty_input() {
        let histogram = commit_size_histogram(&[]);
        assert_eq!(histogram.commits, 0);
        assert_eq!(histogram.mean, 0.0);
        assert_eq!(histogram.median, 0.0);
        assert_eq!(histogram.mode, 0);
        assert!(histogram.bins.iter().all(|b| b.count == 0));
        assert_eq!(histogram.bins.len(), BIN_LABELS.len());
    }
}
