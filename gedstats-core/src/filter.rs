//! Working-set selection over the change stream
//!
//! Exactly one time-filter mode is active at a time: a trailing day window or
//! an explicit year set. Precedence is documented on [`QueryFilter`]: the day
//! window wins whenever it is a positive integer, regardless of whether a year
//! set was also supplied. Actor and tree filters are independent axes; an
//! empty allow-list means no restriction.

use crate::types::ChangeRecord;
use chrono::{DateTime, Datelike, Duration, Utc};

/// Filter applied to the change stream before any aggregation.
///
/// Time-filter precedence: when `last_days` is `Some(n)` with `n > 0`, the
/// `years` set is ignored entirely (never intersected or unioned with the day
/// window). Callers do not need to guarantee mutual exclusivity themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    /// Keep changes from the trailing N days; takes precedence over `years`
    pub last_days: Option<u32>,
    /// Keep changes whose calendar year is in this set; empty = no restriction
    pub years: Vec<i32>,
    /// Actor allow-list; empty = no restriction
    pub user_ids: Vec<i64>,
    /// Restrict to one tree; None = all trees
    pub tree: Option<String>,
}

impl QueryFilter {
    /// Filter with no restrictions (full history).
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the trailing `days` days.
    pub fn with_last_days(mut self, days: u32) -> Self {
        self.last_days = Some(days);
        self
    }

    /// Keep only changes made in the given calendar years.
    pub fn with_years(mut self, years: Vec<i32>) -> Self {
        self.years = years;
        self
    }

    /// Keep only changes by the given actors.
    pub fn with_user_ids(mut self, user_ids: Vec<i64>) -> Self {
        self.user_ids = user_ids;
        self
    }

    /// Keep only changes in the given tree.
    pub fn with_tree(mut self, tree: impl Into<String>) -> Self {
        self.tree = Some(tree.into());
        self
    }

    /// Whether the record passes every active axis, evaluated against `now`.
    pub fn matches(&self, record: &ChangeRecord, now: DateTime<Utc>) -> bool {
        if let Some(tree) = &self.tree {
            if record.tree != *tree {
                return false;
            }
        }

        if !self.user_ids.is_empty() {
            match record.user_id {
                Some(user_id) if self.user_ids.contains(&user_id) => {}
                _ => return false,
            }
        }

        self.time_matches(record.change_time, now)
    }

    /// Apply the filter to a record stream, returning the working set.
    pub fn apply(&self, records: Vec<ChangeRecord>, now: DateTime<Utc>) -> Vec<ChangeRecord> {
        if self.day_window_active() && !self.years.is_empty() {
            tracing::debug!(
                last_days = self.last_days,
                years = ?self.years,
                "Day window takes precedence; year set ignored"
            );
        }
        records
            .into_iter()
            .filter(|r| self.matches(r, now))
            .collect()
    }

    fn day_window_active(&self) -> bool {
        matches!(self.last_days, Some(n) if n > 0)
    }

    /// Whether a bare timestamp passes the active time mode. Used for event
    /// streams that carry no tree or actor axes of their own.
    pub fn time_matches(&self, change_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if let Some(days) = self.last_days {
            if days > 0 {
                let cutoff = now - Duration::days(days as i64);
                return change_time >= cutoff && change_time <= now;
            }
        }

        if !self.years.is_empty() {
            return self.years.contains(&change_time.year());
        }

        true
    }
}
