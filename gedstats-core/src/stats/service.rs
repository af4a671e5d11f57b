//! Top-level statistics operations
//!
//! [`StatsService`] fetches the filtered working set from the store, runs the
//! pure aggregations, and shapes the results for JSON serialization. Each
//! operation is independent and composable; a caller requests any subset.
//! Nothing is cached across calls - re-running an operation on an unchanged
//! store yields identical output.

use crate::classify::{classify_record_type, diff_facts, score_change};
use crate::config::StatsConfig;
use crate::db::Database;
use crate::error::Result;
use crate::filter::QueryFilter;
use crate::gedcom::GedcomLine;
use crate::stats::{
    collaboration_graph, commit_size_histogram, count_by, count_by_bucket, moving_average, pivot,
    segment_sessions, CalendarUnit, CollaborationGraph, CommitSizeHistogram, Dimension, Measure,
    PivotTable,
};
use crate::types::{ChangeRecord, LogType, RecordType, Session};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Display name used when a change has no attributable actor.
const ANONYMOUS_LABEL: &str = "anonymous";

/// One grouped-count entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyCount {
    pub key: String,
    pub count: u64,
}

/// Grouped count per actor, with resolved display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserCount {
    pub user_id: Option<i64>,
    pub display_name: String,
    pub count: u64,
}

/// Grouped count per record type, with stable label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub record_type: RecordType,
    pub label: &'static str,
    pub count: u64,
}

/// Edit velocity: per-day change counts with a trailing moving average.
///
/// Days between the first and last observed change are filled with zero so
/// the average reflects real elapsed time, not just active days.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EditVelocity {
    pub days: Vec<String>,
    pub changes: Vec<u64>,
    pub moving_average: Vec<f64>,
    pub window: usize,
}

/// One session, with the actor's resolved display name.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub user_id: Option<i64>,
    pub display_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub changes: usize,
    pub duration_minutes: i64,
}

/// Per-actor session rollup.
#[derive(Debug, Clone, Serialize)]
pub struct UserSessionSummary {
    pub user_id: Option<i64>,
    pub display_name: String,
    pub sessions: u64,
    pub total_changes: u64,
    pub total_minutes: i64,
}

/// Session segmentation report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionsReport {
    pub sessions: Vec<SessionInfo>,
    pub per_user: Vec<UserSessionSummary>,
}

/// One entry of the largest-changes ranking.
#[derive(Debug, Clone, Serialize)]
pub struct LargestChange {
    pub change_id: i64,
    pub tree: String,
    pub xref: String,
    pub record_type: RecordType,
    /// Resolved record name, when the content allows it
    pub record_name: Option<String>,
    pub user_id: Option<i64>,
    pub display_name: String,
    pub change_time: DateTime<Utc>,
    /// Inserted + deleted content lines (always > 0 here)
    pub score: u64,
}

/// Per-tag fact count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactCount {
    pub tag: String,
    pub count: u64,
}

/// Added/edited/deleted fact-tag totals over the working set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FactActivity {
    pub added: Vec<FactCount>,
    pub edited: Vec<FactCount>,
    pub deleted: Vec<FactCount>,
}

/// Statistics facade over one store + filter combination.
pub struct StatsService<'a> {
    db: &'a Database,
    filter: QueryFilter,
    config: StatsConfig,
    now: DateTime<Utc>,
}

impl<'a> StatsService<'a> {
    pub fn new(db: &'a Database, filter: QueryFilter, config: StatsConfig) -> Self {
        Self {
            db,
            filter,
            config,
            now: Utc::now(),
        }
    }

    /// Pin the reference time for day-window filters (tests, reproducibility).
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Fetch the filtered working set. The tree scope is pushed down to the
    /// store; the remaining axes apply in memory.
    fn working_set(&self) -> Result<Vec<ChangeRecord>> {
        let records = self.db.changes(self.filter.tree.as_deref())?;
        let working_set = self.filter.apply(records, self.now);
        tracing::debug!(count = working_set.len(), "Built working set");
        Ok(working_set)
    }

    // ============================================
    // Grouped counts
    // ============================================

    /// Change counts per record type, descending.
    pub fn changes_by_type(&self) -> Result<Vec<TypeCount>> {
        let records = self.working_set()?;
        let counts = count_by(&records, |r| classify_record_type(&r.xref, &r.new_gedcom));
        Ok(counts
            .into_iter()
            .map(|(record_type, count)| TypeCount {
                record_type,
                label: record_type.display_name(),
                count,
            })
            .collect())
    }

    /// Change counts per actor, descending, with batched name resolution.
    pub fn changes_by_user(&self) -> Result<Vec<UserCount>> {
        let records = self.working_set()?;
        let counts = count_by(&records, |r| r.user_id);
        let names = self.resolve_names(counts.iter().filter_map(|(id, _)| *id))?;

        Ok(counts
            .into_iter()
            .map(|(user_id, count)| UserCount {
                user_id,
                display_name: display_name(&names, user_id),
                count,
            })
            .collect())
    }

    /// Change counts per tree, descending.
    pub fn changes_by_tree(&self) -> Result<Vec<KeyCount>> {
        let records = self.working_set()?;
        Ok(count_by(&records, |r| r.tree.clone())
            .into_iter()
            .map(|(key, count)| KeyCount { key, count })
            .collect())
    }

    /// Change counts per review status, descending.
    pub fn changes_by_status(&self) -> Result<Vec<KeyCount>> {
        let records = self.working_set()?;
        Ok(count_by(&records, |r| r.status)
            .into_iter()
            .map(|(status, count)| KeyCount {
                key: status.as_str().to_string(),
                count,
            })
            .collect())
    }

    // ============================================
    // Time series
    // ============================================

    /// Change counts per calendar bucket, chronological.
    pub fn changes_over_time(&self, unit: CalendarUnit) -> Result<Vec<KeyCount>> {
        let records = self.working_set()?;
        Ok(bucket_counts(records.iter().map(|r| r.change_time), unit))
    }

    /// Per-day change counts with a trailing moving average.
    pub fn edit_velocity(&self, window: Option<usize>) -> Result<EditVelocity> {
        let window = window.unwrap_or(self.config.moving_average_window);
        let records = self.working_set()?;

        let mut per_day: BTreeMap<chrono::NaiveDate, u64> = BTreeMap::new();
        for record in &records {
            *per_day.entry(record.change_time.date_naive()).or_insert(0) += 1;
        }

        let (Some(&first), Some(&last)) = (per_day.keys().next(), per_day.keys().next_back())
        else {
            return Ok(EditVelocity {
                window,
                ..EditVelocity::default()
            });
        };

        // Fill calendar gaps with zero so the average tracks elapsed time
        let mut days = Vec::new();
        let mut changes = Vec::new();
        let mut day = first;
        while day <= last {
            days.push(day.format("%Y-%m-%d").to_string());
            changes.push(per_day.get(&day).copied().unwrap_or(0));
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }

        let values: Vec<f64> = changes.iter().map(|&c| c as f64).collect();
        Ok(EditVelocity {
            moving_average: moving_average(&values, window),
            days,
            changes,
            window,
        })
    }

    // ============================================
    // Commits and sessions
    // ============================================

    /// Commit-size distribution over the working set.
    pub fn commit_size_histogram(&self) -> Result<CommitSizeHistogram> {
        let records = self.working_set()?;
        Ok(commit_size_histogram(&records))
    }

    /// Session segmentation with per-actor rollups.
    pub fn user_sessions(&self) -> Result<SessionsReport> {
        let records = self.working_set()?;
        let events: Vec<(Option<i64>, DateTime<Utc>)> = records
            .iter()
            .map(|r| (r.user_id, r.change_time))
            .collect();
        let gap = Duration::minutes(self.config.session_gap_minutes as i64);
        let sessions = segment_sessions(&events, gap);

        let names = self.resolve_names(sessions.iter().filter_map(|s| s.user_id))?;

        let mut per_user: BTreeMap<Option<i64>, UserSessionSummary> = BTreeMap::new();
        for session in &sessions {
            let entry = per_user
                .entry(session.user_id)
                .or_insert_with(|| UserSessionSummary {
                    user_id: session.user_id,
                    display_name: display_name(&names, session.user_id),
                    sessions: 0,
                    total_changes: 0,
                    total_minutes: 0,
                });
            entry.sessions += 1;
            entry.total_changes += session.changes as u64;
            entry.total_minutes += session.duration_minutes;
        }

        Ok(SessionsReport {
            sessions: sessions
                .into_iter()
                .map(|s| session_info(s, &names))
                .collect(),
            per_user: per_user.into_values().collect(),
        })
    }

    // ============================================
    // Graphs and pivots
    // ============================================

    /// Pairwise collaboration graph over shared touched records.
    pub fn collaboration(&self) -> Result<CollaborationGraph> {
        let records = self.working_set()?;
        Ok(collaboration_graph(&records, self.config.min_shared_records))
    }

    /// 2D heatmap cross-tabulation.
    pub fn heatmap(&self, x: Dimension, y: Dimension, measure: Measure) -> Result<PivotTable> {
        let records = self.working_set()?;
        Ok(pivot(&records, x, y, measure))
    }

    // ============================================
    // Change-content reports
    // ============================================

    /// The largest content changes, descending by score.
    ///
    /// Pure-bookkeeping changes (score 0) never rank. Names are resolved in
    /// one batched actor lookup; record-name lookups are bounded by `limit`.
    pub fn largest_changes(&self, limit: Option<usize>) -> Result<Vec<LargestChange>> {
        let limit = limit.unwrap_or(self.config.largest_changes_limit);
        let records = self.working_set()?;

        let mut scored: Vec<(u64, &ChangeRecord)> = records
            .iter()
            .map(|r| (score_change(&r.old_gedcom, &r.new_gedcom) as u64, r))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.change_id.cmp(&b.1.change_id)));
        scored.truncate(limit);

        let names = self.resolve_names(scored.iter().filter_map(|(_, r)| r.user_id))?;

        let mut ranking = Vec::with_capacity(scored.len());
        for (score, record) in scored {
            ranking.push(LargestChange {
                change_id: record.change_id,
                tree: record.tree.clone(),
                xref: record.xref.clone(),
                record_type: classify_record_type(&record.xref, &record.new_gedcom),
                record_name: self.resolve_record_name(record)?,
                user_id: record.user_id,
                display_name: display_name(&names, record.user_id),
                change_time: record.change_time,
                score,
            });
        }
        Ok(ranking)
    }

    /// Added/edited/deleted fact-tag totals over the working set.
    pub fn fact_activity(&self) -> Result<FactActivity> {
        let records = self.working_set()?;

        let mut added = Vec::new();
        let mut edited = Vec::new();
        let mut deleted = Vec::new();
        for record in &records {
            let delta = diff_facts(&record.old_gedcom, &record.new_gedcom);
            added.extend(delta.added);
            edited.extend(delta.edited);
            deleted.extend(delta.deleted);
        }

        Ok(FactActivity {
            added: fact_counts(&added),
            edited: fact_counts(&edited),
            deleted: fact_counts(&deleted),
        })
    }

    // ============================================
    // Supplementary streams
    // ============================================

    /// Login events per calendar bucket (security-log stream).
    pub fn logins_over_time(&self, unit: CalendarUnit) -> Result<Vec<KeyCount>> {
        self.logs_over_time(LogType::Auth, unit)
    }

    /// Search events per calendar bucket (security-log stream).
    pub fn searches_over_time(&self, unit: CalendarUnit) -> Result<Vec<KeyCount>> {
        self.logs_over_time(LogType::Search, unit)
    }

    fn logs_over_time(&self, log_type: LogType, unit: CalendarUnit) -> Result<Vec<KeyCount>> {
        let logs = self.db.logs(Some(log_type))?;
        let times = logs
            .iter()
            .filter(|l| self.filter.time_matches(l.log_time, self.now))
            .map(|l| l.log_time);
        Ok(bucket_counts(times, unit))
    }

    /// Messages per calendar bucket (messaging stream).
    pub fn messages_over_time(&self, unit: CalendarUnit) -> Result<Vec<KeyCount>> {
        let messages = self.db.messages()?;
        let times = messages
            .iter()
            .filter(|m| self.filter.time_matches(m.created, self.now))
            .map(|m| m.created);
        Ok(bucket_counts(times, unit))
    }

    // ============================================
    // Helpers
    // ============================================

    fn resolve_names(&self, ids: impl Iterator<Item = i64>) -> Result<HashMap<i64, String>> {
        let mut distinct: Vec<i64> = ids.collect();
        distinct.sort_unstable();
        distinct.dedup();
        self.db.actors_by_ids(&distinct)
    }

    /// Best-effort record name: the new text when present, else the stored
    /// record content (deletions).
    fn resolve_record_name(&self, record: &ChangeRecord) -> Result<Option<String>> {
        if let Some(name) = record_name(&record.new_gedcom) {
            return Ok(Some(name));
        }
        match self.db.record_text(&record.tree, &record.xref)? {
            Some(text) => Ok(record_name(&text)),
            None => Ok(None),
        }
    }
}

fn bucket_counts(
    times: impl Iterator<Item = DateTime<Utc>>,
    unit: CalendarUnit,
) -> Vec<KeyCount> {
    count_by_bucket(times, unit)
        .into_iter()
        .map(|(key, count)| KeyCount { key, count })
        .collect()
}

fn fact_counts(tags: &[String]) -> Vec<FactCount> {
    count_by(tags, |t| t.clone())
        .into_iter()
        .map(|(tag, count)| FactCount { tag, count })
        .collect()
}

fn display_name(names: &HashMap<i64, String>, user_id: Option<i64>) -> String {
    match user_id {
        Some(id) => names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("user {}", id)),
        None => ANONYMOUS_LABEL.to_string(),
    }
}

fn session_info(session: Session, names: &HashMap<i64, String>) -> SessionInfo {
    SessionInfo {
        display_name: display_name(names, session.user_id),
        user_id: session.user_id,
        start: session.start,
        end: session.end,
        changes: session.changes,
        duration_minutes: session.duration_minutes,
    }
}

/// First level-1 NAME value in the text, with GEDCOM surname slashes removed.
fn record_name(text: &str) -> Option<String> {
    text.lines()
        .filter_map(GedcomLine::parse)
        .find(|line| line.level == 1 && line.tag == "NAME" && line.has_value())
        .map(|line| line.value.replace('/', "").trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_name_strips_surname_slashes() {
        assert_eq!(
            record_name("0 @I1@ INDI\n1 NAME John /Doe/"),
            Some("John Doe".to_string())
        );
        assert_eq!(record_name("0 @I1@ INDI\n1 SEX M"), None);
        assert_eq!(record_name(""), None);
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut names = HashMap::new();
        names.insert(1, "Alice".to_string());
        assert_eq!(display_name(&names, Some(1)), "Alice");
        assert_eq!(display_name(&names, Some(9)), "user 9");
        assert_eq!(display_name(&names, None), "anonymous");
    }
}
