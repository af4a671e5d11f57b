//! Generic 2D pivot/heatmap cross-tabulation
//!
//! Two dimension selectors map each change record to discrete axis values; a
//! measure selector reduces each (x, y) group to a number. The output is
//! sparse (cells only where the measure is positive) plus the distinct label
//! set per axis in that dimension's canonical order - chronological/numeric
//! for time units, fixed enumeration for categorical ones. Never plain
//! lexicographic, which would scramble month abbreviations.

use crate::classify::classify_record_type;
use crate::labels::{month_label, weekday_label};
use crate::types::ChangeRecord;
use chrono::{Datelike, Timelike};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Axis selector for pivot queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Hour of day, 0-23
    Hour,
    /// Day of week, Monday-first
    Weekday,
    /// Day of month, 1-31
    DayOfMonth,
    /// Calendar month
    Month,
    /// Calendar year
    Year,
    /// Actor id; anonymous changes sort last
    Actor,
    /// Classified record type, canonical enumeration order
    RecordType,
}

impl Dimension {
    /// Map a record to (canonical sort key, stable label) on this axis.
    fn extract(&self, record: &ChangeRecord) -> (i64, String) {
        let time = record.change_time;
        match self {
            Dimension::Hour => (time.hour() as i64, format!("{:02}", time.hour())),
            Dimension::Weekday => {
                let index = time.weekday().num_days_from_monday();
                (index as i64, weekday_label(index).to_string())
            }
            Dimension::DayOfMonth => (time.day() as i64, time.day().to_string()),
            Dimension::Month => (time.month() as i64, month_label(time.month()).to_string()),
            Dimension::Year => (time.year() as i64, time.year().to_string()),
            Dimension::Actor => match record.user_id {
                Some(user_id) => (user_id, user_id.to_string()),
                None => (i64::MAX, "anonymous".to_string()),
            },
            Dimension::RecordType => {
                let record_type = classify_record_type(&record.xref, &record.new_gedcom);
                (record_type.order_index() as i64, record_type.display_name().to_string())
            }
        }
    }
}

/// Measure selector for pivot queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    /// Raw change-row count
    Changes,
    /// Distinct (tree, xref) records touched
    DistinctRecords,
    /// Distinct actors (anonymous counts as one)
    DistinctActors,
    /// Distinct calendar days with activity
    DistinctDays,
}

impl Measure {
    fn compute(&self, group: &[&ChangeRecord]) -> u64 {
        match self {
            Measure::Changes => group.len() as u64,
            Measure::DistinctRecords => group
                .iter()
                .map(|r| (r.tree.as_str(), r.xref.as_str()))
                .collect::<HashSet<_>>()
                .len() as u64,
            Measure::DistinctActors => group
                .iter()
                .map(|r| r.user_id)
                .collect::<HashSet<_>>()
                .len() as u64,
            Measure::DistinctDays => group
                .iter()
                .map(|r| r.change_time.date_naive())
                .collect::<HashSet<_>>()
                .len() as u64,
        }
    }
}

/// One populated heatmap cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotCell {
    pub x: String,
    pub y: String,
    pub value: u64,
}

/// Result of a 2D pivot query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PivotTable {
    /// Distinct x-axis labels observed, in canonical axis order
    pub x_labels: Vec<String>,
    /// Distinct y-axis labels observed, in canonical axis order
    pub y_labels: Vec<String>,
    /// Sparse cells, ordered by (x, y) canonical position; value > 0 always
    pub cells: Vec<PivotCell>,
}

/// Cross-tabulate a measure over two dimensions.
///
/// Empty input yields empty label sets and no cells.
pub fn pivot(
    records: &[ChangeRecord],
    x: Dimension,
    y: Dimension,
    measure: Measure,
) -> PivotTable {
    let mut x_labels: BTreeMap<i64, String> = BTreeMap::new();
    let mut y_labels: BTreeMap<i64, String> = BTreeMap::new();
    let mut groups: BTreeMap<(i64, i64), Vec<&ChangeRecord>> = BTreeMap::new();

    for record in records {
        let (x_key, x_label) = x.extract(record);
        let (y_key, y_label) = y.extract(record);
        x_labels.entry(x_key).or_insert(x_label);
        y_labels.entry(y_key).or_insert(y_label);
        groups.entry((x_key, y_key)).or_default().push(record);
    }

    let cells: Vec<PivotCell> = groups
        .iter()
        .filter_map(|(&(x_key, y_key), group)| {
            let value = measure.compute(group);
            (value > 0).then(|| PivotCell {
                x: x_labels[&x_key].clone(),
                y: y_labels[&y_key].clone(),
                value,
            })
        })
        .collect();

    PivotTable {
        x_labels: x_labels.into_values().collect(),
        y_labels: y_labels.into_values().collect(),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChangeStatus;
    use chrono::{DateTime, TimeZone, Utc};

    fn change(user_id: Option<i64>, xref: &str, time: DateTime<Utc>) -> ChangeRecord {
        ChangeRecord {
            change_id: 0,
            xref: xref.to_string(),
            tree: "demo".to_string(),
            user_id,
            change_time: time,
            status: ChangeStatus::Accepted,
            old_gedcom: String::new(),
            new_gedcom: format!("0 @{}@ INDI", xref),
        }
    }

    fn at(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_month_axis_is_chronological_not_lexicographic() {
        let records = vec![
            change(Some(1), "I1", at(2024, 4, 1, 9)),
            change(Some(1), "I2", at(2024, 8, 1, 9)),
            change(Some(1), "I3", at(2024, 12, 1, 9)),
        ];
        let table = pivot(&records, Dimension::Month, Dimension::Actor, Measure::Changes);
        // Lexicographic would give Apr, Aug, Dec anyway; add Feb to prove order
        assert_eq!(table.x_labels, vec!["Apr", "Aug", "Dec"]);

        let records = vec![
            change(Some(1), "I1", at(2024, 2, 1, 9)),
            change(Some(1), "I2", at(2024, 8, 1, 9)),
            change(Some(1), "I3", at(2024, 4, 1, 9)),
        ];
        let table = pivot(&records, Dimension::Month, Dimension::Actor, Measure::Changes);
        assert_eq!(table.x_labels, vec!["Feb", "Apr", "Aug"]);
    }

    #[test]
    fn test_labels_match_observed_values() {
        let records = vec![
            change(Some(1), "I1", at(2024, 1, 1, 9)),
            change(Some(2), "I2", at(2024, 1, 2, 14)),
        ];
        let table = pivot(&records, Dimension::Hour, Dimension::Actor, Measure::Changes);
        assert_eq!(table.x_labels, vec!["09", "14"]);
        assert_eq!(table.y_labels, vec!["1", "2"]);
        // Every cell is positive under the Changes measure
        assert!(table.cells.iter().all(|c| c.value > 0));
        assert_eq!(table.cells.len(), 2);
    }

    #[test]
    fn test_distinct_records_measure() {
        let time = at(2024, 1, 1, 9);
        let records = vec![
            change(Some(1), "I1", time),
            change(Some(1), "I1", time),
            change(Some(1), "I2", time),
        ];
        let table = pivot(
            &records,
            Dimension::Hour,
            Dimension::Actor,
            Measure::DistinctRecords,
        );
        assert_eq!(table.cells[0].value, 2);

        let table = pivot(&records, Dimension::Hour, Dimension::Actor, Measure::Changes);
        assert_eq!(table.cells[0].value, 3);
    }

    #[test]
    fn test_distinct_days_measure() {
        let records = vec![
            change(Some(1), "I1", at(2024, 1, 1, 9)),
            change(Some(1), "I2", at(2024, 1, 2, 9)),
            change(Some(1), "I3", at(2024, 1, 2, 9)),
        ];
        let table = pivot(
            &records,
            Dimension::Hour,
            Dimension::Actor,
            Measure::DistinctDays,
        );
        assert_eq!(table.cells[0].value, 2);
    }

    #[test]
    fn test_weekday_axis_monday_first() {
        // 2024-01-01 is a Monday, 2024-01-07 a Sunday
        let records = vec![
            change(Some(1), "I1", at(2024, 1, 7, 9)),
            change(Some(1), "I2", at(2024, 1, 1, 9)),
        ];
        let table = pivot(&records, Dimension::Weekday, Dimension::Actor, Measure::Changes);
        assert_eq!(table.x_labels, vec!["Mon", "Sun"]);
    }

    #[test]
    fn test_anonymous_actor_sorts_last() {
        let records = vec![
            change(None, "I1", at(2024, 1, 1, 9)),
            change(Some(7), "I2", at(2024, 1, 1, 9)),
        ];
        let table = pivot(&records, Dimension::Actor, Dimension::Year, Measure::Changes);
        assert_eq!(table.x_labels, vec!["7", "anonymous"]);
    }

    #[test]
    fn test_record_type_axis_canonical_order() {
        let mut family = change(Some(1), "F1", at(2024, 1, 1, 9));
        family.new_gedcom = "0 @F1@ FAM".to_string();
        let records = vec![family, change(Some(1), "I1", at(2024, 1, 1, 9))];
        let table = pivot(
            &records,
            Dimension::RecordType,
            Dimension::Year,
            Measure::Changes,
        );
        assert_eq!(table.x_labels, vec!["Individual", "Family"]);
    }

    #[test]
    fn test_empty_input() {
        let table = pivot(&[], Dimension::Hour, Dimension::Weekday, Measure::Changes);
        assert!(table.x_labels.is_empty());
        assert!(table.y_labels.is_empty());
        assert!(table.cells.is_empty());
    }
}
