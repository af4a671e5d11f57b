//! Per-change enrichment: record type, fact deltas, change-magnitude score
//!
//! All operations here fail soft. Unparseable GEDCOM degrades to `Other`,
//! empty fact lists, or a zero score - never an error. The underlying store
//! carries no guarantee of strictly well-formed text.

use crate::diff::{diff_lines, DiffOp};
use crate::gedcom::{extract_facts, strip_change_metadata, GedcomLine};
use crate::types::RecordType;
use std::collections::BTreeMap;

/// Fact-level summary of one change.
///
/// `edited` is the presence-intersection of tags seen on both sides (the tag
/// category was touched, not a matched-pair field diff). `added` and `deleted`
/// carry one entry per unit of positive count delta, so two new NAME lines
/// appear as `["NAME", "NAME"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactDelta {
    /// Tags present in both old and new extraction, sorted, deduplicated
    pub edited: Vec<String>,
    /// Tags whose count grew, one entry per added occurrence
    pub added: Vec<String>,
    /// Tags whose count shrank, one entry per removed occurrence
    pub deleted: Vec<String>,
}

impl FactDelta {
    /// Whether the change touched no facts at all.
    pub fn is_empty(&self) -> bool {
        self.edited.is_empty() && self.added.is_empty() && self.deleted.is_empty()
    }
}

/// Classify the record a change touched.
///
/// The level-0 header `0 @X@ TYPE` wins; if the text yields no header, fall
/// back to the legacy single-letter xref prefix convention; otherwise `Other`.
pub fn classify_record_type(xref: &str, new_gedcom: &str) -> RecordType {
    if let Some(tag) = header_tag(new_gedcom) {
        if let Some(record_type) = type_from_header_tag(tag) {
            return record_type;
        }
    }

    type_from_xref_prefix(xref).unwrap_or(RecordType::Other)
}

/// Tag of the first level-0 header line, if any.
fn header_tag(text: &str) -> Option<&str> {
    text.lines()
        .filter_map(GedcomLine::parse)
        .find(|line| line.level == 0 && line.xref.is_some())
        .map(|line| line.tag)
}

fn type_from_header_tag(tag: &str) -> Option<RecordType> {
    match tag {
        "INDI" => Some(RecordType::Individual),
        "FAM" => Some(RecordType::Family),
        "SOUR" => Some(RecordType::Source),
        "REPO" => Some(RecordType::Repository),
        "NOTE" => Some(RecordType::Note),
        "OBJE" => Some(RecordType::Media),
        "SUBM" => Some(RecordType::Submitter),
        "_LOC" => Some(RecordType::Location),
        "HEAD" => Some(RecordType::Header),
        _ => None,
    }
}

/// Legacy convention: record ids start with a letter naming their type.
fn type_from_xref_prefix(xref: &str) -> Option<RecordType> {
    let first = xref.chars().next()?;
    // Only applies when the rest of the id is numeric (e.g. "I123", "F45")
    if !xref[first.len_utf8()..].chars().all(|c| c.is_ascii_digit())
        || xref.len() == first.len_utf8()
    {
        return None;
    }
    match first {
        'I' => Some(RecordType::Individual),
        'F' => Some(RecordType::Family),
        'S' => Some(RecordType::Source),
        'R' => Some(RecordType::Repository),
        'N' => Some(RecordType::Note),
        'M' => Some(RecordType::Media),
        _ => None,
    }
}

/// Derive the edited/added/deleted fact multisets between two revisions.
pub fn diff_facts(old_gedcom: &str, new_gedcom: &str) -> FactDelta {
    let old_counts = tag_counts(&extract_facts(old_gedcom));
    let new_counts = tag_counts(&extract_facts(new_gedcom));

    let mut delta = FactDelta::default();

    for (tag, &new_count) in &new_counts {
        match old_counts.get(tag) {
            Some(&old_count) => {
                delta.edited.push(tag.clone());
                for _ in old_count..new_count {
                    delta.added.push(tag.clone());
                }
            }
            None => {
                for _ in 0..new_count {
                    delta.added.push(tag.clone());
                }
            }
        }
    }

    for (tag, &old_count) in &old_counts {
        let new_count = new_counts.get(tag).copied().unwrap_or(0);
        for _ in new_count..old_count {
            delta.deleted.push(tag.clone());
        }
    }

    delta
}

/// Count occurrences per tag; BTreeMap keeps delta output deterministic.
fn tag_counts(tags: &[String]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for tag in tags {
        *counts.entry(tag.clone()).or_insert(0) += 1;
    }
    counts
}

/// Change-magnitude score: inserted + deleted lines between the two revisions
/// after bookkeeping noise is stripped from both sides.
///
/// A score of 0 means no attributable content change (pure bookkeeping);
/// rankings must exclude such changes.
pub fn score_change(old_gedcom: &str, new_gedcom: &str) -> usize {
    let old_stripped = strip_change_metadata(old_gedcom);
    let new_stripped = strip_change_metadata(new_gedcom);

    let old_lines: Vec<&str> = old_stripped.lines().collect();
    let new_lines: Vec<&str> = new_stripped.lines().collect();

    diff_lines(&old_lines, &new_lines)
        .iter()
        .filter(|e| e.op != DiffOp::Retain)
        .count()
}
