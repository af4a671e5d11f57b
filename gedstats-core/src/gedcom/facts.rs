//! Fact extraction and bookkeeping-noise stripping
//!
//! Every save the host application makes rewrites the record's change-tracking
//! block (`1 CHAN` plus its sub-lines), so a raw diff would score every edit as
//! a content change. [`strip_change_metadata`] removes those blocks before
//! diffing or extraction; [`extract_facts`] then lists the level-1 tags that
//! count as genealogical content.

use super::line::GedcomLine;

/// Level-1 tags that are bookkeeping, not genealogical content.
///
/// CHAN is change tracking, OBJE links media objects, RIN/REFN are record
/// ids/reference numbers, RESN is a restriction marker.
const EXCLUDED_FACT_TAGS: &[&str] = &["CHAN", "OBJE", "RIN", "REFN", "RESN"];

/// The tag heading a change-tracking block.
const CHANGE_BLOCK_TAG: &str = "CHAN";

/// Remove every level-1 `CHAN` block, including all of its deeper sub-lines.
///
/// A block starts at a level-1 `CHAN` line with no trailing value and ends at
/// the next line of level 0 or 1 (which is kept). Sub-structure elsewhere is
/// preserved: a `2 DATE` under `1 BIRT` is content, a `2 DATE` under `1 CHAN`
/// is noise.
pub fn strip_change_metadata(text: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut in_change_block = false;

    for raw in text.lines() {
        match GedcomLine::parse(raw) {
            Some(line) => {
                if line.level <= 1 {
                    in_change_block =
                        line.level == 1 && line.tag == CHANGE_BLOCK_TAG && !line.has_value();
                    if !in_change_block {
                        kept.push(raw);
                    }
                } else if !in_change_block {
                    kept.push(raw);
                }
            }
            // Unparseable lines inside a CHAN block belong to the block;
            // elsewhere they pass through untouched.
            None => {
                if !in_change_block {
                    kept.push(raw);
                }
            }
        }
    }

    kept.join("\n")
}

/// Ordered list of level-1 fact tags in the given GEDCOM text.
///
/// Change-tracking noise is stripped first; the exclusion set never counts.
/// Malformed text degrades to an empty list, never an error.
pub fn extract_facts(text: &str) -> Vec<String> {
    strip_change_metadata(text)
        .lines()
        .filter_map(GedcomLine::parse)
        .filter(|line| line.level == 1 && line.is_fact_tag())
        .filter(|line| !EXCLUDED_FACT_TAGS.contains(&line.tag))
        .map(|line| line.tag.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = "0 @I1@ INDI\n\
        1 NAME John /Doe/\n\
        1 BIRT\n\
        2 DATE 1 JAN 1900\n\
        2 PLAC Springfield\n\
        1 CHAN\n\
        2 DATE 2 FEB 2024\n\
        3 TIME 10:15:00\n\
        2 _WT_USER admin\n\
        1 DEAT\n\
        2 DATE 3 MAR 1980";

    #[test]
    fn test_strip_removes_chan_block_only() {
        let stripped = strip_change_metadata(RECORD);
        assert!(!stripped.contains("CHAN"));
        assert!(!stripped.contains("_WT_USER"));
        assert!(!stripped.contains("TIME"));
        // The DATE under BIRT survives; only the one under CHAN is removed
        assert!(stripped.contains("2 DATE 1 JAN 1900"));
        assert!(!stripped.contains("2 DATE 2 FEB 2024"));
        // The fact after the block terminates it and is kept with sub-structure
        assert!(stripped.contains("1 DEAT"));
        assert!(stripped.contains("2 DATE 3 MAR 1980"));
    }

    #[test]
    fn test_chan_with_value_is_not_a_block() {
        // Only a bare level-1 CHAN heads a block
        let text = "0 @I1@ INDI\n1 CHAN odd payload\n2 DATE 1 JAN 2024\n1 BIRT";
        let stripped = strip_change_metadata(text);
        assert!(stripped.contains("1 CHAN odd payload"));
        assert!(stripped.contains("2 DATE 1 JAN 2024"));
    }

    #[test]
    fn test_extract_facts_excludes_bookkeeping() {
        let facts = extract_facts(RECORD);
        assert_eq!(facts, vec!["NAME", "BIRT", "DEAT"]);
    }

    #[test]
    fn test_extract_facts_exclusion_set() {
        let text = "0 @I1@ INDI\n1 NAME X\n1 OBJE @M1@\n1 RIN 42\n1 REFN 7\n1 RESN locked";
        assert_eq!(extract_facts(text), vec!["NAME"]);
    }

    #[test]
    fn test_extract_facts_custom_tags() {
        let text = "0 @I1@ INDI\n1 _MILT Army\n1 BIRT";
        assert_eq!(extract_facts(text), vec!["_MILT", "BIRT"]);
    }

    #[test]
    fn test_extract_facts_repeated_tags_preserved() {
        let text = "0 @I1@ INDI\n1 NAME A\n1 NAME B\n1 BIRT";
        assert_eq!(extract_facts(text), vec!["NAME", "NAME", "BIRT"]);
    }

    #[test]
    fn test_empty_and_malformed_input() {
        assert!(extract_facts("").is_empty());
        assert!(extract_facts("not gedcom at all").is_empty());
        assert_eq!(strip_change_metadata(""), "");
    }

    #[test]
    fn test_trailing_chan_block_terminates_at_eof() {
        let text = "0 @I1@ INDI\n1 BIRT\n1 CHAN\n2 DATE 1 JAN 2024";
        let stripped = strip_change_metadata(text);
        assert_eq!(stripped, "0 @I1@ INDI\n1 BIRT");
    }
}
