//! GEDCOM text handling
//!
//! GEDCOM is a line-oriented, level-prefixed format:
//!
//! ```text
//! 0 @I1@ INDI
//! 1 NAME John /Doe/
//! 1 BIRT
//! 2 DATE 1 JAN 1900
//! 1 CHAN
//! 2 DATE 2 FEB 2024
//! 3 TIME 10:15:00
//! 2 _WT_USER admin
//! ```
//!
//! [`line`] is the single tokenizer for this grammar; [`facts`] builds on it to
//! strip change-tracking bookkeeping and extract the level-1 fact tags that
//! statistics count as genealogical content.

pub mod facts;
pub mod line;

pub use facts::{extract_facts, strip_change_metadata};
pub use line::GedcomLine;
