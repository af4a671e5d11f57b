//! Tokenizer for the level-prefixed GEDCOM line grammar
//!
//! A line is `LEVEL [@XREF@] TAG [VALUE]`. This is the one place the grammar
//! lives; fact extraction and record classification both go through it instead
//! of pattern-matching raw text per call site.

/// One tokenized GEDCOM line, borrowing from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GedcomLine<'a> {
    /// Nesting level; 0 is the record header
    pub level: u8,
    /// Cross-reference id, present on record headers (`0 @I1@ INDI`)
    pub xref: Option<&'a str>,
    /// Tag token (NAME, BIRT, _WT_USER, ...)
    pub tag: &'a str,
    /// Everything after the tag; empty if the line has no payload
    pub value: &'a str,
}

impl<'a> GedcomLine<'a> {
    /// Tokenize one line. Returns `None` for blank or malformed lines;
    /// malformed input degrades, it never errors.
    pub fn parse(raw: &'a str) -> Option<GedcomLine<'a>> {
        let trimmed = raw.trim_start_matches(['\u{feff}', ' ', '\t']).trim_end();
        if trimmed.is_empty() {
            return None;
        }

        let mut parts = trimmed.splitn(2, ' ');
        let level: u8 = parts.next()?.parse().ok()?;
        let rest = parts.next()?.trim_start();

        // Optional @XREF@ between level and tag
        let (xref, rest) = if let Some(stripped) = rest.strip_prefix('@') {
            let (id, after) = stripped.split_once('@')?;
            if id.is_empty() {
                return None;
            }
            (Some(id), after.trim_start())
        } else {
            (None, rest)
        };

        if rest.is_empty() {
            return None;
        }

        let (tag, value) = match rest.split_once(' ') {
            Some((tag, value)) => (tag, value),
            None => (rest, ""),
        };

        Some(GedcomLine {
            level,
            xref,
            tag,
            value,
        })
    }

    /// Whether the tag names a fact: 3-5 uppercase ASCII letters, or an
    /// underscore followed by uppercase letters (custom/extension tags).
    pub fn is_fact_tag(&self) -> bool {
        let tag = self.tag.as_bytes();
        match tag.first() {
            Some(b'_') => tag.len() > 1 && tag[1..].iter().all(u8::is_ascii_uppercase),
            Some(_) => {
                (3..=5).contains(&tag.len()) && tag.iter().all(u8::is_ascii_uppercase)
            }
            None => false,
        }
    }

    /// Whether this line has a non-empty payload.
    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_line() {
        let line = GedcomLine::parse("0 @I123@ INDI").unwrap();
        assert_eq!(line.level, 0);
        assert_eq!(line.xref, Some("I123"));
        assert_eq!(line.tag, "INDI");
        assert_eq!(line.value, "");
    }

    #[test]
    fn test_parse_fact_line_with_value() {
        let line = GedcomLine::parse("1 NAME John /Doe/").unwrap();
        assert_eq!(line.level, 1);
        assert_eq!(line.xref, None);
        assert_eq!(line.tag, "NAME");
        assert_eq!(line.value, "John /Doe/");
    }

    #[test]
    fn test_parse_bare_fact_line() {
        let line = GedcomLine::parse("1 BIRT").unwrap();
        assert_eq!(line.tag, "BIRT");
        assert!(!line.has_value());
    }

    #[test]
    fn test_parse_malformed_lines() {
        assert_eq!(GedcomLine::parse(""), None);
        assert_eq!(GedcomLine::parse("   "), None);
        assert_eq!(GedcomLine::parse("NAME without level"), None);
        assert_eq!(GedcomLine::parse("1"), None);
        assert_eq!(GedcomLine::parse("0 @@ INDI"), None);
        assert_eq!(GedcomLine::parse("0 @I1 INDI"), None); // unterminated xref
    }

    #[test]
    fn test_is_fact_tag() {
        assert!(GedcomLine::parse("1 BIRT").unwrap().is_fact_tag());
        assert!(GedcomLine::parse("1 NAME x").unwrap().is_fact_tag());
        assert!(GedcomLine::parse("1 MARR").unwrap().is_fact_tag());
        assert!(GedcomLine::parse("1 _MILT").unwrap().is_fact_tag());

        // Too short, too long, or mixed case
        assert!(!GedcomLine::parse("1 NO x").unwrap().is_fact_tag());
        assert!(!GedcomLine::parse("1 TOOLONGX x").unwrap().is_fact_tag());
        assert!(!GedcomLine::parse("1 Name x").unwrap().is_fact_tag());
        assert!(!GedcomLine::parse("1 _ x").unwrap().is_fact_tag());
    }

    #[test]
    fn test_parse_tolerates_leading_whitespace_and_bom() {
        let line = GedcomLine::parse("\u{feff}0 HEAD").unwrap();
        assert_eq!(line.level, 0);
        assert_eq!(line.tag, "HEAD");

        let line = GedcomLine::parse("  2 DATE 1 JAN 1900").unwrap();
        assert_eq!(line.level, 2);
        assert_eq!(line.tag, "DATE");
    }
}
