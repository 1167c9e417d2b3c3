//! Field and subfield extraction queries.
//!
//! A [`FieldQuery`] is parsed from a compact reference string:
//!
//! - an optional leader filter `L[<offset>]=<byte>;` that keeps only records
//!   whose leader has `<byte>` at `<offset>`
//! - zero or more colon-separated field references: a 3-character tag,
//!   optionally followed by subfield codes (`245`, `859aw`, `100a:700a`)
//!
//! Searching a record yields [`Hit`]s: whole field contents for references
//! without subfield codes, otherwise one hit per matching subfield value. An
//! optional regular expression drops hits whose value does not match.
//!
//! # Examples
//!
//! ```
//! use marcutil::{FieldQuery, Leader, Record};
//!
//! let record = Record::builder(Leader::default())
//!     .field("001", "ocm123")
//!     .field("650", " 0\x1FaNovels\x1FxAmerican")
//!     .build()?;
//!
//! let query: FieldQuery = "L[6]=a;650ax".parse()?;
//! let hits = query.search(&record).expect("leader matches");
//! let values: Vec<&[u8]> = hits.iter().map(|hit| hit.value).collect();
//! assert_eq!(values, vec![&b"Novels"[..], &b"American"[..]]);
//! assert_eq!(hits[0].control_number, b"ocm123");
//! # Ok::<(), marcutil::MarcError>(())
//! ```

use crate::error::{MarcError, Result};
use crate::leader::LEADER_LENGTH;
use crate::record::Record;
use crate::subfields::Subfields;
use regex::bytes::Regex;
use std::io::{self, Write};
use std::str::FromStr;

/// Keep only records whose leader has `value` at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderMatch {
    /// Leader position, below 24
    pub offset: usize,
    /// Required byte at that position
    pub value: u8,
}

/// One field reference: a tag and the subfield codes to extract from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReference {
    /// Field tag
    pub tag: [u8; 3],
    /// Subfield codes in the order given; empty means the whole field
    pub subfield_codes: Vec<u8>,
}

/// A parsed extraction query.
#[derive(Debug, Clone)]
pub struct FieldQuery {
    leader_match: Option<LeaderMatch>,
    references: Vec<FieldReference>,
    value_pattern: Option<Regex>,
}

/// One extracted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit<'a> {
    /// Content of the record's first 001 field, empty if it has none
    pub control_number: &'a [u8],
    /// Tag of the field the value came from
    pub tag: &'a [u8; 3],
    /// Subfield code, or `None` for a whole-field hit
    pub subfield_code: Option<u8>,
    /// Field content or subfield value
    pub value: &'a [u8],
}

impl Hit<'_> {
    /// Write the hit as one output line.
    ///
    /// Whole-field hits are written as the bare content; subfield hits as
    /// `<control number>:<code>:<value>`. Bytes are written unchanged.
    ///
    /// # Errors
    ///
    /// Returns any error from `out`.
    pub fn write_line<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        if let Some(code) = self.subfield_code {
            out.write_all(self.control_number)?;
            out.write_all(&[b':', code, b':'])?;
        }
        out.write_all(self.value)?;
        out.write_all(b"\n")
    }
}

impl FieldQuery {
    /// Parse a query from its reference string.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::InvalidQuery`] if the leader filter is malformed or
    /// out of range, a field reference is shorter than 3 characters, or the
    /// query is empty.
    pub fn parse(reference: &str) -> Result<Self> {
        let (leader_match, rest) = if reference.starts_with("L[") {
            let (leader_match, rest) = parse_leader_match(reference)?;
            (Some(leader_match), rest)
        } else {
            (None, reference)
        };

        let references = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split(':')
                .map(parse_field_reference)
                .collect::<Result<Vec<_>>>()?
        };

        if leader_match.is_none() && references.is_empty() {
            return Err(MarcError::InvalidQuery("empty field reference".to_string()));
        }

        Ok(FieldQuery {
            leader_match,
            references,
            value_pattern: None,
        })
    }

    /// Keep only hits whose value matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::InvalidQuery`] if `pattern` is not a valid regular expression.
    pub fn with_value_pattern(mut self, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            MarcError::InvalidQuery(format!("bad value pattern \"{pattern}\": {e}"))
        })?;
        self.value_pattern = Some(regex);
        Ok(self)
    }

    /// The leader filter, if any.
    #[must_use]
    pub fn leader_match(&self) -> Option<LeaderMatch> {
        self.leader_match
    }

    /// The field references in the order given.
    #[must_use]
    pub fn references(&self) -> &[FieldReference] {
        &self.references
    }

    /// Whether the record passes the leader filter.
    #[must_use]
    pub fn accepts_leader(&self, record: &Record) -> bool {
        self.leader_match
            .map_or(true, |m| record.leader().get(m.offset) == Some(m.value))
    }

    /// Extract the values this query selects from `record`.
    ///
    /// Returns `None` if the leader filter rejects the record. Hits are ordered
    /// by reference, then by field position, then by subfield code in the
    /// order the reference lists them, then by subfield position.
    #[must_use]
    pub fn search<'r>(&self, record: &'r Record) -> Option<Vec<Hit<'r>>> {
        if !self.accepts_leader(record) {
            return None;
        }

        let control_number = record.control_number().unwrap_or_default();
        let mut hits = Vec::new();

        for reference in &self.references {
            for (entry, content) in record.fields() {
                if !entry.has_tag(reference.tag) {
                    continue;
                }

                if reference.subfield_codes.is_empty() {
                    hits.push(Hit {
                        control_number,
                        tag: entry.tag(),
                        subfield_code: None,
                        value: content,
                    });
                    continue;
                }

                let subfields = Subfields::parse(content);
                for &code in &reference.subfield_codes {
                    hits.extend(subfields.values_for(code).map(|value| Hit {
                        control_number,
                        tag: entry.tag(),
                        subfield_code: Some(code),
                        value,
                    }));
                }
            }
        }

        if let Some(pattern) = &self.value_pattern {
            hits.retain(|hit| pattern.is_match(hit.value));
        }
        Some(hits)
    }

    /// Whether `record` matches: it passes the leader filter and, if the query
    /// names fields, yields at least one hit.
    #[must_use]
    pub fn is_match(&self, record: &Record) -> bool {
        self.search(record)
            .is_some_and(|hits| self.references.is_empty() || !hits.is_empty())
    }
}

impl FromStr for FieldQuery {
    type Err = MarcError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn parse_leader_match(reference: &str) -> Result<(LeaderMatch, &str)> {
    let bad = || MarcError::InvalidQuery("bad leader match expression".to_string());

    let rest = reference.strip_prefix("L[").ok_or_else(bad)?;
    let close = rest.find(']').ok_or_else(bad)?;
    let offset: usize = rest[..close].parse().map_err(|_| bad())?;
    if offset >= LEADER_LENGTH {
        return Err(MarcError::InvalidQuery(format!(
            "leader match offset ({offset}) exceeds leader length ({LEADER_LENGTH})"
        )));
    }

    let rest = rest[close + 1..].strip_prefix('=').ok_or_else(bad)?;
    let value = match rest.as_bytes().first() {
        Some(b';') | None => return Err(bad()),
        Some(&value) => value,
    };
    if rest.as_bytes().get(1) != Some(&b';') {
        return Err(MarcError::InvalidQuery(
            "missing ';' after leader match expression".to_string(),
        ));
    }

    Ok((LeaderMatch { offset, value }, &rest[2..]))
}

fn parse_field_reference(reference: &str) -> Result<FieldReference> {
    let bytes = reference.as_bytes();
    if bytes.len() < 3 {
        return Err(MarcError::InvalidQuery(format!(
            "bad field pattern \"{reference}\", must be at least 3 characters in length"
        )));
    }

    Ok(FieldReference {
        tag: [bytes[0], bytes[1], bytes[2]],
        subfield_codes: bytes[3..].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leader::Leader;

    fn create_realistic_record() -> Record {
        Record::builder(Leader::default())
            .field("001", "ocm42")
            .field("245", "10\x1FaThe Great Gatsby\x1FcF. Scott Fitzgerald")
            .field("650", " 0\x1FaNovels\x1FxAmerican")
            .field("650", " 0\x1FaComing of age\x1FxFiction")
            .field("700", "1 \x1FaFitzgerald, F. Scott\x1Fd1896-1940")
            .build()
            .unwrap()
    }

    fn values<'a>(hits: &[Hit<'a>]) -> Vec<&'a [u8]> {
        hits.iter().map(|hit| hit.value).collect()
    }

    #[test]
    fn test_parse_tag_only() {
        let query = FieldQuery::parse("245").unwrap();
        assert_eq!(query.leader_match(), None);
        assert_eq!(query.references()[0].tag, *b"245");
        assert!(query.references()[0].subfield_codes.is_empty());
    }

    #[test]
    fn test_parse_multiple_references() {
        let query = FieldQuery::parse("859aw:100a").unwrap();
        assert_eq!(query.references().len(), 2);
        assert_eq!(query.references()[0].subfield_codes, b"aw");
        assert_eq!(query.references()[1].tag, *b"100");
    }

    #[test]
    fn test_parse_leader_filter() {
        let query = FieldQuery::parse("L[6]=c;245a").unwrap();
        assert_eq!(
            query.leader_match(),
            Some(LeaderMatch {
                offset: 6,
                value: b'c'
            })
        );
        assert_eq!(query.references()[0].subfield_codes, b"a");

        let leader_only = FieldQuery::parse("L[7]=s;").unwrap();
        assert!(leader_only.references().is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_queries() {
        for bad in [
            "",
            "24",
            "245:",
            "L[6]=c",
            "L[6]=;",
            "L[x]=c;",
            "L[24]=c;",
            "L[6]c;",
        ] {
            let result = FieldQuery::parse(bad);
            assert!(
                matches!(result, Err(MarcError::InvalidQuery(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_search_whole_field() {
        let record = create_realistic_record();
        let query = FieldQuery::parse("650").unwrap();
        let hits = query.search(&record).unwrap();
        assert_eq!(
            values(&hits),
            vec![
                &b" 0\x1FaNovels\x1FxAmerican"[..],
                &b" 0\x1FaComing of age\x1FxFiction"[..]
            ]
        );
        assert!(hits.iter().all(|hit| hit.subfield_code.is_none()));
    }

    #[test]
    fn test_search_subfields_in_code_order() {
        let record = create_realistic_record();
        let query = FieldQuery::parse("245ca").unwrap();
        let hits = query.search(&record).unwrap();
        assert_eq!(
            values(&hits),
            vec![&b"F. Scott Fitzgerald"[..], &b"The Great Gatsby"[..]]
        );
        assert_eq!(hits[0].subfield_code, Some(b'c'));
        assert_eq!(hits[0].control_number, b"ocm42");
    }

    #[test]
    fn test_search_leader_filter() {
        let record = create_realistic_record();
        assert!(FieldQuery::parse("L[6]=a;245").unwrap().search(&record).is_some());
        assert!(FieldQuery::parse("L[6]=c;245").unwrap().search(&record).is_none());
        assert!(FieldQuery::parse("L[6]=a;").unwrap().is_match(&record));
    }

    #[test]
    fn test_value_pattern_filters_hits() {
        let record = create_realistic_record();
        let query = FieldQuery::parse("650x")
            .unwrap()
            .with_value_pattern("^Fic")
            .unwrap();
        let hits = query.search(&record).unwrap();
        assert_eq!(values(&hits), vec![&b"Fiction"[..]]);
    }

    #[test]
    fn test_bad_value_pattern() {
        let result = FieldQuery::parse("245").unwrap().with_value_pattern("(unclosed");
        assert!(matches!(result, Err(MarcError::InvalidQuery(_))));
    }

    #[test]
    fn test_is_match_requires_hits() {
        let record = create_realistic_record();
        assert!(FieldQuery::parse("700d").unwrap().is_match(&record));
        assert!(!FieldQuery::parse("700z").unwrap().is_match(&record));
        assert!(!FieldQuery::parse("999").unwrap().is_match(&record));
    }

    #[test]
    fn test_missing_control_number_is_empty() {
        let record = Record::builder(Leader::default())
            .field("245", "00\x1FaUntitled")
            .build()
            .unwrap();
        let hits = FieldQuery::parse("245a").unwrap().search(&record).unwrap();
        assert!(hits[0].control_number.is_empty());
    }

    #[test]
    fn test_write_line() {
        let record = create_realistic_record();
        let mut out = Vec::new();
        for query in ["001", "245a"] {
            for hit in FieldQuery::parse(query).unwrap().search(&record).unwrap() {
                hit.write_line(&mut out).unwrap();
            }
        }
        assert_eq!(out, b"ocm42\nocm42:a:The Great Gatsby\n");
    }
}
