//! Subfield access within a single field's content.
//!
//! Data field content is a prefix (the indicators) followed by subfields, each
//! introduced by the subfield delimiter (0x1F) and a one-byte code:
//!
//! ```text
//! 10␟aThe great Gatsby /␟cF. Scott Fitzgerald.
//! ```
//!
//! [`Subfields`] borrows the content and never copies values.
//!
//! # Examples
//!
//! ```
//! use marcutil::Subfields;
//!
//! let subfields = Subfields::parse(b"10\x1FaTitle\x1Fbsubtitle\x1Faother");
//! assert_eq!(subfields.prefix(), b"10");
//! let titles: Vec<&[u8]> = subfields.values_for(b'a').collect();
//! assert_eq!(titles, vec![&b"Title"[..], &b"other"[..]]);
//! ```

use crate::SUBFIELD_DELIMITER;
use smallvec::SmallVec;

/// A subfield within a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subfield<'a> {
    /// Subfield code (single byte)
    pub code: u8,
    /// Subfield value
    pub value: &'a [u8],
}

/// The ordered subfields of one field, borrowed from its content.
///
/// Codes may repeat; order is preserved exactly as in the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subfields<'a> {
    prefix: &'a [u8],
    // Stored in a `SmallVec` to avoid allocation for typical fields with 4 or fewer subfields
    subfields: SmallVec<[Subfield<'a>; 4]>,
}

impl<'a> Subfields<'a> {
    /// Split field content into its prefix and subfields.
    ///
    /// A delimiter followed immediately by another delimiter, or by the end of
    /// the content, carries no code and yields no subfield.
    #[must_use]
    pub fn parse(content: &'a [u8]) -> Self {
        let mut delimiters = memchr::memchr_iter(SUBFIELD_DELIMITER, content);
        let Some(first) = delimiters.next() else {
            return Subfields {
                prefix: content,
                subfields: SmallVec::new(),
            };
        };

        let mut subfields = SmallVec::new();
        let mut start = first + 1;
        for end in delimiters.chain(std::iter::once(content.len())) {
            if let Some((&code, value)) = content[start..end].split_first() {
                subfields.push(Subfield { code, value });
            }
            start = end + 1;
        }

        Subfields {
            prefix: &content[..first],
            subfields,
        }
    }

    /// Bytes before the first subfield delimiter.
    ///
    /// For data fields these are the indicators; for control fields, which have
    /// no subfields, it is the whole content.
    #[must_use]
    pub fn prefix(&self) -> &'a [u8] {
        self.prefix
    }

    /// Iterate over all subfields in order.
    pub fn iter(&self) -> impl Iterator<Item = &Subfield<'a>> {
        self.subfields.iter()
    }

    /// Iterate over the values of every subfield with the given code, in order.
    ///
    /// The iterator is lazy and may be requested any number of times.
    pub fn values_for(&self, code: u8) -> impl Iterator<Item = &'a [u8]> + '_ {
        self.subfields
            .iter()
            .filter(move |subfield| subfield.code == code)
            .map(|subfield| subfield.value)
    }

    /// Value of the first subfield with the given code.
    #[must_use]
    pub fn first_value(&self, code: u8) -> Option<&'a [u8]> {
        self.values_for(code).next()
    }

    /// Number of subfields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subfields.len()
    }

    /// Whether the content has no subfields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subfields.is_empty()
    }
}

impl<'s, 'a> IntoIterator for &'s Subfields<'a> {
    type Item = &'s Subfield<'a>;
    type IntoIter = std::slice::Iter<'s, Subfield<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.subfields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_codes_keep_order() {
        let subfields = Subfields::parse(b"\x1Favalue1\x1Fbvalue2\x1Favalue3");

        let a: Vec<&[u8]> = subfields.values_for(b'a').collect();
        assert_eq!(a, vec![&b"value1"[..], &b"value3"[..]]);

        let b: Vec<&[u8]> = subfields.values_for(b'b').collect();
        assert_eq!(b, vec![&b"value2"[..]]);
    }

    #[test]
    fn test_values_for_is_restartable() {
        let subfields = Subfields::parse(b"  \x1Fxone\x1Fxtwo");
        let first: Vec<&[u8]> = subfields.values_for(b'x').collect();
        let second: Vec<&[u8]> = subfields.values_for(b'x').collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_missing_code_yields_nothing() {
        let subfields = Subfields::parse(b"10\x1FaTitle");
        assert_eq!(subfields.values_for(b'z').count(), 0);
        assert_eq!(subfields.first_value(b'z'), None);
    }

    #[test]
    fn test_prefix_is_indicators() {
        let subfields = Subfields::parse(b"14\x1FaThe title");
        assert_eq!(subfields.prefix(), b"14");
        assert_eq!(subfields.first_value(b'a'), Some(&b"The title"[..]));
    }

    #[test]
    fn test_control_field_has_no_subfields() {
        let subfields = Subfields::parse(b"ocm12345678");
        assert!(subfields.is_empty());
        assert_eq!(subfields.prefix(), b"ocm12345678");
    }

    #[test]
    fn test_empty_segments_are_skipped() {
        let subfields = Subfields::parse(b"00\x1F\x1Fafirst\x1Fb\x1F");
        let codes: Vec<u8> = subfields.iter().map(|s| s.code).collect();
        assert_eq!(codes, vec![b'a', b'b']);
        assert_eq!(subfields.first_value(b'b'), Some(&b""[..]));
    }

    #[test]
    fn test_empty_content() {
        let subfields = Subfields::parse(b"");
        assert!(subfields.is_empty());
        assert!(subfields.prefix().is_empty());
    }

    #[test]
    fn test_into_iterator() {
        let subfields = Subfields::parse(b"\x1Fa1\x1Fb2\x1Fc3\x1Fd4\x1Fe5");
        let mut count = 0;
        for subfield in &subfields {
            assert_eq!(subfield.value.len(), 1);
            count += 1;
        }
        assert_eq!(count, 5);
        assert_eq!(subfields.len(), 5);
    }
}
