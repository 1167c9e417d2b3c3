//! MARC record directory entries.
//!
//! The directory follows the leader and holds one 12-byte entry per variable
//! field:
//!
//! - Positions 0-2: Tag (3 bytes, not necessarily numeric)
//! - Positions 3-6: Field length (4 digits, includes the field terminator)
//! - Positions 7-11: Starting character position within the field data (5 digits)
//!
//! Entries appear in the same order as the fields they describe.

use crate::error::{MarcError, Result};
use crate::leader::{parse_decimal, write_fixed, MAX_RECORD_LENGTH};
use std::borrow::Cow;
use std::fmt;

/// Length of a single directory entry in bytes.
pub const DIRECTORY_ENTRY_LENGTH: usize = 12;

/// Largest field length a 4-digit directory slot can hold.
pub const MAX_FIELD_LENGTH: usize = 9_999;

/// One directory slot: a field's tag and its length on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryEntry {
    tag: [u8; 3],
    field_length: u32,
    field_start: u32,
}

impl DirectoryEntry {
    /// Create an entry for a field whose wire length (content plus field
    /// terminator) is `field_length`.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::Malformed`] if `tag` is not exactly 3 bytes or
    /// `field_length` is zero, and [`MarcError::TooLong`] if `field_length`
    /// does not fit in 4 digits.
    pub fn new(tag: impl AsRef<[u8]>, field_length: usize) -> Result<Self> {
        let tag = tag.as_ref();
        let tag: [u8; 3] = tag.try_into().map_err(|_| {
            MarcError::Malformed(format!(
                "tag must be exactly 3 bytes, got '{}'",
                String::from_utf8_lossy(tag)
            ))
        })?;
        if field_length == 0 {
            return Err(MarcError::Malformed(format!(
                "field {} has zero length",
                String::from_utf8_lossy(&tag)
            )));
        }
        if field_length > MAX_FIELD_LENGTH {
            return Err(MarcError::TooLong(format!(
                "field {} length ({field_length}) exceeds maximum field length ({MAX_FIELD_LENGTH})",
                String::from_utf8_lossy(&tag)
            )));
        }

        Ok(DirectoryEntry {
            tag,
            field_length: u32::try_from(field_length).unwrap_or(u32::MAX),
            field_start: 0,
        })
    }

    /// Create an entry describing `content`, which excludes its field terminator.
    ///
    /// # Errors
    ///
    /// See [`DirectoryEntry::new`].
    pub fn for_content(tag: impl AsRef<[u8]>, content: &[u8]) -> Result<Self> {
        Self::new(tag, content.len() + 1)
    }

    /// The raw 3-byte tag.
    #[must_use]
    pub fn tag(&self) -> &[u8; 3] {
        &self.tag
    }

    /// The tag as text, with any non-UTF-8 bytes replaced.
    #[must_use]
    pub fn tag_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.tag)
    }

    /// Whether this entry's tag equals `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: impl AsRef<[u8]>) -> bool {
        self.tag.as_slice() == tag.as_ref()
    }

    /// Field length including the trailing field terminator.
    #[must_use]
    pub fn field_length(&self) -> u32 {
        self.field_length
    }

    /// Starting position as read from the wire. Zero for entries built in memory.
    ///
    /// The codec locates fields by accumulating lengths, so this value is
    /// informational only and is recomputed on write.
    #[must_use]
    pub fn field_start(&self) -> u32 {
        self.field_start
    }

    fn parse(slot: &[u8]) -> Result<Self> {
        let tag = [slot[0], slot[1], slot[2]];
        let field_length = parse_decimal(&slot[3..7], "directory field length")?;
        let field_start = parse_decimal(&slot[7..12], "directory field start")?;
        if field_length == 0 {
            return Err(MarcError::Malformed(format!(
                "directory entry for field {} has zero length",
                String::from_utf8_lossy(&tag)
            )));
        }
        Ok(DirectoryEntry {
            tag,
            field_length,
            field_start,
        })
    }
}

impl fmt::Display for DirectoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:04}{:05}",
            self.tag_str(),
            self.field_length,
            self.field_start
        )
    }
}

/// Parse a directory (without its terminator) into entries.
///
/// # Examples
///
/// ```
/// use marcutil::directory::parse_all;
///
/// let entries = parse_all(b"001000400000245001200004")?;
/// assert_eq!(entries.len(), 2);
/// assert!(entries[1].has_tag("245"));
/// assert_eq!(entries[1].field_length(), 12);
/// # Ok::<(), marcutil::MarcError>(())
/// ```
///
/// # Errors
///
/// Returns [`MarcError::Malformed`] if the length is not a multiple of 12, a
/// numeric part contains non-digit bytes, or an entry declares a zero length.
pub fn parse_all(bytes: &[u8]) -> Result<Vec<DirectoryEntry>> {
    if bytes.len() % DIRECTORY_ENTRY_LENGTH != 0 {
        return Err(MarcError::Malformed(format!(
            "directory length ({}) is not a multiple of {DIRECTORY_ENTRY_LENGTH}",
            bytes.len()
        )));
    }

    bytes
        .chunks_exact(DIRECTORY_ENTRY_LENGTH)
        .map(DirectoryEntry::parse)
        .collect()
}

/// Serialize entries to their concatenated 12-byte wire form.
///
/// Starting positions are recomputed as the running offset of each field
/// within the field data, in entry order.
///
/// # Errors
///
/// Returns [`MarcError::TooLong`] if a starting position does not fit in 5 digits.
pub fn serialize_all(entries: &[DirectoryEntry]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(entries.len() * DIRECTORY_ENTRY_LENGTH);
    let mut field_start = 0usize;

    for entry in entries {
        if field_start > MAX_RECORD_LENGTH {
            return Err(MarcError::TooLong(format!(
                "starting position of field {} ({field_start}) exceeds {MAX_RECORD_LENGTH}",
                entry.tag_str()
            )));
        }

        let mut slot = [0u8; DIRECTORY_ENTRY_LENGTH];
        slot[..3].copy_from_slice(&entry.tag);
        write_fixed(&mut slot[3..7], entry.field_length);
        write_fixed(
            &mut slot[7..12],
            u32::try_from(field_start).unwrap_or(u32::MAX),
        );
        out.extend_from_slice(&slot);

        field_start += entry.field_length as usize;
    }

    Ok(out)
}
