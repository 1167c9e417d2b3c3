//! Splitting a record's field data into per-field contents.
//!
//! The field data segment is every field's content followed by a field
//! terminator, in directory order, with one record terminator at the very end.
//! Field boundaries come only from the directory lengths; the terminators are
//! checked, never searched for.

use crate::directory::DirectoryEntry;
use crate::error::{MarcError, Result};
use crate::{FIELD_TERMINATOR, RECORD_TERMINATOR};

/// Slice `raw` into field contents, one per directory entry, in order.
///
/// Each returned content has its field terminator stripped. The result is
/// index-aligned with `entries`.
///
/// # Examples
///
/// ```
/// use marcutil::directory::DirectoryEntry;
/// use marcutil::fields::read_fields;
///
/// let entries = vec![
///     DirectoryEntry::new("001", 4)?,
///     DirectoryEntry::new("005", 3)?,
/// ];
/// let fields = read_fields(b"123\x1Eab\x1E\x1D", &entries)?;
/// assert_eq!(fields, vec![b"123".to_vec(), b"ab".to_vec()]);
/// # Ok::<(), marcutil::MarcError>(())
/// ```
///
/// # Errors
///
/// - [`MarcError::MissingTerminator`] if `raw` does not end with a record
///   terminator or a field does not end with a field terminator
/// - [`MarcError::FieldOverrun`] if a field would extend into the record terminator
/// - [`MarcError::UnexhaustedRecord`] if bytes remain between the last field
///   and the record terminator
pub fn read_fields(raw: &[u8], entries: &[DirectoryEntry]) -> Result<Vec<Vec<u8>>> {
    if raw.last() != Some(&RECORD_TERMINATOR) {
        return Err(MarcError::MissingTerminator(
            "missing trailing record terminator".to_string(),
        ));
    }

    let mut fields = Vec::with_capacity(entries.len());
    let mut field_start = 0usize;

    for entry in entries {
        let next_field_start = field_start + entry.field_length() as usize;
        // The record terminator must stay unconsumed.
        if next_field_start >= raw.len() {
            return Err(MarcError::FieldOverrun(format!(
                "field {} at offset {field_start} with length {} extends past the record",
                entry.tag_str(),
                entry.field_length()
            )));
        }

        let field = &raw[field_start..next_field_start];
        match field.split_last() {
            Some((&FIELD_TERMINATOR, content)) => fields.push(content.to_vec()),
            _ => {
                return Err(MarcError::MissingTerminator(format!(
                    "missing field terminator at end of field {}",
                    entry.tag_str()
                )));
            },
        }

        field_start = next_field_start;
    }

    if field_start + 1 != raw.len() {
        return Err(MarcError::UnexhaustedRecord(format!(
            "field extents cover {field_start} of {} field data bytes",
            raw.len() - 1
        )));
    }

    Ok(fields)
}
