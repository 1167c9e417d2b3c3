//! Writing MARC records to binary format.
//!
//! [`compose`] turns a directory, its field contents and a leader into the
//! bytes of one ISO 2709 record. [`MarcWriter`] applies it to [`Record`]
//! values and writes the result to any destination implementing
//! [`std::io::Write`].
//!
//! # Examples
//!
//! ```
//! use marcutil::{Leader, MarcReader, MarcWriter, Record};
//! use std::io::Cursor;
//!
//! let record = Record::builder(Leader::default())
//!     .field("001", "12345")
//!     .field("245", "10\x1FaTitle")
//!     .build()?;
//!
//! let mut buffer = Vec::new();
//! {
//!     let mut writer = MarcWriter::new(&mut buffer);
//!     writer.write_record(&record)?;
//!     writer.finish()?;
//! }
//!
//! let mut reader = MarcReader::new(Cursor::new(buffer));
//! let restored = reader.read_record()?.expect("one record");
//! assert_eq!(restored.field_contents(), record.field_contents());
//! # Ok::<(), marcutil::MarcError>(())
//! ```

use crate::directory::{serialize_all, DirectoryEntry, DIRECTORY_ENTRY_LENGTH};
use crate::error::{MarcError, Result};
use crate::leader::{Leader, LEADER_LENGTH, MAX_RECORD_LENGTH};
use crate::record::{check_parallel, Record};
use crate::record_validation::RecordStructureValidator;
use crate::{FIELD_TERMINATOR, RECORD_TERMINATOR};
use std::io::Write;
use tracing::trace;

/// Create the binary representation of a record.
///
/// `leader` is updated with the computed record length and base address of
/// data (`24 + 12 * entries + 1`), so that after a successful call it matches
/// the emitted leader bytes. On error it is left unchanged.
///
/// The output is the leader, the directory, a field terminator, each field's
/// content followed by a field terminator, and a record terminator.
///
/// # Errors
///
/// - [`MarcError::StructuralMismatch`] if `directory` and `fields` differ in
///   length or an entry's length does not match its content
/// - [`MarcError::TooLong`] if the record would exceed 99999 bytes
pub fn compose<T: AsRef<[u8]>>(
    directory: &[DirectoryEntry],
    fields: &[T],
    leader: &mut Leader,
) -> Result<Vec<u8>> {
    check_parallel(directory, fields)?;

    let directory_size = directory.len() * DIRECTORY_ENTRY_LENGTH;
    let base_address = LEADER_LENGTH + directory_size + 1;
    let record_size = base_address
        + directory
            .iter()
            .map(|entry| entry.field_length() as usize)
            .sum::<usize>()
        + 1;

    if record_size > MAX_RECORD_LENGTH {
        return Err(MarcError::TooLong(format!(
            "record length ({record_size}) exceeds maximum legal record length ({MAX_RECORD_LENGTH})"
        )));
    }

    let directory_bytes = serialize_all(directory)?;

    leader.set_record_length(record_size)?;
    leader.set_base_address_of_data(base_address)?;

    let mut record = Vec::with_capacity(record_size);
    record.extend_from_slice(&leader.as_bytes());
    record.extend_from_slice(&directory_bytes);
    record.push(FIELD_TERMINATOR);
    for field in fields {
        record.extend_from_slice(field.as_ref());
        record.push(FIELD_TERMINATOR);
    }
    record.push(RECORD_TERMINATOR);

    trace!(
        record_length = record_size,
        base_address,
        fields = directory.len(),
        "composed record"
    );
    debug_assert_eq!(record.len(), record_size);
    Ok(record)
}

/// Writer for ISO 2709 binary MARC format.
///
/// Every record is composed, checked with [`RecordStructureValidator`] and
/// then written in one piece.
#[derive(Debug)]
pub struct MarcWriter<W: Write> {
    writer: W,
    records_written: usize,
    finished: bool,
}

impl<W: Write> MarcWriter<W> {
    /// Create a new MARC writer.
    pub fn new(writer: W) -> Self {
        MarcWriter {
            writer,
            records_written: 0,
            finished: false,
        }
    }

    /// Write a single MARC record.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The writer has been finished
    /// - The record cannot be composed (see [`compose`])
    /// - An I/O error occurs during writing
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        if self.finished {
            return Err(MarcError::StructuralMismatch(
                "cannot write to a finished writer".to_string(),
            ));
        }

        let bytes = record.to_bytes()?;
        RecordStructureValidator::validate(&bytes)?;
        self.writer.write_all(&bytes)?;

        self.records_written += 1;
        Ok(())
    }

    /// Flush the writer and mark it as finished.
    ///
    /// After calling `finish`, no more records can be written.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing the underlying writer fails.
    pub fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.finished = true;
        Ok(())
    }

    /// Returns the number of records written so far.
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Recover the underlying destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_single_field() {
        let directory = vec![DirectoryEntry::new("001", 4).unwrap()];
        let fields = vec![b"123".to_vec()];
        let mut leader = Leader::default();

        let bytes = compose(&directory, &fields, &mut leader).unwrap();

        let mut expected = b"00042nam a2200037   4500".to_vec();
        expected.extend_from_slice(b"001000400000\x1E123\x1E\x1D");
        assert_eq!(bytes, expected);
        assert_eq!(leader.record_length(), 42);
        assert_eq!(leader.base_address_of_data(), 37);
    }

    #[test]
    fn test_compose_no_fields() {
        let mut leader = Leader::default();
        let bytes = compose::<Vec<u8>>(&[], &[], &mut leader).unwrap();
        assert_eq!(bytes.len(), 26);
        assert_eq!(&bytes[24..], b"\x1E\x1D");
        assert_eq!(leader.base_address_of_data(), 25);
        assert!(RecordStructureValidator::is_valid(&bytes));
    }

    #[test]
    fn test_compose_rejects_count_mismatch() {
        let directory = vec![
            DirectoryEntry::new("001", 4).unwrap(),
            DirectoryEntry::new("005", 4).unwrap(),
        ];
        let mut leader = Leader::default();
        let result = compose(&directory, &[b"123".to_vec()], &mut leader);
        assert!(matches!(result, Err(MarcError::StructuralMismatch(_))));
        assert_eq!(leader, Leader::default());
    }

    #[test]
    fn test_compose_rejects_length_disagreement() {
        let directory = vec![DirectoryEntry::new("001", 9).unwrap()];
        let mut leader = Leader::default();
        let result = compose(&directory, &[b"123"], &mut leader);
        assert!(matches!(result, Err(MarcError::StructuralMismatch(_))));
    }

    #[test]
    fn test_compose_rejects_oversized_record() {
        let content = vec![b'x'; 9_000];
        let mut record = Record::new(Leader::default());
        for _ in 0..12 {
            record.add_field("500", content.clone()).unwrap();
        }
        let result = record.to_bytes();
        assert!(matches!(result, Err(MarcError::TooLong(_))));
    }

    #[test]
    fn test_compose_preserves_other_leader_bytes() {
        let mut leader = Leader::parse(b"99999cjm a2299999 i 4500").unwrap();
        let bytes = compose(&[DirectoryEntry::new("001", 1).unwrap()], &[b""], &mut leader).unwrap();
        assert_eq!(&bytes[..24], b"00039cjm a2200037 i 4500");
    }

    #[test]
    fn test_writer_counts_records() {
        let record = Record::builder(Leader::default())
            .field("001", "1")
            .build()
            .unwrap();

        let mut writer = MarcWriter::new(Vec::new());
        writer.write_record(&record).unwrap();
        writer.write_record(&record).unwrap();
        assert_eq!(writer.records_written(), 2);

        let buffer = writer.into_inner();
        assert_eq!(buffer.len(), 2 * 40);
    }

    #[test]
    fn test_finished_writer_rejects_records() {
        let record = Record::new(Leader::default());
        let mut writer = MarcWriter::new(Vec::new());
        writer.finish().unwrap();
        assert!(writer.write_record(&record).is_err());
        assert_eq!(writer.records_written(), 0);
    }
}
