//! Reading MARC records from binary streams.
//!
//! This module provides [`read_next_record`] and the stateful [`MarcReader`]
//! for reading ISO 2709 formatted MARC records from any source that
//! implements [`std::io::Read`].
//!
//! A record is read in three fixed-size steps: the 24-byte leader, the
//! directory (its size follows from the base address of data), and the field
//! data (its size follows from the record length). Nothing is read past the
//! end of the current record.
//!
//! # Examples
//!
//! Reading records from a file:
//!
//! ```no_run
//! use marcutil::MarcReader;
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! let file = BufReader::new(File::open("records.mrc")?);
//! let mut reader = MarcReader::new(file);
//!
//! while let Some(record) = reader.read_record()? {
//!     println!("{} fields", record.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::directory::parse_all;
use crate::error::{MarcError, Result};
use crate::fields::read_fields;
use crate::leader::{Leader, LEADER_LENGTH};
use crate::record::Record;
use crate::FIELD_TERMINATOR;
use std::io::{ErrorKind, Read};
use tracing::debug;

/// Read the next record from `input`.
///
/// Returns `Ok(None)` when the stream ends cleanly before the first byte of a
/// new record. A stream that ends anywhere inside a record is an error.
///
/// # Errors
///
/// Checks run in this order, and the first failure is returned:
/// - [`MarcError::ShortRead`] if the leader is incomplete
/// - the leader's parse error, or [`MarcError::StructuralMismatch`] if its
///   base address or record length cannot describe a record
/// - [`MarcError::ShortRead`] if the directory is incomplete
/// - [`MarcError::MissingTerminator`] if the directory does not end with a
///   field terminator, or the directory's parse error
/// - [`MarcError::ShortRead`] if the field data is incomplete
/// - the field splitter's error
/// - [`MarcError::IoError`] for any other I/O failure
pub fn read_next_record<R: Read + ?Sized>(input: &mut R) -> Result<Option<Record>> {
    let mut leader_bytes = [0u8; LEADER_LENGTH];
    let read = read_up_to(input, &mut leader_bytes)?;
    if read == 0 {
        return Ok(None);
    }
    if read != LEADER_LENGTH {
        return Err(MarcError::ShortRead(format!(
            "short read for a leader or premature EOF (expected {LEADER_LENGTH} bytes, got {read} bytes)"
        )));
    }

    let leader = Leader::parse(&leader_bytes)?;
    leader.validate_for_reading()?;

    // Directory entries plus the field terminator that ends the directory.
    let directory_length = leader.base_address_of_data() as usize - LEADER_LENGTH;
    let mut directory = vec![0u8; directory_length];
    let read = read_up_to(input, &mut directory)?;
    if read != directory_length {
        return Err(MarcError::ShortRead(format!(
            "short read for a directory or premature EOF (expected {directory_length} bytes, got {read} bytes)"
        )));
    }

    let Some((&FIELD_TERMINATOR, entries)) = directory.split_last() else {
        return Err(MarcError::MissingTerminator(
            "directory is not terminated with a field terminator".to_string(),
        ));
    };
    let entries = parse_all(entries)?;

    let field_data_length = (leader.record_length() - leader.base_address_of_data()) as usize;
    let mut field_data = vec![0u8; field_data_length];
    let read = read_up_to(input, &mut field_data)?;
    if read != field_data_length {
        return Err(MarcError::ShortRead(format!(
            "short read for field data or premature EOF (expected {field_data_length} bytes, got {read} bytes)"
        )));
    }

    let fields = read_fields(&field_data, &entries)?;

    debug!(
        record_length = leader.record_length(),
        fields = fields.len(),
        "read record"
    );
    Ok(Some(Record::from_decoded(leader, entries, fields)))
}

/// Fill `buf` as far as the stream allows and return how many bytes were read.
fn read_up_to<R: Read + ?Sized>(input: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {},
            Err(e) => return Err(MarcError::IoError(e)),
        }
    }
    Ok(filled)
}

/// Reader for ISO 2709 binary MARC format.
///
/// `MarcReader` reads one MARC record at a time from any source implementing
/// [`std::io::Read`]. Wrap unbuffered sources such as files in a
/// [`std::io::BufReader`]; each record is read in three separate calls.
///
/// # Examples
///
/// ```
/// use marcutil::MarcReader;
/// use std::io::Cursor;
///
/// let binary_data = vec![]; // MARC binary data
/// let mut reader = MarcReader::new(Cursor::new(binary_data));
///
/// match reader.read_record() {
///     Ok(Some(record)) => println!("{} fields", record.len()),
///     Ok(None) => println!("End of file"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
#[derive(Debug)]
pub struct MarcReader<R: Read> {
    reader: R,
    records_read: usize,
}

impl<R: Read> MarcReader<R> {
    /// Create a new MARC reader.
    pub fn new(reader: R) -> Self {
        MarcReader {
            reader,
            records_read: 0,
        }
    }

    /// Read a single MARC record.
    ///
    /// Returns `Ok(Some(record))` if a record was successfully read, `Ok(None)` if EOF
    /// was reached, or `Err` if a parsing error occurred.
    ///
    /// # Errors
    ///
    /// See [`read_next_record`].
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        let record = read_next_record(&mut self.reader)?;
        if record.is_some() {
            self.records_read += 1;
        }
        Ok(record)
    }

    /// Number of records successfully read so far.
    #[must_use]
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Iterate over the remaining records.
    ///
    /// The iterator ends at EOF, or right after yielding the first error.
    pub fn records(&mut self) -> Records<'_, R> {
        Records {
            reader: self,
            done: false,
        }
    }

    /// Recover the underlying source.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Iterator over the records of a [`MarcReader`], see [`MarcReader::records`].
#[derive(Debug)]
pub struct Records<'a, R: Read> {
    reader: &'a mut MarcReader<R>,
    done: bool,
}

impl<R: Read> Iterator for Records<'_, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            },
            Err(e) => {
                self.done = true;
                Some(Err(e))
            },
        }
    }
}

impl<R: Read> std::iter::FusedIterator for Records<'_, R> {}
