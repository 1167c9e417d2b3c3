//! Validation of serialized MARC record structure.
//!
//! [`RecordStructureValidator`] checks the bytes of one complete record for
//! internal consistency between the leader's length fields and the positions
//! of the directory and record terminators. It does not split the directory
//! or look at field contents, tags or subfields.

use crate::directory::DIRECTORY_ENTRY_LENGTH;
use crate::error::{MarcError, Result};
use crate::leader::{Leader, LEADER_LENGTH, MAX_RECORD_LENGTH};
use crate::{FIELD_TERMINATOR, RECORD_TERMINATOR};

/// Validator for serialized MARC record structure
#[derive(Debug)]
pub struct RecordStructureValidator;

impl RecordStructureValidator {
    /// Validate a complete serialized record.
    ///
    /// Checks run in this order and stop at the first failure:
    ///
    /// 1. the record is long enough to hold a leader
    /// 2. the leader parses
    /// 3. the leader's record length equals the actual length
    /// 4. the length does not exceed 99999 bytes
    /// 5. the base address of data lies past the leader
    /// 6. the directory length is a multiple of 12
    /// 7. the byte before the base address is a field terminator
    /// 8. the last byte is a record terminator
    ///
    /// # Examples
    ///
    /// ```
    /// use marcutil::{Leader, Record, RecordStructureValidator};
    ///
    /// let record = Record::builder(Leader::default()).field("001", "123").build()?;
    /// let bytes = record.to_bytes()?;
    /// RecordStructureValidator::validate(&bytes)?;
    ///
    /// assert!(!RecordStructureValidator::is_valid(&bytes[..bytes.len() - 1]));
    /// # Ok::<(), marcutil::MarcError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// - [`MarcError::ShortRead`] if the record is shorter than a leader
    /// - the leader's parse error
    /// - [`MarcError::TooLong`] if the record exceeds 99999 bytes
    /// - [`MarcError::StructuralMismatch`] for every other violation
    pub fn validate(record: &[u8]) -> Result<()> {
        if record.len() < LEADER_LENGTH {
            return Err(MarcError::ShortRead(format!(
                "record too small to contain leader ({} bytes)",
                record.len()
            )));
        }

        let leader = Leader::parse(&record[..LEADER_LENGTH])?;

        let record_length = leader.record_length() as usize;
        if record_length != record.len() {
            return Err(MarcError::StructuralMismatch(format!(
                "leader's record length ({record_length}) does not equal actual record length ({})",
                record.len()
            )));
        }

        if record.len() > MAX_RECORD_LENGTH {
            return Err(MarcError::TooLong(format!(
                "record length ({}) exceeds maximum legal record length ({MAX_RECORD_LENGTH})",
                record.len()
            )));
        }

        let base_address = leader.base_address_of_data() as usize;
        if base_address <= LEADER_LENGTH {
            return Err(MarcError::StructuralMismatch(format!(
                "impossible base address of data ({base_address})"
            )));
        }

        let directory_length = base_address - LEADER_LENGTH - 1;
        if directory_length % DIRECTORY_ENTRY_LENGTH != 0 {
            return Err(MarcError::StructuralMismatch(format!(
                "directory length ({directory_length}) is not a multiple of {DIRECTORY_ENTRY_LENGTH}"
            )));
        }

        if record.get(base_address - 1) != Some(&FIELD_TERMINATOR) {
            return Err(MarcError::StructuralMismatch(
                "directory is not terminated with a field terminator".to_string(),
            ));
        }

        if record.last() != Some(&RECORD_TERMINATOR) {
            return Err(MarcError::StructuralMismatch(
                "record is not terminated with a record terminator".to_string(),
            ));
        }

        Ok(())
    }

    /// Check if the record structure is well-formed
    ///
    /// Returns `true` if the record passes [`RecordStructureValidator::validate`].
    #[must_use]
    pub fn is_valid(record: &[u8]) -> bool {
        Self::validate(record).is_ok()
    }
}
