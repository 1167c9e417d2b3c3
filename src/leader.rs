//! MARC record leader parsing and manipulation.
//!
//! The MARC leader is a 24-byte fixed-length field at the start of every MARC record.
//! Only two of its fields take part in the record structure itself:
//!
//! - Positions 0-4: Record length (5 digits)
//! - Positions 12-16: Base address of data (5 digits)
//!
//! Every other position (record status, type of record, character coding, ...)
//! is kept verbatim and can be read or written by offset.

use crate::error::{MarcError, Result};
use std::ops::{Index, Range};

/// Length of the leader in bytes.
pub const LEADER_LENGTH: usize = 24;

/// Largest value a 5-digit length or address field can hold.
pub const MAX_RECORD_LENGTH: usize = 99_999;

const RECORD_LENGTH_RANGE: Range<usize> = 0..5;
const BASE_ADDRESS_RANGE: Range<usize> = 12..17;

const DEFAULT_LEADER: &[u8; LEADER_LENGTH] = b"00000nam a2200000   4500";

/// MARC Leader - 24 bytes at the start of every MARC record.
///
/// The record length and base address of data are decoded into integers; all
/// 24 bytes are retained so that serialization reproduces the parsed input
/// exactly. The two numeric fields are recomputed when a record is composed
/// and cannot be changed through the public API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leader {
    bytes: [u8; LEADER_LENGTH],
    record_length: u32,
    base_address_of_data: u32,
}

impl Default for Leader {
    /// A leader for a new language-material monograph with zeroed lengths.
    fn default() -> Self {
        Leader {
            bytes: *DEFAULT_LEADER,
            record_length: 0,
            base_address_of_data: 0,
        }
    }
}

impl Leader {
    /// Parse a leader from exactly 24 bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use marcutil::Leader;
    ///
    /// let leader = Leader::parse(b"00042nam a2200037   4500")?;
    /// assert_eq!(leader.record_length(), 42);
    /// assert_eq!(leader.base_address_of_data(), 37);
    /// assert_eq!(leader.get(6), Some(b'a'));
    /// # Ok::<(), marcutil::MarcError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::Malformed`] if the input is not 24 bytes long or if
    /// either numeric field contains a non-digit byte.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; LEADER_LENGTH] = bytes.try_into().map_err(|_| {
            MarcError::Malformed(format!(
                "leader must be exactly {LEADER_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;

        let record_length = parse_decimal(&bytes[RECORD_LENGTH_RANGE], "leader record length")?;
        let base_address_of_data =
            parse_decimal(&bytes[BASE_ADDRESS_RANGE], "leader base address of data")?;

        Ok(Leader {
            bytes,
            record_length,
            base_address_of_data,
        })
    }

    /// Serialize the leader to its 24-byte wire form.
    ///
    /// The numeric fields are rendered zero-padded; all other bytes are
    /// returned as they were parsed or set.
    #[must_use]
    pub fn as_bytes(&self) -> [u8; LEADER_LENGTH] {
        self.bytes
    }

    /// Total record length in bytes, including leader and record terminator.
    #[must_use]
    pub fn record_length(&self) -> u32 {
        self.record_length
    }

    /// Offset from the start of the record at which field data begins.
    #[must_use]
    pub fn base_address_of_data(&self) -> u32 {
        self.base_address_of_data
    }

    /// Read the leader byte at `offset`, or `None` past the end of the leader.
    #[must_use]
    pub fn get(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }

    /// Overwrite the leader byte at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::Malformed`] if `offset` is past the end of the
    /// leader or falls inside the record length or base address fields, which
    /// are only ever recomputed during composition.
    pub fn set(&mut self, offset: usize, value: u8) -> Result<()> {
        if offset >= LEADER_LENGTH {
            return Err(MarcError::Malformed(format!(
                "leader offset {offset} exceeds leader length ({LEADER_LENGTH})"
            )));
        }
        if RECORD_LENGTH_RANGE.contains(&offset) || BASE_ADDRESS_RANGE.contains(&offset) {
            return Err(MarcError::Malformed(format!(
                "leader offset {offset} belongs to a computed length field"
            )));
        }
        self.bytes[offset] = value;
        Ok(())
    }

    /// Record status (position 5).
    #[must_use]
    pub fn record_status(&self) -> char {
        self.bytes[5] as char
    }

    /// Type of record (position 6).
    #[must_use]
    pub fn record_type(&self) -> char {
        self.bytes[6] as char
    }

    /// Bibliographic level (position 7).
    #[must_use]
    pub fn bibliographic_level(&self) -> char {
        self.bytes[7] as char
    }

    /// Character coding scheme (position 9).
    #[must_use]
    pub fn character_coding(&self) -> char {
        self.bytes[9] as char
    }

    /// Validate that the leader is suitable for binary record reading.
    ///
    /// The base address must leave room for a directory terminator after the
    /// leader, and the record length must leave room for at least the record
    /// terminator after the base address. This is required before performing
    /// arithmetic on these fields while reading.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StructuralMismatch`] if either condition fails.
    pub fn validate_for_reading(&self) -> Result<()> {
        if self.base_address_of_data as usize <= LEADER_LENGTH {
            return Err(MarcError::StructuralMismatch(format!(
                "impossible base address of data: {}",
                self.base_address_of_data
            )));
        }
        if self.record_length <= self.base_address_of_data {
            return Err(MarcError::StructuralMismatch(format!(
                "record length ({}) leaves no room for field data after base address ({})",
                self.record_length, self.base_address_of_data
            )));
        }
        Ok(())
    }

    pub(crate) fn set_record_length(&mut self, record_length: usize) -> Result<()> {
        self.record_length = fit_five_digits(record_length, "record length")?;
        write_fixed(&mut self.bytes[RECORD_LENGTH_RANGE], self.record_length);
        Ok(())
    }

    pub(crate) fn set_base_address_of_data(&mut self, base_address: usize) -> Result<()> {
        self.base_address_of_data = fit_five_digits(base_address, "base address of data")?;
        write_fixed(&mut self.bytes[BASE_ADDRESS_RANGE], self.base_address_of_data);
        Ok(())
    }
}

impl Index<usize> for Leader {
    type Output = u8;

    /// Panics if `offset` is 24 or more, like slice indexing.
    fn index(&self, offset: usize) -> &u8 {
        &self.bytes[offset]
    }
}

fn fit_five_digits(value: usize, what: &str) -> Result<u32> {
    if value > MAX_RECORD_LENGTH {
        return Err(MarcError::TooLong(format!(
            "{what} ({value}) exceeds maximum legal value ({MAX_RECORD_LENGTH})"
        )));
    }
    u32::try_from(value)
        .map_err(|_| MarcError::TooLong(format!("{what} ({value}) does not fit in 32 bits")))
}

/// Parse a fixed-width ASCII decimal number.
///
/// Every byte must be an ASCII digit; no sign, padding or whitespace is accepted.
pub(crate) fn parse_decimal(bytes: &[u8], what: &str) -> Result<u32> {
    let mut result = 0u32;
    for &byte in bytes {
        if !byte.is_ascii_digit() {
            return Err(MarcError::Malformed(format!(
                "invalid {what}: expected digits, got '{}'",
                String::from_utf8_lossy(bytes)
            )));
        }
        result = result * 10 + u32::from(byte - b'0');
    }
    Ok(result)
}

/// Render `value` zero-padded into `out`, which must be wide enough.
pub(crate) fn write_fixed(out: &mut [u8], mut value: u32) {
    for slot in out.iter_mut().rev() {
        *slot = b'0' + u8::try_from(value % 10).unwrap_or(0);
        value /= 10;
    }
}
