//! Error types for MARC operations.
//!
//! This module provides the [`MarcError`] type for all codec, validation and
//! query operations, and the [`Result`] convenience type.
//!
//! Reaching the end of a stream cleanly between two records is not an error:
//! readers report it as `Ok(None)`.

use thiserror::Error;

/// Error type for all MARC library operations.
///
/// Each variant is one kind of failure and carries a human-readable detail
/// message describing the specific violation.
#[derive(Error, Debug)]
pub enum MarcError {
    /// The leader, directory or field data ended before its declared size.
    #[error("Short read: {0}")]
    ShortRead(String),

    /// A fixed-width decimal field held non-digit bytes, or a segment had the
    /// wrong size for its fixed layout.
    #[error("Malformed data: {0}")]
    Malformed(String),

    /// A field terminator or record terminator was absent where required.
    #[error("Missing terminator: {0}")]
    MissingTerminator(String),

    /// A directory entry's length would read past the field data segment.
    #[error("Field overrun: {0}")]
    FieldOverrun(String),

    /// The directory lengths did not exactly consume the field data segment.
    #[error("Unexhausted record: {0}")]
    UnexhaustedRecord(String),

    /// Lengths, offsets or terminator positions are inconsistent with each other.
    #[error("Structural mismatch: {0}")]
    StructuralMismatch(String),

    /// A record or field is too long for the format's fixed-width length fields.
    #[error("Too long: {0}")]
    TooLong(String),

    /// A field reference or value pattern could not be parsed.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// IO error from the underlying source/destination.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`MarcError`].
pub type Result<T> = std::result::Result<T, MarcError>;
