#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # marcutil: MARC-21 binary codec
//!
//! A byte-exact reader and writer for MARC-21 records in the ISO 2709
//! transmission format, plus subfield access and the extraction queries
//! behind the `marc_grep` tool.
//!
//! Field contents are raw bytes. Nothing is transcoded, so a record read and
//! composed again is reproduced byte for byte.
//!
//! ## Quick Start
//!
//! ```
//! use marcutil::{Leader, MarcReader, Record, Subfields};
//! use std::io::Cursor;
//!
//! let record = Record::builder(Leader::default())
//!     .field("001", "ocm00012345")
//!     .field("245", "10\x1FaThe great Gatsby /\x1FcF. Scott Fitzgerald.")
//!     .build()?;
//! let bytes = record.to_bytes()?;
//!
//! let mut reader = MarcReader::new(Cursor::new(&bytes));
//! while let Some(record) = reader.read_record()? {
//!     for content in record.fields_by_tag("245") {
//!         let subfields = Subfields::parse(content);
//!         assert_eq!(subfields.first_value(b'c'), Some(&b"F. Scott Fitzgerald."[..]));
//!     }
//!     assert_eq!(record.to_bytes()?, bytes);
//! }
//! # Ok::<(), marcutil::MarcError>(())
//! ```
//!
//! ## Modules
//!
//! - [`leader`] — MARC record leader (24-byte header)
//! - [`directory`] — 12-byte directory entries
//! - [`fields`] — Splitting field data into per-field contents
//! - [`record`] — Decoded record (`Record`)
//! - [`reader`] — Reading records from binary streams
//! - [`writer`] — Composing and writing records
//! - [`record_validation`] — Structural checks on serialized records
//! - [`subfields`] — Subfield access within one field
//! - [`field_query`] — Field/subfield extraction queries
//! - [`error`] — Error types and result type

pub mod directory;
pub mod error;
pub mod field_query;
pub mod fields;
pub mod leader;
pub mod reader;
pub mod record;
pub mod record_validation;
pub mod subfields;
pub mod writer;

pub use directory::{DirectoryEntry, DIRECTORY_ENTRY_LENGTH};
pub use error::{MarcError, Result};
pub use field_query::{FieldQuery, FieldReference, Hit, LeaderMatch};
pub use leader::{Leader, LEADER_LENGTH, MAX_RECORD_LENGTH};
pub use reader::{read_next_record, MarcReader};
pub use record::{Record, RecordBuilder};
pub use record_validation::RecordStructureValidator;
pub use subfields::{Subfield, Subfields};
pub use writer::{compose, MarcWriter};

/// Ends each field's content and the directory.
pub const FIELD_TERMINATOR: u8 = 0x1E;

/// Ends a record.
pub const RECORD_TERMINATOR: u8 = 0x1D;

/// Introduces a subfield within a field's content.
pub const SUBFIELD_DELIMITER: u8 = 0x1F;
