//! Decoded MARC record structure.
//!
//! A [`Record`] is a [`Leader`], the directory entries in on-disk order, and
//! one content byte string per directory entry. Entry `i` always describes
//! content `i`: the parts are private and every way of building a record keeps
//! the two sequences the same length, with each entry's length matching its
//! content.
//!
//! # Examples
//!
//! ```
//! use marcutil::{Leader, Record, Subfields};
//!
//! let record = Record::builder(Leader::default())
//!     .field("001", "ocm00012345")
//!     .field("245", "10\x1FaThe great Gatsby /\x1FcF. Scott Fitzgerald.")
//!     .build()?;
//!
//! assert_eq!(record.control_number(), Some(&b"ocm00012345"[..]));
//! let title = record.get_field("245").map(Subfields::parse);
//! assert_eq!(title.and_then(|s| s.first_value(b'a')), Some(&b"The great Gatsby /"[..]));
//! # Ok::<(), marcutil::MarcError>(())
//! ```

use crate::directory::DirectoryEntry;
use crate::error::{MarcError, Result};
use crate::leader::Leader;

/// Tag of the control number field.
pub const CONTROL_NUMBER_TAG: &str = "001";

/// A decoded MARC record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    leader: Leader,
    directory: Vec<DirectoryEntry>,
    fields: Vec<Vec<u8>>,
}

impl Record {
    /// Create a record with no fields.
    #[must_use]
    pub fn new(leader: Leader) -> Self {
        Record {
            leader,
            directory: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Create a builder for fluently constructing MARC records
    #[must_use]
    pub fn builder(leader: Leader) -> RecordBuilder {
        RecordBuilder {
            leader,
            fields: Vec::new(),
        }
    }

    /// Assemble a record from a directory and its parallel field contents.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::StructuralMismatch`] if the sequences differ in
    /// length or an entry's length is not its content length plus the field
    /// terminator.
    pub fn from_parts(
        leader: Leader,
        directory: Vec<DirectoryEntry>,
        fields: Vec<Vec<u8>>,
    ) -> Result<Self> {
        check_parallel(&directory, &fields)?;
        Ok(Record {
            leader,
            directory,
            fields,
        })
    }

    /// Decoded parts that the field splitter has already checked.
    pub(crate) fn from_decoded(
        leader: Leader,
        directory: Vec<DirectoryEntry>,
        fields: Vec<Vec<u8>>,
    ) -> Self {
        debug_assert_eq!(directory.len(), fields.len());
        Record {
            leader,
            directory,
            fields,
        }
    }

    /// Split the record into its leader, directory and field contents.
    #[must_use]
    pub fn into_parts(self) -> (Leader, Vec<DirectoryEntry>, Vec<Vec<u8>>) {
        (self.leader, self.directory, self.fields)
    }

    /// Record leader
    #[must_use]
    pub fn leader(&self) -> &Leader {
        &self.leader
    }

    /// Mutable access to the leader's non-computed positions.
    pub fn leader_mut(&mut self) -> &mut Leader {
        &mut self.leader
    }

    /// Directory entries in on-disk order.
    #[must_use]
    pub fn directory(&self) -> &[DirectoryEntry] {
        &self.directory
    }

    /// Field contents, terminator-stripped, index-aligned with [`Record::directory`].
    #[must_use]
    pub fn field_contents(&self) -> &[Vec<u8>] {
        &self.fields
    }

    /// Number of variable fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no variable fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Append a field, deriving its directory entry from the content length.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag is not 3 bytes or the content is too long
    /// for a directory entry.
    pub fn add_field(&mut self, tag: impl AsRef<[u8]>, content: impl Into<Vec<u8>>) -> Result<()> {
        let content = content.into();
        let entry = DirectoryEntry::for_content(tag, &content)?;
        self.directory.push(entry);
        self.fields.push(content);
        Ok(())
    }

    /// Iterate over (directory entry, content) pairs in order.
    pub fn fields(&self) -> impl Iterator<Item = (&DirectoryEntry, &[u8])> {
        self.directory
            .iter()
            .zip(self.fields.iter().map(Vec::as_slice))
    }

    /// Iterate over the contents of every field with the given tag.
    pub fn fields_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a [u8]> + 'a {
        self.fields()
            .filter(move |(entry, _)| entry.has_tag(tag))
            .map(|(_, content)| content)
    }

    /// Content of the first field with the given tag.
    #[must_use]
    pub fn get_field(&self, tag: &str) -> Option<&[u8]> {
        self.fields()
            .find(|(entry, _)| entry.has_tag(tag))
            .map(|(_, content)| content)
    }

    /// Content of the first 001 field, if any.
    #[must_use]
    pub fn control_number(&self) -> Option<&[u8]> {
        self.get_field(CONTROL_NUMBER_TAG)
    }

    /// Compose the record into its binary form.
    ///
    /// The record itself is unchanged; the emitted leader carries the
    /// recomputed record length and base address.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::TooLong`] if the record does not fit the format's
    /// length fields.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut leader = self.leader.clone();
        crate::writer::compose(&self.directory, &self.fields, &mut leader)
    }
}

/// Check that `directory` and `fields` describe each other position by position.
pub(crate) fn check_parallel<T: AsRef<[u8]>>(directory: &[DirectoryEntry], fields: &[T]) -> Result<()> {
    if directory.len() != fields.len() {
        return Err(MarcError::StructuralMismatch(format!(
            "directory has {} entries but there are {} fields",
            directory.len(),
            fields.len()
        )));
    }

    for (entry, content) in directory.iter().zip(fields) {
        let content = content.as_ref();
        if entry.field_length() as usize != content.len() + 1 {
            return Err(MarcError::StructuralMismatch(format!(
                "directory length of field {} ({}) does not match its content length ({}) plus terminator",
                entry.tag_str(),
                entry.field_length(),
                content.len()
            )));
        }
    }

    Ok(())
}

/// Builder for fluently constructing MARC records
///
/// Fields are validated when [`RecordBuilder::build`] is called.
#[derive(Debug)]
pub struct RecordBuilder {
    leader: Leader,
    fields: Vec<(Vec<u8>, Vec<u8>)>,
}

impl RecordBuilder {
    /// Append a field
    #[must_use]
    pub fn field(mut self, tag: impl AsRef<[u8]>, content: impl Into<Vec<u8>>) -> Self {
        self.fields.push((tag.as_ref().to_vec(), content.into()));
        self
    }

    /// Build the record
    ///
    /// # Errors
    ///
    /// Returns the first error from [`Record::add_field`].
    pub fn build(self) -> Result<Record> {
        let mut record = Record::new(self.leader);
        for (tag, content) in self.fields {
            record.add_field(tag, content)?;
        }
        Ok(record)
    }
}
