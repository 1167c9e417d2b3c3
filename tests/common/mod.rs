//! Common test helpers and utilities shared across test suite.

#![allow(dead_code)]

use marcutil::{Leader, Record};

/// Creates a book record with a control number, title and two subjects.
pub fn create_book_record() -> Record {
    Record::builder(Leader::default())
        .field("001", "ocm00012345")
        .field("008", "830415s1925    nyu           000 1 eng  ")
        .field("100", "1 \x1FaFitzgerald, F. Scott,\x1Fd1896-1940.")
        .field("245", "14\x1FaThe great Gatsby /\x1FcF. Scott Fitzgerald.")
        .field("650", " 0\x1FaRich people\x1FzNew York (State)\x1FvFiction.")
        .field("650", " 0\x1FaLong Island (N.Y.)\x1FvFiction.")
        .build()
        .expect("valid book record")
}

/// Creates a serial record (leader position 7 = 's').
pub fn create_serial_record() -> Record {
    let leader = Leader::parse(b"00000cas a2200000 a 4500").expect("valid leader");
    Record::builder(leader)
        .field("001", "ocm99999999")
        .field("245", "00\x1FaJournal of bibliographic studies.")
        .field("859", "  \x1FaPrinted\x1Fwhttp://example.org/a\x1Fwhttp://example.org/b")
        .build()
        .expect("valid serial record")
}

/// Creates a record without a control number.
pub fn create_record_without_control_number() -> Record {
    Record::builder(Leader::default())
        .field("245", "00\x1FaUntitled.")
        .build()
        .expect("valid record")
}

/// Serializes records back to back, as they appear in a MARC file.
pub fn concat_records(records: &[Record]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for record in records {
        bytes.extend(record.to_bytes().expect("composable record"));
    }
    bytes
}

/// Builds the smallest useful record by hand: one 001 field containing "123".
pub fn hand_built_record() -> Vec<u8> {
    let mut bytes = b"00042nam a2200037   4500".to_vec();
    bytes.extend_from_slice(b"001000400000");
    bytes.push(0x1E);
    bytes.extend_from_slice(b"123");
    bytes.push(0x1E);
    bytes.push(0x1D);
    bytes
}
