#![no_main]

use libfuzzer_sys::fuzz_target;
use marcutil::{MarcReader, RecordStructureValidator};
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let _ = RecordStructureValidator::validate(data);

    let mut reader = MarcReader::new(Cursor::new(data));
    for record in reader.records() {
        let Ok(record) = record else { break };
        for (_, content) in record.fields() {
            let _ = marcutil::Subfields::parse(content).len();
        }
    }
});
