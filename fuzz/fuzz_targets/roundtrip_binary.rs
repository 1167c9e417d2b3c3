#![no_main]

use libfuzzer_sys::fuzz_target;
use marcutil::{read_next_record, RecordStructureValidator};
use std::io::Cursor;

// Any record the reader accepts must compose back to the bytes it came from,
// up to the directory starting positions, which are recomputed on write.
fuzz_target!(|data: &[u8]| {
    let mut cursor = Cursor::new(data);
    let Ok(Some(record)) = read_next_record(&mut cursor) else {
        return;
    };

    let bytes = record.to_bytes().expect("decoded record recomposes");
    assert!(RecordStructureValidator::is_valid(&bytes));

    let redecoded = read_next_record(&mut Cursor::new(&bytes))
        .expect("recomposed record decodes")
        .expect("recomposed record is not empty");
    assert_eq!(redecoded.field_contents(), record.field_contents());

    let mut offset = 0;
    let canonical_starts = record.directory().iter().all(|entry| {
        let ok = entry.field_start() == offset;
        offset += entry.field_length();
        ok
    });
    if canonical_starts {
        let consumed = usize::try_from(cursor.position()).expect("position fits");
        assert_eq!(bytes, &data[..consumed]);
    }
});
