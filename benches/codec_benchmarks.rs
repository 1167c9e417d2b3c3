#![allow(missing_docs)]
//! Benchmarks for the marcutil codec.
//!
//! Records are generated in memory so the suite has no fixture files.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use marcutil::{FieldQuery, Leader, MarcReader, Record, RecordStructureValidator, Subfields};
use std::io::Cursor;

/// Build `count` book-like records serialized back to back.
fn generate_records(count: usize) -> Vec<u8> {
    let mut bytes = Vec::new();
    for i in 0..count {
        let record = Record::builder(Leader::default())
            .field("001", format!("ocm{i:08}"))
            .field("008", "830415s1925    nyu           000 1 eng  ")
            .field("100", "1 \x1FaFitzgerald, F. Scott,\x1Fd1896-1940.")
            .field("245", format!("14\x1FaThe great Gatsby /\x1FcF. Scott Fitzgerald.\x1Fn{i}"))
            .field("650", " 0\x1FaRich people\x1FzNew York (State)\x1FvFiction.")
            .field("650", " 0\x1FaLong Island (N.Y.)\x1FvFiction.")
            .build()
            .expect("valid record");
        bytes.extend(record.to_bytes().expect("composable record"));
    }
    bytes
}

/// Benchmark reading 1,000 MARC records.
fn benchmark_read_1k(c: &mut Criterion) {
    let fixture = generate_records(1_000);

    c.bench_function("read_1k_records", |b| {
        b.iter(|| {
            let mut reader = MarcReader::new(Cursor::new(black_box(&fixture)));
            let mut count = 0;
            while let Ok(Some(_record)) = reader.read_record() {
                count += 1;
            }
            count
        });
    });
}

/// Benchmark recomposing and validating 1,000 decoded records.
fn benchmark_roundtrip_1k(c: &mut Criterion) {
    let fixture = generate_records(1_000);
    let records: Vec<Record> = MarcReader::new(Cursor::new(&fixture))
        .records()
        .collect::<marcutil::Result<_>>()
        .expect("fixture decodes");

    c.bench_function("roundtrip_1k_records", |b| {
        b.iter(|| {
            for record in black_box(&records) {
                let bytes = record.to_bytes().expect("composable record");
                black_box(RecordStructureValidator::is_valid(&bytes));
            }
        });
    });
}

/// Benchmark subfield extraction with a leader-filtered query.
fn benchmark_query_1k(c: &mut Criterion) {
    let fixture = generate_records(1_000);
    let records: Vec<Record> = MarcReader::new(Cursor::new(&fixture))
        .records()
        .collect::<marcutil::Result<_>>()
        .expect("fixture decodes");
    let query: FieldQuery = "L[6]=a;245ac:650v".parse().expect("valid query");

    c.bench_function("query_1k_records", |b| {
        b.iter(|| {
            let mut hits = 0;
            for record in black_box(&records) {
                hits += query.search(record).map_or(0, |h| h.len());
            }
            hits
        });
    });

    c.bench_function("subfields_parse_1k", |b| {
        b.iter(|| {
            let mut count = 0;
            for record in black_box(&records) {
                for content in record.fields_by_tag("245") {
                    count += Subfields::parse(content).len();
                }
            }
            count
        });
    });
}

criterion_group!(
    benches,
    benchmark_read_1k,
    benchmark_roundtrip_1k,
    benchmark_query_1k
);
criterion_main!(benches);
