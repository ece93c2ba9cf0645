//! Criterion microbenches for widerface parsing and lookups.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - single box line parsing
//! - image lookups by full scan versus the suffix lookup table

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use widerface::wider::{AnnotationIndex, BBoxRecord};

// Include test fixtures at compile time (no file I/O during benchmark)
const SAMPLE_FIXTURE: &str = include_str!("../tests/fixtures/wider_face_sample_bbx_gt.txt");

/// Builds a synthetic ground-truth file roughly the size of the WIDER FACE
/// validation split.
fn synthetic_annotations(images: usize) -> String {
    let mut out = String::new();
    for i in 0..images {
        let event = i % 62;
        out.push_str(&format!("{event}--Event/{event}_Event_sample_{i}.jpg\n"));
        let boxes = i % 7;
        out.push_str(&format!("{boxes}\n"));
        for b in 0..boxes {
            out.push_str(&format!("{} {} 24 31 {} 0 0 0 {} 0 \n", b * 30, b * 17, b % 3, b % 3));
        }
        if boxes == 0 {
            out.push_str("0 0 0 0 0 0 0 0 0 0 \n");
        }
    }
    out
}

/// Benchmark parsing a single box line.
fn bench_record_parse(c: &mut Criterion) {
    let line = "78 238 14 17 2 0 0 0 0 0 ";
    let mut group = c.benchmark_group("record_parse");
    group.throughput(Throughput::Bytes(line.len() as u64));

    group.bench_function("BBoxRecord::parse", |b| {
        b.iter(|| {
            let record = BBoxRecord::parse(black_box(line)).unwrap();
            black_box(record)
        })
    });

    group.finish();
}

/// Benchmark walking every block of the sample fixture.
fn bench_entries_walk(c: &mut Criterion) {
    let index = AnnotationIndex::from_str_with_source(SAMPLE_FIXTURE, "fixture");
    let mut group = c.benchmark_group("entries_walk");
    group.throughput(Throughput::Bytes(SAMPLE_FIXTURE.len() as u64));

    group.bench_function("sample_fixture", |b| {
        b.iter(|| {
            let count = black_box(&index).entries().filter(Result::is_ok).count();
            black_box(count)
        })
    });

    group.finish();
}

/// Benchmark looking up an image near the end of a large file.
///
/// The scan walks almost every line; the table does a binary search.
fn bench_lookup(c: &mut Criterion) {
    let text = synthetic_annotations(3_200);
    let scan = AnnotationIndex::from_str_with_source(&text, "synthetic");
    let table = scan.clone().with_lookup_table();
    let query = "10_Event_sample_3172.jpg";

    let mut group = c.benchmark_group("lookup");
    group.throughput(Throughput::Elements(1));

    group.bench_function("scan", |b| {
        b.iter(|| {
            let boxes = scan.bounding_boxes(black_box(query)).unwrap();
            black_box(boxes)
        })
    });

    group.bench_function("lookup_table", |b| {
        b.iter(|| {
            let boxes = table.bounding_boxes(black_box(query)).unwrap();
            black_box(boxes)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_record_parse, bench_entries_walk, bench_lookup);
criterion_main!(benches);
