// SPDX-License-Identifier: MIT OR Apache-2.0
// Benchmarks: missing_docs - criterion_group! macro generates undocumentable code
#![allow(missing_docs)]
// Benchmarks: clippy lints relaxed for benchmark code (not production)
#![allow(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Benchmarks for capture text parsing and file name decoding

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rcuperf::capture::{CaptureParser, NumberFormat};
use rcuperf::core::{KeyCodec, KeyLayout};
use std::fmt::Write;
use std::hint::black_box;

/// A perf-wrapped capture with `repeats` metric blocks
fn generate_capture(repeats: usize) -> String {
    let mut text = String::new();
    for i in 0..repeats {
        write!(
            text,
            "reader sum: {},{:03}.5\nwriter sum: {}\nreader av: {}\nwriter av: {}\n",
            i + 1,
            i % 1000,
            i * 7,
            i * 3,
            i * 7
        )
        .unwrap();
    }
    text.push_str(
        "\n Performance counter stats for './measure_rcuptr 8196 0 3 1':\n\n\
         \x20      2003.145678      task-clock (msec)         #    3.990 CPUs utilized\n\
         \x20            1,024      context-switches          #    0.511 K/sec\n\
         \x20    7,563,210,017      cycles                    #    3.776 GHz\n",
    );
    text
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("capture_parse");
    let parser = CaptureParser::standard(NumberFormat::default()).unwrap();

    for repeats in [1usize, 10, 100] {
        let text = generate_capture(repeats);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("standard", repeats), &text, |b, text| {
            b.iter(|| parser.parse(black_box(text)));
        });
    }

    let noise = "segfault\n".repeat(500);
    group.throughput(Throughput::Bytes(noise.len() as u64));
    group.bench_function("no_match", |b| {
        b.iter(|| parser.parse(black_box(&noise)));
    });

    group.finish();
}

fn bench_file_names(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_name");

    let basic = KeyCodec::new(KeyLayout::Basic);
    group.bench_function("parse/basic", |b| {
        b.iter(|| basic.parse_file_name(black_box("measure_tbb_qrw_mutex__1048576__1__62__1.4")));
    });

    let with_kind = KeyCodec::new(KeyLayout::WithReadKind);
    group.bench_function("parse/read_kind", |b| {
        b.iter(|| with_kind.parse_file_name(black_box("measure_rcuptr__8196__0__3__1__find.0")));
    });

    group.bench_function("parse/malformed", |b| {
        b.iter(|| basic.parse_file_name(black_box("measure_rcuptr__8196__x__3__1.0")));
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_file_names);
criterion_main!(benches);
