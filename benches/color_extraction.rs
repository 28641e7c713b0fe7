//! Benchmarks for color extraction.
//!
//! - `lex`: tokenizing a page-sized content stream
//! - `match`: color operator matching over the same stream
//! - `analyze`: full pass over plain and Flate-compressed streams

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use std::hint::black_box;
use std::io::Write;

use pdf_chroma::lexer::Lexer;
use pdf_chroma::{ColorExtractor, ColorMatcher, ContentStream};

/// A content stream mixing text, paths and color operators.
fn generate_content(blocks: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(blocks * 96);
    for i in 0..blocks {
        let v = (i % 11) as f32 / 10.0;
        let block = match i % 4 {
            0 => format!("BT /F1 12 Tf {v} g 72 {} Td (Line {i}) Tj ET\n", 700 - i % 600),
            1 => format!("q {v} 0.2 {v} rg 10 {i} 100 20 re f Q\n"),
            2 => format!("{v} 0 0 {v} K 0.5 w 0 0 m 100 {i} l S\n"),
            _ => format!("/DeviceRGB cs {v} {v} 0 sc [(a) -20 (b)] TJ\n"),
        };
        out.extend_from_slice(block.as_bytes());
    }
    out
}

fn compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn bench_lexer(c: &mut Criterion) {
    let content = generate_content(2_000);
    let mut group = c.benchmark_group("lex");
    group.throughput(Throughput::Bytes(content.len() as u64));
    group.bench_function("page", |b| b.iter(|| Lexer::new(black_box(&content)).count()));
    group.finish();
}

fn bench_matcher(c: &mut Criterion) {
    let content = generate_content(2_000);
    let mut group = c.benchmark_group("match");
    group.throughput(Throughput::Bytes(content.len() as u64));
    group.bench_function("page", |b| {
        b.iter(|| ColorMatcher::new(black_box(&content)).operations().count())
    });
    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let extractor = ColorExtractor::new();
    let mut group = c.benchmark_group("analyze");

    for blocks in [100, 1_000, 10_000] {
        let content = generate_content(blocks);
        let plain = vec![ContentStream::new(content.clone())];
        let compressed = vec![ContentStream::compressed(compress(&content))];

        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::new("plain", blocks), &plain, |b, streams| {
            b.iter(|| extractor.analyze(black_box(streams)))
        });
        group.bench_with_input(BenchmarkId::new("flate", blocks), &compressed, |b, streams| {
            b.iter(|| extractor.analyze(black_box(streams)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lexer, bench_matcher, bench_analyze);
criterion_main!(benches);
