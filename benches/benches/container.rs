//! Benchmarks for box walking and codestream reassembly
//!
//! Run with: cargo bench --bench container

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jxl_headers::{reassemble, write_box, write_container_header, BoxType, Boxes};

/// Container holding `len` codestream bytes split into `parts` fragments,
/// written in reverse index order
fn fragmented_container(len: usize, parts: usize) -> Vec<u8> {
    let codestream: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
    let mut data = Vec::with_capacity(len + parts * 12 + 64);
    write_container_header(&mut data).unwrap();

    let chunk_len = len.div_ceil(parts);
    let chunks: Vec<_> = codestream.chunks(chunk_len).enumerate().collect();
    for (index, chunk) in chunks.into_iter().rev() {
        let mut payload = (index as u32).to_be_bytes().to_vec();
        payload.extend_from_slice(chunk);
        write_box(&mut data, BoxType::JxlPartial, &payload, false).unwrap();
    }
    data
}

fn bench_box_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("Box Walk");

    for parts in [16, 256, 4096] {
        let data = fragmented_container(1 << 20, parts);
        group.bench_with_input(BenchmarkId::new("boxes", parts), &data, |b, data| {
            b.iter(|| Boxes::new(black_box(data)).filter(|r| r.is_ok()).count());
        });
    }

    group.finish();
}

fn bench_reassemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("Reassemble");
    group.throughput(Throughput::Bytes(1 << 20));

    let mut single = Vec::new();
    write_container_header(&mut single).unwrap();
    write_box(&mut single, BoxType::JxlCodestream, &vec![0x5A; 1 << 20], false).unwrap();
    group.bench_function("single_jxlc_1MiB", |b| {
        b.iter(|| reassemble(black_box(&single)).unwrap().codestream.len());
    });

    for parts in [2, 64, 1024] {
        let data = fragmented_container(1 << 20, parts);
        group.bench_with_input(BenchmarkId::new("jxlp_1MiB", parts), &data, |b, data| {
            b.iter(|| reassemble(black_box(data)).unwrap().codestream.len());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_box_walk, bench_reassemble);
criterion_main!(benches);
