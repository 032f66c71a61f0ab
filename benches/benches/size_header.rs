//! Benchmarks for bit reading and size header decoding
//!
//! Run with: cargo bench --bench size_header

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jxl_bitstream::{BitReader, BitWriter};
use jxl_headers::SizeHeader;

fn encoded(width: u32, height: u32) -> Vec<u8> {
    let mut data = vec![0xFF, 0x0A];
    {
        let mut writer = BitWriter::new(&mut data);
        SizeHeader::new(width, height).encode(&mut writer).unwrap();
    }
    data
}

fn bench_size_header(c: &mut Criterion) {
    let mut group = c.benchmark_group("Size Header");

    let small = encoded(256, 256);
    let ratio = encoded(1920, 1080);
    let explicit = encoded(100_003, 70_001);

    group.bench_function("div8", |b| {
        b.iter(|| SizeHeader::from_codestream(black_box(&small)).unwrap());
    });
    group.bench_function("ratio", |b| {
        b.iter(|| SizeHeader::from_codestream(black_box(&ratio)).unwrap());
    });
    group.bench_function("explicit", |b| {
        b.iter(|| SizeHeader::from_codestream(black_box(&explicit)).unwrap());
    });

    group.finish();
}

fn bench_bit_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("Bit Reader");
    let data: Vec<u8> = (0..4096).map(|i| (i * 31 % 256) as u8).collect();

    for width in [1usize, 9, 30] {
        group.bench_function(format!("read_{width}_bits"), |b| {
            b.iter(|| {
                let mut reader = BitReader::new(black_box(&data));
                let mut sum = 0u64;
                while reader.bits_remaining() >= width as u64 {
                    sum = sum.wrapping_add(reader.read_bits(width).unwrap());
                }
                sum
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_size_header, bench_bit_reader);
criterion_main!(benches);
