use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use crunchkit::{
    build_mask, decode_background, decode_rle, decrunch, split_scanline, unpack_bitmap,
    ScanlineFields, SCREEN_HEIGHT, SCREEN_WIDTH,
};
use std::hint::black_box;
use std::time::Duration;

#[path = "../tests/common/mod.rs"]
mod common;

use common::{literal_blob, rle_encode};

fn generate_data(size: usize, pattern: &str) -> Vec<u8> {
    match pattern {
        "flat" => vec![0x11; size],
        "stripes" => (0..size).map(|i| ((i / 24) % 32) as u8).collect(),
        "noise" => (0..size)
            .map(|i| {
                let x = i as u32;
                ((x.wrapping_mul(1664525).wrapping_add(1013904223)) >> 13) as u8
            })
            .collect(),
        _ => panic!("Unknown pattern: {}", pattern),
    }
}

fn rle_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("rle_throughput");
    group.measurement_time(Duration::from_secs(5));

    let size = SCREEN_WIDTH * SCREEN_HEIGHT;
    for pattern in ["flat", "stripes", "noise"] {
        let packed = rle_encode(&generate_data(size, pattern));

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(pattern), &packed, |b, data| {
            b.iter(|| decode_rle(black_box(data), size).expect("Decoding failed"));
        });
    }

    group.finish();
}

fn decrunch_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("decrunch_throughput");
    group.measurement_time(Duration::from_secs(5));

    for size in [1024usize, 16 * 1024, 64 * 1024] {
        let blob = literal_blob(&generate_data(size, "noise"));

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &blob, |b, data| {
            b.iter(|| decrunch(black_box(data)).expect("Decrunch failed"));
        });
    }

    group.finish();
}

fn pixel_reassembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("pixel_reassembly");

    // 16 frames of 32x32 at five planes
    let plane_size = 32 * 32 / 8;
    let planes = generate_data(16 * plane_size * 5, "noise");
    let mut chunky = vec![0u8; 16 * 32 * 32];
    group.throughput(Throughput::Bytes(chunky.len() as u64));
    group.bench_function("planar_sprites", |b| {
        b.iter(|| unpack_bitmap(&mut chunky, black_box(&planes), 16, plane_size, 5))
    });

    let scanline = generate_data(SCREEN_WIDTH, "noise");
    group.throughput(Throughput::Bytes(SCREEN_WIDTH as u64));
    group.bench_function("split_scanline", |b| {
        let mut fields = ScanlineFields::screen();
        b.iter(|| {
            let row = fields.row_mut(0).expect("row 0");
            split_scanline(black_box(&scanline), row)
        })
    });

    let mask = generate_data(80 * SCREEN_HEIGHT, "noise");
    group.throughput(Throughput::Bytes(mask.len() as u64));
    group.bench_function("build_mask", |b| {
        b.iter(|| {
            let mut buf = mask.clone();
            build_mask(&mut buf, 40).expect("Mask failed");
            buf
        })
    });

    group.finish();
}

fn background_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("background_decode");
    group.sample_size(50);

    let mut data = vec![0u8; 148];
    data.extend_from_slice(&rle_encode(&generate_data(
        SCREEN_WIDTH * SCREEN_HEIGHT,
        "stripes",
    )));

    group.throughput(Throughput::Bytes((SCREEN_WIDTH * SCREEN_HEIGHT) as u64));
    group.bench_function("full_screen", |b| {
        b.iter(|| decode_background(black_box(&data)).expect("Background failed"))
    });

    group.finish();
}

criterion_group!(
    benches,
    rle_throughput,
    decrunch_throughput,
    pixel_reassembly,
    background_decode
);
criterion_main!(benches);
