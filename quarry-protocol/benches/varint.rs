use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use quarry_protocol::varint::{parse_varint, serialize_varint};
use std::hint::black_box;

fn input(bytes: &'static [u8]) -> (BenchmarkId, &'static [u8]) {
    (
        BenchmarkId::new("parse_varint", format!("{bytes:?}")),
        bytes,
    )
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("VarInt Parse");

    for (id, bytes) in [
        input(&[0x00]),
        input(&[0xFF, 0x7F]),
        input(&[0xFF, 0xFF, 0xFF, 0x7F]),
        input(&[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]),
    ] {
        group.bench_with_input(id, &bytes, |b, i| {
            b.iter(|| {
                let mut src: &[u8] = black_box(*i);
                parse_varint::<u32, _>(&mut src)
            })
        });
    }

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("VarInt Serialize");

    for value in [0_u32, 0x3FFF, 0x0FFF_FFFF, u32::MAX] {
        group.bench_with_input(
            BenchmarkId::new("serialize_varint", value),
            &value,
            |b, i| {
                let mut sink = Vec::with_capacity(8);
                b.iter(|| {
                    sink.clear();
                    serialize_varint(black_box(*i), &mut sink)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_serialize);
criterion_main!(benches);
