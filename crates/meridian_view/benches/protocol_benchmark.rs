//! Benchmark for rebuild event serialization.
//!
//! Run with: cargo bench --package meridian_view --bench protocol_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use meridian_view::{
    BuildAreaPalette, DynamicRebuild, PaletteSlot, StaticRebuild, ViewDeserializer, ViewSerializer,
};

fn full_palette() -> BuildAreaPalette {
    let mut palette = BuildAreaPalette::new();
    for altitude in 0..4u8 {
        for local_x in 0..13 {
            for local_z in 0..13 {
                palette.set(
                    altitude,
                    local_x,
                    local_z,
                    Some(PaletteSlot {
                        source_altitude: altitude,
                        rotation: (local_x as u8 + local_z as u8) % 4,
                        origin_x: 350 + local_x as u16,
                        origin_z: 412 + local_z as u16,
                    }),
                );
            }
        }
    }
    palette
}

fn benchmark_static_serialize(c: &mut Criterion) {
    let event = StaticRebuild {
        center_zone_x: 804,
        center_zone_z: 4,
        key_sets: vec![vec![1, 2, 3, 4]; 13],
    };
    let mut serializer = ViewSerializer::new();

    c.bench_function("serialize_static", |b| {
        b.iter(|| black_box(serializer.serialize_static(black_box(&event))));
    });
}

fn benchmark_dynamic_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_dynamic");

    let identity = DynamicRebuild {
        immediate: false,
        center_zone_x: 804,
        center_zone_z: 4,
        palette: BuildAreaPalette::new(),
        key_sets: Vec::new(),
    };
    let full = DynamicRebuild {
        immediate: true,
        center_zone_x: 804,
        center_zone_z: 4,
        palette: full_palette(),
        key_sets: vec![vec![1, 2, 3, 4]; 13],
    };

    group.throughput(Throughput::Elements(4 * 13 * 13));
    group.bench_function("identity_palette", |b| {
        let mut serializer = ViewSerializer::new();
        b.iter(|| black_box(serializer.serialize_dynamic(black_box(&identity))));
    });
    group.bench_function("full_palette", |b| {
        let mut serializer = ViewSerializer::new();
        b.iter(|| black_box(serializer.serialize_dynamic(black_box(&full))));
    });

    group.finish();
}

fn benchmark_dynamic_round_trip(c: &mut Criterion) {
    let event = DynamicRebuild {
        immediate: true,
        center_zone_x: 804,
        center_zone_z: 4,
        palette: full_palette(),
        key_sets: vec![vec![1, 2, 3, 4]; 13],
    };
    let mut serializer = ViewSerializer::new();
    assert!(serializer.serialize_dynamic(&event));
    let bytes = serializer.as_slice().to_vec();

    c.bench_function("deserialize_dynamic_full", |b| {
        b.iter(|| {
            let mut deserializer = ViewDeserializer::new(black_box(&bytes));
            black_box(deserializer.deserialize_dynamic(|_| 4))
        });
    });
}

criterion_group!(
    benches,
    benchmark_static_serialize,
    benchmark_dynamic_serialize,
    benchmark_dynamic_round_trip
);
criterion_main!(benches);
