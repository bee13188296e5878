//! Criterion benchmarks for store construction.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use store::{
    FixDeferFix, FixDeferFixWriter, FixedMeta, FixedStore, FixedStoreWriter, StoreLimits,
    VarStore, VarStoreWriter,
};

/// Tagged store with `n` entities carrying a name and a number each.
fn make_var_streams(n: u16) -> (Vec<u8>, Vec<u8>) {
    let mut writer = VarStoreWriter::new();
    for entity in 1..=n {
        writer
            .insert_text(entity, 11, "Task name of typical length")
            .insert(entity, 45, &f64::from(entity).to_bits().to_le_bytes());
    }
    writer.finish()
}

/// Fixed store with `n` task-sized records.
fn make_fixed_streams(n: usize) -> (Vec<u8>, Vec<u8>) {
    let mut writer = FixedStoreWriter::new(47);
    let record = vec![0xA5u8; 240];
    for _ in 0..n {
        writer.push(&[], &record);
    }
    writer.finish()
}

fn bench_var_store_decode(c: &mut Criterion) {
    let (meta, data) = make_var_streams(2_000);
    let limits = StoreLimits::default();

    c.bench_function("var_store_decode_2k", |b| {
        b.iter(|| {
            let store = VarStore::decode(&meta, &data, &limits).unwrap();
            black_box(&store);
        });
    });
}

fn bench_fixed_store_decode(c: &mut Criterion) {
    let (meta, data) = make_fixed_streams(2_000);
    let limits = StoreLimits::default();

    c.bench_function("fixed_store_decode_2k", |b| {
        b.iter(|| {
            let meta = FixedMeta::decode(&meta, 47, &limits).unwrap();
            let store = FixedStore::from_meta(&meta, &data, &limits).unwrap();
            black_box(&store);
        });
    });
}

fn bench_deferred_walk(c: &mut Criterion) {
    let mut writer = FixDeferFixWriter::new();
    for i in 0..2_000 {
        writer.push_text(&format!("Resource {i}"));
    }
    let stream = writer.finish();
    let limits = StoreLimits::default();

    c.bench_function("deferred_walk_2k", |b| {
        b.iter(|| {
            let area = FixDeferFix::decode(&stream, &limits).unwrap();
            black_box(area.chunk_count());
        });
    });
}

criterion_group!(
    benches,
    bench_var_store_decode,
    bench_fixed_store_decode,
    bench_deferred_walk
);
criterion_main!(benches);
