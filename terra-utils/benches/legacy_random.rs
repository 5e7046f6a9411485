#![allow(missing_docs)]
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use terra_utils::random::LegacyRandom;

fn bench_new(c: &mut Criterion) {
    c.bench_function("legacy_random new", |b| {
        b.iter(|| {
            black_box(LegacyRandom::new(black_box(12345)));
        });
    });
}

fn bench_next_i32(c: &mut Criterion) {
    let mut rng = LegacyRandom::new(0);
    c.bench_function("legacy_random next_i32", |b| {
        b.iter(|| {
            black_box(rng.next_i32());
        });
    });
}

fn bench_next_i32_bounded(c: &mut Criterion) {
    let mut rng = LegacyRandom::new(0);
    c.bench_function("legacy_random next_i32_bounded(100)", |b| {
        b.iter(|| {
            black_box(rng.next_i32_bounded(black_box(100)));
        });
    });
}

fn bench_next_i64(c: &mut Criterion) {
    let mut rng = LegacyRandom::new(0);
    c.bench_function("legacy_random next_i64", |b| {
        b.iter(|| {
            black_box(rng.next_i64());
        });
    });
}

fn bench_next_f64(c: &mut Criterion) {
    let mut rng = LegacyRandom::new(0);
    c.bench_function("legacy_random next_f64", |b| {
        b.iter(|| {
            black_box(rng.next_f64());
        });
    });
}

fn bench_next_gaussian(c: &mut Criterion) {
    let mut rng = LegacyRandom::new(0);
    c.bench_function("legacy_random next_gaussian", |b| {
        b.iter(|| {
            black_box(rng.next_gaussian());
        });
    });
}

fn bench_sequential_generation(c: &mut Criterion) {
    c.bench_function("legacy_random 1000 next_i32 calls", |b| {
        b.iter(|| {
            let mut rng = LegacyRandom::new(black_box(0));
            for _ in 0..1000 {
                black_box(rng.next_i32());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_new,
    bench_next_i32,
    bench_next_i32_bounded,
    bench_next_i64,
    bench_next_f64,
    bench_next_gaussian,
    bench_sequential_generation,
);
criterion_main!(benches);
