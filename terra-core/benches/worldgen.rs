#![allow(missing_docs)]
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use terra_core::worldgen::ChunkGenerator;
use terra_utils::ChunkPos;

fn bench_generate_single_chunk(c: &mut Criterion) {
    let generator = ChunkGenerator::new(42);
    c.bench_function("chunk_generator generate single chunk", |b| {
        b.iter(|| {
            black_box(generator.generate(black_box(ChunkPos::new(0, 0))));
        });
    });
}

fn bench_generate_biome_grid(c: &mut Criterion) {
    let generator = ChunkGenerator::new(42);
    c.bench_function("chunk_generator biomes_for_chunk", |b| {
        b.iter(|| {
            black_box(generator.biomes_for_chunk(black_box(ChunkPos::new(3, -4))));
        });
    });
}

fn bench_generate_nine_chunks(c: &mut Criterion) {
    let generator = ChunkGenerator::new(7);
    c.bench_function("chunk_generator generate 3x3 region", |b| {
        b.iter(|| {
            for cx in -1..=1 {
                for cz in -1..=1 {
                    black_box(generator.generate(ChunkPos::new(cx, cz)));
                }
            }
        });
    });
}

criterion_group!(benches, bench_generate_single_chunk, bench_generate_biome_grid, bench_generate_nine_chunks);
criterion_main!(benches);
