//! # View Iteration Benchmark
//!
//! Multi-component iteration where the pools differ in size. The view should
//! cost roughly the size of the smallest pool, not the largest.
//!
//! Run with: `cargo bench --package tessera_core --bench view_benchmark`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tessera_core::Registry;

const ENTITY_COUNT: usize = 1_000_000;

#[derive(Clone, Copy, Default)]
struct Position {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Clone, Copy, Default)]
struct Velocity {
    x: f32,
    y: f32,
    z: f32,
}

/// Every entity has a Position; one in `stride` also has a Velocity.
fn populate(stride: usize) -> Registry {
    let mut registry = Registry::new();
    for i in 0..ENTITY_COUNT {
        let e = registry.create();
        registry.add(e, Position::default());
        if i % stride == 0 {
            registry.add(e, Velocity { x: 0.1, y: 0.2, z: 0.3 });
        }
    }
    registry
}

/// Benchmark: integrate positions through `each` with varying overlap.
fn bench_each_position_velocity(c: &mut Criterion) {
    let mut group = c.benchmark_group("each_position_velocity");

    for stride in [1, 10, 100] {
        let mut registry = populate(stride);
        group.bench_with_input(BenchmarkId::from_parameter(stride), &stride, |b, _| {
            b.iter(|| {
                registry.each::<(Position, Velocity), _>(|_, (pos, vel)| {
                    pos.x += vel.x * 0.016;
                    pos.y += vel.y * 0.016;
                    pos.z += vel.z * 0.016;
                });
                black_box(registry.len())
            });
        });
    }

    group.finish();
}

/// Benchmark: lazy cursor, counting matches only.
fn bench_cursor_count(c: &mut Criterion) {
    let mut registry = populate(10);
    c.bench_function("cursor_count_1M_stride10", |b| {
        b.iter(|| black_box(registry.view::<(Velocity, Position)>().iter().count()));
    });
}

/// Benchmark: raw parallel slices (theoretical minimum).
fn bench_raw_slice_update(c: &mut Criterion) {
    let mut positions: Vec<[f32; 3]> = vec![[0.0; 3]; ENTITY_COUNT];
    let velocities: Vec<[f32; 3]> = vec![[0.1, 0.2, 0.3]; ENTITY_COUNT];

    c.bench_function("raw_slice_1M_update", |b| {
        b.iter(|| {
            for (pos, vel) in positions.iter_mut().zip(velocities.iter()) {
                pos[0] += vel[0] * 0.016;
                pos[1] += vel[1] * 0.016;
                pos[2] += vel[2] * 0.016;
            }
            black_box(positions.len())
        });
    });
}

criterion_group!(
    benches,
    bench_each_position_velocity,
    bench_cursor_count,
    bench_raw_slice_update,
);

criterion_main!(benches);
