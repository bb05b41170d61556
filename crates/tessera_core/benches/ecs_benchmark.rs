//! # ECS Performance Benchmark
//!
//! Entity lifecycle and single-pool access costs.
//!
//! Run with: `cargo bench --package tessera_core --bench ecs_benchmark`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tessera_core::{Entity, Registry};

const ENTITY_COUNT: usize = 1_000_000;

#[derive(Clone, Copy, Default)]
struct Position {
    x: f32,
    y: f32,
    z: f32,
}

/// Benchmark: create N entities in a fresh registry.
fn bench_create_entities(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_entities");

    for count in [10_000, 100_000, ENTITY_COUNT] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut registry = Registry::new();
                for _ in 0..count {
                    black_box(registry.create());
                }
                registry.len()
            });
        });
    }

    group.finish();
}

/// Benchmark: attach one component to every entity.
fn bench_add_components(c: &mut Criterion) {
    c.bench_function("add_position_100K", |b| {
        b.iter(|| {
            let mut registry = Registry::new();
            for i in 0..100_000 {
                let e = registry.create();
                let f = i as f32;
                registry.add(e, Position { x: f, y: f, z: f });
            }
            black_box(registry.len())
        });
    });
}

/// Benchmark: destroy and recreate 100K entities that carry a component.
fn bench_destroy_create_cycle(c: &mut Criterion) {
    let mut registry = Registry::new();
    let mut ids: Vec<Entity> = (0..ENTITY_COUNT / 2)
        .map(|_| {
            let e = registry.create();
            registry.add(e, Position::default());
            e
        })
        .collect();

    c.bench_function("destroy_create_cycle_100K", |b| {
        b.iter(|| {
            for id in ids.iter().take(100_000) {
                registry.destroy(*id);
            }
            for id in ids.iter_mut().take(100_000) {
                *id = registry.create();
                registry.add(*id, Position::default());
            }
            black_box(registry.len())
        });
    });
}

/// Benchmark: pool access patterns.
fn bench_component_access(c: &mut Criterion) {
    let mut registry = Registry::new();
    let ids: Vec<Entity> = (0..ENTITY_COUNT)
        .map(|i| {
            let e = registry.create();
            registry.add(e, Position { x: i as f32, y: 0.0, z: 0.0 });
            e
        })
        .collect();

    let mut group = c.benchmark_group("component_access");

    group.bench_function("dense_slice_write_1M", |b| {
        b.iter(|| {
            for pos in registry.pool_mut::<Position>().components_mut() {
                pos.x += 0.001;
            }
            black_box(registry.len())
        });
    });

    // Random lookups (worst case for cache)
    let sample: Vec<Entity> = {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        (0..10_000)
            .map(|i| {
                let mut hasher = DefaultHasher::new();
                i.hash(&mut hasher);
                ids[(hasher.finish() as usize) % ENTITY_COUNT]
            })
            .collect()
    };

    group.bench_function("random_try_get_10K", |b| {
        b.iter(|| {
            let mut sum = 0.0_f32;
            for &e in &sample {
                if let Some(pos) = registry.try_get::<Position>(e) {
                    sum += pos.x + pos.y + pos.z;
                }
            }
            black_box(sum)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_create_entities,
    bench_add_components,
    bench_destroy_create_cycle,
    bench_component_access,
);

criterion_main!(benches);
