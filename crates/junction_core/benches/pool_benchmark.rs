//! # Pool and Entity Store Benchmark
//!
//! Measures chunked pool growth, masked queries and component updates.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use junction_core::ecs::{Position, Tag, Velocity};
use junction_core::{EntityStore, Pool};

const ENTITY_COUNT: usize = 100_000;

fn populated_store(count: usize) -> EntityStore {
    let mut store = EntityStore::new();
    for i in 0..count {
        let e = store.create_entity();
        store.add_component(e, Position::new(i as f32, 0.0));
        if i % 2 == 0 {
            store.add_component(e, Velocity::new(1.0, 0.5));
        }
        if i % 10 == 0 {
            store.add_component(e, Tag);
        }
    }
    store
}

fn bench_pool_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_growth");
    for chunk in [16, 64, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(chunk), &chunk, |b, &chunk| {
            b.iter(|| {
                let mut pool: Pool<Position> = Pool::with_chunk_size(chunk);
                pool.ensure_size(ENTITY_COUNT);
                for i in 0..ENTITY_COUNT {
                    pool.create(i, Position::new(i as f32, 0.0));
                }
                black_box(pool.live_count())
            });
        });
    }
    group.finish();
}

fn bench_create_entities(c: &mut Criterion) {
    c.bench_function("create_entities_with_components_100K", |b| {
        b.iter(|| black_box(populated_store(ENTITY_COUNT).alive_count()));
    });
}

fn bench_query(c: &mut Criterion) {
    let store = populated_store(ENTITY_COUNT);

    c.bench_function("query_position_velocity_100K", |b| {
        b.iter(|| black_box(store.query_of::<(Position, Velocity)>().count()));
    });

    c.bench_function("query_position_tag_100K", |b| {
        b.iter(|| black_box(store.query_of::<(Position, Tag)>().count()));
    });
}

fn bench_cursor_update(c: &mut Criterion) {
    let mut store = populated_store(ENTITY_COUNT);

    c.bench_function("cursor_integrate_positions_100K", |b| {
        b.iter(|| {
            let mut cursor = store.cursor_of::<(Position, Velocity)>();
            while let Some(id) = cursor.next(&store) {
                let Some(&velocity) = store.get_component::<Velocity>(id) else {
                    continue;
                };
                if let Some(position) = store.get_component_mut::<Position>(id) {
                    position.integrate(velocity, 0.016);
                }
            }
        });
    });
}

fn bench_component_access(c: &mut Criterion) {
    let store = populated_store(ENTITY_COUNT);
    let ids: Vec<_> = store.query_of::<(Position,)>().collect();

    c.bench_function("get_component_100K", |b| {
        b.iter(|| {
            let mut sum = 0.0_f32;
            for id in &ids {
                if let Some(position) = store.get_component::<Position>(*id) {
                    sum += position.x;
                }
            }
            black_box(sum)
        });
    });
}

criterion_group!(
    benches,
    bench_pool_growth,
    bench_create_entities,
    bench_query,
    bench_cursor_update,
    bench_component_access,
);

criterion_main!(benches);
