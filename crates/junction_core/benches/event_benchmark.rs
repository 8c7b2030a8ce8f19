//! # Event Bus Benchmark
//!
//! Measures synchronous dispatch against queued delivery.

#![allow(missing_docs)]

use std::cell::Cell;
use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use junction_core::EventBus;

#[derive(Clone, Copy)]
struct CountEvent(u64);

fn bench_sync_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit_sync");
    for subscribers in [1, 8, 64] {
        let total = Rc::new(Cell::new(0_u64));
        let mut bus = EventBus::new();
        for _ in 0..subscribers {
            let total = Rc::clone(&total);
            bus.subscribe(move |event: &CountEvent| total.set(total.get() + event.0));
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(subscribers),
            &subscribers,
            |b, _| {
                b.iter(|| bus.emit(CountEvent(black_box(1))));
            },
        );
        black_box(total.get());
    }
    group.finish();
}

fn bench_queued_dispatch(c: &mut Criterion) {
    let mut bus = EventBus::new();
    let mailbox = bus.subscribe_queued::<CountEvent>(1024);

    c.bench_function("emit_queued_1K_then_drain", |b| {
        b.iter(|| {
            for i in 0..1024 {
                bus.emit(CountEvent(i));
            }
            black_box(mailbox.drain().len())
        });
    });
}

fn bench_unsubscribed_emit(c: &mut Criterion) {
    let mut bus = EventBus::new();
    c.bench_function("emit_no_subscribers", |b| {
        b.iter(|| bus.emit(CountEvent(black_box(7))));
    });
}

criterion_group!(
    benches,
    bench_sync_dispatch,
    bench_queued_dispatch,
    bench_unsubscribed_emit,
);

criterion_main!(benches);
