//! # ClassDraw Benchmarks
//!
//! | Path | Target |
//! |------|--------|
//! | `available_numbers` at the largest pool | < 10µs |
//! | Uncontended draw against the memory store | < 100µs |
//! | Full classroom (23 draws) then reset | < 5ms |

use std::sync::Arc;
use std::time::Duration;

use cd_01_state_store::{MemoryDocumentStore, StateStoreClient};
use cd_02_draw_engine::{available_numbers, DrawEngine, ResetOperation, RetryPolicy};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shared_types::{DEFAULT_TOTAL_NUMBERS, MAX_TOTAL_NUMBERS};

fn bench_available_numbers(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection");

    for drawn_count in [0u32, 50, 99] {
        let drawn: Vec<u32> = (1..=drawn_count).collect();
        group.bench_with_input(
            BenchmarkId::new("available_numbers", drawn_count),
            &drawn,
            |b, drawn| b.iter(|| black_box(available_numbers(MAX_TOTAL_NUMBERS, drawn))),
        );
    }

    group.finish();
}

fn bench_draw(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    let mut group = c.benchmark_group("draw-engine");
    group.measurement_time(Duration::from_secs(10));

    let store = StateStoreClient::with_default_keys(Arc::new(MemoryDocumentStore::new()));
    let engine = DrawEngine::new(store.clone(), RetryPolicy::immediate(3)).with_seed(1);
    let reset = ResetOperation::new(store, "bench");

    group.bench_function("single_draw_then_reset", |b| {
        b.iter(|| {
            runtime.block_on(async {
                black_box(engine.draw("bench").await.unwrap());
                reset.reset("bench").await.unwrap();
            })
        })
    });

    group.throughput(Throughput::Elements(u64::from(DEFAULT_TOTAL_NUMBERS)));
    group.bench_function("full_classroom", |b| {
        b.iter(|| {
            runtime.block_on(async {
                for i in 0..DEFAULT_TOTAL_NUMBERS {
                    black_box(engine.draw(&format!("class-{}", i)).await.unwrap());
                }
                reset.reset("bench").await.unwrap();
            })
        })
    });

    group.finish();
}

criterion_group!(benches, bench_available_numbers, bench_draw);
criterion_main!(benches);
