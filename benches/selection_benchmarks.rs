//! # Selection Benchmarks
//!
//! Per-call cost of each strategy as the candidate list grows.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use endpoint_router::{Endpoint, NoopObserver, Router, SelectionObserver, StrategyKind};
use std::sync::Arc;

/// Create a candidate list with every recognized metadata key populated
fn create_endpoints(count: usize) -> Vec<Endpoint> {
    (0..count)
        .map(|i| {
            Endpoint::new(format!("instance-{}", i), "127.0.0.1", 8000 + (i % 1000) as u16)
                .with_metadata("weight", ((i % 5) + 1).to_string())
                .with_metadata("activeConnections", (i % 17).to_string())
                .with_metadata("avgResponseTime", (20 + i % 200).to_string())
        })
        .collect()
}

fn benchmark_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("endpoint_selection");

    for &count in &[3usize, 32, 256] {
        let endpoints = create_endpoints(count);

        for kind in StrategyKind::ALL {
            let observer: Arc<dyn SelectionObserver> = Arc::new(NoopObserver);
            let router = Router::with_observer(kind.build(observer.clone()), observer);

            group.throughput(Throughput::Elements(1));
            group.bench_with_input(BenchmarkId::new(kind.name(), count), &endpoints, |b, list| {
                b.iter(|| black_box(router.choose(black_box(list))));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_strategies);
criterion_main!(benches);
