//! Benchmarks for the hot paths of result reduction and edge ablation

use clusterbench::testkit::fanout_graph;
use clusterbench::BenchResult;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn benchmark_ablation(c: &mut Criterion) {
    let graph = fanout_graph(1_000);

    let mut group = c.benchmark_group("ablation");
    group.bench_function("ablate_half_of_1000_edges", |b| {
        b.iter(|| {
            let ablated = black_box(&graph).ablate_edges(0.5);
            black_box(ablated);
        });
    });
    group.finish();
}

fn benchmark_averaging(c: &mut Criterion) {
    let results: Vec<BenchResult> = (0..10_000)
        .map(|i| BenchResult::new(f64::from(i) / 10_000.0))
        .collect();

    let mut group = c.benchmark_group("averaging");
    group.bench_function("average_10k_results", |b| {
        b.iter(|| {
            let average = BenchResult::average(black_box(&results).iter().copied()).unwrap();
            black_box(average);
        });
    });
    group.finish();
}

criterion_group!(benches, benchmark_ablation, benchmark_averaging);
criterion_main!(benches);
