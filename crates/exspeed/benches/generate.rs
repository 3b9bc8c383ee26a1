//! Criterion benchmarks for program generation and the reference model.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use exspeed::{generate, simulate, GraphSpec};

fn bench_generate_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_depth");

    for depth in [10u32, 100, 1000] {
        let spec = GraphSpec::new(depth, 1000, 1).unwrap();
        group.throughput(Throughput::Elements(depth as u64 + 1));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &spec, |b, spec| {
            b.iter(|| generate(spec));
        });
    }

    group.finish();
}

fn bench_simulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate");

    for error_percent in [0u32, 1, 50] {
        let spec = GraphSpec::new(1000, 10_000, error_percent).unwrap();
        group.throughput(Throughput::Elements(spec.rounds() as u64));
        group.bench_with_input(
            BenchmarkId::new("error_percent", error_percent),
            &spec,
            |b, spec| b.iter(|| simulate(spec)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_generate_depth, bench_simulate);
criterion_main!(benches);
