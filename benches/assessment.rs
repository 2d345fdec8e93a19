//! Benchmark for single and batch soil assessment
//!
//! Compares sequential and Rayon batch assessment over the same samples.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use soil_health_fahp::{FuzzyComparisonMatrix, IndicatorValues, SoilHealthAssessor, WeightVector};
use std::hint::black_box;

fn create_samples(assessor: &SoilHealthAssessor, count: usize) -> Vec<IndicatorValues> {
    let mut rng = StdRng::seed_from_u64(42);
    let specs = assessor.registry().specs();
    (0..count)
        .map(|_| std::array::from_fn(|i| rng.gen_range(specs[i].min_value..=specs[i].max_value)))
        .collect()
}

fn bench_weight_derivation(c: &mut Criterion) {
    let matrix = FuzzyComparisonMatrix::expert_default();
    c.bench_function("derive_expert_weights", |b| {
        b.iter(|| WeightVector::from_matrix(black_box(&matrix)))
    });
}

fn bench_single_assessment(c: &mut Criterion) {
    let assessor = SoilHealthAssessor::default();
    let values = assessor.registry().optimal_midpoints();

    c.bench_function("assess_single", |b| b.iter(|| assessor.assess(black_box(&values))));
    c.bench_function("assess_detailed_single", |b| {
        b.iter(|| assessor.assess_detailed(black_box(&values)))
    });
}

fn bench_batch_assessment(c: &mut Criterion) {
    let assessor = SoilHealthAssessor::default();
    let mut group = c.benchmark_group("assess_batch");

    for size in [100, 1_000, 10_000] {
        let samples = create_samples(&assessor, size);
        group.bench_with_input(BenchmarkId::new("sequential", size), &samples, |b, samples| {
            b.iter(|| assessor.assess_batch(black_box(samples)))
        });
        group.bench_with_input(BenchmarkId::new("parallel", size), &samples, |b, samples| {
            b.iter(|| assessor.assess_batch_parallel(black_box(samples)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_weight_derivation,
    bench_single_assessment,
    bench_batch_assessment
);
criterion_main!(benches);
