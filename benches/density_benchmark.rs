//! Benchmarks for density estimation, binning and density scatter rendering.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use density_viz::binning::bin_points;
use density_viz::points::PointSeries;
use density_viz::prelude::*;

fn sample(size: usize) -> (Vec<f32>, Vec<f32>) {
    let x: Vec<f32> = (0..size).map(|i| (i as f32 * 0.013).sin() * 10.0).collect();
    let y: Vec<f32> = x.iter().enumerate().map(|(i, v)| v + (i as f32 * 0.7).cos()).collect();
    (x, y)
}

fn density_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate_density");

    for size in [100, 1_000, 5_000] {
        let (x, y) = sample(size);
        group.bench_with_input(BenchmarkId::new("kde", size), &size, |b, _| {
            b.iter(|| estimate_density(black_box(&x), black_box(&y), DensityMethod::Kde, true))
        });
        group.bench_with_input(BenchmarkId::new("empirical", size), &size, |b, _| {
            b.iter(|| {
                estimate_density(black_box(&x), black_box(&y), DensityMethod::empirical(), true)
            })
        });
    }

    group.finish();
}

fn binning_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("bin_points");

    for size in [1_000, 10_000, 100_000] {
        let (x, y) = sample(size);
        let points = PointSeries::new(&x, &y).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| bin_points(black_box(&points), 200).unwrap())
        });
    }

    group.finish();
}

fn scatter_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("density_scatter");

    for size in [1_000, 10_000] {
        let (x, y) = sample(size);
        let df = DataFrame::new().with_f32("x", &x).with_f32("y", &y);
        let options = DensityScatterOptions::new();
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let ax = density_scatter(&DataSource::frame(&df, "x", "y"), &options).unwrap();
                ax.to_framebuffer(800, 600).unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, density_benchmark, binning_benchmark, scatter_benchmark);
criterion_main!(benches);
