//! Benchmarks for rolling feature extraction and the window statistics it uses.

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use featcast::core::{Frequency, TimeSeries};
use featcast::features::{adf_pvalue, decomposition_strengths, hurst_exponent, spectral_entropy};
use featcast::preprocessing::RollingFeatureBuilder;

fn generate_seasonal(n: usize, period: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            50.0 + 0.01 * i as f64
                + 5.0 * (2.0 * std::f64::consts::PI * i as f64 / period as f64).sin()
                + ((i * 7919) % 97) as f64 / 97.0
        })
        .collect()
}

fn bench_window_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_statistics");

    for size in [12, 52, 365].iter() {
        let window = generate_seasonal(*size, *size);

        group.bench_with_input(BenchmarkId::new("stl_strengths", size), size, |b, &p| {
            b.iter(|| decomposition_strengths(black_box(&window), p))
        });

        group.bench_with_input(BenchmarkId::new("spectral_entropy", size), size, |b, _| {
            b.iter(|| spectral_entropy(black_box(&window)))
        });

        group.bench_with_input(BenchmarkId::new("adf_pvalue", size), size, |b, _| {
            b.iter(|| adf_pvalue(black_box(&window)))
        });

        if *size >= 100 {
            group.bench_with_input(BenchmarkId::new("hurst", size), size, |b, _| {
                b.iter(|| hurst_exponent(black_box(&window)))
            });
        }
    }

    group.finish();
}

fn bench_rolling_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_features");
    group.sample_size(10);

    let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    for (n, period) in [(500, 12), (500, 52), (800, 365)].iter() {
        let series =
            TimeSeries::from_values(start, Frequency::Daily, generate_seasonal(*n, *period))
                .expect("valid series");

        for jobs in [1, 4] {
            let builder = RollingFeatureBuilder::new(*period).with_n_jobs(jobs);
            group.bench_function(
                BenchmarkId::new(format!("sp{}_jobs{}", period, jobs), n),
                |b| b.iter(|| builder.build(black_box(&series))),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_window_statistics, bench_rolling_builder);
criterion_main!(benches);
