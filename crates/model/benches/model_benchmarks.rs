//! Benchmarks for fama-model regression.
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use fama_model::{align, regress};
use fama_primitives::{Date, FactorName, FactorTable, ModelVariant, ReturnSeries};
use rand::Rng;

fn dates(n: usize) -> Vec<Date> {
    let first = Date::from_ymd_opt(2000, 1, 3).unwrap();
    first.iter_days().take(n).collect()
}

fn random_values(n: usize, scale: f64) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    (0..n).map(|_| (rng.r#gen::<f64>() - 0.5) * scale).collect()
}

fn random_factors(n: usize) -> FactorTable {
    FactorTable::new(
        dates(n),
        FactorName::ALL.into_iter().map(|name| {
            let scale = if name == FactorName::Rf { 0.0002 } else { 0.04 };
            (name, random_values(n, scale))
        }),
    )
    .unwrap()
}

/// Ticker returns on every other factor date, so alignment has to fill.
fn random_returns(n: usize) -> ReturnSeries {
    let values = random_values(n, 0.06);
    ReturnSeries::from_pairs(
        "Return",
        dates(n).into_iter().zip(values).step_by(2),
    )
    .unwrap()
}

fn bench_regress(c: &mut Criterion) {
    let mut group = c.benchmark_group("regress");
    group.sample_size(50);

    // One, five and twenty years of trading days.
    for n_days in [252, 1260, 5040] {
        let factors = random_factors(n_days);
        let returns = random_returns(n_days);

        for variant in ModelVariant::ALL {
            group.throughput(Throughput::Elements(n_days as u64));
            group.bench_with_input(
                BenchmarkId::new(variant.as_str(), n_days),
                &variant,
                |b, &variant| {
                    b.iter(|| {
                        regress("BENCH", black_box(&returns), black_box(&factors), variant).unwrap()
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_align(c: &mut Criterion) {
    let mut group = c.benchmark_group("align");

    for n_days in [252, 5040] {
        let factors = random_factors(n_days);
        let returns = random_returns(n_days);

        group.bench_with_input(BenchmarkId::from_parameter(n_days), &n_days, |b, _| {
            b.iter(|| {
                align(black_box(&returns), black_box(&factors), ModelVariant::SixFactor).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_regress, bench_align);

criterion_main!(benches);
