//! Criterion benchmarks for solvency_core
//!
//! Run with: cargo bench -p solvency_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jiff::civil::date;
use solvency_core::config::{
    AllocationStrategy, AssetStatistics, AssetWeight, ClaimingAge, ClaimingStrategy,
    IncomeProfile, MarketStatistics, PersonConfig, SimulationConfig, SocialSecurityParams,
    SpendingProfile, TaxConfig,
};
use solvency_core::engine::run;

fn create_config(trial_qty: usize, years: usize) -> SimulationConfig {
    SimulationConfig {
        start_date: date(2026, 1, 1),
        intervals_per_year: 4,
        intervals_per_trial: years * 4,
        trial_qty,
        seed: 42,
        initial_net_worth: 750_000.0,
        primary: PersonConfig {
            birth_date: date(1980, 6, 15),
            income_profiles: vec![IncomeProfile {
                annual_income: 120_000.0,
                yearly_raise: 0.02,
                start_date: date(2026, 1, 1),
                end_date: date(2042, 1, 1),
                tax_deferred_rate: 0.1,
            }],
            historical_earnings: (2005..2026).map(|y| (y, 80_000.0)).collect(),
            claiming: ClaimingStrategy::FixedAge {
                age: ClaimingAge::Full,
            },
            pension: None,
        },
        spouse: None,
        spending_profiles: vec![SpendingProfile {
            yearly_amount: 75_000.0,
            start_date: None,
            end_date: None,
        }],
        dependent_support: None,
        allocation: AllocationStrategy::Flat {
            weights: vec![
                AssetWeight { label: "stocks".into(), weight: 0.65 },
                AssetWeight { label: "bonds".into(), weight: 0.35 },
            ],
        },
        annuity: None,
        statistics: MarketStatistics {
            assets: vec![
                AssetStatistics {
                    label: "stocks".into(),
                    annual_mean: 1.07,
                    annual_std_dev: 0.16,
                },
                AssetStatistics {
                    label: "bonds".into(),
                    annual_mean: 1.035,
                    annual_std_dev: 0.05,
                },
                AssetStatistics {
                    label: "inflation".into(),
                    annual_mean: 1.025,
                    annual_std_dev: 0.015,
                },
            ],
            correlation: vec![
                vec![1.0, 0.15, 0.05],
                vec![0.15, 1.0, 0.25],
                vec![0.05, 0.25, 1.0],
            ],
            inflation_label: "inflation".into(),
        },
        tax: TaxConfig::us_single_2025(),
        social_security: SocialSecurityParams::us_2025(),
        discount_rate: 0.03,
    }
}

fn bench_single_trial_horizons(c: &mut Criterion) {
    let mut group = c.benchmark_group("horizon");
    for years in [10usize, 30, 50] {
        let config = create_config(1, years);
        group.bench_with_input(BenchmarkId::from_parameter(years), &config, |b, config| {
            b.iter(|| run(black_box(config)).unwrap());
        });
    }
    group.finish();
}

fn bench_trial_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("trials");
    group.sample_size(20);
    for trial_qty in [100usize, 1_000] {
        let config = create_config(trial_qty, 30);
        group.bench_with_input(
            BenchmarkId::from_parameter(trial_qty),
            &config,
            |b, config| {
                b.iter(|| run(black_box(config)).unwrap());
            },
        );
    }
    group.finish();
}

fn bench_merton_allocation(c: &mut Criterion) {
    let mut config = create_config(100, 30);
    config.allocation = AllocationStrategy::TotalPortfolio {
        risk_aversion: 3.0,
        high_risk: vec![AssetWeight { label: "stocks".into(), weight: 1.0 }],
        low_risk: vec![AssetWeight { label: "bonds".into(), weight: 1.0 }],
    };
    c.bench_function("merton_100x30yr", |b| {
        b.iter(|| run(black_box(&config)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_single_trial_horizons,
    bench_trial_counts,
    bench_merton_allocation
);
criterion_main!(benches);
