//! Full stochastic lifecycles: benefits, taxes, allocation, and the annuity
//! running together. Assertions here are structural and directional, not
//! numeric.

use jiff::civil::date;

use super::{frozen_config, level_spending, working_profile};
use crate::config::{
    AllocationStrategy, AnnuityConfig, AssetStatistics, AssetWeight, ClaimingStrategy,
    GlidePoint, MarketStatistics, PensionConfig, PensionStrategy, SimulationConfig,
};
use crate::engine::run;

/// A stochastic two-asset economy with modest inflation.
fn stochastic_config() -> SimulationConfig {
    let mut config = frozen_config(1.0);
    config.statistics = MarketStatistics {
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
    };
    config.allocation = AllocationStrategy::Flat {
        weights: vec![
            AssetWeight { label: "stocks".into(), weight: 0.6 },
            AssetWeight { label: "bonds".into(), weight: 0.4 },
        ],
    };
    config.tax.portfolio_rate = 0.15;
    config.trial_qty = 200;
    config.intervals_per_trial = 120;
    config.primary.income_profiles = vec![working_profile(120_000.0, 15)];
    config.primary.historical_earnings = (2005..2026).map(|y| (y, 70_000.0)).collect();
    config.spending_profiles = vec![level_spending(70_000.0)];
    config
}

#[test]
fn success_rate_is_a_probability_and_wealth_helps() {
    let config = stochastic_config();
    let results = run(&config).unwrap();
    let base_rate = results.success_rate();
    assert!((0.0..=1.0).contains(&base_rate));

    let mut rich = config.clone();
    rich.initial_net_worth *= 5.0;
    let rich_rate = run(&rich).unwrap().success_rate();
    assert!(
        rich_rate >= base_rate,
        "more wealth lowered the success rate: {rich_rate} < {base_rate}"
    );
}

#[test]
fn heavier_spending_never_raises_the_success_rate() {
    let config = stochastic_config();
    let base = run(&config).unwrap().success_rate();

    let mut frugal = config.clone();
    frugal.spending_profiles = vec![level_spending(40_000.0)];
    let frugal_rate = run(&frugal).unwrap().success_rate();
    assert!(frugal_rate >= base);
}

#[test]
fn glide_path_and_merton_run_end_to_end() {
    let high = vec![AssetWeight { label: "stocks".into(), weight: 1.0 }];
    let low = vec![AssetWeight { label: "bonds".into(), weight: 1.0 }];

    for allocation in [
        AllocationStrategy::GlidePath {
            points: vec![
                GlidePoint { age: 45.0, low_risk_ratio: 0.1 },
                GlidePoint { age: 70.0, low_risk_ratio: 0.7 },
            ],
            high_risk: high.clone(),
            low_risk: low.clone(),
        },
        AllocationStrategy::TotalPortfolio {
            risk_aversion: 3.0,
            high_risk: high.clone(),
            low_risk: low.clone(),
        },
        AllocationStrategy::NetWorthPivot {
            target: 800_000.0,
            below: high.clone(),
            above: low.clone(),
        },
    ] {
        let mut config = stochastic_config();
        config.trial_qty = 25;
        config.allocation = allocation;
        let results = run(&config).unwrap();
        assert_eq!(results.trials.len(), 25);
        for trial in &results.trials {
            assert_eq!(trial.intervals.len(), 120);
            assert!(trial.intervals.iter().all(|i| i.state.net_worth >= 0.0));
            assert!(
                trial
                    .intervals
                    .iter()
                    .all(|i| i.state.net_worth.is_finite())
            );
        }
    }
}

#[test]
fn household_with_spouse_pension_and_annuity_runs() {
    let mut config = stochastic_config();
    config.trial_qty = 25;

    let mut spouse = config.primary.clone();
    spouse.birth_date = date(1982, 3, 1);
    spouse.income_profiles = vec![working_profile(60_000.0, 10)];
    spouse.historical_earnings = (2010..2026).map(|y| (y, 40_000.0)).collect();
    spouse.claiming = ClaimingStrategy::SameAsPrimary;
    spouse.pension = Some(PensionConfig {
        annual_payment: 0.0,
        strategy: PensionStrategy::CashOut {
            contribution_rate: 0.04,
            account_growth: 1.05,
            service_start_year: 2015,
        },
    });
    config.spouse = Some(spouse);

    config.primary.claiming = ClaimingStrategy::NetWorthTrigger {
        minimum_age: 62.0,
        maximum_age: 70.0,
        net_worth_target: 300_000.0,
    };
    config.primary.pension = Some(PensionConfig {
        annual_payment: 18_000.0,
        strategy: PensionStrategy::FixedAge { age: 65.0 },
    });
    config.annuity = Some(AnnuityConfig {
        contribution_rate: 0.2,
        annual_yield: 1.04,
        payout_rate: 0.0125,
        net_worth_target: 250_000.0,
    });

    let results = run(&config).unwrap();
    assert_eq!(results.trials.len(), 25);

    // The spouse's cash-out fires at most once per trial, at the last
    // working date.
    for trial in &results.trials {
        let payouts: Vec<_> = trial
            .intervals
            .iter()
            .filter(|i| i.transactions.income.pension > 20_000.0)
            .collect();
        assert!(payouts.len() <= 1, "cash-out paid more than once");
    }
}

#[test]
fn results_serialize_to_flat_rows() {
    let mut config = stochastic_config();
    config.trial_qty = 2;
    config.intervals_per_trial = 8;
    let results = run(&config).unwrap();
    let rows = results.rows();
    assert_eq!(rows.len(), 16);
    let json = serde_json::to_string(&rows).unwrap();
    assert!(json.contains("\"net_worth\""));
}
