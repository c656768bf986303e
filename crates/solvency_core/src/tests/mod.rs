//! Integration tests for the solvency simulation engine
//!
//! Tests are organized by topic:
//! - `scenarios` - Deterministic end-to-end runs with hand-checkable numbers
//! - `lifecycle` - Full stochastic lifecycles exercising benefits, taxes,
//!   allocation, and the annuity together

mod lifecycle;

use jiff::civil::date;

use crate::config::{
    AllocationStrategy, AssetStatistics, AssetWeight, ClaimingAge, ClaimingStrategy,
    IncomeProfile, MarketStatistics, PersonConfig, SimulationConfig, SocialSecurityParams,
    SpendingProfile, TaxConfig,
};

/// A frozen single-asset economy: riskless yield, zero inflation. Runs built
/// on this are fully deterministic regardless of seed.
pub(crate) fn frozen_statistics(annual_yield: f64) -> MarketStatistics {
    MarketStatistics {
        assets: vec![
            AssetStatistics {
                label: "cash".into(),
                annual_mean: annual_yield,
                annual_std_dev: 0.0,
            },
            AssetStatistics {
                label: "inflation".into(),
                annual_mean: 1.0,
                annual_std_dev: 0.0,
            },
        ],
        correlation: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        inflation_label: "inflation".into(),
    }
}

/// Base scenario: retiree with no income, no benefits in range, no taxes on
/// the portfolio, all-cash allocation.
pub(crate) fn frozen_config(annual_yield: f64) -> SimulationConfig {
    let mut tax = TaxConfig::us_single_2025();
    tax.portfolio_rate = 0.0;
    SimulationConfig {
        start_date: date(2026, 1, 1),
        intervals_per_year: 4,
        intervals_per_trial: 40,
        trial_qty: 3,
        seed: 1,
        initial_net_worth: 1_000_000.0,
        primary: PersonConfig {
            birth_date: date(1980, 6, 15),
            income_profiles: vec![],
            historical_earnings: vec![],
            claiming: ClaimingStrategy::FixedAge {
                age: ClaimingAge::Late,
            },
            pension: None,
        },
        spouse: None,
        spending_profiles: vec![],
        dependent_support: None,
        allocation: AllocationStrategy::Flat {
            weights: vec![AssetWeight {
                label: "cash".into(),
                weight: 1.0,
            }],
        },
        annuity: None,
        statistics: frozen_statistics(annual_yield),
        tax,
        social_security: SocialSecurityParams::us_2025(),
        discount_rate: 0.03,
    }
}

pub(crate) fn working_profile(annual_income: f64, years: i16) -> IncomeProfile {
    IncomeProfile {
        annual_income,
        yearly_raise: 0.0,
        start_date: date(2026, 1, 1),
        end_date: date(2026 + years, 1, 1),
        tax_deferred_rate: 0.0,
    }
}

pub(crate) fn level_spending(yearly_amount: f64) -> SpendingProfile {
    SpendingProfile {
        yearly_amount,
        start_date: None,
        end_date: None,
    }
}
