//! Immutable simulation configuration.
//!
//! The engine assumes every value here has already passed the external
//! validation layer: exactly one variant per strategy family is resolved,
//! weights sum to one, date ranges are ordered. The engine still fails fast
//! on anything that would make the economic draw undefined (see
//! [`crate::error::ConfigError`]).

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Complete input to one engine run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub start_date: Date,
    /// Simulation resolution; must be a positive divisor of 12 (quarterly = 4).
    pub intervals_per_year: u32,
    pub intervals_per_trial: usize,
    pub trial_qty: usize,
    /// Seed for the single shared economic-data draw. Fixing it makes the
    /// whole run deterministic.
    pub seed: u64,
    pub initial_net_worth: f64,
    pub primary: PersonConfig,
    pub spouse: Option<PersonConfig>,
    pub spending_profiles: Vec<SpendingProfile>,
    pub dependent_support: Option<DependentSupport>,
    pub allocation: AllocationStrategy,
    pub annuity: Option<AnnuityConfig>,
    pub statistics: MarketStatistics,
    pub tax: TaxConfig,
    pub social_security: SocialSecurityParams,
    /// Annual rate used to discount future income when valuing human capital.
    pub discount_rate: f64,
}

impl SimulationConfig {
    /// Calendar months covered by one interval.
    #[must_use]
    pub fn interval_months(&self) -> i32 {
        12 / self.intervals_per_year as i32
    }
}

/// One household member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonConfig {
    pub birth_date: Date,
    /// Ordered, non-overlapping income profiles; the first profile covering
    /// a date wins.
    pub income_profiles: Vec<IncomeProfile>,
    /// Covered earnings from years before the simulation starts, by calendar
    /// year, in nominal dollars.
    pub historical_earnings: Vec<(i16, f64)>,
    pub claiming: ClaimingStrategy,
    pub pension: Option<PensionConfig>,
}

/// A deterministic salary segment: constant within a calendar year,
/// raised at each year boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeProfile {
    pub annual_income: f64,
    pub yearly_raise: f64,
    pub start_date: Date,
    /// Exclusive.
    pub end_date: Date,
    /// Fraction of income contributed pre-tax (reduces taxable income).
    #[serde(default)]
    pub tax_deferred_rate: f64,
}

/// Desired withdrawal, in today's dollars per year; the controller scales by
/// cumulative inflation at spend time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingProfile {
    pub yearly_amount: f64,
    /// Inclusive; `None` means from the start of the simulation.
    pub start_date: Option<Date>,
    /// Exclusive; `None` means to the horizon.
    pub end_date: Option<Date>,
}

/// Extra spending while a dependent is below the support cutoff age.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependentSupport {
    pub annual_amount: f64,
    pub birth_date: Date,
    pub until_age: f64,
}

/// Weight on one asset label; mixes are resolved against the statistics
/// asset index at engine startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetWeight {
    pub label: String,
    pub weight: f64,
}

pub type AssetMix = Vec<AssetWeight>;

/// One point on a glide path, indexed by the primary's fractional age.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GlidePoint {
    pub age: f64,
    pub low_risk_ratio: f64,
}

/// Asset-allocation strategy family. A closed set: validation resolves
/// exactly one variant before the engine runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AllocationStrategy {
    /// Fixed weights for the whole horizon.
    Flat { weights: AssetMix },
    /// Age-indexed linear interpolation of a low-risk ratio between sorted
    /// glide points (a "bond tent" is two ascending then descending points).
    GlidePath {
        points: Vec<GlidePoint>,
        high_risk: AssetMix,
        low_risk: AssetMix,
    },
    /// Discrete switch between two full weight vectors once
    /// inflation-adjusted net worth crosses the target.
    NetWorthPivot {
        target: f64,
        below: AssetMix,
        above: AssetMix,
    },
    /// Merton-share "total portfolio": blends financial and human capital.
    TotalPortfolio {
        /// Relative risk aversion (RRA); higher means less in the risky bucket.
        risk_aversion: f64,
        high_risk: AssetMix,
        low_risk: AssetMix,
    },
}

/// Fixed-age Social Security claiming points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimingAge {
    Early,
    Full,
    Late,
}

/// Social Security claiming strategy family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClaimingStrategy {
    FixedAge { age: ClaimingAge },
    /// Claim at the first interval where age ≥ `minimum_age` and either net
    /// worth has fallen below the inflation-adjusted target or
    /// `maximum_age` is reached. The benefit rate locks permanently at the
    /// trigger.
    NetWorthTrigger {
        minimum_age: f64,
        maximum_age: f64,
        net_worth_target: f64,
    },
    /// Dependent-only: mirror the primary's resolved strategy.
    SameAsPrimary,
}

/// Employer pension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PensionConfig {
    /// Annual benefit for the age and net-worth variants. Ignored by
    /// `CashOut`, which pays a projected balance instead.
    pub annual_payment: f64,
    pub strategy: PensionStrategy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PensionStrategy {
    FixedAge { age: f64 },
    NetWorthTrigger {
        minimum_age: f64,
        maximum_age: f64,
        net_worth_target: f64,
    },
    /// Project the account balance (contribution rate against the salary
    /// history, back-extrapolated before the first profile) to the last
    /// working date, pay it out exactly once, then zero.
    CashOut {
        contribution_rate: f64,
        /// Gross annual growth applied to accumulated contributions (1.05 = 5%).
        account_growth: f64,
        /// First year of credited service; salary before the first income
        /// profile is back-extrapolated to here.
        service_start_year: i16,
    },
}

/// Side fund with a one-way annuitization trigger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnnuityConfig {
    /// Fraction of positive net cash flow diverted once work ends.
    pub contribution_rate: f64,
    /// Gross annual yield on the balance before annuitization (1.04 = 4%).
    pub annual_yield: f64,
    /// Per-interval payout fraction of the balance after annuitization.
    pub payout_rate: f64,
    /// Annuitize when net worth falls below this inflation-adjusted level
    /// while no longer working.
    pub net_worth_target: f64,
}

/// Annual statistics for one random variable in the economic draw.
///
/// `annual_mean` is a gross yield (1.08 = 8% expected growth); the generator
/// exposes everything except inflation as net returns (yield − 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetStatistics {
    pub label: String,
    pub annual_mean: f64,
    pub annual_std_dev: f64,
}

/// The statistics source for the correlated economic draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketStatistics {
    pub assets: Vec<AssetStatistics>,
    /// Square matrix in `assets` order, inflation row included.
    pub correlation: Vec<Vec<f64>>,
    /// Which asset row carries inflation.
    pub inflation_label: String,
}

/// One marginal bracket: `rate` applies to income above `threshold`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TaxBracket {
    pub threshold: f64,
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxConfig {
    /// Ascending thresholds, first at 0.0, last bracket unbounded.
    pub federal_brackets: Vec<TaxBracket>,
    /// Jurisdiction (state) brackets, same shape; empty means no state tax.
    pub state_brackets: Vec<TaxBracket>,
    pub standard_deduction: f64,
    /// Flat on gross job income.
    pub medicare_rate: f64,
    /// Flat on job income up to the extrapolated maximum taxable wage.
    pub social_security_rate: f64,
    /// Fraction of benefit income that enters ordinary taxable income
    /// (the statutory discount vs. wages).
    pub benefit_taxable_share: f64,
    /// Flat rate on realized portfolio return, sign-matched (losses rebate
    /// under the always-harvest assumption).
    pub portfolio_rate: f64,
}

impl TaxConfig {
    // Federal brackets and standard deduction for single filers, tax year
    // 2025 (IRS Rev. Proc. 2024-40). FICA/Medicare employee shares per SSA.
    #[must_use]
    pub fn us_single_2025() -> Self {
        Self {
            federal_brackets: vec![
                TaxBracket { threshold: 0.0, rate: 0.10 },
                TaxBracket { threshold: 11_925.0, rate: 0.12 },
                TaxBracket { threshold: 48_475.0, rate: 0.22 },
                TaxBracket { threshold: 103_350.0, rate: 0.24 },
                TaxBracket { threshold: 197_300.0, rate: 0.32 },
                TaxBracket { threshold: 250_525.0, rate: 0.35 },
                TaxBracket { threshold: 626_350.0, rate: 0.37 },
            ],
            state_brackets: Vec::new(),
            standard_deduction: 15_000.0,
            medicare_rate: 0.0145,
            social_security_rate: 0.062,
            benefit_taxable_share: 0.85,
            portfolio_rate: 0.15,
        }
    }
}

/// Statutory Social Security parameters plus the two historical series the
/// benefit math extrapolates from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialSecurityParams {
    /// Monthly AIME bend points, ascending.
    pub bend_points: [f64; 2],
    /// Marginal PIA accrual rates per segment.
    pub segment_rates: [f64; 3],
    /// Replacement first-segment rate when the claimant is pension-eligible
    /// (Windfall Elimination Provision).
    pub wep_first_segment_rate: f64,
    pub early_age: f64,
    pub full_retirement_age: f64,
    pub late_age: f64,
    /// Spousal benefit fraction of the worker's unreduced PIA.
    pub spousal_share: f64,
    /// National average wage index by year (used to index earnings).
    pub wage_index_history: Vec<(i16, f64)>,
    /// OASDI contribution and benefit base by year (caps covered earnings).
    pub taxable_maximum_history: Vec<(i16, f64)>,
}

impl SocialSecurityParams {
    // Bend points and bases per SSA for 2025; AWI series per the SSA
    // national average wage index table (selected years; the engine
    // extrapolates the rest by log-linear fit).
    #[must_use]
    pub fn us_2025() -> Self {
        Self {
            bend_points: [1_226.0, 7_391.0],
            segment_rates: [0.90, 0.32, 0.15],
            wep_first_segment_rate: 0.40,
            early_age: 62.0,
            full_retirement_age: 67.0,
            late_age: 70.0,
            spousal_share: 0.5,
            wage_index_history: vec![
                (1995, 24_705.66),
                (2000, 32_154.82),
                (2005, 36_952.94),
                (2010, 41_673.83),
                (2015, 48_098.63),
                (2020, 55_628.60),
                (2021, 60_575.07),
                (2022, 63_795.13),
                (2023, 66_621.80),
            ],
            taxable_maximum_history: vec![
                (1995, 61_200.0),
                (2000, 76_200.0),
                (2005, 90_000.0),
                (2010, 106_800.0),
                (2015, 118_500.0),
                (2020, 137_700.0),
                (2022, 147_000.0),
                (2023, 160_200.0),
                (2024, 168_600.0),
                (2025, 176_100.0),
            ],
        }
    }
}

/// Shared fixture for unit tests across the crate.
#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;
    use jiff::civil::date;

    pub(crate) fn minimal_config() -> SimulationConfig {
        SimulationConfig {
            start_date: date(2026, 1, 1),
            intervals_per_year: 4,
            intervals_per_trial: 120,
            trial_qty: 100,
            seed: 7,
            initial_net_worth: 500_000.0,
            primary: PersonConfig {
                birth_date: date(1980, 6, 15),
                income_profiles: vec![IncomeProfile {
                    annual_income: 90_000.0,
                    yearly_raise: 0.02,
                    start_date: date(2026, 1, 1),
                    end_date: date(2045, 1, 1),
                    tax_deferred_rate: 0.1,
                }],
                historical_earnings: vec![(2020, 80_000.0), (2025, 88_000.0)],
                claiming: ClaimingStrategy::FixedAge {
                    age: ClaimingAge::Full,
                },
                pension: None,
            },
            spouse: None,
            spending_profiles: vec![SpendingProfile {
                yearly_amount: 60_000.0,
                start_date: None,
                end_date: None,
            }],
            dependent_support: None,
            allocation: AllocationStrategy::Flat {
                weights: vec![
                    AssetWeight { label: "stocks".into(), weight: 0.7 },
                    AssetWeight { label: "bonds".into(), weight: 0.3 },
                ],
            },
            annuity: None,
            statistics: MarketStatistics {
                assets: vec![
                    AssetStatistics {
                        label: "stocks".into(),
                        annual_mean: 1.08,
                        annual_std_dev: 0.17,
                    },
                    AssetStatistics {
                        label: "bonds".into(),
                        annual_mean: 1.04,
                        annual_std_dev: 0.06,
                    },
                    AssetStatistics {
                        label: "inflation".into(),
                        annual_mean: 1.03,
                        annual_std_dev: 0.02,
                    },
                ],
                correlation: vec![
                    vec![1.0, 0.2, 0.1],
                    vec![0.2, 1.0, 0.3],
                    vec![0.1, 0.3, 1.0],
                ],
                inflation_label: "inflation".into(),
            },
            tax: TaxConfig::us_single_2025(),
            social_security: SocialSecurityParams::us_2025(),
            discount_rate: 0.03,
        }
    }
}
