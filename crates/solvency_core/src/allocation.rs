//! Asset allocation strategies.
//!
//! All variants answer the same question each interval: the weight vector
//! over the economic draw's asset columns. The controller is stateless and
//! shared across trials; the Merton "total portfolio" variant folds the
//! present value of future income into the decision, which is why
//! [`AllocationController::weights`] takes it as an argument.

use jiff::civil::Date;

use crate::config::{
    AllocationStrategy, AssetMix, GlidePoint, MarketStatistics, SimulationConfig,
};
use crate::economy::EconomicSimData;
use crate::error::ConfigError;
use crate::model::State;

#[derive(Debug, Clone)]
enum AllocationVariant {
    Flat {
        weights: Vec<f64>,
    },
    GlidePath {
        /// Sorted by age at construction.
        points: Vec<GlidePoint>,
        high_risk: Vec<f64>,
        low_risk: Vec<f64>,
    },
    NetWorthPivot {
        target: f64,
        below: Vec<f64>,
        above: Vec<f64>,
    },
    TotalPortfolio {
        risk_aversion: f64,
        high_risk: Vec<f64>,
        low_risk: Vec<f64>,
        /// Annual expected return of the high bucket over the low bucket.
        expected_gap: f64,
        /// Annual return variance of the high bucket.
        high_variance: f64,
    },
}

/// Shared, read-only allocation policy.
#[derive(Debug, Clone)]
pub struct AllocationController {
    variant: AllocationVariant,
    primary_birth_date: Date,
}

impl AllocationController {
    pub fn new(
        config: &SimulationConfig,
        economy: &EconomicSimData,
    ) -> Result<Self, ConfigError> {
        let resolve = |mix: &AssetMix| resolve_mix(mix, economy);
        let variant = match &config.allocation {
            AllocationStrategy::Flat { weights } => AllocationVariant::Flat {
                weights: resolve(weights)?,
            },
            AllocationStrategy::GlidePath {
                points,
                high_risk,
                low_risk,
            } => {
                let mut points = points.clone();
                points.sort_by(|a, b| a.age.total_cmp(&b.age));
                AllocationVariant::GlidePath {
                    points,
                    high_risk: resolve(high_risk)?,
                    low_risk: resolve(low_risk)?,
                }
            }
            AllocationStrategy::NetWorthPivot {
                target,
                below,
                above,
            } => AllocationVariant::NetWorthPivot {
                target: *target,
                below: resolve(below)?,
                above: resolve(above)?,
            },
            AllocationStrategy::TotalPortfolio {
                risk_aversion,
                high_risk,
                low_risk,
            } => {
                let expected_gap = annual_mean(high_risk, &config.statistics)?
                    - annual_mean(low_risk, &config.statistics)?;
                AllocationVariant::TotalPortfolio {
                    risk_aversion: *risk_aversion,
                    high_risk: resolve(high_risk)?,
                    low_risk: resolve(low_risk)?,
                    expected_gap,
                    high_variance: annual_variance(high_risk, &config.statistics)?,
                }
            }
        };
        Ok(Self {
            variant,
            primary_birth_date: config.primary.birth_date,
        })
    }

    /// Weight vector for one interval, in economic-draw asset order.
    #[must_use]
    pub fn weights(&self, state: &State, future_income_pv: f64) -> Vec<f64> {
        match &self.variant {
            AllocationVariant::Flat { weights } => weights.clone(),
            AllocationVariant::GlidePath {
                points,
                high_risk,
                low_risk,
            } => {
                let age = crate::date_math::years_between(self.primary_birth_date, state.date);
                let ratio = glide_ratio(points, age);
                blend(high_risk, low_risk, ratio)
            }
            AllocationVariant::NetWorthPivot {
                target,
                below,
                above,
            } => {
                if state.net_worth < target * state.inflation {
                    below.clone()
                } else {
                    above.clone()
                }
            }
            AllocationVariant::TotalPortfolio {
                risk_aversion,
                high_risk,
                low_risk,
                expected_gap,
                high_variance,
            } => {
                let share = merton_share(
                    state.net_worth,
                    future_income_pv,
                    *risk_aversion,
                    *expected_gap,
                    *high_variance,
                );
                blend(high_risk, low_risk, 1.0 - share)
            }
        }
    }
}

/// Merton risky share applied to financial net worth.
///
/// The unconstrained share `gap / (rra * variance)` is sized against total
/// capital (net worth plus the present value of future income), then
/// expressed as a fraction of net worth alone and capped at fully invested.
fn merton_share(
    net_worth: f64,
    future_income_pv: f64,
    rra: f64,
    gap: f64,
    variance: f64,
) -> f64 {
    let total_capital = net_worth + future_income_pv;
    if net_worth <= 0.0 || total_capital <= 0.0 {
        return 0.0;
    }
    let base = if variance <= 0.0 {
        if gap > 0.0 { 1.0 } else { 0.0 }
    } else {
        (gap / (rra * variance)).clamp(0.0, 1.0)
    };
    (base * total_capital / net_worth).min(1.0)
}

/// Low-risk ratio at an age: linear interpolation between sorted points,
/// clamped to the end points outside the range.
fn glide_ratio(points: &[GlidePoint], age: f64) -> f64 {
    let Some(first) = points.first() else {
        return 0.0;
    };
    if age <= first.age {
        return first.low_risk_ratio;
    }
    for pair in points.windows(2) {
        let [a, b] = pair else { continue };
        if age <= b.age {
            let t = (age - a.age) / (b.age - a.age);
            return a.low_risk_ratio + t * (b.low_risk_ratio - a.low_risk_ratio);
        }
    }
    points[points.len() - 1].low_risk_ratio
}

/// `low_ratio` of the low-risk vector plus the remainder of the high-risk one.
fn blend(high: &[f64], low: &[f64], low_ratio: f64) -> Vec<f64> {
    high.iter()
        .zip(low)
        .map(|(h, l)| h * (1.0 - low_ratio) + l * low_ratio)
        .collect()
}

fn resolve_mix(mix: &AssetMix, economy: &EconomicSimData) -> Result<Vec<f64>, ConfigError> {
    let mut weights = vec![0.0f64; economy.asset_count()];
    for entry in mix {
        let idx = economy
            .asset_index(&entry.label)
            .ok_or_else(|| ConfigError::UnknownAsset {
                label: entry.label.clone(),
            })?;
        weights[idx] += entry.weight;
    }
    Ok(weights)
}

/// Annual net expected return of a mix.
fn annual_mean(mix: &AssetMix, statistics: &MarketStatistics) -> Result<f64, ConfigError> {
    let mut total = 0.0;
    for entry in mix {
        let asset = find_asset(statistics, &entry.label)?;
        total += entry.weight * (statistics.assets[asset].annual_mean - 1.0);
    }
    Ok(total)
}

/// Annual return variance of a mix under the configured correlations.
fn annual_variance(mix: &AssetMix, statistics: &MarketStatistics) -> Result<f64, ConfigError> {
    let mut variance = 0.0;
    for a in mix {
        let i = find_asset(statistics, &a.label)?;
        for b in mix {
            let j = find_asset(statistics, &b.label)?;
            variance += a.weight
                * b.weight
                * statistics.correlation[i][j]
                * statistics.assets[i].annual_std_dev
                * statistics.assets[j].annual_std_dev;
        }
    }
    Ok(variance)
}

fn find_asset(statistics: &MarketStatistics, label: &str) -> Result<usize, ConfigError> {
    statistics
        .assets
        .iter()
        .position(|a| a.label == label)
        .ok_or_else(|| ConfigError::UnknownAsset {
            label: label.to_owned(),
        })
}
