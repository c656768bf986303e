//! Correlated economic scenario generation.
//!
//! One multivariate-normal draw covers every trial, interval, and asset of a
//! run. Annual statistics are converted to interval units
//! (`interval_mean = annual_mean^(1/n)`, `interval_stdev = annual_stdev / sqrt(n)`),
//! the covariance matrix is `outer(stdevs, stdevs) ∘ correlation`, and its
//! Cholesky factor turns independent standard-normal draws into correlated
//! yields. Inflation rides along as one of the correlated variables; its raw
//! yields are floored at 1.0 and compounded into a per-trial cumulative path.
//! Every other column is exposed as a net return (yield − 1).

use rand::Rng;
use rand::distr::Distribution;
use rand_distr::StandardNormal;
use rustc_hash::FxHashMap;

use crate::config::MarketStatistics;
use crate::error::ConfigError;
use crate::numeric::cholesky;

/// Immutable scenario data shared read-only by every trial.
#[derive(Debug, Clone)]
pub struct EconomicSimData {
    /// `[trial][interval][asset]`, net returns, inflation column excluded.
    returns: Vec<Vec<Vec<f64>>>,
    /// `[trial][interval]`, cumulative inflation factor (starts ≥ 1.0,
    /// non-decreasing within a trial).
    inflation: Vec<Vec<f64>>,
    asset_index: FxHashMap<String, usize>,
    labels: Vec<String>,
}

impl EconomicSimData {
    /// Draw the full scenario tensor. Construct once per run.
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        statistics: &MarketStatistics,
        intervals_per_trial: usize,
        trial_qty: usize,
        intervals_per_year: u32,
    ) -> Result<Self, ConfigError> {
        let spec = DrawSpec::resolve(statistics, intervals_per_year)?;
        let var_qty = spec.interval_means.len();

        let mut returns = Vec::with_capacity(trial_qty);
        let mut inflation = Vec::with_capacity(trial_qty);
        let mut z = vec![0.0f64; var_qty];

        for _ in 0..trial_qty {
            let mut trial_returns = Vec::with_capacity(intervals_per_trial);
            let mut trial_inflation = Vec::with_capacity(intervals_per_trial);
            let mut cumulative = 1.0f64;

            for _ in 0..intervals_per_trial {
                for slot in z.iter_mut() {
                    *slot = StandardNormal.sample(rng);
                }

                let mut interval_returns = Vec::with_capacity(var_qty - 1);
                for (i, mean) in spec.interval_means.iter().enumerate() {
                    let mut yield_ = *mean;
                    for (j, zj) in z.iter().enumerate().take(i + 1) {
                        yield_ += spec.factor[i][j] * zj;
                    }
                    if i == spec.inflation_idx {
                        // Floor keeps the cumulative path non-decreasing.
                        cumulative *= yield_.max(1.0);
                    } else {
                        interval_returns.push(yield_ - 1.0);
                    }
                }
                trial_returns.push(interval_returns);
                trial_inflation.push(cumulative);
            }

            returns.push(trial_returns);
            inflation.push(trial_inflation);
        }

        Ok(Self {
            returns,
            inflation,
            asset_index: spec.asset_index,
            labels: spec.labels,
        })
    }

    /// Column for an asset label, stable across the whole run.
    #[must_use]
    pub fn asset_index(&self, label: &str) -> Option<usize> {
        self.asset_index.get(label).copied()
    }

    /// Asset labels in column order (inflation excluded).
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn asset_count(&self) -> usize {
        self.labels.len()
    }

    /// Read-only view over one trial's slice.
    ///
    /// # Panics
    /// Panics if `trial` is out of range; the engine only hands out indices
    /// below `trial_qty`.
    #[must_use]
    pub fn trial_data(&self, trial: usize) -> TrialEconomy<'_> {
        TrialEconomy {
            returns: &self.returns[trial],
            inflation: &self.inflation[trial],
        }
    }
}

/// One trial's slice of the shared scenario data.
#[derive(Debug, Clone, Copy)]
pub struct TrialEconomy<'a> {
    returns: &'a [Vec<f64>],
    inflation: &'a [f64],
}

impl<'a> TrialEconomy<'a> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    /// Per-interval view used by the state transition.
    #[must_use]
    pub fn state_data(&self, interval: usize) -> IntervalEconomy<'a> {
        IntervalEconomy {
            returns: &self.returns[interval],
            inflation: self.inflation[interval],
        }
    }

    /// Cumulative inflation factor at an interval, clamped to the horizon.
    #[must_use]
    pub fn inflation_at(&self, interval: usize) -> f64 {
        let idx = interval.min(self.inflation.len().saturating_sub(1));
        self.inflation.get(idx).copied().unwrap_or(1.0)
    }
}

/// One interval's returns and inflation.
#[derive(Debug, Clone, Copy)]
pub struct IntervalEconomy<'a> {
    /// Net returns in asset-index order.
    pub returns: &'a [f64],
    /// Cumulative inflation factor through this interval.
    pub inflation: f64,
}

/// Validated, interval-unit draw parameters.
struct DrawSpec {
    interval_means: Vec<f64>,
    /// Lower-triangular Cholesky factor of the interval covariance.
    factor: Vec<Vec<f64>>,
    inflation_idx: usize,
    asset_index: FxHashMap<String, usize>,
    labels: Vec<String>,
}

impl DrawSpec {
    fn resolve(
        statistics: &MarketStatistics,
        intervals_per_year: u32,
    ) -> Result<Self, ConfigError> {
        let assets = &statistics.assets;
        if assets.is_empty() {
            return Err(ConfigError::EmptyStatistics);
        }
        if statistics.correlation.len() != assets.len() {
            return Err(ConfigError::NonSquareCorrelation {
                assets: assets.len(),
                rows: statistics.correlation.len(),
            });
        }
        for (row, values) in statistics.correlation.iter().enumerate() {
            if values.len() != assets.len() {
                return Err(ConfigError::CorrelationRowLength {
                    row,
                    len: values.len(),
                    expected: assets.len(),
                });
            }
            if values.iter().any(|v| !v.is_finite() || v.abs() > 1.0) {
                return Err(ConfigError::MalformedCorrelation {
                    reason: "correlation entries must be finite and within [-1, 1]",
                });
            }
        }

        let n = f64::from(intervals_per_year);
        let mut interval_means = Vec::with_capacity(assets.len());
        let mut interval_stdevs = Vec::with_capacity(assets.len());
        for asset in assets {
            if !asset.annual_mean.is_finite() || asset.annual_mean <= 0.0 {
                return Err(ConfigError::InvalidStatistic {
                    label: asset.label.clone(),
                    reason: "annual mean must be a finite positive yield",
                });
            }
            if !asset.annual_std_dev.is_finite() || asset.annual_std_dev < 0.0 {
                return Err(ConfigError::InvalidStatistic {
                    label: asset.label.clone(),
                    reason: "annual stdev must be finite and non-negative",
                });
            }
            interval_means.push(asset.annual_mean.powf(1.0 / n));
            interval_stdevs.push(asset.annual_std_dev / n.sqrt());
        }

        let inflation_idx = assets
            .iter()
            .position(|a| a.label == statistics.inflation_label)
            .ok_or_else(|| ConfigError::InflationAssetMissing {
                label: statistics.inflation_label.clone(),
            })?;

        let mut covariance = vec![vec![0.0f64; assets.len()]; assets.len()];
        for i in 0..assets.len() {
            for j in 0..assets.len() {
                covariance[i][j] =
                    statistics.correlation[i][j] * interval_stdevs[i] * interval_stdevs[j];
            }
        }
        let factor = cholesky(&covariance)?;

        let mut asset_index = FxHashMap::default();
        let mut labels = Vec::with_capacity(assets.len() - 1);
        for (i, asset) in assets.iter().enumerate() {
            if i == inflation_idx {
                continue;
            }
            asset_index.insert(asset.label.clone(), labels.len());
            labels.push(asset.label.clone());
        }

        Ok(Self {
            interval_means,
            factor,
            inflation_idx,
            asset_index,
            labels,
        })
    }
}
