//! Small numeric primitives: Cholesky factorization for correlated draws and
//! log-linear regression for extrapolating statutory wage series.

use rustc_hash::FxHashMap;

use crate::error::ConfigError;

/// Tolerance for treating a pivot as zero during factorization.
const PIVOT_EPS: f64 = 1e-10;

/// Lower-triangular Cholesky factor of a symmetric positive semi-definite
/// matrix.
///
/// Zero-variance rows (a degenerate but legal configuration: fixed-rate
/// assets) produce zero rows in the factor rather than an error. A matrix
/// that is genuinely not positive semi-definite fails fast.
pub fn cholesky(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ConfigError> {
    let n = matrix.len();
    let mut l = vec![vec![0.0f64; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[i][k] * l[j][k];
            }

            if i == j {
                let d = matrix[i][i] - sum;
                if d.is_nan() {
                    return Err(ConfigError::MalformedCorrelation {
                        reason: "NaN encountered during factorization",
                    });
                }
                if d < -PIVOT_EPS {
                    return Err(ConfigError::MalformedCorrelation {
                        reason: "matrix is not positive semi-definite",
                    });
                }
                l[i][j] = d.max(0.0).sqrt();
            } else if l[j][j].abs() <= PIVOT_EPS {
                // Degenerate pivot: the j-th variable is deterministic.
                l[i][j] = 0.0;
            } else {
                l[i][j] = (matrix[i][j] - sum) / l[j][j];
            }
        }
    }

    Ok(l)
}

/// A statutory data series extrapolated by log-linear regression.
///
/// Fits `ln(value) = intercept + slope * year` once over the historical
/// pairs; in-sample years answer with the recorded value, out-of-sample
/// years with the fitted exponential. Used for the average wage index and
/// the maximum taxable wage base, both of which grow roughly geometrically.
#[derive(Debug, Clone)]
pub struct LogLinearSeries {
    known: FxHashMap<i16, f64>,
    slope: f64,
    intercept: f64,
}

impl LogLinearSeries {
    #[must_use]
    pub fn fit(history: &[(i16, f64)]) -> Self {
        let points: Vec<(f64, f64)> = history
            .iter()
            .filter(|(_, v)| *v > 0.0 && v.is_finite())
            .map(|(y, v)| (f64::from(*y), v.ln()))
            .collect();

        let (slope, intercept) = match points.len() {
            0 => (0.0, 0.0),
            1 => (0.0, points[0].1),
            _ => {
                let n = points.len() as f64;
                let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
                let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
                let sum_xx: f64 = points.iter().map(|(x, _)| x * x).sum();
                let sum_xy: f64 = points.iter().map(|(x, y)| x * y).sum();
                let denom = n * sum_xx - sum_x * sum_x;
                if denom.abs() < f64::EPSILON {
                    (0.0, sum_y / n)
                } else {
                    let slope = (n * sum_xy - sum_x * sum_y) / denom;
                    (slope, (sum_y - slope * sum_x) / n)
                }
            }
        };

        let known = history.iter().copied().collect();
        Self {
            known,
            slope,
            intercept,
        }
    }

    /// Recorded value for in-sample years, fitted extrapolation otherwise.
    #[must_use]
    pub fn value_at(&self, year: i16) -> f64 {
        if let Some(v) = self.known.get(&year) {
            return *v;
        }
        (self.intercept + self.slope * f64::from(year)).exp()
    }
}
