use std::fmt;

/// Fatal configuration preconditions, checked before any trial runs.
///
/// The engine receives an already-validated configuration, but it still
/// fails fast on anything that would make the economic draw or the
/// allocation math undefined. None of these are recoverable per trial.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// The statistics source contains no assets.
    EmptyStatistics,
    /// The correlation matrix has a different row count than the asset list.
    NonSquareCorrelation { assets: usize, rows: usize },
    /// A correlation row has the wrong number of columns.
    CorrelationRowLength {
        row: usize,
        len: usize,
        expected: usize,
    },
    /// The correlation matrix cannot be factored (NaN entries, values
    /// outside [-1, 1], or not positive semi-definite).
    MalformedCorrelation { reason: &'static str },
    /// A per-asset statistic is unusable (non-finite mean, negative stdev).
    InvalidStatistic {
        label: String,
        reason: &'static str,
    },
    /// The configured inflation label does not appear in the statistics.
    InflationAssetMissing { label: String },
    /// An allocation strategy references an asset absent from statistics.
    UnknownAsset { label: String },
    /// Intervals per year must be a positive divisor of 12.
    InvalidIntervalsPerYear { intervals_per_year: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyStatistics => write!(f, "statistics source contains no assets"),
            ConfigError::NonSquareCorrelation { assets, rows } => {
                write!(
                    f,
                    "correlation matrix has {rows} rows for {assets} assets"
                )
            }
            ConfigError::CorrelationRowLength { row, len, expected } => {
                write!(
                    f,
                    "correlation row {row} has {len} columns, expected {expected}"
                )
            }
            ConfigError::MalformedCorrelation { reason } => {
                write!(f, "malformed correlation matrix: {reason}")
            }
            ConfigError::InvalidStatistic { label, reason } => {
                write!(f, "invalid statistics for asset {label:?}: {reason}")
            }
            ConfigError::InflationAssetMissing { label } => {
                write!(f, "inflation asset {label:?} not found in statistics")
            }
            ConfigError::UnknownAsset { label } => {
                write!(
                    f,
                    "allocation references asset {label:?} absent from statistics"
                )
            }
            ConfigError::InvalidIntervalsPerYear { intervals_per_year } => {
                write!(
                    f,
                    "intervals_per_year must be a positive divisor of 12, got {intervals_per_year}"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
