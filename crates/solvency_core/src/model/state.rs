use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::date_math;

/// Read access to the household state as seen by controllers.
///
/// The full [`State`] answers `net_worth()` with `Some`; the restricted
/// [`Projection`] used during future-income precompute answers `None`,
/// which is what breaks the Merton-allocation ↔ claiming-strategy cycle:
/// claiming rules can read the clock and inflation while the projection
/// runs, but not the balance they would otherwise condition on.
pub trait StateView {
    fn date(&self) -> Date;
    fn interval_idx(&self) -> usize;
    /// Cumulative inflation factor since the simulation start (≥ 1.0).
    fn inflation(&self) -> f64;
    /// `None` for restricted projections.
    fn net_worth(&self) -> Option<f64>;

    /// Fractional age of a person on this view's date.
    fn age_of(&self, birth_date: Date) -> f64 {
        date_math::years_between(birth_date, self.date())
    }
}

/// The household state at one point in simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub date: Date,
    pub interval_idx: usize,
    /// Clamped at zero; zero is absorbing.
    pub net_worth: f64,
    pub inflation: f64,
}

impl StateView for State {
    fn date(&self) -> Date {
        self.date
    }

    fn interval_idx(&self) -> usize {
        self.interval_idx
    }

    fn inflation(&self) -> f64 {
        self.inflation
    }

    fn net_worth(&self) -> Option<f64> {
        Some(self.net_worth)
    }
}

/// Capability-limited state used while precomputing future income.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub date: Date,
    pub interval_idx: usize,
    pub inflation: f64,
}

impl StateView for Projection {
    fn date(&self) -> Date {
        self.date
    }

    fn interval_idx(&self) -> usize {
        self.interval_idx
    }

    fn inflation(&self) -> f64 {
        self.inflation
    }

    fn net_worth(&self) -> Option<f64> {
        None
    }
}
