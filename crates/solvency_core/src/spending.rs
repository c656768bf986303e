//! Household spending and dependent support.
//!
//! Profiles are stated in today's dollars per year; each interval's outflow
//! is the per-interval share scaled by cumulative inflation at spend time.

use crate::config::{DependentSupport, SimulationConfig, SpendingProfile};
use crate::model::StateView;

#[derive(Debug, Clone)]
pub struct SpendingController {
    profiles: Vec<SpendingProfile>,
    dependent: Option<DependentSupport>,
    intervals_per_year: f64,
}

impl SpendingController {
    #[must_use]
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            profiles: config.spending_profiles.clone(),
            dependent: config.dependent_support.clone(),
            intervals_per_year: f64::from(config.intervals_per_year),
        }
    }

    /// Baseline spending for an interval, negative.
    #[must_use]
    pub fn calc_spending<V: StateView>(&self, view: &V) -> f64 {
        let date = view.date();
        let active = self.profiles.iter().find(|p| {
            p.start_date.is_none_or(|s| s <= date) && p.end_date.is_none_or(|e| date < e)
        });
        match active {
            Some(profile) => {
                -(profile.yearly_amount / self.intervals_per_year) * view.inflation()
            }
            None => 0.0,
        }
    }

    /// Dependent-support outflow for an interval, negative while the
    /// dependent is under the cutoff age.
    #[must_use]
    pub fn dependent_support<V: StateView>(&self, view: &V) -> f64 {
        match &self.dependent {
            Some(support) if view.age_of(support.birth_date) < support.until_age => {
                -(support.annual_amount / self.intervals_per_year) * view.inflation()
            }
            _ => 0.0,
        }
    }
}
