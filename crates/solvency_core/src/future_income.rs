//! Present value of future income ("human capital") for the Merton
//! allocation.
//!
//! At trial start the income path is projected once over restricted
//! [`Projection`](crate::model::Projection) views: wages are deterministic,
//! and benefit triggers see the clock and the trial's inflation path but no
//! net worth, so net-worth-conditioned claiming falls back to its maximum-age
//! arm here. Later queries are discounted sums over the cached path.

use crate::config::SimulationConfig;
use crate::date_math;
use crate::economy::TrialEconomy;
use crate::income::JobIncomeController;
use crate::model::Projection;
use crate::pension::{PensionController, PensionInputs};
use crate::social_security::{SocialSecurityController, SocialSecurityInputs};

#[derive(Debug, Clone)]
pub struct FutureIncomeController {
    /// Projected household income per interval, nominal.
    income: Vec<f64>,
    /// Per-interval discount factor, from the annual rate.
    discount_per_interval: f64,
}

impl FutureIncomeController {
    #[must_use]
    pub fn new(
        config: &SimulationConfig,
        job_income: &JobIncomeController,
        social_security: &SocialSecurityInputs,
        pension: &PensionInputs,
        trial: &TrialEconomy<'_>,
    ) -> Self {
        let mut ss = SocialSecurityController::new(social_security);
        let mut pension = PensionController::new(pension);
        let months = config.interval_months();

        let income = (0..config.intervals_per_trial)
            .map(|j| {
                let projection = Projection {
                    date: date_math::add_months(config.start_date, j as i32 * months),
                    interval_idx: j,
                    inflation: trial.inflation_at(j),
                };
                job_income.income_at(j)
                    + ss.calc_payment(&projection)
                    + pension.calc_payment(&projection)
            })
            .collect();

        Self {
            income,
            discount_per_interval: (1.0 + config.discount_rate)
                .powf(1.0 / f64::from(config.intervals_per_year)),
        }
    }

    /// Discounted value of all income strictly after `interval_idx`.
    #[must_use]
    pub fn present_value(&self, interval_idx: usize) -> f64 {
        let mut value = 0.0;
        for (j, income) in self.income.iter().enumerate().skip(interval_idx + 1) {
            let periods = (j - interval_idx) as i32;
            value += income / self.discount_per_interval.powi(periods);
        }
        value
    }
}
