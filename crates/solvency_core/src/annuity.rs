//! Deferred-annuity side fund with a one-way annuitization trigger.
//!
//! While working the fund only accrues yield. After work ends, a fraction of
//! each interval's positive net cash flow is diverted in; if net worth falls
//! below the inflation-adjusted target the fund annuitizes permanently and
//! pays out a fixed fraction of the frozen balance each interval.

use crate::config::AnnuityConfig;
use crate::model::State;

#[derive(Debug, Clone)]
pub struct AnnuityController {
    config: Option<AnnuityConfig>,
    balance: f64,
    annuitized: bool,
    interval_yield: f64,
}

impl AnnuityController {
    #[must_use]
    pub fn new(config: Option<AnnuityConfig>, intervals_per_year: u32) -> Self {
        let interval_yield = config
            .map_or(1.0, |c| c.annual_yield.powf(1.0 / f64::from(intervals_per_year)));
        Self {
            config,
            balance: 0.0,
            annuitized: false,
            interval_yield,
        }
    }

    /// Annuity cash flow for one interval: contributions negative, payouts
    /// positive. `net_cash_flow` is the interval's pre-annuity net change.
    pub fn transact(&mut self, state: &State, net_cash_flow: f64, working: bool) -> f64 {
        let Some(config) = self.config else {
            return 0.0;
        };

        if self.annuitized {
            return self.balance * config.payout_rate;
        }
        self.balance *= self.interval_yield;

        if working {
            return 0.0;
        }

        if state.net_worth < config.net_worth_target * state.inflation {
            // Irreversible: the balance freezes and starts paying out.
            self.annuitized = true;
            self.interval_yield = 1.0;
            return self.balance * config.payout_rate;
        }

        if net_cash_flow > 0.0 {
            let contribution = net_cash_flow * config.contribution_rate;
            self.balance += contribution;
            return -contribution;
        }
        0.0
    }

    #[must_use]
    pub fn balance(&self) -> f64 {
        self.balance
    }
}
