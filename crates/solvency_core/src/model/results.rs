//! Simulation output: per-trial interval sequences, the aggregate success
//! rate, and flat tabular rows for reporting. Everything here is derived
//! lazily from the stored intervals; nothing feeds back into the engine.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::flows::NetTransactions;
use super::state::State;

/// One completed simulation step: the state at the close of the interval
/// together with the transactions that produced it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Interval {
    pub state: State,
    pub transactions: NetTransactions,
}

/// The ordered interval sequence for one stochastic path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialResult {
    pub intervals: Vec<Interval>,
}

impl TrialResult {
    /// End-of-interval net worth, one entry per interval.
    #[must_use]
    pub fn net_worth_series(&self) -> Vec<f64> {
        self.intervals.iter().map(|i| i.state.net_worth).collect()
    }

    #[must_use]
    pub fn final_net_worth(&self) -> f64 {
        self.intervals.last().map_or(0.0, |i| i.state.net_worth)
    }

    /// A trial succeeds iff assets survive to the horizon.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.final_net_worth() > 0.0
    }
}

/// All trials from one engine run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResults {
    pub trials: Vec<TrialResult>,
}

impl SimulationResults {
    /// Fraction of trials whose final net worth is strictly positive.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.trials.is_empty() {
            return 0.0;
        }
        let successes = self.trials.iter().filter(|t| t.succeeded()).count();
        successes as f64 / self.trials.len() as f64
    }

    /// Final net worth per trial, in trial order.
    #[must_use]
    pub fn final_net_worths(&self) -> Vec<f64> {
        self.trials.iter().map(TrialResult::final_net_worth).collect()
    }

    /// Flatten every interval of every trial into serializable rows.
    #[must_use]
    pub fn rows(&self) -> Vec<IntervalRow> {
        self.trials
            .iter()
            .enumerate()
            .flat_map(|(trial, t)| {
                t.intervals
                    .iter()
                    .map(move |interval| IntervalRow::new(trial, interval))
            })
            .collect()
    }
}

/// One flat reporting row; column layout stable for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalRow {
    pub trial: usize,
    pub interval: usize,
    pub date: Date,
    pub net_worth: f64,
    pub inflation: f64,
    pub job_income: f64,
    pub social_security: f64,
    pub pension: f64,
    pub portfolio_return: f64,
    pub spending: f64,
    pub dependent_support: f64,
    pub income_tax: f64,
    pub medicare_tax: f64,
    pub social_security_tax: f64,
    pub portfolio_tax: f64,
    pub annuity: f64,
    pub net_change: f64,
}

impl IntervalRow {
    fn new(trial: usize, interval: &Interval) -> Self {
        let txn = &interval.transactions;
        Self {
            trial,
            interval: interval.state.interval_idx,
            date: interval.state.date,
            net_worth: interval.state.net_worth,
            inflation: interval.state.inflation,
            job_income: txn.income.job,
            social_security: txn.income.social_security,
            pension: txn.income.pension,
            portfolio_return: txn.portfolio_return,
            spending: txn.costs.spending,
            dependent_support: txn.costs.dependent_support,
            income_tax: txn.costs.taxes.income,
            medicare_tax: txn.costs.taxes.medicare,
            social_security_tax: txn.costs.taxes.social_security,
            portfolio_tax: txn.costs.taxes.portfolio,
            annuity: txn.annuity,
            net_change: txn.total(),
        }
    }
}
