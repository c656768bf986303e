//! The simulation engine: one economic draw, then independent trials.
//!
//! All stochastic state lives in the up-front draw, so trials share the
//! immutable controllers and run embarrassingly parallel. With the
//! `parallel` feature (on by default) trials fan out over rayon; without it
//! they run sequentially with identical results.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::SeedableRng;
use rand::rngs::SmallRng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::allocation::AllocationController;
use crate::annuity::AnnuityController;
use crate::config::SimulationConfig;
use crate::economy::EconomicSimData;
use crate::error::ConfigError;
use crate::future_income::FutureIncomeController;
use crate::income::JobIncomeController;
use crate::model::{Interval, SimulationResults, State, TrialResult};
use crate::pension::{PensionController, PensionInputs};
use crate::social_security::{SocialSecurityController, SocialSecurityInputs};
use crate::spending::SpendingController;
use crate::taxes::TaxCalculator;
use crate::transition::{self, ControllerBundle};

/// Run a full simulation.
pub fn run(config: &SimulationConfig) -> Result<SimulationResults, ConfigError> {
    run_with_progress(config, |_, _| {})
}

/// Run a full simulation, reporting `(completed, total)` after each trial.
///
/// The callback runs on worker threads when the `parallel` feature is
/// enabled, so it must be cheap and thread-safe.
pub fn run_with_progress<F>(
    config: &SimulationConfig,
    progress: F,
) -> Result<SimulationResults, ConfigError>
where
    F: Fn(usize, usize) + Sync,
{
    if config.intervals_per_year == 0 || 12 % config.intervals_per_year != 0 {
        return Err(ConfigError::InvalidIntervalsPerYear {
            intervals_per_year: config.intervals_per_year,
        });
    }

    let mut rng = SmallRng::seed_from_u64(config.seed);
    let economy = EconomicSimData::generate(
        &mut rng,
        &config.statistics,
        config.intervals_per_trial,
        config.trial_qty,
        config.intervals_per_year,
    )?;

    let job_income = JobIncomeController::new(config);
    let allocation = AllocationController::new(config, &economy)?;
    let taxes = TaxCalculator::new(
        &config.tax,
        &config.social_security.taxable_maximum_history,
        config.intervals_per_year,
    );
    let spending = SpendingController::new(config);
    let social_security = SocialSecurityInputs::new(config, &job_income);
    let pension = PensionInputs::new(config);

    let interval_months = config.interval_months();
    let completed = AtomicUsize::new(0);

    let run_one = |trial_idx: usize| -> TrialResult {
        let trial = economy.trial_data(trial_idx);
        let mut bundle = ControllerBundle {
            job_income: &job_income,
            allocation: &allocation,
            taxes: &taxes,
            spending: &spending,
            social_security: SocialSecurityController::new(&social_security),
            pension: PensionController::new(&pension),
            annuity: AnnuityController::new(config.annuity, config.intervals_per_year),
            future_income: FutureIncomeController::new(
                config,
                &job_income,
                &social_security,
                &pension,
                &trial,
            ),
        };

        let mut state = State {
            date: config.start_date,
            interval_idx: 0,
            net_worth: config.initial_net_worth,
            inflation: trial.inflation_at(0),
        };
        let mut intervals = Vec::with_capacity(config.intervals_per_trial);
        for _ in 0..config.intervals_per_trial {
            let (transactions, next) =
                transition::advance(&state, &mut bundle, &trial, interval_months);
            intervals.push(Interval {
                state: next,
                transactions,
            });
            state = next;
        }

        let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
        progress(done, config.trial_qty);
        TrialResult { intervals }
    };

    #[cfg(feature = "parallel")]
    let trials = (0..config.trial_qty).into_par_iter().map(run_one).collect();
    #[cfg(not(feature = "parallel"))]
    let trials = (0..config.trial_qty).map(run_one).collect();

    Ok(SimulationResults { trials })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests_support::minimal_config;

    #[test]
    fn every_trial_covers_the_full_horizon() {
        let mut config = minimal_config();
        config.trial_qty = 20;
        config.intervals_per_trial = 40;
        let results = run(&config).unwrap();
        assert_eq!(results.trials.len(), 20);
        for trial in &results.trials {
            assert_eq!(trial.intervals.len(), 40);
            assert_eq!(trial.intervals.last().unwrap().state.interval_idx, 40);
        }
    }

    #[test]
    fn net_worth_never_goes_negative() {
        let mut config = minimal_config();
        config.trial_qty = 50;
        config.initial_net_worth = 50_000.0;
        let results = run(&config).unwrap();
        for trial in &results.trials {
            for interval in &trial.intervals {
                assert!(interval.state.net_worth >= 0.0);
            }
        }
    }

    #[test]
    fn same_seed_gives_identical_results() {
        let mut config = minimal_config();
        config.trial_qty = 10;
        config.intervals_per_trial = 20;
        let a = run(&config).unwrap();
        let b = run(&config).unwrap();
        for (ta, tb) in a.trials.iter().zip(&b.trials) {
            for (ia, ib) in ta.intervals.iter().zip(&tb.intervals) {
                assert_eq!(ia.state.net_worth, ib.state.net_worth);
            }
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut config = minimal_config();
        config.trial_qty = 5;
        config.intervals_per_trial = 20;
        let a = run(&config).unwrap();
        config.seed += 1;
        let b = run(&config).unwrap();
        let same = a
            .trials
            .iter()
            .zip(&b.trials)
            .all(|(ta, tb)| ta.final_net_worth() == tb.final_net_worth());
        assert!(!same);
    }

    #[test]
    fn progress_reports_every_trial() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let mut config = minimal_config();
        config.trial_qty = 16;
        config.intervals_per_trial = 8;
        let calls = AtomicUsize::new(0);
        run_with_progress(&config, |_, total| {
            assert_eq!(total, 16);
            calls.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 16);
    }

    #[test]
    fn rejects_invalid_interval_resolution() {
        let mut config = minimal_config();
        config.intervals_per_year = 5;
        assert!(matches!(
            run(&config),
            Err(ConfigError::InvalidIntervalsPerYear { .. })
        ));
        config.intervals_per_year = 0;
        assert!(run(&config).is_err());
    }
}
