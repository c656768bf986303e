//! The interval state transition.
//!
//! One call to [`advance`] moves the household forward one interval: collect
//! income, value future income, allocate, realize portfolio returns, assess
//! taxes and spending, route the annuity, and clamp net worth at zero.

use crate::allocation::AllocationController;
use crate::annuity::AnnuityController;
use crate::date_math;
use crate::economy::TrialEconomy;
use crate::future_income::FutureIncomeController;
use crate::income::JobIncomeController;
use crate::model::{Costs, Income, NetTransactions, State};
use crate::pension::PensionController;
use crate::social_security::SocialSecurityController;
use crate::spending::SpendingController;
use crate::taxes::TaxCalculator;

/// Everything one trial needs to step: shared read-only controllers plus the
/// trial-local stateful ones.
pub struct ControllerBundle<'a> {
    pub job_income: &'a JobIncomeController,
    pub allocation: &'a AllocationController,
    pub taxes: &'a TaxCalculator,
    pub spending: &'a SpendingController,
    pub social_security: SocialSecurityController<'a>,
    pub pension: PensionController<'a>,
    pub annuity: AnnuityController,
    pub future_income: FutureIncomeController,
}

/// Advance one interval. Returns the transactions booked during the interval
/// and the state at its close.
pub fn advance(
    state: &State,
    bundle: &mut ControllerBundle<'_>,
    trial: &TrialEconomy<'_>,
    interval_months: i32,
) -> (NetTransactions, State) {
    let idx = state.interval_idx;

    let income = Income {
        job: bundle.job_income.income_at(idx),
        social_security: bundle.social_security.calc_payment(state),
        pension: bundle.pension.calc_payment(state),
    };

    let weights = bundle
        .allocation
        .weights(state, bundle.future_income.present_value(idx));
    let economy = trial.state_data(idx);
    let portfolio_return: f64 = state.net_worth
        * weights
            .iter()
            .zip(economy.returns)
            .map(|(w, r)| w * r)
            .sum::<f64>();

    let taxes = bundle.taxes.calc(
        state,
        income.job,
        bundle.job_income.tax_deferred_at(idx),
        income.social_security + income.pension,
        portfolio_return,
    );
    let costs = Costs {
        spending: bundle.spending.calc_spending(state),
        dependent_support: bundle.spending.dependent_support(state),
        taxes,
    };

    let pre_annuity = income.total() + portfolio_return + costs.total();
    let annuity =
        bundle
            .annuity
            .transact(state, pre_annuity, bundle.job_income.is_working_at(idx));

    let transactions = NetTransactions {
        income,
        portfolio_return,
        costs,
        annuity,
    };

    let next_idx = idx + 1;
    let next = State {
        date: date_math::add_months(state.date, interval_months),
        interval_idx: next_idx,
        // Zero is absorbing; once assets are gone they stay gone.
        net_worth: if state.net_worth <= 0.0 {
            0.0
        } else {
            (state.net_worth + transactions.total()).max(0.0)
        },
        inflation: trial.inflation_at(next_idx),
    };
    (transactions, next)
}
