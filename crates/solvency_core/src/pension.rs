//! Employer pensions: fixed-age and net-worth-triggered annual benefits,
//! plus a one-shot cash-out of a projected account balance.
//!
//! Balance projection for the cash-out variant is deterministic, so it runs
//! once at startup; the per-trial controller only tracks trigger state.

use jiff::civil::Date;

use crate::config::{PensionStrategy, PersonConfig, SimulationConfig};
use crate::income;
use crate::model::StateView;

/// One person's pension plan, resolved to run-ready form.
#[derive(Debug, Clone)]
enum PensionPlan {
    None,
    FixedAge {
        birth_date: Date,
        age: f64,
        annual_payment: f64,
    },
    NetWorthTrigger {
        birth_date: Date,
        minimum_age: f64,
        maximum_age: f64,
        net_worth_target: f64,
        annual_payment: f64,
    },
    CashOut {
        /// First date at or after which the balance pays out (the day after
        /// the last working date).
        payout_date: Date,
        /// Projected nominal balance at the payout date.
        balance: f64,
    },
}

/// Trial-invariant pension inputs.
#[derive(Debug, Clone)]
pub struct PensionInputs {
    plans: Vec<PensionPlan>,
    intervals_per_year: f64,
}

impl PensionInputs {
    #[must_use]
    pub fn new(config: &SimulationConfig) -> Self {
        let plans = std::iter::once(&config.primary)
            .chain(config.spouse.as_ref())
            .map(resolve_plan)
            .collect();
        Self {
            plans,
            intervals_per_year: f64::from(config.intervals_per_year),
        }
    }
}

fn resolve_plan(person: &PersonConfig) -> PensionPlan {
    let Some(pension) = &person.pension else {
        return PensionPlan::None;
    };
    match &pension.strategy {
        PensionStrategy::FixedAge { age } => PensionPlan::FixedAge {
            birth_date: person.birth_date,
            age: *age,
            annual_payment: pension.annual_payment,
        },
        PensionStrategy::NetWorthTrigger {
            minimum_age,
            maximum_age,
            net_worth_target,
        } => PensionPlan::NetWorthTrigger {
            birth_date: person.birth_date,
            minimum_age: *minimum_age,
            maximum_age: *maximum_age,
            net_worth_target: *net_worth_target,
            annual_payment: pension.annual_payment,
        },
        PensionStrategy::CashOut {
            contribution_rate,
            account_growth,
            service_start_year,
        } => {
            let payout_date = person
                .income_profiles
                .iter()
                .map(|p| p.end_date)
                .max()
                .unwrap_or(person.birth_date);
            let last_year = payout_date.year() - 1;
            // Each service year's contribution compounds to the payout year.
            let mut balance = 0.0;
            for year in *service_start_year..=last_year {
                let salary = income::annual_salary_in_year(&person.income_profiles, year);
                let growth_years = i32::from(last_year - year);
                balance += salary * contribution_rate * account_growth.powi(growth_years);
            }
            PensionPlan::CashOut {
                payout_date,
                balance,
            }
        }
    }
}

/// Per-person trigger state for one trial.
#[derive(Debug, Clone, Copy, Default)]
struct PlanState {
    triggered: bool,
    paid_out: bool,
}

/// Per-trial pension controller.
#[derive(Debug, Clone)]
pub struct PensionController<'a> {
    inputs: &'a PensionInputs,
    states: Vec<PlanState>,
}

impl<'a> PensionController<'a> {
    #[must_use]
    pub fn new(inputs: &'a PensionInputs) -> Self {
        Self {
            states: vec![PlanState::default(); inputs.plans.len()],
            inputs,
        }
    }

    /// Household pension payment for one interval.
    pub fn calc_payment<V: StateView>(&mut self, view: &V) -> f64 {
        let n = self.inputs.intervals_per_year;
        let mut payment = 0.0;
        for (plan, state) in self.inputs.plans.iter().zip(self.states.iter_mut()) {
            match plan {
                PensionPlan::None => {}
                PensionPlan::FixedAge {
                    birth_date,
                    age,
                    annual_payment,
                } => {
                    if view.age_of(*birth_date) >= *age {
                        payment += annual_payment / n * view.inflation();
                    }
                }
                PensionPlan::NetWorthTrigger {
                    birth_date,
                    minimum_age,
                    maximum_age,
                    net_worth_target,
                    annual_payment,
                } => {
                    let age = view.age_of(*birth_date);
                    if !state.triggered && age >= *minimum_age {
                        let depleted = view
                            .net_worth()
                            .is_some_and(|nw| nw < net_worth_target * view.inflation());
                        if depleted || age >= *maximum_age {
                            state.triggered = true;
                        }
                    }
                    if state.triggered {
                        payment += annual_payment / n * view.inflation();
                    }
                }
                PensionPlan::CashOut {
                    payout_date,
                    balance,
                } => {
                    if !state.paid_out && view.date() >= *payout_date {
                        state.paid_out = true;
                        payment += balance;
                    }
                }
            }
        }
        payment
    }
}
