//! Social Security benefits: AIME/PIA bend-point math, early/delayed
//! claiming adjustments, the Windfall Elimination Provision, and spousal
//! benefits.
//!
//! Benefit amounts are statutory and deterministic given the claim age, so
//! everything except the claim decision itself lives in a shared, trial
//! invariant [`SocialSecurityInputs`]. The per-trial
//! [`SocialSecurityController`] only tracks who has claimed and at what
//! locked-in rate.

use jiff::civil::Date;
use rustc_hash::FxHashMap;

use crate::config::{ClaimingAge, ClaimingStrategy, SimulationConfig, SocialSecurityParams};
use crate::date_math;
use crate::income::JobIncomeController;
use crate::model::StateView;
use crate::numeric::LogLinearSeries;

/// Fraction of the primary insurance amount paid at a claim age.
///
/// Early claims are reduced 5/9 of one percent per month for the first 36
/// months before full retirement age and 5/12 of one percent per month
/// beyond that; delayed claims earn 2/3 of one percent per month. Ages
/// outside the statutory window clamp to it.
#[must_use]
pub fn benefit_rate_multiplier(claim_age: f64, params: &SocialSecurityParams) -> f64 {
    let age = claim_age.clamp(params.early_age, params.late_age);
    let months = ((age - params.full_retirement_age) * 12.0).round();
    if months < 0.0 {
        let early = -months;
        let first = early.min(36.0);
        let rest = (early - 36.0).max(0.0);
        1.0 - first * 5.0 / 900.0 - rest * 5.0 / 1200.0
    } else {
        1.0 + months * 2.0 / 300.0
    }
}

/// Claiming strategy after `SameAsPrimary` resolution.
#[derive(Debug, Clone, Copy)]
enum ResolvedClaiming {
    FixedAge {
        age: f64,
    },
    NetWorthTrigger {
        minimum_age: f64,
        maximum_age: f64,
        net_worth_target: f64,
    },
}

#[derive(Debug, Clone)]
struct ClaimantInputs {
    birth_date: Date,
    strategy: ResolvedClaiming,
    pension_eligible: bool,
    /// Covered earnings by calendar year, nominal.
    earnings: FxHashMap<i16, f64>,
}

/// Trial-invariant benefit inputs, built once per run.
#[derive(Debug, Clone)]
pub struct SocialSecurityInputs {
    params: SocialSecurityParams,
    wage_index: LogLinearSeries,
    taxable_maximum: LogLinearSeries,
    claimants: Vec<ClaimantInputs>,
    intervals_per_year: f64,
}

impl SocialSecurityInputs {
    #[must_use]
    pub fn new(config: &SimulationConfig, job_income: &JobIncomeController) -> Self {
        let params = config.social_security.clone();
        let people: Vec<_> = std::iter::once(&config.primary)
            .chain(config.spouse.as_ref())
            .collect();

        let primary_strategy = resolve_claiming(&config.primary.claiming, &params)
            .unwrap_or(ResolvedClaiming::FixedAge {
                age: params.full_retirement_age,
            });

        let months = config.interval_months();
        let mut claimants = Vec::with_capacity(people.len());
        for (p, person) in people.iter().enumerate() {
            let mut earnings: FxHashMap<i16, f64> = FxHashMap::default();
            for &(year, amount) in &person.historical_earnings {
                earnings.insert(year, amount);
            }
            // Simulated wages overwrite any overlapping historical year.
            let mut simulated: FxHashMap<i16, f64> = FxHashMap::default();
            for j in 0..config.intervals_per_trial {
                let income = job_income.person_income_at(p, j);
                if income > 0.0 {
                    let date = date_math::add_months(config.start_date, j as i32 * months);
                    *simulated.entry(date.year()).or_insert(0.0) += income;
                }
            }
            earnings.extend(simulated);

            let strategy = resolve_claiming(&person.claiming, &params)
                .unwrap_or(primary_strategy);
            claimants.push(ClaimantInputs {
                birth_date: person.birth_date,
                strategy,
                pension_eligible: person.pension.is_some(),
                earnings,
            });
        }

        Self {
            wage_index: LogLinearSeries::fit(&params.wage_index_history),
            taxable_maximum: LogLinearSeries::fit(&params.taxable_maximum_history),
            claimants,
            params,
            intervals_per_year: f64::from(config.intervals_per_year),
        }
    }

    /// Average indexed monthly earnings: each covered year before the claim
    /// year is capped at that year's taxable maximum, indexed by wage growth
    /// to the year the claimant turns 60 (never deflated), and the top 35
    /// years are averaged over 420 months.
    fn aime(&self, claimant: &ClaimantInputs, claim_year: i16) -> f64 {
        let index_year = claimant.birth_date.year() + 60;
        let index_base = self.wage_index.value_at(index_year);

        let mut indexed: Vec<f64> = claimant
            .earnings
            .iter()
            .filter(|(year, _)| **year < claim_year)
            .map(|(&year, &amount)| {
                let capped = amount.min(self.taxable_maximum.value_at(year));
                let factor = (index_base / self.wage_index.value_at(year)).max(1.0);
                capped * factor
            })
            .collect();
        indexed.sort_unstable_by(|a, b| b.total_cmp(a));
        indexed.truncate(35);
        indexed.iter().sum::<f64>() / 420.0
    }

    /// Primary insurance amount: marginal accrual across the bend-point
    /// segments, with the first segment rate replaced under WEP for
    /// pension-eligible claimants.
    fn pia(&self, aime: f64, pension_eligible: bool) -> f64 {
        let [b0, b1] = self.params.bend_points;
        let first_rate = if pension_eligible {
            self.params.wep_first_segment_rate
        } else {
            self.params.segment_rates[0]
        };
        first_rate * aime.min(b0)
            + self.params.segment_rates[1] * (aime.min(b1) - b0).max(0.0)
            + self.params.segment_rates[2] * (aime - b1).max(0.0)
    }

    /// Resolve a fixed claiming point to an age in years.
    #[must_use]
    pub fn fixed_claim_age(&self, age: ClaimingAge) -> f64 {
        match age {
            ClaimingAge::Early => self.params.early_age,
            ClaimingAge::Full => self.params.full_retirement_age,
            ClaimingAge::Late => self.params.late_age,
        }
    }
}

fn resolve_claiming(
    strategy: &ClaimingStrategy,
    params: &SocialSecurityParams,
) -> Option<ResolvedClaiming> {
    match strategy {
        ClaimingStrategy::FixedAge { age } => Some(ResolvedClaiming::FixedAge {
            age: match age {
                ClaimingAge::Early => params.early_age,
                ClaimingAge::Full => params.full_retirement_age,
                ClaimingAge::Late => params.late_age,
            },
        }),
        ClaimingStrategy::NetWorthTrigger {
            minimum_age,
            maximum_age,
            net_worth_target,
        } => Some(ResolvedClaiming::NetWorthTrigger {
            minimum_age: *minimum_age,
            maximum_age: *maximum_age,
            net_worth_target: *net_worth_target,
        }),
        ClaimingStrategy::SameAsPrimary => None,
    }
}

/// A locked-in claim: the rate and PIA never change after the trigger.
#[derive(Debug, Clone, Copy)]
struct Claim {
    rate: f64,
    pia: f64,
}

/// Per-trial claiming state.
#[derive(Debug, Clone)]
pub struct SocialSecurityController<'a> {
    inputs: &'a SocialSecurityInputs,
    claims: Vec<Option<Claim>>,
}

impl<'a> SocialSecurityController<'a> {
    #[must_use]
    pub fn new(inputs: &'a SocialSecurityInputs) -> Self {
        Self {
            claims: vec![None; inputs.claimants.len()],
            inputs,
        }
    }

    /// Household benefit payment for one interval. Evaluates claim triggers
    /// first (permanently locking the rate), then pays every claimed
    /// benefit, substituting the spousal benefit where it is larger.
    pub fn calc_payment<V: StateView>(&mut self, view: &V) -> f64 {
        let inputs = self.inputs;
        for (i, claimant) in inputs.claimants.iter().enumerate() {
            if self.claims[i].is_some() {
                continue;
            }
            let age = view.age_of(claimant.birth_date);
            let claim_age = match claimant.strategy {
                ResolvedClaiming::FixedAge { age: target } if age >= target => Some(target),
                ResolvedClaiming::NetWorthTrigger {
                    minimum_age,
                    maximum_age,
                    net_worth_target,
                } if age >= minimum_age => {
                    let depleted = view
                        .net_worth()
                        .is_some_and(|nw| nw < net_worth_target * view.inflation());
                    if depleted || age >= maximum_age {
                        Some(age)
                    } else {
                        None
                    }
                }
                _ => None,
            };
            if let Some(claim_age) = claim_age {
                let claim_year = view.date().year();
                let aime = inputs.aime(claimant, claim_year);
                self.claims[i] = Some(Claim {
                    rate: benefit_rate_multiplier(claim_age, &inputs.params),
                    pia: inputs.pia(aime, claimant.pension_eligible),
                });
            }
        }

        let mut monthly = 0.0;
        for (i, claim) in self.claims.iter().enumerate() {
            let Some(claim) = claim else { continue };
            let own = claim.pia * claim.rate;
            // The spousal alternative needs both members claimed; it pays a
            // share of the worker's unreduced PIA at the claimant's own rate.
            let spousal = other_claim(&self.claims, i)
                .map_or(0.0, |other| {
                    inputs.params.spousal_share * other.pia * claim.rate
                });
            monthly += own.max(spousal);
        }
        monthly * 12.0 / inputs.intervals_per_year * view.inflation()
    }
}

fn other_claim(claims: &[Option<Claim>], idx: usize) -> Option<Claim> {
    if claims.len() != 2 {
        return None;
    }
    claims[1 - idx]
}
