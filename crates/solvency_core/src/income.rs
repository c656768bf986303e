//! Deterministic job income.
//!
//! Salary never depends on the stochastic state, so the controller walks the
//! interval calendar once at startup and answers every later query from the
//! precomputed tables. All values are nominal (raises are the only growth;
//! inflation is not applied to wages).

use jiff::civil::Date;

use crate::config::{IncomeProfile, SimulationConfig};
use crate::date_math;

/// Precomputed household job income, indexed by interval.
#[derive(Debug, Clone)]
pub struct JobIncomeController {
    /// Household gross income per interval.
    income: Vec<f64>,
    /// Pre-tax deferrals per interval (subtracted from taxable wages).
    tax_deferred: Vec<f64>,
    /// `[person][interval]` gross income; person 0 is the primary.
    per_person: Vec<Vec<f64>>,
}

impl JobIncomeController {
    #[must_use]
    pub fn new(config: &SimulationConfig) -> Self {
        let people: Vec<&[IncomeProfile]> = std::iter::once(&config.primary)
            .chain(config.spouse.as_ref())
            .map(|p| p.income_profiles.as_slice())
            .collect();

        let months = config.interval_months();
        let n = f64::from(config.intervals_per_year);
        let mut income = vec![0.0f64; config.intervals_per_trial];
        let mut tax_deferred = vec![0.0f64; config.intervals_per_trial];
        let mut per_person = vec![vec![0.0f64; config.intervals_per_trial]; people.len()];

        for j in 0..config.intervals_per_trial {
            let date = date_math::add_months(config.start_date, j as i32 * months);
            for (p, profiles) in people.iter().enumerate() {
                if let Some(profile) = active_profile(profiles, date) {
                    let gross = salary_in_year(profile, date.year()) / n;
                    per_person[p][j] = gross;
                    income[j] += gross;
                    tax_deferred[j] += gross * profile.tax_deferred_rate;
                }
            }
        }

        Self {
            income,
            tax_deferred,
            per_person,
        }
    }

    /// Household gross job income for an interval.
    #[must_use]
    pub fn income_at(&self, interval: usize) -> f64 {
        self.income.get(interval).copied().unwrap_or(0.0)
    }

    /// Pre-tax deferrals for an interval.
    #[must_use]
    pub fn tax_deferred_at(&self, interval: usize) -> f64 {
        self.tax_deferred.get(interval).copied().unwrap_or(0.0)
    }

    /// One person's gross job income for an interval.
    #[must_use]
    pub fn person_income_at(&self, person: usize, interval: usize) -> f64 {
        self.per_person
            .get(person)
            .and_then(|row| row.get(interval))
            .copied()
            .unwrap_or(0.0)
    }

    #[must_use]
    pub fn person_count(&self) -> usize {
        self.per_person.len()
    }

    /// Whether anyone in the household earns wages during an interval.
    #[must_use]
    pub fn is_working_at(&self, interval: usize) -> bool {
        self.income_at(interval) > 0.0
    }
}

fn active_profile(profiles: &[IncomeProfile], date: Date) -> Option<&IncomeProfile> {
    profiles
        .iter()
        .find(|p| p.start_date <= date && date < p.end_date)
}

/// Annual salary a profile pays during a calendar year, raises compounded
/// from the profile's start year.
pub(crate) fn salary_in_year(profile: &IncomeProfile, year: i16) -> f64 {
    let elapsed = i32::from(year) - i32::from(profile.start_date.year());
    profile.annual_income * (1.0 + profile.yearly_raise).powi(elapsed)
}

/// Annual salary across a person's profiles for a calendar year, with
/// back-extrapolation before the first profile (used by pension service
/// projections). Years after the last profile return zero.
pub(crate) fn annual_salary_in_year(profiles: &[IncomeProfile], year: i16) -> f64 {
    for profile in profiles {
        if profile.start_date.year() <= year && year < profile.end_date.year() {
            return salary_in_year(profile, year);
        }
    }
    if let Some(first) = profiles.first() {
        if year < first.start_date.year() {
            // Un-compound the raise backwards from the first profile.
            return salary_in_year(first, year);
        }
    }
    0.0
}
