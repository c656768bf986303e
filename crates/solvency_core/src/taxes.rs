//! Simplified annual-equivalent tax model.
//!
//! Ordinary income tax is computed on the annualized real taxable income
//! (brackets are fixed in today's dollars, so nominal income is deflated by
//! cumulative inflation first), then scaled back to one nominal interval.
//! Payroll taxes are flat on wages; portfolio gains are taxed at a flat rate
//! with sign-matched rebates on losses.

use crate::config::{TaxBracket, TaxConfig};
use crate::model::{StateView, TaxesPaid};
use crate::numeric::LogLinearSeries;

/// One bracket step with the tax owed at its threshold precomputed, so a
/// lookup costs one scan and one multiply.
#[derive(Debug, Clone, Copy)]
struct BracketStep {
    threshold: f64,
    rate: f64,
    cumulative: f64,
}

/// A progressive bracket schedule over annual income.
#[derive(Debug, Clone)]
pub struct BracketSchedule {
    steps: Vec<BracketStep>,
}

impl BracketSchedule {
    #[must_use]
    pub fn new(brackets: &[TaxBracket]) -> Self {
        let mut steps = Vec::with_capacity(brackets.len());
        let mut cumulative = 0.0;
        for (i, bracket) in brackets.iter().enumerate() {
            if i > 0 {
                let prior = brackets[i - 1];
                cumulative += (bracket.threshold - prior.threshold) * prior.rate;
            }
            steps.push(BracketStep {
                threshold: bracket.threshold,
                rate: bracket.rate,
                cumulative,
            });
        }
        Self { steps }
    }

    /// Annual tax owed on `income`; zero at or below zero income.
    #[must_use]
    pub fn tax(&self, income: f64) -> f64 {
        if income <= 0.0 {
            return 0.0;
        }
        let step = self
            .steps
            .iter()
            .rev()
            .find(|s| income >= s.threshold);
        match step {
            Some(s) => s.cumulative + (income - s.threshold) * s.rate,
            None => 0.0,
        }
    }
}

/// Stateless tax calculator shared across trials.
#[derive(Debug, Clone)]
pub struct TaxCalculator {
    federal: BracketSchedule,
    state: BracketSchedule,
    standard_deduction: f64,
    medicare_rate: f64,
    social_security_rate: f64,
    benefit_taxable_share: f64,
    portfolio_rate: f64,
    /// Maximum taxable wage base by year, extrapolated past history.
    taxable_maximum: LogLinearSeries,
    intervals_per_year: f64,
}

impl TaxCalculator {
    #[must_use]
    pub fn new(
        config: &TaxConfig,
        taxable_maximum_history: &[(i16, f64)],
        intervals_per_year: u32,
    ) -> Self {
        Self {
            federal: BracketSchedule::new(&config.federal_brackets),
            state: BracketSchedule::new(&config.state_brackets),
            standard_deduction: config.standard_deduction,
            medicare_rate: config.medicare_rate,
            social_security_rate: config.social_security_rate,
            benefit_taxable_share: config.benefit_taxable_share,
            portfolio_rate: config.portfolio_rate,
            taxable_maximum: LogLinearSeries::fit(taxable_maximum_history),
            intervals_per_year: f64::from(intervals_per_year),
        }
    }

    /// Taxes for one interval, as negative cash flows. `job_income` and
    /// `tax_deferred` are nominal interval amounts; `benefit_income` covers
    /// Social Security plus pension.
    #[must_use]
    pub fn calc<V: StateView>(
        &self,
        view: &V,
        job_income: f64,
        tax_deferred: f64,
        benefit_income: f64,
        portfolio_return: f64,
    ) -> TaxesPaid {
        let inflation = view.inflation();
        let n = self.intervals_per_year;

        let taxable_interval =
            (job_income - tax_deferred).max(0.0) + benefit_income * self.benefit_taxable_share;
        // Deflate to today's dollars, annualize, deduct, then scale the
        // annual tax back down to one nominal interval.
        let annual_real = (taxable_interval * n / inflation - self.standard_deduction).max(0.0);
        let income =
            -((self.federal.tax(annual_real) + self.state.tax(annual_real)) / n) * inflation;

        let medicare = -job_income * self.medicare_rate;
        let wage_base_interval =
            self.taxable_maximum.value_at(view.date().year()) / n;
        let social_security =
            -job_income.min(wage_base_interval) * self.social_security_rate;
        let portfolio = -portfolio_return * self.portfolio_rate;

        TaxesPaid {
            income,
            medicare,
            social_security,
            portfolio,
        }
    }
}
