//! Cash-flow components of one interval.
//!
//! Sign convention: inflows positive, outflows negative. `Costs` and
//! `TaxesPaid` therefore carry negative values (a tax rebate on a portfolio
//! loss is the one positive entry that can appear under taxes).

use serde::{Deserialize, Serialize};

/// Income received during one interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub job: f64,
    pub social_security: f64,
    pub pension: f64,
}

impl Income {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.job + self.social_security + self.pension
    }
}

/// Taxes assessed during one interval, stored as negative cash flows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxesPaid {
    pub income: f64,
    pub medicare: f64,
    pub social_security: f64,
    pub portfolio: f64,
}

impl TaxesPaid {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.income + self.medicare + self.social_security + self.portfolio
    }
}

/// Outflows during one interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Costs {
    pub spending: f64,
    pub dependent_support: f64,
    pub taxes: TaxesPaid,
}

impl Costs {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.spending + self.dependent_support + self.taxes.total()
    }
}

/// Everything that moved net worth during one interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetTransactions {
    pub income: Income,
    pub portfolio_return: f64,
    pub costs: Costs,
    /// Annuity side-fund transaction: contributions negative, payouts positive.
    pub annuity: f64,
}

impl NetTransactions {
    /// The interval's net change in net worth (before the zero clamp).
    #[must_use]
    pub fn total(&self) -> f64 {
        self.income.total() + self.portfolio_return + self.costs.total() + self.annuity
    }
}
