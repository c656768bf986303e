//! Household solvency simulation library
//!
//! This crate estimates the probability that a household's assets survive to
//! a planning horizon. It runs thousands of stochastic trials over a shared
//! correlated economic draw and steps each one through an interval state
//! machine. It supports:
//! - Correlated asset returns and inflation from annual statistics
//! - Deterministic salary profiles with raises and pre-tax deferrals
//! - Social Security benefits (AIME/PIA bend points, early/delayed claiming,
//!   WEP, spousal benefits) with net-worth-conditioned claiming strategies
//! - Employer pensions, including projected-balance cash-outs
//! - Progressive federal/state income tax, payroll taxes, and a flat
//!   portfolio tax with loss rebates
//! - Allocation strategies from fixed weights to a Merton total-portfolio
//!   rule that values future income as human capital
//! - A deferred annuity side fund with a one-way annuitization trigger
//!
//! # Example
//!
//! ```ignore
//! use solvency_core::{config::SimulationConfig, engine};
//!
//! let config: SimulationConfig = serde_json::from_str(&input)?;
//! let results = engine::run(&config)?;
//! println!("success rate: {:.1}%", results.success_rate() * 100.0);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod allocation;
pub mod annuity;
pub mod date_math;
pub mod economy;
pub mod engine;
pub mod error;
pub mod future_income;
pub mod income;
pub mod numeric;
pub mod pension;
pub mod social_security;
pub mod spending;
pub mod taxes;
pub mod transition;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::SimulationConfig;
pub use engine::{run, run_with_progress};
pub use error::ConfigError;
pub use model::{SimulationResults, TrialResult};
