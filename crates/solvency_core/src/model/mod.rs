mod flows;
mod results;
mod state;

pub use flows::{Costs, Income, NetTransactions, TaxesPaid};
pub use results::{Interval, IntervalRow, SimulationResults, TrialResult};
pub use state::{Projection, State, StateView};
