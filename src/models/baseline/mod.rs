//! Baseline regressors.
//!
//! Simple methods that serve as benchmarks for more complex regressors.

mod mean;

pub use mean::{MeanModel, MeanRegressor};
