//! Statistical tests for time series.
//!
//! # Example
//!
//! ```
//! use featcast::validation::adf_test;
//!
//! let series: Vec<f64> = (0..60).map(|i| ((i * 37) % 11) as f64).collect();
//! let adf = adf_test(&series, None);
//! assert!(adf.p_value >= 0.0 && adf.p_value <= 1.0);
//! ```

pub mod stationarity;

pub use stationarity::{
    adf_pvalue, adf_test, default_max_lag, mackinnon_pvalue, CriticalValues, StationarityResult,
};
