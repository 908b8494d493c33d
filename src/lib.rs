//! # featcast
//!
//! Feature-based multi-step time series forecasting.
//!
//! A univariate series is turned into a supervised problem: every trailing
//! window of one seasonal period is summarised by statistical descriptors
//! (STL trend and seasonal strength, spectral entropy, Hurst exponent, ADF
//! p-value, shape statistics) plus lagged values, and paired with the next
//! `horizon` observations. One regressor per forecast step is trained on the
//! aligned table, and walk-forward validation scores the estimator on
//! nested, past-only folds.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use featcast::prelude::*;
//!
//! let values: Vec<f64> = (0..150)
//!     .map(|i| {
//!         20.0 + (i as f64 * std::f64::consts::PI / 6.0).sin() * 4.0 + ((i * 13) % 5) as f64 * 0.2
//!     })
//!     .collect();
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let series = TimeSeries::from_values(start, Frequency::Daily, values).unwrap();
//!
//! let config = EstimatorConfig::new(5, 12, Frequency::Daily);
//! let mut estimator =
//!     FeatureBasedEstimator::new(LinearRegression::ridge(1.0).unwrap(), config);
//! estimator.preprocess_and_fit(&series).unwrap();
//!
//! let forecast = estimator.forecast().unwrap();
//! assert_eq!(forecast.horizon(), 5);
//!
//! let report = estimator.sequential_validation(3, &Metric::mae()).unwrap();
//! assert_eq!(report.len(), 3);
//! ```

#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod features;
pub mod models;
pub mod preprocessing;
pub mod seasonality;
pub mod utils;
pub mod validation;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{Forecast, Frequency, TimeSeries};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::{
        EstimatorConfig, FeatureBasedEstimator, LinearRegression, MeanRegressor, Predictor,
        Regressor,
    };
    pub use crate::preprocessing::{build_rolling_xy, RollingConfig, RollingDataset};
    pub use crate::utils::{calculate_metrics, AccuracyMetrics, Metric, ValidationReport};
}
