//! Utility functions shared by the estimator and the feature library.

pub mod cross_validation;
pub mod metrics;
pub mod ols;
pub mod parallel;
pub mod stats;

pub use cross_validation::{ValidationReport, WalkForwardValidator};
pub use metrics::{calculate_metrics, AccuracyMetrics, Metric, MetricFn};
pub use ols::{nested_ssr, ols_fit, NestedFit, OLSResult};
pub use parallel::run_with_workers;
pub use stats::{normal_cdf, polyval};
