//! Regressors and the feature-based multi-step estimator.

mod estimator;
mod linear;
mod multi_output;
pub(crate) mod traits;

pub mod baseline;

pub use baseline::{MeanModel, MeanRegressor};
pub use estimator::{EstimatorConfig, FeatureBasedEstimator};
pub use linear::{LinearModel, LinearRegression};
pub use multi_output::{MultiOutputModel, MultiOutputRegressor};
pub use traits::{Predictor, Regressor};
