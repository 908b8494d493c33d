//! Regressor traits plugged into the multi-output estimator.

use crate::error::{ForecastError, Result};

/// A single-output regression algorithm.
///
/// `train` takes the feature matrix (one row per observation) and one target
/// value per row and returns an independent trained model, so one regressor
/// can be trained for several targets concurrently.
///
/// # Example
///
/// ```
/// use featcast::models::{MeanRegressor, Predictor, Regressor};
///
/// let x = vec![vec![1.0], vec![2.0], vec![3.0]];
/// let model = MeanRegressor::new().train(&x, &[2.0, 4.0, 6.0]).unwrap();
/// assert_eq!(model.predict(&[vec![10.0]]).unwrap(), vec![4.0]);
/// ```
pub trait Regressor: Send + Sync {
    /// Model produced by [`train`](Regressor::train).
    type Model: Predictor;

    /// Fit a model mapping `features` rows to `targets`.
    fn train(&self, features: &[Vec<f64>], targets: &[f64]) -> Result<Self::Model>;

    /// Get the regressor name.
    fn name(&self) -> &str;
}

/// A trained single-output model.
pub trait Predictor: Send + Sync {
    /// Predict one value per feature row.
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>>;
}

/// Check a training set: non-empty, one target per row, rectangular.
///
/// Returns the number of feature columns.
pub(crate) fn check_training_data(features: &[Vec<f64>], targets: &[f64]) -> Result<usize> {
    if features.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    if features.len() != targets.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: features.len(),
            got: targets.len(),
        });
    }
    check_width(features, features[0].len())?;
    Ok(features[0].len())
}

/// Check that every row has `width` columns.
pub(crate) fn check_width(features: &[Vec<f64>], width: usize) -> Result<()> {
    match features.iter().find(|row| row.len() != width) {
        Some(row) => Err(ForecastError::DimensionMismatch {
            expected: width,
            got: row.len(),
        }),
        None => Ok(()),
    }
}
