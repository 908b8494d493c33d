//! Accuracy metrics for forecast evaluation.
//!
//! Standalone functions return NaN for empty or mismatched input so they can
//! be used directly as validation scores; [`calculate_metrics`] reports the
//! same conditions as errors.

use crate::error::{ForecastError, Result};
use std::fmt;
use std::sync::Arc;

/// Scoring function signature: `(actual, predicted) -> error`.
pub type MetricFn = dyn Fn(&[f64], &[f64]) -> f64 + Send + Sync;

/// A named error metric used to score validation folds.
#[derive(Clone)]
pub struct Metric {
    name: String,
    func: Arc<MetricFn>,
}

impl Metric {
    /// Wrap an arbitrary scoring function.
    pub fn custom<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[f64], &[f64]) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Mean absolute error.
    pub fn mae() -> Self {
        Self::custom("mae", mae)
    }

    /// Mean squared error.
    pub fn mse() -> Self {
        Self::custom("mse", mse)
    }

    /// Root mean squared error.
    pub fn rmse() -> Self {
        Self::custom("rmse", rmse)
    }

    /// Mean absolute percentage error.
    pub fn mape() -> Self {
        Self::custom("mape", mape)
    }

    /// Symmetric mean absolute percentage error.
    pub fn smape() -> Self {
        Self::custom("smape", smape)
    }

    /// Name reported alongside scores.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Score `predicted` against `actual`.
    pub fn score(&self, actual: &[f64], predicted: &[f64]) -> f64 {
        (self.func)(actual, predicted)
    }
}

impl Default for Metric {
    fn default() -> Self {
        Self::mae()
    }
}

impl fmt::Debug for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metric").field("name", &self.name).finish()
    }
}

/// Accuracy metrics for evaluating forecast performance.
#[derive(Debug, Clone)]
pub struct AccuracyMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error (None if zeros in actual)
    pub mape: Option<f64>,
    /// Symmetric Mean Absolute Percentage Error
    pub smape: f64,
    /// R-squared (coefficient of determination)
    pub r_squared: f64,
}

/// Calculate accuracy metrics between actual and predicted values.
pub fn calculate_metrics(actual: &[f64], predicted: &[f64]) -> Result<AccuracyMetrics> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    let mean_actual = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean_actual).powi(2)).sum();
    let ss_res: f64 = squared_errors(actual, predicted).sum();
    let r_squared = if ss_tot == 0.0 {
        1.0
    } else {
        1.0 - ss_res / ss_tot
    };

    Ok(AccuracyMetrics {
        mae: mae(actual, predicted),
        mse: mse(actual, predicted),
        rmse: rmse(actual, predicted),
        mape: if actual.contains(&0.0) {
            None
        } else {
            Some(mape(actual, predicted))
        },
        smape: smape(actual, predicted),
        r_squared,
    })
}

fn comparable(actual: &[f64], predicted: &[f64]) -> bool {
    actual.len() == predicted.len() && !actual.is_empty()
}

fn squared_errors<'a>(actual: &'a [f64], predicted: &'a [f64]) -> impl Iterator<Item = f64> + 'a {
    actual.iter().zip(predicted).map(|(a, p)| (a - p).powi(2))
}

/// Calculate MAE between two slices.
pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    if !comparable(actual, predicted) {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

/// Calculate MSE between two slices.
pub fn mse(actual: &[f64], predicted: &[f64]) -> f64 {
    if !comparable(actual, predicted) {
        return f64::NAN;
    }
    squared_errors(actual, predicted).sum::<f64>() / actual.len() as f64
}

/// Calculate RMSE between two slices.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    mse(actual, predicted).sqrt()
}

/// Calculate MAPE (in percent) between two slices.
///
/// Infinite when an actual value is zero and its prediction is not.
pub fn mape(actual: &[f64], predicted: &[f64]) -> f64 {
    if !comparable(actual, predicted) {
        return f64::NAN;
    }
    100.0
        * actual
            .iter()
            .zip(predicted)
            .map(|(a, p)| if a == p { 0.0 } else { ((a - p) / a).abs() })
            .sum::<f64>()
        / actual.len() as f64
}

/// Calculate SMAPE (in percent, range 0..200) between two slices.
pub fn smape(actual: &[f64], predicted: &[f64]) -> f64 {
    if !comparable(actual, predicted) {
        return f64::NAN;
    }
    let n = actual.len() as f64;
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| {
            let denom = a.abs() + p.abs();
            if denom == 0.0 {
                0.0
            } else {
                2.0 * (a - p).abs() / denom
            }
        })
        .sum::<f64>()
        * 100.0
        / n
}
