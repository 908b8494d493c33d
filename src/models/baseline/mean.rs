//! Mean-of-targets baseline regressor.

use crate::error::{ForecastError, Result};
use crate::features::basic;
use crate::models::traits::{check_training_data, check_width};
use crate::models::{Predictor, Regressor};

/// Predicts the mean training target regardless of the features.
///
/// With a window, only the last `window` targets (rows are chronological)
/// are averaged.
#[derive(Debug, Clone, Default)]
pub struct MeanRegressor {
    window: Option<usize>,
}

impl MeanRegressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Average only the most recent `window` targets.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = Some(window);
        self
    }
}

impl Regressor for MeanRegressor {
    type Model = MeanModel;

    fn train(&self, features: &[Vec<f64>], targets: &[f64]) -> Result<MeanModel> {
        let width = check_training_data(features, targets)?;
        let recent = match self.window {
            Some(0) => {
                return Err(ForecastError::InvalidParameter(
                    "window must be at least 1".to_string(),
                ))
            }
            Some(w) => &targets[targets.len().saturating_sub(w)..],
            None => targets,
        };
        Ok(MeanModel {
            value: basic::mean(recent),
            width,
        })
    }

    fn name(&self) -> &str {
        "Mean"
    }
}

/// Constant prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct MeanModel {
    value: f64,
    width: usize,
}

impl MeanModel {
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Predictor for MeanModel {
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        check_width(features, self.width)?;
        Ok(vec![self.value; features.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_regressor_full_history() {
        let x = vec![vec![0.0, 1.0]; 4];
        let model = MeanRegressor::new().train(&x, &[1.0, 2.0, 3.0, 6.0]).unwrap();
        assert_relative_eq!(model.value(), 3.0, epsilon = 1e-12);
        assert_eq!(model.predict(&x[..2]).unwrap(), vec![3.0, 3.0]);
    }

    #[test]
    fn mean_regressor_window() {
        let x = vec![vec![0.0]; 4];
        let model = MeanRegressor::new()
            .with_window(2)
            .train(&x, &[1.0, 2.0, 3.0, 6.0])
            .unwrap();
        assert_relative_eq!(model.value(), 4.5, epsilon = 1e-12);

        let long = MeanRegressor::new().with_window(10).train(&x, &[1.0, 2.0, 3.0, 6.0]);
        assert_relative_eq!(long.unwrap().value(), 3.0, epsilon = 1e-12);
        assert!(MeanRegressor::new().with_window(0).train(&x, &[1.0; 4]).is_err());
    }

    #[test]
    fn mean_model_checks_width() {
        let model = MeanRegressor::new().train(&[vec![1.0, 2.0]], &[5.0]).unwrap();
        assert!(model.predict(&[vec![1.0]]).is_err());
        assert!(model.predict(&[]).unwrap().is_empty());
    }
}
