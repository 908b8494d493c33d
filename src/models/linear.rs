//! Least-squares linear regression with optional ridge penalty.

use super::traits::{check_training_data, check_width, Predictor, Regressor};
use crate::error::{ForecastError, Result};
use crate::features::basic;
use crate::utils::ols::ols_fit;

/// Columns whose spread is below this fraction of their magnitude are treated
/// as constant.
const CONSTANT_TOLERANCE: f64 = 1e-12;

/// Linear regression on standardised features.
///
/// Columns are centred and scaled before solving, constant columns get a zero
/// weight, and collinear columns are dropped by the QR solver. With
/// `alpha > 0` the standardised weights are shrunk towards zero (ridge).
#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    alpha: f64,
}

impl LinearRegression {
    /// Ordinary least squares.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ridge regression with penalty `alpha` on the standardised weights.
    pub fn ridge(alpha: f64) -> Result<Self> {
        if !(alpha >= 0.0 && alpha.is_finite()) {
            return Err(ForecastError::InvalidParameter(format!(
                "ridge alpha must be a finite non-negative number, got {}",
                alpha
            )));
        }
        Ok(Self { alpha })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Regressor for LinearRegression {
    type Model = LinearModel;

    fn train(&self, features: &[Vec<f64>], targets: &[f64]) -> Result<LinearModel> {
        let width = check_training_data(features, targets)?;

        let scales: Vec<Option<(f64, f64)>> = (0..width)
            .map(|j| {
                let column: Vec<f64> = features.iter().map(|row| row[j]).collect();
                let (center, spread) = (basic::mean(&column), basic::standard_deviation(&column));
                (spread > CONSTANT_TOLERANCE * center.abs().max(1.0)).then_some((center, spread))
            })
            .collect();
        let active: Vec<usize> = (0..width).filter(|&j| scales[j].is_some()).collect();

        let mut design: Vec<Vec<f64>> = features
            .iter()
            .map(|row| {
                let mut z = Vec::with_capacity(active.len() + 1);
                z.push(1.0);
                z.extend(active.iter().filter_map(|&j| {
                    scales[j].map(|(center, spread)| (row[j] - center) / spread)
                }));
                z
            })
            .collect();
        let mut y = targets.to_vec();

        if self.alpha > 0.0 {
            let penalty = self.alpha.sqrt();
            for p in 0..active.len() {
                let mut row = vec![0.0; active.len() + 1];
                row[p + 1] = penalty;
                design.push(row);
                y.push(0.0);
            }
        }

        let fit = ols_fit(&design, &y)?;

        let mut weights = vec![0.0; width];
        let mut intercept = fit.coefficients[0];
        for (p, &j) in active.iter().enumerate() {
            if let Some((center, spread)) = scales[j] {
                weights[j] = fit.coefficients[p + 1] / spread;
                intercept -= weights[j] * center;
            }
        }

        Ok(LinearModel { intercept, weights })
    }

    fn name(&self) -> &str {
        if self.alpha > 0.0 {
            "Ridge"
        } else {
            "LinearRegression"
        }
    }
}

/// A fitted linear model `y = intercept + w'x`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    intercept: f64,
    weights: Vec<f64>,
}

impl LinearModel {
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Weights on the original feature scale.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl Predictor for LinearModel {
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        check_width(features, self.weights.len())?;
        Ok(features
            .iter()
            .map(|row| {
                self.intercept
                    + row
                        .iter()
                        .zip(&self.weights)
                        .map(|(x, w)| x * w)
                        .sum::<f64>()
            })
            .collect())
    }
}
