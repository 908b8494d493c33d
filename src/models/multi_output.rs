//! One regressor per forecast step.

use super::traits::{Predictor, Regressor};
use crate::error::{ForecastError, Result};
use crate::utils::parallel::run_with_workers;
use rayon::prelude::*;
use tracing::debug;

/// Trains an independent copy of a single-output regressor for every target
/// column.
///
/// Columns are trained in parallel on a pool of `n_jobs` threads (the global
/// rayon pool when unset); the resulting models keep the column order.
#[derive(Debug, Clone)]
pub struct MultiOutputRegressor<R> {
    regressor: R,
    n_jobs: Option<usize>,
}

impl<R: Regressor> MultiOutputRegressor<R> {
    pub fn new(regressor: R) -> Self {
        Self {
            regressor,
            n_jobs: None,
        }
    }

    /// Bound the number of training threads.
    pub fn with_n_jobs(mut self, n_jobs: usize) -> Self {
        self.n_jobs = Some(n_jobs);
        self
    }

    pub fn regressor(&self) -> &R {
        &self.regressor
    }

    pub fn n_jobs(&self) -> Option<usize> {
        self.n_jobs
    }

    /// Fit one model per column of `targets`.
    ///
    /// # Arguments
    /// * `features` - Feature rows
    /// * `targets` - Target rows, one per feature row, all of the same width
    pub fn fit(
        &self,
        features: &[Vec<f64>],
        targets: &[Vec<f64>],
    ) -> Result<MultiOutputModel<R::Model>> {
        if features.is_empty() || targets.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if features.len() != targets.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: features.len(),
                got: targets.len(),
            });
        }
        let outputs = targets[0].len();
        if outputs == 0 {
            return Err(ForecastError::InvalidParameter(
                "targets must have at least one column".to_string(),
            ));
        }
        if let Some(row) = targets.iter().find(|row| row.len() != outputs) {
            return Err(ForecastError::DimensionMismatch {
                expected: outputs,
                got: row.len(),
            });
        }

        let columns: Vec<Vec<f64>> = (0..outputs)
            .map(|step| targets.iter().map(|row| row[step]).collect())
            .collect();

        let models = run_with_workers(self.n_jobs, || {
            columns
                .into_par_iter()
                .map(|column| self.regressor.train(features, &column))
                .collect::<Result<Vec<_>>>()
        })??;

        debug!(
            outputs,
            rows = features.len(),
            regressor = self.regressor.name(),
            "trained multi-output models"
        );

        Ok(MultiOutputModel { models })
    }
}

/// Ordered per-step models.
#[derive(Debug, Clone)]
pub struct MultiOutputModel<M> {
    models: Vec<M>,
}

impl<M: Predictor> MultiOutputModel<M> {
    /// Number of outputs.
    pub fn n_outputs(&self) -> usize {
        self.models.len()
    }

    /// Model for output `step` (0-based).
    pub fn model(&self, step: usize) -> Option<&M> {
        self.models.get(step)
    }

    /// Predict one row of `n_outputs` values per feature row.
    pub fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        let mut rows = vec![Vec::with_capacity(self.models.len()); features.len()];
        for model in &self.models {
            let column = model.predict(features)?;
            if column.len() != features.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: features.len(),
                    got: column.len(),
                });
            }
            for (row, value) in rows.iter_mut().zip(column) {
                row.push(value);
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LinearRegression, MeanRegressor};
    use approx::assert_relative_eq;

    fn shifted_targets(n: usize, outputs: usize) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        let x: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64]).collect();
        let y = (0..n)
            .map(|i| (1..=outputs).map(|s| (i + s) as f64).collect())
            .collect();
        (x, y)
    }

    #[test]
    fn multi_output_trains_one_model_per_column() {
        let (x, y) = shifted_targets(20, 3);
        let model = MultiOutputRegressor::new(LinearRegression::new())
            .fit(&x, &y)
            .unwrap();

        assert_eq!(model.n_outputs(), 3);
        for step in 0..3 {
            assert_relative_eq!(
                model.model(step).unwrap().intercept(),
                (step + 1) as f64,
                epsilon = 1e-9
            );
        }

        let predicted = model.predict(&[vec![100.0], vec![0.0]]).unwrap();
        assert_eq!(predicted.len(), 2);
        assert_relative_eq!(predicted[0][0], 101.0, epsilon = 1e-8);
        assert_relative_eq!(predicted[0][2], 103.0, epsilon = 1e-8);
        assert_relative_eq!(predicted[1][1], 2.0, epsilon = 1e-8);
    }

    #[test]
    fn multi_output_bounded_pool_matches_global_pool() {
        let (x, y) = shifted_targets(15, 5);
        let global = MultiOutputRegressor::new(MeanRegressor::new())
            .fit(&x, &y)
            .unwrap();
        let bounded = MultiOutputRegressor::new(MeanRegressor::new())
            .with_n_jobs(2)
            .fit(&x, &y)
            .unwrap();
        assert_eq!(
            global.predict(&x[..1]).unwrap(),
            bounded.predict(&x[..1]).unwrap()
        );
    }

    #[test]
    fn multi_output_rejects_bad_shapes() {
        let (x, y) = shifted_targets(10, 2);
        let regressor = MultiOutputRegressor::new(MeanRegressor::new());

        assert!(matches!(
            regressor.fit(&x[..5], &y),
            Err(ForecastError::DimensionMismatch { expected: 5, got: 10 })
        ));
        assert!(matches!(regressor.fit(&[], &[]), Err(ForecastError::EmptyData)));

        let mut ragged = y.clone();
        ragged[4].push(1.0);
        assert!(matches!(
            regressor.fit(&x, &ragged),
            Err(ForecastError::DimensionMismatch { expected: 2, got: 3 })
        ));
        assert!(MultiOutputRegressor::new(MeanRegressor::new())
            .with_n_jobs(0)
            .fit(&x, &y)
            .is_err());
    }

    #[test]
    fn multi_output_propagates_regressor_errors() {
        let x = vec![vec![1.0]; 3];
        let y = vec![vec![1.0, 2.0]; 3];
        let regressor = MultiOutputRegressor::new(MeanRegressor::new().with_window(0));
        assert!(matches!(
            regressor.fit(&x, &y),
            Err(ForecastError::InvalidParameter(_))
        ));
    }
}
