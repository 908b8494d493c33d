//! Walk-forward validation for multi-step estimators.

use crate::error::{ForecastError, Result};
use crate::models::{MultiOutputRegressor, Regressor};
use crate::preprocessing::AlignedDataset;
use crate::utils::metrics::Metric;
use std::ops::Range;
use tracing::debug;

/// Nested, past-only training folds over an aligned dataset.
///
/// With `rows` aligned rows, a reserved tail of `r = max(sp, horizon)` rows
/// and `split = rows / (cv + 1)`, fold `i` (`1..=cv`) trains on rows
/// `rows - r - i * split .. rows - r`. Every fold is scored on the targets of
/// the last row. A training row carries the next `horizon` values as targets,
/// so ending the folds `horizon` rows early keeps the scored values out of
/// training.
#[derive(Debug, Clone, Copy)]
pub struct WalkForwardValidator {
    cv: usize,
    seasonal_period: usize,
    horizon: usize,
}

impl WalkForwardValidator {
    /// Create a validator with `cv` folds.
    pub fn new(cv: usize, seasonal_period: usize) -> Result<Self> {
        if cv == 0 {
            return Err(ForecastError::InvalidParameter(
                "cv must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            cv,
            seasonal_period,
            horizon: 1,
        })
    }

    /// Set the number of target steps per row (1 by default).
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn cv(&self) -> usize {
        self.cv
    }

    pub fn seasonal_period(&self) -> usize {
        self.seasonal_period
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Rows at the end of the dataset that no fold trains on.
    pub fn reserved(&self) -> usize {
        self.seasonal_period.max(self.horizon)
    }

    /// Training row ranges for a dataset of `rows` rows, shortest first.
    ///
    /// # Errors
    /// [`ForecastError::InsufficientData`] when the folds would be empty or
    /// would not fit before the reserved tail.
    pub fn splits(&self, rows: usize) -> Result<Vec<Range<usize>>> {
        let reserved = self.reserved();
        let split = rows / (self.cv + 1);
        let needed = (self.cv * split.max(1) + reserved).max(self.cv + 1);
        if split == 0 || needed > rows {
            return Err(ForecastError::InsufficientData { needed, got: rows });
        }
        let end = rows - reserved;
        Ok((1..=self.cv).map(|i| end - i * split..end).collect())
    }

    /// Train a fresh multi-output model per fold and score its forecast for
    /// the last aligned row.
    ///
    /// The models predict the last `seasonal_period` feature rows; the
    /// prediction for the final row is compared with its targets.
    ///
    /// # Errors
    /// [`ForecastError::DimensionMismatch`] when the dataset's target width
    /// differs from the validator's horizon.
    pub fn validate<R: Regressor>(
        &self,
        regressor: &MultiOutputRegressor<R>,
        dataset: &AlignedDataset,
        metric: &Metric,
    ) -> Result<ValidationReport> {
        let features = dataset.features().rows();
        let targets = dataset.targets().rows();
        if dataset.horizon() != self.horizon {
            return Err(ForecastError::DimensionMismatch {
                expected: self.horizon,
                got: dataset.horizon(),
            });
        }
        let rows = dataset.len();
        let folds = self.splits(rows)?;

        let holdout = &features[rows.saturating_sub(self.seasonal_period.max(1))..];
        let actual = targets.last().ok_or(ForecastError::EmptyData)?;

        let mut entries = Vec::with_capacity(folds.len());
        for fold in folds {
            let train_x = features[fold.clone()].to_vec();
            let train_y = targets[fold.clone()].to_vec();
            let model = regressor.fit(&train_x, &train_y)?;

            let predicted = model.predict(holdout)?;
            let last = predicted.last().ok_or(ForecastError::EmptyData)?;
            let score = metric.score(actual, last);

            debug!(train_rows = fold.len(), score, metric = metric.name(), "scored fold");
            entries.push((fold.len(), score));
        }

        Ok(ValidationReport {
            metric_name: metric.name().to_string(),
            entries,
        })
    }
}

/// Out-of-sample scores keyed by training-set size, in fold order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    metric_name: String,
    entries: Vec<(usize, f64)>,
}

impl ValidationReport {
    pub fn metric_name(&self) -> &str {
        &self.metric_name
    }

    /// `(training rows, score)` pairs with strictly increasing training rows.
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Score of the fold trained on `train_rows` rows.
    pub fn get(&self, train_rows: usize) -> Option<f64> {
        self.entries
            .iter()
            .find(|(rows, _)| *rows == train_rows)
            .map(|(_, score)| *score)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mean score over folds (NaN when empty).
    pub fn mean_score(&self) -> f64 {
        if self.entries.is_empty() {
            return f64::NAN;
        }
        self.entries.iter().map(|(_, s)| s).sum::<f64>() / self.entries.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LinearRegression, MeanRegressor};
    use crate::preprocessing::{align, Table};
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};

    fn dataset(rows: usize, horizon: usize) -> AlignedDataset {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let index: Vec<_> = (0..rows).map(|i| base + Duration::days(i as i64)).collect();
        let features = Table::new(
            index.clone(),
            vec!["x".to_string()],
            (0..rows).map(|i| vec![i as f64]).collect(),
        )
        .unwrap();
        let targets = Table::new(
            index,
            (1..=horizon).map(|s| format!("t+{}", s)).collect(),
            (0..rows)
                .map(|i| (1..=horizon).map(|s| 2.0 * (i + s) as f64).collect())
                .collect(),
        )
        .unwrap();
        align(&features, &targets).unwrap()
    }

    #[test]
    fn splits_are_nested_and_past_only() {
        let validator = WalkForwardValidator::new(3, 5).unwrap();
        let folds = validator.splits(40).unwrap();

        assert_eq!(folds, vec![25..35, 15..35, 5..35]);
        assert!(folds.windows(2).all(|w| w[1].start < w[0].start && w[1].end == w[0].end));
    }

    #[test]
    fn splits_require_room_for_all_folds() {
        let validator = WalkForwardValidator::new(5, 10).unwrap();
        // split = 3, 5 * 3 + 10 = 25 > 20
        assert!(matches!(
            validator.splits(20),
            Err(ForecastError::InsufficientData { got: 20, .. })
        ));
        assert!(validator.splits(3).is_err());
        assert!(WalkForwardValidator::new(0, 10).is_err());
    }

    #[test]
    fn long_horizon_extends_reserved_tail() {
        let validator = WalkForwardValidator::new(3, 5).unwrap().with_horizon(8);
        assert_eq!(validator.reserved(), 8);
        assert_eq!(validator.splits(40).unwrap(), vec![22..32, 12..32, 2..32]);

        // 3 * 10 + 12 = 42 > 40
        let validator = validator.with_horizon(12);
        assert!(matches!(
            validator.splits(40),
            Err(ForecastError::InsufficientData { needed: 42, got: 40 })
        ));
    }

    #[test]
    fn scored_targets_never_reach_training_rows() {
        let data = dataset(60, 8);
        let validator = WalkForwardValidator::new(3, 4).unwrap().with_horizon(8);
        let actual = data.targets().rows().last().unwrap();

        for fold in validator.splits(data.len()).unwrap() {
            assert!(fold.end + 8 <= data.len());
            let mut trained = data.targets().rows()[fold].iter().flatten();
            assert!(trained.all(|v| !actual.contains(v)));
        }

        let regressor = MultiOutputRegressor::new(LinearRegression::new());
        let report = validator.validate(&regressor, &data, &Metric::mae()).unwrap();
        assert_eq!(report.len(), 3);
        let single_step = WalkForwardValidator::new(3, 4).unwrap();
        assert!(matches!(
            single_step.validate(&regressor, &data, &Metric::mae()),
            Err(ForecastError::DimensionMismatch { expected: 1, got: 8 })
        ));
    }

    #[test]
    fn validate_scores_each_fold() {
        let data = dataset(60, 3);
        let validator = WalkForwardValidator::new(5, 4).unwrap().with_horizon(3);
        let regressor = MultiOutputRegressor::new(LinearRegression::new());

        let report = validator.validate(&regressor, &data, &Metric::mae()).unwrap();

        assert_eq!(report.metric_name(), "mae");
        let keys: Vec<usize> = report.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![10, 20, 30, 40, 50]);
        // Targets are an exact linear function of the feature.
        for (_, score) in report.iter() {
            assert_relative_eq!(score, 0.0, epsilon = 1e-8);
        }
        assert_eq!(report.get(30), report.entries().get(2).map(|e| e.1));
        assert_eq!(report.get(31), None);
    }

    #[test]
    fn validate_with_baseline_has_positive_error() {
        let data = dataset(60, 2);
        let validator = WalkForwardValidator::new(2, 6).unwrap().with_horizon(2);
        let regressor = MultiOutputRegressor::new(MeanRegressor::new());

        let report = validator.validate(&regressor, &data, &Metric::mae()).unwrap();

        assert_eq!(report.len(), 2);
        // Longer history pulls the mean further from the recent targets.
        let scores: Vec<f64> = report.iter().map(|(_, s)| s).collect();
        assert!(scores[0] > 0.0);
        assert!(scores[1] > scores[0]);
        assert_relative_eq!(
            report.mean_score(),
            (scores[0] + scores[1]) / 2.0,
            epsilon = 1e-12
        );
    }
}
