//! Feature-based multi-step forecasting estimator.

use super::multi_output::{MultiOutputModel, MultiOutputRegressor};
use super::traits::Regressor;
use crate::core::{Forecast, Frequency, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::preprocessing::{
    build_rolling_xy, feature_names, AlignedDataset, FeatureTable, RollingConfig, RollingDataset,
};
use crate::utils::cross_validation::{ValidationReport, WalkForwardValidator};
use crate::utils::metrics::Metric;
use tracing::{info, warn};

/// Configuration of a [`FeatureBasedEstimator`].
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    /// Number of future steps forecast at once
    pub horizon: usize,
    /// Window size of the rolling features
    pub seasonal_period: usize,
    /// Spacing of forecast timestamps
    pub frequency: Frequency,
    /// Number of lag / seasonal-lag pairs
    pub lags_to_consider: usize,
    /// Worker threads for feature extraction and training
    pub n_jobs: Option<usize>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            horizon: 1,
            seasonal_period: 12,
            frequency: Frequency::Daily,
            lags_to_consider: 5,
            n_jobs: None,
        }
    }
}

impl EstimatorConfig {
    pub fn new(horizon: usize, seasonal_period: usize, frequency: Frequency) -> Self {
        Self {
            horizon,
            seasonal_period,
            frequency,
            ..Default::default()
        }
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_seasonal_period(mut self, seasonal_period: usize) -> Self {
        self.seasonal_period = seasonal_period;
        self
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_lags(mut self, lags_to_consider: usize) -> Self {
        self.lags_to_consider = lags_to_consider;
        self
    }

    pub fn with_n_jobs(mut self, n_jobs: usize) -> Self {
        self.n_jobs = Some(n_jobs);
        self
    }

    /// Dataset parameters matching this configuration.
    pub fn rolling_config(&self) -> RollingConfig {
        RollingConfig {
            seasonal_period: self.seasonal_period,
            horizon: self.horizon,
            lags_to_consider: self.lags_to_consider,
            n_jobs: self.n_jobs,
        }
    }
}

struct FittedState<M> {
    dataset: RollingDataset,
    model: MultiOutputModel<M>,
}

enum EstimatorState<M> {
    Unfitted,
    Fitted(Box<FittedState<M>>),
}

/// Forecasts the next `horizon` values of a series from rolling-window
/// statistics of its recent past.
///
/// One copy of the base regressor is trained per forecast step. Refitting
/// replaces the fitted state; a failed fit leaves the previous state intact.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use featcast::core::{Frequency, TimeSeries};
/// use featcast::models::{EstimatorConfig, FeatureBasedEstimator, LinearRegression};
///
/// let values: Vec<f64> = (0..120)
///     .map(|i| {
///         100.0
///             + 0.5 * i as f64
///             + 8.0 * (i as f64 * std::f64::consts::PI / 6.0).sin()
///             + ((i * 17) % 7) as f64 * 0.3
///     })
///     .collect();
/// let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
/// let series = TimeSeries::from_values(start, Frequency::Monthly, values).unwrap();
///
/// let config = EstimatorConfig::new(3, 12, Frequency::Monthly).with_lags(2);
/// let mut estimator =
///     FeatureBasedEstimator::new(LinearRegression::ridge(1.0).unwrap(), config);
/// estimator.preprocess_and_fit(&series).unwrap();
///
/// let forecast = estimator.forecast().unwrap();
/// assert_eq!(forecast.horizon(), 3);
/// ```
pub struct FeatureBasedEstimator<R: Regressor> {
    regressor: MultiOutputRegressor<R>,
    config: EstimatorConfig,
    state: EstimatorState<R::Model>,
}

impl<R: Regressor> FeatureBasedEstimator<R> {
    pub fn new(regressor: R, config: EstimatorConfig) -> Self {
        let regressor = match config.n_jobs {
            Some(n) => MultiOutputRegressor::new(regressor).with_n_jobs(n),
            None => MultiOutputRegressor::new(regressor),
        };
        Self {
            regressor,
            config,
            state: EstimatorState::Unfitted,
        }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn horizon(&self) -> usize {
        self.config.horizon
    }

    pub fn seasonal_period(&self) -> usize {
        self.config.seasonal_period
    }

    pub fn frequency(&self) -> Frequency {
        self.config.frequency
    }

    pub fn lags_to_consider(&self) -> usize {
        self.config.lags_to_consider
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self.state, EstimatorState::Fitted(_))
    }

    /// Train the per-step models on a prepared dataset.
    pub fn fit(&mut self, dataset: RollingDataset) -> Result<()> {
        let expected = feature_names(self.config.seasonal_period, self.config.lags_to_consider);
        if dataset.features.columns() != expected.as_slice()
            || dataset.aligned.features().columns() != expected.as_slice()
        {
            return Err(ForecastError::InvalidParameter(format!(
                "feature columns do not match seasonal_period = {} and lags_to_consider = {}",
                self.config.seasonal_period, self.config.lags_to_consider
            )));
        }
        if dataset.aligned.horizon() != self.config.horizon {
            return Err(ForecastError::DimensionMismatch {
                expected: self.config.horizon,
                got: dataset.aligned.horizon(),
            });
        }
        if dataset.aligned.is_empty() {
            return Err(ForecastError::EmptyData);
        }

        let model = self.regressor.fit(
            dataset.aligned.features().rows(),
            dataset.aligned.targets().rows(),
        )?;

        info!(
            horizon = self.config.horizon,
            rows = dataset.aligned.len(),
            regressor = self.regressor.regressor().name(),
            "fitted feature-based estimator"
        );

        self.state = EstimatorState::Fitted(Box::new(FittedState { dataset, model }));
        Ok(())
    }

    /// Build the rolling dataset for `series` and fit on it.
    pub fn preprocess_and_fit(&mut self, series: &TimeSeries) -> Result<()> {
        let dataset = build_rolling_xy(series, &self.config.rolling_config())?;
        self.fit(dataset)
    }

    /// Forecast the `horizon` steps following the last observation.
    ///
    /// # Errors
    /// [`ForecastError::StaleFeatures`] when the feature row of the last
    /// observation was dropped (for example a constant final window), since
    /// the newest remaining row would forecast already observed timestamps.
    pub fn forecast(&self) -> Result<Forecast> {
        let fitted = self.fitted()?;
        let (last, row) = fitted
            .dataset
            .features
            .last_row()
            .ok_or(ForecastError::EmptyData)?;
        let last_observed = fitted.dataset.last_observed;
        if last != last_observed {
            warn!(
                last_feature = %last,
                last_observed = %last_observed,
                "no feature row for the last observation, refusing to forecast"
            );
            return Err(ForecastError::StaleFeatures {
                last_feature: last,
                last_observed,
            });
        }

        let values = fitted
            .model
            .predict(&[row.to_vec()])?
            .pop()
            .ok_or_else(|| ForecastError::ComputationError("no prediction returned".to_string()))?;
        let timestamps = self.config.frequency.range_after(last, self.config.horizon)?;

        Forecast::new(timestamps, values)
    }

    /// Predict `horizon` values for each feature row.
    pub fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        self.fitted()?.model.predict(features)
    }

    /// Every feature row computed at fit time.
    pub fn rolling_features(&self) -> Result<&FeatureTable> {
        Ok(&self.fitted()?.dataset.features)
    }

    /// The dataset the estimator was fitted on.
    pub fn dataset(&self) -> Result<&RollingDataset> {
        Ok(&self.fitted()?.dataset)
    }

    /// Walk-forward validation on the fitted dataset.
    ///
    /// Each fold trains fresh models; the fitted state is left untouched.
    pub fn sequential_validation(&self, cv: usize, metric: &Metric) -> Result<ValidationReport> {
        let aligned: &AlignedDataset = &self.fitted()?.dataset.aligned;
        let validator = WalkForwardValidator::new(cv, self.config.seasonal_period)?
            .with_horizon(self.config.horizon);
        let report = validator.validate(&self.regressor, aligned, metric)?;

        info!(
            folds = report.len(),
            metric = report.metric_name(),
            mean_score = report.mean_score(),
            "sequential validation finished"
        );

        Ok(report)
    }

    fn fitted(&self) -> Result<&FittedState<R::Model>> {
        match &self.state {
            EstimatorState::Fitted(state) => Ok(state.as_ref()),
            EstimatorState::Unfitted => Err(ForecastError::FitRequired),
        }
    }
}
