//! Joining feature and target tables into a supervised dataset.

use super::features::RollingFeatureBuilder;
use super::table::{FeatureTable, Table, TargetTable};
use super::target::build_rolling_target;
use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use tracing::debug;

/// Features and targets restricted to their common timestamps.
///
/// Both tables have identical, strictly increasing indices.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedDataset {
    features: FeatureTable,
    targets: TargetTable,
}

impl AlignedDataset {
    pub fn features(&self) -> &FeatureTable {
        &self.features
    }

    pub fn targets(&self) -> &TargetTable {
        &self.targets
    }

    /// Shared row timestamps.
    pub fn index(&self) -> &[DateTime<Utc>] {
        self.features.index()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Number of target columns.
    pub fn horizon(&self) -> usize {
        self.targets.n_columns()
    }
}

/// Keep the rows of `features` and `targets` whose timestamps appear in both.
pub fn align(features: &FeatureTable, targets: &TargetTable) -> Result<AlignedDataset> {
    let (left, right) = (features.index(), targets.index());
    let mut keep_features = Vec::new();
    let mut keep_targets = Vec::new();

    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                keep_features.push(i);
                keep_targets.push(j);
                i += 1;
                j += 1;
            }
        }
    }

    if keep_features.is_empty() {
        return Err(ForecastError::EmptyAlignment);
    }

    debug!(
        rows = keep_features.len(),
        feature_rows = features.len(),
        target_rows = targets.len(),
        "aligned features and targets"
    );

    Ok(AlignedDataset {
        features: features.select(&keep_features),
        targets: targets.select(&keep_targets),
    })
}

/// Parameters for turning a series into a rolling supervised dataset.
#[derive(Debug, Clone)]
pub struct RollingConfig {
    /// Window size of the feature statistics and seasonal-lag offset
    pub seasonal_period: usize,
    /// Number of future steps per target row
    pub horizon: usize,
    /// Number of lag / seasonal-lag pairs
    pub lags_to_consider: usize,
    /// Worker threads for window statistics (global pool when `None`)
    pub n_jobs: Option<usize>,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self {
            seasonal_period: 12,
            horizon: 1,
            lags_to_consider: 5,
            n_jobs: None,
        }
    }
}

impl RollingConfig {
    pub fn new(seasonal_period: usize, horizon: usize) -> Self {
        Self {
            seasonal_period,
            horizon,
            ..Default::default()
        }
    }

    pub fn with_seasonal_period(mut self, seasonal_period: usize) -> Self {
        self.seasonal_period = seasonal_period;
        self
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
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

    fn feature_builder(&self) -> RollingFeatureBuilder {
        let builder =
            RollingFeatureBuilder::new(self.seasonal_period).with_lags(self.lags_to_consider);
        match self.n_jobs {
            Some(n) => builder.with_n_jobs(n),
            None => builder,
        }
    }
}

/// Full feature and target tables together with their aligned join.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingDataset {
    /// Every feature row, including the most recent ones without targets
    pub features: FeatureTable,
    /// Every target row, including the earliest ones without features
    pub targets: TargetTable,
    /// Rows usable for training
    pub aligned: AlignedDataset,
    /// Timestamp of the series' most recent observation
    pub last_observed: DateTime<Utc>,
}

/// Build features, targets and their alignment for `series`.
///
/// # Errors
/// Propagates feature and target construction errors, and returns
/// [`ForecastError::EmptyAlignment`] when no row has both features and targets.
pub fn build_rolling_xy(series: &TimeSeries, config: &RollingConfig) -> Result<RollingDataset> {
    let features = config.feature_builder().build(series)?;
    let targets = build_rolling_target(series, config.horizon)?;
    let aligned = align(&features, &targets)?;
    let last_observed = series.last_timestamp().ok_or(ForecastError::EmptyData)?;
    Ok(RollingDataset {
        features,
        targets,
        aligned,
        last_observed,
    })
}
