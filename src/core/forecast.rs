//! Forecast result structure for holding timestamped predictions.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};

/// A multi-step forecast: one predicted value per future timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl Forecast {
    /// Create a forecast from aligned timestamps and point predictions.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }
        Ok(Self { timestamps, values })
    }

    /// Get the forecast horizon (number of steps).
    pub fn horizon(&self) -> usize {
        self.values.len()
    }

    /// Check if forecast is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Future timestamps, one per step.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Point predictions, one per step.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over `(timestamp, value)` rows.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }
}
