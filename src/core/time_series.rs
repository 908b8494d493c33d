//! TimeSeries data structure for a single observed variable.

use super::Frequency;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Policy for handling missing values (NaN/Inf).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MissingValuePolicy {
    /// Drop observations with missing values.
    Drop,
    /// Fill with a specific value.
    Fill(f64),
    /// Forward fill (use previous valid value).
    ForwardFill,
    /// Return error if missing values found.
    Error,
}

/// A univariate time series with strictly increasing timestamps.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    frequency: Option<Frequency>,
}

impl TimeSeries {
    /// Create a series from aligned timestamps and values.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if values.len() != timestamps.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }

        // Validate timestamps are strictly increasing
        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(ForecastError::TimestampError(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }

        Ok(Self {
            timestamps,
            values,
            frequency: None,
        })
    }

    /// Create a regularly spaced series starting at `start`.
    pub fn from_values(
        start: DateTime<Utc>,
        frequency: Frequency,
        values: Vec<f64>,
    ) -> Result<Self> {
        let mut timestamps = Vec::with_capacity(values.len());
        if !values.is_empty() {
            timestamps.push(start);
            timestamps.extend(frequency.range_after(start, values.len() - 1)?);
        }
        let mut series = Self::new(timestamps, values)?;
        series.frequency = Some(frequency);
        Ok(series)
    }

    /// Attach a nominal frequency.
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Get timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Get values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the nominal frequency, if known.
    pub fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    /// Timestamp of the most recent observation.
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    /// Extract a slice of the time series.
    pub fn slice(&self, start: usize, end: usize) -> Result<TimeSeries> {
        if start > end {
            return Err(ForecastError::InvalidParameter(
                "start must be <= end".to_string(),
            ));
        }
        if end > self.len() {
            return Err(ForecastError::IndexOutOfBounds {
                index: end,
                size: self.len(),
            });
        }

        Ok(TimeSeries {
            timestamps: self.timestamps[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
            frequency: self.frequency,
        })
    }

    /// Check if series has missing values (NaN or Inf).
    pub fn has_missing_values(&self) -> bool {
        self.values.iter().any(|v| !v.is_finite())
    }

    /// Return a sanitized copy with missing values handled.
    pub fn sanitized(&self, policy: MissingValuePolicy) -> Result<TimeSeries> {
        match policy {
            MissingValuePolicy::Error => {
                if self.has_missing_values() {
                    return Err(ForecastError::MissingValues);
                }
                Ok(self.clone())
            }
            MissingValuePolicy::Drop => {
                let (timestamps, values) = self
                    .timestamps
                    .iter()
                    .zip(self.values.iter())
                    .filter(|(_, v)| v.is_finite())
                    .map(|(t, v)| (*t, *v))
                    .unzip();
                Ok(TimeSeries {
                    timestamps,
                    values,
                    frequency: self.frequency,
                })
            }
            MissingValuePolicy::Fill(fill_value) => Ok(TimeSeries {
                timestamps: self.timestamps.clone(),
                values: self
                    .values
                    .iter()
                    .map(|&v| if v.is_finite() { v } else { fill_value })
                    .collect(),
                frequency: self.frequency,
            }),
            MissingValuePolicy::ForwardFill => {
                let mut last_valid = None;
                let values = self
                    .values
                    .iter()
                    .map(|&v| {
                        if v.is_finite() {
                            last_valid = Some(v);
                            v
                        } else {
                            last_valid.unwrap_or(v)
                        }
                    })
                    .collect();
                Ok(TimeSeries {
                    timestamps: self.timestamps.clone(),
                    values,
                    frequency: self.frequency,
                })
            }
        }
    }

    /// Infer the modal spacing between timestamps.
    ///
    /// `tolerance` is the minimum share of gaps that must equal the modal gap.
    pub fn infer_frequency(&self, tolerance: f64) -> Result<Frequency> {
        if self.len() < 2 {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: self.len(),
            });
        }

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for w in self.timestamps.windows(2) {
            *counts.entry((w[1] - w[0]).num_seconds()).or_insert(0) += 1;
        }

        let (modal_diff, modal_count) = counts
            .iter()
            .max_by_key(|(&diff, &count)| (count, -diff))
            .map(|(&diff, &count)| (diff, count))
            .ok_or(ForecastError::FrequencyInference(
                "empty spacing data".to_string(),
            ))?;

        let modal_ratio = modal_count as f64 / (self.len() - 1) as f64;
        if modal_ratio < tolerance {
            return Err(ForecastError::FrequencyInference(
                "no unique modal spacing found".to_string(),
            ));
        }

        Ok(Frequency::from(Duration::seconds(modal_diff)))
    }

    /// Set frequency from timestamps (auto-infer).
    pub fn set_frequency_from_timestamps(&mut self) -> Result<()> {
        self.frequency = Some(self.infer_frequency(0.5)?);
        Ok(())
    }
}
