//! Nominal sampling frequency of a time series.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Months, Utc};
use std::fmt;
use std::str::FromStr;

/// Nominal spacing between consecutive observations.
///
/// Fixed-length frequencies advance by a [`Duration`]; `Monthly` advances by
/// calendar months so that forecasts stay aligned with month boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Frequency {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Weekly,
    Monthly,
    /// Arbitrary fixed spacing.
    Every(Duration),
}

impl Frequency {
    /// Fixed step length, or `None` for calendar-based frequencies.
    pub fn step(&self) -> Option<Duration> {
        match self {
            Frequency::Minutely => Some(Duration::minutes(1)),
            Frequency::Hourly => Some(Duration::hours(1)),
            Frequency::Daily => Some(Duration::days(1)),
            Frequency::Weekly => Some(Duration::weeks(1)),
            Frequency::Monthly => None,
            Frequency::Every(d) => Some(*d),
        }
    }

    /// Move `timestamp` forward by `steps` periods.
    pub fn advance(&self, timestamp: DateTime<Utc>, steps: u32) -> Result<DateTime<Utc>> {
        let next = match self {
            Frequency::Monthly => timestamp.checked_add_months(Months::new(steps)),
            _ => {
                let step = self.step().unwrap_or_else(Duration::zero);
                step.num_milliseconds()
                    .checked_mul(i64::from(steps))
                    .map(Duration::milliseconds)
                    .and_then(|offset| timestamp.checked_add_signed(offset))
            }
        };
        next.ok_or_else(|| {
            ForecastError::TimestampError(format!(
                "cannot advance {} by {} steps of {}",
                timestamp, steps, self
            ))
        })
    }

    /// The `periods` timestamps strictly following `last`.
    pub fn range_after(&self, last: DateTime<Utc>, periods: usize) -> Result<Vec<DateTime<Utc>>> {
        if let Some(step) = self.step() {
            if step <= Duration::zero() {
                return Err(ForecastError::InvalidParameter(
                    "frequency step must be positive".to_string(),
                ));
            }
        }
        (1..=periods)
            .map(|k| self.advance(last, k as u32))
            .collect()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Minutely => write!(f, "min"),
            Frequency::Hourly => write!(f, "H"),
            Frequency::Daily => write!(f, "D"),
            Frequency::Weekly => write!(f, "W"),
            Frequency::Monthly => write!(f, "MS"),
            Frequency::Every(d) => write!(f, "{}s", d.num_seconds()),
        }
    }
}

impl FromStr for Frequency {
    type Err = ForecastError;

    /// Parse pandas-style offset aliases.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "min" | "T" => Ok(Frequency::Minutely),
            "H" | "h" => Ok(Frequency::Hourly),
            "D" | "d" => Ok(Frequency::Daily),
            "W" | "w" => Ok(Frequency::Weekly),
            "M" | "MS" => Ok(Frequency::Monthly),
            other => Err(ForecastError::FrequencyInference(format!(
                "unknown frequency alias '{}'",
                other
            ))),
        }
    }
}

impl From<Duration> for Frequency {
    fn from(step: Duration) -> Self {
        if step == Duration::minutes(1) {
            Frequency::Minutely
        } else if step == Duration::hours(1) {
            Frequency::Hourly
        } else if step == Duration::days(1) {
            Frequency::Daily
        } else if step == Duration::weeks(1) {
            Frequency::Weekly
        } else {
            Frequency::Every(step)
        }
    }
}
