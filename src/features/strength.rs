//! Trend and seasonal strength from an additive STL decomposition.
//!
//! Both measures follow Wang, Smith & Hyndman (2006):
//! `max(0, 1 - var(remainder) / var(remainder + component))`.

use crate::seasonality::STL;

/// Trend and seasonal strength computed from a single decomposition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecompositionStrengths {
    /// Strength of the trend component in [0, 1].
    pub trend: f64,
    /// Strength of the seasonal component in [0, 1].
    pub seasonal: f64,
}

impl DecompositionStrengths {
    const UNDEFINED: Self = Self {
        trend: f64::NAN,
        seasonal: f64::NAN,
    };
}

/// Decompose `series` once and return both strengths.
///
/// NaN for both when the series is shorter than one cycle, the period is
/// below 2, or the series contains non-finite values.
pub fn decomposition_strengths(series: &[f64], period: usize) -> DecompositionStrengths {
    if series.iter().any(|v| !v.is_finite()) {
        return DecompositionStrengths::UNDEFINED;
    }
    match STL::new(period).decompose(series) {
        Some(result) => DecompositionStrengths {
            trend: result.trend_strength(),
            seasonal: result.seasonal_strength(),
        },
        None => DecompositionStrengths::UNDEFINED,
    }
}

/// Strength of the seasonal component with the given period.
pub fn seasonal_strength(series: &[f64], period: usize) -> f64 {
    decomposition_strengths(series, period).seasonal
}

/// Strength of the trend component with the given period.
pub fn trend_strength(series: &[f64], period: usize) -> f64 {
    decomposition_strengths(series, period).trend
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn strongly_seasonal_series() {
        let series: Vec<f64> = (1..=100)
            .map(|i| 3.0 * (2.0 * PI * i as f64 / 10.0).sin())
            .collect();
        assert_relative_eq!(seasonal_strength(&series, 10), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn flat_series_has_no_seasonality() {
        assert_relative_eq!(seasonal_strength(&[0.0; 100], 10), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn linear_series_is_fully_trended() {
        let series: Vec<f64> = (0..100).map(|i| i as f64).collect();
        assert_relative_eq!(trend_strength(&series, 10), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn flat_series_has_no_trend() {
        assert_relative_eq!(trend_strength(&[0.0; 100], 10), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn strengths_agree_with_single_functions() {
        let series: Vec<f64> = (0..60)
            .map(|i| {
                0.3 * i as f64 + (2.0 * PI * i as f64 / 12.0).cos() + ((i * 7) % 5) as f64 * 0.1
            })
            .collect();
        let both = decomposition_strengths(&series, 12);
        assert_eq!(both.trend, trend_strength(&series, 12));
        assert_eq!(both.seasonal, seasonal_strength(&series, 12));
        assert!((0.0..=1.0).contains(&both.trend));
        assert!((0.0..=1.0).contains(&both.seasonal));
    }

    #[test]
    fn short_or_invalid_input_is_nan() {
        assert!(seasonal_strength(&[1.0, 2.0, 3.0], 12).is_nan());
        assert!(trend_strength(&[1.0, 2.0, 3.0], 1).is_nan());
        assert!(trend_strength(&[1.0, f64::NAN, 3.0, 4.0], 2).is_nan());
    }
}
