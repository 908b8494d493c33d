//! Shape descriptors: spikiness, lumpiness and curvature.

use super::basic::{mean, median, variance};

/// Returns the share of values strictly greater than the window median.
///
/// Always in [0, 1]; 0 for a constant window.
pub fn spikiness(series: &[f64]) -> f64 {
    if series.is_empty() {
        return f64::NAN;
    }
    let m = median(series);
    series.iter().filter(|&&x| x > m).count() as f64 / series.len() as f64
}

/// Returns the variance divided by the squared mean.
///
/// Not finite when the mean is zero; callers treat that as a missing value.
pub fn lumpiness(series: &[f64]) -> f64 {
    variance(series) / mean(series).powi(2)
}

/// Returns the mean of the second discrete difference.
///
/// Positive values indicate a convex shape, negative values a concave one.
pub fn curvature(series: &[f64]) -> f64 {
    if series.len() < 3 {
        return f64::NAN;
    }
    let second_diffs: Vec<f64> = series
        .windows(3)
        .map(|w| w[2] - 2.0 * w[1] + w[0])
        .filter(|d| d.is_finite())
        .collect();
    mean(&second_diffs)
}
