//! Basic statistical features for time series windows.
//!
//! Location and dispersion summaries: mean, median, quartiles and standard deviation.

use std::cmp::Ordering;

/// Returns the arithmetic mean.
pub fn mean(series: &[f64]) -> f64 {
    if series.is_empty() {
        return f64::NAN;
    }
    series.iter().sum::<f64>() / series.len() as f64
}

/// Returns the median value.
pub fn median(series: &[f64]) -> f64 {
    quantile(series, 0.5)
}

/// Returns the population variance (with n denominator).
pub fn variance(series: &[f64]) -> f64 {
    if series.is_empty() {
        return f64::NAN;
    }
    let m = mean(series);
    series.iter().map(|x| (x - m).powi(2)).sum::<f64>() / series.len() as f64
}

/// Returns the population standard deviation.
pub fn standard_deviation(series: &[f64]) -> f64 {
    variance(series).sqrt()
}

/// Returns the q-th quantile using linear interpolation between order statistics.
///
/// # Arguments
/// * `series` - Input time series
/// * `q` - Quantile in [0, 1]
///
/// # Returns
/// The interpolated value at position `q * (n - 1)` of the sorted series,
/// or NaN for empty input or `q` outside [0, 1].
pub fn quantile(series: &[f64], q: f64) -> f64 {
    if series.is_empty() || !(0.0..=1.0).contains(&q) {
        return f64::NAN;
    }
    let mut sorted = series.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}
