//! Statistical utility functions.

use statrs::distribution::{ContinuousCDF, Normal};

/// Cumulative distribution function of the standard normal distribution.
///
/// # Example
/// ```
/// use featcast::utils::normal_cdf;
///
/// assert!((normal_cdf(1.96) - 0.975).abs() < 1e-3);
/// ```
pub fn normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    Normal::new(0.0, 1.0)
        .map(|normal| normal.cdf(x))
        .unwrap_or(f64::NAN)
}

/// Evaluate `c[0] + c[1] x + c[2] x^2 + ...` by Horner's rule.
pub fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}
