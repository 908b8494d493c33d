//! Autocorrelation-based features for time series.
//!
//! Both vectors cover lags `1 ..= seasonal_period + 5`.

use super::basic::mean;

/// Number of lags beyond the seasonal period included in the vectors.
pub const EXTRA_LAGS: usize = 5;

/// Returns the sample autocorrelation at a specific lag.
///
/// Uses the biased estimator (denominator over the full series), which keeps
/// every value in [-1, 1]. A constant series yields 0; lags at or beyond the
/// series length yield NaN.
pub fn autocorrelation_at(series: &[f64], lag: usize) -> f64 {
    if series.len() <= lag {
        return f64::NAN;
    }

    let m = mean(series);

    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for (i, &x) in series.iter().enumerate() {
        denominator += (x - m).powi(2);
        if i >= lag {
            numerator += (x - m) * (series[i - lag] - m);
        }
    }

    if denominator < 1e-10 {
        return 0.0;
    }

    numerator / denominator
}

/// Autocorrelation vector for lags `1 ..= seasonal_period + 5`.
pub fn autocorrelation(series: &[f64], seasonal_period: usize) -> Vec<f64> {
    (1..=seasonal_period + EXTRA_LAGS)
        .map(|lag| autocorrelation_at(series, lag))
        .collect()
}

/// Partial autocorrelation vector for lags `1 ..= seasonal_period + 5`.
///
/// Uses the Durbin-Levinson recursion on the biased autocorrelations. Once
/// the recursion degenerates (singular prediction error, or a lag at or
/// beyond the series length) the remaining lags are NaN.
pub fn partial_autocorrelation(series: &[f64], seasonal_period: usize) -> Vec<f64> {
    let max_lag = seasonal_period + EXTRA_LAGS;
    let mut result = vec![f64::NAN; max_lag];

    let acf: Vec<f64> = (0..=max_lag).map(|k| autocorrelation_at(series, k)).collect();
    if acf.len() < 2 || acf[1].is_nan() {
        return result;
    }

    let mut phi_prev = vec![acf[1]];
    result[0] = acf[1];

    for k in 2..=max_lag {
        if acf[k].is_nan() {
            break;
        }

        let mut num = acf[k];
        let mut denom = 1.0;
        for j in 1..k {
            num -= phi_prev[j - 1] * acf[k - j];
            denom -= phi_prev[j - 1] * acf[j];
        }

        if denom.abs() < 1e-10 {
            break;
        }

        let phi_kk = num / denom;
        let mut phi = Vec::with_capacity(k);
        for j in 1..k {
            phi.push(phi_prev[j - 1] - phi_kk * phi_prev[k - j - 1]);
        }
        phi.push(phi_kk);

        result[k - 1] = phi_kk;
        phi_prev = phi;
    }

    result
}
