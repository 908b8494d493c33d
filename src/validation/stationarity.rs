//! Augmented Dickey-Fuller unit-root test.
//!
//! Regression with a constant:
//! `Δy_t = α + β y_{t-1} + Σ γ_i Δy_{t-i} + ε_t`, lag order chosen by AIC.
//! The null hypothesis is a unit root (β = 0); small p-values indicate a
//! stationary series.

use crate::utils::ols::{nested_ssr, ols_fit};
use crate::utils::stats::{normal_cdf, polyval};

/// Result of a stationarity test.
#[derive(Debug, Clone)]
pub struct StationarityResult {
    /// Test statistic
    pub statistic: f64,
    /// P-value (MacKinnon approximation)
    pub p_value: f64,
    /// Number of lagged differences used
    pub lags: usize,
    /// Number of observations in the final regression
    pub nobs: usize,
    /// Whether the unit root is rejected at the 5% level
    pub is_stationary: bool,
    /// Critical values at common significance levels
    pub critical_values: CriticalValues,
}

impl StationarityResult {
    fn undefined(lags: usize, nobs: usize) -> Self {
        Self {
            statistic: f64::NAN,
            p_value: f64::NAN,
            lags,
            nobs,
            is_stationary: false,
            critical_values: CriticalValues::default(),
        }
    }
}

/// Critical values for stationarity tests.
#[derive(Debug, Clone, Default)]
pub struct CriticalValues {
    /// Critical value at 1% significance
    pub cv_1pct: f64,
    /// Critical value at 5% significance
    pub cv_5pct: f64,
    /// Critical value at 10% significance
    pub cv_10pct: f64,
}

impl CriticalValues {
    /// MacKinnon (2010) finite-sample critical values, constant only.
    fn constant_only(nobs: usize) -> Self {
        let at = |c: [f64; 4]| polyval(&c, 1.0 / nobs as f64);
        Self {
            cv_1pct: at([-3.43035, -6.5393, -16.786, -79.433]),
            cv_5pct: at([-2.86154, -2.8903, -4.234, -40.040]),
            cv_10pct: at([-2.56677, -1.5384, -2.809, 0.0]),
        }
    }
}

// MacKinnon (1994) response surface for the constant-only case.
const TAU_MAX: f64 = 2.74;
const TAU_MIN: f64 = -18.83;
const TAU_STAR: f64 = -1.61;
const TAU_SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
const TAU_LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

/// Default maximum lag: `ceil(12 (n / 100)^(1/4))`, capped at `n / 2 - 2`.
pub fn default_max_lag(n: usize) -> Option<usize> {
    let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    (n / 2).checked_sub(2).map(|cap| cap.min(schwert))
}

/// Augmented Dickey-Fuller test for unit root (non-stationarity).
///
/// Tests null hypothesis that series has a unit root (non-stationary).
/// Rejection implies stationarity.
///
/// The lag order minimises AIC over `0..=max_lag` on a common sample; the
/// statistic is the t-value of the lagged level in the regression re-run on
/// the full sample available to that lag.
///
/// # Arguments
/// * `series` - Time series data
/// * `max_lags` - Maximum lags to include (default: [`default_max_lag`])
///
/// # Returns
/// `StationarityResult` with test statistic and p-value; NaN fields when the
/// series is too short or degenerate (e.g. constant).
pub fn adf_test(series: &[f64], max_lags: Option<usize>) -> StationarityResult {
    let n = series.len();
    let Some(default_lag) = default_max_lag(n) else {
        return StationarityResult::undefined(0, 0);
    };
    if series.iter().any(|v| !v.is_finite()) {
        return StationarityResult::undefined(0, 0);
    }
    let max_lag = max_lags.map_or(default_lag, |m| m.min(default_lag));

    let diff: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();

    let best_lag = select_lag_aic(series, &diff, max_lag);

    let (design, target) = adf_design(series, &diff, best_lag, best_lag);
    let Ok(fit) = ols_fit(&design, &target) else {
        return StationarityResult::undefined(best_lag, target.len());
    };

    let statistic = fit.t_value(1);
    if !statistic.is_finite() {
        return StationarityResult::undefined(best_lag, fit.nobs);
    }

    let critical_values = CriticalValues::constant_only(fit.nobs);
    let is_stationary = statistic < critical_values.cv_5pct;

    StationarityResult {
        statistic,
        p_value: mackinnon_pvalue(statistic),
        lags: best_lag,
        nobs: fit.nobs,
        is_stationary,
        critical_values,
    }
}

/// P-value of the augmented Dickey-Fuller test with default settings.
///
/// NaN when the test is undefined for the input.
pub fn adf_pvalue(series: &[f64]) -> f64 {
    adf_test(series, None).p_value
}

/// MacKinnon (1994) approximate p-value for a constant-only ADF statistic.
pub fn mackinnon_pvalue(statistic: f64) -> f64 {
    if statistic.is_nan() {
        return f64::NAN;
    }
    if statistic > TAU_MAX {
        return 1.0;
    }
    if statistic < TAU_MIN {
        return 0.0;
    }
    let coefficients: &[f64] = if statistic <= TAU_STAR {
        &TAU_SMALL_P
    } else {
        &TAU_LARGE_P
    };
    normal_cdf(polyval(coefficients, statistic))
}

/// Rows `[1, y_{t}, Δy_{t-1}, ..., Δy_{t-lags}]` with target `Δy_t`
/// for `t = start .. diff.len()`.
fn adf_design(
    series: &[f64],
    diff: &[f64],
    lags: usize,
    start: usize,
) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut design = Vec::with_capacity(diff.len().saturating_sub(start));
    let mut target = Vec::with_capacity(diff.len().saturating_sub(start));
    for t in start..diff.len() {
        let mut row = Vec::with_capacity(lags + 2);
        row.push(1.0);
        row.push(series[t]);
        row.extend((1..=lags).map(|j| diff[t - j]));
        design.push(row);
        target.push(diff[t]);
    }
    (design, target)
}

/// Select the number of lagged differences by AIC on the common sample.
///
/// Ties keep the smaller lag.
fn select_lag_aic(series: &[f64], diff: &[f64], max_lag: usize) -> usize {
    let (design, target) = adf_design(series, diff, max_lag, max_lag);
    let Ok(fits) = nested_ssr(&design, &target) else {
        return 0;
    };
    let nobs = target.len() as f64;

    let mut best_lag = 0;
    let mut best_aic = f64::INFINITY;
    // Prefix models with 2 + lag columns: constant, level, lagged differences.
    for fit in fits.iter().skip(1) {
        let aic = nobs * (fit.ssr / nobs).ln() + 2.0 * fit.rank as f64;
        if aic < best_aic {
            best_aic = aic;
            best_lag = fit.columns - 2;
        }
    }

    best_lag
}
