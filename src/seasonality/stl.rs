//! STL (Seasonal-Trend decomposition using LOESS) implementation.
//!
//! STL decomposes a time series into three additive components:
//! - Trend: The underlying long-term pattern
//! - Seasonal: The repeating seasonal pattern
//! - Remainder: The residual after removing trend and seasonal
//!
//! Smoothing uses local-linear LOESS with tricube weights, so straight lines
//! are reproduced exactly, and each cycle-subseries is extrapolated one cycle
//! beyond both ends before the low-pass filter (Cleveland et al., 1990).

/// Result of STL decomposition.
#[derive(Debug, Clone)]
pub struct STLResult {
    /// Trend component.
    pub trend: Vec<f64>,
    /// Seasonal component.
    pub seasonal: Vec<f64>,
    /// Remainder component.
    pub remainder: Vec<f64>,
}

impl STLResult {
    /// Get the seasonal strength (0 to 1).
    /// Values close to 1 indicate strong seasonality.
    pub fn seasonal_strength(&self) -> f64 {
        component_strength(&self.seasonal, &self.remainder)
    }

    /// Get the trend strength (0 to 1).
    /// Values close to 1 indicate strong trend.
    pub fn trend_strength(&self) -> f64 {
        component_strength(&self.trend, &self.remainder)
    }
}

/// `max(0, 1 - var(R) / var(C + R))`, or 0 when `C + R` is flat.
fn component_strength(component: &[f64], remainder: &[f64]) -> f64 {
    let var_remainder = variance(remainder);
    let combined: Vec<f64> = component
        .iter()
        .zip(remainder.iter())
        .map(|(c, r)| c + r)
        .collect();
    let var_combined = variance(&combined);

    if var_combined < 1e-10 {
        return 0.0;
    }

    (1.0 - var_remainder / var_combined).max(0.0)
}

/// STL decomposition configuration and algorithm.
#[derive(Debug, Clone)]
pub struct STL {
    /// Seasonal period.
    seasonal_period: usize,
    /// Seasonal LOESS smoothing parameter (ns).
    seasonal_smoothness: usize,
    /// Trend LOESS smoothing parameter (nt).
    trend_smoothness: usize,
    /// Low-pass filter parameter (nl).
    low_pass_smoothness: usize,
    /// Number of inner iterations.
    inner_iterations: usize,
    /// Number of outer (robustness) iterations.
    outer_iterations: usize,
    /// Use robust fitting.
    robust: bool,
}

impl STL {
    /// Create a new STL decomposer with the given seasonal period.
    pub fn new(seasonal_period: usize) -> Self {
        let ns = 7;
        Self {
            seasonal_period,
            seasonal_smoothness: ns,
            trend_smoothness: trend_span(seasonal_period, ns),
            low_pass_smoothness: next_odd(seasonal_period + 1),
            inner_iterations: 2,
            outer_iterations: 0,
            robust: false,
        }
    }

    /// Set custom seasonal smoothness (ns parameter).
    ///
    /// The trend span is re-derived from the new value.
    pub fn with_seasonal_smoothness(mut self, ns: usize) -> Self {
        self.seasonal_smoothness = next_odd(ns.max(3));
        self.trend_smoothness = trend_span(self.seasonal_period, self.seasonal_smoothness);
        self
    }

    /// Set custom trend smoothness (nt parameter).
    pub fn with_trend_smoothness(mut self, nt: usize) -> Self {
        self.trend_smoothness = next_odd(nt.max(3));
        self
    }

    /// Enable robust fitting with default iterations.
    pub fn robust(mut self) -> Self {
        self.robust = true;
        self.outer_iterations = 6;
        self
    }

    /// Decompose the time series.
    ///
    /// Returns `None` when the period is below 2 or the series is shorter
    /// than one full cycle.
    pub fn decompose(&self, series: &[f64]) -> Option<STLResult> {
        let n = series.len();
        let period = self.seasonal_period;
        if period < 2 || n < period {
            return None;
        }

        let mut seasonal = vec![0.0; n];
        let mut trend = vec![0.0; n];
        let mut weights = vec![1.0; n];

        let outer_iters = if self.robust {
            self.outer_iterations.max(1)
        } else {
            1
        };

        for _ in 0..outer_iters {
            for _ in 0..self.inner_iterations {
                // Step 1: Detrending
                let detrended: Vec<f64> =
                    series.iter().zip(trend.iter()).map(|(y, t)| y - t).collect();

                // Step 2: Cycle-subseries smoothing, one extra cycle on each side
                let cycle_subseries = self.smooth_cycle_subseries(&detrended, &weights);

                // Step 3: Low-pass filter of smoothed cycle-subseries
                let low_pass = self.low_pass_filter(&cycle_subseries);

                // Step 4: Detrending of smoothed cycle-subseries
                for i in 0..n {
                    seasonal[i] = cycle_subseries[i + period] - low_pass[i];
                }

                // Step 5: Deseasonalizing
                let deseasonalized: Vec<f64> = series
                    .iter()
                    .zip(seasonal.iter())
                    .map(|(y, s)| y - s)
                    .collect();

                // Step 6: Trend smoothing
                trend = loess_smooth(&deseasonalized, self.trend_smoothness, &weights);
            }

            if self.robust {
                let remainder = remainder_of(series, &seasonal, &trend);
                weights = compute_robustness_weights(&remainder);
            }
        }

        let remainder = remainder_of(series, &seasonal, &trend);

        Some(STLResult {
            trend,
            seasonal,
            remainder,
        })
    }

    /// Smooth every cycle-subseries and extend it by one point at each end.
    ///
    /// The output has `n + 2 * period` values: position `p` holds the smoothed
    /// value for original index `p - period`.
    fn smooth_cycle_subseries(&self, detrended: &[f64], weights: &[f64]) -> Vec<f64> {
        let n = detrended.len();
        let period = self.seasonal_period;
        let mut result = vec![0.0; n + 2 * period];

        for cycle_pos in 0..period {
            let values: Vec<f64> = detrended
                .iter()
                .skip(cycle_pos)
                .step_by(period)
                .copied()
                .collect();
            let sub_weights: Vec<f64> = weights
                .iter()
                .skip(cycle_pos)
                .step_by(period)
                .copied()
                .collect();
            let m = values.len();

            // Positions -1 ..= m of the subseries land at cycle_pos + (j + 1) * period.
            for j in 0..m + 2 {
                let x = j as f64 - 1.0;
                let smoothed = loess_fit(&values, &sub_weights, self.seasonal_smoothness, x)
                    .unwrap_or_else(|| nearest(&values, x));
                result[cycle_pos + j * period] = smoothed;
            }
        }

        result
    }

    /// Low-pass filter: MA(period), MA(period), MA(3), then LOESS.
    ///
    /// Shrinks the extended cycle-subseries back to the original length.
    fn low_pass_filter(&self, extended: &[f64]) -> Vec<f64> {
        let period = self.seasonal_period;
        let ma1 = moving_average(extended, period);
        let ma2 = moving_average(&ma1, period);
        let ma3 = moving_average(&ma2, 3);

        let weights = vec![1.0; ma3.len()];
        loess_smooth(&ma3, self.low_pass_smoothness, &weights)
    }
}

impl Default for STL {
    fn default() -> Self {
        Self::new(12) // Monthly seasonality default
    }
}

fn next_odd(value: usize) -> usize {
    if value % 2 == 0 {
        value + 1
    } else {
        value
    }
}

fn trend_span(period: usize, ns: usize) -> usize {
    let nt = (1.5 * period as f64 / (1.0 - 1.5 / ns as f64)).ceil() as usize;
    next_odd(nt.max(3))
}

fn remainder_of(series: &[f64], seasonal: &[f64], trend: &[f64]) -> Vec<f64> {
    series
        .iter()
        .zip(seasonal.iter())
        .zip(trend.iter())
        .map(|((y, s), t)| y - s - t)
        .collect()
}

/// Trailing moving average; output has `len - window + 1` values.
fn moving_average(series: &[f64], window: usize) -> Vec<f64> {
    if series.len() < window || window == 0 {
        return Vec::new();
    }
    let mut result = Vec::with_capacity(series.len() - window + 1);
    let mut sum: f64 = series[..window].iter().sum();
    result.push(sum / window as f64);
    for i in window..series.len() {
        sum += series[i] - series[i - window];
        result.push(sum / window as f64);
    }
    result
}

/// LOESS fit evaluated at every index of `values`.
fn loess_smooth(values: &[f64], span: usize, weights: &[f64]) -> Vec<f64> {
    (0..values.len())
        .map(|i| loess_fit(values, weights, span, i as f64).unwrap_or(values[i]))
        .collect()
}

/// Local-linear LOESS estimate at position `x` (may lie outside `0..n`).
///
/// The neighbourhood is the `span` nearest indices; when `span` exceeds the
/// series length the bandwidth is widened by half the excess. Returns `None`
/// when every weight in the neighbourhood is zero.
fn loess_fit(values: &[f64], robustness: &[f64], span: usize, x: f64) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    if n == 1 {
        return Some(values[0]);
    }

    let q = span.clamp(1, n);
    let (left, right) = neighbourhood(n, q, x);
    let mut h = (x - left as f64).max(right as f64 - x);
    if span > n {
        h += ((span - n) / 2) as f64;
    }

    let h_upper = 0.999 * h;
    let h_lower = 0.001 * h;
    let mut w = vec![0.0; right - left + 1];
    let mut total = 0.0;
    for (k, j) in (left..=right).enumerate() {
        let r = (j as f64 - x).abs();
        if r <= h_upper {
            let tricube = if r <= h_lower {
                1.0
            } else {
                (1.0 - (r / h).powi(3)).powi(3)
            };
            w[k] = tricube * robustness[j];
            total += w[k];
        }
    }
    if total <= 0.0 {
        return None;
    }
    for wk in w.iter_mut() {
        *wk /= total;
    }

    if h > 0.0 {
        let centre: f64 = w
            .iter()
            .enumerate()
            .map(|(k, wk)| wk * (left + k) as f64)
            .sum();
        let spread: f64 = w
            .iter()
            .enumerate()
            .map(|(k, wk)| wk * ((left + k) as f64 - centre).powi(2))
            .sum();
        let range = (n - 1) as f64;
        if spread.sqrt() > 0.001 * range {
            let slope = (x - centre) / spread;
            for (k, wk) in w.iter_mut().enumerate() {
                *wk *= slope * ((left + k) as f64 - centre) + 1.0;
            }
        }
    }

    Some(
        w.iter()
            .enumerate()
            .map(|(k, wk)| wk * values[left + k])
            .sum(),
    )
}

/// Inclusive bounds of the `q` indices nearest to `x`.
fn neighbourhood(n: usize, q: usize, x: f64) -> (usize, usize) {
    if q >= n {
        return (0, n - 1);
    }
    let max_left = n - q;
    let centre = x.round() - ((q - 1) / 2) as f64;
    let mut left = centre.clamp(0.0, max_left as f64) as usize;
    while left < max_left && x - left as f64 > (left + q) as f64 - x {
        left += 1;
    }
    while left > 0 && (left + q - 1) as f64 - x > x - (left - 1) as f64 {
        left -= 1;
    }
    (left, left + q - 1)
}

fn nearest(values: &[f64], x: f64) -> f64 {
    let last = values.len().saturating_sub(1) as f64;
    values
        .get(x.round().clamp(0.0, last) as usize)
        .copied()
        .unwrap_or(0.0)
}

/// Bisquare weights from the remainder, scaled by six times its median absolute value.
fn compute_robustness_weights(remainder: &[f64]) -> Vec<f64> {
    let n = remainder.len();
    let mut sorted: Vec<f64> = remainder.iter().map(|r| r.abs()).collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };

    let h = 6.0 * median;

    remainder
        .iter()
        .map(|r| {
            if h < 1e-10 {
                return 1.0;
            }
            let u = r.abs() / h;
            if u < 1.0 {
                (1.0 - u * u).powi(2)
            } else {
                0.0
            }
        })
        .collect()
}

/// Compute variance.
fn variance(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean: f64 = values.iter().sum::<f64>() / n as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64
}
