//! Rolling-window feature extraction.

use super::table::{FeatureTable, Table};
use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::features::{
    adf_pvalue, basic, curvature, decomposition_strengths, hurst_exponent, lumpiness,
    spectral_entropy, spikiness, MIN_HURST_LENGTH,
};
use crate::utils::parallel::run_with_workers;
use rayon::prelude::*;
use tracing::{debug, warn};

/// Window statistics in column order, before `hurst_exponent`.
const LEADING_FEATURES: [&str; 10] = [
    "mean",
    "median",
    "std",
    "q1",
    "q3",
    "trend_strength",
    "seasonal_strength",
    "lumpiness",
    "spikiness",
    "curvature",
];

/// Window statistics in column order, after `hurst_exponent`.
const TRAILING_FEATURES: [&str; 2] = ["spectral_entropy", "adf_pvalue"];

/// Builds one feature row per window of `seasonal_period` observations.
///
/// Each row is keyed by the timestamp of the window's last observation and
/// holds the window statistics followed by `lag j` / `seasonal lag j` pairs
/// for `j = 1..=lags_to_consider`. Positions without a complete set of lags
/// are skipped, as are rows with any non-finite value.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use featcast::core::{Frequency, TimeSeries};
/// use featcast::preprocessing::RollingFeatureBuilder;
///
/// let values: Vec<f64> = (0..80)
///     .map(|i| 10.0 + (i as f64 * std::f64::consts::PI / 6.0).sin() + 0.01 * (i % 7) as f64)
///     .collect();
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let series = TimeSeries::from_values(start, Frequency::Daily, values).unwrap();
///
/// let table = RollingFeatureBuilder::new(12).with_lags(3).build(&series).unwrap();
/// assert_eq!(table.columns()[0], "mean");
/// assert!(table.len() <= 80 - 12 - 3);
/// ```
#[derive(Debug, Clone)]
pub struct RollingFeatureBuilder {
    seasonal_period: usize,
    lags_to_consider: usize,
    n_jobs: Option<usize>,
}

impl RollingFeatureBuilder {
    /// Create a builder with window size `seasonal_period` and 5 lags.
    pub fn new(seasonal_period: usize) -> Self {
        Self {
            seasonal_period,
            lags_to_consider: 5,
            n_jobs: None,
        }
    }

    /// Set the number of lag and seasonal-lag pairs.
    pub fn with_lags(mut self, lags_to_consider: usize) -> Self {
        self.lags_to_consider = lags_to_consider;
        self
    }

    /// Bound the number of worker threads (global pool when unset).
    pub fn with_n_jobs(mut self, n_jobs: usize) -> Self {
        self.n_jobs = Some(n_jobs);
        self
    }

    pub fn seasonal_period(&self) -> usize {
        self.seasonal_period
    }

    pub fn lags_to_consider(&self) -> usize {
        self.lags_to_consider
    }

    /// Whether windows are long enough for a `hurst_exponent` column.
    pub fn includes_hurst(&self) -> bool {
        self.seasonal_period >= MIN_HURST_LENGTH
    }

    /// Column names of the tables produced by [`build`](Self::build).
    pub fn column_names(&self) -> Vec<String> {
        feature_names(self.seasonal_period, self.lags_to_consider)
    }

    /// Compute the feature table for `series`.
    ///
    /// # Errors
    /// * [`ForecastError::InvalidParameter`] when `seasonal_period < 2`
    /// * [`ForecastError::MissingValues`] when the series holds NaN or
    ///   infinite values; clean it first with
    ///   [`TimeSeries::sanitized`](crate::core::TimeSeries::sanitized)
    /// * [`ForecastError::InsufficientData`] when the series is shorter than
    ///   one window
    pub fn build(&self, series: &TimeSeries) -> Result<FeatureTable> {
        let sp = self.seasonal_period;
        let k = self.lags_to_consider;
        if sp < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonal_period must be at least 2, got {}",
                sp
            )));
        }
        if series.has_missing_values() {
            return Err(ForecastError::MissingValues);
        }
        let n = series.len();
        if n < sp {
            return Err(ForecastError::InsufficientData { needed: sp, got: n });
        }

        let values = series.values();
        let first = sp + k;
        let include_hurst = self.includes_hurst();

        let statistics: Vec<Vec<f64>> = run_with_workers(self.n_jobs, || {
            (first.min(n)..n)
                .into_par_iter()
                .map(|i| window_statistics(&values[i + 1 - sp..=i], sp, include_hurst))
                .collect()
        })?;

        let mut index = Vec::with_capacity(statistics.len());
        let mut rows = Vec::with_capacity(statistics.len());
        let mut dropped = 0;
        for (i, mut row) in (first..n).zip(statistics) {
            for j in 1..=k {
                row.push(values[i - j]);
                row.push(values[i - j - sp]);
            }
            if row.iter().all(|v| v.is_finite()) {
                index.push(series.timestamps()[i]);
                rows.push(row);
            } else {
                dropped += 1;
            }
        }

        if dropped > 0 {
            warn!(
                dropped,
                seasonal_period = sp,
                "dropped feature rows with undefined window statistics"
            );
        }
        debug!(
            rows = rows.len(),
            warm_up = first.min(n),
            seasonal_period = sp,
            lags = k,
            "built rolling features"
        );

        Table::new(index, self.column_names(), rows)
    }
}

/// Build the rolling feature table with the given window size and lag count.
pub fn build_rolling_features(
    series: &TimeSeries,
    seasonal_period: usize,
    lags_to_consider: usize,
) -> Result<FeatureTable> {
    RollingFeatureBuilder::new(seasonal_period)
        .with_lags(lags_to_consider)
        .build(series)
}

/// Feature column names for a window size and lag count.
pub fn feature_names(seasonal_period: usize, lags_to_consider: usize) -> Vec<String> {
    let mut names: Vec<String> = LEADING_FEATURES.iter().map(|s| s.to_string()).collect();
    if seasonal_period >= MIN_HURST_LENGTH {
        names.push("hurst_exponent".to_string());
    }
    names.extend(TRAILING_FEATURES.iter().map(|s| s.to_string()));
    for j in 1..=lags_to_consider {
        names.push(format!("lag {}", j));
        names.push(format!("seasonal lag {}", j));
    }
    names
}

fn window_statistics(window: &[f64], seasonal_period: usize, include_hurst: bool) -> Vec<f64> {
    let strengths = decomposition_strengths(window, seasonal_period);
    let mut row = vec![
        basic::mean(window),
        basic::median(window),
        basic::standard_deviation(window),
        basic::quantile(window, 0.25),
        basic::quantile(window, 0.75),
        strengths.trend,
        strengths.seasonal,
        lumpiness(window),
        spikiness(window),
        curvature(window),
    ];
    if include_hurst {
        row.push(hurst_exponent(window).unwrap_or(f64::NAN));
    }
    row.push(spectral_entropy(window));
    row.push(adf_pvalue(window));
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Frequency, MissingValuePolicy};
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, StandardNormal};

    fn noisy_seasonal(n: usize, period: usize, seed: u64) -> TimeSeries {
        let mut rng = StdRng::seed_from_u64(seed);
        let values = (0..n)
            .map(|i| {
                let e: f64 = StandardNormal.sample(&mut rng);
                50.0 + 5.0 * (2.0 * std::f64::consts::PI * i as f64 / period as f64).sin()
                    + 0.5 * e
            })
            .collect();
        let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        TimeSeries::from_values(start, Frequency::Daily, values).unwrap()
    }

    #[test]
    fn feature_names_without_hurst() {
        let names = feature_names(12, 2);
        assert_eq!(
            names,
            vec![
                "mean",
                "median",
                "std",
                "q1",
                "q3",
                "trend_strength",
                "seasonal_strength",
                "lumpiness",
                "spikiness",
                "curvature",
                "spectral_entropy",
                "adf_pvalue",
                "lag 1",
                "seasonal lag 1",
                "lag 2",
                "seasonal lag 2",
            ]
        );
    }

    #[test]
    fn feature_names_with_hurst() {
        let names = feature_names(100, 0);
        assert_eq!(names.len(), 13);
        assert_eq!(names[10], "hurst_exponent");
        assert!(!feature_names(99, 0).contains(&"hurst_exponent".to_string()));
    }

    #[test]
    fn rolling_features_row_count_and_index() {
        let series = noisy_seasonal(120, 12, 1);
        let table = build_rolling_features(&series, 12, 5).unwrap();

        assert_eq!(table.len(), 120 - 12 - 5);
        assert_eq!(table.n_columns(), 12 + 10);
        assert_eq!(table.index()[0], series.timestamps()[17]);
        assert_eq!(table.last_row().unwrap().0, series.timestamps()[119]);
    }

    #[test]
    fn rolling_features_lags_look_back() {
        let series = noisy_seasonal(60, 7, 2);
        let values = series.values();
        let table = build_rolling_features(&series, 7, 3).unwrap();

        let lag1 = table.column_index("lag 1").unwrap();
        let seasonal3 = table.column_index("seasonal lag 3").unwrap();
        for (r, row) in table.rows().iter().enumerate() {
            let i = r + 10;
            assert_eq!(row[lag1], values[i - 1]);
            assert_eq!(row[seasonal3], values[i - 3 - 7]);
        }
    }

    #[test]
    fn rolling_features_window_statistics() {
        let series = noisy_seasonal(40, 10, 3);
        let values = series.values();
        let table = build_rolling_features(&series, 10, 1).unwrap();

        let first = table.rows()[0].as_slice();
        let window = &values[2..12];
        assert_relative_eq!(first[0], basic::mean(window), epsilon = 1e-12);
        assert_relative_eq!(first[1], basic::median(window), epsilon = 1e-12);
        assert_relative_eq!(first[4], basic::quantile(window, 0.75), epsilon = 1e-12);
        assert!((0.0..=1.0).contains(&first[table.column_index("adf_pvalue").unwrap()]));
    }

    #[test]
    fn rolling_features_include_hurst_for_long_windows() {
        let series = noisy_seasonal(150, 100, 4);
        let table = RollingFeatureBuilder::new(100)
            .with_lags(2)
            .with_n_jobs(2)
            .build(&series)
            .unwrap();

        assert_eq!(table.len(), 150 - 100 - 2);
        let hurst = table.column("hurst_exponent").unwrap();
        assert!(hurst.iter().all(|h| h.is_finite()));
    }

    #[test]
    fn rolling_features_parallelism_is_deterministic() {
        let series = noisy_seasonal(90, 12, 5);
        let sequential = RollingFeatureBuilder::new(12)
            .with_n_jobs(1)
            .build(&series)
            .unwrap();
        let parallel = RollingFeatureBuilder::new(12)
            .with_n_jobs(4)
            .build(&series)
            .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn rolling_features_drop_degenerate_windows() {
        let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let constant = TimeSeries::from_values(start, Frequency::Daily, vec![3.0; 40]).unwrap();
        let table = build_rolling_features(&constant, 12, 2).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn rolling_features_reject_bad_input() {
        let series = noisy_seasonal(30, 12, 6);
        assert!(matches!(
            build_rolling_features(&series, 1, 5),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(matches!(
            build_rolling_features(&series, 31, 5),
            Err(ForecastError::InsufficientData { needed: 31, got: 30 })
        ));

        let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let mut values = series.values().to_vec();
        values[3] = f64::NAN;
        let gappy = TimeSeries::from_values(start, Frequency::Daily, values).unwrap();
        assert!(matches!(
            build_rolling_features(&gappy, 12, 5),
            Err(ForecastError::MissingValues)
        ));
        let filled = gappy.sanitized(MissingValuePolicy::ForwardFill).unwrap();
        assert!(build_rolling_features(&filled, 12, 5).is_ok());
    }

    #[test]
    fn rolling_features_short_series_is_empty() {
        let series = noisy_seasonal(14, 12, 7);
        let table = build_rolling_features(&series, 12, 5).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.n_columns(), 22);
    }
}
