//! Property-based tests for the feature library and dataset construction.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated time series data.

use chrono::{Duration, TimeZone, Utc};
use featcast::core::TimeSeries;
use featcast::features::{autocorrelation, partial_autocorrelation, spikiness};
use featcast::preprocessing::{
    align, build_rolling_features, build_rolling_target, temporal_train_test_split,
};
use featcast::utils::metrics::{mae, rmse};
use proptest::prelude::*;

/// Create a TimeSeries from a vector of values.
fn make_ts(values: &[f64]) -> TimeSeries {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let timestamps: Vec<_> = (0..values.len())
        .map(|i| base + Duration::hours(i as i64))
        .collect();
    TimeSeries::new(timestamps, values.to_vec()).unwrap()
}

/// Strategy for generating valid time series values.
/// Adds small variation to avoid all-constant series.
fn valid_values_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(|len| {
        prop::collection::vec(1.0..1000.0_f64, len).prop_map(|mut v| {
            for (i, val) in v.iter_mut().enumerate() {
                *val += (i as f64) * 0.001;
            }
            v
        })
    })
}

// =============================================================================
// Property: correlation features are bounded
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn acf_and_pacf_are_bounded(
        values in valid_values_strategy(20, 120),
        period in 2usize..12
    ) {
        let acf = autocorrelation(&values, period);
        let pacf = partial_autocorrelation(&values, period);

        prop_assert_eq!(acf.len(), period + 5);
        prop_assert_eq!(pacf.len(), period + 5);
        for r in acf.iter().chain(&pacf).filter(|r| !r.is_nan()) {
            prop_assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(r), "value {} out of range", r);
        }
    }

    #[test]
    fn spikiness_is_a_fraction(values in valid_values_strategy(1, 200)) {
        let s = spikiness(&values);
        prop_assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn error_metrics_are_ordered(
        actual in prop::collection::vec(-100.0..100.0_f64, 1..50),
        shift in -10.0..10.0_f64
    ) {
        let predicted: Vec<f64> = actual.iter().map(|a| a + shift).collect();
        let (m, r) = (mae(&actual, &predicted), rmse(&actual, &predicted));
        prop_assert!(m >= 0.0);
        prop_assert!(r + 1e-9 >= m);
    }
}

// =============================================================================
// Property: dataset shapes
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn feature_rows_exclude_lag_warm_up(
        values in valid_values_strategy(40, 80),
        period in 8usize..13,
        lags in 0usize..4
    ) {
        let ts = make_ts(&values);
        let features = build_rolling_features(&ts, period, lags).unwrap();

        prop_assert_eq!(features.len(), values.len() - period - lags);
        prop_assert_eq!(features.n_columns(), 12 + 2 * lags);
        prop_assert_eq!(features.index()[0], ts.timestamps()[period + lags]);
    }

    #[test]
    fn target_rows_and_alignment(
        values in valid_values_strategy(40, 80),
        horizon in 1usize..15
    ) {
        let ts = make_ts(&values);
        let targets = build_rolling_target(&ts, horizon).unwrap();
        prop_assert_eq!(targets.len(), values.len() - horizon);
        prop_assert_eq!(targets.n_columns(), horizon);

        let features = build_rolling_features(&ts, 8, 2).unwrap();
        let aligned = align(&features, &targets).unwrap();
        prop_assert_eq!(aligned.features().index(), aligned.targets().index());

        let expected: Vec<_> = features
            .index()
            .iter()
            .filter(|t| targets.get(t).is_some())
            .copied()
            .collect();
        prop_assert_eq!(aligned.index(), expected.as_slice());
    }

    #[test]
    fn temporal_split_sizes(
        values in valid_values_strategy(10, 200),
        test_size in 0.05..0.95_f64
    ) {
        let ts = make_ts(&values);
        let targets = build_rolling_target(&ts, 1).unwrap();
        let (train, test, y_train, y_test) =
            temporal_train_test_split(&targets, &targets, test_size).unwrap();

        let n = targets.len();
        let n_test = (n as f64 * test_size).floor() as usize;
        prop_assert_eq!(test.len(), n_test);
        prop_assert_eq!(train.len(), n - n_test);
        prop_assert_eq!(y_test.len(), n_test);
        prop_assert_eq!(y_train.n_columns(), 1);
        if let (Some(a), Some(b)) = (train.index().last(), test.index().first()) {
            prop_assert!(a < b);
        }
    }
}
