//! Quickstart: clean a raw series, build rolling features, fit a ridge
//! estimator, forecast and run walk-forward validation.
//!
//! Run with `cargo run --example quickstart`.

use chrono::{Duration, TimeZone, Utc};
use featcast::core::MissingValuePolicy;
use featcast::prelude::*;
use featcast::preprocessing::temporal_train_test_split;

fn main() -> Result<()> {
    // Two years of daily readings with a weekly cycle, a mild trend and a
    // few failed readings.
    let start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
    let timestamps = (0..730).map(|i| start + Duration::days(i)).collect();
    let values: Vec<f64> = (0..730)
        .map(|i| {
            if i % 97 == 50 {
                return f64::NAN;
            }
            let t = i as f64;
            200.0
                + 0.1 * t
                + 15.0 * (2.0 * std::f64::consts::PI * t / 7.0).sin()
                + ((i * 7919) % 13) as f64 * 0.5
        })
        .collect();
    let raw = TimeSeries::new(timestamps, values)?;

    let config = EstimatorConfig::new(7, 28, Frequency::Daily).with_lags(3);
    if let Err(err) = build_rolling_xy(&raw, &config.rolling_config()) {
        println!("raw series rejected: {}", err);
    }

    // Carry the last reading over the gaps and recover the spacing.
    let mut series = raw.sanitized(MissingValuePolicy::ForwardFill)?;
    series.set_frequency_from_timestamps()?;
    let frequency = series.frequency().unwrap_or(Frequency::Daily);
    println!("inferred frequency: {:?}", frequency);
    let config = config.with_frequency(frequency);

    // Inspect the supervised dataset.
    let dataset = build_rolling_xy(&series, &config.rolling_config())?;
    println!(
        "features: {} rows x {} columns, aligned rows: {}",
        dataset.features.len(),
        dataset.features.n_columns(),
        dataset.aligned.len()
    );
    println!("columns: {:?}", dataset.features.columns());

    // Hold out the most recent 20% and score a direct fit.
    let (x_train, x_test, y_train, y_test) = temporal_train_test_split(
        dataset.aligned.features(),
        dataset.aligned.targets(),
        0.2,
    )?;
    let regressor = featcast::models::MultiOutputRegressor::new(LinearRegression::ridge(1.0)?);
    let model = regressor.fit(x_train.rows(), y_train.rows())?;
    let predicted = model.predict(x_test.rows())?;
    let actual: Vec<f64> = y_test.rows().iter().flatten().copied().collect();
    let flat: Vec<f64> = predicted.into_iter().flatten().collect();
    let metrics = calculate_metrics(&actual, &flat)?;
    println!(
        "holdout: MAE {:.3}  RMSE {:.3}  R2 {:.3}",
        metrics.mae, metrics.rmse, metrics.r_squared
    );

    // Forecast the final, unseen week from everything before it.
    let n = series.len();
    let history = series.slice(0, n - config.horizon)?;
    let last_week = series.slice(n - config.horizon, n)?;
    let mut estimator = FeatureBasedEstimator::new(LinearRegression::ridge(1.0)?, config.clone());
    estimator.preprocess_and_fit(&history)?;
    let backtest = estimator.forecast()?;
    let week = calculate_metrics(last_week.values(), backtest.values())?;
    println!("last week: MAE {:.3}", week.mae);

    // Fit on everything and forecast the next week.
    let mut estimator = FeatureBasedEstimator::new(LinearRegression::ridge(1.0)?, config);
    estimator.fit(dataset)?;
    for (ts, value) in estimator.forecast()?.iter() {
        println!("{}  {:.2}", ts.format("%Y-%m-%d"), value);
    }

    let report = estimator.sequential_validation(5, &Metric::mae())?;
    for (train_rows, score) in report.iter() {
        println!(
            "train rows {:>4}: {} = {:.3}",
            train_rows,
            report.metric_name(),
            score
        );
    }
    println!("mean {}: {:.3}", report.metric_name(), report.mean_score());

    Ok(())
}
