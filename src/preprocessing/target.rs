//! Multi-step target construction.

use super::table::{Table, TargetTable};
use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use tracing::debug;

/// Target column names `t+1 .. t+horizon`.
pub fn target_names(horizon: usize) -> Vec<String> {
    (1..=horizon).map(|step| format!("t+{}", step)).collect()
}

/// Build the table of the next `horizon` values for every observation.
///
/// Row `i` is keyed by the timestamp of observation `i` and holds
/// `values[i + 1 ..= i + horizon]`; observations without a full horizon ahead
/// are skipped, as are rows containing non-finite values.
pub fn build_rolling_target(series: &TimeSeries, horizon: usize) -> Result<TargetTable> {
    if horizon == 0 {
        return Err(ForecastError::InvalidParameter(
            "horizon must be at least 1".to_string(),
        ));
    }

    let values = series.values();
    let n = values.len();
    let available = n.saturating_sub(horizon);

    let mut index = Vec::with_capacity(available);
    let mut rows = Vec::with_capacity(available);
    for i in 0..available {
        let row = &values[i + 1..=i + horizon];
        if row.iter().all(|v| v.is_finite()) {
            index.push(series.timestamps()[i]);
            rows.push(row.to_vec());
        }
    }

    debug!(
        rows = rows.len(),
        dropped = available - rows.len(),
        horizon,
        "built rolling targets"
    );

    Table::new(index, target_names(horizon), rows)
}
