//! Chronological train/test splitting.

use super::table::Table;
use crate::error::{ForecastError, Result};

/// Train and test partitions of a feature table and its target table.
pub type TrainTestSplit = (Table, Table, Table, Table);

/// Split aligned `x` and `y` tables without shuffling.
///
/// The last `floor(len * test_size)` rows form the test set, so every test
/// timestamp follows every training timestamp. Returns
/// `(x_train, x_test, y_train, y_test)`.
pub fn temporal_train_test_split(x: &Table, y: &Table, test_size: f64) -> Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }
    if x.len() != y.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: x.len(),
            got: y.len(),
        });
    }

    let n = x.len();
    let n_test = (n as f64 * test_size).floor() as usize;
    let cut = n - n_test;

    Ok((
        x.slice(0..cut)?,
        x.slice(cut..n)?,
        y.slice(0..cut)?,
        y.slice(cut..n)?,
    ))
}
