//! Timestamp-indexed numeric tables.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use std::ops::Range;

/// A dense table of `f64` values with named columns and one timestamp per row.
///
/// Row timestamps are strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    index: Vec<DateTime<Utc>>,
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

/// Table of rolling-window features, keyed by the window's right edge.
pub type FeatureTable = Table;

/// Table of future values `t+1 .. t+h`, keyed by the current timestamp.
pub type TargetTable = Table;

impl Table {
    /// Create a table, checking row widths and index ordering.
    pub fn new(
        index: Vec<DateTime<Utc>>,
        columns: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self> {
        if index.len() != rows.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: index.len(),
                got: rows.len(),
            });
        }
        if let Some(row) = rows.iter().find(|row| row.len() != columns.len()) {
            return Err(ForecastError::DimensionMismatch {
                expected: columns.len(),
                got: row.len(),
            });
        }
        if index.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ForecastError::TimestampError(
                "table index must be strictly increasing".to_string(),
            ));
        }
        Ok(Self {
            index,
            columns,
            rows,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Row timestamps.
    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    /// Column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows, oldest first.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Position of a named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Copy of a named column.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let j = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[j]).collect())
    }

    /// Row stored under `timestamp`.
    pub fn get(&self, timestamp: &DateTime<Utc>) -> Option<&[f64]> {
        self.index
            .binary_search(timestamp)
            .ok()
            .map(|i| self.rows[i].as_slice())
    }

    /// Most recent row with its timestamp.
    pub fn last_row(&self) -> Option<(DateTime<Utc>, &[f64])> {
        let ts = *self.index.last()?;
        let row = self.rows.last()?;
        Some((ts, row.as_slice()))
    }

    /// Contiguous block of rows.
    pub fn slice(&self, range: Range<usize>) -> Result<Table> {
        if range.start > range.end || range.end > self.len() {
            return Err(ForecastError::IndexOutOfBounds {
                index: range.end,
                size: self.len(),
            });
        }
        Ok(Self {
            index: self.index[range.clone()].to_vec(),
            columns: self.columns.clone(),
            rows: self.rows[range].to_vec(),
        })
    }

    /// Rows at the given increasing positions.
    pub(crate) fn select(&self, positions: &[usize]) -> Table {
        Self {
            index: positions.iter().map(|&i| self.index[i]).collect(),
            columns: self.columns.clone(),
            rows: positions.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }
}
