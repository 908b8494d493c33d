//! Hurst exponent by simplified rescaled-range (R/S) analysis.
//!
//! The series is treated as a random walk: for each chunk the range is taken
//! over the raw values and the scale over the chunk's increments.

use crate::error::{ForecastError, Result};

/// Minimum series length accepted by [`hurst_exponent`].
pub const MIN_HURST_LENGTH: usize = 100;

const MIN_CHUNK: usize = 10;

/// Estimates the Hurst exponent of a random-walk-like series.
///
/// Chunk sizes are `10^1, 10^1.25, ...` below `n - 1` plus the full length;
/// for every size the mean R/S over non-overlapping chunks is computed and
/// H is the least-squares slope of `log10(R/S)` against `log10(size)`.
///
/// H < 0.5 indicates mean reversion, H ≈ 0.5 an unbiased walk and
/// H > 0.5 persistence. NaN when fewer than two chunk sizes yield a
/// non-zero R/S (e.g. a constant series).
///
/// # Errors
/// `InsufficientData` for series shorter than [`MIN_HURST_LENGTH`].
pub fn hurst_exponent(series: &[f64]) -> Result<f64> {
    let n = series.len();
    if n < MIN_HURST_LENGTH {
        return Err(ForecastError::InsufficientData {
            needed: MIN_HURST_LENGTH,
            got: n,
        });
    }

    let mut points = Vec::new();
    for size in chunk_sizes(n) {
        let ratios: Vec<f64> = series
            .chunks_exact(size)
            .map(rescaled_range)
            .filter(|&rs| rs != 0.0 && rs.is_finite())
            .collect();
        if ratios.is_empty() {
            continue;
        }
        let mean_rs = ratios.iter().sum::<f64>() / ratios.len() as f64;
        points.push(((size as f64).log10(), mean_rs.log10()));
    }

    Ok(slope(&points))
}

fn chunk_sizes(n: usize) -> Vec<usize> {
    let upper = ((n - 1) as f64).log10();
    let mut sizes = Vec::new();
    let mut exponent = (MIN_CHUNK as f64).log10();
    while exponent < upper {
        sizes.push(10f64.powf(exponent) as usize);
        exponent += 0.25;
    }
    sizes.push(n);
    sizes
}

/// Range of the values over the sample std of their increments; 0 when either is 0.
fn rescaled_range(chunk: &[f64]) -> f64 {
    let max = chunk.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = chunk.iter().copied().fold(f64::INFINITY, f64::min);
    let range = max - min;

    let increments: Vec<f64> = chunk.windows(2).map(|w| w[1] - w[0]).collect();
    if increments.len() < 2 {
        return 0.0;
    }
    let mean = increments.iter().sum::<f64>() / increments.len() as f64;
    let scale = (increments.iter().map(|d| (d - mean).powi(2)).sum::<f64>()
        / (increments.len() - 1) as f64)
        .sqrt();

    if range == 0.0 || scale == 0.0 {
        return 0.0;
    }
    range / scale
}

fn slope(points: &[(f64, f64)]) -> f64 {
    if points.len() < 2 {
        return f64::NAN;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;
    let sxy: f64 = points.iter().map(|(x, y)| (x - mean_x) * (y - mean_y)).sum();
    let sxx: f64 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return f64::NAN;
    }
    sxy / sxx
}
