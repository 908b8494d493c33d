//! Spectral entropy of a time series.
//!
//! The power spectral density is estimated with Welch's method: periodic Hann
//! window, segments of `min(256, n)` samples with 50% overlap, constant
//! detrending per segment and one-sided density scaling.

use rustfft::{num_complex::Complex64, FftPlanner};
use std::f64::consts::PI;

const MAX_SEGMENT_LENGTH: usize = 256;

/// Estimates the one-sided power spectral density with Welch's method.
///
/// Returns `segment_length / 2 + 1` density values for frequencies
/// `0, 1/segment_length, ..., 0.5` (unit sampling rate), or an empty vector
/// for input shorter than two points.
pub fn welch_psd(series: &[f64]) -> Vec<f64> {
    let n = series.len();
    if n < 2 {
        return Vec::new();
    }

    let nperseg = n.min(MAX_SEGMENT_LENGTH);
    let noverlap = nperseg / 2;
    let step = nperseg - noverlap;
    let n_segments = (n - noverlap) / step;

    let window: Vec<f64> = (0..nperseg)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / nperseg as f64).cos())
        .collect();
    let scale = 1.0 / window.iter().map(|w| w * w).sum::<f64>();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(nperseg);
    let n_bins = nperseg / 2 + 1;
    let mut psd = vec![0.0; n_bins];

    for segment in 0..n_segments {
        let start = segment * step;
        let values = &series[start..start + nperseg];
        let seg_mean = values.iter().sum::<f64>() / nperseg as f64;

        let mut buffer: Vec<Complex64> = values
            .iter()
            .zip(window.iter())
            .map(|(&x, &w)| Complex64::new((x - seg_mean) * w, 0.0))
            .collect();
        fft.process(&mut buffer);

        for (bin, c) in buffer.iter().take(n_bins).enumerate() {
            psd[bin] += c.norm_sqr() * scale;
        }
    }

    // Fold negative frequencies; DC and (for even lengths) Nyquist are unpaired.
    let last_paired = if nperseg % 2 == 0 { n_bins - 1 } else { n_bins };
    for value in psd.iter_mut().take(last_paired).skip(1) {
        *value *= 2.0;
    }
    for value in psd.iter_mut() {
        *value /= n_segments as f64;
    }

    psd
}

/// Returns the Shannon entropy (base 2) of the normalised Welch spectrum.
///
/// Low values indicate a strong signal relative to noise. Zero-power bins
/// contribute nothing. NaN when the spectrum carries no power at all, e.g.
/// for a constant series.
pub fn spectral_entropy(series: &[f64]) -> f64 {
    let psd = welch_psd(series);
    let total: f64 = psd.iter().sum();
    if psd.is_empty() || !(total > 0.0) || !total.is_finite() {
        return f64::NAN;
    }

    -psd.iter()
        .map(|p| p / total)
        .filter(|&p| p > 0.0)
        .map(|p| p * p.log2())
        .sum::<f64>()
}
