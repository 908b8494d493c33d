//! Window statistics used as forecasting features.
//!
//! Every function maps a window of observations to a scalar (or, for the
//! autocorrelation vectors, a fixed-length vector). Degenerate inputs yield
//! NaN rather than an error, with the exception of [`hurst_exponent`], whose
//! minimum length is a caller contract.
//!
//! # Example
//!
//! ```
//! use featcast::features::{basic, shape, spectral_entropy};
//!
//! let window = vec![2.0, 4.0, 8.0, 16.0, 32.0, 64.0, 128.0];
//!
//! let m = basic::mean(&window);
//! let c = shape::curvature(&window);
//! let h = spectral_entropy(&window);
//! assert!(m > 0.0 && c > 0.0 && h > 0.0);
//! ```

pub mod autocorrelation;
pub mod basic;
pub mod entropy;
pub mod hurst;
pub mod shape;
pub mod strength;

pub use autocorrelation::{autocorrelation, partial_autocorrelation};
pub use basic::{mean, median, quantile, standard_deviation, variance};
pub use entropy::{spectral_entropy, welch_psd};
pub use hurst::{hurst_exponent, MIN_HURST_LENGTH};
pub use shape::{curvature, lumpiness, spikiness};
pub use strength::{
    decomposition_strengths, seasonal_strength, trend_strength, DecompositionStrengths,
};

pub use crate::validation::stationarity::adf_pvalue;
