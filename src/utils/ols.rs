//! Ordinary least squares by Householder QR.
//!
//! Shared by the ADF regression and the linear reference regressor. Solving
//! through QR rather than the normal equations keeps explosive series (levels
//! in the 1e10 range) well conditioned. Columns that are numerically a linear
//! combination of earlier ones are dropped: their coefficient is 0 and their
//! standard error NaN.

use crate::error::{ForecastError, Result};

/// Relative tolerance below which a column's residual norm marks it as dependent.
const RANK_TOLERANCE: f64 = 1e-10;

/// Result of a least-squares fit `y ≈ X b`.
#[derive(Debug, Clone, PartialEq)]
pub struct OLSResult {
    /// Coefficients, one per design column.
    pub coefficients: Vec<f64>,
    /// Standard errors, one per design column (NaN for dropped columns).
    pub std_errors: Vec<f64>,
    /// Sum of squared residuals.
    pub ssr: f64,
    /// Number of observations.
    pub nobs: usize,
    /// Number of linearly independent columns used.
    pub rank: usize,
}

impl OLSResult {
    /// t-statistic of coefficient `index` (NaN when undefined).
    pub fn t_value(&self, index: usize) -> f64 {
        match (self.coefficients.get(index), self.std_errors.get(index)) {
            (Some(&b), Some(&se)) if se > 0.0 => b / se,
            _ => f64::NAN,
        }
    }

    /// Fitted value for a single design row.
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        row.iter()
            .zip(self.coefficients.iter())
            .map(|(x, b)| x * b)
            .sum()
    }
}

/// Fit `y ≈ X b` where `design` holds one row per observation.
///
/// No intercept is added; include a column of ones if one is needed.
pub fn ols_fit(design: &[Vec<f64>], y: &[f64]) -> Result<OLSResult> {
    let qr = QrDecomposition::new(design, y)?;
    let (n, k) = (qr.nobs, qr.cols.len());
    let rank = qr.selected.len();

    let mut coefficients = vec![0.0; k];
    for p in (0..rank).rev() {
        let col = qr.selected[p];
        let mut acc = qr.qty[p];
        for &other in &qr.selected[p + 1..] {
            acc -= qr.cols[other][p] * coefficients[other];
        }
        coefficients[col] = acc / qr.cols[col][p];
    }

    let ssr: f64 = design
        .iter()
        .zip(y)
        .map(|(row, &target)| {
            let fitted: f64 = row.iter().zip(&coefficients).map(|(x, b)| x * b).sum();
            (target - fitted).powi(2)
        })
        .sum();

    let mut std_errors = vec![f64::NAN; k];
    if n > rank {
        let sigma_sq = ssr / (n - rank) as f64;
        let r_inv = qr.r_inverse();
        for (p, &col) in qr.selected.iter().enumerate() {
            let row_sq: f64 = r_inv[p].iter().map(|v| v * v).sum();
            std_errors[col] = (sigma_sq * row_sq).sqrt();
        }
    }

    Ok(OLSResult {
        coefficients,
        std_errors,
        ssr,
        nobs: n,
        rank,
    })
}

/// Residual sum of squares of a column-prefix model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NestedFit {
    /// Number of leading design columns in the model.
    pub columns: usize,
    /// Number of linearly independent columns among them.
    pub rank: usize,
    /// Sum of squared residuals.
    pub ssr: f64,
}

/// Fit every model made of the first `1..=k` design columns in one pass.
///
/// The reflections for the first `p` columns depend on those columns only,
/// so one decomposition yields the residual norm of every nested model.
pub fn nested_ssr(design: &[Vec<f64>], y: &[f64]) -> Result<Vec<NestedFit>> {
    let qr = QrDecomposition::new(design, y)?;
    let k = qr.cols.len();
    Ok((1..=k)
        .map(|columns| {
            let rank = qr.selected.iter().filter(|&&j| j < columns).count();
            let ssr = qr.qty[rank..].iter().map(|v| v * v).sum();
            NestedFit { columns, rank, ssr }
        })
        .collect())
}

/// Householder reduction of a design matrix, with `Q'y` alongside.
struct QrDecomposition {
    /// Column-major working copy, reduced in place to R.
    cols: Vec<Vec<f64>>,
    /// `Q'y`.
    qty: Vec<f64>,
    /// Independent columns, in order; column `selected[p]` owns row `p` of R.
    selected: Vec<usize>,
    nobs: usize,
}

impl QrDecomposition {
    fn new(design: &[Vec<f64>], y: &[f64]) -> Result<Self> {
        let n = design.len();
        if n == 0 {
            return Err(ForecastError::EmptyData);
        }
        if y.len() != n {
            return Err(ForecastError::DimensionMismatch {
                expected: n,
                got: y.len(),
            });
        }
        let k = design[0].len();
        if let Some(row) = design.iter().find(|row| row.len() != k) {
            return Err(ForecastError::DimensionMismatch {
                expected: k,
                got: row.len(),
            });
        }
        if design.iter().flatten().chain(y).any(|v| !v.is_finite()) {
            return Err(ForecastError::MissingValues);
        }

        let mut cols: Vec<Vec<f64>> = (0..k)
            .map(|j| design.iter().map(|row| row[j]).collect())
            .collect();
        let original_norms: Vec<f64> = cols.iter().map(|c| norm(c)).collect();
        let mut qty = y.to_vec();
        let mut selected: Vec<usize> = Vec::with_capacity(k);

        for j in 0..k {
            let row = selected.len();
            if row >= n {
                break;
            }
            let sub_norm = norm(&cols[j][row..]);
            if sub_norm == 0.0 || sub_norm <= RANK_TOLERANCE * original_norms[j] {
                continue;
            }

            let alpha = if cols[j][row] > 0.0 { -sub_norm } else { sub_norm };
            let mut v = cols[j][row..].to_vec();
            v[0] -= alpha;
            let v_norm_sq: f64 = v.iter().map(|x| x * x).sum();

            for col in cols.iter_mut().skip(j) {
                reflect(&v, v_norm_sq, &mut col[row..]);
            }
            reflect(&v, v_norm_sq, &mut qty[row..]);
            selected.push(j);
        }

        Ok(Self {
            cols,
            qty,
            selected,
            nobs: n,
        })
    }

    /// Inverse of the square R formed by the selected columns; row `p` of the
    /// result is row `p` of `R^-1`, so `(R'R)^-1` has diagonal `sum(row^2)`.
    fn r_inverse(&self) -> Vec<Vec<f64>> {
        let rank = self.selected.len();
        let r = |p: usize, q: usize| self.cols[self.selected[q]][p];
        let mut inv = vec![vec![0.0; rank]; rank];
        for q in 0..rank {
            inv[q][q] = 1.0 / r(q, q);
            for p in (0..q).rev() {
                let mut acc = 0.0;
                for m in p + 1..=q {
                    acc += r(p, m) * inv[m][q];
                }
                inv[p][q] = -acc / r(p, p);
            }
        }
        inv
    }
}

fn norm(values: &[f64]) -> f64 {
    values.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Apply the reflection `I - 2 v v' / |v|^2` to `target`.
fn reflect(v: &[f64], v_norm_sq: f64, target: &mut [f64]) {
    let dot: f64 = v.iter().zip(target.iter()).map(|(a, b)| a * b).sum();
    let factor = 2.0 * dot / v_norm_sq;
    for (t, vi) in target.iter_mut().zip(v) {
        *t -= factor * vi;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn with_intercept(x: &[f64]) -> Vec<Vec<f64>> {
        x.iter().map(|&v| vec![1.0, v]).collect()
    }

    #[test]
    fn ols_fit_simple_linear() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 + 2.0 * v).collect();

        let result = ols_fit(&with_intercept(&x), &y).unwrap();

        assert_relative_eq!(result.coefficients[0], 3.0, epsilon = 1e-10);
        assert_relative_eq!(result.coefficients[1], 2.0, epsilon = 1e-10);
        assert!(result.ssr < 1e-18);
        assert_eq!(result.rank, 2);
    }

    #[test]
    fn ols_fit_multiple_regressors() {
        let design: Vec<Vec<f64>> = (0..20)
            .map(|i| {
                let a = i as f64;
                let b = ((i * 7) % 5) as f64;
                vec![1.0, a, b]
            })
            .collect();
        let y: Vec<f64> = design.iter().map(|r| 1.0 + 0.5 * r[1] - 2.0 * r[2]).collect();

        let result = ols_fit(&design, &y).unwrap();
        assert_relative_eq!(result.coefficients[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(result.coefficients[1], 0.5, epsilon = 1e-9);
        assert_relative_eq!(result.coefficients[2], -2.0, epsilon = 1e-9);
        assert_relative_eq!(result.predict_row(&[1.0, 2.0, 3.0]), -4.0, epsilon = 1e-9);
    }

    #[test]
    fn ols_standard_error_matches_closed_form() {
        let x: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let noise = [0.3, -0.1, 0.4, -0.5, 0.2, 0.0, -0.3, 0.1, 0.5, -0.2, -0.4, 0.2];
        let y: Vec<f64> = x.iter().zip(noise).map(|(v, e)| 1.0 + 0.7 * v + e).collect();

        let result = ols_fit(&with_intercept(&x), &y).unwrap();

        let x_mean = x.iter().sum::<f64>() / x.len() as f64;
        let sxx: f64 = x.iter().map(|v| (v - x_mean).powi(2)).sum();
        let sigma_sq = result.ssr / (x.len() - 2) as f64;
        assert_relative_eq!(result.std_errors[1], (sigma_sq / sxx).sqrt(), epsilon = 1e-10);
        assert_relative_eq!(
            result.t_value(1),
            result.coefficients[1] / (sigma_sq / sxx).sqrt(),
            epsilon = 1e-8
        );
    }

    #[test]
    fn nested_fits_match_separate_fits() {
        let design: Vec<Vec<f64>> = (0..30)
            .map(|i| {
                let t = i as f64;
                vec![1.0, t, (t * 0.7).sin(), ((i * 13) % 7) as f64]
            })
            .collect();
        let y: Vec<f64> = design
            .iter()
            .enumerate()
            .map(|(i, r)| 2.0 - 0.1 * r[1] + 3.0 * r[2] + ((i * 5) % 3) as f64)
            .collect();

        let nested = nested_ssr(&design, &y).unwrap();
        assert_eq!(nested.len(), 4);
        for fit in &nested {
            let prefix: Vec<Vec<f64>> = design.iter().map(|r| r[..fit.columns].to_vec()).collect();
            let separate = ols_fit(&prefix, &y).unwrap();
            assert_eq!(fit.rank, separate.rank);
            assert_relative_eq!(fit.ssr, separate.ssr, epsilon = 1e-8, max_relative = 1e-10);
        }
        assert!(nested.windows(2).all(|w| w[1].ssr <= w[0].ssr + 1e-9));
    }

    #[test]
    fn ols_drops_dependent_columns() {
        let design: Vec<Vec<f64>> = (0..10).map(|i| vec![1.0, i as f64, 2.0 * i as f64]).collect();
        let y: Vec<f64> = (0..10).map(|i| 4.0 + i as f64).collect();

        let result = ols_fit(&design, &y).unwrap();
        assert_eq!(result.rank, 2);
        assert_eq!(result.coefficients[2], 0.0);
        assert!(result.std_errors[2].is_nan());
        assert!(result.ssr < 1e-18);
    }

    #[test]
    fn ols_handles_large_scale_columns() {
        let level: Vec<f64> = (0..50).map(|i| 1.3f64.powi(i) + 1e9).collect();
        let design: Vec<Vec<f64>> = level.iter().map(|&l| vec![1.0, l]).collect();
        let y: Vec<f64> = level.iter().map(|l| 0.3 * l - 2.0).collect();

        let result = ols_fit(&design, &y).unwrap();
        assert_relative_eq!(result.coefficients[1], 0.3, epsilon = 1e-8);
    }

    #[test]
    fn ols_fit_dimension_mismatch() {
        let design = vec![vec![1.0, 2.0], vec![1.0, 3.0]];
        assert!(matches!(
            ols_fit(&design, &[1.0]),
            Err(ForecastError::DimensionMismatch { expected: 2, got: 1 })
        ));

        let ragged = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(matches!(
            ols_fit(&ragged, &[1.0, 2.0]),
            Err(ForecastError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn ols_fit_rejects_empty_and_missing() {
        assert_eq!(ols_fit(&[], &[]), Err(ForecastError::EmptyData));
        let design = vec![vec![1.0, f64::NAN], vec![1.0, 3.0]];
        assert_eq!(ols_fit(&design, &[1.0, 2.0]), Err(ForecastError::MissingValues));
    }
}
