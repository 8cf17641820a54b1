//! Penalized least squares

use forecast_spi::{ForecastError, Result};

const PIVOT_EPS: f64 = 1e-12;

/// Solve `(XᵀX + diag(penalties)) β = Xᵀy` by Gauss-Jordan elimination with
/// partial pivoting.
///
/// `x` holds one row per observation. A column whose pivot vanishes gets a
/// zero coefficient.
pub fn ridge_solve(x: &[Vec<f64>], y: &[f64], penalties: &[f64]) -> Result<Vec<f64>> {
    let n = x.len();
    if n == 0 || n != y.len() {
        return Err(ForecastError::InvalidData(format!(
            "design matrix has {} rows for {} observations",
            n,
            y.len()
        )));
    }
    let p = x[0].len();
    if penalties.len() != p || x.iter().any(|row| row.len() != p) {
        return Err(ForecastError::InvalidData(
            "design matrix rows and penalties disagree in width".to_string(),
        ));
    }

    let mut a = vec![vec![0.0; p]; p];
    let mut b = vec![0.0; p];
    for (row, &yi) in x.iter().zip(y) {
        for i in 0..p {
            let xi = row[i];
            if xi == 0.0 {
                continue;
            }
            b[i] += xi * yi;
            for j in 0..p {
                a[i][j] += xi * row[j];
            }
        }
    }
    for (d, penalty) in penalties.iter().enumerate() {
        a[d][d] += penalty;
    }

    let mut singular = vec![false; p];
    for i in 0..p {
        let pivot_row = (i..p)
            .max_by(|&r, &s| a[r][i].abs().total_cmp(&a[s][i].abs()))
            .unwrap_or(i);
        if pivot_row != i {
            a.swap(i, pivot_row);
            b.swap(i, pivot_row);
        }
        let pivot = a[i][i];
        if pivot.abs() < PIVOT_EPS {
            singular[i] = true;
            continue;
        }
        let inv = 1.0 / pivot;
        for j in i..p {
            a[i][j] *= inv;
        }
        b[i] *= inv;
        for r in 0..p {
            if r == i {
                continue;
            }
            let factor = a[r][i];
            if factor == 0.0 {
                continue;
            }
            for j in i..p {
                a[r][j] -= factor * a[i][j];
            }
            b[r] -= factor * b[i];
        }
    }

    for (coef, _) in b.iter_mut().zip(&singular).filter(|(_, s)| **s) {
        *coef = 0.0;
    }
    if b.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::NumericalError(
            "least squares solution is not finite".to_string(),
        ));
    }
    Ok(b)
}
