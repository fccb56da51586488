//! Linear algebra operations for factor regressions.

use ndarray::{Array1, Array2, Axis};

use crate::{MathError, f_test_p_value, student_t_p_value, student_t_quantile};

/// Configuration for [`ordinary_least_squares`].
#[derive(Debug, Clone, Copy)]
pub struct OlsConfig {
    /// Relative residual norm below which a column counts as a linear
    /// combination of the columns before it.
    pub collinearity_tolerance: f64,
    /// Coverage of the reported coefficient confidence intervals.
    pub confidence_level: f64,
}

impl Default for OlsConfig {
    fn default() -> Self {
        Self { collinearity_tolerance: 1e-10, confidence_level: 0.95 }
    }
}

/// Result of an ordinary least squares fit.
///
/// Per-coefficient arrays have one entry per design-matrix column. Aliased
/// columns (not identifiable from the data) carry NaN in every one of them.
#[derive(Debug, Clone)]
pub struct OlsResult {
    /// Estimated coefficients.
    pub coefficients: Array1<f64>,
    /// Standard errors of the coefficients.
    pub std_errors: Array1<f64>,
    /// t statistics.
    pub t_values: Array1<f64>,
    /// Two-sided p values.
    pub p_values: Array1<f64>,
    /// Lower confidence bounds.
    pub conf_lower: Array1<f64>,
    /// Upper confidence bounds.
    pub conf_upper: Array1<f64>,
    /// Whether each column was dropped as collinear.
    pub aliased: Vec<bool>,
    /// Fitted values.
    pub fitted: Array1<f64>,
    /// Residuals.
    pub residuals: Array1<f64>,
    /// Number of observations.
    pub n_obs: usize,
    /// Rank of the design matrix.
    pub rank: usize,
    /// Whether the design matrix has a constant column.
    pub has_constant: bool,
    /// Model degrees of freedom (rank minus the constant).
    pub df_model: f64,
    /// Residual degrees of freedom.
    pub df_resid: f64,
    /// Sum of squared residuals.
    pub ssr: f64,
    /// R-squared (centered when a constant is present).
    pub r_squared: f64,
    /// Adjusted R-squared.
    pub adj_r_squared: f64,
    /// F statistic for all non-constant coefficients being zero.
    pub f_statistic: f64,
    /// p value of the F statistic.
    pub f_p_value: f64,
    /// Gaussian log-likelihood.
    pub log_likelihood: f64,
    /// Akaike information criterion.
    pub aic: f64,
    /// Bayesian information criterion.
    pub bic: f64,
    /// Durbin-Watson statistic of the residuals.
    pub durbin_watson: f64,
    /// Confidence level used for the bounds.
    pub confidence_level: f64,
}

/// Fit `y = X * beta + e` by ordinary least squares.
///
/// Columns are screened in order with modified Gram-Schmidt; a column whose
/// component orthogonal to the earlier kept columns is negligible is aliased
/// and excluded from the solve. The remaining system is solved through the
/// normal equations.
///
/// # Arguments
/// * `y` - Response vector (n,)
/// * `x` - Design matrix (n x p)
/// * `config` - Collinearity tolerance and confidence level
///
/// # Errors
/// Returns error if dimensions mismatch, inputs are empty or non-finite, or
/// every column is aliased.
pub fn ordinary_least_squares(
    y: &Array1<f64>,
    x: &Array2<f64>,
    config: &OlsConfig,
) -> Result<OlsResult, MathError> {
    let n = y.len();
    let p = x.ncols();

    if x.nrows() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: x.nrows() });
    }
    if n == 0 || p == 0 {
        return Err(MathError::EmptyData);
    }
    if !(config.confidence_level > 0.0 && config.confidence_level < 1.0) {
        return Err(MathError::InvalidConfidence(config.confidence_level));
    }
    if y.iter().chain(x.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::NumericalInstability("non-finite input".to_string()));
    }

    let aliased = aliased_columns(x, config.collinearity_tolerance);
    let kept: Vec<usize> = (0..p).filter(|&j| !aliased[j]).collect();
    let rank = kept.len();
    if rank == 0 {
        return Err(MathError::LinearAlgebra("design matrix has rank zero".to_string()));
    }

    let x_kept = x.select(Axis(1), &kept);
    let xtx_inv = invert_matrix(&x_kept.t().dot(&x_kept))?;
    let beta = xtx_inv.dot(&x_kept.t().dot(y));

    let fitted = x_kept.dot(&beta);
    let residuals = y - &fitted;
    let ssr: f64 = residuals.iter().map(|r| r.powi(2)).sum();

    let has_constant = (0..p).any(|j| is_constant_column(x, j));
    let k_constant = if has_constant { 1.0 } else { 0.0 };
    let nf = n as f64;
    let df_resid = (n - rank) as f64;
    let df_model = rank as f64 - k_constant;
    let scale = if df_resid > 0.0 { ssr / df_resid } else { f64::NAN };

    // Total sum of squares about the mean when an intercept is present.
    let y_mean = y.mean().unwrap_or(0.0);
    let tss: f64 = if has_constant {
        y.iter().map(|yi| (yi - y_mean).powi(2)).sum()
    } else {
        y.iter().map(|yi| yi.powi(2)).sum()
    };
    let r_squared = if tss > 0.0 { 1.0 - ssr / tss } else { f64::NAN };
    let adj_r_squared = if df_resid > 0.0 {
        1.0 - (nf - k_constant) / df_resid * (1.0 - r_squared)
    } else {
        f64::NAN
    };
    let f_statistic = if df_model > 0.0 && df_resid > 0.0 {
        ((tss - ssr) / df_model) / scale
    } else {
        f64::NAN
    };
    let f_p_value = f_test_p_value(f_statistic, df_model, df_resid);

    let log_likelihood = -nf / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (ssr / nf).ln() + 1.0);
    let aic = -2.0 * log_likelihood + 2.0 * rank as f64;
    let bic = -2.0 * log_likelihood + nf.ln() * rank as f64;
    let durbin_watson = if ssr > 0.0 {
        residuals.iter().zip(residuals.iter().skip(1)).map(|(a, b)| (b - a).powi(2)).sum::<f64>()
            / ssr
    } else {
        f64::NAN
    };

    let q = student_t_quantile(1.0 - (1.0 - config.confidence_level) / 2.0, df_resid);

    let mut coefficients = Array1::from_elem(p, f64::NAN);
    let mut std_errors = Array1::from_elem(p, f64::NAN);
    let mut t_values = Array1::from_elem(p, f64::NAN);
    let mut p_values = Array1::from_elem(p, f64::NAN);
    let mut conf_lower = Array1::from_elem(p, f64::NAN);
    let mut conf_upper = Array1::from_elem(p, f64::NAN);

    for (i, &j) in kept.iter().enumerate() {
        let se = (scale * xtx_inv[[i, i]]).sqrt();
        let t = beta[i] / se;
        coefficients[j] = beta[i];
        std_errors[j] = se;
        t_values[j] = t;
        p_values[j] = student_t_p_value(t, df_resid);
        conf_lower[j] = beta[i] - q * se;
        conf_upper[j] = beta[i] + q * se;
    }

    Ok(OlsResult {
        coefficients,
        std_errors,
        t_values,
        p_values,
        conf_lower,
        conf_upper,
        aliased,
        fitted,
        residuals,
        n_obs: n,
        rank,
        has_constant,
        df_model,
        df_resid,
        ssr,
        r_squared,
        adj_r_squared,
        f_statistic,
        f_p_value,
        log_likelihood,
        aic,
        bic,
        durbin_watson,
        confidence_level: config.confidence_level,
    })
}

/// Flag columns that are (numerically) linear combinations of earlier columns.
fn aliased_columns(x: &Array2<f64>, tolerance: f64) -> Vec<bool> {
    let mut basis: Vec<Array1<f64>> = Vec::new();
    let mut aliased = Vec::with_capacity(x.ncols());

    for column in x.columns() {
        let norm = column.dot(&column).sqrt();
        let mut residual = column.to_owned();
        for q in &basis {
            let projection = q.dot(&residual);
            residual.scaled_add(-projection, q);
        }
        let residual_norm = residual.dot(&residual).sqrt();

        if norm > 0.0 && residual_norm > tolerance * norm {
            basis.push(residual / residual_norm);
            aliased.push(false);
        } else {
            aliased.push(true);
        }
    }

    aliased
}

fn is_constant_column(x: &Array2<f64>, j: usize) -> bool {
    let column = x.column(j);
    match column.iter().next() {
        Some(&first) if first != 0.0 => column.iter().all(|&v| v == first),
        _ => false,
    }
}

/// Invert a square matrix using Gauss-Jordan elimination with partial pivoting.
///
/// # Errors
/// Returns error if the matrix is empty, not square, or singular.
pub fn invert_matrix(a: &Array2<f64>) -> Result<Array2<f64>, MathError> {
    let n = a.nrows();
    if n == 0 {
        return Err(MathError::EmptyData);
    }
    if a.ncols() != n {
        return Err(MathError::LinearAlgebra("matrix must be square".to_string()));
    }

    // Augmented matrix [A | I]
    let mut aug = Array2::zeros((n, 2 * n));
    for i in 0..n {
        for j in 0..n {
            aug[[i, j]] = a[[i, j]];
        }
        aug[[i, n + i]] = 1.0;
    }

    let scale = a.iter().fold(0.0_f64, |acc, v| acc.max(v.abs())).max(f64::MIN_POSITIVE);

    for col in 0..n {
        // Find pivot
        let mut max_row = col;
        let mut max_val = aug[[col, col]].abs();
        for row in (col + 1)..n {
            if aug[[row, col]].abs() > max_val {
                max_val = aug[[row, col]].abs();
                max_row = row;
            }
        }

        if max_val < 1e-14 * scale {
            return Err(MathError::LinearAlgebra(
                "matrix is singular or nearly singular".to_string(),
            ));
        }

        // Swap rows
        if max_row != col {
            for j in 0..2 * n {
                aug.swap([col, j], [max_row, j]);
            }
        }

        let pivot = aug[[col, col]];
        for j in 0..2 * n {
            aug[[col, j]] /= pivot;
        }

        // Eliminate column in every other row
        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = aug[[row, col]];
            if factor != 0.0 {
                for j in col..2 * n {
                    aug[[row, j]] -= factor * aug[[col, j]];
                }
            }
        }
    }

    let mut inverse = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            inverse[[i, j]] = aug[[i, n + j]];
        }
    }

    Ok(inverse)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};

    use super::*;

    fn with_intercept(columns: &[&[f64]]) -> Array2<f64> {
        let n = columns[0].len();
        let p = columns.len() + 1;
        Array2::from_shape_fn((n, p), |(i, j)| if j == 0 { 1.0 } else { columns[j - 1][i] })
    }

    #[test]
    fn ols_simple_regression() {
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let x = with_intercept(&[&[1.0, 2.0, 3.0, 4.0, 5.0]]);

        let result = ordinary_least_squares(&y, &x, &OlsConfig::default()).unwrap();

        // Perfect fit: y = 0 + 1*x
        assert_relative_eq!(result.coefficients[0], 0.0, epsilon = 1e-10);
        assert_relative_eq!(result.coefficients[1], 1.0, epsilon = 1e-10);
        assert_relative_eq!(result.r_squared, 1.0, epsilon = 1e-10);
        assert_eq!(result.rank, 2);
        assert!(result.has_constant);
    }

    #[test]
    fn ols_matches_closed_form_statistics() {
        // y = 1 + 2x + noise, hand-checked against the textbook formulas.
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = array![3.1, 4.9, 7.2, 8.8, 11.1, 13.0];
        let x = with_intercept(&[&xs]);

        let result = ordinary_least_squares(&y, &x, &OlsConfig::default()).unwrap();

        let x_mean = 3.5;
        let y_mean = y.mean().unwrap();
        let sxx: f64 = xs.iter().map(|v| (v - x_mean).powi(2)).sum();
        let sxy: f64 = xs.iter().zip(y.iter()).map(|(a, b)| (a - x_mean) * (b - y_mean)).sum();
        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;
        let ssr: f64 =
            xs.iter().zip(y.iter()).map(|(a, b)| (b - intercept - slope * a).powi(2)).sum();
        let sigma2 = ssr / 4.0;

        assert_relative_eq!(result.coefficients[1], slope, epsilon = 1e-10);
        assert_relative_eq!(result.coefficients[0], intercept, epsilon = 1e-10);
        assert_relative_eq!(result.std_errors[1], (sigma2 / sxx).sqrt(), epsilon = 1e-10);
        assert_relative_eq!(result.ssr, ssr, epsilon = 1e-10);
        assert_relative_eq!(result.df_resid, 4.0);
        assert_relative_eq!(result.df_model, 1.0);
        assert!(result.conf_lower[1] < slope && slope < result.conf_upper[1]);
        assert!(result.p_values[1] < 1e-4);
        // With one regressor the F statistic is the squared t statistic.
        assert_relative_eq!(result.f_statistic, result.t_values[1].powi(2), epsilon = 1e-6);
    }

    #[test]
    fn zero_variance_regressors_are_aliased() {
        let n = 20;
        let y = Array1::from_elem(n, 0.01);
        let x = with_intercept(&[&vec![0.005; n], &vec![0.0; n], &vec![0.0; n]]);

        let result = ordinary_least_squares(&y, &x, &OlsConfig::default()).unwrap();

        assert_eq!(result.aliased, vec![false, true, true, true]);
        assert_eq!(result.rank, 1);
        assert_relative_eq!(result.coefficients[0], 0.01, epsilon = 1e-12);
        for j in 1..4 {
            assert!(result.coefficients[j].is_nan());
            assert!(result.std_errors[j].is_nan());
            assert!(result.p_values[j].is_nan());
        }
        assert_relative_eq!(result.ssr, 0.0, epsilon = 1e-20);
    }

    #[test]
    fn duplicated_column_is_aliased() {
        let y = array![0.3, 0.1, 0.4, 0.2, 0.6, 0.5];
        let a = [1.0, -1.0, 2.0, 0.5, 3.0, 1.5];
        let x = with_intercept(&[&a, &a]);

        let result = ordinary_least_squares(&y, &x, &OlsConfig::default()).unwrap();

        assert_eq!(result.aliased, vec![false, false, true]);
        assert!(result.coefficients[2].is_nan());
        assert!(result.coefficients[1].is_finite());
    }

    #[test]
    fn ols_without_intercept_uses_uncentered_r_squared() {
        let y = array![2.0, 4.0, 6.1];
        let x = Array2::from_shape_vec((3, 1), vec![1.0, 2.0, 3.0]).unwrap();

        let result = ordinary_least_squares(&y, &x, &OlsConfig::default()).unwrap();

        assert!(!result.has_constant);
        assert_relative_eq!(result.df_model, 1.0);
        assert!(result.r_squared > 0.99);
    }

    #[test]
    fn ols_rejects_bad_input() {
        let config = OlsConfig::default();
        let y = array![1.0, 2.0];
        let x = Array2::from_shape_vec((3, 1), vec![1.0, 1.0, 1.0]).unwrap();
        assert!(matches!(
            ordinary_least_squares(&y, &x, &config),
            Err(MathError::DimensionMismatch { expected: 2, actual: 3 })
        ));

        let empty = Array1::<f64>::zeros(0);
        let x = Array2::<f64>::zeros((0, 2));
        assert!(matches!(ordinary_least_squares(&empty, &x, &config), Err(MathError::EmptyData)));

        let y = array![1.0, f64::NAN];
        let x = Array2::from_elem((2, 1), 1.0);
        assert!(matches!(
            ordinary_least_squares(&y, &x, &config),
            Err(MathError::NumericalInstability(_))
        ));

        let y = array![1.0, 2.0];
        let x = Array2::zeros((2, 2));
        assert!(matches!(
            ordinary_least_squares(&y, &x, &config),
            Err(MathError::LinearAlgebra(_))
        ));

        let bad = OlsConfig { confidence_level: 1.0, ..OlsConfig::default() };
        let x = Array2::from_elem((2, 1), 1.0);
        assert!(matches!(
            ordinary_least_squares(&y, &x, &bad),
            Err(MathError::InvalidConfidence(_))
        ));
    }

    #[test]
    fn invert_round_trip() {
        let a = array![[4.0, 7.0], [2.0, 6.0]];
        let inv = invert_matrix(&a).unwrap();
        let identity = a.dot(&inv);

        assert_relative_eq!(identity[[0, 0]], 1.0, epsilon = 1e-12);
        assert_relative_eq!(identity[[0, 1]], 0.0, epsilon = 1e-12);
        assert_relative_eq!(identity[[1, 0]], 0.0, epsilon = 1e-12);
        assert_relative_eq!(identity[[1, 1]], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn invert_singular_fails() {
        let a = array![[1.0, 2.0], [2.0, 4.0]];
        assert!(matches!(invert_matrix(&a), Err(MathError::LinearAlgebra(_))));
    }
}
