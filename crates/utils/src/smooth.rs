//! Windowed transforms over float columns.

use polars::prelude::*;

use crate::UtilsError;

/// Trailing mean over `window` rows.
///
/// A row is null until `window` defined values fall inside its window.
///
/// # Errors
/// Returns `UtilsError::InvalidParameter` if `window` is zero.
pub fn trailing_mean(expr: Expr, window: usize) -> Result<Expr, UtilsError> {
    if window == 0 {
        return Err(UtilsError::InvalidParameter("window must be positive".into()));
    }
    Ok(expr.rolling_mean(RollingOptionsFixedWindow {
        window_size: window,
        min_periods: window,
        ..Default::default()
    }))
}

/// Row-over-row relative change, `x[t] / x[t-1] - 1`.
///
/// Null on the first row and wherever the change is not finite.
pub fn relative_change(expr: Expr) -> Expr {
    finite(expr.pct_change(lit(1)))
}

/// `expr` with NaN and infinities replaced by null.
pub fn finite(expr: Expr) -> Expr {
    when(expr.clone().is_finite()).then(expr).otherwise(lit(NULL))
}
