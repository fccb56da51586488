//! Distribution helpers for regression inference.

use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

/// Two-sided p value of a t statistic with `df` degrees of freedom.
///
/// An infinite statistic (zero standard error) has p value 0. NaN in, or a
/// non-positive `df`, gives NaN.
#[must_use]
pub fn student_t_p_value(t: f64, df: f64) -> f64 {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if t.is_infinite() {
        return 0.0;
    }
    StudentsT::new(0.0, 1.0, df)
        .map(|dist| (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0))
        .unwrap_or(f64::NAN)
}

/// Quantile of the standard Student-t distribution with `df` degrees of freedom.
#[must_use]
pub fn student_t_quantile(p: f64, df: f64) -> f64 {
    if df.is_nan() || df <= 0.0 || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    StudentsT::new(0.0, 1.0, df).map(|dist| dist.inverse_cdf(p)).unwrap_or(f64::NAN)
}

/// Upper-tail p value of an F statistic with `(df_num, df_den)` degrees of freedom.
#[must_use]
pub fn f_test_p_value(f: f64, df_num: f64, df_den: f64) -> f64 {
    if f.is_nan() || df_num <= 0.0 || df_den <= 0.0 {
        return f64::NAN;
    }
    if f.is_infinite() {
        return 0.0;
    }
    FisherSnedecor::new(df_num, df_den)
        .map(|dist| (1.0 - dist.cdf(f.max(0.0))).clamp(0.0, 1.0))
        .unwrap_or(f64::NAN)
}
