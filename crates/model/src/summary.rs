//! Fitted model and its printable summary.

use std::fmt;

use fama_math::OlsResult;
use fama_primitives::ModelVariant;
use polars::prelude::*;

use crate::{AlignedData, AlignmentReport, ModelError, align::RESPONSE};

const RULE_HEAVY: &str =
    "==============================================================================";
const RULE_LIGHT: &str =
    "------------------------------------------------------------------------------";

/// A fitted Fama-French regression for one ticker.
#[derive(Debug, Clone)]
pub struct FittedModel {
    ticker: String,
    regressors: Vec<String>,
    result: OlsResult,
    data: AlignedData,
    alignment: AlignmentReport,
}

impl FittedModel {
    pub(crate) const fn new(
        ticker: String,
        regressors: Vec<String>,
        result: OlsResult,
        data: AlignedData,
        alignment: AlignmentReport,
    ) -> Self {
        Self { ticker, regressors, result, data, alignment }
    }

    /// Ticker the model was fitted for.
    #[must_use]
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Factor model variant.
    #[must_use]
    pub const fn variant(&self) -> ModelVariant {
        self.data.variant()
    }

    /// Design matrix column names, `const` first.
    #[must_use]
    pub fn regressors(&self) -> &[String] {
        &self.regressors
    }

    /// Number of design matrix columns.
    #[must_use]
    pub fn design_width(&self) -> usize {
        self.regressors.len()
    }

    /// Full estimation output.
    #[must_use]
    pub const fn ols(&self) -> &OlsResult {
        &self.result
    }

    /// The aligned data the model was fitted on.
    #[must_use]
    pub const fn data(&self) -> &AlignedData {
        &self.data
    }

    /// Row accounting from alignment.
    #[must_use]
    pub const fn alignment(&self) -> &AlignmentReport {
        &self.alignment
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.regressors.iter().position(|r| r == name)
    }

    /// Coefficient of `name`; NaN if the regressor was aliased.
    #[must_use]
    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.position(name).map(|j| self.result.coefficients[j])
    }

    /// Standard error of `name`.
    #[must_use]
    pub fn std_error(&self, name: &str) -> Option<f64> {
        self.position(name).map(|j| self.result.std_errors[j])
    }

    /// Two-sided p value of `name`.
    #[must_use]
    pub fn p_value(&self, name: &str) -> Option<f64> {
        self.position(name).map(|j| self.result.p_values[j])
    }

    /// Intercept (daily alpha).
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.result.coefficients[0]
    }

    /// `(name, coefficient)` pairs in design order.
    pub fn params(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.regressors.iter().map(String::as_str).zip(self.result.coefficients.iter().copied())
    }

    /// Regressors excluded from the solve as exactly collinear.
    pub fn aliased(&self) -> impl Iterator<Item = &str> + '_ {
        self.regressors
            .iter()
            .zip(&self.result.aliased)
            .filter_map(|(name, &aliased)| aliased.then_some(name.as_str()))
    }

    /// Number of observations.
    #[must_use]
    pub const fn n_obs(&self) -> usize {
        self.result.n_obs
    }

    /// Coefficient of determination.
    #[must_use]
    pub const fn r_squared(&self) -> f64 {
        self.result.r_squared
    }

    /// Adjusted coefficient of determination.
    #[must_use]
    pub const fn adj_r_squared(&self) -> f64 {
        self.result.adj_r_squared
    }

    /// Coefficient table with one row per regressor.
    ///
    /// # Errors
    /// Returns an error if polars rejects the frame.
    pub fn coefficients_frame(&self) -> Result<DataFrame, ModelError> {
        let r = &self.result;
        let df = DataFrame::new(vec![
            Column::new("factor".into(), self.regressors.clone()),
            Column::new("coef".into(), r.coefficients.to_vec()),
            Column::new("std_err".into(), r.std_errors.to_vec()),
            Column::new("t".into(), r.t_values.to_vec()),
            Column::new("p_value".into(), r.p_values.to_vec()),
            Column::new("ci_lower".into(), r.conf_lower.to_vec()),
            Column::new("ci_upper".into(), r.conf_upper.to_vec()),
        ])?;
        Ok(df)
    }

    /// Regression report in the layout of a statsmodels OLS summary.
    #[must_use]
    pub const fn summary(&self) -> Summary<'_> {
        Summary(self)
    }
}

/// Printable report returned by [`FittedModel::summary`].
#[derive(Debug, Clone, Copy)]
pub struct Summary<'a>(&'a FittedModel);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.0;
        let r = &m.result;
        let sample = m.data.dates();
        let (first, last) = match (sample.first(), sample.last()) {
            (Some(first), Some(last)) => (first.to_string(), last.to_string()),
            _ => ("-".to_string(), "-".to_string()),
        };
        let resid_se = if r.df_resid > 0.0 { (r.ssr / r.df_resid).sqrt() } else { f64::NAN };

        writeln!(f, "{:^78}", "OLS Regression Results")?;
        writeln!(f, "{RULE_HEAVY}")?;
        row(f, "Dep. Variable:", RESPONSE, "R-squared:", &num(r.r_squared, 3))?;
        row(f, "Ticker:", &m.ticker, "Adj. R-squared:", &num(r.adj_r_squared, 3))?;
        row(f, "Model:", m.variant().as_str(), "F-statistic:", &num(r.f_statistic, 2))?;
        row(f, "Method:", "Least Squares", "Prob (F-statistic):", &sci(r.f_p_value))?;
        row(f, "Sample:", &first, "Log-Likelihood:", &num(r.log_likelihood, 2))?;
        row(f, "", &format!("- {last}"), "AIC:", &num(r.aic, 1))?;
        row(f, "No. Observations:", &r.n_obs.to_string(), "BIC:", &num(r.bic, 1))?;
        let dw = num(r.durbin_watson, 3);
        row(f, "Df Residuals:", &r.df_resid.to_string(), "Durbin-Watson:", &dw)?;
        row(f, "Df Model:", &r.df_model.to_string(), "Resid. Std. Err.:", &num(resid_se, 5))?;
        row(f, "Covariance Type:", "nonrobust", "", "")?;
        writeln!(f, "{RULE_HEAVY}")?;

        let alpha = 1.0 - r.confidence_level;
        writeln!(
            f,
            "{:<14}{:>10}{:>11}{:>11}{:>9}{:>12}{:>11}",
            "",
            "coef",
            "std err",
            "t",
            "P>|t|",
            format!("[{:.3}", alpha / 2.0),
            format!("{:.3}]", 1.0 - alpha / 2.0),
        )?;
        writeln!(f, "{RULE_LIGHT}")?;
        for (j, name) in m.regressors.iter().enumerate() {
            writeln!(
                f,
                "{:<14}{:>10}{:>11}{:>11}{:>9}{:>12}{:>11}",
                name,
                num(r.coefficients[j], 4),
                num(r.std_errors[j], 3),
                num(r.t_values[j], 3),
                num(r.p_values[j], 3),
                num(r.conf_lower[j], 3),
                num(r.conf_upper[j], 3),
            )?;
        }
        writeln!(f, "{RULE_HEAVY}")?;

        let aliased: Vec<&str> = m.aliased().collect();
        writeln!(f, "\nNotes:")?;
        writeln!(
            f,
            "[1] Standard Errors assume that the covariance matrix of the errors is correctly \
             specified."
        )?;
        if !aliased.is_empty() {
            writeln!(
                f,
                "[2] {} exactly collinear with earlier regressors; coefficients not identified.",
                aliased.join(", ")
            )?;
        }
        if m.alignment.rows_dropped > 0 || m.alignment.ticker_filled > 0 {
            writeln!(
                f,
                "[{}] {} of {} factor dates used; {} ticker returns forward-filled.",
                if aliased.is_empty() { 2 } else { 3 },
                m.alignment.rows_used,
                m.alignment.factor_rows,
                m.alignment.ticker_filled,
            )?;
        }
        Ok(())
    }
}

fn row(f: &mut fmt::Formatter<'_>, left: &str, lval: &str, right: &str, rval: &str) -> fmt::Result {
    writeln!(f, "{left:<20}{lval:>18}   {right:<20}{rval:>17}")
}

fn num(v: f64, precision: usize) -> String {
    if v.is_nan() { "nan".to_string() } else { format!("{v:.precision$}") }
}

fn sci(v: f64) -> String {
    if v.is_nan() { "nan".to_string() } else { format!("{v:.2e}") }
}
