//! Momentum factor implementation.

use fama_primitives::FactorName;
use fama_utils::{relative_change, trailing_mean};
use polars::prelude::*;

use crate::FactorError;

/// Configuration for momentum factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MomentumConfig {
    /// Trailing window, in trading days, of the smoothed market return.
    pub window: usize,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self { window: 12 }
    }
}

/// Market momentum (UMD).
///
/// Smooths market returns with a trailing mean, takes the day-over-day
/// relative change of the smoothed series, and demeans it over every day
/// where it is defined.
#[derive(Debug, Clone)]
pub struct MomentumFactor {
    config: MomentumConfig,
}

impl MomentumFactor {
    /// Create a new momentum factor with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MomentumConfig::default())
    }

    /// Create a momentum factor with custom configuration.
    #[must_use]
    pub const fn with_config(config: MomentumConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &MomentumConfig {
        &self.config
    }

    /// Column this factor fills.
    #[must_use]
    pub const fn name(&self) -> FactorName {
        FactorName::Umd
    }

    /// Momentum over the `market` return column, aliased `UMD`.
    ///
    /// The first `window` rows are always null: `window - 1` for the trailing
    /// mean and one for the relative change.
    ///
    /// # Errors
    /// Returns `FactorError::InvalidConfig` if the window is zero.
    pub fn expr(&self, market: &str) -> Result<Expr, FactorError> {
        if self.config.window == 0 {
            return Err(FactorError::InvalidConfig("momentum window must be positive".into()));
        }

        let change = relative_change(trailing_mean(col(market), self.config.window)?);
        Ok((change.clone() - change.mean()).alias(self.name().as_str()))
    }

    /// Add the `UMD` column to `data` from its `market` column.
    ///
    /// Rows must already be in date order.
    ///
    /// # Errors
    /// Returns `FactorError::InvalidConfig` if the window is zero.
    pub fn compute(&self, data: LazyFrame, market: &str) -> Result<LazyFrame, FactorError> {
        Ok(data.with_column(self.expr(market)?))
    }
}

impl Default for MomentumFactor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn umd(factor: &MomentumFactor, market: &[Option<f64>]) -> Vec<Option<f64>> {
        let df = df! { "mkt" => market }.unwrap();
        let out = factor.compute(df.lazy(), "mkt").unwrap().collect().unwrap();
        out.column("UMD").unwrap().f64().unwrap().into_iter().collect()
    }

    fn window(window: usize) -> MomentumFactor {
        MomentumFactor::with_config(MomentumConfig { window })
    }

    #[test]
    fn momentum_config_defaults() {
        assert_eq!(MomentumConfig::default().window, 12);
        assert_eq!(MomentumFactor::new().name(), FactorName::Umd);
    }

    #[test]
    fn leading_entries_undefined() {
        let market: Vec<Option<f64>> = (1..=20).map(|i| Some(0.001 * f64::from(i))).collect();
        let umd = umd(&MomentumFactor::new(), &market);

        assert_eq!(umd.len(), 20);
        assert!(umd[..12].iter().all(Option::is_none));
        assert!(umd[12..].iter().all(Option::is_some));
    }

    #[test]
    fn output_is_demeaned() {
        let market: Vec<Option<f64>> =
            (0..40).map(|i| Some(0.01 + 0.002 * (f64::from(i) * 0.7).sin())).collect();
        let umd = umd(&window(5), &market);

        let defined: Vec<f64> = umd.into_iter().flatten().collect();
        assert_eq!(defined.len(), 35);
        let mean = defined.iter().sum::<f64>() / defined.len() as f64;
        assert_relative_eq!(mean, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn hand_computed_window_two() {
        // Trailing means: -, 2, 3, 5. Changes: -, -, 0.5, 2/3. Mean 7/12.
        let umd = umd(&window(2), &[Some(1.0), Some(3.0), Some(3.0), Some(7.0)]);

        assert_eq!(umd[0], None);
        assert_eq!(umd[1], None);
        assert_relative_eq!(umd[2].unwrap(), 0.5 - 7.0 / 12.0, epsilon = 1e-12);
        assert_relative_eq!(umd[3].unwrap(), 2.0 / 3.0 - 7.0 / 12.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_zero_window() {
        let df = df! { "mkt" => &[0.01] }.unwrap();
        assert!(matches!(window(0).compute(df.lazy(), "mkt"), Err(FactorError::InvalidConfig(_))));
    }

    #[test]
    fn short_history_is_all_undefined() {
        let umd = umd(&MomentumFactor::new(), &[Some(0.01); 5]);
        assert_eq!(umd, vec![None; 5]);
    }
}
