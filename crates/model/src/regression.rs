//! Fama-French regression runner.

use fama_factors::{BuilderConfig, FactorBuilder};
use fama_math::{OlsConfig, ordinary_least_squares};
use fama_primitives::{Date, FactorTable, ModelVariant, ReturnSeries};
use fama_traits::PriceSource;
use tracing::{debug, info, warn};

use crate::{FittedModel, ModelError, align::align, get_stock_data};

/// Configuration for [`FamaFrenchModel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionConfig {
    /// Factor construction settings.
    pub builder: BuilderConfig,
    /// Relative tolerance below which a regressor counts as collinear.
    pub collinearity_tolerance: f64,
    /// Coverage of the reported confidence intervals.
    pub confidence_level: f64,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        let ols = OlsConfig::default();
        Self {
            builder: BuilderConfig::default(),
            collinearity_tolerance: ols.collinearity_tolerance,
            confidence_level: ols.confidence_level,
        }
    }
}

impl RegressionConfig {
    const fn ols(&self) -> OlsConfig {
        OlsConfig {
            collinearity_tolerance: self.collinearity_tolerance,
            confidence_level: self.confidence_level,
        }
    }
}

/// Fetches data from a [`PriceSource`] and fits Fama-French regressions.
///
/// Each run fetches the ticker and every factor proxy afresh.
#[derive(Debug, Clone)]
pub struct FamaFrenchModel<S> {
    source: S,
    config: RegressionConfig,
}

impl<S: PriceSource> FamaFrenchModel<S> {
    /// Create a model runner with default configuration.
    pub fn new(source: S) -> Self {
        Self { source, config: RegressionConfig::default() }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: RegressionConfig) -> Self {
        self.config = config;
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &RegressionConfig {
        &self.config
    }

    /// Build the full factor table for `start <= date < end`.
    ///
    /// # Errors
    /// See [`FactorBuilder::build`].
    pub fn factors(&self, start: Date, end: Date) -> Result<FactorTable, ModelError> {
        Ok(FactorBuilder::new(&self.source).with_config(self.config.builder).build(start, end)?)
    }

    /// Regress `ticker`'s excess returns on the `variant` factors.
    ///
    /// # Errors
    /// Returns `ModelError` if the arguments are invalid, data is unavailable,
    /// or the regression cannot be computed.
    pub fn run(
        &self,
        ticker: &str,
        start: Date,
        end: Date,
        variant: ModelVariant,
    ) -> Result<FittedModel, ModelError> {
        if start >= end {
            return Err(ModelError::InvalidRange { start, end });
        }

        let returns = get_stock_data(&self.source, ticker, start, end)?;
        let factors = self.factors(start, end)?;
        self.regress(ticker.trim(), &returns, &factors, variant)
    }

    /// Fit `variant` to already fetched data with this runner's settings.
    ///
    /// # Errors
    /// As [`regress`].
    pub fn regress(
        &self,
        ticker: &str,
        returns: &ReturnSeries,
        factors: &FactorTable,
        variant: ModelVariant,
    ) -> Result<FittedModel, ModelError> {
        fit(ticker, returns, factors, variant, &self.config)
    }
}

/// Fit `variant` to ticker returns and a prepared factor table.
///
/// Runs with default estimation settings and performs no fetching.
///
/// # Errors
/// Returns `ModelError::MissingColumn` if the table lacks RF or a selected
/// factor, `ModelError::InsufficientData` if too few rows align, and
/// `ModelError::Math` if the solver fails.
pub fn regress(
    ticker: &str,
    returns: &ReturnSeries,
    factors: &FactorTable,
    variant: ModelVariant,
) -> Result<FittedModel, ModelError> {
    fit(ticker, returns, factors, variant, &RegressionConfig::default())
}

/// Fetch data for `ticker` and fit the model named by `model_type`.
///
/// `model_type` is one of `3-factor`, `5-factor` or `6-factor` and is checked
/// before anything is fetched.
///
/// # Errors
/// Returns `ModelError::InvalidModel` for an unsupported name, otherwise as
/// [`FamaFrenchModel::run`].
pub fn run_fama_french_regression<S: PriceSource + ?Sized>(
    source: &S,
    ticker: &str,
    start: Date,
    end: Date,
    model_type: &str,
) -> Result<FittedModel, ModelError> {
    let variant: ModelVariant = model_type.parse()?;
    let model = FamaFrenchModel::new(source).run(ticker, start, end, variant)?;
    debug!(ticker = model.ticker(), model = %variant, "regression summary\n{}", model.summary());
    Ok(model)
}

fn fit(
    ticker: &str,
    returns: &ReturnSeries,
    factors: &FactorTable,
    variant: ModelVariant,
    config: &RegressionConfig,
) -> Result<FittedModel, ModelError> {
    let (data, report) = align(returns, factors, variant)?;
    debug!(
        ticker,
        filled = report.ticker_filled,
        dropped = report.rows_dropped,
        "aligned ticker returns onto factor dates"
    );
    if report.rows_dropped > 0 {
        warn!(ticker, dropped = report.rows_dropped, "factor dates precede first ticker return");
    }

    let width = variant.design_width();
    if data.len() <= width {
        return Err(ModelError::InsufficientData { observations: data.len(), parameters: width });
    }

    let result = ordinary_least_squares(&data.response(), &data.design(), &config.ols())?;
    let model = FittedModel::new(ticker.to_string(), data.regressors(), result, data, report);

    let aliased: Vec<&str> = model.aliased().collect();
    if !aliased.is_empty() {
        warn!(ticker, ?aliased, "collinear regressors excluded from fit");
    }
    info!(
        ticker,
        model = %variant,
        observations = model.n_obs(),
        r_squared = model.r_squared(),
        "fitted regression"
    );

    Ok(model)
}
