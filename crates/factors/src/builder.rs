//! Factor table construction from proxy prices.

use fama_primitives::{Date, FactorName, FactorTable, PriceSeries};
use fama_traits::PriceSource;
use fama_utils::{
    fill_report, forward_fill_onto,
    frame::{CLOSE_COLUMN, DATE_COLUMN, factors_from_frame, prices_to_frame},
    returns_frame,
};
use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::{FactorError, MomentumConfig, MomentumFactor, Proxy};

/// The risk-free proxy is a yield quoted in percent.
const RATE_DIVISOR: f64 = 100.0;

/// Configuration for [`FactorBuilder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Momentum (UMD) settings.
    pub momentum: MomentumConfig,
}

/// Builds the daily factor table from a [`PriceSource`].
///
/// Every call to [`build`](Self::build) fetches all nine proxies afresh.
#[derive(Debug, Clone)]
pub struct FactorBuilder<S> {
    source: S,
    config: BuilderConfig,
}

impl<S: PriceSource> FactorBuilder<S> {
    /// Create a builder with default configuration.
    pub fn new(source: S) -> Self {
        Self { source, config: BuilderConfig::default() }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Underlying price source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Build `Mkt-RF`, `RF`, `SMB`, `HML`, `RMW`, `CMA` and `UMD` for
    /// `start <= date < end`.
    ///
    /// Rows are the market's trading days on which every column is defined.
    ///
    /// # Errors
    /// Returns `FactorError::InvalidRange` if `start` is not before `end`,
    /// `FactorError::EmptyProxy` if any proxy has no prices, and source or
    /// table errors otherwise.
    pub fn build(&self, start: Date, end: Date) -> Result<FactorTable, FactorError> {
        if start >= end {
            return Err(FactorError::InvalidRange { start, end });
        }
        let rf = label(Proxy::RiskFree);

        // The market's return dates are the index everything else is placed on.
        let market = Proxy::Market.ticker();
        let mut frame = returns_frame(&self.fetch(Proxy::Market, start, end)?, market)?;

        let rates = prices_to_frame(&self.fetch(Proxy::RiskFree, start, end)?)?
            .lazy()
            .select([col(DATE_COLUMN), (col(CLOSE_COLUMN) / lit(RATE_DIVISOR)).alias(rf)]);
        frame = forward_fill_onto(frame, rates, rf);
        for proxy in Proxy::STYLES {
            let returns = returns_frame(&self.fetch(proxy, start, end)?, proxy.ticker())?;
            frame = forward_fill_onto(frame, returns, proxy.ticker());
        }

        let momentum = MomentumFactor::with_config(self.config.momentum);
        let frame = momentum.compute(frame, market)?.collect()?;
        for proxy in std::iter::once(Proxy::RiskFree).chain(Proxy::STYLES) {
            let fill = fill_report(&frame, label(proxy))?;
            debug!(
                %proxy,
                filled = fill.filled,
                missing = fill.missing,
                "aligned proxy onto market dates"
            );
        }

        let rows = frame.height();
        let factors = frame
            .lazy()
            .select([
                col(DATE_COLUMN),
                (col(market) - col(rf)).alias(FactorName::MktRf.as_str()),
                col(rf),
                spread(Proxy::SmallCap, Proxy::Market, FactorName::Smb),
                spread(Proxy::Value, Proxy::Growth, FactorName::Hml),
                spread(Proxy::HighProfitability, Proxy::LowProfitability, FactorName::Rmw),
                spread(Proxy::Conservative, Proxy::Aggressive, FactorName::Cma),
                col(momentum.name().as_str()),
            ])
            .drop_nulls(None)
            .collect()?;
        let dropped = rows - factors.height();
        if dropped > 0 {
            warn!(dropped, kept = factors.height(), "dropped factor rows with undefined values");
        }

        let table = factors_from_frame(&factors)?;
        info!(rows = table.len(), %start, %end, "built factor table");
        Ok(table)
    }

    fn fetch(&self, proxy: Proxy, start: Date, end: Date) -> Result<PriceSeries, FactorError> {
        let symbol = proxy.symbol();
        debug!(%proxy, %symbol, source = self.source.name(), "fetching proxy");

        let prices = self.source.daily_closes(&symbol, start, end).map_err(|e| {
            if e.is_no_data() {
                FactorError::EmptyProxy { proxy, symbol: symbol.clone() }
            } else {
                e.into()
            }
        })?;
        if prices.is_empty() {
            return Err(FactorError::EmptyProxy { proxy, symbol });
        }
        Ok(prices)
    }
}

/// Build the factor table with default settings.
///
/// # Errors
/// See [`FactorBuilder::build`].
pub fn get_fama_french_factors<S: PriceSource + ?Sized>(
    source: &S,
    start: Date,
    end: Date,
) -> Result<FactorTable, FactorError> {
    FactorBuilder::new(source).build(start, end)
}

/// Column a fetched proxy occupies in the working frame.
const fn label(proxy: Proxy) -> &'static str {
    match proxy {
        Proxy::RiskFree => FactorName::Rf.as_str(),
        other => other.ticker(),
    }
}

/// `long - short` return spread, null where either leg is.
fn spread(long: Proxy, short: Proxy, name: FactorName) -> Expr {
    (col(long.ticker()) - col(short.ticker())).alias(name.as_str())
}
