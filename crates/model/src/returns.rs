//! Ticker return fetching.

use fama_primitives::{Date, ReturnSeries, Symbol};
use fama_traits::PriceSource;
use fama_utils::price_returns;
use tracing::debug;

use crate::{ModelError, align::RETURN};

/// Daily simple returns of `ticker` for `start <= date < end`.
///
/// The series is named `Return` and starts on the second trading day, the
/// first having no prior close.
///
/// # Errors
/// Returns `ModelError::InvalidTicker` for a blank ticker,
/// `ModelError::InvalidRange` if `start` is not before `end`, and
/// `ModelError::DataUnavailable` if the provider has no prices or too few to
/// form a single return.
pub fn get_stock_data<S: PriceSource + ?Sized>(
    source: &S,
    ticker: &str,
    start: Date,
    end: Date,
) -> Result<ReturnSeries, ModelError> {
    let symbol = Symbol::from(ticker.trim());
    if symbol.is_blank() {
        return Err(ModelError::InvalidTicker(ticker.to_string()));
    }
    if start >= end {
        return Err(ModelError::InvalidRange { start, end });
    }

    let prices = source.daily_closes(&symbol, start, end).map_err(|e| {
        if e.is_no_data() {
            ModelError::DataUnavailable { ticker: symbol.to_string(), reason: e.to_string() }
        } else {
            e.into()
        }
    })?;
    debug!(%symbol, prices = prices.len(), source = source.name(), "fetched ticker prices");

    if prices.is_empty() {
        return Err(ModelError::DataUnavailable {
            ticker: symbol.to_string(),
            reason: format!("no prices between {start} and {end}"),
        });
    }

    let returns = price_returns(&prices, RETURN)?;
    if returns.is_empty() {
        return Err(ModelError::DataUnavailable {
            ticker: symbol.to_string(),
            reason: "fewer than two prices".to_string(),
        });
    }
    Ok(returns)
}
