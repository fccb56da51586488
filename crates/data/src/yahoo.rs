//! Daily closes from Yahoo Finance.

use std::time::Duration;

use chrono::DateTime;
use fama_primitives::{Date, PriceSeries, Symbol};
use fama_traits::{PriceSource, SourceError};
use time::OffsetDateTime;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;
use yahoo_finance_api as yahoo;

/// Settings for [`YahooPriceSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YahooConfig {
    /// Pause after every request.
    pub request_delay: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self { request_delay: Duration::from_millis(250) }
    }
}

/// Yahoo Finance price source.
///
/// Closes are split- and dividend-adjusted. Quote timestamps are reduced to
/// their UTC calendar date.
pub struct YahooPriceSource {
    connector: yahoo::YahooConnector,
    runtime: Runtime,
    config: YahooConfig,
}

impl std::fmt::Debug for YahooPriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooPriceSource").field("config", &self.config).finish_non_exhaustive()
    }
}

impl YahooPriceSource {
    /// Create a source with the default request delay.
    ///
    /// # Errors
    /// Returns `SourceError::Provider` if the HTTP client or runtime cannot be built.
    pub fn new() -> Result<Self, SourceError> {
        Self::with_config(YahooConfig::default())
    }

    /// Create a source with custom settings.
    ///
    /// # Errors
    /// Returns `SourceError::Provider` if the HTTP client or runtime cannot be built.
    pub fn with_config(config: YahooConfig) -> Result<Self, SourceError> {
        let connector =
            yahoo::YahooConnector::new().map_err(|e| SourceError::Provider(e.to_string()))?;
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SourceError::Provider(e.to_string()))?;
        Ok(Self { connector, runtime, config })
    }

    /// Active settings.
    #[must_use]
    pub const fn config(&self) -> &YahooConfig {
        &self.config
    }

    async fn fetch(
        &self,
        symbol: &Symbol,
        start: Date,
        end: Date,
    ) -> Result<PriceSeries, SourceError> {
        let response = self
            .connector
            .get_quote_history(symbol.as_str(), to_offset(start)?, to_offset(end)?)
            .await
            .map_err(|e| no_data(symbol, e))?;
        let quotes = response.quotes().map_err(|e| no_data(symbol, e))?;

        tokio::time::sleep(self.config.request_delay).await;

        let observations = quotes.iter().filter_map(|q| {
            DateTime::from_timestamp(q.timestamp, 0).map(|ts| (ts.date_naive(), q.adjclose))
        });

        Ok(PriceSeries::from_observations(symbol.clone(), observations).between(start, end))
    }
}

impl PriceSource for YahooPriceSource {
    fn daily_closes(
        &self,
        symbol: &Symbol,
        start: Date,
        end: Date,
    ) -> Result<PriceSeries, SourceError> {
        if symbol.is_blank() {
            return Err(SourceError::InvalidSymbol(symbol.to_string()));
        }
        if start >= end {
            return Err(SourceError::InvalidRange { start, end });
        }

        debug!(%symbol, %start, %end, "fetching daily closes");
        let series = self.runtime.block_on(self.fetch(symbol, start, end))?;
        debug!(%symbol, rows = series.len(), "fetched daily closes");

        Ok(series)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

/// Midnight UTC at the start of `date`.
fn to_offset(date: Date) -> Result<OffsetDateTime, SourceError> {
    let seconds = date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
    OffsetDateTime::from_unix_timestamp(seconds).map_err(|e| SourceError::Provider(e.to_string()))
}

/// Yahoo answers unknown or delisted symbols with a failed request rather
/// than an empty result, so every request failure means no usable data.
fn no_data(symbol: &Symbol, err: yahoo::YahooError) -> SourceError {
    SourceError::NoData { symbol: symbol.clone(), reason: err.to_string() }
}
