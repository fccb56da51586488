//! Market-data provider trait definitions.

use fama_primitives::{Date, PriceSeries, Symbol};

/// Errors that can occur while fetching prices.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The provider has no data for the symbol in the requested range.
    #[error("no data for {symbol}: {reason}")]
    NoData {
        /// Symbol that was queried.
        symbol: Symbol,
        /// Provider's explanation.
        reason: String,
    },

    /// The requested range is empty or reversed.
    #[error("invalid date range: start {start} is not before end {end}")]
    InvalidRange {
        /// Start of the range.
        start: Date,
        /// End of the range.
        end: Date,
    },

    /// The symbol cannot be queried.
    #[error("invalid symbol: {0:?}")]
    InvalidSymbol(String),

    /// Transport or protocol failure in the provider.
    #[error("provider error: {0}")]
    Provider(String),
}

impl SourceError {
    /// Returns whether the error means the symbol simply has no data.
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}

/// A provider of daily closing prices.
///
/// Implementations return one canonical close series per symbol, already
/// normalized to plain calendar dates. An empty series is a valid answer;
/// callers decide whether that is fatal.
pub trait PriceSource {
    /// Fetch daily closes for `symbol` with `start <= date < end`.
    ///
    /// # Errors
    /// Returns `SourceError` if the provider fails or rejects the request.
    fn daily_closes(
        &self,
        symbol: &Symbol,
        start: Date,
        end: Date,
    ) -> Result<PriceSeries, SourceError>;

    /// Human-readable provider name, used in log output.
    fn name(&self) -> &str;
}

impl<T: PriceSource + ?Sized> PriceSource for &T {
    fn daily_closes(
        &self,
        symbol: &Symbol,
        start: Date,
        end: Date,
    ) -> Result<PriceSeries, SourceError> {
        (**self).daily_closes(symbol, start, end)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: PriceSource + ?Sized> PriceSource for Box<T> {
    fn daily_closes(
        &self,
        symbol: &Symbol,
        start: Date,
        end: Date,
    ) -> Result<PriceSeries, SourceError> {
        (**self).daily_closes(symbol, start, end)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
