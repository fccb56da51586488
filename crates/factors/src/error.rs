//! Error types for factor construction.

use fama_primitives::{Date, SeriesError, Symbol};
use fama_traits::SourceError;
use fama_utils::UtilsError;

use crate::Proxy;

/// Errors that can occur while building the factor table.
#[derive(Debug, thiserror::Error)]
pub enum FactorError {
    /// The requested range is empty or reversed.
    #[error("invalid date range: start {start} is not before end {end}")]
    InvalidRange {
        /// Start of the range.
        start: Date,
        /// End of the range.
        end: Date,
    },

    /// A required proxy returned no prices.
    #[error("no prices for {proxy} proxy {symbol}")]
    EmptyProxy {
        /// Proxy that came back empty.
        proxy: Proxy,
        /// Ticker that was fetched.
        symbol: Symbol,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Price source error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Table construction error.
    #[error("series error: {0}")]
    Series(#[from] SeriesError),

    /// Smoothing or alignment error.
    #[error("utils error: {0}")]
    Utils(#[from] UtilsError),

    /// Polars error.
    #[error("data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}
