//! Fixed in-memory price data.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use fama_primitives::{Date, PriceSeries, Symbol};
use fama_traits::{PriceSource, SourceError};

/// A `PriceSource` backed by series supplied up front.
///
/// Requests are served by filtering the stored series to `[start, end)`.
/// Symbols without a stored series yield an empty series.
#[derive(Debug, Default)]
pub struct InMemoryPriceSource {
    series: HashMap<Symbol, PriceSeries>,
    fetches: AtomicUsize,
}

impl InMemoryPriceSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add closes for `symbol`, replacing any previous series for it.
    #[must_use]
    pub fn with_closes(
        mut self,
        symbol: impl Into<Symbol>,
        observations: impl IntoIterator<Item = (Date, f64)>,
    ) -> Self {
        self.insert(PriceSeries::from_observations(symbol, observations));
        self
    }

    /// Store a series under its own symbol.
    pub fn insert(&mut self, series: PriceSeries) {
        self.series.insert(series.symbol().clone(), series);
    }

    /// Number of `daily_closes` calls served so far, including failed ones.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    /// Symbols with stored data.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.series.keys()
    }
}

impl PriceSource for InMemoryPriceSource {
    fn daily_closes(
        &self,
        symbol: &Symbol,
        start: Date,
        end: Date,
    ) -> Result<PriceSeries, SourceError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);

        if symbol.is_blank() {
            return Err(SourceError::InvalidSymbol(symbol.to_string()));
        }
        if start >= end {
            return Err(SourceError::InvalidRange { start, end });
        }

        Ok(self
            .series
            .get(symbol)
            .map_or_else(|| PriceSeries::empty(symbol.clone()), |s| s.between(start, end)))
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
