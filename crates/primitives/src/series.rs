//! Daily price and return series.

use serde::{Deserialize, Serialize};

use crate::{Date, SeriesError, Symbol};

/// Daily closing prices for a single symbol.
///
/// Dates are strictly increasing and every close is finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: Symbol,
    dates: Vec<Date>,
    closes: Vec<f64>,
}

impl PriceSeries {
    /// Build a price series from raw provider observations in any order.
    ///
    /// Non-finite closes are discarded. When a date appears more than once the
    /// last observation for it wins.
    pub fn from_observations(
        symbol: impl Into<Symbol>,
        observations: impl IntoIterator<Item = (Date, f64)>,
    ) -> Self {
        let mut obs: Vec<(Date, f64)> =
            observations.into_iter().filter(|(_, close)| close.is_finite()).collect();
        // Stable sort keeps arrival order within a date.
        obs.sort_by_key(|(date, _)| *date);

        let mut dates: Vec<Date> = Vec::with_capacity(obs.len());
        let mut closes: Vec<f64> = Vec::with_capacity(obs.len());
        for (date, close) in obs {
            match (dates.last(), closes.last_mut()) {
                (Some(last), Some(slot)) if *last == date => *slot = close,
                _ => {
                    dates.push(date);
                    closes.push(close);
                }
            }
        }

        Self { symbol: symbol.into(), dates, closes }
    }

    /// An empty series for `symbol`.
    pub fn empty(symbol: impl Into<Symbol>) -> Self {
        Self { symbol: symbol.into(), dates: Vec::new(), closes: Vec::new() }
    }

    /// Symbol the prices belong to.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Trading dates.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Closing prices, aligned with [`Self::dates`].
    #[must_use]
    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    /// Number of observations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Iterate `(date, close)` pairs in date order.
    pub fn iter(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.dates.iter().copied().zip(self.closes.iter().copied())
    }

    /// Observations with `start <= date < end`.
    #[must_use]
    pub fn between(&self, start: Date, end: Date) -> Self {
        let lo = self.dates.partition_point(|d| *d < start);
        let hi = self.dates.partition_point(|d| *d < end).max(lo);
        Self {
            symbol: self.symbol.clone(),
            dates: self.dates[lo..hi].to_vec(),
            closes: self.closes[lo..hi].to_vec(),
        }
    }
}

/// A named daily series of returns or rates.
///
/// Dates are strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    name: String,
    dates: Vec<Date>,
    values: Vec<f64>,
}

impl ReturnSeries {
    /// Create a return series.
    ///
    /// # Errors
    /// Returns an error if lengths differ or dates are not strictly increasing.
    pub fn new(
        name: impl Into<String>,
        dates: Vec<Date>,
        values: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        let name = name.into();
        if dates.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                context: name,
                expected: dates.len(),
                actual: values.len(),
            });
        }
        check_increasing(&dates)?;
        Ok(Self { name, dates, values })
    }

    /// Create a return series from `(date, value)` pairs already in date order.
    ///
    /// # Errors
    /// Returns an error if dates are not strictly increasing.
    pub fn from_pairs(
        name: impl Into<String>,
        pairs: impl IntoIterator<Item = (Date, f64)>,
    ) -> Result<Self, SeriesError> {
        let (dates, values): (Vec<Date>, Vec<f64>) = pairs.into_iter().unzip();
        Self::new(name, dates, values)
    }

    /// Series name (e.g. `Return`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the series.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Observation dates.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Values, aligned with [`Self::dates`].
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of observations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Value observed exactly on `date`.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<f64> {
        self.dates.binary_search(&date).ok().map(|i| self.values[i])
    }

    /// First and last observation dates.
    #[must_use]
    pub fn date_range(&self) -> Option<(Date, Date)> {
        Some((*self.dates.first()?, *self.dates.last()?))
    }

    /// Iterate `(date, value)` pairs in date order.
    pub fn iter(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// Verify a date index is strictly increasing.
pub(crate) fn check_increasing(dates: &[Date]) -> Result<(), SeriesError> {
    match dates.windows(2).find(|w| w[0] >= w[1]) {
        Some(w) => Err(SeriesError::UnorderedDates { previous: w[0], next: w[1] }),
        None => Ok(()),
    }
}
