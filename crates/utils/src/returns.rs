//! Simple returns from closing prices.

use fama_primitives::{PriceSeries, ReturnSeries};
use polars::prelude::*;

use crate::{
    UtilsError,
    frame::{CLOSE_COLUMN, DATE_COLUMN, prices_to_frame, series_from_frame},
    smooth::relative_change,
};

/// Period-over-period returns of `prices` as a lazy `date`/`name` frame.
///
/// The first date has no prior close and is dropped, as is any date whose
/// change is not finite (a zero prior close).
///
/// # Errors
/// Returns an error if polars rejects the price frame.
pub fn returns_frame(prices: &PriceSeries, name: &str) -> Result<LazyFrame, UtilsError> {
    Ok(prices_to_frame(prices)?
        .lazy()
        .select([col(DATE_COLUMN), relative_change(col(CLOSE_COLUMN)).alias(name)])
        .filter(col(name).is_not_null()))
}

/// [`returns_frame`] collected into a series called `name`.
///
/// # Errors
/// Returns an error if polars fails to evaluate the frame.
pub fn price_returns(prices: &PriceSeries, name: &str) -> Result<ReturnSeries, UtilsError> {
    let df = returns_frame(prices, name)?.collect()?;
    series_from_frame(&df, name)
}
