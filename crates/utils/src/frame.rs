//! Conversions between typed series and polars data frames.
//!
//! Frames produced here carry a leading `date` column of polars `Date` type
//! followed by one `Float64` column per series, labelled the way the factor
//! table labels them (`Mkt-RF`, `SMB`, ...).

use fama_primitives::{Date, FactorName, FactorTable, PriceSeries, ReturnSeries};
use polars::prelude::*;

use crate::UtilsError;

/// Name of the date column in every frame built here.
pub const DATE_COLUMN: &str = "date";

/// Name of the close column in price frames.
pub const CLOSE_COLUMN: &str = "close";

/// Days from 0001-01-01 (CE day 1) to the Unix epoch.
const UNIX_EPOCH_FROM_CE: i32 = 719_163;

/// Build a frame from a date index and named value columns.
///
/// # Errors
/// Returns an error if a column length differs from the number of dates or a
/// name is repeated.
pub fn dated_frame<'a>(
    dates: &[Date],
    columns: impl IntoIterator<Item = (&'a str, Vec<f64>)>,
) -> Result<DataFrame, UtilsError> {
    let mut all = vec![Column::new(DATE_COLUMN.into(), dates.to_vec())];
    for (name, values) in columns {
        if values.len() != dates.len() {
            return Err(UtilsError::InvalidParameter(format!(
                "column {name} has {} rows, expected {}",
                values.len(),
                dates.len()
            )));
        }
        all.push(Column::new(name.into(), values));
    }
    Ok(DataFrame::new(all)?)
}

/// Frame with `date` and one column named after the series.
///
/// # Errors
/// Returns an error if polars rejects the frame.
pub fn returns_to_frame(series: &ReturnSeries) -> Result<DataFrame, UtilsError> {
    dated_frame(series.dates(), [(series.name(), series.values().to_vec())])
}

/// Frame with `date` and `close`.
///
/// # Errors
/// Returns an error if polars rejects the frame.
pub fn prices_to_frame(prices: &PriceSeries) -> Result<DataFrame, UtilsError> {
    dated_frame(prices.dates(), [(CLOSE_COLUMN, prices.closes().to_vec())])
}

/// Frame with `date` and one column per factor, in table order.
///
/// # Errors
/// Returns an error if polars rejects the frame.
pub fn factors_to_frame(table: &FactorTable) -> Result<DataFrame, UtilsError> {
    dated_frame(
        table.dates(),
        table.columns().iter().map(|c| (c.name.as_str(), c.values.clone())),
    )
}

/// Read the `date` column of a frame.
///
/// Accepts `Date` and `Datetime` columns.
///
/// # Errors
/// Returns `UtilsError::MissingColumn` if there is no `date` column, or
/// `UtilsError::InvalidParameter` on null or out-of-range dates.
pub fn frame_dates(df: &DataFrame) -> Result<Vec<Date>, UtilsError> {
    let column = df
        .column(DATE_COLUMN)
        .map_err(|_| UtilsError::MissingColumn(DATE_COLUMN.to_string()))?;
    let days = column.cast(&DataType::Date)?.cast(&DataType::Int32)?;

    days.i32()?
        .into_iter()
        .map(|day| {
            let day = day.ok_or_else(|| UtilsError::InvalidParameter("null date".to_string()))?;
            day.checked_add(UNIX_EPOCH_FROM_CE)
                .and_then(Date::from_num_days_from_ce_opt)
                .ok_or_else(|| UtilsError::InvalidParameter(format!("date out of range: {day}")))
        })
        .collect()
}

/// Values of a column cast to `f64`, nulls kept.
///
/// # Errors
/// Returns `UtilsError::MissingColumn` if there is no such column.
pub fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, UtilsError> {
    let column = df.column(name).map_err(|_| UtilsError::MissingColumn(name.to_string()))?;
    Ok(column.cast(&DataType::Float64)?.f64()?.into_iter().collect())
}

/// Read `date` and the `name` column back into a series called `name`.
///
/// Rows where the value is null are skipped.
///
/// # Errors
/// Returns an error if either column is missing or the dates are not
/// strictly increasing.
pub fn series_from_frame(df: &DataFrame, name: &str) -> Result<ReturnSeries, UtilsError> {
    let dates = frame_dates(df)?;
    let values = float_column(df, name)?;
    let pairs = dates.into_iter().zip(values).filter_map(|(date, v)| v.map(|v| (date, v)));
    Ok(ReturnSeries::from_pairs(name, pairs)?)
}

/// Rebuild a factor table from a frame.
///
/// Columns whose names are not factor labels are ignored. Nulls become NaN
/// and are then rejected by table validation.
///
/// # Errors
/// Returns an error if the date column is missing or malformed, or the table
/// invariants do not hold.
pub fn factors_from_frame(df: &DataFrame) -> Result<FactorTable, UtilsError> {
    let dates = frame_dates(df)?;

    let mut columns = Vec::new();
    for column in df.get_columns() {
        let Ok(name) = column.name().as_str().parse::<FactorName>() else {
            continue;
        };
        let values: Vec<f64> = float_column(df, column.name().as_str())?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        columns.push((name, values));
    }

    Ok(FactorTable::new(dates, columns)?)
}
