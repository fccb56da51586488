//! Forward-fill reindexing onto another calendar.

use polars::prelude::*;

use crate::{UtilsError, frame::DATE_COLUMN};

/// Fill accounting for a column placed by [`forward_fill_onto`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillReport {
    /// Index dates that took an earlier observation.
    pub filled: usize,
    /// Index dates with no observation on or before them.
    pub missing: usize,
}

/// Name of the flag column [`forward_fill_onto`] adds next to `value`.
#[must_use]
pub fn observed_column(value: &str) -> String {
    format!("{value}_observed")
}

/// Place the `value` column of `series` onto the dates of `index`.
///
/// Each index date takes the series value on that date or, failing that, the
/// latest one before it. Later observations are never used. Series dates
/// that are not in the index still feed the fill for the index dates after
/// them.
///
/// Every column of `index` is kept. Besides `value`, the result carries the
/// boolean [`observed_column`], true where the series had a value on the
/// date itself. Rows come out sorted by date.
pub fn forward_fill_onto(index: LazyFrame, series: LazyFrame, value: &str) -> LazyFrame {
    let observed = observed_column(value);
    let by_date = SortMultipleOptions::new().with_maintain_order(true);

    let union = index
        .clone()
        .select([col(DATE_COLUMN)])
        .join(
            series.select([col(DATE_COLUMN), col(value)]),
            [col(DATE_COLUMN)],
            [col(DATE_COLUMN)],
            JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns),
        )
        .sort([DATE_COLUMN], by_date.clone())
        .with_columns([
            col(value).is_not_null().alias(observed.as_str()),
            col(value).cast(DataType::Float64).forward_fill(None).alias(value),
        ]);

    index
        .join(union, [col(DATE_COLUMN)], [col(DATE_COLUMN)], JoinArgs::new(JoinType::Left))
        .sort([DATE_COLUMN], by_date)
}

/// Count filled and missing rows of a column placed by [`forward_fill_onto`].
///
/// # Errors
/// Returns `UtilsError::MissingColumn` if `value` or its flag is absent.
pub fn fill_report(df: &DataFrame, value: &str) -> Result<FillReport, UtilsError> {
    let observed = observed_column(value);
    let flags = df.column(&observed).map_err(|_| UtilsError::MissingColumn(observed.clone()))?;
    let values = df.column(value).map_err(|_| UtilsError::MissingColumn(value.to_string()))?;
    let values = values.f64()?;

    let filled = flags
        .bool()?
        .into_iter()
        .zip(values)
        .filter(|(seen, v)| *seen != Some(true) && v.is_some())
        .count();
    Ok(FillReport { filled, missing: values.null_count() })
}
