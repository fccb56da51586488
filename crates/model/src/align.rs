//! Alignment of ticker returns onto the factor calendar.

use fama_primitives::{
    Date, FactorColumn, FactorName, FactorTable, ModelVariant, ReturnSeries, SeriesError,
};
use fama_utils::{
    fill_report, forward_fill_onto,
    frame::{
        DATE_COLUMN, dated_frame, factors_to_frame, float_column, frame_dates, returns_to_frame,
    },
};
use ndarray::{Array1, Array2};
use polars::prelude::*;

use crate::ModelError;

/// Name of the ticker return column.
pub(crate) const RETURN: &str = "Return";

/// Name of the intercept column in the design matrix.
pub const CONSTANT: &str = "const";

/// Name of the excess-return response.
pub const RESPONSE: &str = "Excess_Return";

/// Row accounting from [`align`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignmentReport {
    /// Rows in the factor table.
    pub factor_rows: usize,
    /// Factor dates that took an earlier ticker return.
    pub ticker_filled: usize,
    /// Factor dates before the first ticker return.
    pub rows_dropped: usize,
    /// Rows left for the regression.
    pub rows_used: usize,
}

/// Ticker returns, the selected factors and RF on common dates.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedData {
    variant: ModelVariant,
    dates: Vec<Date>,
    returns: Vec<f64>,
    rf: Vec<f64>,
    factors: Vec<FactorColumn>,
}

impl AlignedData {
    /// Variant the factors were selected for.
    #[must_use]
    pub const fn variant(&self) -> ModelVariant {
        self.variant
    }

    /// Row dates.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Ticker returns.
    #[must_use]
    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    /// Risk-free rate.
    #[must_use]
    pub fn rf(&self) -> &[f64] {
        &self.rf
    }

    /// Selected factor columns, in variant order.
    #[must_use]
    pub fn factors(&self) -> &[FactorColumn] {
        &self.factors
    }

    /// Design matrix column names: [`CONSTANT`] then the selected factors.
    #[must_use]
    pub fn regressors(&self) -> Vec<String> {
        std::iter::once(CONSTANT.to_string())
            .chain(self.factors.iter().map(|c| c.name.to_string()))
            .collect()
    }

    /// Excess return, `Return - RF`.
    #[must_use]
    pub fn response(&self) -> Array1<f64> {
        self.returns.iter().zip(&self.rf).map(|(r, rf)| r - rf).collect()
    }

    /// Constant column followed by the selected factors.
    #[must_use]
    pub fn design(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.len(), self.factors.len() + 1), |(i, j)| {
            if j == 0 { 1.0 } else { self.factors[j - 1].values[i] }
        })
    }

    /// Frame with `date`, `Return`, the selected factors, `RF` and the
    /// excess return.
    ///
    /// # Errors
    /// Returns an error if polars rejects the frame.
    pub fn to_frame(&self) -> Result<DataFrame, ModelError> {
        let rf_selected = self.factors.iter().any(|c| c.name == FactorName::Rf);

        let mut columns: Vec<(&str, Vec<f64>)> = vec![(RETURN, self.returns.clone())];
        columns.extend(self.factors.iter().map(|c| (c.name.as_str(), c.values.clone())));
        if !rf_selected {
            columns.push((FactorName::Rf.as_str(), self.rf.clone()));
        }
        columns.push((RESPONSE, self.response().to_vec()));

        Ok(dated_frame(&self.dates, columns)?)
    }
}

/// Join ticker returns onto the factor dates for `variant`.
///
/// The factor calendar is authoritative. Each factor date takes the ticker
/// return on that date or the latest one before it; dates before the first
/// ticker return are dropped. RF is carried whether or not the variant uses
/// it as a regressor.
///
/// # Errors
/// Returns `ModelError::MissingColumn` if RF or a selected factor is absent.
pub fn align(
    returns: &ReturnSeries,
    factors: &FactorTable,
    variant: ModelVariant,
) -> Result<(AlignedData, AlignmentReport), ModelError> {
    let selected = factors.select(variant.factors()).map_err(|e| match e {
        SeriesError::MissingColumn(name) => ModelError::MissingColumn(name),
        other => other.into(),
    })?;
    if factors.column(FactorName::Rf).is_none() {
        return Err(ModelError::MissingColumn(FactorName::Rf));
    }

    let ticker = returns_to_frame(returns)?
        .lazy()
        .select([col(DATE_COLUMN), col(returns.name()).alias(RETURN)]);
    let joined = forward_fill_onto(factors_to_frame(factors)?.lazy(), ticker, RETURN).collect()?;
    let filled = fill_report(&joined, RETURN)?;
    let kept = joined.lazy().filter(col(RETURN).is_not_null()).collect()?;

    let data = AlignedData {
        variant,
        dates: frame_dates(&kept)?,
        returns: dense(&kept, RETURN)?,
        rf: dense(&kept, FactorName::Rf.as_str())?,
        factors: selected
            .columns()
            .iter()
            .map(|c| Ok(FactorColumn { name: c.name, values: dense(&kept, c.name.as_str())? }))
            .collect::<Result<_, ModelError>>()?,
    };

    let report = AlignmentReport {
        factor_rows: factors.len(),
        ticker_filled: filled.filled,
        rows_dropped: filled.missing,
        rows_used: data.len(),
    };
    Ok((data, report))
}

/// A column with no nulls left in it.
fn dense(df: &DataFrame, name: &str) -> Result<Vec<f64>, ModelError> {
    Ok(float_column(df, name)?.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn factors() -> FactorTable {
        let dates = vec![d(3), d(4), d(5), d(6), d(7)];
        FactorTable::new(
            dates,
            FactorName::ALL.into_iter().enumerate().map(|(k, name)| {
                let values: Vec<f64> =
                    (0..5).map(|i| 0.001 * (k + 1) as f64 * (i + 1) as f64).collect();
                (name, values)
            }),
        )
        .unwrap()
    }

    #[rstest]
    #[case(ModelVariant::ThreeFactor, 4)]
    #[case(ModelVariant::FiveFactor, 7)]
    #[case(ModelVariant::SixFactor, 8)]
    fn design_width(#[case] variant: ModelVariant, #[case] width: usize) {
        let returns = ReturnSeries::from_pairs("Return", [(d(3), 0.01), (d(5), 0.02)]).unwrap();
        let (data, _) = align(&returns, &factors(), variant).unwrap();

        assert_eq!(data.design().ncols(), width);
        assert_eq!(data.regressors().len(), width);
        assert_eq!(data.regressors()[0], CONSTANT);
    }

    #[test]
    fn forward_fills_and_drops_leading_rows() {
        // Ticker trades on 2nd (off-calendar), 5th and 8th (after calendar).
        let returns =
            ReturnSeries::from_pairs("Return", [(d(2), 0.1), (d(5), 0.5), (d(8), 0.8)]).unwrap();
        let (data, report) = align(&returns, &factors(), ModelVariant::ThreeFactor).unwrap();

        assert_eq!(data.dates(), &[d(3), d(4), d(5), d(6), d(7)]);
        assert_eq!(data.returns(), &[0.1, 0.1, 0.5, 0.5, 0.5]);
        assert_eq!(report.ticker_filled, 4);
        assert_eq!(report.rows_dropped, 0);

        let returns = ReturnSeries::from_pairs("Return", [(d(5), 0.5)]).unwrap();
        let (data, report) = align(&returns, &factors(), ModelVariant::ThreeFactor).unwrap();
        assert_eq!(data.dates(), &[d(5), d(6), d(7)]);
        assert_eq!(report.rows_dropped, 2);
        assert_eq!(report.rows_used, 3);
    }

    #[test]
    fn three_factor_still_carries_rf() {
        let returns = ReturnSeries::from_pairs("Return", [(d(3), 0.01)]).unwrap();
        let (data, _) = align(&returns, &factors(), ModelVariant::ThreeFactor).unwrap();

        assert!(data.factors().iter().all(|c| c.name != FactorName::Rf));
        let rf0 = factors().column(FactorName::Rf).unwrap()[0];
        assert_relative_eq!(data.response()[0], 0.01 - rf0);
    }

    #[test]
    fn missing_rf_is_integrity_error() {
        let table =
            factors().select(&[FactorName::MktRf, FactorName::Smb, FactorName::Hml]).unwrap();
        let returns = ReturnSeries::from_pairs("Return", [(d(3), 0.01)]).unwrap();

        assert!(matches!(
            align(&returns, &table, ModelVariant::ThreeFactor),
            Err(ModelError::MissingColumn(FactorName::Rf))
        ));
    }

    #[test]
    fn missing_selected_factor() {
        let table = factors().select(&[FactorName::MktRf, FactorName::Rf]).unwrap();
        let returns = ReturnSeries::from_pairs("Return", [(d(3), 0.01)]).unwrap();

        assert!(matches!(
            align(&returns, &table, ModelVariant::ThreeFactor),
            Err(ModelError::MissingColumn(FactorName::Smb))
        ));
    }

    #[test]
    fn frame_has_rf_once() {
        let returns = ReturnSeries::from_pairs("Return", [(d(3), 0.01)]).unwrap();

        let (three, _) = align(&returns, &factors(), ModelVariant::ThreeFactor).unwrap();
        let df = three.to_frame().unwrap();
        assert_eq!(df.width(), 1 + 1 + 3 + 1 + 1);

        let (five, _) = align(&returns, &factors(), ModelVariant::FiveFactor).unwrap();
        let df = five.to_frame().unwrap();
        assert_eq!(df.width(), 1 + 1 + 6 + 1);
        assert!(df.column(RESPONSE).is_ok());
    }
}
