//! Factor names and the date-indexed factor table.

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{Date, SeriesError, series::check_increasing};

/// A column of the Fama-French factor table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
pub enum FactorName {
    /// Market return minus the risk-free rate.
    #[display("Mkt-RF")]
    #[serde(rename = "Mkt-RF")]
    MktRf,
    /// Risk-free rate.
    #[display("RF")]
    #[serde(rename = "RF")]
    Rf,
    /// Small minus big (size).
    #[display("SMB")]
    #[serde(rename = "SMB")]
    Smb,
    /// High minus low (value).
    #[display("HML")]
    #[serde(rename = "HML")]
    Hml,
    /// Robust minus weak (profitability).
    #[display("RMW")]
    #[serde(rename = "RMW")]
    Rmw,
    /// Conservative minus aggressive (investment).
    #[display("CMA")]
    #[serde(rename = "CMA")]
    Cma,
    /// Up minus down (momentum).
    #[display("UMD")]
    #[serde(rename = "UMD")]
    Umd,
}

impl FactorName {
    /// Every factor in table order.
    pub const ALL: [Self; 7] =
        [Self::MktRf, Self::Rf, Self::Smb, Self::Hml, Self::Rmw, Self::Cma, Self::Umd];

    /// Column label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MktRf => "Mkt-RF",
            Self::Rf => "RF",
            Self::Smb => "SMB",
            Self::Hml => "HML",
            Self::Rmw => "RMW",
            Self::Cma => "CMA",
            Self::Umd => "UMD",
        }
    }
}

impl FromStr for FactorName {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| SeriesError::UnknownFactor(s.to_string()))
    }
}

/// One named column of a [`FactorTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorColumn {
    /// Factor the values belong to.
    pub name: FactorName,
    /// Values aligned with the table's dates.
    pub values: Vec<f64>,
}

/// Daily factor values indexed by date.
///
/// One row per date, dates strictly increasing, every value finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorTable {
    dates: Vec<Date>,
    columns: Vec<FactorColumn>,
}

impl FactorTable {
    /// Create a factor table.
    ///
    /// # Errors
    /// Returns an error if dates are unordered, a column has the wrong length,
    /// a column is repeated, or any value is not finite.
    pub fn new(
        dates: Vec<Date>,
        columns: impl IntoIterator<Item = (FactorName, Vec<f64>)>,
    ) -> Result<Self, SeriesError> {
        check_increasing(&dates)?;

        let mut built: Vec<FactorColumn> = Vec::new();
        for (name, values) in columns {
            if built.iter().any(|c| c.name == name) {
                return Err(SeriesError::DuplicateColumn(name));
            }
            if values.len() != dates.len() {
                return Err(SeriesError::LengthMismatch {
                    context: name.to_string(),
                    expected: dates.len(),
                    actual: values.len(),
                });
            }
            if let Some(i) = values.iter().position(|v| !v.is_finite()) {
                return Err(SeriesError::NonFinite { column: name, date: dates[i] });
            }
            built.push(FactorColumn { name, values });
        }

        Ok(Self { dates, columns: built })
    }

    /// Row dates.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Number of rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Columns in insertion order.
    #[must_use]
    pub fn columns(&self) -> &[FactorColumn] {
        &self.columns
    }

    /// Names of the columns present, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = FactorName> + '_ {
        self.columns.iter().map(|c| c.name)
    }

    /// Values of one column.
    #[must_use]
    pub fn column(&self, name: FactorName) -> Option<&[f64]> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.values.as_slice())
    }

    /// Whether the table carries `name`.
    #[must_use]
    pub fn contains(&self, name: FactorName) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Value of `name` on `date`.
    #[must_use]
    pub fn value(&self, date: Date, name: FactorName) -> Option<f64> {
        let row = self.dates.binary_search(&date).ok()?;
        self.column(name).map(|values| values[row])
    }

    /// First and last row dates.
    #[must_use]
    pub fn date_range(&self) -> Option<(Date, Date)> {
        Some((*self.dates.first()?, *self.dates.last()?))
    }

    /// A table with only `names`, in the given order.
    ///
    /// # Errors
    /// Returns [`SeriesError::MissingColumn`] for the first name not present.
    pub fn select(&self, names: &[FactorName]) -> Result<Self, SeriesError> {
        let columns = names
            .iter()
            .map(|&name| {
                self.column(name)
                    .map(|values| FactorColumn { name, values: values.to_vec() })
                    .ok_or(SeriesError::MissingColumn(name))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { dates: self.dates.clone(), columns })
    }
}
