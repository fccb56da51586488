//! Error types for the regression pipeline.

use derive_more::Display;
use fama_factors::FactorError;
use fama_math::MathError;
use fama_primitives::{Date, FactorName, ParseVariantError, SeriesError};
use fama_traits::SourceError;
use fama_utils::UtilsError;

/// Broad class of a [`ModelError`], for callers that only need to know who
/// is at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    /// The caller asked for something unsupported or malformed.
    #[display("invalid argument")]
    InvalidArgument,
    /// The provider had no usable data.
    #[display("data unavailable")]
    DataUnavailable,
    /// The provider could not be reached or failed while answering.
    #[display("provider failure")]
    Provider,
    /// Intermediate data broke an internal guarantee.
    #[display("data integrity")]
    Integrity,
    /// The regression could not be computed.
    #[display("computation")]
    Computation,
}

/// Errors that can occur while fetching data and fitting the model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Unsupported model variant name.
    #[error(transparent)]
    InvalidModel(#[from] ParseVariantError),

    /// Empty or blank ticker.
    #[error("invalid ticker: {0:?}")]
    InvalidTicker(String),

    /// The requested range is empty or reversed.
    #[error("invalid date range: start {start} is not before end {end}")]
    InvalidRange {
        /// Start of the range.
        start: Date,
        /// End of the range.
        end: Date,
    },

    /// No usable prices for the ticker.
    #[error("no data for {ticker}: {reason}")]
    DataUnavailable {
        /// Ticker that was requested.
        ticker: String,
        /// What was missing.
        reason: String,
    },

    /// A column the regression needs is not in the factor table.
    #[error("missing required column: {0}")]
    MissingColumn(FactorName),

    /// Too few aligned rows to fit the model.
    #[error("insufficient data: {observations} observations for {parameters} parameters")]
    InsufficientData {
        /// Aligned rows available.
        observations: usize,
        /// Columns in the design matrix.
        parameters: usize,
    },

    /// Factor construction error.
    #[error("factor error: {0}")]
    Factor(#[from] FactorError),

    /// Price source error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Math error.
    #[error("math error: {0}")]
    Math(#[from] MathError),

    /// Series or table invariant violated.
    #[error("series error: {0}")]
    Series(#[from] SeriesError),

    /// Data frame conversion error.
    #[error("data processing error: {0}")]
    Utils(#[from] UtilsError),

    /// Polars error.
    #[error("data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl ModelError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidModel(_) | Self::InvalidTicker(_) | Self::InvalidRange { .. } => {
                ErrorKind::InvalidArgument
            }
            Self::DataUnavailable { .. } => ErrorKind::DataUnavailable,
            Self::MissingColumn(_) | Self::Series(_) | Self::Utils(_) | Self::Polars(_) => {
                ErrorKind::Integrity
            }
            Self::InsufficientData { .. } | Self::Math(_) => ErrorKind::Computation,
            Self::Source(e) => source_kind(e),
            Self::Factor(e) => match e {
                FactorError::InvalidRange { .. } | FactorError::InvalidConfig(_) => {
                    ErrorKind::InvalidArgument
                }
                FactorError::EmptyProxy { .. } => ErrorKind::DataUnavailable,
                FactorError::Source(e) => source_kind(e),
                FactorError::Series(_) | FactorError::Utils(_) | FactorError::Polars(_) => {
                    ErrorKind::Integrity
                }
            },
        }
    }
}

const fn source_kind(err: &SourceError) -> ErrorKind {
    match err {
        SourceError::InvalidRange { .. } | SourceError::InvalidSymbol(_) => {
            ErrorKind::InvalidArgument
        }
        SourceError::NoData { .. } => ErrorKind::DataUnavailable,
        SourceError::Provider(_) => ErrorKind::Provider,
    }
}
