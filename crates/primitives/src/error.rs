//! Error types for series and table construction.

use crate::{Date, FactorName};

/// Errors raised when a series or factor table violates its invariants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    /// Dates are not strictly increasing.
    #[error("dates must be strictly increasing: {previous} is followed by {next}")]
    UnorderedDates {
        /// Earlier position in the index.
        previous: Date,
        /// Date that does not come after `previous`.
        next: Date,
    },

    /// A value column does not match the length of the date index.
    #[error("length mismatch for {context}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Column or series the mismatch was found in.
        context: String,
        /// Length of the date index.
        expected: usize,
        /// Length of the offending column.
        actual: usize,
    },

    /// A factor value is NaN or infinite.
    #[error("non-finite value in column {column} at {date}")]
    NonFinite {
        /// Offending column.
        column: FactorName,
        /// Offending date.
        date: Date,
    },

    /// The same factor column was supplied twice.
    #[error("duplicate column: {0}")]
    DuplicateColumn(FactorName),

    /// A requested factor column is not in the table.
    #[error("missing column: {0}")]
    MissingColumn(FactorName),

    /// A column label does not name a known factor.
    #[error("unknown factor: {0}")]
    UnknownFactor(String),
}

/// Error returned when parsing an unsupported model variant name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid model type {0:?}: choose '3-factor', '5-factor', or '6-factor'")]
pub struct ParseVariantError(pub String);
