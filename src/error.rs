//! Error types for rowbind load operations.

use thiserror::Error;

use crate::convert::ConvertError;

/// Result type alias using [`RowbindError`].
pub type Result<T> = std::result::Result<T, RowbindError>;

/// Error types for rowbind load operations.
#[derive(Debug, Error)]
pub enum RowbindError {
    /// The destination cannot receive the cursor's rows.
    #[error("Invalid destination: {0}")]
    InvalidDestination(String),

    /// A single-row load found no rows.
    #[error("Not found")]
    NotFound,

    /// A cell could not be coerced into its destination.
    #[error("Type mismatch on column '{column}': {source}")]
    TypeMismatch {
        column: String,
        source: ConvertError,
    },

    /// Error reported by the underlying cursor (fetch, iteration or close).
    #[error("Cursor error: {0}")]
    Cursor(String),

    /// A SQL literal could not be decoded.
    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),

    /// Rows remained after a single-row destination was filled.
    #[error("Unexpected rows: {extra} more row(s) after the first")]
    UnexpectedRows { extra: usize },
}

impl RowbindError {
    /// Returns true if this is [`RowbindError::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, RowbindError::NotFound)
    }
}

/// Failure of a multi-row load.
///
/// `rows` counts the elements committed into the destination before the
/// failure; those elements remain visible to the caller.
#[derive(Debug, Error)]
#[error("{source} (after {rows} row(s))")]
pub struct LoadError {
    /// Rows committed before the failure.
    pub rows: usize,
    /// The underlying error.
    pub source: RowbindError,
}

impl LoadError {
    /// Returns the underlying error, discarding the row count.
    #[must_use]
    pub fn into_inner(self) -> RowbindError {
        self.source
    }
}

impl From<LoadError> for RowbindError {
    fn from(err: LoadError) -> Self {
        err.source
    }
}
