//! Error types for spotfield

use thiserror::Error;

/// Main error type for spotfield operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Dimensionality mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Invalid grid dimensions: {0:?}")]
    InvalidDimensions(Vec<usize>),

    #[error("Index out of bounds: {index:?} outside {min:?}..={max:?}")]
    IndexOutOfBounds {
        index: Vec<i64>,
        min: Vec<i64>,
        max: Vec<i64>,
    },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Point set is empty")]
    EmptyPointSet,

    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    #[error("Block {block} failed: {source}")]
    Worker {
        block: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidParameter`].
    pub fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Fail unless `actual` matches the `expected` dimensionality.
    pub fn check_dims(expected: usize, actual: usize) -> Result<()> {
        if expected != actual {
            return Err(Error::DimensionMismatch { expected, actual });
        }
        Ok(())
    }
}

/// Result type alias for spotfield operations
pub type Result<T> = std::result::Result<T, Error>;
