// Error types for the aggregation core.
//
// Every pure function in `timeline` and `topics` returns these. The outer
// layers (config, io, output, pipeline) wrap them in anyhow errors with
// file context.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AggregateError>;

/// Failures of a single aggregation call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregateError {
    /// A flat sequence does not match the declared matrix shape.
    #[error("Malformed input: {what} expected {expected} values, found {actual}")]
    MalformedInput {
        /// Which input was mis-shaped
        what: String,
        expected: usize,
        actual: usize,
    },

    /// A time slice whose summed topic weight is zero.
    #[error("Degenerate slice {slice}: total topic weight is zero, cannot normalize")]
    DegenerateSlice {
        /// 1-based slice index
        slice: usize,
    },

    /// A topic whose document weights sum to zero.
    #[error("Degenerate topic {topic}: total document weight is zero, cannot normalize")]
    DegenerateTopic { topic: usize },

    /// A non-finite cell, either in the raw input or after transformation.
    #[error("Invalid matrix value {value} at row {row}, column {col}")]
    InvalidMatrix { row: usize, col: usize, value: f64 },

    /// More entries were requested than exist. Never returned as `Err`;
    /// see [`crate::topics::selection::Selection::shortfall`].
    #[error("Insufficient data: requested top {requested}, only {available} available")]
    InsufficientData { requested: usize, available: usize },

    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },
}

impl AggregateError {
    pub fn malformed(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::MalformedInput {
            what: what.into(),
            expected,
            actual,
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }
}
