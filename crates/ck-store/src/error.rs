//! Error types for store mutations.

use ck_core::CoreError;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by mutating store operations.
///
/// Only invalid arguments surface here. Dangling curve names in selection or
/// the active curve are accepted with a warning, and wrong-thread access
/// panics instead of returning an error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// Point data or view parameters failed validation.
    #[error("Invalid data for '{target}': {source}")]
    Invalid {
        target: String,
        #[source]
        source: CoreError,
    },

    /// A point edit targeted a curve that is not loaded.
    #[error("Curve not loaded: {name}")]
    UnknownCurve { name: String },

    /// A point index is past the end of the curve.
    #[error("Point index {index} out of range for curve '{name}' (len={len})")]
    PointIndexOutOfRange {
        name: String,
        index: usize,
        len: usize,
    },
}

impl StoreError {
    pub(crate) fn invalid(target: impl Into<String>, source: CoreError) -> Self {
        Self::Invalid {
            target: target.into(),
            source,
        }
    }
}
