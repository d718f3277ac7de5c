use thiserror::Error;

/// Errors returned by the clustering engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClusterError {
    /// Two vectors were built over different vocabularies.
    #[error("dimension mismatch: expected {expected} terms, found {found}")]
    DimensionMismatch {
        /// Dimensionality of the left-hand vector.
        expected: usize,
        /// Dimensionality of the right-hand vector. Equal to `expected` when
        /// the lengths agree but the terms do not.
        found: usize,
    },

    /// Threshold is NaN, infinite or outside `[0.0, 1.0]`.
    #[error("invalid similarity threshold {0}: must be within [0.0, 1.0]")]
    InvalidThreshold(f64),
}

pub type Result<T> = std::result::Result<T, ClusterError>;
