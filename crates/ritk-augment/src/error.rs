//! Error types for augmentation set-up.
//!
//! Everything here is detected eagerly, before any resampling work starts.
//! Failures inside collaborators (I/O, resampling, filters) travel as
//! `anyhow::Error` and are not wrapped.

use ritk_core::CoreError;
use thiserror::Error;

/// Main error type for augmentation operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AugmentError {
    /// Reference domain cannot be built (no inputs, size < 2, zero extent).
    #[error("Degenerate domain: {0}")]
    DegenerateDomain(String),

    /// A direction matrix or transform could not be inverted.
    #[error("Singular transform: {0}")]
    SingularTransform(String),

    /// Dimensionality of a description disagrees with the target.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Parameter vectors do not match the transform family.
    #[error("Parameter arity: {family} takes {expected} parameters, got {actual}")]
    ParameterArity {
        family: String,
        expected: usize,
        actual: usize,
    },

    /// The parameter space is larger than the configured limit.
    #[error("Too many samples: {requested} requested, limit is {limit}")]
    TooManySamples { requested: usize, limit: usize },

    /// The intensity backend does not provide this filter.
    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for augmentation operations.
pub type Result<T> = std::result::Result<T, AugmentError>;

impl AugmentError {
    /// Create a degenerate domain error.
    pub fn degenerate_domain(msg: impl Into<String>) -> Self {
        Self::DegenerateDomain(msg.into())
    }

    /// Create a singular transform error.
    pub fn singular_transform(msg: impl Into<String>) -> Self {
        Self::SingularTransform(msg.into())
    }

    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }

    /// Create an unsupported filter error.
    pub fn unsupported_filter(msg: impl Into<String>) -> Self {
        Self::UnsupportedFilter(msg.into())
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

impl From<CoreError> for AugmentError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SingularMatrix(msg) | CoreError::NotInvertible(msg) => Self::SingularTransform(msg),
            CoreError::UnsupportedDimension(d) => {
                Self::DimensionMismatch(format!("{}D is not supported", d))
            }
            CoreError::InvalidParameter(msg) => Self::InvalidConfiguration(msg),
        }
    }
}
