//! Error types for core image and transform operations.

use thiserror::Error;

/// Errors raised by core geometry, transform and filter operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// The direction (or linear part of a transform) cannot be inverted.
    #[error("Singular matrix: {0}")]
    SingularMatrix(String),

    /// Only 2D and 3D images are supported by the operation.
    #[error("Unsupported dimensionality: {0}")]
    UnsupportedDimension(usize),

    /// A transform has no closed-form inverse.
    #[error("Transform is not invertible: {0}")]
    NotInvertible(String),

    /// Invalid filter or geometry parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
