//! Interpolation types and operations.
//!
//! This module provides interpolation traits and implementations
//! for sampling values at continuous coordinates.

pub mod trait_;
pub mod linear;
pub mod nearest;
pub mod bspline;

pub use trait_::Interpolator;
pub use linear::LinearInterpolator;
pub use nearest::NearestNeighborInterpolator;
pub use bspline::BSplineInterpolator;

use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use serde::{Deserialize, Serialize};
use crate::error::Result;

/// Interpolation method selector.
///
/// `Nearest` is the choice for label maps; `Linear` and `BSpline` for
/// intensity images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationKind {
    Nearest,
    #[default]
    Linear,
    BSpline,
}

impl<B: Backend> Interpolator<B> for InterpolationKind {
    fn interpolate<const D: usize>(&self, data: &Tensor<B, D>, indices: Tensor<B, 2>) -> Result<Tensor<B, 1>> {
        match self {
            Self::Nearest => NearestNeighborInterpolator.interpolate(data, indices),
            Self::Linear => LinearInterpolator.interpolate(data, indices),
            Self::BSpline => BSplineInterpolator.interpolate(data, indices),
        }
    }
}
