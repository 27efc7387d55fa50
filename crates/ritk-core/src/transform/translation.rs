//! Translation transform implementation.
//!
//! This module provides a simple translation transform.

use burn::tensor::{Tensor, TensorData, Shape};
use burn::tensor::backend::Backend;
use nalgebra::SMatrix;
use crate::spatial::{Point, Vector};
use super::affine::AffineTransform;
use super::trait_::Transform;

/// Simple Translation Transform.
///
/// Translates points by a fixed offset vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslationTransform<const D: usize> {
    offset: Vector<D>,
}

impl<const D: usize> TranslationTransform<D> {
    /// Create a new translation transform.
    pub fn new(offset: Vector<D>) -> Self {
        Self { offset }
    }

    /// Build from a parameter slice of length `D`.
    pub fn from_parameters(parameters: &[f64]) -> Self {
        Self::new(Vector::from_slice(parameters))
    }

    /// Get the translation vector.
    pub fn offset(&self) -> &Vector<D> {
        &self.offset
    }

    pub fn inverse(&self) -> Self {
        Self::new(-self.offset)
    }

    pub fn to_affine(&self) -> AffineTransform<D> {
        AffineTransform::new(SMatrix::identity(), self.offset, Point::origin())
    }
}

impl<const D: usize> Transform<D> for TranslationTransform<D> {
    fn transform_point(&self, point: &Point<D>) -> Point<D> {
        *point + self.offset
    }

    fn transform_points<B: Backend>(&self, points: Tensor<B, 2>) -> Tensor<B, 2> {
        // Broadcast translation to [Batch, D]
        let t: Vec<f32> = (0..D).map(|i| self.offset[i] as f32).collect();
        let t = Tensor::<B, 2>::from_data(TensorData::new(t, Shape::new([1, D])), &points.device());
        points + t
    }
}
