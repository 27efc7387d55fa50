//! Affine transform implementation.
//!
//! This module provides an affine transform (linear transformation + translation).

use burn::tensor::{Tensor, TensorData, Shape};
use burn::tensor::backend::Backend;
use nalgebra::SMatrix;
use crate::error::{CoreError, Result};
use crate::spatial::{Direction, Point, Vector};
use super::trait_::Transform;

/// Affine Transform (Linear transformation + Translation).
///
/// Represents a general affine transformation with a fixed center:
/// T(x) = A(x - c) + c + t
///
/// where:
/// * A is a D×D matrix (linear transformation: rotation, scale, shear, reflection)
/// * t is a D-dimensional translation vector
/// * c is a D-dimensional fixed center of rotation/scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform<const D: usize> {
    matrix: SMatrix<f64, D, D>,
    translation: Vector<D>,
    center: Point<D>,
}

impl<const D: usize> AffineTransform<D> {
    /// Create a new affine transform.
    pub fn new(matrix: SMatrix<f64, D, D>, translation: Vector<D>, center: Point<D>) -> Self {
        Self {
            matrix,
            translation,
            center,
        }
    }

    /// Create an identity affine transform centered at the origin.
    pub fn identity() -> Self {
        Self::new(SMatrix::identity(), Vector::zeros(), Point::origin())
    }

    /// Affine transform whose linear part is an image direction matrix.
    pub fn from_direction(direction: &Direction<D>, translation: Vector<D>) -> Self {
        Self::new(*direction.inner(), translation, Point::origin())
    }

    /// Get the linear part.
    pub fn matrix(&self) -> &SMatrix<f64, D, D> {
        &self.matrix
    }

    /// Get the translation vector.
    pub fn translation(&self) -> &Vector<D> {
        &self.translation
    }

    /// Get the center of rotation.
    pub fn center(&self) -> &Point<D> {
        &self.center
    }

    /// Constant term of the map written as `A x + offset`.
    pub fn offset(&self) -> Vector<D> {
        let c = self.center.coords();
        self.translation + c - Vector(self.matrix * c.0)
    }

    /// Compose with an inner transform: `self ∘ inner` (inner applied first).
    ///
    /// The result is expressed with a zero center.
    pub fn compose(&self, inner: &Self) -> Self {
        let matrix = self.matrix * inner.matrix;
        let offset = Vector(self.matrix * inner.offset().0) + self.offset();
        Self::new(matrix, offset, Point::origin())
    }

    /// Inverse transform, sharing the same center.
    pub fn inverse(&self) -> Result<Self> {
        let inv = Direction(self.matrix).try_inverse().ok_or_else(|| {
            CoreError::SingularMatrix(format!("affine matrix {:?} is not invertible", self.matrix))
        })?;
        let translation = -(inv * self.translation);
        Ok(Self::new(inv.0, translation, self.center))
    }
}

impl<const D: usize> Transform<D> for AffineTransform<D> {
    fn transform_point(&self, point: &Point<D>) -> Point<D> {
        let centered = *point - self.center;
        self.center + Vector(self.matrix * centered.0) + self.translation
    }

    fn transform_points<B: Backend>(&self, points: Tensor<B, 2>) -> Tensor<B, 2> {
        // In row vector notation: y = x @ A^T + offset
        let device = points.device();

        let mut a_t = Vec::with_capacity(D * D);
        for r in 0..D {
            for c in 0..D {
                a_t.push(self.matrix[(c, r)] as f32);
            }
        }
        let a_t = Tensor::<B, 2>::from_data(TensorData::new(a_t, Shape::new([D, D])), &device);

        let offset = self.offset();
        let offset: Vec<f32> = (0..D).map(|i| offset[i] as f32).collect();
        let offset = Tensor::<B, 2>::from_data(TensorData::new(offset, Shape::new([1, D])), &device);

        points.matmul(a_t) + offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_affine_transform_translation_with_center() {
        let transform = AffineTransform::<2>::new(
            SMatrix::identity(),
            Vector::new([1.0, 1.0]),
            Point::new([10.0, 10.0]),
        );

        // T(c) = c + t
        let p = transform.transform_point(&Point::new([10.0, 10.0]));
        assert_eq!(p, Point::new([11.0, 11.0]));
    }

    #[test]
    fn test_affine_transform_scale_with_center() {
        let transform = AffineTransform::<2>::new(
            SMatrix::identity() * 2.0,
            Vector::zeros(),
            Point::new([1.0, 1.0]),
        );

        // x - c = [1, 0], A(x - c) = [2, 0], + c = [3, 1]
        let p = transform.transform_point(&Point::new([2.0, 1.0]));
        assert!(p.max_abs_diff(&Point::new([3.0, 1.0])) < 1e-12);
    }

    #[test]
    fn test_affine_inverse_and_compose() {
        let transform = AffineTransform::<2>::new(
            SMatrix::<f64, 2, 2>::new(0.0, -2.0, 1.0, 0.5),
            Vector::new([3.0, -4.0]),
            Point::new([5.0, 6.0]),
        );
        let inverse = transform.inverse().unwrap();

        let p = Point::new([-1.5, 8.25]);
        let roundtrip = inverse.transform_point(&transform.transform_point(&p));
        assert!(roundtrip.max_abs_diff(&p) < 1e-12);

        let identity = transform.compose(&inverse);
        assert!(identity.transform_point(&p).max_abs_diff(&p) < 1e-12);
    }

    #[test]
    fn test_singular_affine_has_no_inverse() {
        let transform = AffineTransform::<2>::new(SMatrix::zeros(), Vector::zeros(), Point::origin());
        assert!(matches!(transform.inverse(), Err(CoreError::SingularMatrix(_))));
    }

    #[test]
    fn test_affine_tensor_matches_point_path() {
        let device = Default::default();
        let transform = AffineTransform::<2>::new(
            SMatrix::<f64, 2, 2>::new(0.0, -1.0, 1.0, 0.0),
            Vector::new([1.0, 2.0]),
            Point::new([3.0, 3.0]),
        );

        let points = Tensor::<TestBackend, 2>::from_floats([[1.0, 0.0], [4.0, 5.0]], &device);
        let data = transform.transform_points(points).into_data();
        let slice = data.as_slice::<f32>().unwrap();

        for (row, input) in [[1.0, 0.0], [4.0, 5.0]].iter().enumerate() {
            let expected = transform.transform_point(&Point::new(*input));
            assert!((slice[row * 2] as f64 - expected[0]).abs() < 1e-5);
            assert!((slice[row * 2 + 1] as f64 - expected[1]).abs() < 1e-5);
        }
    }
}
