//! Axis reflection about a center point.

use nalgebra::SMatrix;
use crate::spatial::{Point, Vector};
use super::affine::AffineTransform;
use super::trait_::Transform;

/// Reflection through the hyperplanes orthogonal to a set of axes.
///
/// The linear part is a diagonal matrix with `-1` on reflected axes and
/// `+1` elsewhere. It is its own inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectionTransform<const D: usize> {
    signs: Vector<D>,
    center: Point<D>,
}

impl<const D: usize> ReflectionTransform<D> {
    /// Reflect along `axes` (physical axis indices; out-of-range ones are ignored).
    pub fn new(axes: &[usize], center: Point<D>) -> Self {
        let mut signs = Vector::new([1.0; D]);
        for &axis in axes.iter().filter(|&&a| a < D) {
            signs[axis] = -1.0;
        }
        Self { signs, center }
    }

    /// Build from per-axis flags, `true` meaning reflect.
    pub fn from_flags(flags: [bool; D], center: Point<D>) -> Self {
        let axes: Vec<usize> = (0..D).filter(|&i| flags[i]).collect();
        Self::new(&axes, center)
    }

    /// Diagonal reflection matrix.
    pub fn matrix(&self) -> SMatrix<f64, D, D> {
        SMatrix::from_diagonal(&self.signs.0)
    }

    pub fn center(&self) -> &Point<D> {
        &self.center
    }

    /// Axes that are reflected.
    pub fn axes(&self) -> Vec<usize> {
        (0..D).filter(|&i| self.signs[i] < 0.0).collect()
    }

    pub fn inverse(&self) -> Self {
        *self
    }

    pub fn to_affine(&self) -> AffineTransform<D> {
        AffineTransform::new(self.matrix(), Vector::zeros(), self.center)
    }
}

impl<const D: usize> Transform<D> for ReflectionTransform<D> {
    fn transform_point(&self, point: &Point<D>) -> Point<D> {
        let centered = *point - self.center;
        self.center + centered.component_mul(&self.signs)
    }

    fn transform_points<B: burn::tensor::backend::Backend>(
        &self,
        points: burn::tensor::Tensor<B, 2>,
    ) -> burn::tensor::Tensor<B, 2> {
        self.to_affine().transform_points(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflection_matrix() {
        let reflection = ReflectionTransform::<3>::new(&[0, 2], Point::origin());
        let m = reflection.matrix();
        assert_eq!(m[(0, 0)], -1.0);
        assert_eq!(m[(1, 1)], 1.0);
        assert_eq!(m[(2, 2)], -1.0);
        assert_eq!(m[(0, 1)], 0.0);
        assert_eq!(reflection.axes(), vec![0, 2]);
    }

    #[test]
    fn test_reflection_about_center_is_involution() {
        let reflection = ReflectionTransform::<2>::from_flags([true, false], Point::new([2.0, 5.0]));
        let p = Point::new([3.0, 1.0]);
        let q = reflection.transform_point(&p);
        assert_eq!(q, Point::new([1.0, 1.0]));
        assert_eq!(reflection.inverse().transform_point(&q), p);
    }
}
