//! Radial (barrel/pincushion) distortion about a center.

use burn::tensor::{Tensor, TensorData, Shape};
use burn::tensor::backend::Backend;
use crate::spatial::Point;
use super::trait_::Transform;

/// Polynomial radial distortion.
///
/// T(p) = p + (k1 r² + k2 r⁴ + k3 r⁶)(p - c), with r = |p - c|.
///
/// Positive coefficients push points outward (pincushion), negative ones
/// pull them in (barrel). No closed-form inverse exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialDistortionTransform<const D: usize> {
    coefficients: [f64; 3],
    center: Point<D>,
}

impl<const D: usize> RadialDistortionTransform<D> {
    pub fn new(coefficients: [f64; 3], center: Point<D>) -> Self {
        Self { coefficients, center }
    }

    pub fn coefficients(&self) -> [f64; 3] {
        self.coefficients
    }

    pub fn center(&self) -> &Point<D> {
        &self.center
    }

    fn factor(&self, r2: f64) -> f64 {
        let [k1, k2, k3] = self.coefficients;
        k1 * r2 + k2 * r2 * r2 + k3 * r2 * r2 * r2
    }
}

impl<const D: usize> Transform<D> for RadialDistortionTransform<D> {
    fn transform_point(&self, point: &Point<D>) -> Point<D> {
        let d = *point - self.center;
        let r2 = d.0.norm_squared();
        *point + d * self.factor(r2)
    }

    fn transform_points<B: Backend>(&self, points: Tensor<B, 2>) -> Tensor<B, 2> {
        let device = points.device();
        let c: Vec<f32> = (0..D).map(|i| self.center[i] as f32).collect();
        let c = Tensor::<B, 2>::from_data(TensorData::new(c, Shape::new([1, D])), &device);

        let d = points.clone() - c;
        let r2 = d.clone().powf_scalar(2.0).sum_dim(1);
        let r4 = r2.clone().powf_scalar(2.0);
        let r6 = r4.clone() * r2.clone();

        let [k1, k2, k3] = self.coefficients;
        let factor = r2.mul_scalar(k1) + r4.mul_scalar(k2) + r6.mul_scalar(k3);

        points + d * factor
    }
}
