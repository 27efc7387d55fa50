//! Transform trait for spatial coordinate transformations.
//!
//! This module defines the core Transform trait that all spatial transforms implement.

use burn::tensor::{Tensor, TensorData, Shape};
use burn::tensor::backend::Backend;
use crate::spatial::Point;

/// Transform trait for spatial coordinate transformations.
///
/// Maps points from one physical space to another. Transforms are plain
/// value objects (`f64` parameters, no shared state); the tensor entry
/// point exists so the resampler can push a whole grid through at once.
///
/// # Type Parameters
/// * `D` - The spatial dimensionality (2 or 3)
pub trait Transform<const D: usize> {
    /// Apply the transform to a single point.
    fn transform_point(&self, point: &Point<D>) -> Point<D>;

    /// Apply the transform to a batch of points.
    ///
    /// # Arguments
    /// * `points` - Tensor of shape `[Batch, D]` containing the input points
    ///
    /// # Returns
    /// Tensor of shape `[Batch, D]` containing the transformed points.
    ///
    /// The default implementation maps every row through
    /// [`Transform::transform_point`] on the host.
    fn transform_points<B: Backend>(&self, points: Tensor<B, 2>) -> Tensor<B, 2> {
        let device = points.device();
        let [n, _] = points.dims();
        let data = points.into_data();
        let coords: Vec<f64> = data.iter::<f64>().collect();

        let mut out = Vec::with_capacity(n * D);
        for row in coords.chunks_exact(D) {
            let p = self.transform_point(&Point::from_slice(row));
            out.extend((0..D).map(|i| p[i] as f32));
        }

        Tensor::<B, 2>::from_data(TensorData::new(out, Shape::new([n, D])), &device)
    }
}
