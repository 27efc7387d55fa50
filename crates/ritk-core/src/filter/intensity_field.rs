//! Smooth Gaussian intensity fields.
//!
//! Mimics acquisition inhomogeneity: the image is multiplied by a broad
//! Gaussian bump centered on the image and then offset by a narrower one
//! placed near the first corner.

use burn::tensor::{Tensor, TensorData, Shape};
use burn::tensor::backend::Backend;
use crate::image::{generate_grid, Image, ImageGeometry};
use crate::spatial::{Point, Vector};

/// Peak value of both fields.
pub const FIELD_AMPLITUDE: f64 = 25.0;

/// Separable Gaussian bump evaluated on an image's physical grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianField<const D: usize> {
    pub mean: Point<D>,
    pub sigma: Vector<D>,
    pub amplitude: f64,
}

impl<const D: usize> GaussianField<D> {
    /// Evaluate `amplitude * exp(-0.5 * Σ((p - mean) / sigma)²)` at every pixel.
    ///
    /// The result has the image tensor layout.
    pub fn evaluate<B: Backend>(&self, geometry: &ImageGeometry<D>, device: &B::Device) -> Tensor<B, D> {
        let grid = generate_grid::<B, D>(geometry.size(), device);
        let points = geometry.index_to_world_tensor(grid);

        let mean: Vec<f32> = (0..D).map(|i| self.mean[i] as f32).collect();
        let sigma: Vec<f32> = (0..D).map(|i| self.sigma[i] as f32).collect();
        let mean = Tensor::<B, 2>::from_data(TensorData::new(mean, Shape::new([1, D])), device);
        let sigma = Tensor::<B, 2>::from_data(TensorData::new(sigma, Shape::new([1, D])), device);

        let exponent = ((points - mean) / sigma).powf_scalar(2.0).sum_dim(1).mul_scalar(-0.5);
        exponent
            .exp()
            .mul_scalar(self.amplitude)
            .reshape(Shape::new(geometry.shape()))
    }
}

/// Multiplicative field: centered on the image, sigma half the extent.
pub fn multiplicative_field<const D: usize>(geometry: &ImageGeometry<D>) -> GaussianField<D> {
    GaussianField {
        mean: geometry.center(),
        sigma: geometry.physical_extent() / 2.0,
        amplitude: FIELD_AMPLITUDE,
    }
}

/// Additive field: at index `size / 16`, sigma an eighth of the extent.
pub fn additive_field<const D: usize>(geometry: &ImageGeometry<D>) -> GaussianField<D> {
    let mut index = Point::origin();
    for (axis, &n) in geometry.size().iter().enumerate() {
        index[axis] = n as f64 / 16.0;
    }
    GaussianField {
        mean: geometry.index_to_physical(&index),
        sigma: geometry.physical_extent() / 8.0,
        amplitude: FIELD_AMPLITUDE,
    }
}

/// `multiplicative * image + additive`.
pub fn apply_intensity_fields<B: Backend, const D: usize>(image: &Image<B, D>) -> Image<B, D> {
    let geometry = image.geometry();
    let device = image.data().device();

    let scale = multiplicative_field(&geometry).evaluate::<B>(&geometry, &device);
    let offset = additive_field(&geometry).evaluate::<B>(&geometry, &device);

    image.with_data(image.data().clone() * scale + offset)
}
