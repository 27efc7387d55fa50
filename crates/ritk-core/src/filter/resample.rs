//! Resample image filter.
//!
//! This module provides ResampleImageFilter which resamples an image
//! onto an output grid using a transform and an interpolator.

use std::marker::PhantomData;
use burn::tensor::{Tensor, Shape};
use burn::tensor::backend::Backend;
use crate::error::Result;
use crate::image::{generate_grid, Image, ImageGeometry};
use crate::transform::trait_::Transform;
use crate::interpolation::trait_::Interpolator;

/// Resample image filter.
///
/// Resamples an image by applying a transform to map points from the
/// output image space to the input image space, and then interpolating values.
///
/// The transform maps from Output Physical Space -> Input Physical Space.
/// Output points whose continuous index falls outside the input buffer
/// (`[-0.5, n - 0.5)` on every axis) receive the default pixel value.
///
/// # Type Parameters
/// * `B` - The Burn backend
/// * `T` - The transform type
/// * `I` - The interpolator type
/// * `D` - The dimensionality (2 or 3)
pub struct ResampleImageFilter<B, T, I, const D: usize>
where
    B: Backend,
    T: Transform<D>,
    I: Interpolator<B>,
{
    output: ImageGeometry<D>,
    transform: T,
    interpolator: I,
    default_pixel_value: f64,
    _phantom: PhantomData<B>,
}

impl<B, T, I, const D: usize> ResampleImageFilter<B, T, I, D>
where
    B: Backend,
    T: Transform<D>,
    I: Interpolator<B>,
{
    /// Create a new resample filter.
    ///
    /// # Arguments
    /// * `output` - Output grid (size, origin, spacing, direction)
    /// * `transform` - Transform from output space to input space
    /// * `interpolator` - Interpolator for input image sampling
    pub fn new(output: ImageGeometry<D>, transform: T, interpolator: I) -> Self {
        Self {
            output,
            transform,
            interpolator,
            default_pixel_value: 0.0,
            _phantom: PhantomData,
        }
    }

    /// Set default pixel value for outside the field of view.
    pub fn with_default_pixel_value(mut self, value: f64) -> Self {
        self.default_pixel_value = value;
        self
    }

    /// Create from a reference image.
    ///
    /// Uses metadata (size, origin, spacing, direction) from the reference image.
    pub fn new_from_reference(reference: &Image<B, D>, transform: T, interpolator: I) -> Self {
        Self::new(reference.geometry(), transform, interpolator)
    }

    /// Apply filter to an input image.
    ///
    /// Fails when the input direction is singular or the interpolator does
    /// not support `D`.
    pub fn apply(&self, input: &Image<B, D>) -> Result<Image<B, D>> {
        let device = input.data().device();

        // 1. Grid of output indices
        let output_indices = generate_grid::<B, D>(self.output.size(), &device);

        // 2. Output indices -> output physical points
        let output_points = self.output.index_to_world_tensor(output_indices);

        // 3. Output space -> input space
        let input_points = self.transform.transform_points(output_points);

        // 4. Input physical points -> input continuous indices
        let input_indices = input.geometry().world_to_index_tensor(input_points)?;

        // 5. Inside-buffer mask
        let mask = Self::inside_mask(&input_indices, input.size());

        // 6. Interpolate and fill
        let values = self.interpolator.interpolate(input.data(), input_indices)?;
        let fill = mask.clone().neg().add_scalar(1.0).mul_scalar(self.default_pixel_value);
        let output_flat = values * mask + fill;

        // 7. Reshape to output tensor layout
        let output_data = output_flat.reshape(Shape::new(self.output.shape()));

        Ok(Image::from_geometry(output_data, &self.output))
    }

    fn inside_mask(indices: &Tensor<B, 2>, size: [usize; D]) -> Tensor<B, 1> {
        let [n, _] = indices.dims();
        let mut mask = Tensor::<B, 1>::ones([n], &indices.device());
        for (axis, &len) in size.iter().enumerate() {
            let column = indices.clone().narrow(1, axis, 1).squeeze::<1>(1);
            let lower = column.clone().greater_equal_elem(-0.5).float();
            let upper = column.lower_elem(len as f64 - 0.5).float();
            mask = mask * lower * upper;
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::TensorData;
    use burn_ndarray::NdArray;
    use crate::interpolation::{LinearInterpolator, NearestNeighborInterpolator};
    use crate::spatial::{Direction2, Point2, Spacing2, Vector};
    use crate::transform::TranslationTransform;

    type TestBackend = NdArray<f32>;

    fn square_image() -> Image<TestBackend, 2> {
        let device = Default::default();

        // 10x10 image with a 2x2 square at (4,4)-(5,5)
        let mut data = vec![0.0f32; 100];
        data[4 * 10 + 4] = 1.0;
        data[4 * 10 + 5] = 1.0;
        data[5 * 10 + 4] = 1.0;
        data[5 * 10 + 5] = 1.0;

        let tensor = Tensor::<TestBackend, 2>::from_data(TensorData::new(data, Shape::new([10, 10])), &device);
        Image::new(tensor, Point2::origin(), Spacing2::new([1.0, 1.0]), Direction2::identity())
    }

    #[test]
    fn test_resample_translation_2d() {
        let image = square_image();

        // Output -> input shift of (-2, -1) moves content by (+2, +1)
        let transform = TranslationTransform::new(Vector::new([-2.0, -1.0]));
        let filter = ResampleImageFilter::new_from_reference(&image, transform, LinearInterpolator::new());

        let result = filter.apply(&image).unwrap();
        let result_data = result.data().clone().into_data();
        let slice = result_data.as_slice::<f32>().unwrap();

        // (6,5), (7,5), (6,6), (7,6)
        assert!(slice[56] > 0.9);
        assert!(slice[57] > 0.9);
        assert!(slice[66] > 0.9);
        assert!(slice[67] > 0.9);
        // Original location is empty
        assert!(slice[44] < 0.1);
    }

    #[test]
    fn test_outside_samples_get_default_value() {
        let image = square_image();

        let transform = TranslationTransform::new(Vector::new([-3.0, 0.0]));
        let filter = ResampleImageFilter::new_from_reference(&image, transform, NearestNeighborInterpolator::new())
            .with_default_pixel_value(-7.0);

        let result = filter.apply(&image).unwrap();
        let result_data = result.data().clone().into_data();
        let slice = result_data.as_slice::<f32>().unwrap();

        // Columns 0..3 map to x in [-3, -1]: outside.
        for row in 0..10 {
            for col in 0..3 {
                assert_eq!(slice[row * 10 + col], -7.0);
            }
            assert_ne!(slice[row * 10 + 3], -7.0);
        }
    }

    #[test]
    fn test_output_grid_geometry() {
        let image = square_image();
        let output = ImageGeometry::new(
            [4, 6],
            Point2::new([1.0, 2.0]),
            Spacing2::new([2.0, 1.0]),
            Direction2::identity(),
        );
        let filter = ResampleImageFilter::new(
            output,
            TranslationTransform::new(Vector::zeros()),
            LinearInterpolator::new(),
        );

        let result = filter.apply(&image).unwrap();
        assert_eq!(result.shape(), [6, 4]);
        assert_eq!(result.geometry(), output);
    }
}
