//! Image type with physical metadata and coordinate transformations.
//!
//! This module provides the Image struct which represents medical images
//! with tensor data and physical space metadata (origin, spacing, direction).

use burn::tensor::{Int, Tensor};
use burn::tensor::backend::Backend;
use crate::error::Result;
use crate::spatial::{Point, Spacing, Direction};
use super::geometry::ImageGeometry;

/// Medical image with physical metadata.
///
/// The Image type combines tensor data (potentially on GPU) with physical
/// space metadata that describes how image indices map to physical coordinates.
///
/// # Type Parameters
/// * `B` - The backend (CPU or GPU) for tensor operations
/// * `D` - The dimensionality of the image (2 or 3)
///
/// # Coordinate Systems
/// * **Index Space**: continuous indices ordered along physical axes `(x, y[, z])`
/// * **Physical Space**: continuous coordinates in mm or other units
///
/// Tensor dimensions are the reverse of the physical axes, so a 2D image
/// of width `W` and height `H` holds a `[H, W]` tensor.
///
/// # Examples
/// ```rust
/// use ritk_core::Image;
/// use ritk_core::spatial::{Point2, Spacing2, Direction2};
/// use burn::tensor::Tensor;
/// use burn_ndarray::NdArray;
///
/// type Backend = NdArray<f32>;
///
/// let device = Default::default();
/// let data = Tensor::<Backend, 2>::zeros([120, 80], &device);
/// let image = Image::new(data, Point2::origin(), Spacing2::uniform(1.0), Direction2::identity());
/// assert_eq!(image.size(), [80, 120]);
/// ```
#[derive(Debug, Clone)]
pub struct Image<B: Backend, const D: usize> {
    /// The pixel data, potentially on GPU.
    data: Tensor<B, D>,
    /// Physical coordinate of the first pixel.
    origin: Point<D>,
    /// Physical distance between pixels along each axis.
    spacing: Spacing<D>,
    /// Orientation of the image axes.
    direction: Direction<D>,
}

impl<B: Backend, const D: usize> Image<B, D> {
    /// Create a new image with the given data and metadata.
    pub fn new(
        data: Tensor<B, D>,
        origin: Point<D>,
        spacing: Spacing<D>,
        direction: Direction<D>,
    ) -> Self {
        Self {
            data,
            origin,
            spacing,
            direction,
        }
    }

    /// Create an image from data and a geometry.
    ///
    /// The geometry size is not checked against the tensor shape; the
    /// tensor is authoritative.
    pub fn from_geometry(data: Tensor<B, D>, geometry: &ImageGeometry<D>) -> Self {
        Self::new(data, *geometry.origin(), *geometry.spacing(), *geometry.direction())
    }

    /// Get the image data tensor.
    pub fn data(&self) -> &Tensor<B, D> {
        &self.data
    }

    /// Consume the image and return its data tensor.
    pub fn into_data(self) -> Tensor<B, D> {
        self.data
    }

    /// Get the origin (physical coordinate of first pixel).
    pub fn origin(&self) -> &Point<D> {
        &self.origin
    }

    /// Get the spacing (physical distance between pixels).
    pub fn spacing(&self) -> &Spacing<D> {
        &self.spacing
    }

    /// Get the direction (orientation matrix).
    pub fn direction(&self) -> &Direction<D> {
        &self.direction
    }

    /// Get the tensor shape (reversed physical axes).
    pub fn shape(&self) -> [usize; D] {
        self.data.dims()
    }

    /// Number of pixels along each physical axis.
    pub fn size(&self) -> [usize; D] {
        let mut size = self.shape();
        size.reverse();
        size
    }

    /// Metadata-only view of this image.
    pub fn geometry(&self) -> ImageGeometry<D> {
        ImageGeometry::new(self.size(), self.origin, self.spacing, self.direction)
    }

    /// Replace the pixel data, keeping the metadata.
    pub fn with_data(&self, data: Tensor<B, D>) -> Self {
        Self::new(data, self.origin, self.spacing, self.direction)
    }

    /// Convert a continuous physical point to a continuous index.
    ///
    /// Fails when the direction matrix is singular.
    pub fn transform_physical_point_to_continuous_index(&self, point: &Point<D>) -> Result<Point<D>> {
        self.geometry().physical_to_index(point)
    }

    /// Convert a continuous index to a physical point.
    pub fn transform_continuous_index_to_physical_point(&self, index: &Point<D>) -> Point<D> {
        self.geometry().index_to_physical(index)
    }

    /// Reverse the pixel order along the given physical axes.
    ///
    /// Only the data is flipped: origin, spacing and direction are kept, so
    /// this is the "flip by slicing" operation.
    pub fn flip_axes(&self, axes: &[usize]) -> Self {
        let device = self.data.device();
        let shape = self.shape();
        let mut data = self.data.clone();

        for &axis in axes {
            assert!(axis < D, "Flip axis {} out of range for {}D image", axis, D);
            let dim = D - 1 - axis;
            let n = shape[dim] as i64;
            let reversed = Tensor::<B, 1, Int>::arange(0..n, &device)
                .mul_scalar(-1)
                .add_scalar(n - 1);
            data = data.select(dim, reversed);
        }

        self.with_data(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::{Shape, TensorData};
    use burn_ndarray::NdArray;

    type Backend = NdArray<f32>;
    type Point3 = Point<3>;
    type Spacing3 = Spacing<3>;
    type Direction3 = Direction<3>;

    fn make_image(origin: Point3, spacing: Spacing3) -> Image<Backend, 3> {
        let device = Default::default();
        let data = Tensor::<Backend, 3>::zeros([4, 6, 10], &device);
        Image::new(data, origin, spacing, Direction3::identity())
    }

    #[test]
    fn test_image_creation() {
        let image = make_image(Point3::origin(), Spacing3::uniform(1.0));
        assert_eq!(image.shape(), [4, 6, 10]);
        assert_eq!(image.size(), [10, 6, 4]);
        assert_eq!(image.geometry().size(), [10, 6, 4]);
    }

    #[test]
    fn test_non_unit_spacing_and_origin() {
        let image = make_image(Point3::new([10.0, 20.0, 30.0]), Spacing3::new([2.0, 2.0, 2.0]));

        let index = image
            .transform_physical_point_to_continuous_index(&Point3::new([20.0, 30.0, 40.0]))
            .unwrap();
        assert!((index[0] - 5.0).abs() < 1e-9);
        assert!((index[1] - 5.0).abs() < 1e-9);
        assert!((index[2] - 5.0).abs() < 1e-9);

        let point = image.transform_continuous_index_to_physical_point(&index);
        assert!(point.max_abs_diff(&Point3::new([20.0, 30.0, 40.0])) < 1e-9);
    }

    #[test]
    fn test_flip_axes_reverses_data_only() {
        let device = Default::default();
        let data = Tensor::<Backend, 2>::from_data(
            TensorData::new(vec![0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0], Shape::new([2, 3])),
            &device,
        );
        let image = Image::new(data, Point::new([1.0, 2.0]), Spacing::uniform(1.0), Direction::identity());

        // Physical axis 0 (x) is the last tensor dimension.
        let flipped_x = image.flip_axes(&[0]).into_data().into_data();
        assert_eq!(flipped_x.as_slice::<f32>().unwrap(), &[2.0, 1.0, 0.0, 5.0, 4.0, 3.0]);

        let flipped_y = image.flip_axes(&[1]);
        assert_eq!(flipped_y.origin(), image.origin());
        let flipped_y = flipped_y.into_data().into_data();
        assert_eq!(flipped_y.as_slice::<f32>().unwrap(), &[3.0, 4.0, 5.0, 0.0, 1.0, 2.0]);
    }
}
