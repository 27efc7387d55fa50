//! Image geometry: the metadata-only view of an image.
//!
//! An [`ImageGeometry`] describes how a regular sampling grid sits in
//! physical space (size, origin, spacing, direction) without carrying any
//! pixel data. It is what the reference domain, the resampler and the
//! transform composer operate on.

use burn::tensor::{Tensor, TensorData, Shape};
use burn::tensor::backend::Backend;
use crate::error::{CoreError, Result};
use crate::spatial::{Point, Vector, Spacing, Direction};

/// Physical-space description of a sampling grid.
///
/// `size`, `origin` and `spacing` are ordered along physical axes (x first).
/// Tensor dimensions are the reverse (`[H, W]`, `[Z, Y, X]`), see
/// [`ImageGeometry::shape`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageGeometry<const D: usize> {
    size: [usize; D],
    origin: Point<D>,
    spacing: Spacing<D>,
    direction: Direction<D>,
}

impl<const D: usize> ImageGeometry<D> {
    /// Create a geometry from its four components.
    pub fn new(
        size: [usize; D],
        origin: Point<D>,
        spacing: Spacing<D>,
        direction: Direction<D>,
    ) -> Self {
        Self {
            size,
            origin,
            spacing,
            direction,
        }
    }

    /// Geometry with zero origin, unit spacing and identity direction.
    pub fn with_size(size: [usize; D]) -> Self {
        Self::new(size, Point::origin(), Spacing::uniform(1.0), Direction::identity())
    }

    /// Number of samples along each physical axis.
    pub fn size(&self) -> [usize; D] {
        self.size
    }

    /// Tensor shape of an image with this geometry.
    pub fn shape(&self) -> [usize; D] {
        let mut shape = self.size;
        shape.reverse();
        shape
    }

    /// Physical coordinate of the sample at index zero.
    pub fn origin(&self) -> &Point<D> {
        &self.origin
    }

    /// Physical distance between samples along each axis.
    pub fn spacing(&self) -> &Spacing<D> {
        &self.spacing
    }

    /// Direction cosines of the image axes.
    pub fn direction(&self) -> &Direction<D> {
        &self.direction
    }

    /// Total number of samples.
    pub fn num_pixels(&self) -> usize {
        self.size.iter().product()
    }

    /// Physical span of the grid along each index axis: `(size - 1) * spacing`.
    pub fn physical_extent(&self) -> Vector<D> {
        let mut extent = Vector::zeros();
        for i in 0..D {
            extent[i] = self.size[i].saturating_sub(1) as f64 * self.spacing[i];
        }
        extent
    }

    /// Map a continuous index to a physical point.
    ///
    /// `point = origin + Direction * (index * spacing)`
    pub fn index_to_physical(&self, index: &Point<D>) -> Point<D> {
        let scaled = index.coords().component_mul(&self.spacing);
        self.origin + self.direction * scaled
    }

    /// Map a physical point to a continuous index.
    ///
    /// `index = (Direction^-1 * (point - origin)) / spacing`
    pub fn physical_to_index(&self, point: &Point<D>) -> Result<Point<D>> {
        let inv_dir = self.inverse_direction()?;
        let rotated = inv_dir * (*point - self.origin);
        Ok(Point(rotated.component_div(&self.spacing).0.into()))
    }

    /// Physical point at continuous index `size / 2`.
    pub fn center(&self) -> Point<D> {
        let mut index = Point::origin();
        for i in 0..D {
            index[i] = self.size[i] as f64 / 2.0;
        }
        self.index_to_physical(&index)
    }

    /// Physical point at continuous index `(size - 1) / 2`, the mirror axis of the grid.
    pub fn grid_midpoint(&self) -> Point<D> {
        let mut index = Point::origin();
        for i in 0..D {
            index[i] = self.size[i].saturating_sub(1) as f64 / 2.0;
        }
        self.index_to_physical(&index)
    }

    /// Inverse of the direction matrix.
    pub fn inverse_direction(&self) -> Result<Direction<D>> {
        self.direction.try_inverse().ok_or_else(|| {
            CoreError::SingularMatrix(format!(
                "direction {:?} is not invertible",
                self.direction.to_row_major()
            ))
        })
    }

    /// Batch transform continuous indices to physical points.
    ///
    /// `indices` has shape `[Batch, D]`; rows are `(x, y[, z])`.
    pub fn index_to_world_tensor<B: Backend>(&self, indices: Tensor<B, 2>) -> Tensor<B, 2> {
        let device = indices.device();

        // P = O + I @ M, M_rc = S_r * D_cr
        let mut m_data = Vec::with_capacity(D * D);
        for r in 0..D {
            for c in 0..D {
                m_data.push((self.spacing[r] * self.direction[(c, r)]) as f32);
            }
        }
        let m_tensor = Tensor::<B, 2>::from_data(TensorData::new(m_data, Shape::new([D, D])), &device);

        indices.matmul(m_tensor) + self.origin_tensor(&device)
    }

    /// Batch transform physical points to continuous indices.
    pub fn world_to_index_tensor<B: Backend>(&self, points: Tensor<B, 2>) -> Result<Tensor<B, 2>> {
        let device = points.device();
        let inv_dir = self.inverse_direction()?;

        // I = (P - O) @ T, T_rc = (D^-1)_cr / S_c
        let mut t_data = Vec::with_capacity(D * D);
        for r in 0..D {
            for c in 0..D {
                t_data.push((inv_dir[(c, r)] / self.spacing[c]) as f32);
            }
        }
        let t_tensor = Tensor::<B, 2>::from_data(TensorData::new(t_data, Shape::new([D, D])), &device);

        Ok((points - self.origin_tensor(&device)).matmul(t_tensor))
    }

    fn origin_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 2> {
        let origin: Vec<f32> = (0..D).map(|i| self.origin[i] as f32).collect();
        Tensor::<B, 2>::from_data(TensorData::new(origin, Shape::new([1, D])), device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_extent_and_center() {
        let geometry = ImageGeometry::<2>::new(
            [100, 80],
            Point::new([10.0, -5.0]),
            Spacing::new([0.5, 2.0]),
            Direction::identity(),
        );
        assert_eq!(geometry.physical_extent(), Vector::new([49.5, 158.0]));
        assert_eq!(geometry.center(), Point::new([35.0, 75.0]));
        assert_eq!(geometry.grid_midpoint(), Point::new([34.75, 74.0]));
        assert_eq!(geometry.shape(), [80, 100]);
        assert_eq!(geometry.num_pixels(), 8000);
    }

    #[test]
    fn test_rotated_index_roundtrip() {
        let geometry = ImageGeometry::<2>::new(
            [10, 10],
            Point::new([1.0, 2.0]),
            Spacing::new([2.0, 3.0]),
            Direction::from_row_major(&[0.0, -1.0, 1.0, 0.0]),
        );

        // Index (1, 0) moves along the first column of the direction: +y
        let p = geometry.index_to_physical(&Point::new([1.0, 0.0]));
        assert!(p.max_abs_diff(&Point::new([1.0, 4.0])) < 1e-12);

        let index = geometry.physical_to_index(&Point::new([-5.0, 7.0])).unwrap();
        let back = geometry.index_to_physical(&index);
        assert!(back.max_abs_diff(&Point::new([-5.0, 7.0])) < 1e-12);
    }

    #[test]
    fn test_singular_direction_is_reported() {
        let geometry = ImageGeometry::<2>::new(
            [4, 4],
            Point::origin(),
            Spacing::uniform(1.0),
            Direction::zeros(),
        );
        assert!(matches!(
            geometry.physical_to_index(&Point::origin()),
            Err(CoreError::SingularMatrix(_))
        ));
    }

    #[test]
    fn test_tensor_mapping_matches_scalar_mapping() {
        let device = Default::default();
        let geometry = ImageGeometry::<2>::new(
            [8, 6],
            Point::new([3.0, -1.0]),
            Spacing::new([0.5, 1.5]),
            Direction::from_row_major(&[0.0, 1.0, -1.0, 0.0]),
        );

        let indices = Tensor::<TestBackend, 2>::from_floats([[2.0, 3.0], [0.5, 4.0]], &device);
        let points = geometry.index_to_world_tensor(indices.clone());
        let data = points.clone().into_data();
        let slice = data.as_slice::<f32>().unwrap();

        let expected = geometry.index_to_physical(&Point::new([2.0, 3.0]));
        assert!((slice[0] as f64 - expected[0]).abs() < 1e-5);
        assert!((slice[1] as f64 - expected[1]).abs() < 1e-5);

        let back = geometry.world_to_index_tensor(points).unwrap().into_data();
        let back = back.as_slice::<f32>().unwrap();
        let original = indices.into_data();
        let original = original.as_slice::<f32>().unwrap();
        for (a, b) in back.iter().zip(original.iter()) {
            assert!((a - b).abs() < 1e-4);
        }
    }
}
