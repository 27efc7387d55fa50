//! Nearest neighbor interpolation implementation.

use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use crate::error::{CoreError, Result};
use super::trait_::Interpolator;

/// Nearest Neighbor Interpolator.
///
/// Rounds each continuous index to the closest grid point. Used for label
/// maps where blending values would be meaningless.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborInterpolator;

impl NearestNeighborInterpolator {
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Interpolator<B> for NearestNeighborInterpolator {
    fn interpolate<const D: usize>(&self, data: &Tensor<B, D>, indices: Tensor<B, 2>) -> Result<Tensor<B, 1>> {
        match D {
            3 => Ok(Self::interpolate_3d(data, indices)),
            2 => Ok(Self::interpolate_2d(data, indices)),
            _ => Err(CoreError::UnsupportedDimension(D)),
        }
    }
}

impl NearestNeighborInterpolator {
    fn interpolate_3d<B: Backend, const D: usize>(data: &Tensor<B, D>, indices: Tensor<B, 2>) -> Tensor<B, 1> {
        let shape = data.shape();
        let d0 = shape.dims[0]; // Z
        let d1 = shape.dims[1]; // Y
        let d2 = shape.dims[2]; // X

        // indices: (x, y, z)
        let x = indices.clone().narrow(1, 0, 1).squeeze::<1>(1);
        let y = indices.clone().narrow(1, 1, 1).squeeze::<1>(1);
        let z = indices.narrow(1, 2, 1).squeeze::<1>(1);

        let x_i = x.round().clamp(0.0, (d2 - 1) as f64).int();
        let y_i = y.round().clamp(0.0, (d1 - 1) as f64).int();
        let z_i = z.round().clamp(0.0, (d0 - 1) as f64).int();

        let idx = z_i * ((d1 * d2) as i32) + y_i * (d2 as i32) + x_i;
        data.clone().reshape([d0 * d1 * d2]).gather(0, idx)
    }

    fn interpolate_2d<B: Backend, const D: usize>(data: &Tensor<B, D>, indices: Tensor<B, 2>) -> Tensor<B, 1> {
        let shape = data.shape();
        let d0 = shape.dims[0]; // Y
        let d1 = shape.dims[1]; // X

        let x = indices.clone().narrow(1, 0, 1).squeeze::<1>(1);
        let y = indices.narrow(1, 1, 1).squeeze::<1>(1);

        let x_i = x.round().clamp(0.0, (d1 - 1) as f64).int();
        let y_i = y.round().clamp(0.0, (d0 - 1) as f64).int();

        let idx = y_i * (d1 as i32) + x_i;
        data.clone().reshape([d0 * d1]).gather(0, idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::{Shape, TensorData};
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_nearest_neighbor_interpolator_2d_axes() {
        let device = Default::default();
        // Shape [Y=2, X=3]
        let data = Tensor::<TestBackend, 2>::from_data(
            TensorData::new(vec![0.0f32, 1.0, 2.0, 10.0, 11.0, 12.0], Shape::new([2, 3])),
            &device,
        );
        let indices = Tensor::<TestBackend, 2>::from_floats([[2.0, 0.0], [0.4, 0.6], [1.6, 0.2]], &device);

        let result = NearestNeighborInterpolator::new().interpolate(&data, indices).unwrap();
        let result = result.into_data();
        assert_eq!(result.as_slice::<f32>().unwrap(), &[2.0, 10.0, 2.0]);
    }

    #[test]
    fn test_nearest_neighbor_interpolator_3d_clamps() {
        let device = Default::default();
        let data = Tensor::<TestBackend, 3>::from_data(
            TensorData::new((0..8).map(|v| v as f32).collect::<Vec<_>>(), Shape::new([2, 2, 2])),
            &device,
        );
        let indices = Tensor::<TestBackend, 2>::from_floats([[5.0, -3.0, 0.9]], &device);

        let result = NearestNeighborInterpolator::new().interpolate(&data, indices).unwrap();
        // (x=1, y=0, z=1) -> 4 + 1
        assert_eq!(result.into_data().as_slice::<f32>().unwrap(), &[5.0]);
    }

    #[test]
    fn test_unsupported_rank() {
        let device = Default::default();
        let data = Tensor::<TestBackend, 1>::zeros([4], &device);
        let indices = Tensor::<TestBackend, 2>::zeros([1, 1], &device);
        assert!(matches!(
            NearestNeighborInterpolator::new().interpolate(&data, indices),
            Err(CoreError::UnsupportedDimension(1))
        ));
    }
}
