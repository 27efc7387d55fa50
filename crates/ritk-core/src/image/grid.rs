use burn::tensor::{Tensor, TensorData, Shape};
use burn::tensor::backend::Backend;

/// Generate a grid of continuous indices for an image with the given size.
///
/// `size` is ordered along physical axes. Returns a tensor of shape `[N, D]`
/// whose rows are `(x, y[, z])`, with x varying fastest so that row `k`
/// matches element `k` of the flattened image tensor.
pub fn generate_grid<B, const D: usize>(
    size: [usize; D],
    device: &B::Device,
) -> Tensor<B, 2>
where
    B: Backend,
{
    let total: usize = size.iter().product();
    let mut grid = Vec::with_capacity(total * D);
    let mut index = [0usize; D];

    for _ in 0..total {
        grid.extend(index.iter().map(|&i| i as f32));

        // Odometer increment, x first.
        for axis in 0..D {
            index[axis] += 1;
            if index[axis] < size[axis] {
                break;
            }
            index[axis] = 0;
        }
    }

    Tensor::<B, 1>::from_data(TensorData::new(grid, Shape::new([total * D])), device)
        .reshape([total, D])
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_grid_2d_order() {
        let device = Default::default();
        let grid = generate_grid::<TestBackend, 2>([3, 2], &device);
        assert_eq!(grid.dims(), [6, 2]);

        let data = grid.into_data();
        assert_eq!(
            data.as_slice::<f32>().unwrap(),
            &[0.0, 0.0, 1.0, 0.0, 2.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0]
        );
    }

    #[test]
    fn test_grid_3d_shape() {
        let device = Default::default();
        let grid = generate_grid::<TestBackend, 3>([4, 3, 2], &device);
        assert_eq!(grid.dims(), [24, 3]);

        let data = grid.into_data();
        let slice = data.as_slice::<f32>().unwrap();
        // Last row is the far corner.
        assert_eq!(&slice[69..72], &[3.0, 2.0, 1.0]);
    }
}
