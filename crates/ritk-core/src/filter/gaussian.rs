use burn::tensor::{Tensor, Shape};
use burn::tensor::backend::Backend;
use burn::tensor::ops::ConvOptions;
use crate::image::Image;
use crate::spatial::Spacing;

/// Gaussian smoothing filter.
///
/// Applies a Gaussian smoothing filter to an image using separable 1D convolutions.
/// Sigmas are in physical units and indexed by physical axis; the kernel
/// width along each axis follows that axis' spacing.
pub struct GaussianFilter<B: Backend> {
    sigmas: Vec<f64>,
    max_kernel_width: usize,
    _b: std::marker::PhantomData<B>,
}

impl<B: Backend> GaussianFilter<B> {
    /// Create a new Gaussian filter with the given standard deviation (in physical units).
    ///
    /// # Arguments
    /// * `sigmas` - Standard deviation per physical axis. A single value applies to every axis.
    pub fn new(sigmas: Vec<f64>) -> Self {
        Self {
            sigmas,
            max_kernel_width: 32,
            _b: std::marker::PhantomData,
        }
    }

    /// Create from variances instead of standard deviations.
    pub fn from_variances(variances: Vec<f64>) -> Self {
        Self::new(variances.into_iter().map(|v| v.max(0.0).sqrt()).collect())
    }

    /// Set the maximum kernel width (radius * 2 + 1).
    pub fn with_max_kernel_width(mut self, width: usize) -> Self {
        self.max_kernel_width = width.max(1);
        self
    }

    /// Apply the filter to an image.
    pub fn apply<const D: usize>(&self, image: &Image<B, D>) -> Image<B, D> {
        image.with_data(self.apply_tensor(image.data().clone(), image.spacing()))
    }

    /// Apply the filter to a tensor directly.
    ///
    /// # Arguments
    /// * `input` - Input tensor, dimensions in reversed physical order
    /// * `spacing` - Physical spacing of the data (used to determine kernel size)
    pub fn apply_tensor<const D: usize>(&self, input: Tensor<B, D>, spacing: &Spacing<D>) -> Tensor<B, D> {
        let mut data = input;
        let device = data.device();

        for axis in 0..D {
            let sigma = self.sigmas.get(axis).or(self.sigmas.first()).copied().unwrap_or(0.0);
            if sigma <= 1e-6 {
                continue;
            }

            let pixel_sigma = sigma / spacing[axis];
            let radius = (3.0 * pixel_sigma).ceil() as usize;
            let width = (2 * radius + 1).min(self.max_kernel_width);
            let actual_radius = (width.max(1) - 1) / 2;

            let kernel = Self::generate_kernel(pixel_sigma, actual_radius);
            let kernel_tensor = Tensor::<B, 1>::from_floats(kernel.as_slice(), &device);

            // Physical axis `axis` is tensor dimension D-1-axis.
            data = Self::convolve_1d::<D>(data, kernel_tensor, D - 1 - axis);
        }
        data
    }

    fn generate_kernel(sigma: f64, radius: usize) -> Vec<f32> {
        let two_sigma2 = 2.0 * sigma * sigma;
        let raw: Vec<f64> = (0..=(2 * radius))
            .map(|i| {
                let x = i as f64 - radius as f64;
                (-x * x / two_sigma2).exp()
            })
            .collect();
        let sum: f64 = raw.iter().sum();
        raw.into_iter().map(|v| (v / sum) as f32).collect()
    }

    fn convolve_1d<const D: usize>(input: Tensor<B, D>, kernel: Tensor<B, 1>, dim: usize) -> Tensor<B, D> {
        let dims: [usize; D] = input.dims();

        // 1. Move target dimension last
        let mut permute_indices = [0isize; D];
        let mut idx = 0;
        for i in 0..D {
            if i != dim {
                permute_indices[idx] = i as isize;
                idx += 1;
            }
        }
        permute_indices[D - 1] = dim as isize;

        let input_permuted = input.permute(permute_indices);

        // 2. Flatten the rest into the batch: [Batch, 1, Length]
        let last_dim_size = dims[dim];
        let batch_size: usize = (0..D).filter(|&i| i != dim).map(|i| dims[i]).product();
        let input_reshaped = input_permuted.reshape([batch_size, 1, last_dim_size]);

        let kernel_size = kernel.dims()[0];
        let kernel_reshaped = kernel.reshape([1, 1, kernel_size]);

        // Odd kernel, stride 1: size preserved
        let padding = kernel_size / 2;
        let options = ConvOptions::new([1], [padding], [1], 1);
        let output_reshaped = burn::tensor::module::conv1d(input_reshaped, kernel_reshaped, None, options);

        // 3. Back to permuted shape, then undo the permutation
        let mut permuted_shape = [0; D];
        for (p, &old) in permute_indices.iter().enumerate() {
            permuted_shape[p] = dims[old as usize];
        }
        let output_permuted = output_reshaped.reshape(Shape::new(permuted_shape));

        let mut inv_permute_indices = [0isize; D];
        for (new_pos, &old_pos) in permute_indices.iter().enumerate() {
            inv_permute_indices[old_pos as usize] = new_pos as isize;
        }

        output_permuted.permute(inv_permute_indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::TensorData;
    use burn_ndarray::NdArray;
    use crate::spatial::{Direction, Point};

    type TestBackend = NdArray<f32>;

    fn impulse(shape: [usize; 2], at: [usize; 2]) -> Tensor<TestBackend, 2> {
        let mut values = vec![0.0f32; shape[0] * shape[1]];
        values[at[0] * shape[1] + at[1]] = 1.0;
        Tensor::from_data(TensorData::new(values, Shape::new(shape)), &Default::default())
    }

    #[test]
    fn test_kernel_is_normalized() {
        let kernel = GaussianFilter::<TestBackend>::generate_kernel(1.5, 4);
        assert_eq!(kernel.len(), 9);
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(kernel[4] > kernel[3]);
    }

    #[test]
    fn test_smoothing_preserves_mass_in_interior() {
        let data = impulse([21, 21], [10, 10]);
        let filter = GaussianFilter::<TestBackend>::new(vec![1.0]);
        let out = filter.apply_tensor(data, &Spacing::uniform(1.0));

        let total: f32 = out.sum().into_scalar();
        assert!((total - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_sigma_follows_physical_axis() {
        // Blur only along x (physical axis 0, tensor dim 1).
        let data = impulse([11, 11], [5, 5]);
        let image = Image::new(data, Point::origin(), Spacing::uniform(1.0), Direction::identity());
        let filter = GaussianFilter::<TestBackend>::new(vec![1.0, 0.0]);
        let out = filter.apply(&image).into_data().into_data();
        let slice = out.as_slice::<f32>().unwrap();

        // Neighbor along x picks up mass, neighbor along y does not.
        assert!(slice[5 * 11 + 6] > 0.1);
        assert_eq!(slice[6 * 11 + 5], 0.0);
    }

    #[test]
    fn test_from_variances() {
        let filter = GaussianFilter::<TestBackend>::from_variances(vec![4.0]);
        assert_eq!(filter.sigmas, vec![2.0]);
    }
}
