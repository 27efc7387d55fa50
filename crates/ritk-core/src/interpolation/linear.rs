//! N-linear interpolation.
//!
//! The value at a continuous index is the weighted sum over the `2^D`
//! corners of the enclosing grid cell. Neighbours past the buffer edge are
//! clamped onto it.

use burn::tensor::{Int, Tensor};
use burn::tensor::backend::Backend;
use crate::error::{CoreError, Result};
use super::trait_::Interpolator;

/// Bilinear (2D) or trilinear (3D) interpolator.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearInterpolator;

impl LinearInterpolator {
    pub fn new() -> Self {
        Self
    }
}

/// Cell bounds and weight along one physical axis.
struct AxisSpan<B: Backend> {
    lower: Tensor<B, 1, Int>,
    upper: Tensor<B, 1, Int>,
    weight: Tensor<B, 1>,
    stride: i32,
}

impl<B: Backend> Interpolator<B> for LinearInterpolator {
    fn interpolate<const D: usize>(&self, data: &Tensor<B, D>, indices: Tensor<B, 2>) -> Result<Tensor<B, 1>> {
        if D != 2 && D != 3 {
            return Err(CoreError::UnsupportedDimension(D));
        }

        // Tensor dims run z, y, x; index columns run x, y, z.
        let dims = data.dims();
        let [n, _] = indices.dims();
        let device = indices.device();
        let flat = data.clone().reshape([dims.iter().product::<usize>()]);

        let mut stride = 1usize;
        let spans: Vec<AxisSpan<B>> = (0..D)
            .map(|axis| {
                let len = dims[D - 1 - axis];
                let max = (len - 1) as f64;
                let coord = indices.clone().narrow(1, axis, 1).squeeze::<1>(1);
                let floor = coord.clone().floor();
                let span = AxisSpan {
                    lower: floor.clone().clamp(0.0, max).int(),
                    upper: (floor.clone() + 1.0).clamp(0.0, max).int(),
                    weight: coord - floor,
                    stride: stride as i32,
                };
                stride *= len;
                span
            })
            .collect();

        let mut result = Tensor::<B, 1>::zeros([n], &device);
        for corner in 0..(1usize << D) {
            let mut offset = Tensor::<B, 1, Int>::zeros([n], &device);
            let mut weight = Tensor::<B, 1>::ones([n], &device);
            for (axis, span) in spans.iter().enumerate() {
                if (corner >> axis) & 1 == 1 {
                    offset = offset + span.upper.clone() * span.stride;
                    weight = weight * span.weight.clone();
                } else {
                    offset = offset + span.lower.clone() * span.stride;
                    weight = weight * span.weight.clone().neg().add_scalar(1.0);
                }
            }
            result = result + flat.clone().gather(0, offset) * weight;
        }
        Ok(result)
    }
}
