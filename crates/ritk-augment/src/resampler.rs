//! Resampling collaborator.
//!
//! The augmentation logic only needs "map this image through a transform
//! onto that grid". [`Resampler`] is that seam; [`FilterResampler`] fills it
//! with ritk's tensor resample filter.

use burn::tensor::backend::Backend;
use ritk_core::filter::ResampleImageFilter;
use ritk_core::image::{Image, ImageGeometry};
use ritk_core::interpolation::InterpolationKind;
use ritk_core::spatial::Point;
use ritk_core::transform::{CompositeTransform, RadialDistortionTransform};

/// Resample an image through a transform onto an output grid.
///
/// `transform` maps output physical points to input physical points.
/// Output points that land outside the input buffer receive `fill_value`.
pub trait Resampler<B: Backend, const D: usize> {
    fn resample(
        &self,
        input: &Image<B, D>,
        grid: &ImageGeometry<D>,
        transform: &CompositeTransform<D>,
        interpolation: InterpolationKind,
        fill_value: f64,
    ) -> anyhow::Result<Image<B, D>>;
}

/// [`Resampler`] built on [`ResampleImageFilter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterResampler;

impl<B: Backend, const D: usize> Resampler<B, D> for FilterResampler {
    fn resample(
        &self,
        input: &Image<B, D>,
        grid: &ImageGeometry<D>,
        transform: &CompositeTransform<D>,
        interpolation: InterpolationKind,
        fill_value: f64,
    ) -> anyhow::Result<Image<B, D>> {
        let filter = ResampleImageFilter::new(*grid, transform.clone(), interpolation)
            .with_default_pixel_value(fill_value);
        Ok(filter.apply(input)?)
    }
}

/// Resample `image` onto its own grid through a radial distortion.
///
/// `center` defaults to the image center.
pub fn radial_distort<B: Backend, const D: usize>(
    resampler: &impl Resampler<B, D>,
    image: &Image<B, D>,
    coefficients: [f64; 3],
    center: Option<Point<D>>,
    interpolation: InterpolationKind,
    fill_value: f64,
) -> anyhow::Result<Image<B, D>> {
    let geometry = image.geometry();
    let center = center.unwrap_or_else(|| geometry.center());
    let transform = CompositeTransform::from_steps(vec![RadialDistortionTransform::new(coefficients, center).into()]);
    resampler.resample(image, &geometry, &transform, interpolation, fill_value)
}
