//! Intensity augmentation dispatch.
//!
//! Intensity augmentations are described by [`IntensityAugmentation`] and
//! carried out by an [`IntensityFilterBackend`]. A backend implements the
//! kinds it supports; the rest fall back to an `UnsupportedFilter` error.

use burn::tensor::backend::Backend;
use ritk_core::filter::{self, GaussianFilter};
use ritk_core::image::Image;
use serde::{Deserialize, Serialize};
use crate::error::{AugmentError, Result};

/// One intensity augmentation and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntensityAugmentation {
    SmoothingRecursiveGaussian { sigma: f64 },
    DiscreteGaussian { variance: f64 },
    Bilateral { domain_sigma: f64, range_sigma: f64 },
    Median { radius: usize },
    AdditiveGaussianNoise { mean: f64, std: f64 },
    SaltAndPepperNoise { probability: f64 },
    ShotNoise { scale: f64 },
    SpeckleNoise { std: f64 },
    AdaptiveHistogramEqualization { alpha: f64, beta: f64 },
    /// Multiplicative then additive smooth Gaussian fields.
    IntensityFields,
}

impl IntensityAugmentation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SmoothingRecursiveGaussian { .. } => "smoothing_recursive_gaussian",
            Self::DiscreteGaussian { .. } => "discrete_gaussian",
            Self::Bilateral { .. } => "bilateral",
            Self::Median { .. } => "median",
            Self::AdditiveGaussianNoise { .. } => "additive_gaussian_noise",
            Self::SaltAndPepperNoise { .. } => "salt_and_pepper_noise",
            Self::ShotNoise { .. } => "shot_noise",
            Self::SpeckleNoise { .. } => "speckle_noise",
            Self::AdaptiveHistogramEqualization { .. } => "adaptive_histogram_equalization",
            Self::IntensityFields => "intensity_fields",
        }
    }

    /// Parameter values in declaration order.
    pub fn parameters(&self) -> Vec<f64> {
        match *self {
            Self::SmoothingRecursiveGaussian { sigma } => vec![sigma],
            Self::DiscreteGaussian { variance } => vec![variance],
            Self::Bilateral { domain_sigma, range_sigma } => vec![domain_sigma, range_sigma],
            Self::Median { radius } => vec![radius as f64],
            Self::AdditiveGaussianNoise { mean, std } => vec![mean, std],
            Self::SaltAndPepperNoise { probability } => vec![probability],
            Self::ShotNoise { scale } => vec![scale],
            Self::SpeckleNoise { std } => vec![std],
            Self::AdaptiveHistogramEqualization { alpha, beta } => vec![alpha, beta],
            Self::IntensityFields => Vec::new(),
        }
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(AugmentError::invalid_configuration(format!("{} {} must be positive", name, v)))
            }
        };
        let unit = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(AugmentError::invalid_configuration(format!("{} {} outside [0, 1]", name, v)))
            }
        };

        match *self {
            Self::SmoothingRecursiveGaussian { sigma } => positive("sigma", sigma),
            Self::DiscreteGaussian { variance } => positive("variance", variance),
            Self::Bilateral { domain_sigma, range_sigma } => {
                positive("domain sigma", domain_sigma)?;
                positive("range sigma", range_sigma)
            }
            Self::Median { radius } if radius == 0 => {
                Err(AugmentError::invalid_configuration("median radius must be at least 1"))
            }
            Self::AdditiveGaussianNoise { std, .. } if !(std.is_finite() && std >= 0.0) => {
                Err(AugmentError::invalid_configuration(format!("noise std {} must be non-negative", std)))
            }
            Self::SaltAndPepperNoise { probability } => unit("probability", probability),
            Self::ShotNoise { scale } => positive("shot noise scale", scale),
            Self::SpeckleNoise { std } if !(std.is_finite() && std >= 0.0) => {
                Err(AugmentError::invalid_configuration(format!("speckle std {} must be non-negative", std)))
            }
            Self::AdaptiveHistogramEqualization { alpha, beta } => {
                unit("alpha", alpha)?;
                unit("beta", beta)
            }
            _ => Ok(()),
        }
    }

    /// File-name friendly label, e.g. `discrete_gaussian_4`.
    pub fn label(&self) -> String {
        std::iter::once(self.name().to_string())
            .chain(self.parameters().iter().map(|p| p.to_string()))
            .collect::<Vec<_>>()
            .join("_")
    }
}

fn unsupported<T>(name: &str) -> anyhow::Result<T> {
    Err(AugmentError::unsupported_filter(name).into())
}

/// Provider of intensity filters, one method per augmentation kind.
///
/// Every method defaults to an [`AugmentError::UnsupportedFilter`] error.
#[allow(unused_variables)]
pub trait IntensityFilterBackend<B: Backend, const D: usize> {
    fn smoothing_recursive_gaussian(&self, image: &Image<B, D>, sigma: f64) -> anyhow::Result<Image<B, D>> {
        unsupported("smoothing_recursive_gaussian")
    }

    fn discrete_gaussian(&self, image: &Image<B, D>, variance: f64) -> anyhow::Result<Image<B, D>> {
        unsupported("discrete_gaussian")
    }

    fn bilateral(&self, image: &Image<B, D>, domain_sigma: f64, range_sigma: f64) -> anyhow::Result<Image<B, D>> {
        unsupported("bilateral")
    }

    fn median(&self, image: &Image<B, D>, radius: usize) -> anyhow::Result<Image<B, D>> {
        unsupported("median")
    }

    fn additive_gaussian_noise(&self, image: &Image<B, D>, mean: f64, std: f64) -> anyhow::Result<Image<B, D>> {
        unsupported("additive_gaussian_noise")
    }

    fn salt_and_pepper_noise(&self, image: &Image<B, D>, probability: f64) -> anyhow::Result<Image<B, D>> {
        unsupported("salt_and_pepper_noise")
    }

    fn shot_noise(&self, image: &Image<B, D>, scale: f64) -> anyhow::Result<Image<B, D>> {
        unsupported("shot_noise")
    }

    fn speckle_noise(&self, image: &Image<B, D>, std: f64) -> anyhow::Result<Image<B, D>> {
        unsupported("speckle_noise")
    }

    fn adaptive_histogram_equalization(&self, image: &Image<B, D>, alpha: f64, beta: f64) -> anyhow::Result<Image<B, D>> {
        unsupported("adaptive_histogram_equalization")
    }

    fn intensity_fields(&self, image: &Image<B, D>) -> anyhow::Result<Image<B, D>> {
        unsupported("intensity_fields")
    }
}

/// Validate `augmentation` and run it through `backend`.
pub fn apply_intensity<B, const D: usize, F>(
    backend: &F,
    image: &Image<B, D>,
    augmentation: &IntensityAugmentation,
) -> anyhow::Result<Image<B, D>>
where
    B: Backend,
    F: IntensityFilterBackend<B, D> + ?Sized,
{
    augmentation.validate()?;

    match *augmentation {
        IntensityAugmentation::SmoothingRecursiveGaussian { sigma } => backend.smoothing_recursive_gaussian(image, sigma),
        IntensityAugmentation::DiscreteGaussian { variance } => backend.discrete_gaussian(image, variance),
        IntensityAugmentation::Bilateral { domain_sigma, range_sigma } => {
            backend.bilateral(image, domain_sigma, range_sigma)
        }
        IntensityAugmentation::Median { radius } => backend.median(image, radius),
        IntensityAugmentation::AdditiveGaussianNoise { mean, std } => backend.additive_gaussian_noise(image, mean, std),
        IntensityAugmentation::SaltAndPepperNoise { probability } => backend.salt_and_pepper_noise(image, probability),
        IntensityAugmentation::ShotNoise { scale } => backend.shot_noise(image, scale),
        IntensityAugmentation::SpeckleNoise { std } => backend.speckle_noise(image, std),
        IntensityAugmentation::AdaptiveHistogramEqualization { alpha, beta } => {
            backend.adaptive_histogram_equalization(image, alpha, beta)
        }
        IntensityAugmentation::IntensityFields => backend.intensity_fields(image),
    }
}

/// The standard set of intensity augmentations.
pub fn default_intensity_catalogue() -> Vec<IntensityAugmentation> {
    vec![
        IntensityAugmentation::SmoothingRecursiveGaussian { sigma: 2.0 },
        IntensityAugmentation::DiscreteGaussian { variance: 4.0 },
        IntensityAugmentation::Bilateral { domain_sigma: 4.0, range_sigma: 8.0 },
        IntensityAugmentation::Median { radius: 8 },
        IntensityAugmentation::AdditiveGaussianNoise { mean: 0.0, std: 1.0 },
        IntensityAugmentation::SaltAndPepperNoise { probability: 0.01 },
        IntensityAugmentation::ShotNoise { scale: 1.0 },
        IntensityAugmentation::SpeckleNoise { std: 1.0 },
        IntensityAugmentation::AdaptiveHistogramEqualization { alpha: 1.0, beta: 0.0 },
        IntensityAugmentation::AdaptiveHistogramEqualization { alpha: 0.0, beta: 1.0 },
    ]
}

/// Built-in backend on ritk tensor filters.
///
/// Provides Gaussian smoothing, the four noise models and the intensity
/// fields. Noise is drawn from `seed`, so repeated calls give the same
/// result.
#[derive(Debug, Clone, Copy, Default)]
pub struct TensorIntensityFilters {
    pub seed: u64,
}

impl TensorIntensityFilters {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

/// Widest kernel used for the recursive Gaussian stand-in.
const RECURSIVE_GAUSSIAN_MAX_WIDTH: usize = 129;

impl<B: Backend, const D: usize> IntensityFilterBackend<B, D> for TensorIntensityFilters {
    fn smoothing_recursive_gaussian(&self, image: &Image<B, D>, sigma: f64) -> anyhow::Result<Image<B, D>> {
        let filter = GaussianFilter::<B>::new(vec![sigma]).with_max_kernel_width(RECURSIVE_GAUSSIAN_MAX_WIDTH);
        Ok(filter.apply(image))
    }

    fn discrete_gaussian(&self, image: &Image<B, D>, variance: f64) -> anyhow::Result<Image<B, D>> {
        Ok(GaussianFilter::<B>::from_variances(vec![variance]).apply(image))
    }

    fn additive_gaussian_noise(&self, image: &Image<B, D>, mean: f64, std: f64) -> anyhow::Result<Image<B, D>> {
        Ok(filter::additive_gaussian_noise(image, mean, std, self.seed)?)
    }

    fn salt_and_pepper_noise(&self, image: &Image<B, D>, probability: f64) -> anyhow::Result<Image<B, D>> {
        Ok(filter::salt_and_pepper_noise(image, probability, self.seed)?)
    }

    fn shot_noise(&self, image: &Image<B, D>, scale: f64) -> anyhow::Result<Image<B, D>> {
        Ok(filter::shot_noise(image, scale, self.seed)?)
    }

    fn speckle_noise(&self, image: &Image<B, D>, std: f64) -> anyhow::Result<Image<B, D>> {
        Ok(filter::speckle_noise(image, std, self.seed)?)
    }

    fn intensity_fields(&self, image: &Image<B, D>) -> anyhow::Result<Image<B, D>> {
        Ok(filter::apply_intensity_fields(image))
    }
}
