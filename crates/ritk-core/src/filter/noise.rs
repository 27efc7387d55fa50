//! Seeded noise models for intensity augmentation.
//!
//! Every generator takes an explicit seed so that a given augmentation can
//! be reproduced exactly. Sampling happens on the host; the result is put
//! back on the image's device.

use burn::tensor::{Tensor, TensorData, Shape};
use burn::tensor::backend::Backend;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Gamma, Normal, Poisson};
use crate::error::{CoreError, Result};
use crate::image::Image;

fn host_values<B: Backend, const D: usize>(image: &Image<B, D>) -> Vec<f64> {
    image.data().clone().into_data().iter::<f64>().collect()
}

fn from_host<B: Backend, const D: usize>(image: &Image<B, D>, values: Vec<f64>) -> Image<B, D> {
    let values: Vec<f32> = values.into_iter().map(|v| v as f32).collect();
    let data = Tensor::<B, D>::from_data(
        TensorData::new(values, Shape::new(image.shape())),
        &image.data().device(),
    );
    image.with_data(data)
}

/// Add `Normal(mean, std)` noise to every pixel.
pub fn additive_gaussian_noise<B: Backend, const D: usize>(
    image: &Image<B, D>,
    mean: f64,
    std: f64,
    seed: u64,
) -> Result<Image<B, D>> {
    let normal = Normal::new(mean, std)
        .map_err(|e| CoreError::InvalidParameter(format!("gaussian noise std {}: {}", std, e)))?;
    let mut rng = StdRng::seed_from_u64(seed);

    let values = host_values(image)
        .into_iter()
        .map(|v| v + normal.sample(&mut rng))
        .collect();
    Ok(from_host(image, values))
}

/// Replace a fraction `probability` of pixels by the image minimum
/// (pepper) or maximum (salt), with equal odds.
pub fn salt_and_pepper_noise<B: Backend, const D: usize>(
    image: &Image<B, D>,
    probability: f64,
    seed: u64,
) -> Result<Image<B, D>> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(CoreError::InvalidParameter(format!(
            "salt and pepper probability {} outside [0, 1]",
            probability
        )));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let values = host_values(image);

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    let values = values
        .into_iter()
        .map(|v| {
            if rng.gen::<f64>() < probability {
                if rng.gen::<bool>() { max } else { min }
            } else {
                v
            }
        })
        .collect();
    Ok(from_host(image, values))
}

/// Poisson (shot) noise: `scale * Poisson(v / scale)`.
///
/// Non-positive pixels map to zero.
pub fn shot_noise<B: Backend, const D: usize>(
    image: &Image<B, D>,
    scale: f64,
    seed: u64,
) -> Result<Image<B, D>> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(CoreError::InvalidParameter(format!("shot noise scale {} must be positive", scale)));
    }
    let mut rng = StdRng::seed_from_u64(seed);

    let values = host_values(image)
        .into_iter()
        .map(|v| {
            let lambda = v / scale;
            match Poisson::new(lambda) {
                Ok(poisson) => scale * poisson.sample(&mut rng),
                Err(_) => 0.0,
            }
        })
        .collect();
    Ok(from_host(image, values))
}

/// Multiplicative speckle noise with unit-mean Gamma statistics
/// (shape `1/std²`, scale `std²`).
pub fn speckle_noise<B: Backend, const D: usize>(
    image: &Image<B, D>,
    std: f64,
    seed: u64,
) -> Result<Image<B, D>> {
    if std < 0.0 || !std.is_finite() {
        return Err(CoreError::InvalidParameter(format!("speckle noise std {}", std)));
    }
    if std == 0.0 {
        return Ok(image.clone());
    }
    let variance = std * std;
    let gamma = Gamma::new(1.0 / variance, variance)
        .map_err(|e| CoreError::InvalidParameter(format!("speckle noise std {}: {}", std, e)))?;
    let mut rng = StdRng::seed_from_u64(seed);

    let values = host_values(image)
        .into_iter()
        .map(|v| v * gamma.sample(&mut rng))
        .collect();
    Ok(from_host(image, values))
}
