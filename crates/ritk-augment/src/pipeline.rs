//! Batch augmentation driver.
//!
//! The pipeline builds the reference domain for a set of images, derives
//! each image's centered transform, then streams augmented resamples into a
//! [`SampleSink`]. Sample counts are checked against the configured limit
//! before any resampling starts.

use burn::tensor::backend::Backend;
use rayon::prelude::*;
use ritk_core::image::{Image, ImageGeometry};
use ritk_core::transform::CompositeTransform;
use std::sync::Arc;
use tracing::{info, warn};
use crate::composer::build_centered_transform;
use crate::config::{AugmentConfig, GeometryDescription};
use crate::error::{AugmentError, Result};
use crate::family::AugmentationFamily;
use crate::intensity::{apply_intensity, IntensityAugmentation, IntensityFilterBackend, TensorIntensityFilters};
use crate::parameter_space::ParameterSpace;
use crate::progress::{ProgressCallback, ProgressTracker};
use crate::reference::{build_reference_domain, ReferenceDomain};
use crate::reflection::fold_reflection;
use crate::resampler::{FilterResampler, Resampler};
use crate::samples::enumerate_augmented_samples;
use crate::sink::{SampleKey, SampleSink};

/// Reference domain plus one centered transform per input.
#[derive(Debug, Clone)]
pub struct PreparedBatch<const D: usize> {
    domain: ReferenceDomain<D>,
    centered: Vec<CompositeTransform<D>>,
}

impl<const D: usize> PreparedBatch<D> {
    pub fn domain(&self) -> &ReferenceDomain<D> {
        &self.domain
    }

    /// Centered transforms, in input order.
    pub fn centered(&self) -> &[CompositeTransform<D>] {
        &self.centered
    }
}

/// Drives reference-domain construction, enumeration and resampling.
pub struct AugmentationPipeline<R = FilterResampler> {
    config: AugmentConfig,
    resampler: R,
    progress: ProgressTracker,
}

impl AugmentationPipeline<FilterResampler> {
    /// Pipeline with the built-in resampler.
    pub fn new(config: AugmentConfig) -> Result<Self> {
        Self::with_resampler(config, FilterResampler)
    }
}

impl<R> AugmentationPipeline<R> {
    /// Pipeline with a caller-supplied resampler.
    pub fn with_resampler(config: AugmentConfig, resampler: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            resampler,
            progress: ProgressTracker::new(),
        })
    }

    pub fn config(&self) -> &AugmentConfig {
        &self.config
    }

    pub fn resampler(&self) -> &R {
        &self.resampler
    }

    /// Built-in intensity filters seeded from `noise_seed`.
    pub fn intensity_filters(&self) -> TensorIntensityFilters {
        TensorIntensityFilters::new(self.config.noise_seed)
    }

    pub fn add_callback(&mut self, callback: Arc<dyn ProgressCallback>) {
        self.progress.add_callback(callback);
    }

    /// Build the reference domain and the centered transform of every input.
    pub fn prepare<const D: usize>(&self, geometries: &[ImageGeometry<D>]) -> Result<PreparedBatch<D>> {
        let reference_size = self.config.reference_size.to_reference_size::<D>()?;
        let domain = build_reference_domain(geometries, &reference_size)?;

        let centered = geometries
            .par_iter()
            .map(|geometry| build_centered_transform(geometry, &domain))
            .collect::<Result<Vec<_>>>()?;

        Ok(PreparedBatch { domain, centered })
    }

    /// [`AugmentationPipeline::prepare`] from serialized geometry descriptions.
    ///
    /// # Errors
    /// [`AugmentError::DimensionMismatch`] when a description does not have
    /// `D` axes, otherwise as [`AugmentationPipeline::prepare`].
    pub fn prepare_descriptions<const D: usize>(
        &self,
        descriptions: &[GeometryDescription],
    ) -> Result<PreparedBatch<D>> {
        let geometries = descriptions
            .iter()
            .map(GeometryDescription::to_geometry::<D>)
            .collect::<Result<Vec<_>>>()?;
        self.prepare(&geometries)
    }

    fn check_sample_count(&self, per_image: Option<usize>, images: usize) -> Result<usize> {
        let limit = self.config.max_samples;
        match per_image.and_then(|n| n.checked_mul(images)) {
            Some(total) if total <= limit => Ok(total),
            requested => Err(AugmentError::TooManySamples {
                requested: requested.unwrap_or(usize::MAX),
                limit,
            }),
        }
    }

    fn track<T>(&self, result: anyhow::Result<T>) -> anyhow::Result<T> {
        if let Err(e) = &result {
            self.progress.error(&e.to_string());
        }
        result
    }

    /// Resample every image through every member of `family` over `space`.
    ///
    /// Samples are keyed by image index and parameters. Returns the number
    /// of samples written.
    ///
    /// # Errors
    /// [`AugmentError::TooManySamples`] when `images.len() * space.len()`
    /// exceeds `max_samples`; set-up errors from [`AugmentationPipeline::prepare`];
    /// resampler and sink errors unchanged.
    pub fn run_spatial<B, const D: usize, S>(
        &self,
        images: &[Image<B, D>],
        family: AugmentationFamily,
        space: &ParameterSpace,
        sink: &mut S,
    ) -> anyhow::Result<usize>
    where
        B: Backend,
        R: Resampler<B, D>,
        S: SampleSink<B, D>,
    {
        family.check_arity::<D>(space.arity())?;
        let total = self.check_sample_count(space.checked_len(), images.len())?;

        let geometries: Vec<_> = images.iter().map(Image::geometry).collect();
        let batch = self.prepare(&geometries)?;
        let domain = batch.domain();

        info!(
            family = family.name(),
            images = images.len(),
            samples = total,
            size = ?domain.size(),
            "spatial augmentation"
        );
        self.progress.start("spatial", Some(total));

        let result = (|| -> anyhow::Result<usize> {
            let mut written = 0;
            for (index, (image, centered)) in images.iter().zip(batch.centered()).enumerate() {
                let samples = enumerate_augmented_samples(centered, family, *domain.reference_center(), space)?;
                for sample in samples {
                    let sample = sample?;
                    let output = self.resampler.resample(
                        image,
                        domain.geometry(),
                        &sample.transform,
                        self.config.interpolation,
                        self.config.fill_value,
                    )?;
                    let key = SampleKey::from_parameters(index, &sample.parameters);
                    sink.write_sample(&key, &output)?;
                    self.progress.advance(&key.label);
                    written += 1;
                }
            }
            Ok(written)
        })();

        let written = self.track(result)?;
        self.progress.complete();
        Ok(written)
    }

    /// Resample every image once per reflection, folding the flip into the
    /// centered transform.
    ///
    /// Labels are `flip` followed by the reflected axes, e.g. `flip_0_2`.
    pub fn run_reflections<B, const D: usize, S>(
        &self,
        images: &[Image<B, D>],
        reflections: &[Vec<usize>],
        sink: &mut S,
    ) -> anyhow::Result<usize>
    where
        B: Backend,
        R: Resampler<B, D>,
        S: SampleSink<B, D>,
    {
        let total = self.check_sample_count(Some(reflections.len()), images.len())?;
        let geometries: Vec<_> = images.iter().map(Image::geometry).collect();
        let batch = self.prepare(&geometries)?;
        let domain = batch.domain();

        info!(images = images.len(), reflections = reflections.len(), "reflection augmentation");
        self.progress.start("reflection", Some(total));

        let result = (|| -> anyhow::Result<usize> {
            let mut written = 0;
            for (index, (image, centered)) in images.iter().zip(batch.centered()).enumerate() {
                for axes in reflections {
                    let transform = fold_reflection(centered, domain, axes)?;
                    let output = self.resampler.resample(
                        image,
                        domain.geometry(),
                        &transform,
                        self.config.interpolation,
                        self.config.fill_value,
                    )?;
                    let label = std::iter::once("flip".to_string())
                        .chain(axes.iter().map(|a| a.to_string()))
                        .collect::<Vec<_>>()
                        .join("_");
                    let key = SampleKey::new(index, label);
                    sink.write_sample(&key, &output)?;
                    self.progress.advance(&key.label);
                    written += 1;
                }
            }
            Ok(written)
        })();

        let written = self.track(result)?;
        self.progress.complete();
        Ok(written)
    }

    /// Apply every entry of `catalogue` to every image, on its native grid.
    ///
    /// Kinds the backend does not provide are skipped with a warning; any
    /// other failure stops the batch.
    pub fn augment_intensity<B, const D: usize, F, S>(
        &self,
        images: &[Image<B, D>],
        backend: &F,
        catalogue: &[IntensityAugmentation],
        sink: &mut S,
    ) -> anyhow::Result<usize>
    where
        B: Backend,
        F: IntensityFilterBackend<B, D> + ?Sized,
        S: SampleSink<B, D>,
    {
        for augmentation in catalogue {
            augmentation.validate()?;
        }
        let total = self.check_sample_count(Some(catalogue.len()), images.len())?;

        info!(images = images.len(), filters = catalogue.len(), "intensity augmentation");
        self.progress.start("intensity", Some(total));

        let result = (|| -> anyhow::Result<usize> {
            let mut written = 0;
            for (index, image) in images.iter().enumerate() {
                for augmentation in catalogue {
                    let output = match apply_intensity(backend, image, augmentation) {
                        Ok(output) => output,
                        Err(e) if matches!(e.downcast_ref::<AugmentError>(), Some(AugmentError::UnsupportedFilter(_))) => {
                            warn!(filter = augmentation.name(), "filter not provided by backend, skipped");
                            self.progress.skip();
                            continue;
                        }
                        Err(e) => return Err(e),
                    };
                    let key = SampleKey::new(index, augmentation.label());
                    sink.write_sample(&key, &output)?;
                    self.progress.advance(&key.label);
                    written += 1;
                }
            }
            Ok(written)
        })();

        let written = self.track(result)?;
        self.progress.complete();
        Ok(written)
    }
}
