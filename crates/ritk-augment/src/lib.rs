//! Reference-domain construction and transform composition for medical
//! image augmentation.
//!
//! Images with different sizes, spacings, origins and orientations are first
//! mapped onto one common reference grid. Each image gets a *centered*
//! transform taking reference points to native points so that the reference
//! center lands on the image center. Spatial augmentations are then composed
//! on the reference side of that transform, so every augmentation acts in the
//! same canonical frame regardless of the native geometry.
//!
//! ```no_run
//! use burn_ndarray::NdArray;
//! use ritk_augment::{
//!     AugmentConfig, AugmentationFamily, AugmentationPipeline, MemorySink, ParameterRange, ParameterSpace,
//! };
//! use ritk_io::read_nifti;
//!
//! # fn main() -> anyhow::Result<()> {
//! let device = Default::default();
//! let image = read_nifti::<NdArray<f32>, _>("brain.nii.gz", &device)?;
//!
//! let pipeline = AugmentationPipeline::new(AugmentConfig::default())?;
//! let space = ParameterSpace::grid(vec![
//!     ParameterRange::linspace(-0.1, 0.1, 3),
//!     ParameterRange::constant(0.0),
//!     ParameterRange::constant(0.0),
//!     ParameterRange::linspace(-5.0, 5.0, 3),
//!     ParameterRange::constant(0.0),
//!     ParameterRange::constant(0.0),
//!     ParameterRange::linspace(0.9, 1.1, 3),
//! ]);
//! let mut sink = MemorySink::new();
//! pipeline.run_spatial(&[image], AugmentationFamily::Similarity, &space, &mut sink)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod reference;
pub mod composer;
pub mod family;
pub mod parameter_space;
pub mod samples;
pub mod reflection;
pub mod intensity;
pub mod resampler;
pub mod sink;
pub mod progress;
pub mod config;
pub mod pipeline;

pub use error::{AugmentError, Result};
pub use reference::{build_reference_domain, ReferenceDomain, ReferenceSize};
pub use composer::build_centered_transform;
pub use family::AugmentationFamily;
pub use parameter_space::{euler_to_versor, random_sampling, ParameterRange, ParameterSpace};
pub use samples::{enumerate_augmented_samples, AugmentedSample, AugmentedSamples};
pub use reflection::{fold_reflection, reflection_matrix};
pub use intensity::{
    apply_intensity, default_intensity_catalogue, IntensityAugmentation, IntensityFilterBackend,
    TensorIntensityFilters,
};
pub use resampler::{radial_distort, FilterResampler, Resampler};
pub use sink::{MemorySink, NiftiSink, SampleKey, SampleSink};
pub use progress::{ConsoleProgressCallback, HistoryCallback, ProgressCallback, ProgressInfo, ProgressTracker};
pub use config::{AugmentConfig, GeometryDescription, ReferenceSizeConfig};
pub use pipeline::{AugmentationPipeline, PreparedBatch};
