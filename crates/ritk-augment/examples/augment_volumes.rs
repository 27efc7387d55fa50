//! Augment Volumes Example
//!
//! Brings a set of NIfTI volumes onto a shared 128^3 reference grid and
//! writes a small grid of rotated, scaled copies of each, plus the mirror
//! images along the first axis.
//!
//! Usage:
//!   cargo run --example augment_volumes -- <output_dir> <volume.nii.gz>...

use burn_ndarray::NdArray;
use ritk_augment::{
    AugmentConfig, AugmentationFamily, AugmentationPipeline, ConsoleProgressCallback, NiftiSink, ParameterRange,
    ParameterSpace, ReferenceSizeConfig,
};
use ritk_core::image::Image;
use ritk_core::interpolation::InterpolationKind;
use ritk_io::read_nifti;
use std::path::PathBuf;
use std::sync::Arc;

type Backend = NdArray<f32>;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let mut args = std::env::args().skip(1);
    let output_dir = match args.next() {
        Some(dir) => PathBuf::from(dir),
        None => anyhow::bail!("Usage: augment_volumes <output_dir> <volume.nii.gz>..."),
    };
    let inputs: Vec<PathBuf> = args.map(PathBuf::from).collect();
    if inputs.is_empty() {
        anyhow::bail!("No input volumes given");
    }
    std::fs::create_dir_all(&output_dir)?;

    let device = Default::default();
    let mut images: Vec<Image<Backend, 3>> = Vec::with_capacity(inputs.len());
    for path in &inputs {
        let image = read_nifti(path, &device)?;
        println!("Loaded {}: size {:?}, spacing {:?}", path.display(), image.size(), image.spacing());
        images.push(image);
    }

    let config = AugmentConfig::new()
        .with_reference_size(ReferenceSizeConfig::Uniform { size: 128 })
        .with_interpolation(InterpolationKind::Linear)
        .with_output("augmented", "nii.gz");
    let mut pipeline = AugmentationPipeline::new(config)?;
    pipeline.add_callback(Arc::new(ConsoleProgressCallback::new(10)));

    // [rx, ry, rz, tx, ty, tz, scale], Euler angles in radians
    let space = ParameterSpace::grid(vec![
        ParameterRange::constant(0.0),
        ParameterRange::constant(0.0),
        ParameterRange::linspace(-0.15, 0.15, 3),
        ParameterRange::constant(0.0),
        ParameterRange::constant(0.0),
        ParameterRange::constant(0.0),
        ParameterRange::linspace(0.9, 1.1, 3),
    ]);

    let config = pipeline.config();
    let mut sink = NiftiSink::new(&output_dir, config.output_prefix.clone(), config.output_suffix.clone());

    let spatial = pipeline.run_spatial(&images, AugmentationFamily::SimilarityEuler, &space, &mut sink)?;
    let flipped = pipeline.run_reflections(&images, &[vec![0]], &mut sink)?;

    println!("Wrote {} samples to {}", spatial + flipped, output_dir.display());
    Ok(())
}
