//! Destinations for augmented images.

use std::path::{Path, PathBuf};
use burn::tensor::backend::Backend;
use ritk_core::image::Image;
use ritk_io::write_nifti;
use tracing::debug;

/// Identifies one augmented image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SampleKey {
    /// Position of the source image in the input list.
    pub image_index: usize,
    /// Augmentation description, e.g. parameters joined by `_`.
    pub label: String,
}

impl SampleKey {
    pub fn new(image_index: usize, label: impl Into<String>) -> Self {
        Self {
            image_index,
            label: label.into(),
        }
    }

    /// Label made of parameter values joined by `_`.
    pub fn from_parameters(image_index: usize, parameters: &[f64]) -> Self {
        let label = parameters.iter().map(|p| p.to_string()).collect::<Vec<_>>().join("_");
        Self::new(image_index, label)
    }
}

/// Receives augmented images as they are produced.
pub trait SampleSink<B: Backend, const D: usize> {
    fn write_sample(&mut self, key: &SampleKey, image: &Image<B, D>) -> anyhow::Result<()>;
}

/// Keeps every sample in memory.
#[derive(Debug)]
pub struct MemorySink<B: Backend, const D: usize> {
    samples: Vec<(SampleKey, Image<B, D>)>,
}

impl<B: Backend, const D: usize> Default for MemorySink<B, D> {
    fn default() -> Self {
        Self { samples: Vec::new() }
    }
}

impl<B: Backend, const D: usize> MemorySink<B, D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[(SampleKey, Image<B, D>)] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn into_samples(self) -> Vec<(SampleKey, Image<B, D>)> {
        self.samples
    }
}

impl<B: Backend, const D: usize> SampleSink<B, D> for MemorySink<B, D> {
    fn write_sample(&mut self, key: &SampleKey, image: &Image<B, D>) -> anyhow::Result<()> {
        self.samples.push((key.clone(), image.clone()));
        Ok(())
    }
}

/// Writes 3D samples as NIfTI files named `{prefix}_{image_index}_{label}.{suffix}`.
#[derive(Debug, Clone)]
pub struct NiftiSink {
    dir: PathBuf,
    prefix: String,
    suffix: String,
    written: Vec<PathBuf>,
}

impl NiftiSink {
    pub fn new(dir: impl AsRef<Path>, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            prefix: prefix.into(),
            suffix: suffix.into(),
            written: Vec::new(),
        }
    }

    /// Output path for `key`.
    pub fn path_for(&self, key: &SampleKey) -> PathBuf {
        self.dir
            .join(format!("{}_{}_{}.{}", self.prefix, key.image_index, key.label, self.suffix))
    }

    /// Files written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl<B: Backend> SampleSink<B, 3> for NiftiSink {
    fn write_sample(&mut self, key: &SampleKey, image: &Image<B, 3>) -> anyhow::Result<()> {
        let path = self.path_for(key);
        write_nifti(&path, image)?;
        debug!(path = %path.display(), "wrote sample");
        self.written.push(path);
        Ok(())
    }
}
