//! Batch configuration.
//!
//! Sizes and geometries in a configuration file are plain lists, so their
//! length is only checked when they are turned into fixed-dimension types.

use std::path::Path;
use anyhow::Context;
use ritk_core::image::ImageGeometry;
use ritk_core::interpolation::InterpolationKind;
use ritk_core::spatial::{Direction, Point, Spacing};
use serde::{Deserialize, Serialize};
use crate::error::{AugmentError, Result};
use crate::reference::ReferenceSize;

/// Reference grid size as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ReferenceSizeConfig {
    /// Same pixel count on every axis.
    Uniform { size: usize },
    /// One pixel count per axis.
    Fixed { size: Vec<usize> },
    /// Pixel count along `axis`, isotropic spacing.
    Isotropic { axis: usize, size: usize },
}

impl ReferenceSizeConfig {
    /// Convert for a `D`-dimensional domain.
    pub fn to_reference_size<const D: usize>(&self) -> Result<ReferenceSize<D>> {
        match self {
            Self::Uniform { size } => Ok(ReferenceSize::uniform(*size)),
            Self::Fixed { size } => {
                let size: [usize; D] = size.as_slice().try_into().map_err(|_| {
                    AugmentError::dimension_mismatch(format!("{} reference sizes for a {}D domain", size.len(), D))
                })?;
                Ok(ReferenceSize::Fixed(size))
            }
            Self::Isotropic { axis, size } => {
                if *axis >= D {
                    return Err(AugmentError::dimension_mismatch(format!(
                        "isotropic axis {} for a {}D domain",
                        axis, D
                    )));
                }
                Ok(ReferenceSize::Isotropic { axis: *axis, size: *size })
            }
        }
    }

    fn sizes(&self) -> Vec<usize> {
        match self {
            Self::Uniform { size } | Self::Isotropic { size, .. } => vec![*size],
            Self::Fixed { size } => size.clone(),
        }
    }
}

/// Configuration of an augmentation batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentConfig {
    /// Reference grid size.
    pub reference_size: ReferenceSizeConfig,
    /// Interpolation used when resampling.
    pub interpolation: InterpolationKind,
    /// Value for output pixels outside the input.
    pub fill_value: f64,
    /// Largest number of spatial samples a single run may produce.
    pub max_samples: usize,
    /// File name prefix for written samples.
    pub output_prefix: String,
    /// File extension for written samples (`nii` or `nii.gz`).
    pub output_suffix: String,
    /// Seed for the noise filters.
    pub noise_seed: u64,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            reference_size: ReferenceSizeConfig::Uniform { size: 128 },
            interpolation: InterpolationKind::Linear,
            fill_value: 0.0,
            max_samples: 10_000,
            output_prefix: "augmented".to_string(),
            output_suffix: "nii".to_string(),
            noise_seed: 0,
        }
    }
}

impl AugmentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference_size(mut self, reference_size: ReferenceSizeConfig) -> Self {
        self.reference_size = reference_size;
        self
    }

    pub fn with_interpolation(mut self, interpolation: InterpolationKind) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_fill_value(mut self, fill_value: f64) -> Self {
        self.fill_value = fill_value;
        self
    }

    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    pub fn with_output(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.output_prefix = prefix.into();
        self.output_suffix = suffix.into();
        self
    }

    pub fn with_noise_seed(mut self, seed: u64) -> Self {
        self.noise_seed = seed;
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if let Some(n) = self.reference_size.sizes().into_iter().find(|&n| n < 2) {
            return Err(AugmentError::invalid_configuration(format!("reference size {} is below 2", n)));
        }
        if self.max_samples == 0 {
            return Err(AugmentError::invalid_configuration("max_samples must be positive"));
        }
        if !self.fill_value.is_finite() {
            return Err(AugmentError::invalid_configuration(format!("fill value {}", self.fill_value)));
        }
        if self.output_suffix.is_empty() {
            return Err(AugmentError::invalid_configuration("output suffix is empty"));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AugmentError::invalid_configuration(format!("malformed configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;
        Ok(Self::from_json(&json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AugmentError::invalid_configuration(format!("cannot serialize configuration: {}", e)))
    }
}

/// Image geometry as written in a configuration file.
///
/// An empty `origin` means zero and an empty `direction` means identity;
/// `direction` is row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryDescription {
    pub size: Vec<usize>,
    pub spacing: Vec<f64>,
    #[serde(default)]
    pub origin: Vec<f64>,
    #[serde(default)]
    pub direction: Vec<f64>,
}

impl GeometryDescription {
    pub fn from_geometry<const D: usize>(geometry: &ImageGeometry<D>) -> Self {
        Self {
            size: geometry.size().to_vec(),
            spacing: geometry.spacing().to_vec(),
            origin: geometry.origin().to_vec(),
            direction: geometry.direction().to_row_major(),
        }
    }

    /// Convert to a `D`-dimensional geometry.
    ///
    /// # Errors
    /// * [`AugmentError::DimensionMismatch`] when a list has the wrong length.
    /// * [`AugmentError::InvalidConfiguration`] for non-positive spacing.
    pub fn to_geometry<const D: usize>(&self) -> Result<ImageGeometry<D>> {
        let mismatch = |what: &str, len: usize, expected: usize| {
            AugmentError::dimension_mismatch(format!("{} has {} entries, expected {} for {}D", what, len, expected, D))
        };

        let size: [usize; D] = self
            .size
            .as_slice()
            .try_into()
            .map_err(|_| mismatch("size", self.size.len(), D))?;
        if self.spacing.len() != D {
            return Err(mismatch("spacing", self.spacing.len(), D));
        }
        let spacing = Spacing::<D>::from_slice(&self.spacing);
        if !spacing.is_valid() {
            return Err(AugmentError::invalid_configuration(format!(
                "spacing {:?} must be positive",
                self.spacing
            )));
        }

        let origin = match self.origin.len() {
            0 => Point::origin(),
            n if n == D => Point::from_slice(&self.origin),
            n => return Err(mismatch("origin", n, D)),
        };
        let direction = match self.direction.len() {
            0 => Direction::identity(),
            n if n == D * D => Direction::from_row_major(&self.direction),
            n => return Err(mismatch("direction", n, D * D)),
        };

        Ok(ImageGeometry::new(size, origin, spacing, direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AugmentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_samples, 10_000);
    }

    #[test]
    fn test_json_partial() {
        let json = r#"{
            "reference_size": {"mode": "isotropic", "axis": 2, "size": 64},
            "interpolation": "nearest",
            "max_samples": 50
        }"#;
        let config = AugmentConfig::from_json(json).unwrap();
        assert_eq!(config.interpolation, InterpolationKind::Nearest);
        assert_eq!(config.output_suffix, "nii");
        assert_eq!(
            config.reference_size.to_reference_size::<3>().unwrap(),
            ReferenceSize::Isotropic { axis: 2, size: 64 }
        );
        assert!(matches!(
            config.reference_size.to_reference_size::<2>(),
            Err(AugmentError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let config = AugmentConfig::new()
            .with_reference_size(ReferenceSizeConfig::Fixed { size: vec![64, 80] })
            .with_output("case", "nii.gz")
            .with_noise_seed(17);
        let parsed = AugmentConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            AugmentConfig::from_json(r#"{"max_samples": 0}"#),
            Err(AugmentError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            AugmentConfig::from_json(r#"{"reference_size": {"mode": "uniform", "size": 1}}"#),
            Err(AugmentError::InvalidConfiguration(_))
        ));
        assert!(AugmentConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_fixed_size_dimension_mismatch() {
        let size = ReferenceSizeConfig::Fixed { size: vec![64, 64] };
        assert!(matches!(size.to_reference_size::<3>(), Err(AugmentError::DimensionMismatch(_))));
    }

    #[test]
    fn test_geometry_description() {
        let description: GeometryDescription =
            serde_json::from_str(r#"{"size": [100, 80], "spacing": [1.0, 0.5], "origin": [3.0, 4.0]}"#).unwrap();
        let geometry = description.to_geometry::<2>().unwrap();
        assert_eq!(geometry.size(), [100, 80]);
        assert_eq!(*geometry.direction(), Direction::identity());
        assert!(matches!(description.to_geometry::<3>(), Err(AugmentError::DimensionMismatch(_))));

        let back = GeometryDescription::from_geometry(&geometry);
        assert_eq!(back.to_geometry::<2>().unwrap(), geometry);
    }
}
