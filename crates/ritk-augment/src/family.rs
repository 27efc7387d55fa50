//! Parametrized transform families used for spatial augmentation.

use nalgebra::SMatrix;
use ritk_core::spatial::{Point, Vector};
use ritk_core::transform::{
    AffineTransform, RadialDistortionTransform, SimilarityTransform, TransformStep, TranslationTransform,
};
use serde::{Deserialize, Serialize};
use crate::error::{AugmentError, Result};
use crate::parameter_space::euler_to_versor;

/// A family of transforms and the layout of its parameter vector.
///
/// | family | 2D | 3D |
/// |---|---|---|
/// | `Similarity` | `[scale, angle, tx, ty]` | `[vx, vy, vz, tx, ty, tz, scale]` |
/// | `SimilarityEuler` | as `Similarity` | `[θx, θy, θz, tx, ty, tz, scale]` |
/// | `Translation` | `[tx, ty]` | `[tx, ty, tz]` |
/// | `Affine` | row-major matrix, then translation | same |
/// | `RadialDistortion` | `[k1, k2, k3]` | same |
///
/// Every instance is centered on the point passed to [`AugmentationFamily::instantiate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum AugmentationFamily {
    Similarity,
    SimilarityEuler,
    Translation,
    Affine,
    RadialDistortion,
}

impl AugmentationFamily {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Similarity => "similarity",
            Self::SimilarityEuler => "similarity_euler",
            Self::Translation => "translation",
            Self::Affine => "affine",
            Self::RadialDistortion => "radial_distortion",
        }
    }

    /// Parameter vector length for `dimension`, `None` when the family is
    /// not defined there.
    pub fn parameter_count(&self, dimension: usize) -> Option<usize> {
        match (self, dimension) {
            (Self::Similarity | Self::SimilarityEuler, 2) => Some(4),
            (Self::Similarity | Self::SimilarityEuler, 3) => Some(7),
            (Self::Similarity | Self::SimilarityEuler, _) => None,
            (Self::Translation, d) => Some(d),
            (Self::Affine, d) => Some(d * d + d),
            (Self::RadialDistortion, _) => Some(3),
        }
    }

    /// Check a parameter vector length against the family in `D` dimensions.
    pub fn check_arity<const D: usize>(&self, actual: usize) -> Result<()> {
        let expected = self.parameter_count(D).ok_or_else(|| {
            AugmentError::dimension_mismatch(format!("{} is not defined in {}D", self.name(), D))
        })?;
        if actual != expected {
            return Err(AugmentError::ParameterArity {
                family: self.name().to_string(),
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Build the family member for `parameters`, centered at `center`.
    pub fn instantiate<const D: usize>(&self, parameters: &[f64], center: Point<D>) -> Result<TransformStep<D>> {
        self.check_arity::<D>(parameters.len())?;

        let step = match self {
            Self::Similarity => SimilarityTransform::from_parameters(parameters, center)?.into(),
            Self::SimilarityEuler if D == 3 => {
                let [vx, vy, vz] = euler_to_versor(parameters[0], parameters[1], parameters[2]);
                let mut versor = parameters.to_vec();
                versor[..3].copy_from_slice(&[vx, vy, vz]);
                SimilarityTransform::from_parameters(&versor, center)?.into()
            }
            Self::SimilarityEuler => SimilarityTransform::from_parameters(parameters, center)?.into(),
            Self::Translation => TranslationTransform::new(Vector::from_slice(parameters)).into(),
            Self::Affine => {
                let matrix = SMatrix::<f64, D, D>::from_row_slice(&parameters[..D * D]);
                AffineTransform::new(matrix, Vector::from_slice(&parameters[D * D..]), center).into()
            }
            Self::RadialDistortion => {
                RadialDistortionTransform::new([parameters[0], parameters[1], parameters[2]], center).into()
            }
        };
        Ok(step)
    }
}
