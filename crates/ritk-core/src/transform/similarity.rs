//! Similarity transform implementation.
//!
//! Rotation, isotropic scaling and translation about a fixed center:
//! T(x) = s R (x - c) + c + t

use nalgebra::{Matrix3, Quaternion, SMatrix, UnitQuaternion};
use crate::error::{CoreError, Result};
use crate::spatial::{Point, Vector};
use super::affine::AffineTransform;
use super::trait_::Transform;

/// Similarity Transform.
///
/// Parameter layouts follow the usual registration conventions:
/// * 2D: `[scale, angle, tx, ty]`, angle in radians.
/// * 3D: `[vx, vy, vz, tx, ty, tz, scale]`, where `(vx, vy, vz)` is the
///   vector part of a unit versor.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityTransform<const D: usize> {
    rotation: SMatrix<f64, D, D>,
    scale: f64,
    translation: Vector<D>,
    center: Point<D>,
    parameters: Vec<f64>,
}

impl<const D: usize> SimilarityTransform<D> {
    /// Number of parameters for this dimensionality (0 when unsupported).
    pub fn parameter_count() -> usize {
        match D {
            2 => 4,
            3 => 7,
            _ => 0,
        }
    }

    /// Build a similarity transform from its parameter vector.
    ///
    /// # Errors
    /// * [`CoreError::UnsupportedDimension`] for anything other than 2D/3D.
    /// * [`CoreError::InvalidParameter`] when the slice has the wrong length,
    ///   or when a 3D versor lies outside the unit ball.
    pub fn from_parameters(parameters: &[f64], center: Point<D>) -> Result<Self> {
        if D != 2 && D != 3 {
            return Err(CoreError::UnsupportedDimension(D));
        }
        let expected = Self::parameter_count();
        if parameters.len() != expected {
            return Err(CoreError::InvalidParameter(format!(
                "similarity transform in {}D takes {} parameters, got {}",
                D,
                expected,
                parameters.len()
            )));
        }

        let (rotation, scale, translation) = if D == 2 {
            let (s, angle) = (parameters[0], parameters[1]);
            let (sin, cos) = angle.sin_cos();
            let m = [[cos, -sin], [sin, cos]];
            (
                SMatrix::from_fn(|r, c| m[r][c]),
                s,
                Vector::from_slice(&parameters[2..4]),
            )
        } else {
            let v = [parameters[0], parameters[1], parameters[2]];
            let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
            if norm > 1.0 + VERSOR_TOLERANCE {
                return Err(CoreError::InvalidParameter(format!(
                    "versor vector part {:?} has norm {} > 1",
                    v, norm
                )));
            }
            let m = versor_to_matrix(v);
            (
                SMatrix::from_fn(|r, c| m[(r, c)]),
                parameters[6],
                Vector::from_slice(&parameters[3..6]),
            )
        };

        Ok(Self {
            rotation,
            scale,
            translation,
            center,
            parameters: parameters.to_vec(),
        })
    }

    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    pub fn rotation(&self) -> &SMatrix<f64, D, D> {
        &self.rotation
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translation(&self) -> &Vector<D> {
        &self.translation
    }

    pub fn center(&self) -> &Point<D> {
        &self.center
    }

    /// Inverse similarity about the same center.
    ///
    /// Scale becomes `1/s`, rotation its transpose, translation `-(1/s) Rᵀ t`.
    pub fn inverse(&self) -> Result<Self> {
        if self.scale.abs() < 1e-12 {
            return Err(CoreError::NotInvertible(format!(
                "similarity transform with scale {}",
                self.scale
            )));
        }
        let inv_scale = 1.0 / self.scale;
        let rotation = self.rotation.transpose();
        let translation = Vector(rotation * self.translation.0) * -inv_scale;

        let mut parameters = self.parameters.clone();
        if D == 2 {
            parameters[0] = inv_scale;
            parameters[1] = -parameters[1];
            parameters[2] = translation[0];
            parameters[3] = translation[1];
        } else {
            // Conjugate versor.
            for p in parameters.iter_mut().take(3) {
                *p = -*p;
            }
            parameters[3..6].copy_from_slice(&translation.to_vec());
            parameters[6] = inv_scale;
        }

        Ok(Self {
            rotation,
            scale: inv_scale,
            translation,
            center: self.center,
            parameters,
        })
    }

    pub fn to_affine(&self) -> AffineTransform<D> {
        AffineTransform::new(self.rotation * self.scale, self.translation, self.center)
    }
}

impl<const D: usize> Transform<D> for SimilarityTransform<D> {
    fn transform_point(&self, point: &Point<D>) -> Point<D> {
        let centered = *point - self.center;
        self.center + Vector(self.rotation * centered.0) * self.scale + self.translation
    }

    fn transform_points<B: burn::tensor::backend::Backend>(
        &self,
        points: burn::tensor::Tensor<B, 2>,
    ) -> burn::tensor::Tensor<B, 2> {
        self.to_affine().transform_points(points)
    }
}

/// Slack on the unit-ball check for versors built from half turns.
const VERSOR_TOLERANCE: f64 = 1e-9;

/// Rotation matrix of the unit versor with vector part `v`.
///
/// The scalar part is recovered as `w = sqrt(1 - |v|²)`.
pub fn versor_to_matrix(v: [f64; 3]) -> Matrix3<f64> {
    let [x, y, z] = v;
    let w = (1.0 - (x * x + y * y + z * z)).max(0.0).sqrt();
    UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z))
        .to_rotation_matrix()
        .into_inner()
}
