//! Reflections folded into the resampling transform.
//!
//! A reflection of the reference grid about the reference center is
//! composed on the reference side of the centered transform, so a mirrored
//! sample costs one resampling pass instead of a resample followed by a
//! flip.

use nalgebra::SMatrix;
use ritk_core::transform::{CompositeTransform, ReflectionTransform};
use crate::error::{AugmentError, Result};
use crate::reference::ReferenceDomain;

fn check_axes<const D: usize>(axes: &[usize]) -> Result<()> {
    match axes.iter().find(|&&a| a >= D) {
        Some(axis) => Err(AugmentError::dimension_mismatch(format!(
            "reflection axis {} in {}D",
            axis, D
        ))),
        None => Ok(()),
    }
}

/// Diagonal matrix with `-1` on the reflected axes.
pub fn reflection_matrix<const D: usize>(axes: &[usize]) -> Result<SMatrix<f64, D, D>> {
    check_axes::<D>(axes)?;
    let mut matrix = SMatrix::identity();
    for &axis in axes {
        matrix[(axis, axis)] = -1.0;
    }
    Ok(matrix)
}

/// `centered ∘ reflection`, the reflection pivoting on the reference center.
///
/// Along a reflected axis, output index `i` samples what `centered` alone
/// would have put at index `size - 1 - i`, so resampling through the result
/// matches resampling through `centered` and flipping the buffer.
pub fn fold_reflection<const D: usize>(
    centered: &CompositeTransform<D>,
    domain: &ReferenceDomain<D>,
    axes: &[usize],
) -> Result<CompositeTransform<D>> {
    check_axes::<D>(axes)?;
    let reflection = ReflectionTransform::new(axes, *domain.reference_center());
    Ok(centered.clone().then_inner(reflection))
}
