//! Per-image centering transform.

use ritk_core::image::ImageGeometry;
use ritk_core::transform::{AffineTransform, CompositeTransform, Transform, TranslationTransform};
use tracing::debug;
use crate::error::{AugmentError, Result};
use crate::reference::ReferenceDomain;

/// Map from the reference domain into one native image.
///
/// The result is `T0 ∘ centering`: `T0` carries the native direction and
/// the origin difference, and `centering` is the translation that sends
/// the reference center onto the preimage of the native center. Points of
/// the reference grid are therefore taken to the native image such that
/// `reference_center ↦ native.center()`.
///
/// # Errors
/// [`AugmentError::SingularTransform`] when the native direction cannot be inverted.
pub fn build_centered_transform<const D: usize>(
    geometry: &ImageGeometry<D>,
    domain: &ReferenceDomain<D>,
) -> Result<CompositeTransform<D>> {
    let base = AffineTransform::from_direction(geometry.direction(), *geometry.origin() - *domain.origin());
    let inverse = base.inverse().map_err(|e| {
        AugmentError::singular_transform(format!("native direction of a {:?} image: {}", geometry.size(), e))
    })?;

    let native_center = geometry.center();
    let offset = inverse.transform_point(&native_center) - *domain.reference_center();
    debug!(offset = ?offset.to_vec(), "centering offset");

    Ok(CompositeTransform::compose(base, TranslationTransform::new(offset)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{build_reference_domain, ReferenceSize};
    use ritk_core::spatial::{Direction, Point, Spacing};

    #[test]
    fn test_reference_center_maps_to_native_center() {
        let native = ImageGeometry::<2>::new(
            [80, 120],
            Point::new([-12.0, 30.5]),
            Spacing::new([0.8, 1.2]),
            Direction::from_row_major(&[0.0, -1.0, 1.0, 0.0]),
        );
        let domain = build_reference_domain(&[native], &ReferenceSize::uniform(64)).unwrap();
        let centered = build_centered_transform(&native, &domain).unwrap();

        let mapped = centered.transform_point(domain.reference_center());
        assert!(mapped.max_abs_diff(&native.center()) < 1e-9);
        assert_eq!(centered.len(), 2);
    }

    #[test]
    fn test_singular_direction() {
        let native = ImageGeometry::<2>::new([10, 10], Point::origin(), Spacing::uniform(1.0), Direction::zeros());
        let domain = build_reference_domain(&[ImageGeometry::with_size([10, 10])], &ReferenceSize::uniform(8)).unwrap();
        assert!(matches!(
            build_centered_transform(&native, &domain),
            Err(AugmentError::SingularTransform(_))
        ));
    }
}
