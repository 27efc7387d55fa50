//! Reference domain construction.
//!
//! The reference domain is a common sampling grid large enough to hold the
//! physical extent of every input image along each axis. It has zero origin
//! and identity direction; only its size and spacing depend on the inputs.

use ritk_core::image::ImageGeometry;
use ritk_core::spatial::{Direction, Point, Spacing, Vector};
use tracing::{debug, warn};
use crate::error::{AugmentError, Result};

const DIRECTION_TOLERANCE: f64 = 1e-6;

/// How the reference grid size is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceSize<const D: usize> {
    /// Pixel count per axis; spacing is fitted per axis.
    Fixed([usize; D]),
    /// Pixel count along one axis; the spacing fitted there is used on
    /// every axis and the other sizes follow from it.
    Isotropic { axis: usize, size: usize },
}

impl<const D: usize> ReferenceSize<D> {
    /// Same pixel count on every axis.
    pub fn uniform(size: usize) -> Self {
        Self::Fixed([size; D])
    }
}

/// Common sampling grid shared by all inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceDomain<const D: usize> {
    geometry: ImageGeometry<D>,
    physical_size: Vector<D>,
    reference_center: Point<D>,
}

impl<const D: usize> ReferenceDomain<D> {
    /// Sampling grid of the domain.
    pub fn geometry(&self) -> &ImageGeometry<D> {
        &self.geometry
    }

    pub fn size(&self) -> [usize; D] {
        self.geometry.size()
    }

    pub fn spacing(&self) -> &Spacing<D> {
        self.geometry.spacing()
    }

    pub fn origin(&self) -> &Point<D> {
        self.geometry.origin()
    }

    pub fn direction(&self) -> &Direction<D> {
        self.geometry.direction()
    }

    /// Largest physical extent of the inputs along each axis.
    pub fn physical_size(&self) -> &Vector<D> {
        &self.physical_size
    }

    /// Physical point at the grid midpoint, index `(size - 1) / 2`.
    pub fn reference_center(&self) -> &Point<D> {
        &self.reference_center
    }

    /// Physical extent of the reference grid itself.
    pub fn physical_extent(&self) -> Vector<D> {
        self.geometry.physical_extent()
    }
}

/// Build the reference domain covering every input geometry.
///
/// `physical_size[i]` is the largest `(size[i] - 1) * spacing[i]` over the
/// inputs. Extents are measured along each input's own index axes, so
/// inputs with differing directions are not projected onto a common frame;
/// a warning is logged when that happens.
///
/// # Errors
/// * [`AugmentError::DegenerateDomain`] for an empty input, a reference size
///   below 2, or a zero physical size along some axis.
/// * [`AugmentError::DimensionMismatch`] when the isotropic axis is out of range.
pub fn build_reference_domain<const D: usize>(
    geometries: &[ImageGeometry<D>],
    reference_size: &ReferenceSize<D>,
) -> Result<ReferenceDomain<D>> {
    let first = geometries
        .first()
        .ok_or_else(|| AugmentError::degenerate_domain("no input images"))?;

    if geometries
        .iter()
        .any(|g| (g.direction().0 - first.direction().0).amax() > DIRECTION_TOLERANCE)
    {
        warn!(
            count = geometries.len(),
            "input directions differ; extents are taken along each image's own axes"
        );
    }

    let mut physical_size = Vector::<D>::zeros();
    for geometry in geometries {
        let extent = geometry.physical_extent();
        for i in 0..D {
            physical_size[i] = physical_size[i].max(extent[i]);
        }
    }
    if let Some(axis) = (0..D).find(|&i| physical_size[i] <= 0.0) {
        return Err(AugmentError::degenerate_domain(format!(
            "zero physical size along axis {}",
            axis
        )));
    }

    let (size, spacing) = match *reference_size {
        ReferenceSize::Fixed(size) => {
            if let Some(n) = size.iter().find(|&&n| n < 2) {
                return Err(AugmentError::degenerate_domain(format!(
                    "reference size {} is below 2",
                    n
                )));
            }
            let mut spacing = Spacing::uniform(1.0);
            for i in 0..D {
                spacing[i] = physical_size[i] / (size[i] - 1) as f64;
            }
            (size, spacing)
        }
        ReferenceSize::Isotropic { axis, size: n } => {
            if axis >= D {
                return Err(AugmentError::dimension_mismatch(format!(
                    "isotropic axis {} for a {}D domain",
                    axis, D
                )));
            }
            if n < 2 {
                return Err(AugmentError::degenerate_domain(format!("reference size {} is below 2", n)));
            }
            let s = physical_size[axis] / (n - 1) as f64;
            let mut size = [0usize; D];
            for i in 0..D {
                // Round up so the grid never falls short of the native extent.
                size[i] = if i == axis {
                    n
                } else {
                    (physical_size[i] / s - 1e-9).ceil().max(1.0) as usize + 1
                };
            }
            (size, Spacing::uniform(s))
        }
    };

    let geometry = ImageGeometry::new(size, Point::origin(), spacing, Direction::identity());
    let domain = ReferenceDomain {
        geometry,
        physical_size,
        reference_center: geometry.grid_midpoint(),
    };

    debug!(
        size = ?domain.size(),
        spacing = ?domain.spacing().to_vec(),
        physical_size = ?physical_size.to_vec(),
        center = ?domain.reference_center().to_vec(),
        "built reference domain"
    );
    Ok(domain)
}
