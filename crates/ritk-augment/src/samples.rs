//! Lazy enumeration of augmented transforms.

use ritk_core::spatial::Point;
use ritk_core::transform::CompositeTransform;
use tracing::warn;
use crate::error::Result;
use crate::family::AugmentationFamily;
use crate::parameter_space::{ParameterIter, ParameterSpace};

/// One augmentation: its parameters and the full reference-to-native map.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedSample<const D: usize> {
    pub parameters: Vec<f64>,
    pub transform: CompositeTransform<D>,
}

/// Iterator over the augmented transforms of one image.
///
/// Each item is `centered ∘ augmentation`, so the augmentation acts on
/// reference-domain points before they are carried into the native image.
#[derive(Debug, Clone)]
pub struct AugmentedSamples<'a, const D: usize> {
    centered: CompositeTransform<D>,
    family: AugmentationFamily,
    center: Point<D>,
    parameters: ParameterIter<'a>,
    total: Option<usize>,
}

impl<const D: usize> AugmentedSamples<'_, D> {
    /// Total number of samples, saturating.
    pub fn len(&self) -> usize {
        self.total.unwrap_or(usize::MAX)
    }

    pub fn checked_len(&self) -> Option<usize> {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == Some(0)
    }

    pub fn family(&self) -> AugmentationFamily {
        self.family
    }
}

impl<const D: usize> Iterator for AugmentedSamples<'_, D> {
    type Item = Result<AugmentedSample<D>>;

    fn next(&mut self) -> Option<Self::Item> {
        let parameters = self.parameters.next()?;
        let sample = self
            .family
            .instantiate::<D>(&parameters, self.center)
            .map(|augmentation| AugmentedSample {
                transform: self.centered.clone().then_inner(augmentation),
                parameters,
            });
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.parameters.size_hint()
    }
}

/// Pair every parameter vector of `space` with `centered ∘ family(params)`.
///
/// Arity is checked before anything is yielded; iteration itself is lazy
/// and `len()` is known up front.
///
/// # Errors
/// * [`AugmentError::ParameterArity`] when the space's vectors do not fit the family.
/// * [`AugmentError::DimensionMismatch`] when the family is not defined in `D`.
pub fn enumerate_augmented_samples<'a, const D: usize>(
    centered: &CompositeTransform<D>,
    family: AugmentationFamily,
    center: Point<D>,
    space: &'a ParameterSpace,
) -> Result<AugmentedSamples<'a, D>> {
    family.check_arity::<D>(space.arity())?;

    let total = space.checked_len();
    if total.is_none() {
        warn!(family = family.name(), "parameter space size overflows usize");
    }

    Ok(AugmentedSamples {
        centered: centered.clone(),
        family,
        center,
        parameters: space.iter(),
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AugmentError;
    use crate::parameter_space::ParameterRange;
    use ritk_core::spatial::Vector;
    use ritk_core::transform::{Transform, TranslationTransform};

    #[test]
    fn test_translation_samples() {
        let centered = CompositeTransform::from_steps(vec![TranslationTransform::new(Vector::new([5.0, 0.0])).into()]);
        let space = ParameterSpace::grid(vec![ParameterRange::new(vec![0.0, 1.0]), ParameterRange::constant(2.0)]);
        let samples = enumerate_augmented_samples(&centered, AugmentationFamily::Translation, Point::origin(), &space)
            .unwrap();
        assert_eq!(samples.len(), 2);

        let all: Vec<_> = samples.collect::<Result<_>>().unwrap();
        let p = all[1].transform.transform_point(&Point::origin());
        assert!(p.max_abs_diff(&Point::new([6.0, 2.0])) < 1e-12);
        assert_eq!(all[1].parameters, vec![1.0, 2.0]);
        assert_eq!(all[1].transform.len(), 2);
    }

    #[test]
    fn test_arity_checked_eagerly() {
        let space = ParameterSpace::grid(vec![ParameterRange::constant(1.0); 4]);
        let result = enumerate_augmented_samples(
            &CompositeTransform::<3>::new(),
            AugmentationFamily::Similarity,
            Point::origin(),
            &space,
        );
        assert!(matches!(
            result,
            Err(AugmentError::ParameterArity { expected: 7, actual: 4, .. })
        ));
    }
}
