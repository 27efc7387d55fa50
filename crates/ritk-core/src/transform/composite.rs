//! Composite transform implementation.
//!
//! This module provides an ordered chain of transforms with an explicit
//! composition order.

use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use crate::error::{CoreError, Result};
use crate::spatial::Point;
use super::affine::AffineTransform;
use super::radial_distortion::RadialDistortionTransform;
use super::reflection::ReflectionTransform;
use super::similarity::SimilarityTransform;
use super::trait_::Transform;
use super::translation::TranslationTransform;

/// One step of a [`CompositeTransform`].
#[derive(Debug, Clone, PartialEq)]
pub enum TransformStep<const D: usize> {
    Affine(AffineTransform<D>),
    Translation(TranslationTransform<D>),
    Similarity(SimilarityTransform<D>),
    Reflection(ReflectionTransform<D>),
    RadialDistortion(RadialDistortionTransform<D>),
    Composite(CompositeTransform<D>),
}

impl<const D: usize> TransformStep<D> {
    /// Short name, used in log messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Affine(_) => "affine",
            Self::Translation(_) => "translation",
            Self::Similarity(_) => "similarity",
            Self::Reflection(_) => "reflection",
            Self::RadialDistortion(_) => "radial_distortion",
            Self::Composite(_) => "composite",
        }
    }

    /// Affine equivalent, if the step is affine.
    pub fn to_affine(&self) -> Option<AffineTransform<D>> {
        match self {
            Self::Affine(t) => Some(*t),
            Self::Translation(t) => Some(t.to_affine()),
            Self::Similarity(t) => Some(t.to_affine()),
            Self::Reflection(t) => Some(t.to_affine()),
            Self::RadialDistortion(_) => None,
            Self::Composite(t) => t.to_affine(),
        }
    }

    pub fn inverse(&self) -> Result<Self> {
        Ok(match self {
            Self::Affine(t) => Self::Affine(t.inverse()?),
            Self::Translation(t) => Self::Translation(t.inverse()),
            Self::Similarity(t) => Self::Similarity(t.inverse()?),
            Self::Reflection(t) => Self::Reflection(t.inverse()),
            Self::RadialDistortion(_) => {
                return Err(CoreError::NotInvertible(
                    "radial distortion has no closed-form inverse".to_string(),
                ))
            }
            Self::Composite(t) => Self::Composite(t.inverse()?),
        })
    }
}

impl<const D: usize> Transform<D> for TransformStep<D> {
    fn transform_point(&self, point: &Point<D>) -> Point<D> {
        match self {
            Self::Affine(t) => t.transform_point(point),
            Self::Translation(t) => t.transform_point(point),
            Self::Similarity(t) => t.transform_point(point),
            Self::Reflection(t) => t.transform_point(point),
            Self::RadialDistortion(t) => t.transform_point(point),
            Self::Composite(t) => t.transform_point(point),
        }
    }

    fn transform_points<B: Backend>(&self, points: Tensor<B, 2>) -> Tensor<B, 2> {
        match self {
            Self::Affine(t) => t.transform_points(points),
            Self::Translation(t) => t.transform_points(points),
            Self::Similarity(t) => t.transform_points(points),
            Self::Reflection(t) => t.transform_points(points),
            Self::RadialDistortion(t) => t.transform_points(points),
            Self::Composite(t) => t.transform_points(points),
        }
    }
}

macro_rules! impl_from_step {
    ($($variant:ident => $ty:ident),* $(,)?) => {
        $(
            impl<const D: usize> From<$ty<D>> for TransformStep<D> {
                fn from(t: $ty<D>) -> Self {
                    Self::$variant(t)
                }
            }
        )*
    };
}

impl_from_step!(
    Affine => AffineTransform,
    Translation => TranslationTransform,
    Similarity => SimilarityTransform,
    Reflection => ReflectionTransform,
    RadialDistortion => RadialDistortionTransform,
    Composite => CompositeTransform,
);

/// Ordered composition of transforms.
///
/// Steps are stored in composition order: `[A, B, C]` is `A ∘ B ∘ C`, so a
/// point goes through `C` first and `A` last. [`CompositeTransform::add_transform`]
/// appends an innermost step, which is applied before everything already
/// in the chain.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompositeTransform<const D: usize> {
    steps: Vec<TransformStep<D>>,
}

impl<const D: usize> CompositeTransform<D> {
    /// Empty composite, the identity map.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Build from steps given in composition order.
    pub fn from_steps(steps: Vec<TransformStep<D>>) -> Self {
        Self { steps }
    }

    /// `outer ∘ inner`.
    pub fn compose(outer: impl Into<TransformStep<D>>, inner: impl Into<TransformStep<D>>) -> Self {
        Self::from_steps(vec![outer.into(), inner.into()])
    }

    /// Append an innermost step.
    pub fn add_transform(&mut self, step: impl Into<TransformStep<D>>) -> &mut Self {
        self.steps.push(step.into());
        self
    }

    /// Builder form of [`CompositeTransform::add_transform`].
    pub fn then_inner(mut self, step: impl Into<TransformStep<D>>) -> Self {
        self.steps.push(step.into());
        self
    }

    pub fn steps(&self) -> &[TransformStep<D>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Expand nested composites into a single flat chain.
    pub fn flatten(&self) -> Self {
        let mut steps = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            match step {
                TransformStep::Composite(inner) => steps.extend(inner.flatten().steps),
                other => steps.push(other.clone()),
            }
        }
        Self { steps }
    }

    /// Inverse chain: inverted steps in reverse order.
    pub fn inverse(&self) -> Result<Self> {
        let steps = self
            .steps
            .iter()
            .rev()
            .map(TransformStep::inverse)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { steps })
    }

    /// Collapse the chain into one affine map, if every step is affine.
    pub fn to_affine(&self) -> Option<AffineTransform<D>> {
        let mut acc = AffineTransform::identity();
        for step in &self.steps {
            acc = acc.compose(&step.to_affine()?);
        }
        Some(acc)
    }
}

impl<const D: usize> Transform<D> for CompositeTransform<D> {
    fn transform_point(&self, point: &Point<D>) -> Point<D> {
        self.steps
            .iter()
            .rev()
            .fold(*point, |p, step| step.transform_point(&p))
    }

    fn transform_points<B: Backend>(&self, points: Tensor<B, 2>) -> Tensor<B, 2> {
        if let Some(affine) = self.to_affine() {
            return affine.transform_points(points);
        }
        self.steps
            .iter()
            .rev()
            .fold(points, |p, step| step.transform_points(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Vector;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_composition_order() {
        // A = scale by 2 about origin, B = translate by (1, 0).
        let a = AffineTransform::<2>::new(
            nalgebra::SMatrix::identity() * 2.0,
            Vector::zeros(),
            Point::origin(),
        );
        let b = TranslationTransform::new(Vector::new([1.0, 0.0]));

        // A ∘ B: translate first, then scale.
        let composite = CompositeTransform::compose(a, b);
        let p = composite.transform_point(&Point::new([1.0, 1.0]));
        assert_eq!(p, Point::new([4.0, 2.0]));

        // B ∘ A: scale first, then translate.
        let reversed = CompositeTransform::compose(b, a);
        assert_eq!(reversed.transform_point(&Point::new([1.0, 1.0])), Point::new([3.0, 2.0]));
    }

    #[test]
    fn test_add_transform_is_applied_first() {
        let mut composite = CompositeTransform::<2>::new();
        composite
            .add_transform(TranslationTransform::new(Vector::new([0.0, 1.0])))
            .add_transform(ReflectionTransform::new(&[0], Point::origin()));

        // Reflect x first, then translate y.
        let p = composite.transform_point(&Point::new([2.0, 0.0]));
        assert_eq!(p, Point::new([-2.0, 1.0]));
    }

    #[test]
    fn test_inverse_and_flatten() {
        let inner = CompositeTransform::compose(
            TranslationTransform::new(Vector::new([1.0, 2.0])),
            SimilarityTransform::<2>::from_parameters(&[1.5, 0.3, 0.0, 1.0], Point::new([4.0, 4.0])).unwrap(),
        );
        let composite = CompositeTransform::new()
            .then_inner(ReflectionTransform::new(&[1], Point::new([0.5, 0.5])))
            .then_inner(inner);

        assert_eq!(composite.len(), 2);
        let flat = composite.flatten();
        assert_eq!(flat.len(), 3);

        let p = Point::new([3.0, -2.0]);
        assert!(flat.transform_point(&p).max_abs_diff(&composite.transform_point(&p)) < 1e-12);

        let inverse = composite.inverse().unwrap();
        let back = inverse.transform_point(&composite.transform_point(&p));
        assert!(back.max_abs_diff(&p) < 1e-9);
    }

    #[test]
    fn test_radial_distortion_blocks_inverse_and_affine() {
        let composite = CompositeTransform::<2>::compose(
            TranslationTransform::new(Vector::new([1.0, 0.0])),
            RadialDistortionTransform::new([0.1, 0.0, 0.0], Point::origin()),
        );
        assert!(composite.to_affine().is_none());
        assert!(matches!(composite.inverse(), Err(CoreError::NotInvertible(_))));
    }

    #[test]
    fn test_tensor_path_matches_point_path() {
        let device = Default::default();
        let composite = CompositeTransform::<2>::compose(
            TranslationTransform::new(Vector::new([1.0, 0.0])),
            RadialDistortionTransform::new([0.01, 0.0, 0.0], Point::new([1.0, 1.0])),
        );

        let inputs = [[0.0, 0.0], [3.0, 4.0]];
        let points = Tensor::<TestBackend, 2>::from_floats(inputs, &device);
        let data = composite.transform_points(points).into_data();
        let slice = data.as_slice::<f32>().unwrap();

        for (row, input) in inputs.iter().enumerate() {
            let expected = composite.transform_point(&Point::new(*input));
            assert!((slice[row * 2] as f64 - expected[0]).abs() < 1e-5);
            assert!((slice[row * 2 + 1] as f64 - expected[1]).abs() < 1e-5);
        }
    }
}
