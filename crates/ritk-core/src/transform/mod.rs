//! Transform types and operations.
//!
//! This module provides transform traits and implementations
//! for spatial coordinate transformations.

pub mod trait_;
pub mod translation;
pub mod affine;
pub mod similarity;
pub mod reflection;
pub mod radial_distortion;
pub mod composite;

pub use trait_::Transform;
pub use translation::TranslationTransform;
pub use affine::AffineTransform;
pub use similarity::{versor_to_matrix, SimilarityTransform};
pub use reflection::ReflectionTransform;
pub use radial_distortion::RadialDistortionTransform;
pub use composite::{CompositeTransform, TransformStep};
