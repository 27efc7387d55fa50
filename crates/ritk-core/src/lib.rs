//! Core types for physical-space medical image processing.
//!
//! * [`spatial`]: points, vectors, spacing and direction matrices (`f64`, nalgebra).
//! * [`image`]: tensor-backed images and their metadata-only [`ImageGeometry`].
//! * [`transform`]: value-object spatial transforms and their ordered composition.
//! * [`interpolation`]: nearest, linear and cubic B-spline sampling.
//! * [`filter`]: resampling, Gaussian smoothing, noise models and intensity fields.

pub mod error;
pub mod image;
pub mod spatial;
pub mod transform;
pub mod interpolation;
pub mod filter;

pub use error::{CoreError, Result};
pub use image::{Image, ImageGeometry};
pub use spatial::{Point, Vector, Spacing, Direction};
