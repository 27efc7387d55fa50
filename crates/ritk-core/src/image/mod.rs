//! Image types and operations.
//!
//! This module provides the Image type, its metadata-only geometry view,
//! and index grid generation.

pub mod image;
pub mod geometry;
pub mod grid;

pub use image::Image;
pub use geometry::ImageGeometry;
pub use grid::generate_grid;
