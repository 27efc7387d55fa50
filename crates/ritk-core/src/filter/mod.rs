pub mod gaussian;
pub mod resample;
pub mod noise;
pub mod intensity_field;

pub use gaussian::GaussianFilter;
pub use resample::ResampleImageFilter;
pub use noise::{additive_gaussian_noise, salt_and_pepper_noise, shot_noise, speckle_noise};
pub use intensity_field::{apply_intensity_fields, GaussianField};
