//! NIfTI-1 reading and writing for 3D images.
//!
//! The voxel-to-world affine is taken from the sform when present, then the
//! qform, then plain pixdim scaling. Written files always carry an sform, so
//! origin, spacing and direction survive a write/read round trip.

use anyhow::{Context, Result};
use burn::tensor::{Tensor, TensorData, Shape};
use burn::tensor::backend::Backend;
use nalgebra::{SMatrix, Vector3};
use ndarray::Array3;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};
use nifti::writer::WriterOptions;
use ritk_core::image::{Image, ImageGeometry};
use ritk_core::spatial::{Direction, Point, Spacing, Vector};
use std::path::Path;
use tracing::debug;

/// Rows of the voxel-to-world affine, `[R*S | t]`.
type Affine3x4 = [[f64; 4]; 3];

fn header_affine(header: &NiftiHeader) -> Affine3x4 {
    let widen = |row: [f32; 4]| row.map(f64::from);

    if header.sform_code > 0 {
        [widen(header.srow_x), widen(header.srow_y), widen(header.srow_z)]
    } else if header.qform_code > 0 {
        let b = header.quatern_b as f64;
        let c = header.quatern_c as f64;
        let d = header.quatern_d as f64;
        let a = (1.0 - (b * b + c * c + d * d).min(1.0)).sqrt();

        let qfac = if header.pixdim[0] == 0.0 { 1.0 } else { header.pixdim[0] as f64 };
        let dx = header.pixdim[1] as f64;
        let dy = header.pixdim[2] as f64;
        let dz = header.pixdim[3] as f64 * qfac;

        [
            [
                (a * a + b * b - c * c - d * d) * dx,
                (2.0 * b * c - 2.0 * a * d) * dy,
                (2.0 * b * d + 2.0 * a * c) * dz,
                header.quatern_x as f64,
            ],
            [
                (2.0 * b * c + 2.0 * a * d) * dx,
                (a * a + c * c - b * b - d * d) * dy,
                (2.0 * c * d - 2.0 * a * b) * dz,
                header.quatern_y as f64,
            ],
            [
                (2.0 * b * d - 2.0 * a * c) * dx,
                (2.0 * c * d + 2.0 * a * b) * dy,
                (a * a + d * d - c * c - b * b) * dz,
                header.quatern_z as f64,
            ],
        ]
    } else {
        let [dx, dy, dz] = [1, 2, 3].map(|i| header.pixdim[i] as f64);
        [
            [dx, 0.0, 0.0, 0.0],
            [0.0, dy, 0.0, 0.0],
            [0.0, 0.0, dz, 0.0],
        ]
    }
}

/// Split an affine into origin, spacing (column norms) and direction cosines.
fn affine_to_geometry(affine: &Affine3x4) -> (Point<3>, Spacing<3>, Direction<3>) {
    let origin = Point::new([affine[0][3], affine[1][3], affine[2][3]]);

    let axes = [Vector3::x(), Vector3::y(), Vector3::z()];
    let mut spacing = Spacing::uniform(1.0);
    let mut columns = [Vector3::zeros(); 3];
    for c in 0..3 {
        let column = Vector3::new(affine[0][c], affine[1][c], affine[2][c]);
        let norm = column.norm();
        if norm > 1e-9 {
            spacing[c] = norm;
            columns[c] = column / norm;
        } else {
            columns[c] = axes[c];
        }
    }

    (origin, spacing, Direction(SMatrix::<f64, 3, 3>::from_columns(&columns)))
}

/// Header carrying the geometry as an sform (and matching pixdim).
fn geometry_header(geometry: &ImageGeometry<3>) -> NiftiHeader {
    let origin = geometry.origin();
    let spacing = geometry.spacing();
    let direction = geometry.direction();

    let row = |r: usize| -> [f32; 4] {
        [
            (direction[(r, 0)] * spacing[0]) as f32,
            (direction[(r, 1)] * spacing[1]) as f32,
            (direction[(r, 2)] * spacing[2]) as f32,
            origin[r] as f32,
        ]
    };

    let mut header = NiftiHeader::default();
    header.sform_code = 1;
    header.qform_code = 0;
    header.srow_x = row(0);
    header.srow_y = row(1);
    header.srow_z = row(2);
    header.pixdim = [
        1.0,
        spacing[0] as f32,
        spacing[1] as f32,
        spacing[2] as f32,
        1.0,
        1.0,
        1.0,
        1.0,
    ];
    header
}

/// Read a 3D NIfTI file.
///
/// Voxel data is loaded as `f32` into a `[Z, Y, X]` tensor.
pub fn read_nifti<B: Backend, P: AsRef<Path>>(path: P, device: &B::Device) -> Result<Image<B, 3>> {
    let path = path.as_ref();
    let obj = ReaderOptions::new().read_file(path).context("Failed to read NIfTI file")?;

    let (origin, spacing, direction) = affine_to_geometry(&header_affine(obj.header()));

    let volume = obj
        .into_volume()
        .into_ndarray::<f32>()
        .context("Failed to convert volume to ndarray")?;
    if volume.ndim() != 3 {
        anyhow::bail!("Expected 3D NIfTI file, found {} dimensions", volume.ndim());
    }

    // File axes are (x, y, z); reversing gives the tensor layout.
    let volume = volume.reversed_axes();
    let shape = [volume.shape()[0], volume.shape()[1], volume.shape()[2]];
    let values: Vec<f32> = volume.iter().copied().collect();

    let tensor = Tensor::<B, 3>::from_data(TensorData::new(values, Shape::new(shape)), device);
    let image = Image::new(tensor, origin, spacing, direction);

    debug!(
        size = ?image.size(),
        spacing = ?image.spacing().to_vec(),
        origin = ?image.origin().to_vec(),
        "read NIfTI volume"
    );
    Ok(image)
}

/// Write an image to a NIfTI file.
///
/// # Arguments
/// * `path` - Path to write the NIfTI file
/// * `image` - The image to write
pub fn write_nifti<B: Backend, P: AsRef<Path>>(path: P, image: &Image<B, 3>) -> Result<()> {
    let data = image.data().clone().into_data();
    let values: Vec<f32> = data.iter::<f32>().collect();

    let [nz, ny, nx] = image.shape();
    let array = Array3::from_shape_vec((nz, ny, nx), values)
        .context("Tensor data does not match image shape")?
        .reversed_axes();

    let path = path.as_ref();
    let header = geometry_header(&image.geometry());
    WriterOptions::new(path)
        .reference_header(&header)
        .write_nifti(&array)
        .with_context(|| format!("Failed to write NIfTI file {}", path.display()))?;

    debug!(size = ?image.size(), path = %path.display(), "wrote NIfTI volume");
    Ok(())
}
