//! Direction type for representing image orientation.
//!
//! Direction matrices represent orientation of image axes in physical space.

use nalgebra::SMatrix;
use super::Vector;
use serde::{Serialize, Deserialize};

/// Direction matrix representing image orientation.
///
/// The direction matrix is a D×D matrix where column i holds the direction
/// cosines of the i-th image axis in physical space. When flattened, the
/// matrix is read and written in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction<const D: usize>(pub SMatrix<f64, D, D>);

impl<const D: usize> Direction<D> {
    /// Create an identity direction matrix (no rotation).
    pub fn identity() -> Self {
        Self(SMatrix::identity())
    }

    /// Create a zero matrix.
    pub fn zeros() -> Self {
        Self(SMatrix::zeros())
    }

    /// Build a direction matrix from a row-major flattened slice.
    pub fn from_row_major(values: &[f64]) -> Self {
        assert!(values.len() == D * D, "Direction slice length must be D*D");
        Self(SMatrix::from_row_slice(values))
    }

    /// Flatten the matrix in row-major order.
    pub fn to_row_major(&self) -> Vec<f64> {
        (0..D)
            .flat_map(|r| (0..D).map(move |c| (r, c)))
            .map(|idx| self.0[idx])
            .collect()
    }

    /// Check if direction matrix is orthogonal.
    pub fn is_orthogonal(&self) -> bool {
        let product = self.0 * self.0.transpose();
        (0..D).all(|i| {
            (0..D).all(|j| {
                let expected = if i == j { 1.0 } else { 0.0 };
                (product[(i, j)] - expected).abs() < 1e-6
            })
        })
    }

    /// Check if direction matrix is a proper rotation (det = 1).
    pub fn is_proper_rotation(&self) -> bool {
        self.is_orthogonal() && (self.determinant() - 1.0).abs() < 1e-6
    }

    /// Compute the determinant of the direction matrix.
    ///
    /// Cofactor expansion for D=2,3 and partial-pivot Gaussian elimination
    /// otherwise.
    pub fn determinant(&self) -> f64 {
        let m = &self.0;
        match D {
            1 => m[(0, 0)],
            2 => m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)],
            3 => {
                m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
                    - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
                    + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
            }
            _ => {
                let mut m = self.0;
                let mut det = 1.0;

                for i in 0..D {
                    let pivot_idx = (i..D)
                        .max_by(|&a, &b| m[(a, i)].abs().total_cmp(&m[(b, i)].abs()))
                        .unwrap_or(i);

                    if m[(pivot_idx, i)].abs() < 1e-12 {
                        return 0.0;
                    }

                    if pivot_idx != i {
                        m.swap_rows(i, pivot_idx);
                        det = -det;
                    }

                    det *= m[(i, i)];

                    for j in (i + 1)..D {
                        let factor = m[(j, i)] / m[(i, i)];
                        for k in i..D {
                            m[(j, k)] -= factor * m[(i, k)];
                        }
                    }
                }

                det
            }
        }
    }

    /// Try to compute the inverse of the direction matrix.
    pub fn try_inverse(&self) -> Option<Self> {
        if self.determinant().abs() < 1e-12 {
            return None;
        }
        self.0.try_inverse().map(Self)
    }

    /// Transpose of the matrix.
    pub fn transpose(&self) -> Self {
        Self(self.0.transpose())
    }

    /// Get the axis directions as vectors (matrix columns).
    pub fn axis_directions(&self) -> Vec<Vector<D>> {
        (0..D)
            .map(|i| Vector(self.0.column(i).into_owned()))
            .collect()
    }

    /// Get the inner nalgebra matrix.
    pub fn inner(&self) -> &SMatrix<f64, D, D> {
        &self.0
    }

    /// Get mutable reference to inner nalgebra matrix.
    pub fn inner_mut(&mut self) -> &mut SMatrix<f64, D, D> {
        &mut self.0
    }
}

impl<const D: usize> std::ops::Index<(usize, usize)> for Direction<D> {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.0[index]
    }
}

impl<const D: usize> std::ops::IndexMut<(usize, usize)> for Direction<D> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl<const D: usize> std::ops::Mul for Direction<D> {
    type Output = Self;

    fn mul(self, other: Self) -> Self::Output {
        Self(self.0 * other.0)
    }
}

impl<const D: usize> std::ops::Mul<Vector<D>> for Direction<D> {
    type Output = Vector<D>;

    fn mul(self, vector: Vector<D>) -> Self::Output {
        Vector(self.0 * vector.0)
    }
}
