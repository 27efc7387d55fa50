//! Parameter spaces for augmentation families.
//!
//! A [`ParameterSpace`] is either a Cartesian grid of per-parameter value
//! ranges or an explicit list of parameter vectors. Grids are never
//! materialized: [`ParameterSpace::iter`] walks them like an odometer, the
//! last parameter varying fastest, and can be restarted at will.

use nalgebra::UnitQuaternion;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use crate::error::{AugmentError, Result};

/// Values taken by a single parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    values: Vec<f64>,
}

impl ParameterRange {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// A parameter held at one value.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// `n` evenly spaced values from `start` to `stop`, both included.
    ///
    /// `n == 1` yields `start` alone.
    pub fn linspace(start: f64, stop: f64, n: usize) -> Self {
        let values = match n {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (stop - start) / (n - 1) as f64;
                (0..n).map(|i| if i == n - 1 { stop } else { start + step * i as f64 }).collect()
            }
        };
        Self::new(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<f64>> for ParameterRange {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Layout {
    Grid(Vec<ParameterRange>),
    Samples(Vec<Vec<f64>>),
}

/// Set of parameter vectors to enumerate.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpace {
    arity: usize,
    layout: Layout,
}

impl ParameterSpace {
    /// Cartesian product of `ranges`, one range per parameter.
    pub fn grid(ranges: Vec<ParameterRange>) -> Self {
        Self {
            arity: ranges.len(),
            layout: Layout::Grid(ranges),
        }
    }

    /// Explicit parameter vectors, each of length `arity`.
    ///
    /// # Errors
    /// [`AugmentError::ParameterArity`] when a vector has another length.
    pub fn samples(arity: usize, samples: Vec<Vec<f64>>) -> Result<Self> {
        if let Some(bad) = samples.iter().find(|s| s.len() != arity) {
            return Err(AugmentError::ParameterArity {
                family: "parameter samples".to_string(),
                expected: arity,
                actual: bad.len(),
            });
        }
        Ok(Self {
            arity,
            layout: Layout::Samples(samples),
        })
    }

    /// Length of every parameter vector.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Number of parameter vectors, `None` if it overflows `usize`.
    pub fn checked_len(&self) -> Option<usize> {
        match &self.layout {
            Layout::Grid(ranges) => ranges.iter().try_fold(1usize, |acc, r| acc.checked_mul(r.len())),
            Layout::Samples(samples) => Some(samples.len()),
        }
    }

    /// Number of parameter vectors, saturating at `usize::MAX`.
    pub fn len(&self) -> usize {
        self.checked_len().unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fresh iterator over the parameter vectors.
    pub fn iter(&self) -> ParameterIter<'_> {
        let exhausted = self.is_empty();
        ParameterIter {
            space: self,
            cursor: vec![0; self.arity],
            position: 0,
            exhausted,
        }
    }
}

impl<'a> IntoIterator for &'a ParameterSpace {
    type Item = Vec<f64>;
    type IntoIter = ParameterIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`ParameterSpace`].
#[derive(Debug, Clone)]
pub struct ParameterIter<'a> {
    space: &'a ParameterSpace,
    cursor: Vec<usize>,
    position: usize,
    exhausted: bool,
}

impl Iterator for ParameterIter<'_> {
    type Item = Vec<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let item = match &self.space.layout {
            Layout::Samples(samples) => {
                let item = samples.get(self.position).cloned();
                self.exhausted = self.position + 1 >= samples.len();
                item
            }
            Layout::Grid(ranges) => {
                let item: Vec<f64> = ranges
                    .iter()
                    .zip(&self.cursor)
                    .map(|(range, &i)| range.values[i])
                    .collect();

                // Odometer step, last parameter fastest.
                self.exhausted = true;
                for axis in (0..ranges.len()).rev() {
                    self.cursor[axis] += 1;
                    if self.cursor[axis] < ranges[axis].len() {
                        self.exhausted = false;
                        break;
                    }
                    self.cursor[axis] = 0;
                }
                Some(item)
            }
        };
        self.position += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.exhausted {
            return (0, Some(0));
        }
        match self.space.checked_len() {
            Some(len) => {
                let remaining = len - self.position;
                (remaining, Some(remaining))
            }
            None => (usize::MAX, None),
        }
    }
}

/// `n` parameter vectors drawn uniformly from `[lo, hi]` per parameter.
///
/// # Errors
/// [`AugmentError::InvalidConfiguration`] for non-finite or reversed bounds.
pub fn random_sampling(bounds: &[(f64, f64)], n: usize, seed: u64) -> Result<ParameterSpace> {
    for (i, &(lo, hi)) in bounds.iter().enumerate() {
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(AugmentError::invalid_configuration(format!(
                "parameter {} has invalid bounds [{}, {}]",
                i, lo, hi
            )));
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let samples = (0..n)
        .map(|_| bounds.iter().map(|&(lo, hi)| rng.gen_range(lo..=hi)).collect())
        .collect();
    ParameterSpace::samples(bounds.len(), samples)
}

/// Vector part of the unit quaternion for Euler angles (radians).
///
/// The rotation is `Rz(θz) · Ry(θy) · Rx(θx)`. The sign is chosen so the
/// scalar part is non-negative.
pub fn euler_to_versor(theta_x: f64, theta_y: f64, theta_z: f64) -> [f64; 3] {
    let q = UnitQuaternion::from_euler_angles(theta_x, theta_y, theta_z);
    let v = if q.w < 0.0 { -q.imag() } else { q.imag() };
    [v.x, v.y, v.z]
}
