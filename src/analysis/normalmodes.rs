use std::f64::consts::TAU;

use nalgebra::{DMatrix, DVector, SymmetricEigen, Vector3};
use serde::Serialize;

use crate::core::error::{check_len, natoms_of, PotentialError, Result};
use crate::core::spatial;
use crate::engine::potential::BasePotential;

/// Vectors shorter than this after projection are treated as linearly dependent.
const DEPENDENT_TOL: f64 = 1e-8;

/// One eigenpair of a Hessian.
#[derive(Debug, Clone, Serialize)]
pub struct NormalMode {
    /// Eigenvalue (squared angular frequency for unit masses).
    pub eigenvalue: f64,
    /// Unit-norm eigenvector, same layout as the configuration.
    pub vector: Vec<f64>,
}

/// Diagonalises a row-major `ndof x ndof` Hessian.
/// Modes are returned sorted by ascending eigenvalue.
pub fn normal_modes(hess: &[f64], ndof: usize) -> Result<Vec<NormalMode>> {
    check_len("hessian", hess, ndof * ndof)?;
    if hess.iter().any(|h| !h.is_finite()) {
        return Err(PotentialError::NonFinite { what: "hessian" });
    }

    let matrix = DMatrix::from_row_slice(ndof, ndof, hess);
    let eigen = SymmetricEigen::new(matrix);

    let mut modes: Vec<NormalMode> = eigen
        .eigenvalues
        .iter()
        .zip(eigen.eigenvectors.column_iter())
        .map(|(&eigenvalue, v)| NormalMode {
            eigenvalue,
            vector: v.iter().copied().collect(),
        })
        .collect();
    modes.sort_by(|a, b| a.eigenvalue.total_cmp(&b.eigenvalue));
    Ok(modes)
}

/// Orthonormal basis of rigid-body motions of `x`: up to three translations
/// followed by up to three rotations about the center of geometry.
///
/// Rotations that are not independent (single atom, linear configurations)
/// are dropped, so the basis has 3 to 6 vectors.
pub fn zero_eigenvectors(x: &[f64]) -> Result<Vec<DVector<f64>>> {
    let natoms = natoms_of(x)?;
    let ndof = x.len();
    let center = spatial::centroid(x);

    let mut candidates = Vec::with_capacity(6);
    for a in 0..3 {
        let mut t = DVector::zeros(ndof);
        for i in 0..natoms {
            t[3 * i + a] = 1.0;
        }
        candidates.push(t);
    }
    for a in 0..3 {
        let axis = Vector3::ith(a, 1.0);
        let mut r = DVector::zeros(ndof);
        for i in 0..natoms {
            let v = axis.cross(&(spatial::position(x, i).coords - center));
            for k in 0..3 {
                r[3 * i + k] = v[k];
            }
        }
        candidates.push(r);
    }

    // Gram-Schmidt
    let mut basis: Vec<DVector<f64>> = Vec::with_capacity(6);
    for mut v in candidates {
        for u in &basis {
            let overlap = v.dot(u);
            v.axpy(-overlap, u, 1.0);
        }
        let norm = v.norm();
        if norm > DEPENDENT_TOL {
            basis.push(v / norm);
        }
    }
    Ok(basis)
}

/// Removes rigid-body translation and rotation components from `mode`.
pub fn orthogonalize_to_zero_eigenvectors(mode: &[f64], x: &[f64]) -> Result<Vec<f64>> {
    check_len("mode", mode, x.len())?;
    let mut v = DVector::from_column_slice(mode);
    for u in zero_eigenvectors(x)? {
        let overlap = v.dot(&u);
        v.axpy(-overlap, &u, 1.0);
    }
    Ok(v.iter().copied().collect())
}

/// Frames `x + amplitude * mode * k / nframes` for `k` in `0..nframes`.
pub fn mode_path(
    x: &[f64],
    mode: &[f64],
    amplitude: f64,
    nframes: usize,
) -> Result<Vec<Vec<f64>>> {
    path(x, mode, nframes, |k| amplitude * k as f64 / nframes as f64)
}

/// One period of `x + amplitude * sin(2 pi k / nframes) * mode` for `k` in `0..nframes`.
///
/// Frame `nframes` would equal frame 0, so the path loops without a repeated frame.
pub fn oscillation_path(
    x: &[f64],
    mode: &[f64],
    amplitude: f64,
    nframes: usize,
) -> Result<Vec<Vec<f64>>> {
    path(x, mode, nframes, |k| {
        amplitude * (k as f64 / nframes as f64 * TAU).sin()
    })
}

fn path(
    x: &[f64],
    mode: &[f64],
    nframes: usize,
    displacement: impl Fn(usize) -> f64,
) -> Result<Vec<Vec<f64>>> {
    check_len("mode", mode, x.len())?;
    let frames = (0..nframes)
        .map(|k| {
            let t = displacement(k);
            x.iter().zip(mode).map(|(xi, mi)| xi + t * mi).collect()
        })
        .collect();
    Ok(frames)
}

/// A configuration along a mode path, labelled with its energy.
#[derive(Debug, Clone, Serialize)]
pub struct PathFrame {
    pub energy: f64,
    pub coords: Vec<f64>,
}

/// Pairs every frame with its energy under `potential`.
pub fn label_frames(
    potential: &dyn BasePotential,
    frames: Vec<Vec<f64>>,
) -> Result<Vec<PathFrame>> {
    frames
        .into_iter()
        .map(|coords| {
            let energy = potential.energy(&coords)?;
            Ok(PathFrame { energy, coords })
        })
        .collect()
}

/// How a selected normal mode is turned into an animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeAnimation {
    pub amplitude: f64,
    pub nframes: usize,
    /// Project rigid-body translations and rotations out of the mode first.
    pub remove_zero_modes: bool,
    /// Sweep one period of `sin` instead of a linear ramp.
    pub oscillate: bool,
}

impl Default for ModeAnimation {
    fn default() -> Self {
        Self {
            amplitude: 1.0,
            nframes: 30,
            remove_zero_modes: true,
            oscillate: false,
        }
    }
}

impl ModeAnimation {
    /// Builds the displaced configurations for `mode` around `x` and their energies.
    pub fn frames(
        &self,
        potential: &dyn BasePotential,
        x: &[f64],
        mode: &[f64],
    ) -> Result<Vec<PathFrame>> {
        let cleaned;
        let mode = if self.remove_zero_modes {
            cleaned = orthogonalize_to_zero_eigenvectors(mode, x)?;
            &cleaned[..]
        } else {
            mode
        };

        let frames = if self.oscillate {
            oscillation_path(x, mode, self.amplitude, self.nframes)?
        } else {
            mode_path(x, mode, self.amplitude, self.nframes)?
        };
        label_frames(potential, frames)
    }
}
