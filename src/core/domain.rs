use nalgebra::Point3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::{natoms_of, Result};
use crate::core::spatial;

// --- Constants ---

/// Finite-difference step used by the numerical oracle unless overridden.
pub const DEFAULT_NUMERICAL_STEP: f64 = 1e-6;

/// Reduced-unit Lennard-Jones coefficients (epsilon = sigma = 1).
pub const REDUCED_C6: f64 = 4.0;
pub const REDUCED_C12: f64 = 4.0;

// --- Geometry ---

/// A flat `[x0, y0, z0, x1, y1, z1, ...]` coordinate buffer.
///
/// Potentials take `&[f64]` directly; this wrapper only exists for code that
/// needs to build, validate or (de)serialize configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    coords: Vec<f64>,
}

impl Configuration {
    /// Wraps a coordinate vector, rejecting lengths that are not a multiple of 3.
    pub fn new(coords: Vec<f64>) -> Result<Self> {
        natoms_of(&coords)?;
        Ok(Self { coords })
    }

    pub fn from_points(points: &[Point3<f64>]) -> Self {
        let coords = points.iter().flat_map(|p| [p.x, p.y, p.z]).collect();
        Self { coords }
    }

    pub fn natoms(&self) -> usize {
        self.coords.len() / 3
    }

    pub fn position(&self, i: usize) -> Point3<f64> {
        spatial::position(&self.coords, i)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.coords
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.coords
    }

    /// Tries to generate a random configuration with no pair closer than `min_distance`.
    ///
    /// Atoms are placed one at a time inside a cube of half-width `box_size`
    /// (random sequential adsorption). Returns `None` when an atom cannot be
    /// placed after 100 attempts.
    pub fn new_random<R: Rng + ?Sized>(
        natoms: usize,
        box_size: f64,
        min_distance: f64,
        rng: &mut R,
    ) -> Option<Self> {
        if box_size.is_nan() || box_size <= 0.0 {
            return None;
        }
        let limit_sq = min_distance * min_distance;
        let mut points: Vec<Point3<f64>> = Vec::with_capacity(natoms);

        for _ in 0..natoms {
            let mut placed = false;

            for _ in 0..100 {
                let pos = Point3::new(
                    rng.gen_range(-box_size..box_size),
                    rng.gen_range(-box_size..box_size),
                    rng.gen_range(-box_size..box_size),
                );

                let clash = points
                    .iter()
                    .any(|existing| nalgebra::distance_squared(&pos, existing) < limit_sq);

                if !clash {
                    points.push(pos);
                    placed = true;
                    break;
                }
            }
            if !placed {
                return None; // Failed to pack
            }
        }

        let mut c = Self::from_points(&points);
        c.center();
        Some(c)
    }

    /// Moves the center of geometry to the origin.
    pub fn center(&mut self) {
        spatial::center(&mut self.coords);
    }
}

impl AsRef<[f64]> for Configuration {
    fn as_ref(&self) -> &[f64] {
        &self.coords
    }
}

// --- Configuration Types ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PotentialKind {
    /// Plain LJ summed over every pair.
    AllPairs,
    /// Smoothly truncated LJ; requires `rcut`.
    Cutoff,
    /// Plain LJ over an explicit neighbor list; requires `neighbor_list`.
    NeighborList,
}

/// Everything needed to build a potential. See `PotentialParams::build`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PotentialParams {
    pub kind: PotentialKind,
    pub c6: f64,
    pub c12: f64,
    pub rcut: Option<f64>,
    /// Flattened `[i0, j0, i1, j1, ...]`.
    pub neighbor_list: Option<Vec<usize>>,
}

impl Default for PotentialParams {
    fn default() -> Self {
        Self {
            kind: PotentialKind::AllPairs,
            c6: REDUCED_C6,
            c12: REDUCED_C12,
            rcut: None,
            neighbor_list: None,
        }
    }
}
