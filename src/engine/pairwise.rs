//! Aggregation of pair interactions into whole-system energy, gradient and Hessian.
//!
//! The three potentials differ only in which pairs they visit; the chain rule
//! from `(e, g, h)` at `r2` to per-coordinate contributions lives in `PairSum`
//! and is shared by all of them.

use log::debug;
use nalgebra::{Matrix3, Vector3};

use crate::core::error::{check_len, natoms_of, validate_rcut, PotentialError, Result};
use crate::core::spatial::separation;
use crate::engine::interaction::PairInteraction;
use crate::engine::neighbor_list::NeighborList;
use crate::engine::potential::BasePotential;

/// Row-order enumeration of every pair `i < j`.
fn all_pairs(natoms: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..natoms).flat_map(move |i| ((i + 1)..natoms).map(move |j| (i, j)))
}

/// Validates the output buffers against `x` and returns `N`.
fn check_buffers(x: &[f64], grad: Option<&[f64]>, hess: Option<&[f64]>) -> Result<usize> {
    let natoms = natoms_of(x)?;
    if let Some(grad) = grad {
        check_len("gradient", grad, x.len())?;
    }
    if let Some(hess) = hess {
        check_len("hessian", hess, x.len() * x.len())?;
    }
    Ok(natoms)
}

/// Adds the Hessian contribution of one pair.
///
/// `block` is `d²E/dx_i dx_i` for the pair. The same block lands on the
/// `j, j` diagonal and its negative on both off-diagonal `i, j` blocks.
fn add_pair_hessian(hess: &mut [f64], ndof: usize, i: usize, j: usize, block: &Matrix3<f64>) {
    let (a, b) = (3 * i, 3 * j);
    for k in 0..3 {
        for l in 0..3 {
            let v = block[(k, l)];
            hess[(a + k) * ndof + a + l] += v;
            hess[(b + k) * ndof + b + l] += v;
            hess[(a + k) * ndof + b + l] -= v;
            hess[(b + k) * ndof + a + l] -= v;
        }
    }
}

/// One evaluation pass over a set of pairs.
struct PairSum<'a, K> {
    interaction: &'a K,
    x: &'a [f64],
    /// Pairs beyond this squared radius are skipped without calling the kernel.
    rcut2: Option<f64>,
}

impl<'a, K: PairInteraction> PairSum<'a, K> {
    fn new(interaction: &'a K, x: &'a [f64]) -> Self {
        Self {
            interaction,
            x,
            rcut2: None,
        }
    }

    fn with_cutoff(mut self, rcut2: f64) -> Self {
        self.rcut2 = Some(rcut2);
        self
    }

    #[inline]
    fn pair(&self, i: usize, j: usize) -> Option<(Vector3<f64>, f64)> {
        let (dr, r2) = separation(self.x, i, j);
        match self.rcut2 {
            Some(rc2) if r2 > rc2 => None,
            _ => Some((dr, r2)),
        }
    }

    fn energy(&self, pairs: impl Iterator<Item = (usize, usize)>) -> f64 {
        let mut e = 0.0;
        for (i, j) in pairs {
            if let Some((_, r2)) = self.pair(i, j) {
                e += self.interaction.energy(r2);
            }
        }
        e
    }

    fn energy_gradient(
        &self,
        pairs: impl Iterator<Item = (usize, usize)>,
        grad: &mut [f64],
    ) -> f64 {
        grad.fill(0.0);
        let mut e = 0.0;
        for (i, j) in pairs {
            let Some((dr, r2)) = self.pair(i, j) else {
                continue;
            };
            let (eij, gij) = self.interaction.energy_gradient(r2);
            e += eij;
            let f = dr * gij;
            for k in 0..3 {
                grad[3 * i + k] -= f[k];
                grad[3 * j + k] += f[k];
            }
        }
        e
    }

    fn energy_gradient_hessian(
        &self,
        pairs: impl Iterator<Item = (usize, usize)>,
        grad: &mut [f64],
        hess: &mut [f64],
    ) -> f64 {
        let ndof = self.x.len();
        grad.fill(0.0);
        hess.fill(0.0);
        let mut e = 0.0;
        for (i, j) in pairs {
            let Some((dr, r2)) = self.pair(i, j) else {
                continue;
            };
            let (eij, gij, hij) = self.interaction.energy_gradient_hessian(r2);
            e += eij;
            let f = dr * gij;
            for k in 0..3 {
                grad[3 * i + k] -= f[k];
                grad[3 * j + k] += f[k];
            }
            // d²E/dx_i² = (h + g) dr drᵀ / r2 - g I
            let block = dr * dr.transpose() * ((hij + gij) / r2) - Matrix3::identity() * gij;
            add_pair_hessian(hess, ndof, i, j, &block);
        }
        e
    }
}

// --- All pairs ---

/// Sums a pair interaction over every pair of atoms.
#[derive(Debug, Clone)]
pub struct AllPairs<K> {
    interaction: K,
}

impl<K: PairInteraction> AllPairs<K> {
    pub fn with_interaction(interaction: K) -> Self {
        Self { interaction }
    }

    pub fn interaction(&self) -> &K {
        &self.interaction
    }
}

impl<K: PairInteraction> BasePotential for AllPairs<K> {
    fn energy(&self, x: &[f64]) -> Result<f64> {
        let natoms = check_buffers(x, None, None)?;
        Ok(PairSum::new(&self.interaction, x).energy(all_pairs(natoms)))
    }

    fn energy_gradient(&self, x: &[f64], grad: &mut [f64]) -> Result<f64> {
        let natoms = check_buffers(x, Some(&*grad), None)?;
        Ok(PairSum::new(&self.interaction, x).energy_gradient(all_pairs(natoms), grad))
    }

    fn energy_gradient_hessian(
        &self,
        x: &[f64],
        grad: &mut [f64],
        hess: &mut [f64],
    ) -> Result<f64> {
        let natoms = check_buffers(x, Some(&*grad), Some(&*hess))?;
        Ok(PairSum::new(&self.interaction, x).energy_gradient_hessian(
            all_pairs(natoms),
            grad,
            hess,
        ))
    }
}

// --- All pairs within a cutoff ---

/// Like `AllPairs`, but pairs further apart than `rcut` are skipped.
///
/// The skip is purely an optimisation over what a truncated interaction would
/// return anyway; with a cutoff larger than every pair distance the result is
/// bit-identical to `AllPairs` with the same interaction.
#[derive(Debug, Clone)]
pub struct CutoffPairwise<K> {
    interaction: K,
    rcut2: f64,
}

impl<K: PairInteraction> CutoffPairwise<K> {
    pub fn with_interaction(interaction: K, rcut: f64) -> Result<Self> {
        let rcut2 = validate_rcut(rcut)?;
        debug!("pairwise potential with rcut={rcut}");
        Ok(Self { interaction, rcut2 })
    }

    pub fn interaction(&self) -> &K {
        &self.interaction
    }

    pub fn rcut(&self) -> f64 {
        self.rcut2.sqrt()
    }
}

impl<K: PairInteraction> BasePotential for CutoffPairwise<K> {
    fn energy(&self, x: &[f64]) -> Result<f64> {
        let natoms = check_buffers(x, None, None)?;
        Ok(PairSum::new(&self.interaction, x)
            .with_cutoff(self.rcut2)
            .energy(all_pairs(natoms)))
    }

    fn energy_gradient(&self, x: &[f64], grad: &mut [f64]) -> Result<f64> {
        let natoms = check_buffers(x, Some(&*grad), None)?;
        Ok(PairSum::new(&self.interaction, x)
            .with_cutoff(self.rcut2)
            .energy_gradient(all_pairs(natoms), grad))
    }

    fn energy_gradient_hessian(
        &self,
        x: &[f64],
        grad: &mut [f64],
        hess: &mut [f64],
    ) -> Result<f64> {
        let natoms = check_buffers(x, Some(&*grad), Some(&*hess))?;
        Ok(PairSum::new(&self.interaction, x)
            .with_cutoff(self.rcut2)
            .energy_gradient_hessian(all_pairs(natoms), grad, hess))
    }
}

// --- Explicit neighbor list ---

/// Sums a pair interaction over the pairs of a `NeighborList` only.
///
/// A pair listed twice is counted twice.
#[derive(Debug, Clone)]
pub struct NeighborListPotential<K> {
    interaction: K,
    neighbors: NeighborList,
}

impl<K: PairInteraction> NeighborListPotential<K> {
    pub fn with_interaction(interaction: K, neighbors: NeighborList) -> Self {
        debug!("neighbor-list potential over {} pairs", neighbors.len());
        Self {
            interaction,
            neighbors,
        }
    }

    pub fn interaction(&self) -> &K {
        &self.interaction
    }

    pub fn neighbors(&self) -> &NeighborList {
        &self.neighbors
    }

    fn check(&self, x: &[f64], grad: Option<&[f64]>, hess: Option<&[f64]>) -> Result<()> {
        let natoms = check_buffers(x, grad, hess)?;
        self.neighbors.check_natoms(natoms)
    }
}

impl<K: PairInteraction> BasePotential for NeighborListPotential<K> {
    fn energy(&self, x: &[f64]) -> Result<f64> {
        self.check(x, None, None)?;
        Ok(PairSum::new(&self.interaction, x).energy(self.neighbors.iter()))
    }

    fn energy_gradient(&self, x: &[f64], grad: &mut [f64]) -> Result<f64> {
        self.check(x, Some(&*grad), None)?;
        Ok(PairSum::new(&self.interaction, x).energy_gradient(self.neighbors.iter(), grad))
    }

    fn energy_gradient_hessian(
        &self,
        x: &[f64],
        grad: &mut [f64],
        hess: &mut [f64],
    ) -> Result<f64> {
        self.check(x, Some(&*grad), Some(&*hess))?;
        Ok(PairSum::new(&self.interaction, x).energy_gradient_hessian(
            self.neighbors.iter(),
            grad,
            hess,
        ))
    }
}
