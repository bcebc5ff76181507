use log::debug;

use crate::core::error::{natoms_of, validate_rcut, PotentialError, Result};
use crate::core::spatial;

/// An explicit, validated list of interacting atom pairs.
///
/// Pairs are kept in the order given. Orientation does not matter (`(i, j)`
/// and `(j, i)` contribute identically) but self-pairs are rejected. Index
/// ranges can only be checked against a configuration, which happens on
/// every evaluation via `check_natoms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborList {
    pairs: Vec<[usize; 2]>,
    /// Largest index in `pairs`, cached so the range check is O(1).
    max_index: Option<usize>,
}

impl NeighborList {
    pub fn new(pairs: Vec<[usize; 2]>) -> Result<Self> {
        if let Some(&[i, _]) = pairs.iter().find(|[i, j]| i == j) {
            return Err(PotentialError::SelfPair { index: i });
        }
        let max_index = pairs.iter().flat_map(|p| p.iter().copied()).max();
        Ok(Self { pairs, max_index })
    }

    /// Parses a flattened `[i0, j0, i1, j1, ...]` sequence.
    pub fn from_flat(ilist: &[usize]) -> Result<Self> {
        if !ilist.len().is_multiple_of(2) {
            return Err(PotentialError::OddNeighborList { len: ilist.len() });
        }
        let pairs = ilist.chunks_exact(2).map(|p| [p[0], p[1]]).collect();
        Self::new(pairs)
    }

    /// Every unordered pair `i < j` of `natoms` atoms.
    pub fn all_pairs(natoms: usize) -> Self {
        let pairs = (0..natoms)
            .flat_map(|i| ((i + 1)..natoms).map(move |j| [i, j]))
            .collect();
        let max_index = natoms.checked_sub(1).filter(|_| natoms > 1);
        Self { pairs, max_index }
    }

    /// Pairs of `x` currently no further apart than `rcut`.
    ///
    /// `rcut` must be positive and finite.
    pub fn within_cutoff(x: &[f64], rcut: f64) -> Result<Self> {
        let natoms = natoms_of(x)?;
        let rcut2 = validate_rcut(rcut)?;
        let mut pairs = Vec::new();
        for i in 0..natoms {
            for j in (i + 1)..natoms {
                let (_, r2) = spatial::separation(x, i, j);
                if r2 <= rcut2 {
                    pairs.push([i, j]);
                }
            }
        }
        debug!(
            "neighbor list: {} of {} pairs within rcut={rcut}",
            pairs.len(),
            natoms * natoms.saturating_sub(1) / 2
        );
        Self::new(pairs)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[[usize; 2]] {
        &self.pairs
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs.iter().map(|&[i, j]| (i, j))
    }

    pub fn to_flat(&self) -> Vec<usize> {
        self.pairs.iter().flatten().copied().collect()
    }

    /// Fails if any index is not an atom of an `natoms`-atom configuration.
    pub fn check_natoms(&self, natoms: usize) -> Result<()> {
        match self.max_index {
            Some(index) if index >= natoms => {
                Err(PotentialError::NeighborIndexOutOfRange { index, natoms })
            }
            _ => Ok(()),
        }
    }
}
