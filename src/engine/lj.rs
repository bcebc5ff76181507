use log::debug;

use crate::core::domain::{PotentialKind, PotentialParams};
use crate::core::error::{PotentialError, Result};
use crate::engine::interaction::{Cutoff, LjInteraction};
use crate::engine::neighbor_list::NeighborList;
use crate::engine::pairwise::{AllPairs, CutoffPairwise, NeighborListPotential};
use crate::engine::potential::BasePotential;

/// Lennard-Jones summed over all pairs.
pub type Lj = AllPairs<LjInteraction>;

/// Lennard-Jones smoothly truncated at `rcut` (energy and force vanish there).
pub type LjCut = CutoffPairwise<Cutoff<LjInteraction>>;

/// Lennard-Jones over an explicit neighbor list.
pub type LjNeighborList = NeighborListPotential<LjInteraction>;

impl Lj {
    pub fn new(c6: f64, c12: f64) -> Self {
        Self::with_interaction(LjInteraction::new(c6, c12))
    }
}

impl LjCut {
    pub fn new(c6: f64, c12: f64, rcut: f64) -> Result<Self> {
        let interaction = Cutoff::smoothed(LjInteraction::new(c6, c12), rcut)?;
        Self::with_interaction(interaction, rcut)
    }
}

impl LjNeighborList {
    /// `ilist` is the flattened `[i0, j0, i1, j1, ...]` pair sequence.
    pub fn new(ilist: &[usize], c6: f64, c12: f64) -> Result<Self> {
        let neighbors = NeighborList::from_flat(ilist)?;
        Ok(Self::with_interaction(LjInteraction::new(c6, c12), neighbors))
    }
}

impl PotentialParams {
    /// Builds the potential these parameters describe.
    pub fn build(&self) -> Result<Box<dyn BasePotential>> {
        debug!(
            "building {:?} potential: c6={}, c12={}",
            self.kind, self.c6, self.c12
        );
        match self.kind {
            PotentialKind::AllPairs => Ok(Box::new(Lj::new(self.c6, self.c12))),
            PotentialKind::Cutoff => {
                let rcut = self.rcut.ok_or_else(|| missing("rcut", "cutoff"))?;
                Ok(Box::new(LjCut::new(self.c6, self.c12, rcut)?))
            }
            PotentialKind::NeighborList => {
                let ilist = self
                    .neighbor_list
                    .as_deref()
                    .ok_or_else(|| missing("neighbor_list", "neighbor_list"))?;
                Ok(Box::new(LjNeighborList::new(ilist, self.c6, self.c12)?))
            }
        }
    }
}

fn missing(name: &'static str, kind: &str) -> PotentialError {
    PotentialError::InvalidParameter {
        name,
        reason: format!("required for the `{kind}` potential"),
    }
}
