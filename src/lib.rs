//! Lennard-Jones pair potentials with analytic gradients and Hessians.
//!
//! * `engine::interaction`: pair kernels as functions of the squared distance.
//! * `engine::pairwise`: all-pairs, cutoff and neighbor-list aggregation.
//! * `engine::potential`: the `BasePotential` contract consumed by optimizers.
//! * `engine::numerical`: finite-difference oracle for checking derivatives.
//! * `analysis::normalmodes`: Hessian diagonalisation and rigid-body projection.

pub mod analysis;
pub mod core;
pub mod engine;

pub use crate::core::domain::{Configuration, PotentialKind, PotentialParams};
pub use crate::core::error::{PotentialError, Result};
pub use crate::engine::interaction::{Cutoff, LjInteraction, PairInteraction};
pub use crate::engine::lj::{Lj, LjCut, LjNeighborList};
pub use crate::engine::neighbor_list::NeighborList;
pub use crate::engine::numerical::NumericalDifferentiator;
pub use crate::engine::pairwise::{AllPairs, CutoffPairwise, NeighborListPotential};
pub use crate::engine::potential::BasePotential;
