pub mod evaluator;
pub mod interaction;
pub mod lj;
pub mod neighbor_list;
pub mod numerical;
pub mod pairwise;
pub mod potential;
