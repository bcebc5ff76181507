#![allow(dead_code)]

use approx::abs_diff_eq;
use lj_landscape::Configuration;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub const C6: f64 = 1.2;
pub const C12: f64 = 2.3;
pub const RCUT: f64 = 2.5;

/// Two atoms, ~1.44 apart.
pub fn dimer() -> Vec<f64> {
    vec![0.1, 0.2, 0.3, 0.44, 0.55, 1.66]
}

/// `dimer()` plus a third atom inside the cutoff of atom 1 only.
pub fn trimer() -> Vec<f64> {
    let mut x = dimer();
    x.extend_from_slice(&[0.88, 1.1, 3.32]);
    x
}

/// Reproducible random cluster with no pair closer than 0.9.
pub fn random_cluster(natoms: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Configuration::new_random(natoms, 1.6, 0.9, &mut rng)
        .expect("Failed to pack random cluster")
        .into_inner()
}

pub fn assert_all_close(actual: &[f64], expected: &[f64], tol: f64) {
    assert_eq!(actual.len(), expected.len());
    for (k, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            abs_diff_eq!(*a, *e, epsilon = tol),
            "entry {k}: {a} vs {e} (tol {tol})"
        );
    }
}
