use approx::assert_abs_diff_eq;
use lj_landscape::{Cutoff, LjInteraction, PairInteraction};

use crate::common::{C12, C6, RCUT};

mod common;

#[test]
fn test_lj_energy_fixture() {
    let lj = LjInteraction::new(C6, C12);
    assert_abs_diff_eq!(lj.energy(1.1), 0.39671227804179443, epsilon = 1e-10);
}

#[test]
fn test_lj_energy_gradient_fixture() {
    let lj = LjInteraction::new(C6, C12);
    let (e, g) = lj.energy_gradient(1.1);
    assert_abs_diff_eq!(e, 0.39671227804179443, epsilon = 1e-10);
    assert_abs_diff_eq!(g, 9.2454671845389917, epsilon = 1e-10);
}

#[test]
fn test_lj_hessian_fixture() {
    let lj = LjInteraction::new(C6, C12);
    let (e, g, h) = lj.energy_gradient_hessian(1.1);
    assert_abs_diff_eq!(e, 0.39671227804179443, epsilon = 1e-10);
    assert_abs_diff_eq!(g, 9.2454671845389917, epsilon = 1e-10);
    assert_abs_diff_eq!(h, 149.6972546707778, epsilon = 1e-10);
}

#[test]
fn test_orders_agree_on_energy() {
    let lj = LjInteraction::new(C6, C12);
    let cut = Cutoff::smoothed(lj, RCUT).unwrap();
    for &r2 in &[0.64, 0.9, 1.1, 1.5, 2.0, 4.0, 6.0, 7.0] {
        let e = lj.energy(r2);
        assert_eq!(lj.energy_gradient(r2).0, e);
        assert_eq!(lj.energy_gradient_hessian(r2).0, e);

        let ec = cut.energy(r2);
        assert_eq!(cut.energy_gradient(r2).0, ec);
        assert_eq!(cut.energy_gradient_hessian(r2).0, ec);
    }
}

#[test]
fn test_gradient_and_hessian_conventions() {
    // g = -(1/r) dE/dr and h = d²E/dr², checked by differencing E(r) in r.
    let lj = LjInteraction::new(C6, C12);
    let e_of_r = |r: f64| lj.energy(r * r);
    let dr = 1e-5;

    for &r in &[0.9, 1.05, 1.3, 1.8] {
        let (_, g, h) = lj.energy_gradient_hessian(r * r);
        let de = (e_of_r(r + dr) - e_of_r(r - dr)) / (2.0 * dr);
        let d2e = (e_of_r(r + dr) - 2.0 * e_of_r(r) + e_of_r(r - dr)) / (dr * dr);
        assert_abs_diff_eq!(g, -de / r, epsilon = 1e-5 * g.abs().max(1.0));
        assert_abs_diff_eq!(h, d2e, epsilon = 1e-3 * h.abs().max(1.0));
    }
}

#[test]
fn test_shifted_cutoff() {
    let lj = LjInteraction::new(C6, C12);
    let cut = Cutoff::shifted(lj, RCUT).unwrap();
    let rc2 = RCUT * RCUT;
    let shift = lj.energy(rc2);

    // Continuous at the cutoff, zero beyond it.
    assert_eq!(cut.energy(rc2), 0.0);
    assert_eq!(cut.energy(rc2 + 1e-9), 0.0);
    assert_eq!(cut.energy_gradient_hessian(rc2 * 1.01), (0.0, 0.0, 0.0));

    // Inside: energy shifted by a constant, derivatives untouched.
    let r2 = 2.0877;
    assert_abs_diff_eq!(cut.energy(r2), lj.energy(r2) - shift, epsilon = 1e-15);
    assert_eq!(cut.energy_gradient(r2).1, lj.energy_gradient(r2).1);
    assert_eq!(cut.energy_gradient_hessian(r2).2, lj.energy_gradient_hessian(r2).2);
}

#[test]
fn test_smoothed_cutoff_vanishes_with_force() {
    let lj = LjInteraction::new(C6, C12);
    let cut = Cutoff::smoothed(lj, RCUT).unwrap();
    let rc2 = RCUT * RCUT;

    let (e, g) = cut.energy_gradient(rc2);
    assert_abs_diff_eq!(e, 0.0, epsilon = 1e-15);
    assert_abs_diff_eq!(g, 0.0, epsilon = 1e-15);
    assert_eq!(cut.energy_gradient(rc2 * 1.0001), (0.0, 0.0));
}

#[test]
fn test_smoothed_cutoff_is_stoddard_ford() {
    // E = C12/r^12 - C6/r^6 + A2 r² + A0 with the closed-form A0, A2.
    let cut = Cutoff::smoothed(LjInteraction::new(C6, C12), RCUT).unwrap();
    let rc6 = RCUT.powi(6);
    let rc12 = rc6 * rc6;
    let a2 = (6.0 * C12 / rc12 - 3.0 * C6 / rc6) / (RCUT * RCUT);
    let a0 = -7.0 * C12 / rc12 + 4.0 * C6 / rc6;

    for r2 in [0.8_f64, 1.5, 3.0, 6.0] {
        let expected = C12 / r2.powi(6) - C6 / r2.powi(3) + a2 * r2 + a0;
        assert_abs_diff_eq!(cut.energy(r2), expected, epsilon = 1e-12);
    }
}

#[test]
fn test_coincident_particles_are_not_trapped() {
    let lj = LjInteraction::new(C6, C12);
    let (e, g, h) = lj.energy_gradient_hessian(0.0);
    assert!(!e.is_finite());
    assert!(!g.is_finite());
    assert!(!h.is_finite());
}
