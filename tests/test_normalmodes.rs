use approx::assert_abs_diff_eq;
use lj_landscape::analysis::normalmodes::{
    label_frames, mode_path, normal_modes, orthogonalize_to_zero_eigenvectors, oscillation_path,
    zero_eigenvectors, ModeAnimation,
};
use lj_landscape::{BasePotential, Lj, LjInteraction, PairInteraction, PotentialError};

use crate::common::{random_cluster, C12, C6};

mod common;

/// Dimer along x at the LJ minimum `r^6 = 2 C12 / C6`.
fn equilibrium_dimer() -> (Vec<f64>, f64) {
    let r = (2.0 * C12 / C6).powf(1.0 / 6.0);
    (vec![0.0, 0.0, 0.0, r, 0.0, 0.0], r)
}

#[test]
fn test_dimer_spectrum() {
    let (x, r) = equilibrium_dimer();
    let (_, _, hess) = Lj::new(C6, C12).evaluate_hessian(&x).unwrap();
    let modes = normal_modes(&hess, x.len()).unwrap();
    assert_eq!(modes.len(), 6);

    // Three translations and two rotations are free.
    for mode in &modes[..5] {
        assert_abs_diff_eq!(mode.eigenvalue, 0.0, epsilon = 1e-8);
    }

    // The stretch has eigenvalue 2 d²E/dr² along the bond.
    let (_, _, h) = LjInteraction::new(C6, C12).energy_gradient_hessian(r * r);
    let stretch = &modes[5];
    assert_abs_diff_eq!(stretch.eigenvalue, 2.0 * h, epsilon = 1e-8 * h.abs());
    let s = std::f64::consts::FRAC_1_SQRT_2;
    let sign = stretch.vector[3].signum();
    let expected = [-s, 0.0, 0.0, s, 0.0, 0.0];
    for (v, e) in stretch.vector.iter().zip(expected) {
        assert_abs_diff_eq!(*v, sign * e, epsilon = 1e-8);
    }
}

#[test]
fn test_modes_sorted_and_normalised() {
    let x = random_cluster(5, 8);
    let (_, _, hess) = Lj::new(C6, C12).evaluate_hessian(&x).unwrap();
    let modes = normal_modes(&hess, x.len()).unwrap();

    for pair in modes.windows(2) {
        assert!(pair[0].eigenvalue <= pair[1].eigenvalue);
    }
    for mode in &modes {
        let norm: f64 = mode.vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert_abs_diff_eq!(norm, 1.0, epsilon = 1e-10);
    }
}

#[test]
fn test_translations_are_zero_modes_anywhere() {
    // Translational invariance holds away from minima too.
    let x = random_cluster(6, 4);
    let n = x.len();
    let (_, _, hess) = Lj::new(C6, C12).evaluate_hessian(&x).unwrap();
    let scale = hess.iter().fold(0.0f64, |m, h| m.max(h.abs()));

    for t in zero_eigenvectors(&x).unwrap().iter().take(3) {
        for a in 0..n {
            let ht: f64 = (0..n).map(|b| hess[a * n + b] * t[b]).sum();
            assert_abs_diff_eq!(ht, 0.0, epsilon = 1e-12 * scale);
        }
    }
}

#[test]
fn test_zero_eigenvector_counts() {
    assert_eq!(zero_eigenvectors(&[1.0, 2.0, 3.0]).unwrap().len(), 3);
    let (dimer, _) = equilibrium_dimer();
    assert_eq!(zero_eigenvectors(&dimer).unwrap().len(), 5);

    let x = random_cluster(4, 1);
    let basis = zero_eigenvectors(&x).unwrap();
    assert_eq!(basis.len(), 6);
    for (a, u) in basis.iter().enumerate() {
        for (b, v) in basis.iter().enumerate() {
            let expected = if a == b { 1.0 } else { 0.0 };
            assert_abs_diff_eq!(u.dot(v), expected, epsilon = 1e-10);
        }
    }
}

#[test]
fn test_orthogonalize_removes_rigid_motion() {
    let x = random_cluster(4, 6);
    // Pure translation along y plus an internal displacement of atom 0.
    let mut mode: Vec<f64> = (0..x.len()).map(|k| if k % 3 == 1 { 1.0 } else { 0.0 }).collect();
    mode[0] += 0.5;

    let cleaned = orthogonalize_to_zero_eigenvectors(&mode, &x).unwrap();
    for u in zero_eigenvectors(&x).unwrap() {
        let overlap: f64 = cleaned.iter().zip(u.iter()).map(|(a, b)| a * b).sum();
        assert_abs_diff_eq!(overlap, 0.0, epsilon = 1e-12);
    }
    assert!(cleaned.iter().any(|v| v.abs() > 1e-3));
}

#[test]
fn test_mode_path_frames() {
    let x = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0];
    let mode = vec![-1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
    let frames = mode_path(&x, &mode, 0.5, 4).unwrap();
    assert_eq!(frames.len(), 4);
    assert_eq!(frames[0], x);
    assert_abs_diff_eq!(frames[2][3], 1.0 + 0.5 * 0.5, epsilon = 1e-15);
    assert_abs_diff_eq!(frames[3][0], -0.5 * 0.75, epsilon = 1e-15);
}

#[test]
fn test_oscillation_path_frames() {
    let x = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0];
    let mode = vec![-1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
    let frames = oscillation_path(&x, &mode, 0.2, 8).unwrap();
    assert_eq!(frames.len(), 8);
    assert_eq!(frames[0], x);

    // Quarter period at full amplitude, three quarters at full negative amplitude.
    assert_abs_diff_eq!(frames[2][3], 1.2, epsilon = 1e-15);
    assert_abs_diff_eq!(frames[2][0], -0.2, epsilon = 1e-15);
    assert_abs_diff_eq!(frames[6][3], 0.8, epsilon = 1e-15);
    assert_abs_diff_eq!(frames[4][3], 1.0, epsilon = 1e-15);

    // The last frame leads back into the first rather than repeating it.
    assert!(frames[7][3] < 1.0);
    assert!(oscillation_path(&x, &mode[..3], 0.2, 8).is_err());
}

#[test]
fn test_label_frames_uses_potential_energy() {
    let (x, _) = equilibrium_dimer();
    let pot = Lj::new(C6, C12);
    let mode = vec![-1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
    let frames = mode_path(&x, &mode, 0.3, 5).unwrap();
    let labelled = label_frames(&pot, frames.clone()).unwrap();

    assert_eq!(labelled.len(), 5);
    for (frame, coords) in labelled.iter().zip(&frames) {
        assert_eq!(&frame.coords, coords);
        assert_eq!(frame.energy, pot.energy(coords).unwrap());
    }
    // Stretching away from the minimum only raises the energy.
    for pair in labelled.windows(2) {
        assert!(pair[0].energy < pair[1].energy);
    }
}

#[test]
fn test_mode_animation_defaults() {
    let anim = ModeAnimation::default();
    assert_eq!(anim.amplitude, 1.0);
    assert_eq!(anim.nframes, 30);
    assert!(anim.remove_zero_modes);
    assert!(!anim.oscillate);
}

#[test]
fn test_mode_animation_removes_rigid_motion() {
    let x = random_cluster(4, 3);
    let pot = Lj::new(C6, C12);
    let e0 = pot.energy(&x).unwrap();
    // A pure translation along z.
    let mode: Vec<f64> = (0..x.len()).map(|k| if k % 3 == 2 { 0.5 } else { 0.0 }).collect();

    let anim = ModeAnimation {
        oscillate: true,
        nframes: 12,
        ..Default::default()
    };
    let frames = anim.frames(&pot, &x, &mode).unwrap();
    assert_eq!(frames.len(), 12);
    for frame in &frames {
        for (a, b) in frame.coords.iter().zip(&x) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(frame.energy, e0, epsilon = 1e-10);
    }

    // Without projection the cluster is carried along z, energy unchanged.
    let kept = ModeAnimation {
        remove_zero_modes: false,
        ..anim
    };
    let frames = kept.frames(&pot, &x, &mode).unwrap();
    assert_abs_diff_eq!(frames[3].coords[2], x[2] + 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(frames[3].energy, e0, epsilon = 1e-10);
}

#[test]
fn test_normal_mode_input_checks() {
    assert!(matches!(
        normal_modes(&[0.0; 8], 3),
        Err(PotentialError::SizeMismatch { .. })
    ));
    let mut hess = vec![0.0; 9];
    hess[4] = f64::NAN;
    assert_eq!(
        normal_modes(&hess, 3).err(),
        Some(PotentialError::NonFinite { what: "hessian" })
    );
    assert!(mode_path(&[0.0; 6], &[0.0; 3], 1.0, 2).is_err());
}
