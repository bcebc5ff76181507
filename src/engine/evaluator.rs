use serde::Serialize;

use crate::core::error::Result;
use crate::engine::potential::BasePotential;

/// Energy and gradient summary of one configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub energy: f64,
    /// Root-mean-square of the gradient components.
    pub rms_gradient: f64,
    pub gradient: Vec<f64>,
}

/// Evaluates energy and gradient and summarises the gradient.
pub fn evaluate(potential: &dyn BasePotential, x: &[f64]) -> Result<Evaluation> {
    let (energy, gradient) = potential.evaluate_gradient(x)?;
    Ok(Evaluation {
        energy,
        rms_gradient: rms(&gradient),
        gradient,
    })
}

fn rms(v: &[f64]) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    (v.iter().map(|a| a * a).sum::<f64>() / v.len() as f64).sqrt()
}

/// Analytic derivatives of a potential compared against finite differences.
#[derive(Debug, Clone, Serialize)]
pub struct DerivativeCheck {
    /// Energies reported by `energy`, `energy_gradient` and `energy_gradient_hessian`.
    pub energies: [f64; 3],
    pub max_gradient_error: f64,
    pub max_hessian_error: f64,
}

impl DerivativeCheck {
    /// Largest pairwise difference between the three reported energies.
    pub fn energy_spread(&self) -> f64 {
        let [a, b, c] = self.energies;
        (a - b).abs().max((a - c).abs()).max((b - c).abs())
    }

    pub fn passes(&self, grad_tol: f64, hess_tol: f64) -> bool {
        self.max_gradient_error <= grad_tol && self.max_hessian_error <= hess_tol
    }
}

/// Runs every order of `potential` at `x` and measures how far the analytic
/// gradient and Hessian are from their central-difference estimates.
pub fn check_derivatives(
    potential: &dyn BasePotential,
    x: &[f64],
    step: f64,
) -> Result<DerivativeCheck> {
    let n = x.len();
    let e0 = potential.energy(x)?;
    let (e1, grad) = potential.evaluate_gradient(x)?;
    let (e2, _, hess) = potential.evaluate_hessian(x)?;

    let mut gnum = vec![0.0; n];
    let mut hnum = vec![0.0; n * n];
    potential.numerical_gradient(x, &mut gnum, step)?;
    potential.numerical_hessian(x, &mut hnum, step)?;

    Ok(DerivativeCheck {
        energies: [e0, e1, e2],
        max_gradient_error: max_abs_diff(&grad, &gnum),
        max_hessian_error: max_abs_diff(&hess, &hnum),
    })
}

/// NaN-propagating maximum of `|a - b|`.
fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, |m, d| if d > m || d.is_nan() { d } else { m })
}
