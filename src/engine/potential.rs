use crate::core::domain::DEFAULT_NUMERICAL_STEP;
use crate::core::error::{check_len, natoms_of, Result};
use crate::engine::numerical::NumericalDifferentiator;

/// The interface optimizers and landscape explorers program against.
///
/// Configurations are flat `[x0, y0, z0, x1, ...]` buffers of length `3N`.
/// Gradients have the same layout; Hessians are row-major `(3N)²` buffers.
/// Output buffers are owned by the caller and fully overwritten on success.
/// Size checks run before anything is written, so on error the buffers are
/// left untouched.
///
/// Only `energy` is required: the remaining orders fall back to finite
/// differences, so an energy-only potential still satisfies the whole contract.
pub trait BasePotential: Send + Sync {
    fn energy(&self, x: &[f64]) -> Result<f64>;

    /// Writes `dE/dx` into `grad` and returns the energy.
    fn energy_gradient(&self, x: &[f64], grad: &mut [f64]) -> Result<f64> {
        self.numerical_gradient(x, grad, DEFAULT_NUMERICAL_STEP)?;
        self.energy(x)
    }

    /// Writes the gradient and Hessian and returns the energy.
    fn energy_gradient_hessian(
        &self,
        x: &[f64],
        grad: &mut [f64],
        hess: &mut [f64],
    ) -> Result<f64> {
        natoms_of(x)?;
        check_len("hessian", hess, x.len() * x.len())?;
        let e = self.energy_gradient(x, grad)?;
        self.numerical_hessian(x, hess, DEFAULT_NUMERICAL_STEP)?;
        Ok(e)
    }

    fn hessian(&self, x: &[f64], hess: &mut [f64]) -> Result<()> {
        let mut grad = vec![0.0; x.len()];
        self.energy_gradient_hessian(x, &mut grad, hess)?;
        Ok(())
    }

    /// Central-difference gradient of `energy`.
    fn numerical_gradient(&self, x: &[f64], grad: &mut [f64], step: f64) -> Result<()> {
        NumericalDifferentiator::new(step).gradient(|y| self.energy(y), x, grad)
    }

    /// Central-difference Hessian built from `energy_gradient`.
    fn numerical_hessian(&self, x: &[f64], hess: &mut [f64], step: f64) -> Result<()> {
        NumericalDifferentiator::new(step).hessian(|y, g| self.energy_gradient(y, g), x, hess)
    }

    /// Allocating form of `energy_gradient`.
    fn evaluate_gradient(&self, x: &[f64]) -> Result<(f64, Vec<f64>)> {
        let mut grad = vec![0.0; x.len()];
        let e = self.energy_gradient(x, &mut grad)?;
        Ok((e, grad))
    }

    /// Allocating form of `energy_gradient_hessian`.
    fn evaluate_hessian(&self, x: &[f64]) -> Result<(f64, Vec<f64>, Vec<f64>)> {
        let mut grad = vec![0.0; x.len()];
        let mut hess = vec![0.0; x.len() * x.len()];
        let e = self.energy_gradient_hessian(x, &mut grad, &mut hess)?;
        Ok((e, grad, hess))
    }
}
