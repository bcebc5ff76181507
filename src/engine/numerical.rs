use crate::core::domain::DEFAULT_NUMERICAL_STEP;
use crate::core::error::{check_len, natoms_of, Result};

/// Central finite differences, used to cross-check analytic derivatives.
///
/// The differentiator works on its own copy of the coordinates and only talks
/// to a potential through the closures it is given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericalDifferentiator {
    pub step: f64,
}

impl Default for NumericalDifferentiator {
    fn default() -> Self {
        Self {
            step: DEFAULT_NUMERICAL_STEP,
        }
    }
}

impl NumericalDifferentiator {
    pub fn new(step: f64) -> Self {
        Self { step }
    }

    /// `grad[k] = (E(x + h e_k) - E(x - h e_k)) / 2h`.
    pub fn gradient<F>(&self, mut energy: F, x: &[f64], grad: &mut [f64]) -> Result<()>
    where
        F: FnMut(&[f64]) -> Result<f64>,
    {
        natoms_of(x)?;
        check_len("gradient", grad, x.len())?;

        let h = self.step;
        let mut xnew = x.to_vec();
        for k in 0..x.len() {
            xnew[k] = x[k] - h;
            let eminus = energy(&xnew)?;
            xnew[k] = x[k] + h;
            let eplus = energy(&xnew)?;
            xnew[k] = x[k];
            grad[k] = (eplus - eminus) / (2.0 * h);
        }
        Ok(())
    }

    /// Row `k` of the Hessian is `(g(x + h e_k) - g(x - h e_k)) / 2h`,
    /// stored row-major in `hess` (length `(3N)²`).
    pub fn hessian<G>(&self, mut gradient: G, x: &[f64], hess: &mut [f64]) -> Result<()>
    where
        G: FnMut(&[f64], &mut [f64]) -> Result<f64>,
    {
        natoms_of(x)?;
        let n = x.len();
        check_len("hessian", hess, n * n)?;

        let h = self.step;
        let mut xnew = x.to_vec();
        let mut gplus = vec![0.0; n];
        let mut gminus = vec![0.0; n];
        for k in 0..n {
            xnew[k] = x[k] - h;
            gradient(&xnew, &mut gminus)?;
            xnew[k] = x[k] + h;
            gradient(&xnew, &mut gplus)?;
            xnew[k] = x[k];
            let row = &mut hess[k * n..(k + 1) * n];
            for (hkl, (gp, gm)) in row.iter_mut().zip(gplus.iter().zip(&gminus)) {
                *hkl = (gp - gm) / (2.0 * h);
            }
        }
        Ok(())
    }
}
