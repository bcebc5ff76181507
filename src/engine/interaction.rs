use log::debug;

use crate::core::error::{validate_rcut, Result};

/// A radial pair interaction evaluated from the squared separation `r2`.
///
/// Conventions, with `r = sqrt(r2)` and `E(r)` the pair energy:
/// * `g = -(1/r) dE/dr`, so the gradient on atom `i` of the pair is `-g * (x_i - x_j)`.
/// * `h = d²E/dr²`.
///
/// Implementations are pure functions of `r2`; `r2 <= 0` yields NaN/Inf.
pub trait PairInteraction: Send + Sync {
    fn energy(&self, r2: f64) -> f64;

    /// Returns `(e, g)`.
    fn energy_gradient(&self, r2: f64) -> (f64, f64);

    /// Returns `(e, g, h)`.
    fn energy_gradient_hessian(&self, r2: f64) -> (f64, f64, f64);
}

/// Lennard-Jones in `C6`/`C12` form: `E = C12/r^12 - C6/r^6`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LjInteraction {
    c6: f64,
    c12: f64,
    // Pre-multiplied derivative coefficients.
    c6_6: f64,
    c12_12: f64,
    c6_42: f64,
    c12_156: f64,
}

impl LjInteraction {
    pub fn new(c6: f64, c12: f64) -> Self {
        Self {
            c6,
            c12,
            c6_6: 6.0 * c6,
            c12_12: 12.0 * c12,
            c6_42: 42.0 * c6,
            c12_156: 156.0 * c12,
        }
    }

    /// Coefficients from the usual `epsilon`/`sigma` parametrisation.
    pub fn from_epsilon_sigma(epsilon: f64, sigma: f64) -> Self {
        let s6 = sigma.powi(6);
        Self::new(4.0 * epsilon * s6, 4.0 * epsilon * s6 * s6)
    }

    pub fn c6(&self) -> f64 {
        self.c6
    }

    pub fn c12(&self) -> f64 {
        self.c12
    }

    #[inline(always)]
    fn inverse_powers(r2: f64) -> (f64, f64, f64) {
        let ir2 = 1.0 / r2;
        let ir6 = ir2 * ir2 * ir2;
        let ir12 = ir6 * ir6;
        (ir2, ir6, ir12)
    }
}

impl PairInteraction for LjInteraction {
    #[inline]
    fn energy(&self, r2: f64) -> f64 {
        let (_, ir6, ir12) = Self::inverse_powers(r2);
        -self.c6 * ir6 + self.c12 * ir12
    }

    #[inline]
    fn energy_gradient(&self, r2: f64) -> (f64, f64) {
        let (ir2, ir6, ir12) = Self::inverse_powers(r2);
        let g = (self.c12_12 * ir12 - self.c6_6 * ir6) * ir2;
        (-self.c6 * ir6 + self.c12 * ir12, g)
    }

    #[inline]
    fn energy_gradient_hessian(&self, r2: f64) -> (f64, f64, f64) {
        let (ir2, ir6, ir12) = Self::inverse_powers(r2);
        let g = (self.c12_12 * ir12 - self.c6_6 * ir6) * ir2;
        let h = (self.c12_156 * ir12 - self.c6_42 * ir6) * ir2;
        (-self.c6 * ir6 + self.c12 * ir12, g, h)
    }
}

/// Truncates an inner interaction at `rcut`.
///
/// Below the cutoff the inner terms are corrected by `a0 + a2 * r2`, which
/// shifts `g` by `-2 a2` and `h` by `+2 a2`. Beyond it (`r2 > rcut²`) energy,
/// gradient and Hessian are all zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cutoff<K> {
    inner: K,
    rcut2: f64,
    a0: f64,
    a2: f64,
}

impl<K: PairInteraction> Cutoff<K> {
    /// Constant energy shift so that `E(rcut) = 0`. The force jumps at the cutoff.
    pub fn shifted(inner: K, rcut: f64) -> Result<Self> {
        let rcut2 = validate_rcut(rcut)?;
        let a0 = -inner.energy(rcut2);
        debug!("shifted cutoff: rcut={rcut}, shift={a0:e}");
        Ok(Self {
            inner,
            rcut2,
            a0,
            a2: 0.0,
        })
    }

    /// Quadratic-in-r² correction so that both energy and force vanish at the cutoff.
    /// For LJ this is the Stoddard-Ford truncation.
    pub fn smoothed(inner: K, rcut: f64) -> Result<Self> {
        let rcut2 = validate_rcut(rcut)?;
        let (e_cut, g_cut) = inner.energy_gradient(rcut2);
        let a2 = 0.5 * g_cut;
        let a0 = -e_cut - a2 * rcut2;
        debug!("smoothed cutoff: rcut={rcut}, a0={a0:e}, a2={a2:e}");
        Ok(Self {
            inner,
            rcut2,
            a0,
            a2,
        })
    }

    pub fn inner(&self) -> &K {
        &self.inner
    }

    pub fn rcut2(&self) -> f64 {
        self.rcut2
    }
}

impl<K: PairInteraction> PairInteraction for Cutoff<K> {
    #[inline]
    fn energy(&self, r2: f64) -> f64 {
        if r2 > self.rcut2 {
            return 0.0;
        }
        self.inner.energy(r2) + self.a0 + self.a2 * r2
    }

    #[inline]
    fn energy_gradient(&self, r2: f64) -> (f64, f64) {
        if r2 > self.rcut2 {
            return (0.0, 0.0);
        }
        let (e, g) = self.inner.energy_gradient(r2);
        (e + self.a0 + self.a2 * r2, g - 2.0 * self.a2)
    }

    #[inline]
    fn energy_gradient_hessian(&self, r2: f64) -> (f64, f64, f64) {
        if r2 > self.rcut2 {
            return (0.0, 0.0, 0.0);
        }
        let (e, g, h) = self.inner.energy_gradient_hessian(r2);
        (
            e + self.a0 + self.a2 * r2,
            g - 2.0 * self.a2,
            h + 2.0 * self.a2,
        )
    }
}
