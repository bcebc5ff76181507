use thiserror::Error;

/// Errors raised by potential construction and evaluation.
///
/// Evaluation itself is total for valid geometry: coincident particles are not
/// reported here, they surface as NaN/Inf in the returned numbers. Everything
/// in this enum is a precondition violation caught before any buffer is written.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PotentialError {
    /// The coordinate buffer length is not a multiple of 3.
    #[error("configuration length {len} is not a multiple of 3")]
    InvalidConfiguration { len: usize },

    /// An output (or input) buffer does not have the length the configuration requires.
    #[error("{buffer} buffer has length {found}, expected {expected}")]
    SizeMismatch {
        buffer: &'static str,
        expected: usize,
        found: usize,
    },

    /// A neighbor list names an atom that does not exist in the configuration.
    #[error("neighbor list index {index} out of range for {natoms} atoms")]
    NeighborIndexOutOfRange { index: usize, natoms: usize },

    /// A neighbor list pairs an atom with itself.
    #[error("neighbor list contains self-pair ({index}, {index})")]
    SelfPair { index: usize },

    /// A flattened neighbor list must hold an even number of indices.
    #[error("flattened neighbor list has odd length {len}")]
    OddNeighborList { len: usize },

    /// A constructor argument outside its valid domain (e.g. a non-positive cutoff).
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A matrix handed to an analysis routine contains NaN or Inf.
    #[error("non-finite value in {what}")]
    NonFinite { what: &'static str },
}

pub type Result<T> = std::result::Result<T, PotentialError>;

/// Number of atoms in a flat coordinate buffer.
pub fn natoms_of(x: &[f64]) -> Result<usize> {
    if !x.len().is_multiple_of(3) {
        return Err(PotentialError::InvalidConfiguration { len: x.len() });
    }
    Ok(x.len() / 3)
}

/// Fails fast when `buf` is not exactly `expected` long.
pub fn check_len(buffer: &'static str, buf: &[f64], expected: usize) -> Result<()> {
    if buf.len() != expected {
        return Err(PotentialError::SizeMismatch {
            buffer,
            expected,
            found: buf.len(),
        });
    }
    Ok(())
}

/// Checks a cutoff radius and returns its square.
pub(crate) fn validate_rcut(rcut: f64) -> Result<f64> {
    if !(rcut.is_finite() && rcut > 0.0) {
        return Err(PotentialError::InvalidParameter {
            name: "rcut",
            reason: format!("cutoff radius must be positive and finite, got {rcut}"),
        });
    }
    Ok(rcut * rcut)
}
