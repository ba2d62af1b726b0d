//! Pairwise mean lifetimes between mass eigenstates.

use nalgebra::DMatrix;
use nudecay_core::{DecayError, MAX_MASS_STATES};

/// Lifetime given to transitions that never happen.
///
/// Large but finite, so that `1 / STABLE_LIFETIME` is a legitimate,
/// negligible rate rather than a special case.
pub const STABLE_LIFETIME: f64 = 1.0e60;

/// Rest-frame mean lifetimes (eV⁻¹) for decays `parent -> daughter`.
///
/// Stored as an N×N matrix whose entry `[daughter][parent]` holds the
/// lifetime of that channel; only the strictly upper triangle
/// (`daughter < parent`) is meaningful. Every channel starts stable.
///
/// # Examples
///
/// ```
/// use nudecay_decay::{LifetimeMatrix, STABLE_LIFETIME};
///
/// let mut tau = LifetimeMatrix::stable(4).unwrap();
/// tau.set_lifetime(3, 0, 2.0e8).unwrap();
/// assert_eq!(tau.lifetime(3, 0), 2.0e8);
/// assert_eq!(tau.lifetime(2, 1), STABLE_LIFETIME);
/// assert!(tau.set_lifetime(0, 3, 1.0).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LifetimeMatrix {
    tau: DMatrix<f64>,
}

impl LifetimeMatrix {
    /// An `n`-state matrix with every channel stable.
    pub fn stable(n: usize) -> Result<Self, DecayError> {
        check_dimension(n)?;
        Ok(Self {
            tau: DMatrix::from_element(n, n, STABLE_LIFETIME),
        })
    }

    /// Wrap a full `[daughter][parent]` matrix.
    ///
    /// Entries on and below the diagonal are ignored and reset to the
    /// stable sentinel. Entries above it must be positive.
    pub fn from_matrix(tau: DMatrix<f64>) -> Result<Self, DecayError> {
        if tau.nrows() != tau.ncols() {
            return Err(DecayError::DimensionMismatch {
                expected: tau.nrows(),
                found: tau.ncols(),
            });
        }
        let mut out = Self::stable(tau.nrows())?;
        for parent in 0..tau.ncols() {
            for daughter in 0..parent {
                out.set_lifetime(parent, daughter, tau[(daughter, parent)])?;
            }
        }
        Ok(out)
    }

    /// Set the lifetime of channel `parent -> daughter`.
    pub fn set_lifetime(
        &mut self,
        parent: usize,
        daughter: usize,
        lifetime: f64,
    ) -> Result<(), DecayError> {
        let n = self.dim();
        if parent >= n || daughter >= n {
            return Err(DecayError::DimensionMismatch {
                expected: n,
                found: parent.max(daughter) + 1,
            });
        }
        if parent <= daughter {
            return Err(DecayError::InvalidTransition { parent, daughter });
        }
        if lifetime.is_nan() || lifetime <= 0.0 {
            return Err(DecayError::NonPositiveLifetime {
                daughter,
                parent,
                value: lifetime,
            });
        }
        self.tau[(daughter, parent)] = lifetime;
        Ok(())
    }

    /// Lifetime of channel `parent -> daughter` (stable if never set).
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn lifetime(&self, parent: usize, daughter: usize) -> f64 {
        self.tau[(daughter, parent)]
    }

    /// Number of mass states.
    pub fn dim(&self) -> usize {
        self.tau.nrows()
    }

    /// The underlying `[daughter][parent]` matrix.
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.tau
    }
}

pub(crate) fn check_dimension(n: usize) -> Result<(), DecayError> {
    if !(2..=MAX_MASS_STATES).contains(&n) {
        return Err(DecayError::DimensionMismatch {
            expected: n.clamp(2, MAX_MASS_STATES),
            found: n,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_nonpositive_and_nan() {
        let mut tau = LifetimeMatrix::stable(3).unwrap();
        assert!(matches!(
            tau.set_lifetime(2, 0, 0.0),
            Err(DecayError::NonPositiveLifetime { .. })
        ));
        assert!(tau.set_lifetime(2, 0, f64::NAN).is_err());
        assert!(tau.set_lifetime(2, 0, -3.0).is_err());
    }

    #[test]
    fn rejects_out_of_range_states() {
        let mut tau = LifetimeMatrix::stable(3).unwrap();
        assert_eq!(
            tau.set_lifetime(3, 0, 1.0),
            Err(DecayError::DimensionMismatch {
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn from_matrix_ignores_lower_triangle() {
        let mut m = DMatrix::from_element(3, 3, -1.0);
        m[(0, 2)] = 5.0;
        m[(0, 1)] = 6.0;
        m[(1, 2)] = 7.0;
        let tau = LifetimeMatrix::from_matrix(m).unwrap();
        assert_eq!(tau.lifetime(2, 0), 5.0);
        assert_eq!(tau.lifetime(1, 0), 6.0);
        assert_eq!(tau.lifetime(2, 1), 7.0);
        assert_eq!(tau.as_matrix()[(2, 0)], STABLE_LIFETIME);
    }

    #[test]
    fn dimension_limits() {
        assert!(LifetimeMatrix::stable(1).is_err());
        assert!(LifetimeMatrix::stable(MAX_MASS_STATES + 1).is_err());
        assert!(LifetimeMatrix::stable(MAX_MASS_STATES).is_ok());
    }
}
