//! Decay generator matrices.
//!
//! One routine builds the generator for every process class: the four
//! classes differ only in the lifetimes (or widths) fed in.

use nalgebra::DMatrix;
use nudecay_core::DecayError;

use crate::lifetime::LifetimeMatrix;

/// Decay generator for one process class.
///
/// Entry `[daughter][parent]` (daughter < parent) is the rest-frame
/// partial rate of `parent -> daughter`. Diagonal entry `[parent][parent]`
/// is the total outgoing rate of `parent` weighted by its mass, so that
/// dividing by the neutrino energy gives the lab-frame width. Everything
/// else is zero.
#[derive(Clone, Debug, PartialEq)]
pub struct RateMatrix {
    d: DMatrix<f64>,
}

impl RateMatrix {
    /// An all-zero (stable) generator.
    pub fn zeros(n: usize) -> Self {
        Self {
            d: DMatrix::zeros(n, n),
        }
    }

    /// Number of mass states.
    pub fn dim(&self) -> usize {
        self.d.nrows()
    }

    /// Rest-frame partial rate of `parent -> daughter`, or zero when
    /// `daughter >= parent`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn partial_rate(&self, parent: usize, daughter: usize) -> f64 {
        if daughter < parent {
            self.d[(daughter, parent)]
        } else {
            0.0
        }
    }

    /// Mass-weighted total outgoing rate of `state`.
    pub fn total_rate(&self, state: usize) -> f64 {
        self.d[(state, state)]
    }

    /// Lab-frame decay width of `state` at neutrino energy `energy`.
    pub fn lab_width(&self, state: usize, energy: f64) -> f64 {
        self.d[(state, state)] / energy
    }

    /// Largest absolute entry.
    pub fn max_abs(&self) -> f64 {
        self.d.amax()
    }

    /// The underlying matrix.
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.d
    }
}

/// Build the decay generator from lifetimes and masses.
///
/// For each parent column `c`, every `r < c` gets `D[r][c] = 1/τ[r][c]`
/// and the diagonal accumulates `D[c][c] = Σ_r (1/τ[r][c]) · mass[c]`.
/// Stable channels carry [`STABLE_LIFETIME`](crate::STABLE_LIFETIME) and
/// contribute a negligible rate.
///
/// # Examples
///
/// ```
/// use nudecay_decay::{build_rate_matrix, LifetimeMatrix};
///
/// let mut tau = LifetimeMatrix::stable(3).unwrap();
/// tau.set_lifetime(2, 1, 4.0).unwrap();
/// let d = build_rate_matrix(&tau, &[0.0, 0.5, 2.0]).unwrap();
/// assert_eq!(d.partial_rate(2, 1), 0.25);
/// assert_eq!(d.total_rate(2), 0.25 * 2.0);
/// ```
pub fn build_rate_matrix(
    lifetimes: &LifetimeMatrix,
    masses: &[f64],
) -> Result<RateMatrix, DecayError> {
    let n = lifetimes.dim();
    if masses.len() != n {
        return Err(DecayError::DimensionMismatch {
            expected: n,
            found: masses.len(),
        });
    }
    let tau = lifetimes.as_matrix();
    let rates = DMatrix::from_fn(n, n, |r, c| if r < c { 1.0 / tau[(r, c)] } else { 0.0 });
    Ok(assemble_from_rates(&rates, masses))
}

/// Assemble a generator from rest-frame partial rates `[daughter][parent]`.
///
/// Shared by the lifetime path and the coupling path. Only the strictly
/// upper triangle of `rates` is read.
pub(crate) fn assemble_from_rates(rates: &DMatrix<f64>, masses: &[f64]) -> RateMatrix {
    let n = masses.len();
    let mut d = DMatrix::zeros(n, n);
    for c in 0..n {
        let mut colrate = 0.0;
        for r in 0..c {
            let rate = rates[(r, c)];
            colrate += rate * masses[c];
            d[(r, c)] = rate;
        }
        d[(c, c)] = colrate;
    }
    RateMatrix { d }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifetime::STABLE_LIFETIME;
    use proptest::prelude::*;

    const MASSES: [f64; 4] = [0.0, 0.00875, 0.049, 1.0];

    #[test]
    fn single_channel_exact() {
        let mut tau = LifetimeMatrix::stable(4).unwrap();
        tau.set_lifetime(3, 1, 3.0e7).unwrap();
        let d = build_rate_matrix(&tau, &MASSES).unwrap();
        let rate = 1.0 / 3.0e7;
        assert_eq!(d.as_matrix()[(1, 3)], rate);
        assert_eq!(d.total_rate(3), rate * MASSES[3]);
        for r in 0..4 {
            for c in 0..4 {
                if (r, c) == (1, 3) || (r, c) == (3, 3) {
                    continue;
                }
                assert!(d.as_matrix()[(r, c)].abs() < 1e-50, "D[{r}][{c}]");
            }
        }
    }

    #[test]
    fn all_stable_is_numerically_zero() {
        let tau = LifetimeMatrix::stable(4).unwrap();
        let d = build_rate_matrix(&tau, &MASSES).unwrap();
        assert!(d.max_abs() <= MASSES.len() as f64 / STABLE_LIFETIME);
        assert!(d.as_matrix().iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn lower_triangle_is_zero() {
        let mut tau = LifetimeMatrix::stable(4).unwrap();
        tau.set_lifetime(2, 0, 1.0).unwrap();
        tau.set_lifetime(3, 2, 2.0).unwrap();
        let d = build_rate_matrix(&tau, &MASSES).unwrap();
        for r in 0..4 {
            for c in 0..r {
                assert_eq!(d.as_matrix()[(r, c)], 0.0);
            }
        }
        assert_eq!(d.partial_rate(0, 2), 0.0);
    }

    #[test]
    fn mass_length_mismatch() {
        let tau = LifetimeMatrix::stable(4).unwrap();
        assert_eq!(
            build_rate_matrix(&tau, &[1.0, 2.0]),
            Err(DecayError::DimensionMismatch {
                expected: 4,
                found: 2
            })
        );
    }

    #[test]
    fn lab_width_scales_inversely_with_energy() {
        let mut tau = LifetimeMatrix::stable(2).unwrap();
        tau.set_lifetime(1, 0, 10.0).unwrap();
        let d = build_rate_matrix(&tau, &[0.0, 2.0]).unwrap();
        assert_eq!(d.lab_width(1, 4.0), 0.2 / 4.0);
        assert_eq!(d.lab_width(1, 8.0), 0.2 / 8.0);
    }

    proptest! {
        #[test]
        fn shorter_lifetime_means_faster_decay(
            parent in 1usize..4,
            daughter_seed in 0usize..3,
            tau in 1.0f64..1.0e12,
            shrink in 0.01f64..0.99,
        ) {
            let daughter = daughter_seed % parent;
            let mut a = LifetimeMatrix::stable(4).unwrap();
            a.set_lifetime(parent, daughter, tau).unwrap();
            let mut b = a.clone();
            b.set_lifetime(parent, daughter, tau * shrink).unwrap();

            let da = build_rate_matrix(&a, &MASSES).unwrap();
            let db = build_rate_matrix(&b, &MASSES).unwrap();
            prop_assert!(db.partial_rate(parent, daughter) > da.partial_rate(parent, daughter));
            prop_assert!(db.total_rate(parent) > da.total_rate(parent));
        }
    }
}
