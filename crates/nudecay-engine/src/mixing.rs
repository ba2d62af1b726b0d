//! Mixing angles, CP phases and mass splittings.

use nalgebra::{Complex, DMatrix};

use crate::config::ConfigError;

/// Standard three-flavor θ12 (rad).
pub const THETA_12: f64 = 0.563942;
/// Standard three-flavor θ13 (rad).
pub const THETA_13: f64 = 0.154085;
/// Standard three-flavor θ23 (rad).
pub const THETA_23: f64 = 0.785398;
/// Standard Δm²21 (eV²).
pub const DM2_21: f64 = 7.65e-5;
/// Standard Δm²31 (eV²).
pub const DM2_31: f64 = 2.47e-3;

/// The unitary mixing description of an `n`-state system.
///
/// Angles θᵢⱼ and phases δᵢⱼ are indexed by pairs `i < j`. Squared-mass
/// splittings are relative to the first state: `Δm²ₖ₁` for `k ≥ 1`.
/// Values are not range-checked.
///
/// # Examples
///
/// ```
/// use nudecay_engine::MixingParameters;
///
/// let mut p = MixingParameters::standard(4).unwrap();
/// p.set_mixing_angle(1, 3, 0.1).unwrap();
/// p.set_square_mass_difference(3, 1.0).unwrap();
/// assert_eq!(p.mixing_angle(1, 3).unwrap(), 0.1);
/// assert!(p.set_mixing_angle(3, 1, 0.1).is_err());
///
/// let u = p.mixing_matrix();
/// let identity = &u * u.adjoint();
/// assert!((identity[(2, 2)].re - 1.0).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MixingParameters {
    num_neu: usize,
    theta: DMatrix<f64>,
    delta: DMatrix<f64>,
    dm2: Vec<f64>,
}

impl MixingParameters {
    /// All angles, phases and splittings zero.
    pub fn new(num_neu: usize) -> Result<Self, ConfigError> {
        if !(2..=nudecay_core::MAX_MASS_STATES).contains(&num_neu) {
            return Err(ConfigError::InvalidStateCount { num_neu });
        }
        Ok(Self {
            num_neu,
            theta: DMatrix::zeros(num_neu, num_neu),
            delta: DMatrix::zeros(num_neu, num_neu),
            dm2: vec![0.0; num_neu],
        })
    }

    /// Standard three-flavor values for the first three states; any
    /// further states start unmixed and degenerate with the first.
    pub fn standard(num_neu: usize) -> Result<Self, ConfigError> {
        let mut p = Self::new(num_neu)?;
        p.set_mixing_angle(0, 1, THETA_12)?;
        p.set_square_mass_difference(1, DM2_21)?;
        if num_neu >= 3 {
            p.set_mixing_angle(0, 2, THETA_13)?;
            p.set_mixing_angle(1, 2, THETA_23)?;
            p.set_square_mass_difference(2, DM2_31)?;
        }
        Ok(p)
    }

    /// Number of states.
    pub fn num_neu(&self) -> usize {
        self.num_neu
    }

    fn check_pair(&self, i: usize, j: usize) -> Result<(), ConfigError> {
        if i >= j || j >= self.num_neu {
            return Err(ConfigError::InvalidMixingIndex {
                i,
                j,
                num_neu: self.num_neu,
            });
        }
        Ok(())
    }

    /// Set θᵢⱼ (rad), `i < j`.
    pub fn set_mixing_angle(&mut self, i: usize, j: usize, theta: f64) -> Result<(), ConfigError> {
        self.check_pair(i, j)?;
        self.theta[(i, j)] = theta;
        Ok(())
    }

    /// θᵢⱼ (rad).
    pub fn mixing_angle(&self, i: usize, j: usize) -> Result<f64, ConfigError> {
        self.check_pair(i, j)?;
        Ok(self.theta[(i, j)])
    }

    /// Set δᵢⱼ (rad), `i < j`.
    pub fn set_cp_phase(&mut self, i: usize, j: usize, delta: f64) -> Result<(), ConfigError> {
        self.check_pair(i, j)?;
        self.delta[(i, j)] = delta;
        Ok(())
    }

    /// δᵢⱼ (rad).
    pub fn cp_phase(&self, i: usize, j: usize) -> Result<f64, ConfigError> {
        self.check_pair(i, j)?;
        Ok(self.delta[(i, j)])
    }

    /// Set Δm²ₖ₁ (eV²), `1 <= k < num_neu`.
    pub fn set_square_mass_difference(&mut self, k: usize, dm2: f64) -> Result<(), ConfigError> {
        if k == 0 || k >= self.num_neu {
            return Err(ConfigError::InvalidMixingIndex {
                i: 0,
                j: k,
                num_neu: self.num_neu,
            });
        }
        self.dm2[k] = dm2;
        Ok(())
    }

    /// Δm²ₖ₁ (eV²); zero for `k = 0`.
    pub fn square_mass_difference(&self, k: usize) -> Option<f64> {
        self.dm2.get(k).copied()
    }

    /// All splittings, starting with the zero for state 0.
    pub fn square_mass_differences(&self) -> &[f64] {
        &self.dm2
    }

    /// Vacuum Hamiltonian eigenvalues `Δm²ₖ₁ / 2E` at `energy`.
    pub fn vacuum_frequencies(&self, energy: f64) -> Vec<f64> {
        self.dm2.iter().map(|d| d / (2.0 * energy)).collect()
    }

    /// The mixing matrix `U[flavor][mass]`.
    ///
    /// Product of complex rotations, pairs ordered by the larger index
    /// descending and then the smaller index descending; for three states
    /// this is `R23 · R13 · R12`.
    pub fn mixing_matrix(&self) -> DMatrix<Complex<f64>> {
        let n = self.num_neu;
        let mut u = DMatrix::<Complex<f64>>::identity(n, n);
        for j in (1..n).rev() {
            for i in (0..j).rev() {
                let theta = self.theta[(i, j)];
                if theta == 0.0 {
                    continue;
                }
                u *= rotation(n, i, j, theta, self.delta[(i, j)]);
            }
        }
        u
    }
}

fn rotation(n: usize, i: usize, j: usize, theta: f64, delta: f64) -> DMatrix<Complex<f64>> {
    let (s, c) = theta.sin_cos();
    let mut r = DMatrix::<Complex<f64>>::identity(n, n);
    r[(i, i)] = Complex::new(c, 0.0);
    r[(j, j)] = Complex::new(c, 0.0);
    r[(i, j)] = Complex::from_polar(s, -delta);
    r[(j, i)] = -Complex::from_polar(s, delta);
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_unitary(u: &DMatrix<Complex<f64>>) {
        let p = u * u.adjoint();
        for a in 0..u.nrows() {
            for b in 0..u.ncols() {
                let expected = if a == b { 1.0 } else { 0.0 };
                assert!((p[(a, b)].re - expected).abs() < 1e-12);
                assert!(p[(a, b)].im.abs() < 1e-12);
            }
        }
    }

    #[test]
    fn zero_angles_give_identity() {
        let u = MixingParameters::new(4).unwrap().mixing_matrix();
        assert_eq!(u, DMatrix::identity(4, 4));
    }

    #[test]
    fn standard_is_unitary_with_phases() {
        let mut p = MixingParameters::standard(4).unwrap();
        p.set_cp_phase(0, 2, 1.2).unwrap();
        p.set_mixing_angle(1, 3, 0.3).unwrap();
        p.set_cp_phase(1, 3, -0.4).unwrap();
        assert_unitary(&p.mixing_matrix());
    }

    #[test]
    fn three_flavor_ordering() {
        let p = MixingParameters::standard(3).unwrap();
        let u = p.mixing_matrix();
        // U_e3 = sin θ13 for the R23 R13 R12 ordering
        assert!((u[(0, 2)].re - THETA_13.sin()).abs() < 1e-12);
        // U_e1 = cos θ12 cos θ13
        assert!((u[(0, 0)].re - THETA_12.cos() * THETA_13.cos()).abs() < 1e-12);
    }

    #[test]
    fn single_sterile_angle_mixes_only_its_pair() {
        let mut p = MixingParameters::new(4).unwrap();
        p.set_mixing_angle(1, 3, 0.2).unwrap();
        let u = p.mixing_matrix();
        assert!((u[(1, 3)].re - 0.2f64.sin()).abs() < 1e-15);
        assert!((u[(3, 1)].re + 0.2f64.sin()).abs() < 1e-15);
        assert_eq!(u[(0, 0)], Complex::new(1.0, 0.0));
    }

    #[test]
    fn index_validation() {
        let mut p = MixingParameters::new(3).unwrap();
        assert!(p.set_mixing_angle(1, 1, 0.1).is_err());
        assert!(p.set_cp_phase(0, 3, 0.1).is_err());
        assert!(p.set_square_mass_difference(0, 1.0).is_err());
        assert!(p.set_square_mass_difference(3, 1.0).is_err());
        assert_eq!(p.square_mass_difference(0), Some(0.0));
    }
}
