//! Rest-frame decay widths from a lagrangian coupling matrix.
//!
//! For `ν_p -> ν_d + φ` with a massless scalar `φ`, the width is
//! `Γ = g² / (16π) · m_d · k(m_p / m_d)` where `k` is one of two
//! kinematic functions depending on chirality and coupling structure.

use std::f64::consts::PI;

use nalgebra::DMatrix;
use nudecay_core::CouplingType;

use crate::process::{Chirality, ProcessClass};

/// `f(x) = x/2 + 2 + 2 ln x / x − 2/x² − 1/(2x³)`.
pub fn kinematic_f(x: f64) -> f64 {
    x / 2.0 + 2.0 + 2.0 * x.ln() / x - 2.0 / (x * x) - 1.0 / (2.0 * x * x * x)
}

/// `h(x) = x/2 − 2 + 2 ln x / x + 2/x² − 1/(2x³)`.
pub fn kinematic_h(x: f64) -> f64 {
    x / 2.0 - 2.0 + 2.0 * x.ln() / x + 2.0 / (x * x) - 1.0 / (2.0 * x * x * x)
}

/// Kinematic function for a process class.
///
/// Scalar: CPP uses `f`, CVP uses `h`. Pseudoscalar: swapped.
pub fn kinematic(class: ProcessClass, x: f64) -> f64 {
    match (class.coupling, class.chirality) {
        (CouplingType::Scalar, Chirality::Preserving)
        | (CouplingType::Pseudoscalar, Chirality::Violating) => kinematic_f(x),
        (CouplingType::Scalar, Chirality::Violating)
        | (CouplingType::Pseudoscalar, Chirality::Preserving) => kinematic_h(x),
    }
}

/// Rest-frame width of `parent -> daughter` for coupling `g`.
///
/// Zero when the channel is kinematically closed. A massless daughter
/// takes the `x -> ∞` limit `g² m_p / (32π)`.
///
/// # Examples
///
/// ```
/// use nudecay_decay::coupling::rest_frame_width;
/// use nudecay_decay::ProcessClass;
///
/// let class = ProcessClass::ALL[0];
/// let w = rest_frame_width(class, 1.0, 1.0, 0.0);
/// assert!((w - 1.0 / (32.0 * std::f64::consts::PI)).abs() < 1e-15);
/// assert_eq!(rest_frame_width(class, 1.0, 0.1, 0.2), 0.0);
/// ```
pub fn rest_frame_width(class: ProcessClass, g: f64, m_parent: f64, m_daughter: f64) -> f64 {
    if g == 0.0 || m_parent <= m_daughter {
        return 0.0;
    }
    if m_daughter == 0.0 {
        return g * g * m_parent / (32.0 * PI);
    }
    let x = m_parent / m_daughter;
    g * g / (16.0 * PI) * m_daughter * kinematic(class, x)
}

/// Partial-rate matrix `[daughter][parent]` for one class.
///
/// Reads `g[parent][daughter]` for `parent > daughter`.
pub(crate) fn rates_from_couplings(
    g: &DMatrix<f64>,
    masses: &[f64],
    class: ProcessClass,
) -> DMatrix<f64> {
    let n = masses.len();
    DMatrix::from_fn(n, n, |daughter, parent| {
        if daughter < parent {
            rest_frame_width(class, g[(parent, daughter)], masses[parent], masses[daughter])
        } else {
            0.0
        }
    })
}
