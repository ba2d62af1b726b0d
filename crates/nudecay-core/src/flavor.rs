//! Strongly-typed flavor, polarization, basis and coupling tags.
//!
//! The flux tensor and every evaluation query index states through these
//! enums rather than bare integers, so a polarization can never be passed
//! where a flavor is expected.

use std::fmt;

/// A neutrino flavor eigenstate.
///
/// The three active flavors occupy indices 0..3. Additional states are
/// sterile and numbered from zero: `Sterile(0)` is index 3, `Sterile(1)`
/// is index 4, and so on.
///
/// # Examples
///
/// ```
/// use nudecay_core::Flavor;
///
/// assert_eq!(Flavor::Muon.index(), 1);
/// assert_eq!(Flavor::from_index(3), Flavor::Sterile(0));
/// assert!(Flavor::Sterile(0).is_sterile());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flavor {
    /// Electron neutrino.
    Electron,
    /// Muon neutrino.
    Muon,
    /// Tau neutrino.
    Tau,
    /// Sterile state, numbered from zero.
    Sterile(u8),
}

impl Flavor {
    /// Position of this flavor along the flavor axis of a flux tensor.
    pub fn index(self) -> usize {
        match self {
            Self::Electron => 0,
            Self::Muon => 1,
            Self::Tau => 2,
            Self::Sterile(k) => 3 + k as usize,
        }
    }

    /// Inverse of [`index`](Self::index).
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Electron,
            1 => Self::Muon,
            2 => Self::Tau,
            k => Self::Sterile((k - 3) as u8),
        }
    }

    /// Whether this flavor feels no weak interaction.
    pub fn is_sterile(self) -> bool {
        matches!(self, Self::Sterile(_))
    }

    /// All flavors of an `n`-state system in index order.
    pub fn all(n: usize) -> impl Iterator<Item = Flavor> {
        (0..n).map(Self::from_index)
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Electron => write!(f, "e"),
            Self::Muon => write!(f, "mu"),
            Self::Tau => write!(f, "tau"),
            Self::Sterile(k) => write!(f, "s{k}"),
        }
    }
}

/// Neutrino or antineutrino component of the flux.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Polarization {
    /// Left-handed neutrinos.
    Neutrino,
    /// Right-handed antineutrinos.
    Antineutrino,
}

impl Polarization {
    /// Both polarizations in tensor order.
    pub const BOTH: [Polarization; 2] = [Self::Neutrino, Self::Antineutrino];

    /// Position along the polarization axis of a flux tensor.
    pub fn index(self) -> usize {
        match self {
            Self::Neutrino => 0,
            Self::Antineutrino => 1,
        }
    }

    /// The opposite polarization (helicity flip).
    pub fn flipped(self) -> Self {
        match self {
            Self::Neutrino => Self::Antineutrino,
            Self::Antineutrino => Self::Neutrino,
        }
    }
}

impl fmt::Display for Polarization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Neutrino => write!(f, "nu"),
            Self::Antineutrino => write!(f, "nubar"),
        }
    }
}

/// Basis in which an initial flux tensor is expressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Basis {
    /// Third tensor axis indexes flavors (e, mu, tau, sterile...).
    Flavor,
    /// Third tensor axis indexes mass eigenstates (1, 2, 3, 4...).
    Mass,
}

/// Lorentz structure of the neutrino-scalar coupling.
///
/// A simulation uses one or the other, never a mixture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CouplingType {
    /// Scalar coupling.
    #[default]
    Scalar,
    /// Pseudoscalar coupling.
    Pseudoscalar,
}

impl fmt::Display for CouplingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => write!(f, "scalar"),
            Self::Pseudoscalar => write!(f, "pseudoscalar"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flavor_index_round_trips() {
        for i in 0..6 {
            assert_eq!(Flavor::from_index(i).index(), i);
        }
    }

    #[test]
    fn only_extra_states_are_sterile() {
        let sterile: Vec<_> = Flavor::all(5).filter(|f| f.is_sterile()).collect();
        assert_eq!(sterile, vec![Flavor::Sterile(0), Flavor::Sterile(1)]);
    }

    #[test]
    fn polarization_flip_is_involution() {
        for p in Polarization::BOTH {
            assert_eq!(p.flipped().flipped(), p);
            assert_ne!(p.flipped(), p);
        }
    }

    #[test]
    fn display_names() {
        assert_eq!(Flavor::Muon.to_string(), "mu");
        assert_eq!(Flavor::Sterile(1).to_string(), "s1");
        assert_eq!(Polarization::Antineutrino.to_string(), "nubar");
        assert_eq!(CouplingType::Pseudoscalar.to_string(), "pseudoscalar");
    }
}
