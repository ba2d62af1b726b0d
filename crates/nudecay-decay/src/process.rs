//! Decay process classes.

use std::fmt;

use nudecay_core::CouplingType;

/// Whether a decay keeps or flips the neutrino chirality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Chirality {
    /// Chirality-preserving (CPP): the daughter keeps the parent's helicity.
    Preserving,
    /// Chirality-violating (CVP): the daughter has opposite helicity.
    Violating,
}

/// One of the four decay channel classes.
///
/// Each class has its own generator matrix; the engine treats them
/// separately because their daughters are distributed differently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProcessClass {
    /// Chirality behaviour.
    pub chirality: Chirality,
    /// Lorentz structure of the coupling.
    pub coupling: CouplingType,
}

impl ProcessClass {
    /// All four classes: CPP-scalar, CVP-scalar, CPP-pseudoscalar,
    /// CVP-pseudoscalar.
    pub const ALL: [ProcessClass; 4] = [
        Self::new(Chirality::Preserving, CouplingType::Scalar),
        Self::new(Chirality::Violating, CouplingType::Scalar),
        Self::new(Chirality::Preserving, CouplingType::Pseudoscalar),
        Self::new(Chirality::Violating, CouplingType::Pseudoscalar),
    ];

    /// Build a class.
    pub const fn new(chirality: Chirality, coupling: CouplingType) -> Self {
        Self {
            chirality,
            coupling,
        }
    }
}

impl fmt::Display for ProcessClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self.chirality {
            Chirality::Preserving => "cpp",
            Chirality::Violating => "cvp",
        };
        write!(f, "{c}-{}", self.coupling)
    }
}
