//! Error types shared across the nudecay workspace.
//!
//! Organized by the phase in which they surface: configuration of the
//! energy grid and decay model (before evolution), numerical failure
//! (during evolution), and evaluation queries (after evolution). None of
//! them is recoverable by retrying; each is surfaced to the caller.

use std::error::Error;
use std::fmt;

use crate::flavor::{CouplingType, Flavor};

/// Errors from constructing an [`EnergyGrid`](crate::EnergyGrid).
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// Fewer than two nodes were supplied.
    TooFewNodes {
        /// Number of nodes supplied.
        count: usize,
    },
    /// A node is NaN, infinite, zero or negative.
    InvalidNode {
        /// Position of the offending node.
        index: usize,
        /// The offending value.
        value: f64,
    },
    /// Nodes are not strictly increasing.
    NotIncreasing {
        /// Position of the first node that does not exceed its predecessor.
        index: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewNodes { count } => {
                write!(f, "energy grid needs at least 2 nodes, got {count}")
            }
            Self::InvalidNode { index, value } => {
                write!(f, "energy node {index} must be finite and positive, got {value}")
            }
            Self::NotIncreasing { index } => {
                write!(f, "energy nodes must be strictly increasing (node {index})")
            }
        }
    }
}

impl Error for GridError {}

/// Errors from building rate matrices and configuring a decay model.
#[derive(Clone, Debug, PartialEq)]
pub enum DecayError {
    /// A matrix or mass vector does not match the number of mass states.
    DimensionMismatch {
        /// Expected number of mass states.
        expected: usize,
        /// Dimension that was supplied.
        found: usize,
    },
    /// A lifetime entry is zero, negative or NaN.
    NonPositiveLifetime {
        /// Daughter (lighter) state index.
        daughter: usize,
        /// Parent (heavier) state index.
        parent: usize,
        /// The offending lifetime.
        value: f64,
    },
    /// A decay transition must go from a higher to a lower index.
    InvalidTransition {
        /// Parent state index.
        parent: usize,
        /// Daughter state index.
        daughter: usize,
    },
    /// A mass is negative, NaN or infinite.
    InvalidMass {
        /// State index.
        index: usize,
        /// The offending mass.
        value: f64,
    },
    /// More than one mass eigenstate is exactly massless.
    MultipleMasslessStates,
    /// Explicit rate matrices and a coupling matrix were both supplied.
    ConflictingConfiguration,
    /// No rate matrices were supplied for the coupling type in use.
    MissingRateMatrices {
        /// Coupling type whose matrices are absent.
        coupling: CouplingType,
    },
    /// Neither rate matrices nor couplings have been supplied.
    NotConfigured,
    /// The model changed (or was never prepared) since derived terms
    /// were last computed.
    TermsNotComputed,
}

impl fmt::Display for DecayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DimensionMismatch { expected, found } => {
                write!(f, "expected {expected} mass states, got {found}")
            }
            Self::NonPositiveLifetime {
                daughter,
                parent,
                value,
            } => write!(
                f,
                "lifetime for {parent} -> {daughter} must be positive, got {value}"
            ),
            Self::InvalidTransition { parent, daughter } => write!(
                f,
                "decay {parent} -> {daughter} invalid: parent index must exceed daughter index"
            ),
            Self::InvalidMass { index, value } => {
                write!(f, "mass of state {index} must be finite and >= 0, got {value}")
            }
            Self::MultipleMasslessStates => {
                write!(f, "at most one mass eigenstate may be massless")
            }
            Self::ConflictingConfiguration => write!(
                f,
                "explicit rate matrices and a coupling matrix cannot both be set"
            ),
            Self::MissingRateMatrices { coupling } => {
                write!(f, "no {coupling} rate matrices were set")
            }
            Self::NotConfigured => write!(f, "decay model has no rates or couplings"),
            Self::TermsNotComputed => write!(
                f,
                "derived decay terms are stale; call compute_derived_terms() first"
            ),
        }
    }
}

impl Error for DecayError {}

/// Numerical failures inside the evolution engine.
#[derive(Clone, Debug, PartialEq)]
pub enum EvolutionError {
    /// The adaptive step shrank below the configured minimum.
    StepSizeUnderflow {
        /// Track position at which the failure occurred.
        position: f64,
        /// Step size that was rejected.
        step: f64,
    },
    /// The step budget ran out before reaching the end of the track.
    MaxStepsExceeded {
        /// Number of steps attempted.
        steps: u64,
        /// Track position reached.
        position: f64,
    },
    /// A NaN or infinity appeared in the state or its derivative.
    NonFinite {
        /// Track position at which the value was detected.
        position: f64,
    },
}

impl fmt::Display for EvolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StepSizeUnderflow { position, step } => {
                write!(f, "step size underflow ({step:e}) at x = {position:e}")
            }
            Self::MaxStepsExceeded { steps, position } => {
                write!(f, "step budget of {steps} exhausted at x = {position:e}")
            }
            Self::NonFinite { position } => {
                write!(f, "non-finite value in state at x = {position:e}")
            }
        }
    }
}

impl Error for EvolutionError {}

/// Errors from evaluating a flux after (or instead of) evolution.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryError {
    /// Evaluation was requested before a successful `evolve()`.
    NotEvolved,
    /// No initial state has been set.
    NoInitialState,
    /// The requested energy lies outside the grid.
    EnergyOutOfRange {
        /// Requested energy.
        energy: f64,
        /// Lowest grid node.
        min: f64,
        /// Highest grid node.
        max: f64,
    },
    /// The requested node index exceeds the grid length.
    NodeOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of nodes.
        len: usize,
    },
    /// The flavor does not exist in a system with this many states.
    FlavorOutOfRange {
        /// Requested flavor.
        flavor: Flavor,
        /// Number of states in the system.
        num_neu: usize,
    },
    /// The mass-state index does not exist in this system.
    StateOutOfRange {
        /// Requested state index.
        state: usize,
        /// Number of states in the system.
        num_neu: usize,
    },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEvolved => write!(f, "state has not been evolved"),
            Self::NoInitialState => write!(f, "no initial state has been set"),
            Self::EnergyOutOfRange { energy, min, max } => {
                write!(f, "energy {energy:e} outside grid range [{min:e}, {max:e}]")
            }
            Self::NodeOutOfRange { index, len } => {
                write!(f, "node {index} out of range (grid has {len} nodes)")
            }
            Self::FlavorOutOfRange { flavor, num_neu } => {
                write!(f, "flavor {flavor} not present in a {num_neu}-state system")
            }
            Self::StateOutOfRange { state, num_neu } => {
                write!(f, "mass state {state} not present in a {num_neu}-state system")
            }
        }
    }
}

impl Error for QueryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let e = DecayError::NonPositiveLifetime {
            daughter: 0,
            parent: 3,
            value: -1.0,
        };
        assert_eq!(e.to_string(), "lifetime for 3 -> 0 must be positive, got -1");

        let q = QueryError::NodeOutOfRange { index: 12, len: 10 };
        assert!(q.to_string().contains("12"));
        assert!(q.to_string().contains("10"));
    }

    #[test]
    fn missing_matrices_names_coupling() {
        let e = DecayError::MissingRateMatrices {
            coupling: CouplingType::Pseudoscalar,
        };
        assert_eq!(e.to_string(), "no pseudoscalar rate matrices were set");
    }
}
