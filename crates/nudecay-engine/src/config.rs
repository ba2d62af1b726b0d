//! Driver configuration, validation, and error types.
//!
//! [`DriverConfig`] is the immutable input for constructing an
//! [`EvolutionDriver`](crate::EvolutionDriver). It replaces process-wide
//! simulation globals (tolerances, step sizes, physics toggles) with one
//! value checked once by [`validate()`](DriverConfig::validate).

use std::error::Error;
use std::fmt;

use nudecay_body::BodyError;
use nudecay_core::{CouplingType, DecayError, EnergyGrid, EvolutionError, MAX_MASS_STATES};

// ── IntegratorScheme ───────────────────────────────────────────────

/// ODE scheme used by the reference engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegratorScheme {
    /// Adaptive Runge-Kutta-Fehlberg 4(5) with error control.
    #[default]
    Rkf45,
    /// Classic fixed-step fourth-order Runge-Kutta.
    Rk4,
}

// ── NumericsConfig ─────────────────────────────────────────────────

/// Numerical tolerances and step control.
///
/// Step sizes are in natural length units (eV⁻¹). `None` lets the engine
/// derive a step from the track length.
#[derive(Clone, Debug, PartialEq)]
pub struct NumericsConfig {
    /// Relative error tolerance per step. Default: 1e-9.
    pub rel_error: f64,
    /// Absolute error tolerance per step. Default: 1e-9.
    pub abs_error: f64,
    /// First trial step (RKF45) or the fixed step (RK4). Default: track / 100.
    pub initial_step: Option<f64>,
    /// Largest step the adaptive scheme may take. Default: the track length.
    pub max_step: Option<f64>,
    /// Steps at or below this size are an underflow. Default: 0.
    pub min_step: f64,
    /// Step budget (accepted plus rejected). Default: 1 000 000.
    pub max_steps: u64,
    /// Integration scheme. Default: [`IntegratorScheme::Rkf45`].
    pub scheme: IntegratorScheme,
}

impl Default for NumericsConfig {
    fn default() -> Self {
        Self {
            rel_error: 1.0e-9,
            abs_error: 1.0e-9,
            initial_step: None,
            max_step: None,
            min_step: 0.0,
            max_steps: 1_000_000,
            scheme: IntegratorScheme::Rkf45,
        }
    }
}

impl NumericsConfig {
    /// Check tolerances and step bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, v) in [("rel_error", self.rel_error), ("abs_error", self.abs_error)] {
            if !v.is_finite() || v < 0.0 {
                return Err(ConfigError::InvalidNumerics {
                    reason: format!("{name} must be finite and >= 0, got {v}"),
                });
            }
        }
        if self.rel_error == 0.0 && self.abs_error == 0.0 {
            return Err(ConfigError::InvalidNumerics {
                reason: "rel_error and abs_error cannot both be zero".into(),
            });
        }
        for (name, v) in [("initial_step", self.initial_step), ("max_step", self.max_step)] {
            if let Some(v) = v {
                if !v.is_finite() || v <= 0.0 {
                    return Err(ConfigError::InvalidNumerics {
                        reason: format!("{name} must be finite and > 0, got {v}"),
                    });
                }
            }
        }
        if !self.min_step.is_finite() || self.min_step < 0.0 {
            return Err(ConfigError::InvalidNumerics {
                reason: format!("min_step must be finite and >= 0, got {}", self.min_step),
            });
        }
        if let Some(max) = self.max_step {
            if max <= self.min_step {
                return Err(ConfigError::InvalidNumerics {
                    reason: format!(
                        "max_step ({max:e}) must exceed min_step ({:e})",
                        self.min_step
                    ),
                });
            }
        }
        if self.max_steps == 0 {
            return Err(ConfigError::InvalidNumerics {
                reason: "max_steps must be at least 1".into(),
            });
        }
        Ok(())
    }
}

// ── PhysicsFlags ───────────────────────────────────────────────────

/// Physics toggles fixed at driver construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhysicsFlags {
    /// Absorption on nucleons for active flavors. Default: off.
    pub incoherent_interactions: bool,
    /// Repopulate lighter states from decay products. Default: off.
    pub decay_regeneration: bool,
    /// Majorana neutrinos (chirality-violating products flip
    /// polarization instead of becoming invisible). Default: off.
    pub majorana: bool,
    /// Coupling interpretation of the decay model. Default: scalar.
    pub coupling: CouplingType,
}

// ── DriverConfig ───────────────────────────────────────────────────

/// Complete, immutable configuration of one evolution driver.
#[derive(Clone, Debug, PartialEq)]
pub struct DriverConfig {
    /// Energy nodes (eV).
    pub grid: EnergyGrid,
    /// Number of mass eigenstates (and flavors).
    pub num_neu: usize,
    /// Physics toggles.
    pub flags: PhysicsFlags,
    /// Tolerances and step control.
    pub numerics: NumericsConfig,
}

impl DriverConfig {
    /// A config with default flags and numerics.
    pub fn new(grid: EnergyGrid, num_neu: usize) -> Self {
        Self {
            grid,
            num_neu,
            flags: PhysicsFlags::default(),
            numerics: NumericsConfig::default(),
        }
    }

    /// Replace the physics flags.
    pub fn with_flags(mut self, flags: PhysicsFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Replace the numerics.
    pub fn with_numerics(mut self, numerics: NumericsConfig) -> Self {
        self.numerics = numerics;
        self
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_MASS_STATES).contains(&self.num_neu) {
            return Err(ConfigError::InvalidStateCount {
                num_neu: self.num_neu,
            });
        }
        self.numerics.validate()
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Configuration failures, all detected before integration starts.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Number of mass states outside `2..=MAX_MASS_STATES`.
    InvalidStateCount {
        /// The configured count.
        num_neu: usize,
    },
    /// A tolerance or step bound is invalid.
    InvalidNumerics {
        /// What is wrong.
        reason: String,
    },
    /// A mixing angle or phase index pair is not `i < j < num_neu`, or a
    /// mass-splitting index is not in `1..num_neu`.
    InvalidMixingIndex {
        /// First index.
        i: usize,
        /// Second index.
        j: usize,
        /// Number of states.
        num_neu: usize,
    },
    /// A collaborator required by `evolve()` was never set.
    MissingCollaborator {
        /// Which one: "decay model", "body", "track" or "initial state".
        what: &'static str,
    },
    /// A collaborator was built for a different number of states.
    DimensionMismatch {
        /// Which collaborator.
        what: &'static str,
        /// The driver's number of states.
        expected: usize,
        /// The collaborator's number of states.
        found: usize,
    },
    /// The initial flux tensor does not have shape `(nodes, 2, num_neu)`.
    StateShapeMismatch {
        /// Required shape.
        expected: (usize, usize, usize),
        /// Supplied shape.
        found: (usize, usize, usize),
    },
    /// The initial flux contains NaN or infinite values.
    NonFiniteInitialState,
    /// The decay model's coupling path fixes a coupling type that differs
    /// from the driver's flag.
    CouplingTypeMismatch {
        /// Coupling type in the driver flags.
        configured: CouplingType,
        /// Coupling type fixed by the decay model.
        model: CouplingType,
    },
    /// The driver has already evolved; it cannot be reconfigured.
    AlreadyEvolved,
    /// Decay model configuration failed.
    Decay(DecayError),
    /// Body or track configuration failed.
    Body(BodyError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStateCount { num_neu } => write!(
                f,
                "number of states must be in 2..={MAX_MASS_STATES}, got {num_neu}"
            ),
            Self::InvalidNumerics { reason } => write!(f, "invalid numerics: {reason}"),
            Self::InvalidMixingIndex { i, j, num_neu } => write!(
                f,
                "mixing index ({i}, {j}) invalid for a {num_neu}-state system"
            ),
            Self::MissingCollaborator { what } => {
                write!(f, "{what} must be set before evolve()")
            }
            Self::DimensionMismatch {
                what,
                expected,
                found,
            } => write!(f, "{what} has {found} states, driver has {expected}"),
            Self::StateShapeMismatch { expected, found } => write!(
                f,
                "initial state shape {found:?} does not match required {expected:?}"
            ),
            Self::NonFiniteInitialState => write!(f, "initial state contains non-finite values"),
            Self::CouplingTypeMismatch { configured, model } => write!(
                f,
                "driver is configured for {configured} coupling but the decay model fixes {model}"
            ),
            Self::AlreadyEvolved => write!(f, "driver has already evolved; use a fresh driver"),
            Self::Decay(e) => write!(f, "decay model: {e}"),
            Self::Body(e) => write!(f, "body: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decay(e) => Some(e),
            Self::Body(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DecayError> for ConfigError {
    fn from(e: DecayError) -> Self {
        Self::Decay(e)
    }
}

impl From<BodyError> for ConfigError {
    fn from(e: BodyError) -> Self {
        Self::Body(e)
    }
}

// ── EvolveError ────────────────────────────────────────────────────

/// What [`EvolutionDriver::evolve`](crate::EvolutionDriver::evolve) returns
/// on failure. No partial result accompanies either variant.
#[derive(Clone, Debug, PartialEq)]
pub enum EvolveError {
    /// The driver was not fully or consistently configured.
    Config(ConfigError),
    /// The integration itself failed.
    Numerical(EvolutionError),
}

impl fmt::Display for EvolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Numerical(e) => write!(f, "numerical failure: {e}"),
        }
    }
}

impl Error for EvolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Numerical(e) => Some(e),
        }
    }
}

impl From<ConfigError> for EvolveError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<EvolutionError> for EvolveError {
    fn from(e: EvolutionError) -> Self {
        Self::Numerical(e)
    }
}

impl From<DecayError> for EvolveError {
    fn from(e: DecayError) -> Self {
        Self::Config(ConfigError::Decay(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> EnergyGrid {
        EnergyGrid::linspace(1.0e9, 2.0e9, 4).unwrap()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(DriverConfig::new(grid(), 4).validate().is_ok());
    }

    #[test]
    fn state_count_bounds() {
        assert_eq!(
            DriverConfig::new(grid(), 1).validate(),
            Err(ConfigError::InvalidStateCount { num_neu: 1 })
        );
        assert!(DriverConfig::new(grid(), MAX_MASS_STATES + 1)
            .validate()
            .is_err());
    }

    #[test]
    fn zero_tolerances_rejected() {
        let numerics = NumericsConfig {
            rel_error: 0.0,
            abs_error: 0.0,
            ..Default::default()
        };
        match numerics.validate() {
            Err(ConfigError::InvalidNumerics { reason }) => assert!(reason.contains("both")),
            other => panic!("expected InvalidNumerics, got {other:?}"),
        }
    }

    #[test]
    fn nan_step_rejected() {
        let numerics = NumericsConfig {
            initial_step: Some(f64::NAN),
            ..Default::default()
        };
        assert!(numerics.validate().is_err());
    }

    #[test]
    fn max_step_must_exceed_min_step() {
        let numerics = NumericsConfig {
            max_step: Some(1.0),
            min_step: 2.0,
            ..Default::default()
        };
        assert!(numerics.validate().is_err());
    }

    #[test]
    fn evolve_error_chains_source() {
        let e = EvolveError::from(DecayError::TermsNotComputed);
        assert!(matches!(
            e,
            EvolveError::Config(ConfigError::Decay(DecayError::TermsNotComputed))
        ));
        assert!(e.source().is_some());
        assert!(e.to_string().contains("compute_derived_terms"));
    }
}
