//! Error types for body and track construction.

use std::fmt;

/// Errors arising from body construction or track derivation.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyError {
    /// Density is NaN, infinite or negative.
    InvalidDensity {
        /// The offending density (g/cm³).
        value: f64,
    },
    /// Electron fraction is outside `[0, 1]`.
    InvalidElectronFraction {
        /// The offending fraction.
        value: f64,
    },
    /// A track endpoint is not finite, or the track runs backwards.
    InvalidTrack {
        /// Start position.
        x_initial: f64,
        /// End position.
        x_final: f64,
    },
    /// Cosine of the zenith angle is outside `[-1, 1]`.
    InvalidZenith {
        /// The offending cosine.
        cos_zenith: f64,
    },
    /// The body has no geometry from which a zenith track can be derived.
    NoZenithGeometry {
        /// Name of the body.
        body: &'static str,
    },
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDensity { value } => {
                write!(f, "density must be finite and >= 0, got {value}")
            }
            Self::InvalidElectronFraction { value } => {
                write!(f, "electron fraction must lie in [0, 1], got {value}")
            }
            Self::InvalidTrack { x_initial, x_final } => write!(
                f,
                "track [{x_initial:e}, {x_final:e}] must be finite and non-decreasing"
            ),
            Self::InvalidZenith { cos_zenith } => {
                write!(f, "cos(zenith) must lie in [-1, 1], got {cos_zenith}")
            }
            Self::NoZenithGeometry { body } => {
                write!(f, "body '{body}' cannot derive a track from a zenith angle")
            }
        }
    }
}

impl std::error::Error for BodyError {}
