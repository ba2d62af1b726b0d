//! Uniform-density slab.

use crate::body::{check_density, check_electron_fraction, Body, MatterSample};
use crate::error::BodyError;
use crate::track::Track;

/// A body of uniform density and electron fraction.
///
/// # Examples
///
/// ```
/// use nudecay_body::{Body, ConstantDensity, Track};
///
/// let body = ConstantDensity::new(5.0, 0.3).unwrap();
/// let track = Track::new(0.0, 1.0).unwrap();
/// let s = body.sample(&track, 0.5);
/// assert_eq!(s.density, 5.0);
/// assert_eq!(s.electron_fraction, 0.3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantDensity {
    density: f64,
    electron_fraction: f64,
}

impl ConstantDensity {
    /// Density in g/cm³ and electron fraction in `[0, 1]`.
    pub fn new(density: f64, electron_fraction: f64) -> Result<Self, BodyError> {
        check_density(density)?;
        check_electron_fraction(electron_fraction)?;
        Ok(Self {
            density,
            electron_fraction,
        })
    }

    /// Density in g/cm³.
    pub fn density(&self) -> f64 {
        self.density
    }

    /// Electron fraction.
    pub fn electron_fraction(&self) -> f64 {
        self.electron_fraction
    }
}

impl Body for ConstantDensity {
    fn name(&self) -> &'static str {
        "constant-density"
    }

    fn sample(&self, _track: &Track, _x: f64) -> MatterSample {
        MatterSample {
            density: self.density,
            electron_fraction: self.electron_fraction,
        }
    }
}
