//! Layered Earth with an atmosphere shell.
//!
//! The density follows the Preliminary Reference Earth Model as a
//! piecewise polynomial in the normalized radius `r / R⊕`. The atmosphere
//! contributes only path length; its density is taken as zero.

use crate::body::{check_electron_fraction, Body, MatterSample};
use crate::error::BodyError;
use crate::track::Track;
use nudecay_core::units::KM;

/// Earth radius in km.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// Default atmosphere height in km.
pub const ATMOSPHERE_HEIGHT_KM: f64 = 22.0;
/// Outer-core boundary radius in km.
pub const CORE_RADIUS_KM: f64 = 3480.0;

const CORE_YE: f64 = 0.4656;
const MANTLE_YE: f64 = 0.4957;

/// PREM density in g/cm³ at radius `r_km`. Zero above the surface.
pub fn prem_density(r_km: f64) -> f64 {
    let x = r_km / EARTH_RADIUS_KM;
    if r_km < 1221.5 {
        13.0885 - 8.8381 * x * x
    } else if r_km < CORE_RADIUS_KM {
        12.5815 - 1.2638 * x - 3.6426 * x * x - 5.5281 * x * x * x
    } else if r_km < 5701.0 {
        7.9565 - 6.4761 * x + 5.5283 * x * x - 3.0807 * x * x * x
    } else if r_km < 5771.0 {
        5.3197 - 1.4836 * x
    } else if r_km < 5971.0 {
        11.2494 - 8.0298 * x
    } else if r_km < 6151.0 {
        7.1089 - 3.8045 * x
    } else if r_km < 6346.6 {
        2.6910 + 0.6924 * x
    } else if r_km < 6356.0 {
        2.9
    } else if r_km < 6368.0 {
        2.6
    } else if r_km <= EARTH_RADIUS_KM {
        1.02
    } else {
        0.0
    }
}

/// Earth (PREM) plus an atmosphere shell.
///
/// Tracks are derived from the zenith angle of arrival at a detector on
/// the surface: `cos_zenith = 1` is straight down through the atmosphere
/// only, `cos_zenith = -1` crosses the full diameter. Positions along a
/// track are measured from the top of the atmosphere.
///
/// # Examples
///
/// ```
/// use nudecay_body::{Body, EarthAtm};
/// use nudecay_core::units::KM;
///
/// let earth = EarthAtm::new();
/// let down = earth.track_for_zenith(1.0).unwrap();
/// assert!((down.length() / KM - 22.0).abs() < 1e-9);
///
/// let up = earth.track_for_zenith(-1.0).unwrap();
/// assert!((up.length() / KM - (2.0 * 6371.0 + 22.0)).abs() < 1e-6);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EarthAtm {
    radius_km: f64,
    atmosphere_km: f64,
    core_ye: f64,
    mantle_ye: f64,
}

impl Default for EarthAtm {
    fn default() -> Self {
        Self {
            radius_km: EARTH_RADIUS_KM,
            atmosphere_km: ATMOSPHERE_HEIGHT_KM,
            core_ye: CORE_YE,
            mantle_ye: MANTLE_YE,
        }
    }
}

impl EarthAtm {
    /// PREM Earth with a 22 km atmosphere.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the core and mantle electron fractions.
    pub fn with_electron_fractions(mut self, core: f64, mantle: f64) -> Result<Self, BodyError> {
        check_electron_fraction(core)?;
        check_electron_fraction(mantle)?;
        self.core_ye = core;
        self.mantle_ye = mantle;
        Ok(self)
    }

    /// Atmosphere height in km.
    pub fn atmosphere_height_km(&self) -> f64 {
        self.atmosphere_km
    }

    /// Baseline in km from the top of the atmosphere to the detector.
    pub fn baseline_km(&self, cos_zenith: f64) -> f64 {
        let r = self.radius_km;
        let top = r + self.atmosphere_km;
        let sin2 = 1.0 - cos_zenith * cos_zenith;
        (top * top - r * r * sin2).sqrt() - r * cos_zenith
    }

    /// Radius in km at distance `x_km` from the top of the atmosphere.
    fn radius_at(&self, baseline_km: f64, cos_zenith: f64, x_km: f64) -> f64 {
        let r = self.radius_km;
        let s = baseline_km - x_km;
        (r * r + s * s + 2.0 * r * s * cos_zenith).max(0.0).sqrt()
    }
}

impl Body for EarthAtm {
    fn name(&self) -> &'static str {
        "earth-atm"
    }

    fn sample(&self, track: &Track, x: f64) -> MatterSample {
        let Some(cos_zenith) = track.cos_zenith() else {
            return MatterSample::VACUUM;
        };
        let baseline_km = track.length() / KM;
        let x_km = (x - track.x_initial()) / KM;
        let r_km = self.radius_at(baseline_km, cos_zenith, x_km);
        if r_km > self.radius_km {
            return MatterSample::VACUUM;
        }
        let electron_fraction = if r_km < CORE_RADIUS_KM {
            self.core_ye
        } else {
            self.mantle_ye
        };
        MatterSample {
            density: prem_density(r_km),
            electron_fraction,
        }
    }

    fn track_for_zenith(&self, cos_zenith: f64) -> Result<Track, BodyError> {
        if !(-1.0..=1.0).contains(&cos_zenith) {
            return Err(BodyError::InvalidZenith { cos_zenith });
        }
        Track::with_zenith(self.baseline_km(cos_zenith) * KM, cos_zenith)
    }
}
