//! The core `Body` trait and `dyn Body` downcast support.

use crate::error::BodyError;
use crate::track::Track;
use std::any::Any;
use std::fmt::Debug;

/// Matter properties at one point along a track.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MatterSample {
    /// Mass density in g/cm³.
    pub density: f64,
    /// Electrons per nucleon.
    pub electron_fraction: f64,
}

impl MatterSample {
    /// No matter.
    pub const VACUUM: MatterSample = MatterSample {
        density: 0.0,
        electron_fraction: 0.0,
    };
}

/// Matter-density profile traversed by a neutrino flux.
///
/// The evolution engine queries the body at positions along a [`Track`];
/// it never mutates it. Bodies are shared read-only between drivers (and
/// between threads in atmospheric binning), hence `Send + Sync`.
///
/// # Object Safety
///
/// Designed for use as `dyn Body` behind an `Arc`. Use
/// [`downcast_ref`](trait.Body.html#method.downcast_ref) to recover the
/// concrete type.
pub trait Body: Any + Send + Sync + Debug + 'static {
    /// Short human-readable name, used in logs and errors.
    fn name(&self) -> &'static str;

    /// Density and electron fraction at position `x` on `track`.
    ///
    /// `x` runs from `track.x_initial()` to `track.x_final()`.
    fn sample(&self, track: &Track, x: f64) -> MatterSample;

    /// Derive the track for a given zenith angle.
    ///
    /// Bodies without a notion of geometry return
    /// [`BodyError::NoZenithGeometry`].
    fn track_for_zenith(&self, cos_zenith: f64) -> Result<Track, BodyError> {
        let _ = cos_zenith;
        Err(BodyError::NoZenithGeometry { body: self.name() })
    }
}

impl dyn Body {
    /// Attempt to downcast a trait object to a concrete body type.
    pub fn downcast_ref<T: Body>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }
}

pub(crate) fn check_density(density: f64) -> Result<(), BodyError> {
    if !density.is_finite() || density < 0.0 {
        return Err(BodyError::InvalidDensity { value: density });
    }
    Ok(())
}

pub(crate) fn check_electron_fraction(ye: f64) -> Result<(), BodyError> {
    if !(0.0..=1.0).contains(&ye) {
        return Err(BodyError::InvalidElectronFraction { value: ye });
    }
    Ok(())
}
