//! Empty space.

use crate::body::{Body, MatterSample};
use crate::track::Track;

/// A body with no matter: pure vacuum oscillation and decay.
///
/// # Examples
///
/// ```
/// use nudecay_body::{Body, Track, Vacuum};
///
/// let track = Track::new(0.0, 1.0e9).unwrap();
/// assert_eq!(Vacuum.sample(&track, 5.0e8).density, 0.0);
/// assert!(Vacuum.track_for_zenith(0.0).is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vacuum;

impl Body for Vacuum {
    fn name(&self) -> &'static str {
        "vacuum"
    }

    fn sample(&self, _track: &Track, _x: f64) -> MatterSample {
        MatterSample::VACUUM
    }
}
