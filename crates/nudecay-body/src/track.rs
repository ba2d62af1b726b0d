//! Propagation path descriptor.

use crate::error::BodyError;

/// A straight propagation path, parameterized by distance travelled.
///
/// Positions are in natural length units (eV⁻¹). Zenith-derived tracks
/// also remember the cosine of the zenith angle so that the body can map
/// a position back to a radius.
///
/// # Examples
///
/// ```
/// use nudecay_body::Track;
/// use nudecay_core::units::KM;
///
/// let track = Track::new(0.0, 0.47 * KM).unwrap();
/// assert!((track.length() / KM - 0.47).abs() < 1e-12);
/// assert_eq!(track.cos_zenith(), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    x_initial: f64,
    x_final: f64,
    cos_zenith: Option<f64>,
}

impl Track {
    /// A track from `x_initial` to `x_final`.
    pub fn new(x_initial: f64, x_final: f64) -> Result<Self, BodyError> {
        if !x_initial.is_finite() || !x_final.is_finite() || x_final < x_initial {
            return Err(BodyError::InvalidTrack { x_initial, x_final });
        }
        Ok(Self {
            x_initial,
            x_final,
            cos_zenith: None,
        })
    }

    /// A track of `length` starting at zero, tagged with a zenith angle.
    pub fn with_zenith(length: f64, cos_zenith: f64) -> Result<Self, BodyError> {
        if !(-1.0..=1.0).contains(&cos_zenith) {
            return Err(BodyError::InvalidZenith { cos_zenith });
        }
        let mut track = Self::new(0.0, length)?;
        track.cos_zenith = Some(cos_zenith);
        Ok(track)
    }

    /// Start position.
    pub fn x_initial(&self) -> f64 {
        self.x_initial
    }

    /// End position.
    pub fn x_final(&self) -> f64 {
        self.x_final
    }

    /// `x_final - x_initial`.
    pub fn length(&self) -> f64 {
        self.x_final - self.x_initial
    }

    /// Cosine of the zenith angle, for zenith-derived tracks.
    pub fn cos_zenith(&self) -> Option<f64> {
        self.cos_zenith
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backwards_track_rejected() {
        assert!(matches!(
            Track::new(2.0, 1.0),
            Err(BodyError::InvalidTrack { .. })
        ));
        assert!(Track::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn zero_length_track_allowed() {
        let t = Track::new(3.0, 3.0).unwrap();
        assert_eq!(t.length(), 0.0);
    }

    #[test]
    fn zenith_out_of_range_rejected() {
        assert_eq!(
            Track::with_zenith(1.0, 1.5),
            Err(BodyError::InvalidZenith { cos_zenith: 1.5 })
        );
    }
}
