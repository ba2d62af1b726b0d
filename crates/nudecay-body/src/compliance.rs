//! Body trait compliance test helpers.
//!
//! Reused across the body test modules to check the invariants every
//! `Body` must satisfy along a track.

use crate::body::Body;
use crate::track::Track;

const SAMPLES: usize = 257;

fn positions(track: &Track) -> impl Iterator<Item = f64> + '_ {
    (0..SAMPLES).map(move |i| {
        track.x_initial() + track.length() * i as f64 / (SAMPLES - 1) as f64
    })
}

/// Assert that density is finite and non-negative everywhere on the track.
pub fn assert_density_physical(body: &dyn Body, track: &Track) {
    for x in positions(track) {
        let s = body.sample(track, x);
        assert!(
            s.density.is_finite() && s.density >= 0.0,
            "{}: density {} at x = {x:e}",
            body.name(),
            s.density
        );
    }
}

/// Assert that the electron fraction stays in `[0, 1]`.
pub fn assert_electron_fraction_physical(body: &dyn Body, track: &Track) {
    for x in positions(track) {
        let ye = body.sample(track, x).electron_fraction;
        assert!(
            (0.0..=1.0).contains(&ye),
            "{}: electron fraction {ye} at x = {x:e}",
            body.name()
        );
    }
}

/// Assert that repeated queries return identical samples.
pub fn assert_sampling_deterministic(body: &dyn Body, track: &Track) {
    for x in positions(track) {
        assert_eq!(body.sample(track, x), body.sample(track, x));
    }
}

/// Assert that the body reports a non-empty name.
pub fn assert_name_nonempty(body: &dyn Body) {
    assert!(!body.name().is_empty());
}

/// Run all compliance checks on a body along a track.
pub fn run_full_compliance(body: &dyn Body, track: &Track) {
    assert_density_physical(body, track);
    assert_electron_fraction_physical(body, track);
    assert_sampling_deterministic(body, track);
    assert_name_nonempty(body);
}
