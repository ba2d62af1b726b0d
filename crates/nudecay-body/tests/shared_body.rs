//! Bodies are shared read-only across threads behind `Arc<dyn Body>`.

use std::sync::Arc;
use std::thread;

use nudecay_body::{Body, ConstantDensity, EarthAtm, Vacuum};

#[test]
fn arc_dyn_body_is_shareable_across_threads() {
    let body: Arc<dyn Body> = Arc::new(EarthAtm::new());
    let handles: Vec<_> = [-1.0, -0.4, 0.2]
        .into_iter()
        .map(|cz| {
            let body = Arc::clone(&body);
            thread::spawn(move || {
                let track = body.track_for_zenith(cz).unwrap();
                body.sample(&track, track.x_initial() + 0.5 * track.length())
                    .density
            })
        })
        .collect();
    let densities: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(densities[0] > densities[1]);
    assert!(densities.iter().all(|d| d.is_finite()));
}

#[test]
fn downcast_recovers_concrete_type() {
    let body: Arc<dyn Body> = Arc::new(ConstantDensity::new(5.0, 0.3).unwrap());
    let concrete = body.downcast_ref::<ConstantDensity>().unwrap();
    assert_eq!(concrete.density(), 5.0);
    assert!(body.downcast_ref::<Vacuum>().is_none());
}
