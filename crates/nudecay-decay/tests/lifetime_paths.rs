//! The lifetime and coupling paths feed the same rate-matrix routine.

use nalgebra::DMatrix;
use nudecay_core::CouplingType;
use nudecay_decay::coupling::rest_frame_width;
use nudecay_decay::{Chirality, DecayModel, LifetimeMatrix, ProcessClass};

const MASSES: [f64; 4] = [0.0, 0.00875, 0.049, 1.0];

fn couplings() -> DMatrix<f64> {
    let mut g = DMatrix::zeros(4, 4);
    g[(3, 2)] = 0.8;
    g[(3, 0)] = 0.3;
    g[(2, 1)] = 0.5;
    g
}

/// Lifetimes equal to the inverse coupling-derived widths of `class`.
fn equivalent_lifetimes(g: &DMatrix<f64>, class: ProcessClass) -> LifetimeMatrix {
    let mut tau = LifetimeMatrix::stable(4).unwrap();
    for parent in 1..4 {
        for daughter in 0..parent {
            let width =
                rest_frame_width(class, g[(parent, daughter)], MASSES[parent], MASSES[daughter]);
            if width > 0.0 {
                tau.set_lifetime(parent, daughter, width.recip()).unwrap();
            }
        }
    }
    tau
}

#[test]
fn coupling_path_matches_equivalent_lifetimes() {
    let g = couplings();
    for coupling in [CouplingType::Scalar, CouplingType::Pseudoscalar] {
        let mut from_g =
            DecayModel::from_couplings(MASSES.to_vec(), g.clone(), coupling).unwrap();
        let terms_g = from_g.compute_derived_terms().unwrap().clone();

        let cpp = equivalent_lifetimes(&g, ProcessClass::new(Chirality::Preserving, coupling));
        let cvp = equivalent_lifetimes(&g, ProcessClass::new(Chirality::Violating, coupling));
        let pair = Some((&cpp, &cvp));
        let (scalar, pseudoscalar) = match coupling {
            CouplingType::Scalar => (pair, None),
            CouplingType::Pseudoscalar => (None, pair),
        };
        let mut from_tau =
            DecayModel::from_lifetimes(MASSES.to_vec(), scalar, pseudoscalar).unwrap();
        let terms_tau = from_tau.compute_derived_terms().unwrap();

        let a = terms_g.pair(coupling).unwrap();
        let b = terms_tau.pair(coupling).unwrap();
        for parent in 0..4 {
            for daughter in 0..4 {
                for (x, y) in [(&a.cpp, &b.cpp), (&a.cvp, &b.cvp)] {
                    let p = x.partial_rate(parent, daughter);
                    let q = y.partial_rate(parent, daughter);
                    assert!(
                        (p - q).abs() <= 1e-12 * p.abs() + 1e-50,
                        "{coupling:?} {parent}->{daughter}: {p} vs {q}"
                    );
                }
            }
            let (p, q) = (a.cpp.total_rate(parent), b.cpp.total_rate(parent));
            assert!((p - q).abs() <= 1e-12 * p.abs() + 1e-50);
        }
        assert_eq!(terms_g.pinned_coupling(), Some(coupling));
        assert!(terms_g.implies_majorana());
        assert!(!terms_tau.implies_majorana());
    }
}

#[test]
fn heaviest_state_decays_fastest_in_coupling_scenario() {
    let mut model =
        DecayModel::from_couplings(MASSES.to_vec(), couplings(), CouplingType::Scalar).unwrap();
    let terms = model.compute_derived_terms().unwrap();
    let pair = terms.pair(CouplingType::Scalar).unwrap();
    assert_eq!(pair.cpp.total_rate(0), 0.0);
    assert_eq!(pair.cpp.total_rate(1), 0.0);
    assert!(pair.cpp.total_rate(3) > pair.cpp.total_rate(2));
    assert!(pair.cpp.total_rate(2) > 0.0);
}
