//! End-to-end evolution of the four-state short-baseline scenario: a 1 eV
//! state coupled to the third mass state, mixed with the muon flavor
//! through θ24, through 0.47 km of rock.

use nudecay_core::{Basis, CouplingType, Flavor, Polarization};
use nudecay_decay::DecayModel;
use nudecay_engine::{DriverConfig, EvolutionDriver, MixingParameters, PhysicsFlags};
use nudecay_test_utils::{
    coarse_grid, coupling_model, lifetime_model, muon_flux, scenario_body, scenario_grid,
    scenario_track, stable_model, SCENARIO_MASSES,
};

const THETA_24: f64 = 0.3;

fn mixing() -> MixingParameters {
    let mut p = MixingParameters::standard(4).unwrap();
    p.set_mixing_angle(1, 3, THETA_24).unwrap();
    p.set_square_mass_difference(3, SCENARIO_MASSES[3] * SCENARIO_MASSES[3])
        .unwrap();
    p
}

fn run(nodes: usize, model: DecayModel, flags: PhysicsFlags) -> EvolutionDriver {
    let grid = if nodes == 200 {
        scenario_grid()
    } else {
        coarse_grid(nodes)
    };
    let mut driver = EvolutionDriver::new(DriverConfig::new(grid, 4).with_flags(flags)).unwrap();
    driver.set_mixing_parameters(mixing()).unwrap();
    driver.set_decay_model(model).unwrap();
    driver.set_body(scenario_body()).unwrap();
    driver.set_track(scenario_track()).unwrap();
    driver
        .set_initial_state(muon_flux(nodes, 4, 1.0), Basis::Flavor)
        .unwrap();
    driver.evolve().unwrap();
    driver
}

fn total(driver: &EvolutionDriver, node: usize, pol: Polarization) -> f64 {
    Flavor::all(4)
        .map(|f| driver.evaluate_at_node(f, node, pol).unwrap())
        .sum()
}

#[test]
fn stable_spectrum_conserves_total_flux() {
    let driver = run(200, stable_model(), PhysicsFlags::default());
    for node in 0..200 {
        for pol in [Polarization::Neutrino, Polarization::Antineutrino] {
            let t = total(&driver, node, pol);
            assert!((t - 1.0).abs() < 1e-7, "node {node} {pol}: {t}");
        }
    }
    assert!(driver.metrics().accepted_steps > 0);
}

#[test]
fn decay_never_increases_total_flux() {
    let flags = PhysicsFlags {
        coupling: CouplingType::Scalar,
        ..Default::default()
    };
    let driver = run(200, coupling_model(1.0, CouplingType::Scalar), flags);
    let sterile_content = THETA_24.sin().powi(2);
    for node in 0..200 {
        for pol in [Polarization::Neutrino, Polarization::Antineutrino] {
            let t = total(&driver, node, pol);
            assert!(t <= 1.0 + 1e-9, "node {node} {pol}: {t}");
            assert!(t >= 1.0 - sterile_content - 1e-9, "node {node} {pol}: {t}");
        }
    }
    // The heavy state decays appreciably at the lowest energy.
    assert!(total(&driver, 0, Polarization::Neutrino) < 0.99);
    let heavy = driver
        .evaluate_mass_at_node(3, 0, Polarization::Neutrino)
        .unwrap();
    assert!(heavy < 0.5 * sterile_content, "heavy population {heavy}");
}

#[test]
fn higher_energies_decay_less() {
    let driver = run(40, coupling_model(1.0, CouplingType::Scalar), PhysicsFlags::default());
    let low = total(&driver, 0, Polarization::Neutrino);
    let high = total(&driver, 39, Polarization::Neutrino);
    assert!(low < high, "low {low} high {high}");
}

#[test]
fn regeneration_only_adds_flux() {
    let base = PhysicsFlags::default();
    let regen = PhysicsFlags {
        decay_regeneration: true,
        ..base
    };
    let without = run(40, coupling_model(1.0, CouplingType::Scalar), base);
    let with = run(40, coupling_model(1.0, CouplingType::Scalar), regen);
    let mut gained = false;
    for node in 0..40 {
        for pol in [Polarization::Neutrino, Polarization::Antineutrino] {
            let a = total(&with, node, pol);
            let b = total(&without, node, pol);
            assert!(a >= b - 1e-9, "node {node} {pol}: {a} < {b}");
            gained |= a > b + 1e-6;
        }
    }
    assert!(gained);
}

/// Flavor- and polarization-summed flux integrated over the grid with
/// trapezoid weights.
fn integrated_total(driver: &EvolutionDriver) -> f64 {
    let weights = driver.grid().trapezoid_weights();
    weights
        .iter()
        .enumerate()
        .map(|(node, w)| {
            w * (total(driver, node, Polarization::Neutrino)
                + total(driver, node, Polarization::Antineutrino))
        })
        .sum()
}

#[test]
fn regeneration_never_raises_integrated_flux() {
    let regen = PhysicsFlags {
        decay_regeneration: true,
        ..Default::default()
    };
    for nodes in [40, 200] {
        let initial: f64 = 2.0 * coarse_grid(nodes).trapezoid_weights().iter().sum::<f64>();
        let with = run(nodes, coupling_model(1.0, CouplingType::Scalar), regen);
        let without = run(
            nodes,
            coupling_model(1.0, CouplingType::Scalar),
            PhysicsFlags::default(),
        );
        let (a, b) = (integrated_total(&with), integrated_total(&without));
        assert!(a <= initial * (1.0 + 1e-9), "{nodes} nodes: {a} > {initial}");
        assert!(a > b, "{nodes} nodes: regeneration added nothing ({a} vs {b})");
    }

    // Dirac neutrinos lose their chirality-violating products.
    let dirac = run(40, lifetime_model(100.0), regen);
    let initial: f64 = 2.0 * coarse_grid(40).trapezoid_weights().iter().sum::<f64>();
    assert!(integrated_total(&dirac) <= initial * (1.0 + 1e-9));
}

#[test]
fn lifetime_path_matches_its_stable_limit() {
    // Lifetimes far beyond the baseline behave like the stable model.
    let long = run(20, lifetime_model(1.0e40), PhysicsFlags::default());
    let stable = run(20, stable_model(), PhysicsFlags::default());
    for node in 0..20 {
        for flavor in Flavor::all(4) {
            let a = long
                .evaluate_at_node(flavor, node, Polarization::Neutrino)
                .unwrap();
            let b = stable
                .evaluate_at_node(flavor, node, Polarization::Neutrino)
                .unwrap();
            assert!((a - b).abs() < 1e-8, "node {node} {flavor}: {a} vs {b}");
        }
    }
}

#[test]
fn absorption_reduces_active_flux() {
    let flags = PhysicsFlags {
        incoherent_interactions: true,
        ..Default::default()
    };
    let absorbed = run(20, stable_model(), flags);
    let free = run(20, stable_model(), PhysicsFlags::default());
    let top = 19;
    let a = total(&absorbed, top, Polarization::Neutrino);
    let b = total(&free, top, Polarization::Neutrino);
    assert!(a < b, "{a} !< {b}");
    assert!(b - a < 1e-6);
}

#[test]
fn node_and_interpolated_queries_agree() {
    let driver = run(40, coupling_model(1.0, CouplingType::Scalar), PhysicsFlags::default());
    let nodes = driver.grid().nodes().to_vec();
    for (node, &energy) in nodes.iter().enumerate() {
        for flavor in Flavor::all(4) {
            let at_node = driver
                .evaluate_at_node(flavor, node, Polarization::Neutrino)
                .unwrap();
            let interpolated = driver
                .evaluate(flavor, energy, Polarization::Neutrino)
                .unwrap();
            assert_eq!(at_node, interpolated);
        }
    }
    let mid = 0.5 * (nodes[4] + nodes[5]);
    let v = driver
        .evaluate(Flavor::Muon, mid, Polarization::Neutrino)
        .unwrap();
    let lo = driver
        .evaluate_at_node(Flavor::Muon, 4, Polarization::Neutrino)
        .unwrap();
    let hi = driver
        .evaluate_at_node(Flavor::Muon, 5, Polarization::Neutrino)
        .unwrap();
    assert!((v - 0.5 * (lo + hi)).abs() < 1e-12);
}
