//! Zenith-binned evolution through the Earth.

use std::sync::Arc;

use nudecay_core::units::GEV;
use nudecay_core::{Basis, EnergyGrid, EvolutionError, Flavor, FluxState, Polarization};
use nudecay_decay::DecayModel;
use nudecay_engine::{
    AtmosphericBinning, BinningError, DriverConfig, EvolutionEngine, EvolveError, NumericsConfig,
};
use nudecay_test_utils::{earth, FailingEngine, IdentityEngine};

const NODES: usize = 5;
const ZENITH: [f64; 3] = [-1.0, -0.6, -0.2];

fn config() -> DriverConfig {
    let grid = EnergyGrid::logspace(100.0 * GEV, 1000.0 * GEV, NODES).unwrap();
    DriverConfig::new(grid, 3).with_numerics(NumericsConfig {
        rel_error: 1e-8,
        abs_error: 1e-8,
        ..Default::default()
    })
}

fn stable_model() -> DecayModel {
    let mut model = DecayModel::stable(vec![0.0, 0.0087, 0.0497]).unwrap();
    model.compute_derived_terms().unwrap();
    model
}

fn muon_flux(value: f64) -> FluxState {
    let mut flux = FluxState::zeros(NODES, 3);
    for node in 0..NODES {
        flux.set(node, Polarization::Neutrino, Flavor::Muon, value);
        flux.set(node, Polarization::Antineutrino, Flavor::Muon, value);
    }
    flux
}

#[test]
fn components_evolve_independently() {
    let mut bins =
        AtmosphericBinning::new(config(), earth(), ZENITH.to_vec(), &["pion", "kaon"]).unwrap();
    bins.set_decay_model(&stable_model()).unwrap();
    bins.set_component_initial_state("pion", &muon_flux(1.0), Basis::Flavor)
        .unwrap();
    bins.set_component_initial_state("kaon", &muon_flux(0.25), Basis::Flavor)
        .unwrap();
    bins.evolve_all().unwrap();

    for bin in 0..ZENITH.len() {
        for node in 0..NODES {
            let pion = bins
                .evaluate_at_node("pion", bin, Flavor::Muon, node, Polarization::Neutrino)
                .unwrap();
            let kaon = bins
                .evaluate_at_node("kaon", bin, Flavor::Muon, node, Polarization::Neutrino)
                .unwrap();
            // Evolution is linear in the initial flux.
            assert!((kaon - 0.25 * pion).abs() < 1e-6, "bin {bin} node {node}");

            let total: f64 = [Flavor::Electron, Flavor::Muon, Flavor::Tau]
                .into_iter()
                .map(|f| {
                    bins.evaluate_at_node("pion", bin, f, node, Polarization::Antineutrino)
                        .unwrap()
                })
                .sum();
            assert!((total - 1.0).abs() < 1e-5, "bin {bin} node {node}: {total}");
        }
    }
}

#[test]
fn bins_see_different_baselines() {
    let mut bins = AtmosphericBinning::new(config(), earth(), ZENITH.to_vec(), &["conv"]).unwrap();
    bins.set_decay_model(&stable_model()).unwrap();
    bins.set_component_initial_state("conv", &muon_flux(1.0), Basis::Flavor)
        .unwrap();
    bins.evolve_all().unwrap();
    let survival = bins
        .evaluate_all_bins("conv", Flavor::Muon, 100.0 * GEV, Polarization::Neutrino)
        .unwrap();
    assert_eq!(survival.len(), ZENITH.len());
    assert!(survival.iter().all(|p| (0.0..=1.0 + 1e-9).contains(p)));
    assert!((survival[0] - survival[2]).abs() > 1e-3, "{survival:?}");
}

#[test]
fn shared_engine_runs_once_per_bin() {
    let engine = Arc::new(IdentityEngine::new());
    let mut bins = AtmosphericBinning::with_engines(
        config(),
        earth(),
        ZENITH.to_vec(),
        &["pion", "kaon"],
        || Box::new(Arc::clone(&engine)) as Box<dyn EvolutionEngine>,
    )
    .unwrap();
    bins.set_decay_model(&stable_model()).unwrap();
    for component in ["pion", "kaon"] {
        bins.set_component_initial_state(component, &muon_flux(2.0), Basis::Flavor)
            .unwrap();
    }
    bins.evolve_all().unwrap();
    assert_eq!(engine.calls(), 2 * ZENITH.len());
    assert_eq!(
        bins.evaluate("kaon", 2, Flavor::Muon, 100.0 * GEV, Polarization::Neutrino),
        Ok(2.0)
    );
}

#[test]
fn failures_name_the_bin() {
    let mut bins = AtmosphericBinning::with_engines(
        config(),
        earth(),
        ZENITH.to_vec(),
        &["conv"],
        || Box::new(FailingEngine::new(EvolutionError::NonFinite { position: 1.0 })),
    )
    .unwrap();
    bins.set_decay_model(&stable_model()).unwrap();
    bins.set_component_initial_state("conv", &muon_flux(1.0), Basis::Flavor)
        .unwrap();
    match bins.evolve_all() {
        Err(BinningError::Evolve {
            component,
            bin,
            error,
        }) => {
            assert_eq!(component, "conv");
            assert_eq!(bin, 0);
            assert_eq!(
                error,
                EvolveError::Numerical(EvolutionError::NonFinite { position: 1.0 })
            );
        }
        other => panic!("expected a per-bin failure, got {other:?}"),
    }
}

#[test]
fn unconfigured_bins_report_missing_state() {
    let mut bins = AtmosphericBinning::new(config(), earth(), ZENITH.to_vec(), &["conv"]).unwrap();
    bins.set_decay_model(&stable_model()).unwrap();
    bins.set_initial_state("conv", 0, muon_flux(1.0), Basis::Flavor)
        .unwrap();
    match bins.evolve_all() {
        Err(BinningError::Evolve { bin, .. }) => assert_eq!(bin, 1),
        other => panic!("expected bin 1 to fail, got {other:?}"),
    }
    // Bin 0 succeeded and stays queryable.
    assert!(bins
        .evaluate_at_node("conv", 0, Flavor::Muon, 0, Polarization::Neutrino)
        .is_ok());
}
