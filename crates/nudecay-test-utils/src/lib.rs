//! Test utilities and mock engines for nudecay development.
//!
//! Provides mock [`EvolutionEngine`](nudecay_engine::EvolutionEngine)
//! implementations in [`fixtures`] and builders for the standard test
//! scenarios: the four-state short-baseline setup with a single heavy-state
//! coupling, its rock body and track, the Earth for zenith bins, and
//! muon-only initial fluxes.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::Arc;

use nalgebra::DMatrix;
use nudecay_body::{Body, ConstantDensity, EarthAtm, Track};
use nudecay_core::units::{GEV, KM};
use nudecay_core::{CouplingType, EnergyGrid, Flavor, FluxState, Polarization};
use nudecay_decay::{DecayModel, LifetimeMatrix};

pub use fixtures::{FailingEngine, IdentityEngine};

/// Masses (eV) of the four-state scenario.
pub const SCENARIO_MASSES: [f64; 4] = [0.0, 0.00875, 0.049, 1.0];

/// Baseline of the short-baseline scenario.
pub const SCENARIO_BASELINE: f64 = 0.47 * KM;

/// Density (g/cm³) and electron fraction of the short-baseline scenario.
pub const SCENARIO_DENSITY: f64 = 5.0;
pub const SCENARIO_ELECTRON_FRACTION: f64 = 0.3;

/// 200 nodes from 0.025 to 9.975 GeV.
pub fn scenario_grid() -> EnergyGrid {
    EnergyGrid::linspace(0.025 * GEV, 9.975 * GEV, 200).unwrap()
}

/// A smaller grid over the same range, for quicker tests.
pub fn coarse_grid(nodes: usize) -> EnergyGrid {
    EnergyGrid::linspace(0.025 * GEV, 9.975 * GEV, nodes).unwrap()
}

/// Constant-density rock of the short-baseline scenario.
pub fn scenario_body() -> Arc<dyn Body> {
    Arc::new(ConstantDensity::new(SCENARIO_DENSITY, SCENARIO_ELECTRON_FRACTION).unwrap())
}

/// Straight track over the short-baseline scenario's baseline.
pub fn scenario_track() -> Track {
    Track::new(0.0, SCENARIO_BASELINE).unwrap()
}

/// The Earth with its atmosphere, shared across zenith bins.
pub fn earth() -> Arc<dyn Body> {
    Arc::new(EarthAtm::new())
}

/// `value` in the muon slot of both polarizations at every node.
pub fn muon_flux(num_energies: usize, num_neu: usize, value: f64) -> FluxState {
    let mut state = FluxState::zeros(num_energies, num_neu);
    for node in 0..num_energies {
        state.set(node, Polarization::Neutrino, Flavor::Muon, value);
        state.set(node, Polarization::Antineutrino, Flavor::Muon, value);
    }
    state
}

/// Coupling matrix with the single entry `g[3][2] = coupling`.
pub fn heavy_coupling(coupling: f64) -> DMatrix<f64> {
    let mut g = DMatrix::zeros(4, 4);
    g[(3, 2)] = coupling;
    g
}

/// Scenario decay model on the coupling path, derived terms computed.
pub fn coupling_model(coupling: f64, kind: CouplingType) -> DecayModel {
    let mut model =
        DecayModel::from_couplings(SCENARIO_MASSES.to_vec(), heavy_coupling(coupling), kind)
            .unwrap();
    model.compute_derived_terms().unwrap();
    model
}

/// Scenario decay model in which nothing decays, derived terms computed.
pub fn stable_model() -> DecayModel {
    let mut model = DecayModel::stable(SCENARIO_MASSES.to_vec()).unwrap();
    model.compute_derived_terms().unwrap();
    model
}

/// Scenario decay model on the lifetime path: the heaviest state decays
/// into each lighter one with lifetime `tau`, in every process class.
pub fn lifetime_model(tau: f64) -> DecayModel {
    let mut lifetimes = LifetimeMatrix::stable(4).unwrap();
    for daughter in 0..3 {
        lifetimes.set_lifetime(3, daughter, tau).unwrap();
    }
    let mut model = DecayModel::from_lifetimes(
        SCENARIO_MASSES.to_vec(),
        Some((&lifetimes, &lifetimes)),
        Some((&lifetimes, &lifetimes)),
    )
    .unwrap();
    model.compute_derived_terms().unwrap();
    model
}
