//! Benchmark profiles and utilities for the nudecay workspace.
//!
//! Provides pre-configured drivers for benchmarking and examples:
//!
//! - [`short_baseline_profile`]: four states, 0.47 km of rock, coupling path
//! - [`atmospheric_profile`]: three states through the Earth over zenith bins
//! - [`falling_flux`]: a deterministic power-law muon flux

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use nalgebra::DMatrix;
use nudecay_body::{ConstantDensity, EarthAtm, Track};
use nudecay_core::units::{GEV, KM};
use nudecay_core::{Basis, CouplingType, EnergyGrid, Flavor, FluxState, Polarization};
use nudecay_decay::DecayModel;
use nudecay_engine::{
    AtmosphericBinning, DriverConfig, EvolutionDriver, MixingParameters, PhysicsFlags,
};

/// Masses (eV) of the four-state profile.
pub const STERILE_MASSES: [f64; 4] = [0.0, 0.00875, 0.049, 1.0];

/// Build a short-baseline driver ready to evolve.
///
/// `nodes` linear nodes over 0.025 to 9.975 GeV, θ24 = 0.3, and a scalar
/// g43 = `coupling`. Regeneration and absorption follow `regeneration`.
pub fn short_baseline_profile(nodes: usize, coupling: f64, regeneration: bool) -> EvolutionDriver {
    let grid = EnergyGrid::linspace(0.025 * GEV, 9.975 * GEV, nodes).unwrap();
    let flags = PhysicsFlags {
        incoherent_interactions: regeneration,
        decay_regeneration: regeneration,
        ..Default::default()
    };
    let mut driver = EvolutionDriver::new(DriverConfig::new(grid.clone(), 4).with_flags(flags))
        .unwrap();

    let mut mixing = MixingParameters::standard(4).unwrap();
    mixing.set_mixing_angle(1, 3, 0.3).unwrap();
    mixing.set_square_mass_difference(3, 1.0).unwrap();
    driver.set_mixing_parameters(mixing).unwrap();

    let mut g = DMatrix::zeros(4, 4);
    g[(3, 2)] = coupling;
    let mut model =
        DecayModel::from_couplings(STERILE_MASSES.to_vec(), g, CouplingType::Scalar).unwrap();
    model.compute_derived_terms().unwrap();
    driver.set_decay_model(model).unwrap();

    driver
        .set_body(Arc::new(ConstantDensity::new(5.0, 0.3).unwrap()))
        .unwrap();
    driver.set_track(Track::new(0.0, 0.47 * KM).unwrap()).unwrap();
    driver
        .set_initial_state(falling_flux(&grid, 4), Basis::Flavor)
        .unwrap();
    driver
}

/// Build a three-state stable atmospheric binning ready to evolve.
///
/// `bins` zenith bins evenly spaced in cos z over [-1, 0), `nodes`
/// log-spaced nodes over 100 GeV to 1 TeV, one `conv` component.
pub fn atmospheric_profile(bins: usize, nodes: usize) -> AtmosphericBinning {
    let grid = EnergyGrid::logspace(100.0 * GEV, 1000.0 * GEV, nodes).unwrap();
    let cos_zenith: Vec<f64> = (0..bins).map(|i| -1.0 + i as f64 / bins as f64).collect();
    let mut binning = AtmosphericBinning::new(
        DriverConfig::new(grid.clone(), 3),
        Arc::new(EarthAtm::new()),
        cos_zenith,
        &["conv"],
    )
    .unwrap();
    let mut model = DecayModel::stable(STERILE_MASSES[..3].to_vec()).unwrap();
    model.compute_derived_terms().unwrap();
    binning.set_decay_model(&model).unwrap();
    binning
        .set_component_initial_state("conv", &falling_flux(&grid, 3), Basis::Flavor)
        .unwrap();
    binning
}

/// Muon flux falling as E^-1.7 (E in GeV), antineutrinos at 30 %.
pub fn falling_flux(grid: &EnergyGrid, num_neu: usize) -> FluxState {
    let mut flux = FluxState::zeros(grid.len(), num_neu);
    for (node, &energy) in grid.nodes().iter().enumerate() {
        let nu = (energy / GEV).powf(-1.7);
        flux.set(node, Polarization::Neutrino, Flavor::Muon, nu);
        flux.set(node, Polarization::Antineutrino, Flavor::Muon, 0.3 * nu);
    }
    flux
}
