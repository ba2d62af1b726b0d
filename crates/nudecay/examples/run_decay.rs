//! Upgoing atmospheric neutrinos with a short-lived fourth state.
//!
//! Ten log-spaced nodes from 100 GeV to 1 TeV cross the whole Earth
//! (cos z = -1) starting at the top of the atmosphere. The fourth state
//! (1 eV) decays into each lighter state with a lifetime of 100 eV⁻¹ in
//! every process class. Neutrinos are Majorana and decay regeneration is
//! on. Prints one row per node: the energy in GeV, every flavor for
//! neutrinos, then every flavor for antineutrinos.

use std::io::{self, BufWriter};
use std::sync::Arc;

use nudecay::prelude::*;
use nudecay::types::units::GEV;
use tracing::info;
use tracing_subscriber::EnvFilter;

const NUM_NEU: usize = 4;
const LIFETIME: f64 = 1.0e2;
const MAXIMAL: f64 = 0.785398;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let grid = EnergyGrid::logspace(1.0e2 * GEV, 1.0e3 * GEV, 10)?;
    let flags = PhysicsFlags {
        majorana: true,
        decay_regeneration: true,
        ..Default::default()
    };
    let numerics = NumericsConfig {
        rel_error: 1.0e-10,
        abs_error: 1.0e-10,
        ..Default::default()
    };
    let config = DriverConfig::new(grid.clone(), NUM_NEU)
        .with_flags(flags)
        .with_numerics(numerics);
    let mut driver = EvolutionDriver::new(config)?;

    let heavy = 1.0;
    let mut mixing = MixingParameters::standard(NUM_NEU)?;
    mixing.set_square_mass_difference(3, heavy * heavy)?;
    for light in 0..3 {
        mixing.set_mixing_angle(light, 3, MAXIMAL)?;
    }
    let masses = vec![
        0.0,
        mixing.square_mass_difference(1).unwrap_or_default().sqrt(),
        mixing.square_mass_difference(2).unwrap_or_default().sqrt(),
        heavy,
    ];
    driver.set_mixing_parameters(mixing)?;

    let mut lifetimes = LifetimeMatrix::stable(NUM_NEU)?;
    for daughter in 0..3 {
        lifetimes.set_lifetime(3, daughter, LIFETIME)?;
    }
    let mut model = DecayModel::from_lifetimes(
        masses,
        Some((&lifetimes, &lifetimes)),
        Some((&lifetimes, &lifetimes)),
    )?;
    model.compute_derived_terms()?;
    driver.set_decay_model(model)?;

    let earth: Arc<dyn Body> = Arc::new(EarthAtm::new());
    driver.set_track(earth.track_for_zenith(-1.0)?)?;
    driver.set_body(earth)?;

    let mut flux = FluxState::zeros(grid.len(), NUM_NEU);
    for node in 0..grid.len() {
        for pol in [Polarization::Neutrino, Polarization::Antineutrino] {
            flux.set(node, pol, Flavor::Muon, 1.0);
        }
    }
    driver.set_initial_state(flux, Basis::Flavor)?;
    driver.evolve()?;
    info!(
        accepted = driver.metrics().accepted_steps,
        total_us = driver.metrics().total_us,
        "evolved through the Earth"
    );

    let table = store_table(&grid, &ColumnLayout::all(NUM_NEU), GEV, |f, e, p| {
        driver.evaluate(f, e, p)
    })?;
    table.write_to(BufWriter::new(io::stdout().lock()))?;
    Ok(())
}
