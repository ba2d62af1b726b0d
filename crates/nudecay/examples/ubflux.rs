//! Short-baseline flux with a decaying sterile state.
//!
//! A muon-neutrino beam flux (0.025 to 9.975 GeV, 200 nodes) crosses
//! 0.47 km of rock. The fourth mass state mixes with the muon flavor
//! through θ24 and decays into the third through a scalar coupling g43,
//! which also makes the neutrinos Majorana. Absorption and decay
//! regeneration are on. The initial and final muon fluxes are written as
//! `E[GeV] nu_mu nubar_mu` tables.
//!
//! ```sh
//! cargo run --release -p nudecay --example ubflux -- 1.0 0.3 1.0 --flux beam.dat
//! ```

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use nalgebra::DMatrix;
use nudecay::prelude::*;
use nudecay::types::units::{GEV, KM};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DENSITY: f64 = 5.0;
const ELECTRON_FRACTION: f64 = 0.3;
const BASELINE_KM: f64 = 0.47;
const TOLERANCE: f64 = 1.0e-12;

/// Evolve a beam flux through a decaying four-state system.
#[derive(Parser, Debug)]
#[command(name = "ubflux", long_about = None)]
struct Args {
    /// Mass of the fourth state (eV)
    #[arg(default_value_t = 1.0)]
    nu4mass: f64,

    /// Mixing angle between the fourth state and the muon flavor (rad)
    #[arg(default_value_t = 1.0)]
    theta24: f64,

    /// Scalar coupling g43
    #[arg(default_value_t = 1.0)]
    coupling: f64,

    /// Flux table `E[GeV] nu_mu nubar_mu`; a falling test spectrum when absent
    #[arg(long)]
    flux: Option<PathBuf>,

    /// Directory for the output tables
    #[arg(long, default_value = "output")]
    out_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let grid = EnergyGrid::linspace(0.025 * GEV, 9.975 * GEV, 200)?;
    let baseline = BASELINE_KM * KM;
    let flags = PhysicsFlags {
        incoherent_interactions: true,
        decay_regeneration: true,
        ..Default::default()
    };
    let numerics = NumericsConfig {
        rel_error: TOLERANCE,
        abs_error: TOLERANCE,
        initial_step: Some(baseline / 2000.0),
        max_step: Some(baseline / 100.0),
        ..Default::default()
    };
    let config = DriverConfig::new(grid.clone(), 4)
        .with_flags(flags)
        .with_numerics(numerics);
    let mut driver = EvolutionDriver::new(config)?;

    let masses = vec![0.0, 7.65e-5f64.sqrt(), 0.0024f64.sqrt(), args.nu4mass];
    let mut mixing = MixingParameters::standard(4)?;
    mixing.set_mixing_angle(1, 3, args.theta24)?;
    mixing.set_square_mass_difference(3, args.nu4mass * args.nu4mass)?;
    driver.set_mixing_parameters(mixing)?;

    let mut g = DMatrix::zeros(4, 4);
    g[(3, 2)] = args.coupling;
    let mut model = DecayModel::from_couplings(masses, g, CouplingType::Scalar)?;
    model.compute_derived_terms()?;
    driver.set_decay_model(model)?;

    driver.set_body(Arc::new(ConstantDensity::new(DENSITY, ELECTRON_FRACTION)?))?;
    driver.set_track(Track::new(0.0, baseline)?)?;

    let layout = ColumnLayout::flavor_both(Flavor::Muon);
    let table = match &args.flux {
        Some(path) => FluxTable::read_from(BufReader::new(File::open(path)?))?,
        None => test_spectrum(&grid)?,
    };
    driver.set_initial_state(
        load_initial_state(&table, &layout, &grid, 4, GEV)?,
        Basis::Flavor,
    )?;

    fs::create_dir_all(&args.out_dir)?;
    let initial = store_table(&grid, &layout, GEV, |f, e, p| driver.evaluate_initial(f, e, p))?;
    write(&initial, &args.out_dir.join("ub_initial.dat"))?;

    driver.evolve()?;
    let metrics = driver.metrics();
    info!(
        accepted = metrics.accepted_steps,
        rejected = metrics.rejected_steps,
        total_us = metrics.total_us,
        "evolved"
    );

    let name = format!(
        "ub_final_m{:.3}_t{:.3}_c{:.3}.dat",
        args.nu4mass, args.theta24, args.coupling
    );
    let fin = store_table(&grid, &layout, GEV, |f, e, p| driver.evaluate(f, e, p))?;
    write(&fin, &args.out_dir.join(name))?;
    Ok(())
}

/// A falling power law on the grid, antineutrinos at a fixed fraction.
fn test_spectrum(grid: &EnergyGrid) -> Result<FluxTable, FluxError> {
    let mut text = String::new();
    for &energy in grid.nodes() {
        let e = energy / GEV;
        let nu = 1.0e-3 * e.powf(-1.7);
        text.push_str(&format!("{e} {nu:e} {:e}\n", 0.3 * nu));
    }
    FluxTable::read_from(text.as_bytes())
}

fn write(table: &FluxTable, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    table.write_to(BufWriter::new(File::create(path)?))?;
    info!(path = %path.display(), rows = table.len(), "wrote flux table");
    Ok(())
}
