//! nudecay: propagation of decaying, oscillating neutrino fluxes through matter.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all nudecay sub-crates. Most users only need this one dependency.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use nudecay::prelude::*;
//! use nudecay::types::units::{GEV, KM};
//!
//! let grid = EnergyGrid::linspace(1.0 * GEV, 2.0 * GEV, 3).unwrap();
//! let mut driver = EvolutionDriver::new(DriverConfig::new(grid, 3)).unwrap();
//!
//! let mut model = DecayModel::stable(vec![0.0, 0.0087, 0.0497]).unwrap();
//! model.compute_derived_terms().unwrap();
//! driver.set_decay_model(model).unwrap();
//! driver.set_body(Arc::new(Vacuum)).unwrap();
//! driver.set_track(Track::new(0.0, 300.0 * KM).unwrap()).unwrap();
//!
//! let mut flux = FluxState::zeros(3, 3);
//! for node in 0..3 {
//!     flux.set(node, Polarization::Neutrino, Flavor::Muon, 1.0);
//! }
//! driver.set_initial_state(flux, Basis::Flavor).unwrap();
//! driver.evolve().unwrap();
//!
//! let survival = driver
//!     .evaluate(Flavor::Muon, 1.5 * GEV, Polarization::Neutrino)
//!     .unwrap();
//! assert!(survival > 0.0 && survival < 1.0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `nudecay-core` | flavors, polarizations, energy grid, flux tensor, units, errors |
//! | [`body`] | `nudecay-body` | matter profiles and tracks |
//! | [`decay`] | `nudecay-decay` | lifetime and coupling inputs, rate matrices, decay models |
//! | [`flux`] | `nudecay-flux` | flux tables and initial-state loading |
//! | [`engine`] | `nudecay-engine` | mixing, evolution driver, reference engine, zenith binning |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, units and errors (`nudecay-core`).
///
/// Contains [`types::Flavor`], [`types::Polarization`],
/// [`types::EnergyGrid`], [`types::FluxState`] and the natural-unit
/// constants in [`types::units`].
pub use nudecay_core as types;

/// Matter profiles (`nudecay-body`).
///
/// The [`body::Body`] trait and its implementations: [`body::Vacuum`],
/// [`body::ConstantDensity`] and [`body::EarthAtm`].
pub use nudecay_body as body;

/// Decay inputs and rate matrices (`nudecay-decay`).
///
/// Build a [`decay::DecayModel`] from lifetimes, explicit rate matrices or
/// a coupling matrix, then call
/// [`decay::DecayModel::compute_derived_terms`].
pub use nudecay_decay as decay;

/// Flux tables (`nudecay-flux`).
///
/// Read a [`flux::FluxTable`], load it with [`flux::load_initial_state`],
/// and tabulate results with [`flux::store_table`].
pub use nudecay_flux as flux;

/// Evolution (`nudecay-engine`).
///
/// [`engine::EvolutionDriver`] for a single track,
/// [`engine::AtmosphericBinning`] for many zenith bins in parallel.
pub use nudecay_engine as engine;

/// Common imports for typical nudecay usage.
///
/// ```rust
/// use nudecay::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use nudecay_core::{
        Basis, CouplingType, EnergyGrid, Flavor, FluxState, Polarization,
    };

    // Errors
    pub use nudecay_core::{DecayError, EvolutionError, GridError, QueryError};

    // Bodies
    pub use nudecay_body::{Body, BodyError, ConstantDensity, EarthAtm, Track, Vacuum};

    // Decay
    pub use nudecay_decay::{DecayModel, LifetimeMatrix, RatePair};

    // Flux tables
    pub use nudecay_flux::{load_initial_state, store_table, ColumnLayout, FluxError, FluxTable};

    // Engine
    pub use nudecay_engine::{
        AtmosphericBinning, BinningError, ConfigError, DriverConfig, EvolutionDriver,
        EvolutionMetrics, EvolveError, IntegratorScheme, MixingParameters, NumericsConfig,
        PhysicsFlags,
    };
}
