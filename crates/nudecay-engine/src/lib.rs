//! Evolution driver and reference engine for decaying-neutrino fluxes.
//!
//! [`EvolutionDriver`] validates its collaborators (mixing parameters, a
//! [`DecayModel`](nudecay_decay::DecayModel), a body and track, an initial
//! flux) and hands them to an [`EvolutionEngine`]. The bundled
//! [`DensityMatrixEngine`] integrates per-node density matrices with
//! oscillation, matter effects, decay, absorption and regeneration.
//! [`AtmosphericBinning`] runs many independent drivers over zenith bins in
//! parallel.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod atmospheric;
pub mod config;
pub mod driver;
pub mod engine;
pub mod integrator;
pub mod metrics;
pub mod mixing;
mod system;

pub use atmospheric::{AtmosphericBinning, BinningError};
pub use config::{
    ConfigError, DriverConfig, EvolveError, IntegratorScheme, NumericsConfig, PhysicsFlags,
};
pub use driver::{DriverPhase, EvolutionDriver};
pub use engine::{DensityMatrixEngine, EvolutionEngine, EvolutionProblem, EvolvedState};
pub use integrator::IntegrationStats;
pub use metrics::EvolutionMetrics;
pub use mixing::MixingParameters;
