//! Core types for the nudecay neutrino flux simulation workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other crate: flavor and polarization
//! tags, the energy grid, the flux state tensor, natural units, and the
//! error taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod flavor;
pub mod grid;
pub mod state;
pub mod units;

pub use error::{DecayError, EvolutionError, GridError, QueryError};
pub use flavor::{Basis, CouplingType, Flavor, Polarization};
pub use grid::EnergyGrid;
pub use state::FluxState;

/// Largest number of mass states supported by the workspace.
pub const MAX_MASS_STATES: usize = 6;
