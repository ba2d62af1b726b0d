//! Matter-density bodies and propagation tracks for nudecay simulations.
//!
//! This crate defines the [`Body`] trait, the abstraction through which
//! the evolution engine queries the matter a neutrino traverses, along
//! with the [`Track`] describing the path itself.
//!
//! # Bodies
//!
//! - [`Vacuum`]: no matter anywhere
//! - [`ConstantDensity`]: uniform density and electron fraction
//! - [`EarthAtm`]: layered Earth (PREM) plus an atmosphere shell, with
//!   zenith-derived tracks

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod body;
pub mod constant;
pub mod earth;
pub mod error;
pub mod track;
pub mod vacuum;

#[cfg(test)]
pub(crate) mod compliance;

pub use body::{Body, MatterSample};
pub use constant::ConstantDensity;
pub use earth::EarthAtm;
pub use error::BodyError;
pub use track::Track;
pub use vacuum::Vacuum;
