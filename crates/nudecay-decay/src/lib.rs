//! Decay rate matrices and decay models for nudecay simulations.
//!
//! Decay enters the evolution as four generator matrices, one per
//! [`ProcessClass`] (chirality-preserving or chirality-violating, scalar
//! or pseudoscalar coupling). They are built by a single routine,
//! [`build_rate_matrix`], from either explicit mean lifetimes or a
//! lagrangian coupling matrix, and are never summed.
//!
//! A [`DecayModel`] owns the masses and the chosen configuration path.
//! [`DecayModel::compute_derived_terms`] must run after the last setter;
//! the resulting [`DecayTerms`] are what the evolution engine consumes.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod coupling;
pub mod lifetime;
pub mod model;
pub mod process;
pub mod rate;

pub use lifetime::{LifetimeMatrix, STABLE_LIFETIME};
pub use model::{DecayModel, DecayTerms, RatePair};
pub use process::{Chirality, ProcessClass};
pub use rate::{build_rate_matrix, RateMatrix};
