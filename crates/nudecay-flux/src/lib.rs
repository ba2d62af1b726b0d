//! Flux tables and flux-state loading for nudecay simulations.
//!
//! A flux table is plain text: one row per energy node, the energy first,
//! then one value per (flavor, polarization) column in a caller-known
//! order. Blank lines and lines starting with `#` are ignored.
//!
//! # Architecture
//!
//! - [`FluxTable`] parses from any `BufRead` and writes to any `Write`
//! - [`ColumnLayout`] names the (flavor, polarization) of each value column
//! - [`load_initial_state`] turns a table into a zero-filled
//!   [`FluxState`](nudecay_core::FluxState) populated at the listed slots
//! - [`store_table`] tabulates an evaluation function over the grid
//!
//! ```text
//! # E      nu_mu     nubar_mu
//! 2.5e7    1.2e-3    4.0e-4
//! 7.5e7    9.8e-4    3.1e-4
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod io;
pub mod layout;
pub mod table;

pub use error::FluxError;
pub use io::{load_initial_state, store_table};
pub use layout::{ColumnLayout, FluxColumn};
pub use table::{FluxRow, FluxTable};
