//! Independent drivers over a grid of zenith angles.
//!
//! [`AtmosphericBinning`] owns one [`EvolutionDriver`] per (flux component,
//! zenith bin). Every bin shares one read-only [`Body`] and derives its
//! track from its own cos(zenith). Bins never exchange data, so
//! [`evolve_all()`](AtmosphericBinning::evolve_all) runs them on the rayon
//! thread pool. Queries are per bin; angular interpolation is left to the
//! caller.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use nudecay_body::{Body, BodyError};
use nudecay_core::{Basis, Flavor, FluxState, Polarization, QueryError};
use nudecay_decay::DecayModel;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::{ConfigError, DriverConfig, EvolveError};
use crate::driver::EvolutionDriver;
use crate::engine::{DensityMatrixEngine, EvolutionEngine};
use crate::metrics;
use crate::mixing::MixingParameters;

// ── BinningError ───────────────────────────────────────────────────

/// Errors from configuring, evolving or querying a binned run.
#[derive(Clone, Debug, PartialEq)]
pub enum BinningError {
    /// One bin failed to evolve.
    Evolve {
        /// Flux component of the failing bin.
        component: String,
        /// Zenith bin index (0-based).
        bin: usize,
        /// The underlying failure.
        error: EvolveError,
    },
    /// No component with this name exists.
    UnknownComponent {
        /// The requested name.
        name: String,
    },
    /// Bin index out of bounds.
    BinOutOfRange {
        /// The requested index.
        bin: usize,
        /// Number of zenith bins.
        num_bins: usize,
    },
    /// Construction arguments are unusable.
    InvalidArgument {
        /// What is wrong.
        reason: String,
    },
    /// A driver rejected its configuration.
    Config(ConfigError),
    /// The body could not derive a track for a zenith angle.
    Body(BodyError),
    /// A per-bin query failed.
    Query(QueryError),
}

impl fmt::Display for BinningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evolve {
                component,
                bin,
                error,
            } => write!(f, "component {component:?} bin {bin}: {error}"),
            Self::UnknownComponent { name } => write!(f, "unknown flux component {name:?}"),
            Self::BinOutOfRange { bin, num_bins } => {
                write!(f, "zenith bin {bin} out of range (num_bins={num_bins})")
            }
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::Body(e) => write!(f, "body error: {e}"),
            Self::Query(e) => write!(f, "query error: {e}"),
        }
    }
}

impl std::error::Error for BinningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Evolve { error, .. } => Some(error),
            Self::Config(e) => Some(e),
            Self::Body(e) => Some(e),
            Self::Query(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for BinningError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<BodyError> for BinningError {
    fn from(e: BodyError) -> Self {
        Self::Body(e)
    }
}

impl From<QueryError> for BinningError {
    fn from(e: QueryError) -> Self {
        Self::Query(e)
    }
}

// ── AtmosphericBinning ─────────────────────────────────────────────

/// One driver per (flux component, zenith bin).
pub struct AtmosphericBinning {
    body: Arc<dyn Body>,
    cos_zenith: Vec<f64>,
    components: IndexMap<String, Vec<EvolutionDriver>>,
}

impl AtmosphericBinning {
    /// Bins at `cos_zenith` for each named component, all using the
    /// reference engine.
    pub fn new(
        config: DriverConfig,
        body: Arc<dyn Body>,
        cos_zenith: Vec<f64>,
        components: &[&str],
    ) -> Result<Self, BinningError> {
        Self::with_engines(config, body, cos_zenith, components, || {
            Box::new(DensityMatrixEngine)
        })
    }

    /// Like [`new`](Self::new), with one engine per bin from `engine`.
    pub fn with_engines(
        config: DriverConfig,
        body: Arc<dyn Body>,
        cos_zenith: Vec<f64>,
        components: &[&str],
        engine: impl Fn() -> Box<dyn EvolutionEngine>,
    ) -> Result<Self, BinningError> {
        if cos_zenith.is_empty() {
            return Err(BinningError::InvalidArgument {
                reason: "at least one zenith bin is required".into(),
            });
        }
        if components.is_empty() {
            return Err(BinningError::InvalidArgument {
                reason: "at least one flux component is required".into(),
            });
        }
        let tracks = cos_zenith
            .iter()
            .map(|&cz| body.track_for_zenith(cz))
            .collect::<Result<Vec<_>, _>>()?;

        let mut map = IndexMap::with_capacity(components.len());
        for &name in components {
            let mut drivers = Vec::with_capacity(tracks.len());
            for track in &tracks {
                let mut driver = EvolutionDriver::with_engine(config.clone(), engine())?;
                driver.set_body(Arc::clone(&body))?;
                driver.set_track(track.clone())?;
                drivers.push(driver);
            }
            if map.insert(name.to_owned(), drivers).is_some() {
                return Err(BinningError::InvalidArgument {
                    reason: format!("duplicate flux component {name:?}"),
                });
            }
        }
        debug!(
            body = body.name(),
            bins = cos_zenith.len(),
            components = components.len(),
            "atmospheric binning constructed"
        );
        Ok(Self {
            body,
            cos_zenith,
            components: map,
        })
    }

    /// The shared body.
    pub fn body(&self) -> &Arc<dyn Body> {
        &self.body
    }

    /// cos(zenith) of every bin, in bin order.
    pub fn cos_zenith(&self) -> &[f64] {
        &self.cos_zenith
    }

    /// Number of zenith bins.
    pub fn num_bins(&self) -> usize {
        self.cos_zenith.len()
    }

    /// Component names, in construction order.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    fn drivers_mut(&mut self) -> impl Iterator<Item = &mut EvolutionDriver> {
        self.components.values_mut().flatten()
    }

    /// Replace the mixing description in every bin.
    pub fn set_mixing_parameters(&mut self, mixing: &MixingParameters) -> Result<(), BinningError> {
        for driver in self.drivers_mut() {
            driver.set_mixing_parameters(mixing.clone())?;
        }
        Ok(())
    }

    /// Attach a copy of `model` to every bin.
    pub fn set_decay_model(&mut self, model: &DecayModel) -> Result<(), BinningError> {
        for driver in self.drivers_mut() {
            driver.set_decay_model(model.clone())?;
        }
        Ok(())
    }

    /// Set the initial state of one bin.
    pub fn set_initial_state(
        &mut self,
        component: &str,
        bin: usize,
        state: FluxState,
        basis: Basis,
    ) -> Result<(), BinningError> {
        self.driver_mut(component, bin)?
            .set_initial_state(state, basis)?;
        Ok(())
    }

    /// Set the same initial state in every bin of one component.
    pub fn set_component_initial_state(
        &mut self,
        component: &str,
        state: &FluxState,
        basis: Basis,
    ) -> Result<(), BinningError> {
        let drivers = self
            .components
            .get_mut(component)
            .ok_or_else(|| BinningError::UnknownComponent {
                name: component.to_owned(),
            })?;
        for driver in drivers {
            driver.set_initial_state(state.clone(), basis)?;
        }
        Ok(())
    }

    /// Evolve every bin of every component in parallel.
    ///
    /// All bins run to completion even if some fail. The first failure in
    /// (component, bin) order is returned; bins that succeeded stay
    /// queryable.
    pub fn evolve_all(&mut self) -> Result<(), BinningError> {
        let start = Instant::now();
        let jobs: Vec<(&String, usize, &mut EvolutionDriver)> = self
            .components
            .iter_mut()
            .flat_map(|(name, drivers)| {
                drivers
                    .iter_mut()
                    .enumerate()
                    .map(move |(bin, driver)| (name, bin, driver))
            })
            .collect();
        let count = jobs.len();
        let results: Vec<(&String, usize, Result<(), EvolveError>)> = jobs
            .into_par_iter()
            .map(|(name, bin, driver)| (name, bin, driver.evolve()))
            .collect();
        info!(
            bins = count,
            total_us = metrics::micros(start.elapsed()),
            "atmospheric evolution finished"
        );
        for (name, bin, result) in results {
            if let Err(error) = result {
                return Err(BinningError::Evolve {
                    component: name.clone(),
                    bin,
                    error,
                });
            }
        }
        Ok(())
    }

    /// The driver for one bin.
    pub fn driver(&self, component: &str, bin: usize) -> Result<&EvolutionDriver, BinningError> {
        let drivers = self
            .components
            .get(component)
            .ok_or_else(|| BinningError::UnknownComponent {
                name: component.to_owned(),
            })?;
        drivers.get(bin).ok_or(BinningError::BinOutOfRange {
            bin,
            num_bins: self.cos_zenith.len(),
        })
    }

    fn driver_mut(
        &mut self,
        component: &str,
        bin: usize,
    ) -> Result<&mut EvolutionDriver, BinningError> {
        let num_bins = self.cos_zenith.len();
        let drivers = self
            .components
            .get_mut(component)
            .ok_or_else(|| BinningError::UnknownComponent {
                name: component.to_owned(),
            })?;
        drivers
            .get_mut(bin)
            .ok_or(BinningError::BinOutOfRange { bin, num_bins })
    }

    /// Final flavor flux of one bin at `energy` (eV).
    pub fn evaluate(
        &self,
        component: &str,
        bin: usize,
        flavor: Flavor,
        energy: f64,
        polarization: Polarization,
    ) -> Result<f64, BinningError> {
        Ok(self
            .driver(component, bin)?
            .evaluate(flavor, energy, polarization)?)
    }

    /// Final flavor flux of one bin at grid node `node`.
    pub fn evaluate_at_node(
        &self,
        component: &str,
        bin: usize,
        flavor: Flavor,
        node: usize,
        polarization: Polarization,
    ) -> Result<f64, BinningError> {
        Ok(self
            .driver(component, bin)?
            .evaluate_at_node(flavor, node, polarization)?)
    }

    /// Final flavor flux at `energy` for every bin of one component, in
    /// bin order.
    pub fn evaluate_all_bins(
        &self,
        component: &str,
        flavor: Flavor,
        energy: f64,
        polarization: Polarization,
    ) -> Result<Vec<f64>, BinningError> {
        (0..self.num_bins())
            .map(|bin| self.evaluate(component, bin, flavor, energy, polarization))
            .collect()
    }
}
