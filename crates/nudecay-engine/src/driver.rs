//! The stateful evolution driver.
//!
//! [`EvolutionDriver`] collects its collaborators (mixing parameters, decay
//! model, body, track and initial flux), validates them as a whole, hands
//! them to an [`EvolutionEngine`] and answers flux queries on the result.
//!
//! # Lifecycle
//!
//! ```text
//! Constructed ──(model, body, track, initial state)──▶ Configured ──evolve()──▶ Evolved
//! ```
//!
//! There is no way back: once evolved, every setter returns
//! [`ConfigError::AlreadyEvolved`]. A failed `evolve()` leaves the driver
//! configured with no result, so queries keep failing with
//! [`QueryError::NotEvolved`].

use std::sync::Arc;
use std::time::Instant;

use nudecay_body::{Body, Track};
use nudecay_core::{Basis, EnergyGrid, Flavor, FluxState, Polarization, QueryError};
use nudecay_decay::DecayModel;
use tracing::{debug, info};

use crate::config::{ConfigError, DriverConfig, EvolveError};
use crate::engine::{DensityMatrixEngine, EvolutionEngine, EvolutionProblem, EvolvedState};
use crate::metrics::{self, EvolutionMetrics};
use crate::mixing::MixingParameters;

// Compile-time assertion: drivers can be moved to worker threads.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<EvolutionDriver>();
    }
};

/// Where a driver is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverPhase {
    /// At least one of decay model, body, track or initial state is missing.
    Constructed,
    /// Every collaborator is set; `evolve()` may run.
    Configured,
    /// Evolution succeeded; queries are valid.
    Evolved,
}

/// Evolves one initial flux along one track.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use nudecay_body::{Track, Vacuum};
/// use nudecay_core::units::{GEV, KM};
/// use nudecay_core::{Basis, EnergyGrid, Flavor, FluxState, Polarization, QueryError};
/// use nudecay_decay::DecayModel;
/// use nudecay_engine::{DriverConfig, DriverPhase, EvolutionDriver};
///
/// let grid = EnergyGrid::linspace(1.0 * GEV, 2.0 * GEV, 3).unwrap();
/// let mut driver = EvolutionDriver::new(DriverConfig::new(grid, 3)).unwrap();
///
/// let mut model = DecayModel::stable(vec![0.0, 0.0087, 0.049]).unwrap();
/// model.compute_derived_terms().unwrap();
/// driver.set_decay_model(model).unwrap();
/// driver.set_body(Arc::new(Vacuum)).unwrap();
/// driver.set_track(Track::new(0.0, 10.0 * KM).unwrap()).unwrap();
///
/// let mut flux = FluxState::zeros(3, 3);
/// flux.set(0, Polarization::Neutrino, Flavor::Muon, 1.0);
/// driver.set_initial_state(flux, Basis::Flavor).unwrap();
/// assert_eq!(driver.phase(), DriverPhase::Configured);
/// assert_eq!(
///     driver.evaluate(Flavor::Muon, 1.0 * GEV, Polarization::Neutrino),
///     Err(QueryError::NotEvolved)
/// );
///
/// driver.evolve().unwrap();
/// let total: f64 = [Flavor::Electron, Flavor::Muon, Flavor::Tau]
///     .into_iter()
///     .map(|f| driver.evaluate_at_node(f, 0, Polarization::Neutrino).unwrap())
///     .sum();
/// assert!((total - 1.0).abs() < 1e-6);
/// ```
pub struct EvolutionDriver {
    config: DriverConfig,
    engine: Box<dyn EvolutionEngine>,
    mixing: MixingParameters,
    decay: Option<DecayModel>,
    body: Option<Arc<dyn Body>>,
    track: Option<Track>,
    initial: Option<(FluxState, Basis)>,
    evolved: Option<EvolvedState>,
    metrics: EvolutionMetrics,
}

impl EvolutionDriver {
    /// A driver using the reference [`DensityMatrixEngine`].
    ///
    /// Mixing starts at the standard three-flavor values with any extra
    /// states unmixed.
    pub fn new(config: DriverConfig) -> Result<Self, ConfigError> {
        Self::with_engine(config, Box::new(DensityMatrixEngine))
    }

    /// A driver using a caller-supplied engine.
    pub fn with_engine(
        config: DriverConfig,
        engine: Box<dyn EvolutionEngine>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mixing = MixingParameters::standard(config.num_neu)?;
        debug!(
            nodes = config.grid.len(),
            states = config.num_neu,
            engine = engine.name(),
            "driver constructed"
        );
        Ok(Self {
            config,
            engine,
            mixing,
            decay: None,
            body: None,
            track: None,
            initial: None,
            evolved: None,
            metrics: EvolutionMetrics::default(),
        })
    }

    /// The configuration the driver was built with.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// The energy grid.
    pub fn grid(&self) -> &EnergyGrid {
        &self.config.grid
    }

    /// Number of mass states.
    pub fn num_neu(&self) -> usize {
        self.config.num_neu
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> DriverPhase {
        if self.evolved.is_some() {
            DriverPhase::Evolved
        } else if self.decay.is_some()
            && self.body.is_some()
            && self.track.is_some()
            && self.initial.is_some()
        {
            DriverPhase::Configured
        } else {
            DriverPhase::Constructed
        }
    }

    fn check_mutable(&self) -> Result<(), ConfigError> {
        if self.evolved.is_some() {
            return Err(ConfigError::AlreadyEvolved);
        }
        Ok(())
    }

    fn check_dimension(&self, what: &'static str, found: usize) -> Result<(), ConfigError> {
        if found != self.config.num_neu {
            return Err(ConfigError::DimensionMismatch {
                what,
                expected: self.config.num_neu,
                found,
            });
        }
        Ok(())
    }

    // ── Setters ────────────────────────────────────────────────────

    /// Replace the mixing description. Values are taken as-is.
    pub fn set_mixing_parameters(&mut self, mixing: MixingParameters) -> Result<(), ConfigError> {
        self.check_mutable()?;
        self.check_dimension("mixing parameters", mixing.num_neu())?;
        self.mixing = mixing;
        Ok(())
    }

    /// Set one mixing angle θᵢⱼ (rad).
    pub fn set_mixing_angle(&mut self, i: usize, j: usize, theta: f64) -> Result<(), ConfigError> {
        self.check_mutable()?;
        self.mixing.set_mixing_angle(i, j, theta)
    }

    /// Set one CP phase δᵢⱼ (rad).
    pub fn set_cp_phase(&mut self, i: usize, j: usize, delta: f64) -> Result<(), ConfigError> {
        self.check_mutable()?;
        self.mixing.set_cp_phase(i, j, delta)
    }

    /// Set one squared-mass splitting Δm²ₖ₁ (eV²).
    pub fn set_square_mass_difference(&mut self, k: usize, dm2: f64) -> Result<(), ConfigError> {
        self.check_mutable()?;
        self.mixing.set_square_mass_difference(k, dm2)
    }

    /// The current mixing description.
    pub fn mixing_parameters(&self) -> &MixingParameters {
        &self.mixing
    }

    /// Attach the decay model. Its derived terms must be computed before
    /// `evolve()`.
    pub fn set_decay_model(&mut self, model: DecayModel) -> Result<(), ConfigError> {
        self.check_mutable()?;
        self.check_dimension("decay model", model.num_states())?;
        self.decay = Some(model);
        debug!("decay model attached");
        Ok(())
    }

    /// The attached decay model, if any.
    pub fn decay_model(&self) -> Option<&DecayModel> {
        self.decay.as_ref()
    }

    /// Attach the matter profile. Bodies are shared read-only.
    pub fn set_body(&mut self, body: Arc<dyn Body>) -> Result<(), ConfigError> {
        self.check_mutable()?;
        debug!(body = body.name(), "body attached");
        self.body = Some(body);
        Ok(())
    }

    /// Attach the propagation path.
    pub fn set_track(&mut self, track: Track) -> Result<(), ConfigError> {
        self.check_mutable()?;
        debug!(length = track.length(), "track attached");
        self.track = Some(track);
        Ok(())
    }

    /// The attached track, if any.
    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    /// Set the starting flux, expressed in `basis`.
    ///
    /// The tensor must have shape `(nodes, 2, num_neu)` and be finite.
    pub fn set_initial_state(&mut self, state: FluxState, basis: Basis) -> Result<(), ConfigError> {
        self.check_mutable()?;
        let expected = (self.config.grid.len(), 2, self.config.num_neu);
        if state.shape() != expected {
            return Err(ConfigError::StateShapeMismatch {
                expected,
                found: state.shape(),
            });
        }
        if !state.is_finite() {
            return Err(ConfigError::NonFiniteInitialState);
        }
        self.initial = Some((state, basis));
        Ok(())
    }

    // ── Evolution ──────────────────────────────────────────────────

    /// Integrate the initial flux along the track.
    ///
    /// Blocks until the engine finishes. On failure nothing is stored and
    /// the driver stays configured, so `evolve` may be called again.
    pub fn evolve(&mut self) -> Result<(), EvolveError> {
        self.check_mutable()?;
        let model = self
            .decay
            .as_ref()
            .ok_or(ConfigError::MissingCollaborator { what: "decay model" })?;
        let body = self
            .body
            .as_deref()
            .ok_or(ConfigError::MissingCollaborator { what: "body" })?;
        let track = self
            .track
            .as_ref()
            .ok_or(ConfigError::MissingCollaborator { what: "track" })?;
        let (initial, basis) = self
            .initial
            .as_ref()
            .ok_or(ConfigError::MissingCollaborator {
                what: "initial state",
            })?;

        let terms = model.terms()?;
        let mut flags = self.config.flags;
        if let Some(pinned) = terms.pinned_coupling() {
            if pinned != flags.coupling {
                return Err(ConfigError::CouplingTypeMismatch {
                    configured: flags.coupling,
                    model: pinned,
                }
                .into());
            }
        }
        flags.majorana |= terms.implies_majorana();
        let rates = terms.require_pair(flags.coupling)?;

        let problem = EvolutionProblem {
            grid: &self.config.grid,
            mixing: &self.mixing,
            rates,
            masses: terms.masses(),
            body,
            track,
            initial,
            basis: *basis,
            flags,
            numerics: &self.config.numerics,
        };

        info!(
            engine = self.engine.name(),
            body = body.name(),
            nodes = self.config.grid.len(),
            states = self.config.num_neu,
            majorana = flags.majorana,
            "evolution started"
        );
        let start = Instant::now();
        let state = self.engine.evolve(&problem)?;
        let total_us = metrics::micros(start.elapsed());
        self.metrics = EvolutionMetrics::record(self.engine.name(), &state.stats, total_us);
        info!(
            accepted = state.stats.accepted_steps,
            rejected = state.stats.rejected_steps,
            total_us,
            "evolution finished"
        );
        self.evolved = Some(state);
        Ok(())
    }

    /// Metrics of the last successful evolution.
    pub fn metrics(&self) -> &EvolutionMetrics {
        &self.metrics
    }

    /// The full evolved state, once available.
    pub fn evolved_state(&self) -> Option<&EvolvedState> {
        self.evolved.as_ref()
    }

    // ── Queries ────────────────────────────────────────────────────

    fn check_flavor(&self, flavor: Flavor) -> Result<(), QueryError> {
        if flavor.index() >= self.config.num_neu {
            return Err(QueryError::FlavorOutOfRange {
                flavor,
                num_neu: self.config.num_neu,
            });
        }
        Ok(())
    }

    fn check_node(&self, node: usize) -> Result<(), QueryError> {
        let len = self.config.grid.len();
        if node >= len {
            return Err(QueryError::NodeOutOfRange { index: node, len });
        }
        Ok(())
    }

    fn result(&self) -> Result<&EvolvedState, QueryError> {
        self.evolved.as_ref().ok_or(QueryError::NotEvolved)
    }

    /// Final flavor flux at `energy` (eV), linearly interpolated between
    /// grid nodes. Exact node energies return the stored node value.
    pub fn evaluate(
        &self,
        flavor: Flavor,
        energy: f64,
        polarization: Polarization,
    ) -> Result<f64, QueryError> {
        let state = self.result()?;
        self.check_flavor(flavor)?;
        interpolate(&self.config.grid, energy, |node| {
            state.flavor.get(node, polarization, flavor)
        })
    }

    /// Final flavor flux at grid node `node`.
    pub fn evaluate_at_node(
        &self,
        flavor: Flavor,
        node: usize,
        polarization: Polarization,
    ) -> Result<f64, QueryError> {
        let state = self.result()?;
        self.check_flavor(flavor)?;
        self.check_node(node)?;
        Ok(state.flavor.get(node, polarization, flavor))
    }

    /// Final population of mass eigenstate `state` at grid node `node`.
    pub fn evaluate_mass_at_node(
        &self,
        state: usize,
        node: usize,
        polarization: Polarization,
    ) -> Result<f64, QueryError> {
        let result = self.result()?;
        if state >= self.config.num_neu {
            return Err(QueryError::StateOutOfRange {
                state,
                num_neu: self.config.num_neu,
            });
        }
        self.check_node(node)?;
        Ok(result.mass.get_state(node, polarization, state).unwrap_or(0.0))
    }

    /// Initial flavor flux at `energy` (eV), interpolated like
    /// [`evaluate`](Self::evaluate).
    ///
    /// Valid as soon as an initial state is set. A mass-basis initial state
    /// is reported as the incoherent flavor content `Σᵢ |U_αi|² φᵢ`.
    pub fn evaluate_initial(
        &self,
        flavor: Flavor,
        energy: f64,
        polarization: Polarization,
    ) -> Result<f64, QueryError> {
        let (state, basis) = self.initial.as_ref().ok_or(QueryError::NoInitialState)?;
        self.check_flavor(flavor)?;
        match basis {
            Basis::Flavor => interpolate(&self.config.grid, energy, |node| {
                state.get(node, polarization, flavor)
            }),
            Basis::Mass => {
                let u = self.mixing.mixing_matrix();
                let alpha = flavor.index();
                interpolate(&self.config.grid, energy, |node| {
                    (0..self.config.num_neu)
                        .map(|i| {
                            u[(alpha, i)].norm_sqr()
                                * state.get_state(node, polarization, i).unwrap_or(0.0)
                        })
                        .sum()
                })
            }
        }
    }
}

/// Linear interpolation of a node-indexed quantity, with exact nodes
/// short-circuited.
fn interpolate(
    grid: &EnergyGrid,
    energy: f64,
    value: impl Fn(usize) -> f64,
) -> Result<f64, QueryError> {
    if let Some(node) = grid.exact_node(energy) {
        return Ok(value(node));
    }
    let (i, t) = grid.bracket(energy).ok_or(QueryError::EnergyOutOfRange {
        energy,
        min: grid.min(),
        max: grid.max(),
    })?;
    Ok((1.0 - t) * value(i) + t * value(i + 1))
}
