//! The evolution-engine seam and the reference density-matrix engine.
//!
//! [`EvolutionDriver`](crate::EvolutionDriver) validates its collaborators
//! and hands a borrowed [`EvolutionProblem`] to whatever
//! [`EvolutionEngine`] it was built with. Engines never see partially
//! configured state.

use std::sync::Arc;

use nudecay_body::{Body, Track};
use nudecay_core::{Basis, EnergyGrid, EvolutionError, FluxState};
use nudecay_decay::RatePair;

use crate::config::{NumericsConfig, PhysicsFlags};
use crate::integrator::{integrate, IntegrationStats, OdeSystem};
use crate::mixing::MixingParameters;
use crate::system::DensityMatrixSystem;

/// Everything an engine needs for one evolution, borrowed from the driver.
///
/// The driver guarantees that the mixing parameters, rate matrices,
/// masses and initial state all describe the same number of states, that
/// the initial state has one row per grid node, and that `flags.majorana`
/// already accounts for a decay model that implies Majorana neutrinos.
#[derive(Clone, Copy)]
pub struct EvolutionProblem<'a> {
    /// Energy nodes (eV).
    pub grid: &'a EnergyGrid,
    /// Mixing angles, phases and splittings.
    pub mixing: &'a MixingParameters,
    /// CPP and CVP generators for the selected coupling type.
    pub rates: &'a RatePair,
    /// Mass of each eigenstate (eV).
    pub masses: &'a [f64],
    /// Matter profile.
    pub body: &'a dyn Body,
    /// Path through the body.
    pub track: &'a Track,
    /// Starting fluxes.
    pub initial: &'a FluxState,
    /// Basis `initial` is expressed in.
    pub basis: Basis,
    /// Effective physics toggles.
    pub flags: PhysicsFlags,
    /// Tolerances and step control.
    pub numerics: &'a NumericsConfig,
}

/// Result of a successful evolution.
#[derive(Clone, Debug, PartialEq)]
pub struct EvolvedState {
    /// Final fluxes in the flavor basis.
    pub flavor: FluxState,
    /// Final mass-eigenstate populations.
    pub mass: FluxState,
    /// Integrator counters.
    pub stats: IntegrationStats,
}

/// Integrates the combined oscillation, decay and interaction system.
///
/// Implementations must be deterministic for a given problem and must not
/// return a partial result: any failure is an [`EvolutionError`].
pub trait EvolutionEngine: Send + Sync {
    /// Short name, recorded in metrics.
    fn name(&self) -> &str;

    /// Evolve `problem.initial` from the start to the end of `problem.track`.
    fn evolve(&self, problem: &EvolutionProblem<'_>) -> Result<EvolvedState, EvolutionError>;
}

/// Engines can be shared between drivers, e.g. across atmospheric bins.
impl<E: EvolutionEngine + ?Sized> EvolutionEngine for Arc<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn evolve(&self, problem: &EvolutionProblem<'_>) -> Result<EvolvedState, EvolutionError> {
        (**self).evolve(problem)
    }
}

/// Reference engine: per-node density matrices in the interaction
/// picture, integrated with the scheme selected in the numerics.
#[derive(Clone, Copy, Debug, Default)]
pub struct DensityMatrixEngine;

impl EvolutionEngine for DensityMatrixEngine {
    fn name(&self) -> &str {
        "density-matrix"
    }

    fn evolve(&self, problem: &EvolutionProblem<'_>) -> Result<EvolvedState, EvolutionError> {
        let system = DensityMatrixSystem::new(problem);
        let mut y = system.initial_vector(problem.initial, problem.basis);
        debug_assert_eq!(y.len(), system.dim());
        let (x0, x1) = (problem.track.x_initial(), problem.track.x_final());
        let stats = integrate(&system, &mut y, x0, x1, problem.numerics)?;
        let (flavor, mass) = system.project(&y, x1);
        if !flavor.is_finite() || !mass.is_finite() {
            return Err(EvolutionError::NonFinite { position: x1 });
        }
        Ok(EvolvedState {
            flavor,
            mass,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nudecay_body::{ConstantDensity, Vacuum};
    use nudecay_core::units::{GEV, KM};
    use nudecay_core::{Flavor, Polarization};

    fn muon_flux(n_e: usize) -> FluxState {
        let mut s = FluxState::zeros(n_e, 3);
        for node in 0..n_e {
            s.set(node, Polarization::Neutrino, Flavor::Muon, 1.0);
        }
        s
    }

    #[test]
    fn engine_is_object_safe_and_send() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn EvolutionEngine>();
        let engine: Box<dyn EvolutionEngine> = Box::new(DensityMatrixEngine);
        assert_eq!(engine.name(), "density-matrix");
    }

    #[test]
    fn two_flavor_vacuum_oscillation_matches_formula() {
        // Two-state limit embedded in three states: only θ12 and Δm²21.
        let mut mixing = MixingParameters::new(3).unwrap();
        let theta = 0.5;
        let dm2 = 2.5e-3;
        mixing.set_mixing_angle(0, 1, theta).unwrap();
        mixing.set_square_mass_difference(1, dm2).unwrap();
        let grid = EnergyGrid::linspace(0.5 * GEV, 1.5 * GEV, 3).unwrap();
        let rates = RatePair::stable(3);
        let masses = [0.0, 0.05, 0.1];
        let track = Track::new(0.0, 500.0 * KM).unwrap();
        let mut initial = FluxState::zeros(3, 3);
        for node in 0..3 {
            initial.set(node, Polarization::Neutrino, Flavor::Electron, 1.0);
        }
        let numerics = NumericsConfig {
            rel_error: 1e-10,
            abs_error: 1e-12,
            ..Default::default()
        };
        let problem = EvolutionProblem {
            grid: &grid,
            mixing: &mixing,
            rates: &rates,
            masses: &masses,
            body: &Vacuum,
            track: &track,
            initial: &initial,
            basis: Basis::Flavor,
            flags: PhysicsFlags::default(),
            numerics: &numerics,
        };
        let out = DensityMatrixEngine.evolve(&problem).unwrap();
        for (node, &e) in grid.nodes().iter().enumerate() {
            let phase = dm2 * track.length() / (4.0 * e);
            let survival = 1.0 - (2.0 * theta).sin().powi(2) * phase.sin().powi(2);
            let got = out.flavor.get(node, Polarization::Neutrino, Flavor::Electron);
            assert!((got - survival).abs() < 1e-6, "node {node}: {got} vs {survival}");
        }
    }

    #[test]
    fn stable_matter_evolution_conserves_total() {
        let mixing = MixingParameters::standard(3).unwrap();
        let grid = EnergyGrid::linspace(1.0 * GEV, 2.0 * GEV, 4).unwrap();
        let rates = RatePair::stable(3);
        let masses = [0.0, 0.0087, 0.049];
        let rock = ConstantDensity::new(3.0, 0.5).unwrap();
        let track = Track::new(0.0, 300.0 * KM).unwrap();
        let initial = muon_flux(4);
        let numerics = NumericsConfig::default();
        let problem = EvolutionProblem {
            grid: &grid,
            mixing: &mixing,
            rates: &rates,
            masses: &masses,
            body: &rock,
            track: &track,
            initial: &initial,
            basis: Basis::Flavor,
            flags: PhysicsFlags::default(),
            numerics: &numerics,
        };
        let out = DensityMatrixEngine.evolve(&problem).unwrap();
        assert!(out.stats.accepted_steps > 0);
        for node in 0..4 {
            let total = out.flavor.total(node, Polarization::Neutrino);
            assert!((total - 1.0).abs() < 1e-7, "node {node}: {total}");
            assert!((out.mass.total(node, Polarization::Neutrino) - 1.0).abs() < 1e-7);
            assert_eq!(out.flavor.total(node, Polarization::Antineutrino), 0.0);
        }
    }
}
