//! Reusable engine test fixtures.
//!
//! - [`IdentityEngine`] returns the initial flux unchanged.
//! - [`FailingEngine`] fails deterministically with a given error.

use std::sync::atomic::{AtomicUsize, Ordering};

use nudecay_core::EvolutionError;
use nudecay_engine::{EvolutionEngine, EvolutionProblem, EvolvedState, IntegrationStats};

/// Returns the initial state as both the final flavor flux and the final
/// mass populations.
///
/// Useful for testing driver plumbing without numerics: queries after
/// `evolve()` must reproduce the initial flux exactly.
#[derive(Default)]
pub struct IdentityEngine {
    call_count: AtomicUsize,
}

impl IdentityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `evolve()` has been called.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl EvolutionEngine for IdentityEngine {
    fn name(&self) -> &str {
        "identity"
    }

    fn evolve(&self, problem: &EvolutionProblem<'_>) -> Result<EvolvedState, EvolutionError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Ok(EvolvedState {
            flavor: problem.initial.clone(),
            mass: problem.initial.clone(),
            stats: IntegrationStats::default(),
        })
    }
}

/// Fails every call with a fixed error.
///
/// Useful for checking that numerical failures surface through the driver
/// and binning layers without leaving a result behind.
pub struct FailingEngine {
    pub error: EvolutionError,
    call_count: AtomicUsize,
}

impl FailingEngine {
    pub fn new(error: EvolutionError) -> Self {
        Self {
            error,
            call_count: AtomicUsize::new(0),
        }
    }

    /// An engine that reports a step-size underflow at the track start.
    pub fn underflow() -> Self {
        Self::new(EvolutionError::StepSizeUnderflow {
            position: 0.0,
            step: 0.0,
        })
    }

    /// How many times `evolve()` has been called.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl EvolutionEngine for FailingEngine {
    fn name(&self) -> &str {
        "failing"
    }

    fn evolve(&self, _problem: &EvolutionProblem<'_>) -> Result<EvolvedState, EvolutionError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Err(self.error.clone())
    }
}
