//! Per-evolution performance metrics.
//!
//! [`EvolutionMetrics`] captures timing and integrator counters for a
//! single `evolve()` call.

use std::time::Duration;

use crate::integrator::IntegrationStats;

/// Whole microseconds in `elapsed`, saturating at `u64::MAX`.
pub(crate) fn micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}

/// Timing and step counters collected during one evolution.
///
/// Durations are in microseconds. The driver populates these after a
/// successful `evolve()`; a failed evolution leaves them at their previous
/// values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvolutionMetrics {
    /// Wall-clock time for the whole evolution, in microseconds.
    pub total_us: u64,
    /// Steps accepted by the integrator.
    pub accepted_steps: u64,
    /// Steps rejected by error control.
    pub rejected_steps: u64,
    /// Right-hand-side evaluations.
    pub derivative_evaluations: u64,
    /// Size of the last accepted step, in eV⁻¹.
    pub last_step: f64,
    /// Name of the engine that ran.
    pub engine: String,
}

impl EvolutionMetrics {
    pub(crate) fn record(engine: &str, stats: &IntegrationStats, total_us: u64) -> Self {
        Self {
            total_us,
            accepted_steps: stats.accepted_steps,
            rejected_steps: stats.rejected_steps,
            derivative_evaluations: stats.derivative_evaluations,
            last_step: stats.last_step,
            engine: engine.to_owned(),
        }
    }
}
