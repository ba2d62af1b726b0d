//! Explicit Runge-Kutta integrators for real-valued ODE systems.
//!
//! The adaptive scheme is Runge-Kutta-Fehlberg 4(5), propagating the
//! fifth-order solution. The error norm is the largest component of
//! `|err_i| / (abs_error + rel_error · |y_i|)`; a step is accepted when it
//! does not exceed one.

use nudecay_core::EvolutionError;

use crate::config::{IntegratorScheme, NumericsConfig};

/// A first-order system `dy/dx = f(x, y)`.
pub trait OdeSystem {
    /// Length of the state vector.
    fn dim(&self) -> usize;

    /// Write `f(x, y)` into `dydx`.
    fn derivative(&self, x: f64, y: &[f64], dydx: &mut [f64]);
}

/// Counters from one integration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntegrationStats {
    /// Steps accepted.
    pub accepted_steps: u64,
    /// Steps rejected by error control.
    pub rejected_steps: u64,
    /// Calls to [`OdeSystem::derivative`].
    pub derivative_evaluations: u64,
    /// Size of the last accepted step.
    pub last_step: f64,
}

// ── Fehlberg tableau ───────────────────────────────────────────────

const C: [f64; 6] = [0.0, 0.25, 0.375, 12.0 / 13.0, 1.0, 0.5];
const A: [[f64; 5]; 6] = [
    [0.0, 0.0, 0.0, 0.0, 0.0],
    [0.25, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 32.0, 9.0 / 32.0, 0.0, 0.0, 0.0],
    [1932.0 / 2197.0, -7200.0 / 2197.0, 7296.0 / 2197.0, 0.0, 0.0],
    [439.0 / 216.0, -8.0, 3680.0 / 513.0, -845.0 / 4104.0, 0.0],
    [-8.0 / 27.0, 2.0, -3544.0 / 2565.0, 1859.0 / 4104.0, -11.0 / 40.0],
];
const B5: [f64; 6] = [
    16.0 / 135.0,
    0.0,
    6656.0 / 12825.0,
    28561.0 / 56430.0,
    -9.0 / 50.0,
    2.0 / 55.0,
];
const B4: [f64; 6] = [
    25.0 / 216.0,
    0.0,
    1408.0 / 2565.0,
    2197.0 / 4104.0,
    -1.0 / 5.0,
    0.0,
];

const SAFETY: f64 = 0.9;
const MAX_GROWTH: f64 = 5.0;
const MIN_GROWTH: f64 = 0.2;
const MAX_SHRINK: f64 = 0.1;

/// Integrate `system` from `x0` to `x1` in place, using the scheme and
/// tolerances in `numerics`.
pub fn integrate<S: OdeSystem + ?Sized>(
    system: &S,
    y: &mut [f64],
    x0: f64,
    x1: f64,
    numerics: &NumericsConfig,
) -> Result<IntegrationStats, EvolutionError> {
    if y.iter().any(|v| !v.is_finite()) {
        return Err(EvolutionError::NonFinite { position: x0 });
    }
    if x1 <= x0 {
        return Ok(IntegrationStats::default());
    }
    match numerics.scheme {
        IntegratorScheme::Rkf45 => rkf45(system, y, x0, x1, numerics),
        IntegratorScheme::Rk4 => rk4(system, y, x0, x1, numerics),
    }
}

fn rkf45<S: OdeSystem + ?Sized>(
    system: &S,
    y: &mut [f64],
    x0: f64,
    x1: f64,
    numerics: &NumericsConfig,
) -> Result<IntegrationStats, EvolutionError> {
    let n = y.len();
    let length = x1 - x0;
    let max_step = numerics.max_step.unwrap_or(length);
    let mut h = numerics
        .initial_step
        .unwrap_or(length / 100.0)
        .min(max_step);
    let mut k = vec![vec![0.0; n]; 6];
    let mut stage = vec![0.0; n];
    let mut y5 = vec![0.0; n];
    let mut stats = IntegrationStats::default();
    let mut x = x0;

    while x < x1 {
        if stats.accepted_steps + stats.rejected_steps >= numerics.max_steps {
            return Err(EvolutionError::MaxStepsExceeded {
                steps: numerics.max_steps,
                position: x,
            });
        }
        let last = x + h >= x1;
        if last {
            h = x1 - x;
        }

        for s in 0..6 {
            for i in 0..n {
                let mut acc = y[i];
                for (r, a) in A[s].iter().enumerate().take(s) {
                    acc += h * a * k[r][i];
                }
                stage[i] = acc;
            }
            system.derivative(x + C[s] * h, &stage, &mut k[s]);
        }
        stats.derivative_evaluations += 6;

        let mut ratio: f64 = 0.0;
        let mut finite = true;
        for i in 0..n {
            let mut hi = 0.0;
            let mut lo = 0.0;
            for s in 0..6 {
                hi += B5[s] * k[s][i];
                lo += B4[s] * k[s][i];
            }
            y5[i] = y[i] + h * hi;
            if !y5[i].is_finite() {
                finite = false;
                break;
            }
            let err = (h * (hi - lo)).abs();
            let tol = numerics.abs_error + numerics.rel_error * y[i].abs().max(y5[i].abs());
            let r = if tol > 0.0 {
                err / tol
            } else if err > 0.0 {
                f64::INFINITY
            } else {
                0.0
            };
            ratio = ratio.max(r);
        }

        if finite && ratio <= 1.0 {
            y.copy_from_slice(&y5);
            x = if last { x1 } else { x + h };
            stats.accepted_steps += 1;
            stats.last_step = h;
            let growth = if ratio == 0.0 {
                MAX_GROWTH
            } else {
                (SAFETY * ratio.powf(-0.2)).clamp(MIN_GROWTH, MAX_GROWTH)
            };
            h = (h * growth).min(max_step);
        } else {
            stats.rejected_steps += 1;
            let shrink = if finite {
                (SAFETY * ratio.powf(-0.25)).max(MAX_SHRINK)
            } else {
                MAX_SHRINK
            };
            h *= shrink;
            if h <= numerics.min_step || x + h == x {
                return Err(if finite {
                    EvolutionError::StepSizeUnderflow { position: x, step: h }
                } else {
                    EvolutionError::NonFinite { position: x }
                });
            }
        }
    }
    Ok(stats)
}

fn rk4<S: OdeSystem + ?Sized>(
    system: &S,
    y: &mut [f64],
    x0: f64,
    x1: f64,
    numerics: &NumericsConfig,
) -> Result<IntegrationStats, EvolutionError> {
    let n = y.len();
    let length = x1 - x0;
    let h0 = numerics.initial_step.unwrap_or(length / 100.0);
    let steps = (length / h0).ceil().max(1.0);
    if steps > numerics.max_steps as f64 {
        return Err(EvolutionError::MaxStepsExceeded {
            steps: numerics.max_steps,
            position: x0,
        });
    }
    let steps = steps as u64;
    let h = length / steps as f64;
    let mut k1 = vec![0.0; n];
    let mut k2 = vec![0.0; n];
    let mut k3 = vec![0.0; n];
    let mut k4 = vec![0.0; n];
    let mut tmp = vec![0.0; n];
    let mut stats = IntegrationStats::default();

    for step in 0..steps {
        let x = x0 + step as f64 * h;
        system.derivative(x, y, &mut k1);
        for i in 0..n {
            tmp[i] = y[i] + 0.5 * h * k1[i];
        }
        system.derivative(x + 0.5 * h, &tmp, &mut k2);
        for i in 0..n {
            tmp[i] = y[i] + 0.5 * h * k2[i];
        }
        system.derivative(x + 0.5 * h, &tmp, &mut k3);
        for i in 0..n {
            tmp[i] = y[i] + h * k3[i];
        }
        system.derivative(x + h, &tmp, &mut k4);
        for i in 0..n {
            y[i] += h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
        }
        stats.derivative_evaluations += 4;
        stats.accepted_steps += 1;
        stats.last_step = h;
        if y.iter().any(|v| !v.is_finite()) {
            return Err(EvolutionError::NonFinite { position: x + h });
        }
    }
    Ok(stats)
}
