//! The density-matrix ODE integrated by [`DensityMatrixEngine`](crate::DensityMatrixEngine).
//!
//! One Hermitian `N×N` density matrix per (energy node, polarization), in
//! the mass basis and the interaction picture of the vacuum Hamiltonian
//! `H0 = diag(Δm²ₐ₁ / 2E)`. Each matrix is packed into `N²` reals: the
//! diagonal first, then the real and imaginary parts of every `a < b`
//! entry. The lower triangle is implied by hermiticity.
//!
//! The right-hand side is
//!
//! ```text
//! dρ̃/dx = -i[H̃₁, ρ̃] - ½{Γ, ρ̃} - ½{Ã, ρ̃} + R
//! ```
//!
//! with `H₁` the matter potential, `Γ` the diagonal lab-frame decay widths,
//! `A` the nucleon absorption of active flavors and `R` the regeneration
//! of lighter states from decays at higher energies.

use nalgebra::Complex;
use nudecay_body::{Body, Track};
use nudecay_core::units::{charged_current_potential, neutral_current_potential, AVOGADRO, CM, GEV};
use nudecay_core::{Basis, EnergyGrid, Flavor, FluxState, Polarization};
use nudecay_decay::RatePair;

use crate::engine::EvolutionProblem;
use crate::integrator::OdeSystem;

type C64 = Complex<f64>;

/// Neutrino-nucleon total cross-section per unit energy (cm²/GeV).
const NU_CROSS_SECTION: f64 = 0.886e-38;
/// Antineutrino-nucleon total cross-section per unit energy (cm²/GeV).
const NUBAR_CROSS_SECTION: f64 = 0.412e-38;

/// Number of flavors that feel the matter potential and absorption.
const ACTIVE_FLAVORS: usize = 3;

const POLARIZATIONS: [Polarization; 2] = [Polarization::Neutrino, Polarization::Antineutrino];

pub(crate) struct DensityMatrixSystem<'a> {
    n: usize,
    energies: Vec<f64>,
    /// `Δm²ₐ₁ / 2E` per (node, state).
    omega: Vec<f64>,
    /// Lab-frame total width per (node, state).
    widths: Vec<f64>,
    /// `P_α[a][b]` per (polarization, flavor), row-major `N²`.
    projectors: [Vec<Vec<C64>>; 2],
    /// Σ over active flavors of `P_α`, per polarization.
    active: [Vec<C64>; 2],
    pairs: Vec<(usize, usize)>,
    rates: &'a RatePair,
    masses: &'a [f64],
    body: &'a dyn Body,
    track: &'a Track,
    incoherent: bool,
    regeneration: bool,
    majorana: bool,
    /// Regeneration kernels `W_l · S(E_k/E_l) · c_l / E_l²`, row-major (k, l).
    cpp_kernel: Vec<f64>,
    cvp_kernel: Vec<f64>,
}

impl<'a> DensityMatrixSystem<'a> {
    pub(crate) fn new(problem: &EvolutionProblem<'a>) -> Self {
        let n = problem.mixing.num_neu();
        let energies = problem.grid.nodes().to_vec();
        let n_e = energies.len();

        let mut omega = Vec::with_capacity(n_e * n);
        let mut widths = Vec::with_capacity(n_e * n);
        for &e in &energies {
            omega.extend(problem.mixing.vacuum_frequencies(e));
            widths.extend((0..n).map(|a| problem.rates.lab_width(a, e)));
        }

        let u = problem.mixing.mixing_matrix();
        let neutrino: Vec<Vec<C64>> = (0..n)
            .map(|alpha| {
                let mut p = vec![C64::default(); n * n];
                for a in 0..n {
                    for b in 0..n {
                        p[a * n + b] = u[(alpha, a)].conj() * u[(alpha, b)];
                    }
                }
                p
            })
            .collect();
        let antineutrino: Vec<Vec<C64>> = neutrino
            .iter()
            .map(|p| p.iter().map(|z| z.conj()).collect())
            .collect();
        let sum_active = |ps: &[Vec<C64>]| {
            let mut s = vec![C64::default(); n * n];
            for p in ps.iter().take(ACTIVE_FLAVORS) {
                for (acc, z) in s.iter_mut().zip(p) {
                    *acc += *z;
                }
            }
            s
        };
        let active = [sum_active(&neutrino), sum_active(&antineutrino)];

        let pairs = (0..n)
            .flat_map(|a| (a + 1..n).map(move |b| (a, b)))
            .collect();

        let (cpp_kernel, cvp_kernel) = regeneration_kernels(problem.grid);

        Self {
            n,
            energies,
            omega,
            widths,
            projectors: [neutrino, antineutrino],
            active,
            pairs,
            rates: problem.rates,
            masses: problem.masses,
            body: problem.body,
            track: problem.track,
            incoherent: problem.flags.incoherent_interactions,
            regeneration: problem.flags.decay_regeneration,
            majorana: problem.flags.majorana,
            cpp_kernel,
            cvp_kernel,
        }
    }

    fn offset(&self, node: usize, polarization: usize) -> usize {
        (node * 2 + polarization) * self.n * self.n
    }

    fn unpack(&self, block: &[f64], rho: &mut [C64]) {
        let n = self.n;
        for a in 0..n {
            rho[a * n + a] = C64::new(block[a], 0.0);
        }
        for (q, &(a, b)) in self.pairs.iter().enumerate() {
            let z = C64::new(block[n + 2 * q], block[n + 2 * q + 1]);
            rho[a * n + b] = z;
            rho[b * n + a] = z.conj();
        }
    }

    fn pack(&self, rho: &[C64], block: &mut [f64]) {
        let n = self.n;
        for a in 0..n {
            block[a] = rho[a * n + a].re;
        }
        for (q, &(a, b)) in self.pairs.iter().enumerate() {
            let z = rho[a * n + b];
            block[n + 2 * q] = z.re;
            block[n + 2 * q + 1] = z.im;
        }
    }

    /// Interaction-picture phases `exp(i(ωₐ - ω_b)t)` at one node.
    fn phases(&self, node: usize, t: f64, out: &mut [C64]) {
        let n = self.n;
        let w = &self.omega[node * n..(node + 1) * n];
        for a in 0..n {
            for b in 0..n {
                out[a * n + b] = C64::from_polar(1.0, (w[a] - w[b]) * t);
            }
        }
    }

    /// Packed initial state. Flavor-basis fluxes are rotated into the mass
    /// basis through the flavor projectors.
    pub(crate) fn initial_vector(&self, initial: &FluxState, basis: Basis) -> Vec<f64> {
        let n = self.n;
        let mut y = vec![0.0; self.dim()];
        let mut rho = vec![C64::default(); n * n];
        for node in 0..self.energies.len() {
            for (p, pol) in POLARIZATIONS.into_iter().enumerate() {
                rho.fill(C64::default());
                match basis {
                    Basis::Flavor => {
                        for (alpha, proj) in self.projectors[p].iter().enumerate() {
                            let phi = initial.get(node, pol, Flavor::from_index(alpha));
                            if phi == 0.0 {
                                continue;
                            }
                            for (r, z) in rho.iter_mut().zip(proj) {
                                *r += *z * phi;
                            }
                        }
                    }
                    Basis::Mass => {
                        for a in 0..n {
                            let phi = initial.get_state(node, pol, a).unwrap_or(0.0);
                            rho[a * n + a] = C64::new(phi, 0.0);
                        }
                    }
                }
                let off = self.offset(node, p);
                self.pack(&rho, &mut y[off..off + n * n]);
            }
        }
        y
    }

    /// Flavor and mass-state fluxes of the packed state at position `x`.
    pub(crate) fn project(&self, y: &[f64], x: f64) -> (FluxState, FluxState) {
        let n = self.n;
        let n_e = self.energies.len();
        let t = x - self.track.x_initial();
        let mut flavor = FluxState::zeros(n_e, n);
        let mut mass = FluxState::zeros(n_e, n);
        let mut rho = vec![C64::default(); n * n];
        let mut ph = vec![C64::default(); n * n];
        for node in 0..n_e {
            self.phases(node, t, &mut ph);
            for (p, pol) in POLARIZATIONS.into_iter().enumerate() {
                let off = self.offset(node, p);
                self.unpack(&y[off..off + n * n], &mut rho);
                for (r, z) in rho.iter_mut().zip(&ph) {
                    *r *= z.conj();
                }
                for a in 0..n {
                    mass.set_state(node, pol, a, rho[a * n + a].re);
                }
                for (alpha, proj) in self.projectors[p].iter().enumerate() {
                    let mut value = 0.0;
                    for a in 0..n {
                        for b in 0..n {
                            value += (proj[a * n + b] * rho[b * n + a]).re;
                        }
                    }
                    flavor.set_state(node, pol, alpha, value);
                }
            }
        }
        (flavor, mass)
    }

    /// Source term for the diagonal entry of `daughter` at (`node`, `p`).
    fn regenerated(&self, y: &[f64], node: usize, p: usize, daughter: usize) -> f64 {
        let n_e = self.energies.len();
        // CVP daughters of Majorana parents land in the opposite helicity.
        let flipped = POLARIZATIONS[p].flipped().index();
        let mut total = 0.0;
        for parent in daughter + 1..self.n {
            let m = self.masses[parent];
            let cpp = self.rates.cpp.partial_rate(parent, daughter) * m;
            let cvp = if self.majorana {
                self.rates.cvp.partial_rate(parent, daughter) * m
            } else {
                0.0
            };
            if cpp == 0.0 && cvp == 0.0 {
                continue;
            }
            for l in node..n_e {
                let kernel = node * n_e + l;
                total += cpp * self.cpp_kernel[kernel] * y[self.offset(l, p) + parent]
                    + cvp * self.cvp_kernel[kernel] * y[self.offset(l, flipped) + parent];
            }
        }
        total
    }
}

impl OdeSystem for DensityMatrixSystem<'_> {
    fn dim(&self) -> usize {
        self.energies.len() * 2 * self.n * self.n
    }

    fn derivative(&self, x: f64, y: &[f64], dydx: &mut [f64]) {
        let n = self.n;
        let nn = n * n;
        let t = x - self.track.x_initial();
        let matter = self.body.sample(self.track, x);
        let v_cc = charged_current_potential(matter.density, matter.electron_fraction);
        let v_nc = neutral_current_potential(matter.density, matter.electron_fraction);
        let nucleons = matter.density * AVOGADRO / CM;

        let mut rho = vec![C64::default(); nn];
        let mut drho = vec![C64::default(); nn];
        let mut h1 = vec![C64::default(); nn];
        let mut h = vec![C64::default(); nn];
        let mut absorb = vec![C64::default(); nn];
        let mut ph = vec![C64::default(); nn];

        for p in 0..2 {
            let sign = if p == 0 { 1.0 } else { -1.0 };
            h1.fill(C64::default());
            for (alpha, proj) in self.projectors[p].iter().enumerate().take(ACTIVE_FLAVORS) {
                let v = sign
                    * match alpha {
                        0 => v_cc + v_nc,
                        _ => v_nc,
                    };
                for (acc, z) in h1.iter_mut().zip(proj) {
                    *acc += *z * v;
                }
            }
            let slope = if p == 0 {
                NU_CROSS_SECTION
            } else {
                NUBAR_CROSS_SECTION
            };

            for node in 0..self.energies.len() {
                let off = self.offset(node, p);
                self.unpack(&y[off..off + nn], &mut rho);
                self.phases(node, t, &mut ph);
                for i in 0..nn {
                    h[i] = h1[i] * ph[i];
                }

                // -i[H, ρ]
                for a in 0..n {
                    for b in a..n {
                        let mut c = C64::default();
                        for k in 0..n {
                            c += h[a * n + k] * rho[k * n + b] - rho[a * n + k] * h[k * n + b];
                        }
                        drho[a * n + b] = C64::new(c.im, -c.re);
                    }
                }

                let gamma = &self.widths[node * n..(node + 1) * n];
                for a in 0..n {
                    for b in a..n {
                        drho[a * n + b] -= rho[a * n + b] * (0.5 * (gamma[a] + gamma[b]));
                    }
                }

                if self.incoherent && nucleons > 0.0 {
                    let rate = slope * self.energies[node] / GEV * nucleons;
                    for i in 0..nn {
                        absorb[i] = self.active[p][i] * ph[i] * rate;
                    }
                    for a in 0..n {
                        for b in a..n {
                            let mut c = C64::default();
                            for k in 0..n {
                                c += absorb[a * n + k] * rho[k * n + b]
                                    + rho[a * n + k] * absorb[k * n + b];
                            }
                            drho[a * n + b] -= c * 0.5;
                        }
                    }
                }

                self.pack(&drho, &mut dydx[off..off + nn]);
            }
        }

        if self.regeneration {
            for node in 0..self.energies.len() {
                for p in 0..2 {
                    let off = self.offset(node, p);
                    for daughter in 0..n - 1 {
                        dydx[off + daughter] += self.regenerated(y, node, p, daughter);
                    }
                }
            }
        }
    }
}

/// Regeneration kernels for the daughter spectra `2x` (chirality
/// preserving) and `2(1 - x)` (chirality violating), `x = E_k / E_l`.
///
/// Entry (k, l) is `W_l · S(x) · c_l / E_l²` with `W` the grid's trapezoid
/// weights and `1/E_l²` from the lab-frame width and the spectrum
/// normalization. `c_l` rescales each parent column so that its daughters
/// integrate, under `W`, to the fraction of the continuum spectrum that
/// lands inside the grid (`1 - (E_0/E_l)²` and `(1 - E_0/E_l)²`). The
/// grid-integrated flux therefore never grows through regeneration.
fn regeneration_kernels(grid: &EnergyGrid) -> (Vec<f64>, Vec<f64>) {
    let energies = grid.nodes();
    let weights = grid.trapezoid_weights();
    let n_e = energies.len();
    let e_min = grid.min();
    let mut cpp = vec![0.0; n_e * n_e];
    let mut cvp = vec![0.0; n_e * n_e];
    for l in 0..n_e {
        let e_l = energies[l];
        let r = e_min / e_l;
        let cpp_spectrum = |k: usize| 2.0 * energies[k] / e_l;
        let cvp_spectrum = |k: usize| 2.0 * (1.0 - energies[k] / e_l);
        let column = |kernel: &mut [f64], spectrum: &dyn Fn(usize) -> f64, on_grid: f64| {
            let norm: f64 = (0..=l).map(|k| weights[k] * spectrum(k) / e_l).sum();
            if norm <= 0.0 {
                return;
            }
            let scale = weights[l] * on_grid / (norm * e_l * e_l);
            for k in 0..=l {
                kernel[k * n_e + l] = scale * spectrum(k);
            }
        };
        column(&mut cpp, &cpp_spectrum, 1.0 - r * r);
        column(&mut cvp, &cvp_spectrum, (1.0 - r) * (1.0 - r));
    }
    (cpp, cvp)
}
