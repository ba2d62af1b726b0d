//! Natural units (ħ = c = 1) with the electronvolt as base.
//!
//! Energies and masses are in eV, lengths and times in eV⁻¹. Multiply a
//! quantity by its unit constant to convert into natural units and divide
//! to convert back:
//!
//! ```
//! use nudecay_core::units::{GEV, KM};
//!
//! let energy = 2.5 * GEV;
//! let baseline = 1300.0 * KM;
//! assert_eq!(energy / GEV, 2.5);
//! assert!((baseline / KM - 1300.0).abs() < 1e-9);
//! ```

/// One electronvolt.
pub const EV: f64 = 1.0;
/// One kiloelectronvolt.
pub const KEV: f64 = 1.0e3 * EV;
/// One megaelectronvolt.
pub const MEV: f64 = 1.0e6 * EV;
/// One gigaelectronvolt.
pub const GEV: f64 = 1.0e9 * EV;
/// One teraelectronvolt.
pub const TEV: f64 = 1.0e12 * EV;
/// One petaelectronvolt.
pub const PEV: f64 = 1.0e15 * EV;

/// ħc in eV·m.
pub const HBAR_C_EV_M: f64 = 1.973_269_804e-7;
/// ħ in eV·s.
pub const HBAR_EV_S: f64 = 6.582_119_569e-16;

/// One meter in eV⁻¹.
pub const METER: f64 = 1.0 / HBAR_C_EV_M;
/// One centimeter in eV⁻¹.
pub const CM: f64 = 1.0e-2 * METER;
/// One kilometer in eV⁻¹.
pub const KM: f64 = 1.0e3 * METER;
/// One second in eV⁻¹.
pub const SECOND: f64 = 1.0 / HBAR_EV_S;

/// Fermi coupling constant in eV⁻².
pub const FERMI_CONSTANT: f64 = 1.166_378_7e-23;
/// Avogadro's number (nucleons per gram, to the precision used here).
pub const AVOGADRO: f64 = 6.022_140_76e23;

/// Number density (eV³) of particles with `per_gram` particles per gram at
/// mass density `density` in g/cm³.
pub fn number_density(density: f64, per_gram: f64) -> f64 {
    density * per_gram / (CM * CM * CM)
}

/// Charged-current matter potential √2 G_F nₑ in eV.
pub fn charged_current_potential(density: f64, electron_fraction: f64) -> f64 {
    std::f64::consts::SQRT_2 * FERMI_CONSTANT * number_density(density, electron_fraction * AVOGADRO)
}

/// Neutral-current matter potential −G_F nₙ / √2 in eV.
pub fn neutral_current_potential(density: f64, electron_fraction: f64) -> f64 {
    -FERMI_CONSTANT * number_density(density, (1.0 - electron_fraction) * AVOGADRO)
        / std::f64::consts::SQRT_2
}
