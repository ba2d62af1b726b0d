//! The (energy × polarization × flavor) flux state tensor.

use ndarray::Array3;

use crate::flavor::{Flavor, Polarization};

/// Flux densities indexed by energy node, polarization and state.
///
/// The third axis holds flavors or mass eigenstates depending on the
/// [`Basis`](crate::Basis) it is interpreted in. A fresh state is zero
/// everywhere; loaders fill only the slots they know about.
///
/// # Examples
///
/// ```
/// use nudecay_core::{Flavor, FluxState, Polarization};
///
/// let mut state = FluxState::zeros(10, 4);
/// state.set(3, Polarization::Neutrino, Flavor::Muon, 1.5);
/// assert_eq!(state.get(3, Polarization::Neutrino, Flavor::Muon), 1.5);
/// assert_eq!(state.get(3, Polarization::Antineutrino, Flavor::Muon), 0.0);
/// assert_eq!(state.shape(), (10, 2, 4));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FluxState {
    data: Array3<f64>,
}

impl FluxState {
    /// A zero-filled state with `num_energies` nodes and `num_neu` states.
    pub fn zeros(num_energies: usize, num_neu: usize) -> Self {
        Self {
            data: Array3::zeros((num_energies, 2, num_neu)),
        }
    }

    /// Wrap an existing array. The middle axis must have length 2.
    pub fn from_array(data: Array3<f64>) -> Option<Self> {
        (data.dim().1 == 2).then_some(Self { data })
    }

    /// `(num_energies, 2, num_neu)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Number of energy nodes.
    pub fn num_energies(&self) -> usize {
        self.data.dim().0
    }

    /// Number of flavor or mass states.
    pub fn num_neu(&self) -> usize {
        self.data.dim().2
    }

    /// Value at a flavor slot.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    pub fn get(&self, node: usize, polarization: Polarization, flavor: Flavor) -> f64 {
        self.data[[node, polarization.index(), flavor.index()]]
    }

    /// Set a flavor slot.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    pub fn set(&mut self, node: usize, polarization: Polarization, flavor: Flavor, value: f64) {
        self.data[[node, polarization.index(), flavor.index()]] = value;
    }

    /// Value at a raw state index (flavor or mass, by basis).
    pub fn get_state(&self, node: usize, polarization: Polarization, state: usize) -> Option<f64> {
        self.data.get([node, polarization.index(), state]).copied()
    }

    /// Set a raw state index (flavor or mass, by basis).
    pub fn set_state(
        &mut self,
        node: usize,
        polarization: Polarization,
        state: usize,
        value: f64,
    ) -> Option<()> {
        let slot = self.data.get_mut([node, polarization.index(), state])?;
        *slot = value;
        Some(())
    }

    /// Sum over the state axis at one node and polarization.
    pub fn total(&self, node: usize, polarization: Polarization) -> f64 {
        (0..self.num_neu())
            .map(|s| self.data[[node, polarization.index(), s]])
            .sum()
    }

    /// Whether every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Borrow the underlying array.
    pub fn as_array(&self) -> &Array3<f64> {
        &self.data
    }

    /// Consume into the underlying array.
    pub fn into_array(self) -> Array3<f64> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_has_requested_shape() {
        let s = FluxState::zeros(200, 4);
        assert_eq!(s.shape(), (200, 2, 4));
        assert!(s.as_array().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn from_array_rejects_wrong_polarization_axis() {
        assert!(FluxState::from_array(Array3::zeros((3, 3, 4))).is_none());
        assert!(FluxState::from_array(Array3::zeros((3, 2, 4))).is_some());
    }

    #[test]
    fn raw_state_access_is_bounds_checked() {
        let mut s = FluxState::zeros(2, 3);
        assert!(s.set_state(1, Polarization::Antineutrino, 2, 4.0).is_some());
        assert!(s.set_state(1, Polarization::Antineutrino, 3, 4.0).is_none());
        assert_eq!(s.get_state(1, Polarization::Antineutrino, 2), Some(4.0));
        assert_eq!(s.get_state(2, Polarization::Neutrino, 0), None);
    }

    #[test]
    fn total_sums_states() {
        let mut s = FluxState::zeros(1, 4);
        s.set(0, Polarization::Neutrino, Flavor::Electron, 1.0);
        s.set(0, Polarization::Neutrino, Flavor::Sterile(0), 2.0);
        assert_eq!(s.total(0, Polarization::Neutrino), 3.0);
        assert_eq!(s.total(0, Polarization::Antineutrino), 0.0);
    }
}
